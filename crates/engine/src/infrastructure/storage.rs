//! Local-disk storage for the persisted data files.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::infrastructure::ports::{StorageError, StoragePort};

/// Stores each data file as a plain file under `root`.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn io_error(name: &str, err: std::io::Error) -> StorageError {
        StorageError::Io {
            name: name.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl StoragePort for FileStorage {
    async fn read_file(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(name.into())),
            Err(e) => Err(Self::io_error(name, e)),
        }
    }

    async fn write_file(
        &self,
        name: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<usize, StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Self::io_error(name, e))?;

        // Write beside the target and rename so readers never see a partial file.
        let target = self.root.join(name);
        let staging = self.root.join(format!("{name}.tmp"));
        fs::write(&staging, &bytes)
            .await
            .map_err(|e| Self::io_error(name, e))?;
        fs::rename(&staging, &target)
            .await
            .map_err(|e| Self::io_error(name, e))?;

        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn written_file_reads_back() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(temp_dir.path());

        let written = storage
            .write_file("world.json", "application/json", b"{\"areas\":[]}".to_vec())
            .await
            .expect("write");

        assert_eq!(written, 12);
        let bytes = storage.read_file("world.json").await.expect("read");
        assert_eq!(bytes, b"{\"areas\":[]}");
        assert!(!temp_dir.path().join("world.json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(temp_dir.path());

        let err = storage.read_file("mobs.json").await.expect_err("missing");

        assert!(matches!(err, StorageError::NotFound(name) if name == "mobs.json"));
    }

    #[tokio::test]
    async fn creates_missing_data_directory() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(temp_dir.path().join("nested/data"));

        storage
            .write_file("schema-version", "text/plain", b"1".to_vec())
            .await
            .expect("write");

        assert!(temp_dir.path().join("nested/data/schema-version").exists());
    }
}
