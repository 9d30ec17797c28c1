//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Persisted data files (could swap local disk -> object storage)
//! - Mob behavior scripts (the scripting runtime lives outside the engine)
//! - Clock (for testing)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("I/O error on {name}: {message}")]
    Io { name: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum BehaviorError {
    #[error("Behavior function {function} failed: {message}")]
    Failed { function: String, message: String },
    #[error("Behavior runtime unavailable")]
    Unavailable,
}

// =============================================================================
// Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Reads a whole data file.
    async fn read_file(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Replaces a data file; returns the number of bytes written.
    async fn write_file(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<usize, StorageError>;
}

// =============================================================================
// Behavior Scripts
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BehaviorPort: Send + Sync {
    /// Invokes `function` of the script attached to a mob template.
    async fn invoke(
        &self,
        template_name: &str,
        instance_id: Uuid,
        function: &str,
        args: Vec<String>,
    ) -> Result<(), BehaviorError>;
}

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
