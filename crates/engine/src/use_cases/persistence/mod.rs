//! Loading and saving the world through the storage port.

mod load;
mod records;
mod save;

pub use load::{LoadError, LoadSummary, LoadWorld};
pub use records::CURRENT_SCHEMA_VERSION;
pub use save::{SaveError, SaveWorld};

use std::sync::Arc;

/// Container for persistence use cases.
pub struct PersistenceUseCases {
    pub load: Arc<LoadWorld>,
    pub save: Arc<SaveWorld>,
}

impl PersistenceUseCases {
    pub fn new(load: Arc<LoadWorld>, save: Arc<SaveWorld>) -> Self {
        Self { load, save }
    }
}
