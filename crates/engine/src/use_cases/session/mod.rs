//! Session lifecycle use cases.

mod login;
mod teardown;

pub use login::{Login, LoginError};
pub use teardown::{LeaveWorld, Teardown};

use std::sync::Arc;

/// Container for session use cases.
pub struct SessionUseCases {
    pub login: Arc<Login>,
    pub leave_world: Arc<LeaveWorld>,
    pub teardown: Arc<Teardown>,
}

impl SessionUseCases {
    pub fn new(login: Arc<Login>, leave_world: Arc<LeaveWorld>, teardown: Arc<Teardown>) -> Self {
        Self {
            login,
            leave_world,
            teardown,
        }
    }
}
