//! Mudhall Engine library.
//!
//! This crate contains all server-side code for the Mudhall MUD server.
//!
//! ## Structure
//!
//! - `entities/` - Runtime world objects, the registry and the world model
//! - `stores/` - Live sessions and the active-session collection
//! - `commands/` - Command tree, line parsing, dispatch and handlers
//! - `use_cases/` - Multi-entity operations (movement, login, persistence)
//! - `scheduler` - Recurring maintenance tickers
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod commands;
pub mod entities;
pub mod infrastructure;
pub mod scheduler;
pub mod stores;
pub mod use_cases;

/// Builders shared by unit tests across modules.
#[cfg(test)]
mod test_support;

pub use app::App;
