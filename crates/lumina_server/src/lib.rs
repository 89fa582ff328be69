//! HTTP surface for the Lumina workspace.
//!
//! # Responsibility
//! - Expose page, database, trash, backup and workspace operations as JSON
//!   routes over `lumina_core` services.
//! - Map core errors to HTTP statuses inside a uniform envelope.
//!
//! # Invariants
//! - Handlers never touch SQLite on the async executor.
//! - Every page mutation invalidates the cached tree, trash and row reads.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::{AppError, AppResult};
pub use router::build_app_router;
pub use state::{AppState, Store};
