//! Core domain logic for Lumina.
//! This crate is the single source of truth for block, page, schema and
//! trash invariants.

pub mod cache;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;
pub mod view;

pub use cache::{QueryCache, QueryKey};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use editor::{BlockEditor, BlockOperation, EditorError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::block::{Block, BlockId, BlockKind, BlockMetadata, BlockPatch};
pub use model::page::{NewPage, Page, PageId, PageKind, PageMetadata, PagePatch};
pub use model::property::{PropertyOption, PropertySchema, PropertyType};
pub use model::view::{DatabaseView, ViewKind};
pub use model::workspace::{Workspace, WorkspacePatch};
pub use repo::{
    PageListQuery, PageRepository, RepoError, RepoResult, SqlitePageRepository,
    SqliteWorkspaceRepository, WorkspaceRepository,
};
pub use schema::{CellValue, SchemaEditor, SchemaError, SchemaOperation};
pub use service::{
    NewRow, PageService, PageServiceError, WorkspaceService, WorkspaceServiceError,
};
pub use view::{BoardColumnKey, BoardProjection, TableProjection, ViewError, ViewProjection};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
