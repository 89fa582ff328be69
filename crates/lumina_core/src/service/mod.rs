//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the HTTP and CLI layers decoupled from storage details.

pub mod page_service;
pub mod workspace_service;

pub use page_service::{
    NewRow, PageService, PageServiceError, PageServiceResult, WELCOME_PAGE_ID,
};
pub use workspace_service::{WorkspaceService, WorkspaceServiceError};
