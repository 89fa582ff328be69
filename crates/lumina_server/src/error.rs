use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use lumina_core::{
    DbError, PageServiceError, RepoError, SchemaError, WorkspaceServiceError,
};

use crate::response::ApiResponse;

/// Application-level error type for HTTP handlers.
///
/// Wraps the core service errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Page(#[from] PageServiceError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceServiceError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Db(#[from] DbError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error; the message is logged, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Page(err) => page_status(err),
            Self::Repo(RepoError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Repo(RepoError::AlreadyExists(_)) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Workspace(_) | Self::Repo(_) | Self::Db(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn page_status(err: &PageServiceError) -> StatusCode {
    match err {
        PageServiceError::PageNotFound(_) | PageServiceError::ViewNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        PageServiceError::PageTrashed(_) => StatusCode::GONE,
        PageServiceError::NotPublic(_) => StatusCode::FORBIDDEN,
        PageServiceError::PageAlreadyExists(_) | PageServiceError::NotInTrash(_) => {
            StatusCode::CONFLICT
        }
        PageServiceError::Schema(SchemaError::PropertyNotFound(_)) => StatusCode::NOT_FOUND,
        PageServiceError::ParentNotFound(_)
        | PageServiceError::CycleDetected { .. }
        | PageServiceError::EmptyBlocks
        | PageServiceError::NotADatabase(_)
        | PageServiceError::InvalidImport(_)
        | PageServiceError::Editor(_)
        | PageServiceError::Schema(_)
        | PageServiceError::View(_) => StatusCode::BAD_REQUEST,
        PageServiceError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("response encoding failed: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("event=http_error module=server status=error error={self}");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}
