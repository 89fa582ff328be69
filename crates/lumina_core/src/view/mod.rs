//! Read-only projections of database rows.
//!
//! # Responsibility
//! - Derive table and board display structures from `(schema, rows)`.
//!
//! # Invariants
//! - Projections never mutate schema or rows.
//! - Row order inside every projection is the input list order.

use crate::model::page::Page;
use crate::model::property::PropertySchema;
use crate::model::view::{DatabaseView, ViewKind};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod board;
pub mod table;

pub use board::{
    group_property, project_board, BoardCard, BoardColumn, BoardColumnKey, BoardProjection,
    NO_STATUS_LABEL,
};
pub use table::{project_table, TableColumn, TableProjection, TableRow};

/// Errors from view projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// View layout has no projection.
    Unsupported(ViewKind),
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(kind) => write!(f, "view type `{}` is not supported", kind.as_str()),
        }
    }
}

impl Error for ViewError {}

/// Projection of one database view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewProjection {
    Table(TableProjection),
    Board(BoardProjection),
}

/// Projects `rows` through `view`.
pub fn project_view(
    view: &DatabaseView,
    schema: &[PropertySchema],
    rows: &[Page],
) -> Result<ViewProjection, ViewError> {
    match view.kind {
        ViewKind::Table => Ok(ViewProjection::Table(project_table(schema, rows))),
        ViewKind::Board => Ok(ViewProjection::Board(project_board(schema, rows))),
        other => Err(ViewError::Unsupported(other)),
    }
}
