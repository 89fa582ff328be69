//! Block sequence editing.
//!
//! # Responsibility
//! - Own the ordered block list of one page and its mutation rules.
//! - Report every successful mutation as a full new sequence.
//! - Provide slash-command lookup and change debouncing for callers.
//!
//! # Invariants
//! - A sequence never becomes empty through editor operations.
//! - Failed operations leave the sequence untouched and do not notify.

use crate::model::block::BlockId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod block_editor;
pub mod debounce;
pub mod slash;
pub mod table;

pub use block_editor::{BlockEditor, BlockOperation};
pub use debounce::{ChangeDebouncer, DEFAULT_QUIET_PERIOD};
pub use slash::{slash_menu, slash_query, SlashMenuItem};
pub use table::{TableEdit, TableGrid};

/// Errors from block editor operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Referenced block id is not in the sequence.
    BlockNotFound(BlockId),
    /// Deleting would leave the page without blocks.
    LastBlock(BlockId),
    /// Operation requires a todo block.
    NotATodo(BlockId),
    /// Operation requires a table block.
    NotATable(BlockId),
    /// Table cell coordinates are outside the grid.
    CellOutOfRange { row: usize, column: usize },
    /// Table header index is outside the header row.
    ColumnOutOfRange(usize),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlockNotFound(id) => write!(f, "block not found: {id}"),
            Self::LastBlock(id) => {
                write!(f, "cannot delete block {id}: a page keeps at least one block")
            }
            Self::NotATodo(id) => write!(f, "block is not a todo: {id}"),
            Self::NotATable(id) => write!(f, "block is not a table: {id}"),
            Self::CellOutOfRange { row, column } => {
                write!(f, "table cell ({row}, {column}) is out of range")
            }
            Self::ColumnOutOfRange(column) => write!(f, "table column {column} is out of range"),
        }
    }
}

impl Error for EditorError {}
