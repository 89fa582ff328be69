//! Table block grid editing.
//!
//! A table block keeps its grid in metadata (`tableHeaders` + `tableData`).
//! Blocks without a stored grid read as a 2x2 empty grid.

use crate::editor::EditorError;
use crate::model::block::BlockMetadata;
use serde::{Deserialize, Serialize};

/// One edit applied to a table block grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TableEdit {
    UpdateCell {
        row: usize,
        column: usize,
        value: String,
    },
    UpdateHeader {
        column: usize,
        value: String,
    },
    AddRow,
    AddColumn,
}

/// Header row plus data rows of a table block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Default for TableGrid {
    fn default() -> Self {
        Self {
            headers: vec!["Column 1".to_string(), "Column 2".to_string()],
            rows: vec![
                vec![String::new(), String::new()],
                vec![String::new(), String::new()],
            ],
        }
    }
}

impl TableGrid {
    /// Reads the grid stored in `metadata`, falling back to defaults per part.
    pub fn from_metadata(metadata: Option<&BlockMetadata>) -> Self {
        let fallback = Self::default();
        Self {
            headers: metadata
                .and_then(|m| m.table_headers.clone())
                .unwrap_or(fallback.headers),
            rows: metadata
                .and_then(|m| m.table_data.clone())
                .unwrap_or(fallback.rows),
        }
    }

    /// Writes both grid parts back into `metadata`, keeping other fields.
    pub fn write_to(self, metadata: &mut BlockMetadata) {
        metadata.table_headers = Some(self.headers);
        metadata.table_data = Some(self.rows);
    }

    pub fn apply(&mut self, edit: TableEdit) -> Result<(), EditorError> {
        match edit {
            TableEdit::UpdateCell { row, column, value } => {
                let cell = self
                    .rows
                    .get_mut(row)
                    .and_then(|cells| cells.get_mut(column))
                    .ok_or(EditorError::CellOutOfRange { row, column })?;
                *cell = value;
            }
            TableEdit::UpdateHeader { column, value } => {
                let header = self
                    .headers
                    .get_mut(column)
                    .ok_or(EditorError::ColumnOutOfRange(column))?;
                *header = value;
            }
            TableEdit::AddRow => {
                self.rows.push(vec![String::new(); self.headers.len()]);
            }
            TableEdit::AddColumn => {
                self.headers.push(format!("Column {}", self.headers.len() + 1));
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }
        Ok(())
    }
}
