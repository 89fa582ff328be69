//! Database view descriptors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable view identifier within one database page.
pub type ViewId = String;

/// View layout. Only `table` and `board` have projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Table,
    Board,
    Gallery,
    List,
    Calendar,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Board => "board",
            Self::Gallery => "gallery",
            Self::List => "list",
            Self::Calendar => "calendar",
        }
    }
}

/// A named view over a database's rows.
///
/// `config` is carried opaquely; the board grouping key is never read from
/// it (the first select property is always used).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseView {
    pub id: ViewId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ViewKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl DatabaseView {
    pub fn new(name: impl Into<String>, kind: ViewKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            config: None,
        }
    }
}
