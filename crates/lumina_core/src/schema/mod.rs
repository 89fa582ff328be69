//! Database property schema editing and row value interpretation.
//!
//! # Responsibility
//! - Evolve the typed columns of a database page.
//! - Interpret raw stored row values against the current schema.
//!
//! # Invariants
//! - Schema edits never rewrite row values; stale values read as empty.
//! - Option ids are generated once and never changed by edits.

use crate::model::property::{OptionId, PropertyId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod editor;
pub mod value;

pub use editor::{PropertyPatch, SchemaEditor, SchemaOperation, DEFAULT_PROPERTY_NAME};
pub use value::{interpret_value, CellValue};

/// Errors from schema editing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    PropertyNotFound(PropertyId),
    OptionNotFound {
        property_id: PropertyId,
        option_id: OptionId,
    },
    /// Option operations require a `select` or `multi-select` property.
    NotSelectProperty(PropertyId),
    /// Option labels must contain at least one non-whitespace character.
    InvalidOptionLabel,
    UnknownColor(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PropertyNotFound(id) => write!(f, "property not found: {id}"),
            Self::OptionNotFound {
                property_id,
                option_id,
            } => write!(f, "option {option_id} not found on property {property_id}"),
            Self::NotSelectProperty(id) => write!(f, "property is not a select property: {id}"),
            Self::InvalidOptionLabel => write!(f, "option label must not be blank"),
            Self::UnknownColor(color) => write!(f, "unknown option color: {color}"),
        }
    }
}

impl Error for SchemaError {}
