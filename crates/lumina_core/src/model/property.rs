//! Database property schema model.
//!
//! # Responsibility
//! - Define typed column definitions owned by database pages.
//! - Define select options referenced by id from row value maps.
//!
//! # Invariants
//! - `options` is only meaningful for `select` and `multi-select`.
//! - Option ids are generated once and never rewritten, so label/color edits
//!   propagate to every row without touching row data.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable property identifier, used as the key in row `properties` maps.
pub type PropertyId = String;

/// Stable select option identifier, stored as the row value.
pub type OptionId = String;

/// Colors accepted for select options.
pub const OPTION_COLORS: &[&str] = &[
    "gray", "blue", "green", "yellow", "orange", "red", "purple", "pink",
];

/// Color assigned to newly created options.
pub const DEFAULT_OPTION_COLOR: &str = "gray";

/// Property value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    Text,
    Number,
    Date,
    Select,
    MultiSelect,
    Checkbox,
    Url,
}

impl PropertyType {
    /// Whether this type carries an `options` list.
    pub fn is_select_family(self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

/// One selectable option of a select-family property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOption {
    pub id: OptionId,
    pub label: String,
    pub color: String,
}

impl PropertyOption {
    /// Creates an option with a fresh id and the default color.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            color: DEFAULT_OPTION_COLOR.to_string(),
        }
    }
}

/// Typed column definition of a database page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub id: PropertyId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PropertyOption>>,
}

impl PropertySchema {
    /// Creates a property with a fresh id and no options.
    pub fn new(name: impl Into<String>, kind: PropertyType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            options: None,
        }
    }

    /// Options in declaration order; empty for non-select types.
    pub fn options(&self) -> &[PropertyOption] {
        if !self.kind.is_select_family() {
            return &[];
        }
        self.options.as_deref().unwrap_or(&[])
    }

    /// Looks up one option by id.
    pub fn option(&self, option_id: &str) -> Option<&PropertyOption> {
        self.options().iter().find(|option| option.id == option_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{PropertyOption, PropertySchema, PropertyType};

    #[test]
    fn multi_select_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_value(PropertyType::MultiSelect).expect("serialize");
        assert_eq!(json, "multi-select");
    }

    #[test]
    fn options_are_hidden_for_non_select_types() {
        let mut property = PropertySchema::new("Status", PropertyType::Select);
        property.options = Some(vec![PropertyOption::new("Done")]);
        assert_eq!(property.options().len(), 1);

        property.kind = PropertyType::Text;
        assert!(property.options().is_empty());
        assert!(property.options.is_some());
    }
}
