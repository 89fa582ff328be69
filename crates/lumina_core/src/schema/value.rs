//! Typed interpretation of raw row values.
//!
//! Row values are stored as raw JSON keyed by property id. Interpretation
//! happens on read against the current schema, so a type change or option
//! removal never touches stored data; mismatched values read as `Empty`.

use crate::model::property::{PropertyOption, PropertySchema, PropertyType};
use serde::Serialize;
use serde_json::Value;

/// A row value interpreted against its property definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum CellValue {
    Empty,
    Text(String),
    /// Kept as the raw string; no numeric coercion.
    Number(String),
    Url(String),
    /// ISO-8601 timestamp string.
    Date(String),
    Checkbox(bool),
    Select(PropertyOption),
    MultiSelect(Vec<PropertyOption>),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Interprets `raw` (the stored value, if any) against `property`.
pub fn interpret_value(property: &PropertySchema, raw: Option<&Value>) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Empty;
    };
    match property.kind {
        PropertyType::Text => non_empty_string(raw).map_or(CellValue::Empty, CellValue::Text),
        PropertyType::Url => non_empty_string(raw).map_or(CellValue::Empty, CellValue::Url),
        PropertyType::Date => non_empty_string(raw).map_or(CellValue::Empty, CellValue::Date),
        PropertyType::Number => match raw {
            Value::Number(number) => CellValue::Number(number.to_string()),
            other => non_empty_string(other).map_or(CellValue::Empty, CellValue::Number),
        },
        PropertyType::Checkbox => match raw {
            Value::Bool(checked) => CellValue::Checkbox(*checked),
            _ => CellValue::Empty,
        },
        PropertyType::Select => raw
            .as_str()
            .and_then(|option_id| property.option(option_id))
            .map_or(CellValue::Empty, |option| CellValue::Select(option.clone())),
        PropertyType::MultiSelect => {
            let Some(ids) = raw.as_array() else {
                return CellValue::Empty;
            };
            let options: Vec<PropertyOption> = ids
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|option_id| property.option(option_id))
                .cloned()
                .collect();
            if options.is_empty() {
                CellValue::Empty
            } else {
                CellValue::MultiSelect(options)
            }
        }
    }
}

fn non_empty_string(raw: &Value) -> Option<String> {
    raw.as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
