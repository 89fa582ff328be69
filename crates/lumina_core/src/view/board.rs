//! Board view projection.
//!
//! # Invariants
//! - The grouping key is the first `select` property in declaration order.
//! - Columns are the key's options in option order, then `No Status`.
//! - Every row lands in exactly one column.

use crate::model::page::{Page, PageId, RowProperties};
use crate::model::property::{
    OptionId, PropertyId, PropertySchema, PropertyType, DEFAULT_OPTION_COLOR,
};
use serde::Serialize;
use serde_json::Value;

/// Label of the trailing column that collects unmatched rows.
pub const NO_STATUS_LABEL: &str = "No Status";

/// Identifies one board column.
///
/// Serialized as the option id, or `null` for the `No Status` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum BoardColumnKey {
    Option(OptionId),
    NoStatus,
}

impl From<Option<String>> for BoardColumnKey {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::NoStatus, Self::Option)
    }
}

impl From<BoardColumnKey> for Option<String> {
    fn from(key: BoardColumnKey) -> Self {
        match key {
            BoardColumnKey::Option(option_id) => Some(option_id),
            BoardColumnKey::NoStatus => None,
        }
    }
}

impl BoardColumnKey {
    /// Row values for a row created from this column.
    ///
    /// An option column pre-populates the grouping property; `No Status`
    /// leaves it unset.
    pub fn initial_properties(&self, group_property_id: &str) -> RowProperties {
        let mut properties = RowProperties::new();
        if let Self::Option(option_id) = self {
            properties.insert(
                group_property_id.to_string(),
                Value::String(option_id.clone()),
            );
        }
        properties
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    pub page_id: PageId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    pub key: BoardColumnKey,
    pub label: String,
    pub color: String,
    pub cards: Vec<BoardCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BoardProjection {
    /// The schema has no `select` property to group by.
    Unconfigured,
    Grouped {
        group_property_id: PropertyId,
        columns: Vec<BoardColumn>,
    },
}

/// First `select` property in declaration order, if any.
pub fn group_property(schema: &[PropertySchema]) -> Option<&PropertySchema> {
    schema
        .iter()
        .find(|property| property.kind == PropertyType::Select)
}

/// Groups `rows` into columns keyed by the first `select` property.
pub fn project_board(schema: &[PropertySchema], rows: &[Page]) -> BoardProjection {
    let Some(group) = group_property(schema) else {
        return BoardProjection::Unconfigured;
    };

    let mut columns: Vec<BoardColumn> = group
        .options()
        .iter()
        .map(|option| BoardColumn {
            key: BoardColumnKey::Option(option.id.clone()),
            label: option.label.clone(),
            color: option.color.clone(),
            cards: Vec::new(),
        })
        .collect();
    let no_status = columns.len();
    columns.push(BoardColumn {
        key: BoardColumnKey::NoStatus,
        label: NO_STATUS_LABEL.to_string(),
        color: DEFAULT_OPTION_COLOR.to_string(),
        cards: Vec::new(),
    });

    for row in rows {
        let value = row
            .properties
            .as_ref()
            .and_then(|values| values.get(&group.id))
            .and_then(Value::as_str);
        let index = value
            .and_then(|option_id| {
                group
                    .options()
                    .iter()
                    .position(|option| option.id == option_id)
            })
            .unwrap_or(no_status);
        columns[index].cards.push(BoardCard {
            page_id: row.id.clone(),
            title: row.title.clone(),
            icon: row.icon.clone(),
        });
    }

    BoardProjection::Grouped {
        group_property_id: group.id.clone(),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::{project_board, BoardColumnKey, BoardProjection, NO_STATUS_LABEL};
    use crate::model::page::{Page, PageKind, RowProperties};
    use crate::model::property::{PropertyOption, PropertySchema, PropertyType};
    use serde_json::json;

    fn row(id: &str, properties: Option<RowProperties>) -> Page {
        Page {
            id: id.to_string(),
            kind: PageKind::Page,
            title: id.to_string(),
            icon: None,
            cover: None,
            parent_id: Some("db".to_string()),
            blocks: Vec::new(),
            properties_schema: None,
            views: None,
            properties,
            is_public: false,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    fn status_property() -> PropertySchema {
        let mut property = PropertySchema::new("Status", PropertyType::Select);
        property.options = Some(vec![PropertyOption::new("A"), PropertyOption::new("B")]);
        property
    }

    fn card_ids(projection: &BoardProjection) -> Vec<(String, Vec<String>)> {
        match projection {
            BoardProjection::Grouped { columns, .. } => columns
                .iter()
                .map(|column| {
                    (
                        column.label.clone(),
                        column.cards.iter().map(|c| c.page_id.clone()).collect(),
                    )
                })
                .collect(),
            BoardProjection::Unconfigured => Vec::new(),
        }
    }

    #[test]
    fn groups_rows_by_option_with_trailing_no_status() {
        let status = status_property();
        let a = status.options()[0].id.clone();
        let b = status.options()[1].id.clone();
        let rows = vec![
            row("r1", Some(RowProperties::from([(status.id.clone(), json!(a))]))),
            row("r2", Some(RowProperties::from([(status.id.clone(), json!(b))]))),
            row("r3", None),
        ];

        let projection = project_board(std::slice::from_ref(&status), &rows);

        assert_eq!(
            card_ids(&projection),
            vec![
                ("A".to_string(), vec!["r1".to_string()]),
                ("B".to_string(), vec!["r2".to_string()]),
                (NO_STATUS_LABEL.to_string(), vec!["r3".to_string()]),
            ]
        );
    }

    #[test]
    fn unmatched_values_fall_into_no_status_in_row_order() {
        let status = status_property();
        let rows = vec![
            row("r1", Some(RowProperties::from([(status.id.clone(), json!("gone"))]))),
            row("r2", Some(RowProperties::from([(status.id.clone(), json!(7))]))),
        ];
        let projection = project_board(std::slice::from_ref(&status), &rows);
        let columns = card_ids(&projection);
        assert_eq!(columns[2].1, vec!["r1".to_string(), "r2".to_string()]);
    }

    #[test]
    fn first_select_property_wins_and_multi_select_is_skipped() {
        let mut tags = PropertySchema::new("Tags", PropertyType::MultiSelect);
        tags.options = Some(vec![PropertyOption::new("x")]);
        let first = status_property();
        let second = status_property();
        let schema = vec![tags, first.clone(), second];

        match project_board(&schema, &[]) {
            BoardProjection::Grouped {
                group_property_id, ..
            } => assert_eq!(group_property_id, first.id),
            BoardProjection::Unconfigured => panic!("expected grouped board"),
        }
    }

    #[test]
    fn schema_without_select_is_unconfigured() {
        let schema = vec![PropertySchema::new("Notes", PropertyType::Text)];
        assert_eq!(project_board(&schema, &[]), BoardProjection::Unconfigured);
    }

    #[test]
    fn column_key_prepopulates_group_property() {
        let key = BoardColumnKey::Option("opt-1".to_string());
        assert_eq!(key.initial_properties("status")["status"], json!("opt-1"));
        assert!(BoardColumnKey::NoStatus.initial_properties("status").is_empty());
    }

    #[test]
    fn column_key_serializes_as_nullable_option_id() {
        assert_eq!(
            serde_json::to_value(BoardColumnKey::NoStatus).unwrap(),
            json!(null)
        );
        let key: BoardColumnKey = serde_json::from_value(json!("opt-1")).unwrap();
        assert_eq!(key, BoardColumnKey::Option("opt-1".to_string()));
    }
}
