//! Table view projection.

use crate::model::page::{Page, PageId};
use crate::model::property::{PropertyId, PropertySchema, PropertyType};
use crate::schema::value::{interpret_value, CellValue};
use serde::Serialize;

/// One table column. `Name` leads and `AddColumn` trails every table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TableColumn {
    Name,
    Property {
        property_id: PropertyId,
        name: String,
        #[serde(rename = "type")]
        property_type: PropertyType,
    },
    AddColumn,
}

/// One table row: the row page plus one cell per schema property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub page_id: PageId,
    pub title: String,
    pub cells: Vec<CellValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableProjection {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
}

/// Projects `rows` into a table with one column per schema property.
pub fn project_table(schema: &[PropertySchema], rows: &[Page]) -> TableProjection {
    let mut columns = Vec::with_capacity(schema.len() + 2);
    columns.push(TableColumn::Name);
    columns.extend(schema.iter().map(|property| TableColumn::Property {
        property_id: property.id.clone(),
        name: property.name.clone(),
        property_type: property.kind,
    }));
    columns.push(TableColumn::AddColumn);

    let rows = rows
        .iter()
        .map(|row| TableRow {
            page_id: row.id.clone(),
            title: row.title.clone(),
            cells: schema
                .iter()
                .map(|property| {
                    let raw = row
                        .properties
                        .as_ref()
                        .and_then(|values| values.get(&property.id));
                    interpret_value(property, raw)
                })
                .collect(),
        })
        .collect();

    TableProjection { columns, rows }
}
