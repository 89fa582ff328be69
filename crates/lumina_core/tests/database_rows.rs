use lumina_core::db::open_db_in_memory;
use lumina_core::model::page::RowProperties;
use lumina_core::schema::interpret_value;
use lumina_core::view::{BoardColumnKey, NO_STATUS_LABEL};
use lumina_core::{
    BoardProjection, CellValue, NewPage, NewRow, Page, PageKind, PageService, PageServiceError,
    PropertyType, SchemaOperation, SqlitePageRepository, ViewError, ViewKind, ViewProjection,
};
use rusqlite::Connection;
use serde_json::json;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn service(conn: &Connection) -> PageService<SqlitePageRepository<'_>> {
    PageService::new(SqlitePageRepository::try_new(conn).unwrap())
}

fn create_database(service: &PageService<SqlitePageRepository<'_>>) -> Page {
    service
        .create_page(NewPage {
            title: Some("Tasks".to_string()),
            kind: Some(PageKind::Database),
            ..NewPage::default()
        })
        .unwrap()
}

fn add_option(
    service: &PageService<SqlitePageRepository<'_>>,
    database_id: &str,
    property_id: &str,
    label: &str,
) -> String {
    let database = service
        .apply_schema_operation(
            database_id,
            SchemaOperation::AddOption {
                property_id: property_id.to_string(),
                label: label.to_string(),
            },
        )
        .unwrap();
    let property = database
        .schema()
        .iter()
        .find(|p| p.id == property_id)
        .unwrap();
    property.options().last().unwrap().id.clone()
}

#[test]
fn database_gets_default_schema_and_table_view() {
    let conn = setup();
    let service = service(&conn);
    let database = create_database(&service);

    let schema = database.schema();
    assert_eq!(schema.len(), 1);
    assert_eq!(schema[0].name, "Status");
    assert_eq!(schema[0].kind, PropertyType::Select);
    assert!(schema[0].options().is_empty());

    let views = database.views.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].kind, ViewKind::Table);
    assert_eq!(database.blocks.len(), 1);
}

#[test]
fn board_groups_rows_by_status_with_no_status_column() {
    let conn = setup();
    let service = service(&conn);
    let database = create_database(&service);
    let status_id = database.schema()[0].id.clone();
    let a = add_option(&service, &database.id, &status_id, "A");
    let b = add_option(&service, &database.id, &status_id, "B");

    let r1 = service
        .create_row(
            &database.id,
            NewRow {
                title: Some("r1".to_string()),
                column: Some(BoardColumnKey::Option(a)),
                properties: None,
            },
        )
        .unwrap();
    let r2 = service
        .create_row(
            &database.id,
            NewRow {
                title: Some("r2".to_string()),
                column: Some(BoardColumnKey::Option(b.clone())),
                properties: None,
            },
        )
        .unwrap();
    let r3 = service
        .create_row(
            &database.id,
            NewRow {
                title: Some("r3".to_string()),
                column: Some(BoardColumnKey::NoStatus),
                properties: None,
            },
        )
        .unwrap();

    assert_eq!(r2.properties.as_ref().unwrap()[&status_id], json!(b));
    assert!(r3.properties.as_ref().unwrap().is_empty());

    let database = service
        .apply_schema_operation(
            &database.id,
            serde_json::from_value(json!({"op": "addProperty"})).unwrap(),
        )
        .unwrap();
    let mut board_view = database.views.clone().unwrap()[0].clone();
    board_view.kind = ViewKind::Board;
    let database = service
        .update_page(
            &database.id,
            lumina_core::PagePatch {
                views: Some(vec![board_view.clone()]),
                ..lumina_core::PagePatch::default()
            },
        )
        .unwrap();

    let projection = service.project_view(&database.id, &board_view.id).unwrap();
    let ViewProjection::Board(BoardProjection::Grouped {
        group_property_id,
        columns,
    }) = projection
    else {
        panic!("expected grouped board");
    };
    assert_eq!(group_property_id, status_id);
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].cards[0].page_id, r1.id);
    assert_eq!(columns[1].cards[0].page_id, r2.id);
    assert_eq!(columns[2].label, NO_STATUS_LABEL);
    assert_eq!(columns[2].cards[0].page_id, r3.id);
}

#[test]
fn deleting_last_property_keeps_rows_and_their_values() {
    let conn = setup();
    let service = service(&conn);
    let database = create_database(&service);
    let status_id = database.schema()[0].id.clone();
    let done = add_option(&service, &database.id, &status_id, "Done");

    service
        .create_row(
            &database.id,
            NewRow {
                title: Some("row".to_string()),
                column: None,
                properties: Some(RowProperties::from([(
                    status_id.clone(),
                    json!(done.clone()),
                )])),
            },
        )
        .unwrap();

    let database = service
        .apply_schema_operation(
            &database.id,
            SchemaOperation::DeleteProperty {
                property_id: status_id.clone(),
            },
        )
        .unwrap();
    assert!(database.schema().is_empty());

    let rows = service.list_rows(&database.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].properties.as_ref().unwrap()[&status_id], json!(done));

    let table_view = database.views.as_ref().unwrap()[0].id.clone();
    match service.project_view(&database.id, &table_view).unwrap() {
        ViewProjection::Table(table) => {
            assert_eq!(table.rows.len(), 1);
            assert!(table.rows[0].cells.is_empty());
        }
        other => panic!("expected table projection, got {other:?}"),
    }
}

#[test]
fn type_change_leaves_stale_values_reading_as_empty() {
    let conn = setup();
    let service = service(&conn);
    let database = create_database(&service);
    let status_id = database.schema()[0].id.clone();
    let done = add_option(&service, &database.id, &status_id, "Done");
    service
        .create_row(
            &database.id,
            NewRow {
                column: Some(BoardColumnKey::Option(done.clone())),
                ..NewRow::default()
            },
        )
        .unwrap();

    let database = service
        .apply_schema_operation(
            &database.id,
            serde_json::from_value(json!({
                "op": "updateProperty",
                "propertyId": status_id.clone(),
                "patch": {"type": "checkbox"}
            }))
            .unwrap(),
        )
        .unwrap();

    let rows = service.list_rows(&database.id).unwrap();
    let raw = rows[0].properties.as_ref().unwrap().get(&status_id);
    assert_eq!(raw, Some(&json!(done)));
    assert_eq!(
        interpret_value(&database.schema()[0], raw),
        CellValue::Empty
    );
}

#[test]
fn rows_exclude_trashed_children() {
    let conn = setup();
    let service = service(&conn);
    let database = create_database(&service);
    let keep = service.create_row(&database.id, NewRow::default()).unwrap();
    let trashed = service.create_row(&database.id, NewRow::default()).unwrap();
    service.soft_delete(&trashed.id).unwrap();

    let rows = service.list_rows(&database.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, keep.id);
}

#[test]
fn row_operations_require_a_database() {
    let conn = setup();
    let service = service(&conn);
    let page = service.create_page(NewPage::default()).unwrap();

    assert!(matches!(
        service.list_rows(&page.id),
        Err(PageServiceError::NotADatabase(_))
    ));
    assert!(matches!(
        service.create_row(&page.id, NewRow::default()),
        Err(PageServiceError::NotADatabase(_))
    ));
}

#[test]
fn unsupported_and_missing_views_are_reported() {
    let conn = setup();
    let service = service(&conn);
    let database = create_database(&service);
    let mut views = database.views.clone().unwrap();
    views[0].kind = ViewKind::Gallery;
    let gallery_id = views[0].id.clone();
    service
        .update_page(
            &database.id,
            lumina_core::PagePatch {
                views: Some(views),
                ..lumina_core::PagePatch::default()
            },
        )
        .unwrap();

    assert!(matches!(
        service.project_view(&database.id, &gallery_id),
        Err(PageServiceError::View(ViewError::Unsupported(ViewKind::Gallery)))
    ));
    assert!(matches!(
        service.project_view(&database.id, "nope"),
        Err(PageServiceError::ViewNotFound { .. })
    ));
}
