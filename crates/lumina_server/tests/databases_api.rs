//! HTTP-level tests for database rows, schema edits and views.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_page, get, post_json, put_json};
use serde_json::{json, Value};

async fn add_option(app: &axum::Router, database_id: &str, property_id: &str, label: &str) -> String {
    let response = post_json(
        app,
        &format!("/api/databases/{database_id}/schema"),
        json!({ "op": "addOption", "propertyId": property_id, "label": label }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let options = json["data"]["propertiesSchema"][0]["options"]
        .as_array()
        .unwrap()
        .clone();
    options.last().unwrap()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn board_view_groups_rows_created_from_columns() {
    let app = build_test_app();
    let database = create_page(&app, json!({ "title": "Tasks", "type": "database" })).await;
    let database_id = database["id"].as_str().unwrap().to_string();
    let status_id = database["propertiesSchema"][0]["id"].as_str().unwrap().to_string();

    let todo = add_option(&app, &database_id, &status_id, "Todo").await;
    let done = add_option(&app, &database_id, &status_id, "Done").await;

    for (title, column) in [("a", json!(todo)), ("b", json!(done)), ("c", Value::Null)] {
        let response = post_json(
            &app,
            &format!("/api/databases/{database_id}/rows"),
            json!({ "title": title, "column": column }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let rows = body_json(get(&app, &format!("/api/databases/{database_id}/rows")).await).await;
    assert_eq!(rows["data"].as_array().unwrap().len(), 3);
    assert_eq!(rows["data"][1]["properties"][&status_id], done.as_str());

    let mut view = database["views"][0].clone();
    view["type"] = json!("board");
    let response = put_json(
        &app,
        &format!("/api/pages/{database_id}"),
        json!({ "views": [view.clone()] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let view_id = view["id"].as_str().unwrap();
    let json = body_json(
        get(&app, &format!("/api/databases/{database_id}/views/{view_id}")).await,
    )
    .await;
    let board = &json["data"];
    assert_eq!(board["type"], "board");
    assert_eq!(board["state"], "grouped");
    let columns = board["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0]["label"], "Todo");
    assert_eq!(columns[0]["cards"][0]["title"], "a");
    assert_eq!(columns[2]["label"], "No Status");
    assert_eq!(columns[2]["cards"][0]["title"], "c");
}

#[tokio::test]
async fn rows_of_a_plain_page_are_rejected() {
    let app = build_test_app();
    let page = create_page(&app, json!({ "title": "Notes" })).await;
    let response = get(
        &app,
        &format!("/api/databases/{}/rows", page["id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn new_row_appears_in_cached_row_listing() {
    let app = build_test_app();
    let database = create_page(&app, json!({ "type": "database" })).await;
    let uri = format!("/api/databases/{}/rows", database["id"].as_str().unwrap());

    let rows = body_json(get(&app, &uri).await).await;
    assert!(rows["data"].as_array().unwrap().is_empty());

    post_json(&app, &uri, json!({ "title": "first" })).await;

    let rows = body_json(get(&app, &uri).await).await;
    assert_eq!(rows["data"][0]["title"], "first");
}

#[tokio::test]
async fn unknown_view_is_404() {
    let app = build_test_app();
    let database = create_page(&app, json!({ "type": "database" })).await;
    let response = get(
        &app,
        &format!(
            "/api/databases/{}/views/missing",
            database["id"].as_str().unwrap()
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
