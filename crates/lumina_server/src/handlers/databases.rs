//! Handlers for database rows, schema edits and view projections.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lumina_core::{NewRow, Page, QueryKey, SchemaOperation, ViewProjection};
use serde_json::Value;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/databases/{id}/rows
pub async fn list_rows(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let rows = state
        .run(move |store| {
            store.cached_read(QueryKey::DatabaseRows(id.clone()), |pages| pages.list_rows(&id))
        })
        .await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// POST /api/databases/{id}/rows
///
/// Creates one row; a board `column` pre-populates the grouping property.
pub async fn create_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewRow>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Page>>)> {
    let Json(row) = payload?;
    let page = state
        .run(move |store| store.write_pages(|pages| pages.create_row(&id, row)))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(page))))
}

/// POST /api/databases/{id}/schema
///
/// Applies one schema operation and returns the updated database page.
pub async fn apply_schema_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SchemaOperation>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Page>>> {
    let Json(operation) = payload?;
    let page = state
        .run(move |store| store.write_pages(|pages| pages.apply_schema_operation(&id, operation)))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/databases/{id}/views/{view_id}
pub async fn project_view(
    State(state): State<AppState>,
    Path((id, view_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<ViewProjection>>> {
    let projection = state
        .run(move |store| store.read_pages(|pages| pages.project_view(&id, &view_id)))
        .await?;
    Ok(Json(ApiResponse::ok(projection)))
}
