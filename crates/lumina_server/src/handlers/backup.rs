//! Export and bulk import of page documents.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use lumina_core::Page;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/pages/export
///
/// Full documents of every active page. Wrapped as `{ "pages": [...] }`
/// the array is accepted by bulk import.
pub async fn export_pages(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Page>>>> {
    let pages = state
        .run(|store| store.read_pages(|pages| pages.export_pages()))
        .await?;
    Ok(Json(ApiResponse::ok(pages)))
}

/// POST /api/bulk-import
///
/// Body `{ "pages": [...] }`. Items are written one by one; a malformed
/// item fails the request after earlier items were written.
pub async fn bulk_import(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let Json(body) = payload?;
    let imported = state
        .run(move |store| store.write_pages(|pages| pages.import_pages(&body)))
        .await?;
    Ok(Json(ApiResponse::ok(json!({ "imported": imported }))))
}
