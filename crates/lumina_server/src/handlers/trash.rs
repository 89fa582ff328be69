//! Handlers for trash listing and trash-state transitions.

use axum::extract::{Path, State};
use axum::Json;
use lumina_core::{Page, QueryKey};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/trash
pub async fn list_trash(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Value>>> {
    let trash = state
        .run(|store| store.cached_read(QueryKey::Trash, |pages| pages.list_trash()))
        .await?;
    Ok(Json(ApiResponse::ok(trash)))
}

/// POST /api/pages/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Page>>> {
    let page = state
        .run(move |store| store.write_pages(|pages| pages.restore(&id)))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// DELETE /api/pages/{id}/permanent
///
/// Returns 409 unless the page is already in the trash.
pub async fn purge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let purged_id = id.clone();
    state
        .run(move |store| store.write_pages(|pages| pages.purge(&id)))
        .await?;
    Ok(Json(ApiResponse::ok(json!({ "id": purged_id, "purged": true }))))
}
