//! Handlers for the `/pages` resource and title search.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lumina_core::{BlockOperation, NewPage, Page, PagePatch, PageMetadata, QueryKey};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for the search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive title fragment. Empty or absent lists every page.
    #[serde(default)]
    pub q: String,
}

/// GET /api/pages
///
/// Page tree metadata, trashed pages excluded.
pub async fn list_pages(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Value>>> {
    let tree = state
        .run(|store| store.cached_read(QueryKey::PageTree, |pages| pages.list_tree()))
        .await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// GET /api/pages/{id}
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let page = state
        .run(move |store| store.cached_read(QueryKey::Page(id.clone()), |pages| pages.get_page(&id)))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/pages
pub async fn create_page(
    State(state): State<AppState>,
    payload: Result<Json<NewPage>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Page>>)> {
    let Json(new) = payload?;
    let page = state
        .run(move |store| store.write_pages(|pages| pages.create_page(new)))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(page))))
}

/// PUT /api/pages/{id}
///
/// Shallow merge of the present keys; `blocks` replaces the whole sequence.
pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PagePatch>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Page>>> {
    let Json(patch) = payload?;
    let page = state
        .run(move |store| store.write_pages(|pages| pages.update_page(&id, patch)))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// DELETE /api/pages/{id}
///
/// Moves the page to the trash.
pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let deleted_id = id.clone();
    state
        .run(move |store| store.write_pages(|pages| pages.soft_delete(&id)))
        .await?;
    Ok(Json(ApiResponse::ok(json!({ "id": deleted_id, "deleted": true }))))
}

/// POST /api/pages/{id}/blocks
///
/// Applies one editor operation to the stored block sequence.
pub async fn apply_block_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BlockOperation>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Page>>> {
    let Json(operation) = payload?;
    let page = state
        .run(move |store| store.write_pages(|pages| pages.apply_block_operation(&id, operation)))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<PageMetadata>>>> {
    let hits = state
        .run(move |store| store.read_pages(|pages| pages.search(&params.q)))
        .await?;
    Ok(Json(ApiResponse::ok(hits)))
}
