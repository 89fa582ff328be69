//! Anonymous read of published pages.

use axum::extract::{Path, State};
use axum::Json;
use lumina_core::Page;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/public/pages/{id}
///
/// 403 for private or trashed pages, 404 for unknown ids.
pub async fn get_public_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Page>>> {
    let page = state
        .run(move |store| store.read_pages(|pages| pages.get_public_page(&id)))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}
