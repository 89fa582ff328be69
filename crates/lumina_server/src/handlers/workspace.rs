//! Handlers for the singleton workspace settings.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use lumina_core::{Workspace, WorkspacePatch};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/workspace
pub async fn get_workspace(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Workspace>>> {
    let workspace = state.run(|store| store.workspace()).await?;
    Ok(Json(ApiResponse::ok(workspace)))
}

/// PUT /api/workspace
///
/// Merges top-level keys; `preferences`, `privacy` and `notifications`
/// merge their own keys.
pub async fn update_workspace(
    State(state): State<AppState>,
    payload: Result<Json<WorkspacePatch>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Workspace>>> {
    let Json(patch) = payload?;
    let workspace = state
        .run(move |store| store.update_workspace(&patch))
        .await?;
    Ok(Json(ApiResponse::ok(workspace)))
}
