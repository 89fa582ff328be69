pub mod health;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /pages                           list tree, create
/// /pages/export                    full documents of active pages
/// /pages/{id}                      get, update, move to trash
/// /pages/{id}/restore              take out of trash (POST)
/// /pages/{id}/permanent            purge a trashed page (DELETE)
/// /pages/{id}/blocks               apply one block operation (POST)
///
/// /databases/{id}/rows             list, create rows
/// /databases/{id}/schema           apply one schema operation (POST)
/// /databases/{id}/views/{view_id}  table or board projection
///
/// /trash                           trashed page metadata
/// /search?q=                       title search
/// /bulk-import                     import exported pages (POST)
/// /workspace                       get, update settings
/// /public/pages/{id}               anonymous read of a public page
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pages",
            get(handlers::pages::list_pages).post(handlers::pages::create_page),
        )
        .route("/pages/export", get(handlers::backup::export_pages))
        .route(
            "/pages/{id}",
            get(handlers::pages::get_page)
                .put(handlers::pages::update_page)
                .delete(handlers::pages::delete_page),
        )
        .route("/pages/{id}/restore", post(handlers::trash::restore))
        .route("/pages/{id}/permanent", delete(handlers::trash::purge))
        .route(
            "/pages/{id}/blocks",
            post(handlers::pages::apply_block_operation),
        )
        .route(
            "/databases/{id}/rows",
            get(handlers::databases::list_rows).post(handlers::databases::create_row),
        )
        .route(
            "/databases/{id}/schema",
            post(handlers::databases::apply_schema_operation),
        )
        .route(
            "/databases/{id}/views/{view_id}",
            get(handlers::databases::project_view),
        )
        .route("/trash", get(handlers::trash::list_trash))
        .route("/search", get(handlers::pages::search))
        .route("/bulk-import", post(handlers::backup::bulk_import))
        .route(
            "/workspace",
            get(handlers::workspace::get_workspace).put(handlers::workspace::update_workspace),
        )
        .route(
            "/public/pages/{id}",
            get(handlers::public::get_public_page),
        )
}
