//! Shared handler state and the cached page store.
//!
//! # Invariants
//! - Every mutation drops the cached reads it can affect before returning,
//!   whether it succeeded or not.
//! - SQLite work runs on the blocking pool, one job at a time.

use std::sync::{Arc, Mutex};

use lumina_core::service::PageServiceResult;
use lumina_core::{
    PageService, QueryCache, QueryKey, SqlitePageRepository, SqliteWorkspaceRepository,
    Workspace, WorkspacePatch, WorkspaceService,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Cache prefixes touched by any page mutation.
const PAGE_CACHE_PREFIXES: [&str; 3] = ["pages", "trash", "databases"];

/// SQLite connection plus the read cache in front of it.
pub struct Store {
    conn: Connection,
    cache: QueryCache<Value>,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            cache: QueryCache::new(),
        }
    }

    /// Runs a page read through the cache under `key`.
    pub fn cached_read<T: Serialize>(
        &mut self,
        key: QueryKey,
        load: impl FnOnce(&PageService<SqlitePageRepository<'_>>) -> PageServiceResult<T>,
    ) -> AppResult<Value> {
        let conn = &self.conn;
        self.cache.get_or_try_insert_with(key, || -> AppResult<Value> {
            let pages = PageService::new(SqlitePageRepository::try_new(conn)?);
            Ok(serde_json::to_value(load(&pages)?)?)
        })
    }

    /// Runs an uncached page read.
    pub fn read_pages<T>(
        &self,
        read: impl FnOnce(&PageService<SqlitePageRepository<'_>>) -> PageServiceResult<T>,
    ) -> AppResult<T> {
        let pages = PageService::new(SqlitePageRepository::try_new(&self.conn)?);
        Ok(read(&pages)?)
    }

    /// Runs a page mutation, then drops every cached page read.
    pub fn write_pages<T>(
        &mut self,
        write: impl FnOnce(&PageService<SqlitePageRepository<'_>>) -> PageServiceResult<T>,
    ) -> AppResult<T> {
        let public_by_default = self.workspace()?.privacy.public_by_default;
        let pages = PageService::new(SqlitePageRepository::try_new(&self.conn)?)
            .with_public_by_default(public_by_default);
        let result = write(&pages);
        for prefix in PAGE_CACHE_PREFIXES {
            self.cache.invalidate_prefix(prefix);
        }
        Ok(result?)
    }

    /// Cached workspace settings.
    pub fn workspace(&mut self) -> AppResult<Workspace> {
        let conn = &self.conn;
        let value = self
            .cache
            .get_or_try_insert_with(QueryKey::Workspace, || -> AppResult<Value> {
                let workspace = workspace_service(conn)?.get_workspace()?;
                Ok(serde_json::to_value(workspace)?)
            })?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn update_workspace(&mut self, patch: &WorkspacePatch) -> AppResult<Workspace> {
        let result = workspace_service(&self.conn)?.update_workspace(patch);
        self.cache.invalidate(&QueryKey::Workspace);
        Ok(result?)
    }

    /// Creates the welcome page when the store is empty.
    pub fn seed(&mut self) -> AppResult<bool> {
        self.write_pages(|pages| pages.ensure_seed())
    }

    /// Cheap liveness check against SQLite.
    pub fn ping(&self) -> bool {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }
}

fn workspace_service(
    conn: &Connection,
) -> AppResult<WorkspaceService<SqliteWorkspaceRepository<'_>>> {
    Ok(WorkspaceService::new(SqliteWorkspaceRepository::try_new(
        conn,
    )?))
}

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; the store sits behind an `Arc<Mutex<_>>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(conn: Connection, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::new(conn))),
            config: Arc::new(config),
        }
    }

    /// Runs `job` against the store on the blocking thread pool.
    pub async fn run<T, F>(&self, job: F) -> AppResult<T>
    where
        F: FnOnce(&mut Store) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut store = store
                .lock()
                .map_err(|_| AppError::Internal("store lock poisoned".to_string()))?;
            job(&mut store)
        })
        .await
        .map_err(|err| AppError::Internal(format!("store task failed: {err}")))?
    }
}
