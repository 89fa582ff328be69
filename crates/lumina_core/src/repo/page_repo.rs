//! Page repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store whole page documents (one row per page) in the `pages` table.
//! - Keep JSON column encoding and SQL details inside the repository.
//!
//! # Invariants
//! - Listing order is insertion order (`rowid ASC`); upserts keep it.
//! - Trash membership is `deleted_at IS NOT NULL`, nothing else.
//! - `parent_id` is stored as-is; tree validation belongs to the service.

use crate::model::block::Block;
use crate::model::page::{Page, PageId, PageKind, RowProperties};
use crate::model::property::PropertySchema;
use crate::model::view::DatabaseView;
use crate::repo::{bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;

const PAGE_SELECT_SQL: &str = "SELECT
    id,
    kind,
    title,
    icon,
    cover,
    parent_id,
    blocks_json,
    schema_json,
    views_json,
    properties_json,
    is_public,
    created_at,
    updated_at,
    deleted_at
FROM pages";

const PAGE_COLUMNS: &[&str] = &[
    "id",
    "kind",
    "title",
    "icon",
    "cover",
    "parent_id",
    "blocks_json",
    "schema_json",
    "views_json",
    "properties_json",
    "is_public",
    "created_at",
    "updated_at",
    "deleted_at",
];

/// Trash-state filter for page listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageState {
    #[default]
    Active,
    Trashed,
    Any,
}

/// Query options for listing pages.
#[derive(Debug, Clone, Default)]
pub struct PageListQuery {
    pub state: PageState,
    /// Restricts the listing to direct children of this page.
    pub parent_id: Option<PageId>,
}

impl PageListQuery {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn trashed() -> Self {
        Self {
            state: PageState::Trashed,
            parent_id: None,
        }
    }

    pub fn active_children_of(parent_id: impl Into<PageId>) -> Self {
        Self {
            state: PageState::Active,
            parent_id: Some(parent_id.into()),
        }
    }
}

/// Repository interface for page document storage.
pub trait PageRepository {
    /// Inserts a new page; fails with `AlreadyExists` when the id is taken.
    fn insert_page(&self, page: &Page) -> RepoResult<()>;
    /// Inserts or fully replaces a page document.
    fn upsert_page(&self, page: &Page) -> RepoResult<()>;
    /// Fully replaces an existing page document.
    fn update_page(&self, page: &Page) -> RepoResult<()>;
    fn get_page(&self, id: &str, include_deleted: bool) -> RepoResult<Option<Page>>;
    fn list_pages(&self, query: &PageListQuery) -> RepoResult<Vec<Page>>;
    /// Sets or clears the trash tombstone.
    fn set_deleted_at(&self, id: &str, deleted_at: Option<i64>, updated_at: i64)
        -> RepoResult<()>;
    /// Removes the page record entirely.
    fn purge_page(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed page repository.
pub struct SqlitePageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePageRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "pages", PAGE_COLUMNS)?;
        Ok(Self { conn })
    }

    fn exists(&self, id: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM pages WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl PageRepository for SqlitePageRepository<'_> {
    fn insert_page(&self, page: &Page) -> RepoResult<()> {
        if self.exists(&page.id)? {
            return Err(RepoError::AlreadyExists(page.id.clone()));
        }
        let row = EncodedPage::encode(page)?;
        self.conn.execute(
            "INSERT INTO pages (
                id, kind, title, icon, cover, parent_id,
                blocks_json, schema_json, views_json, properties_json,
                is_public, created_at, updated_at, deleted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            params![
                page.id.as_str(),
                page.kind.as_str(),
                page.title.as_str(),
                page.icon.as_deref(),
                page.cover.as_deref(),
                page.parent_id.as_deref(),
                row.blocks_json,
                row.schema_json,
                row.views_json,
                row.properties_json,
                bool_to_int(page.is_public),
                page.created_at,
                page.updated_at,
                page.deleted_at,
            ],
        )?;
        Ok(())
    }

    fn upsert_page(&self, page: &Page) -> RepoResult<()> {
        let row = EncodedPage::encode(page)?;
        self.conn.execute(
            "INSERT INTO pages (
                id, kind, title, icon, cover, parent_id,
                blocks_json, schema_json, views_json, properties_json,
                is_public, created_at, updated_at, deleted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(id) DO UPDATE SET
                kind = excluded.kind,
                title = excluded.title,
                icon = excluded.icon,
                cover = excluded.cover,
                parent_id = excluded.parent_id,
                blocks_json = excluded.blocks_json,
                schema_json = excluded.schema_json,
                views_json = excluded.views_json,
                properties_json = excluded.properties_json,
                is_public = excluded.is_public,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                deleted_at = excluded.deleted_at;",
            params![
                page.id.as_str(),
                page.kind.as_str(),
                page.title.as_str(),
                page.icon.as_deref(),
                page.cover.as_deref(),
                page.parent_id.as_deref(),
                row.blocks_json,
                row.schema_json,
                row.views_json,
                row.properties_json,
                bool_to_int(page.is_public),
                page.created_at,
                page.updated_at,
                page.deleted_at,
            ],
        )?;
        Ok(())
    }

    fn update_page(&self, page: &Page) -> RepoResult<()> {
        let row = EncodedPage::encode(page)?;
        let changed = self.conn.execute(
            "UPDATE pages
             SET
                kind = ?1,
                title = ?2,
                icon = ?3,
                cover = ?4,
                parent_id = ?5,
                blocks_json = ?6,
                schema_json = ?7,
                views_json = ?8,
                properties_json = ?9,
                is_public = ?10,
                updated_at = ?11,
                deleted_at = ?12
             WHERE id = ?13;",
            params![
                page.kind.as_str(),
                page.title.as_str(),
                page.icon.as_deref(),
                page.cover.as_deref(),
                page.parent_id.as_deref(),
                row.blocks_json,
                row.schema_json,
                row.views_json,
                row.properties_json,
                bool_to_int(page.is_public),
                page.updated_at,
                page.deleted_at,
                page.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(page.id.clone()));
        }
        Ok(())
    }

    fn get_page(&self, id: &str, include_deleted: bool) -> RepoResult<Option<Page>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PAGE_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR deleted_at IS NULL);"
        ))?;

        let mut rows = stmt.query(params![id, bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_page_row(row)?));
        }

        Ok(None)
    }

    fn list_pages(&self, query: &PageListQuery) -> RepoResult<Vec<Page>> {
        let mut sql = format!("{PAGE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        match query.state {
            PageState::Active => sql.push_str(" AND deleted_at IS NULL"),
            PageState::Trashed => sql.push_str(" AND deleted_at IS NOT NULL"),
            PageState::Any => {}
        }

        if let Some(parent_id) = &query.parent_id {
            sql.push_str(" AND parent_id = ?");
            bind_values.push(Value::Text(parent_id.clone()));
        }

        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pages = Vec::new();
        while let Some(row) = rows.next()? {
            pages.push(parse_page_row(row)?);
        }

        Ok(pages)
    }

    fn set_deleted_at(
        &self,
        id: &str,
        deleted_at: Option<i64>,
        updated_at: i64,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pages
             SET
                deleted_at = ?1,
                updated_at = ?2
             WHERE id = ?3;",
            params![deleted_at, updated_at, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn purge_page(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM pages WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// JSON text columns of one page row.
struct EncodedPage {
    blocks_json: String,
    schema_json: Option<String>,
    views_json: Option<String>,
    properties_json: Option<String>,
}

impl EncodedPage {
    fn encode(page: &Page) -> RepoResult<Self> {
        Ok(Self {
            blocks_json: encode_json(&page.blocks, "blocks_json")?,
            schema_json: page
                .properties_schema
                .as_ref()
                .map(|schema| encode_json(schema, "schema_json"))
                .transpose()?,
            views_json: page
                .views
                .as_ref()
                .map(|views| encode_json(views, "views_json"))
                .transpose()?,
            properties_json: page
                .properties
                .as_ref()
                .map(|properties| encode_json(properties, "properties_json"))
                .transpose()?,
        })
    }
}

fn encode_json<T: Serialize + ?Sized>(value: &T, column: &str) -> RepoResult<String> {
    serde_json::to_string(value)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode pages.{column}: {err}")))
}

fn decode_json<T: DeserializeOwned>(text: &str, column: &str) -> RepoResult<T> {
    serde_json::from_str(text)
        .map_err(|err| RepoError::InvalidData(format!("invalid json in pages.{column}: {err}")))
}

fn decode_optional_json<T: DeserializeOwned>(
    text: Option<String>,
    column: &str,
) -> RepoResult<Option<T>> {
    text.map(|text| decode_json(&text, column)).transpose()
}

fn parse_page_row(row: &Row<'_>) -> RepoResult<Page> {
    let kind_text: String = row.get("kind")?;
    let kind = parse_page_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid page kind `{kind_text}` in pages.kind"))
    })?;

    let blocks_text: String = row.get("blocks_json")?;
    let blocks: Vec<Block> = decode_json(&blocks_text, "blocks_json")?;
    let properties_schema: Option<Vec<PropertySchema>> =
        decode_optional_json(row.get("schema_json")?, "schema_json")?;
    let views: Option<Vec<DatabaseView>> =
        decode_optional_json(row.get("views_json")?, "views_json")?;
    let properties: Option<RowProperties> =
        decode_optional_json(row.get("properties_json")?, "properties_json")?;

    Ok(Page {
        id: row.get("id")?,
        kind,
        title: row.get("title")?,
        icon: row.get("icon")?,
        cover: row.get("cover")?,
        parent_id: row.get("parent_id")?,
        blocks,
        properties_schema,
        views,
        properties,
        is_public: int_to_bool(row.get("is_public")?, "pages.is_public")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deleted_at: row.get("deleted_at")?,
    })
}

fn parse_page_kind(value: &str) -> Option<PageKind> {
    match value {
        "page" => Some(PageKind::Page),
        "database" => Some(PageKind::Database),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{PageListQuery, PageRepository, SqlitePageRepository};
    use crate::db::open_db_in_memory;
    use crate::model::block::{Block, BlockKind};
    use crate::model::page::{Page, PageKind};
    use crate::repo::RepoError;

    fn page(id: &str, parent_id: Option<&str>) -> Page {
        Page {
            id: id.to_string(),
            kind: PageKind::Page,
            title: format!("Page {id}"),
            icon: None,
            cover: None,
            parent_id: parent_id.map(str::to_string),
            blocks: vec![Block::with_id("b1", BlockKind::Text, "hello")],
            properties_schema: None,
            views: None,
            properties: None,
            is_public: false,
            created_at: 10,
            updated_at: 10,
            deleted_at: None,
        }
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqlitePageRepository::try_new(&conn).unwrap();
        repo.insert_page(&page("a", None)).unwrap();

        let err = repo.insert_page(&page("a", None)).unwrap_err();
        assert!(matches!(err, RepoError::AlreadyExists(id) if id == "a"));
    }

    #[test]
    fn upsert_keeps_listing_position() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqlitePageRepository::try_new(&conn).unwrap();
        repo.insert_page(&page("a", None)).unwrap();
        repo.insert_page(&page("b", None)).unwrap();

        let mut replaced = page("a", None);
        replaced.title = "Replaced".to_string();
        repo.upsert_page(&replaced).unwrap();

        let pages = repo.list_pages(&PageListQuery::active()).unwrap();
        let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(pages[0].title, "Replaced");
    }

    #[test]
    fn children_listing_filters_parent_and_trash() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqlitePageRepository::try_new(&conn).unwrap();
        repo.insert_page(&page("db", None)).unwrap();
        repo.insert_page(&page("r1", Some("db"))).unwrap();
        repo.insert_page(&page("r2", Some("db"))).unwrap();
        repo.insert_page(&page("other", None)).unwrap();
        repo.set_deleted_at("r2", Some(20), 20).unwrap();

        let rows = repo
            .list_pages(&PageListQuery::active_children_of("db"))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "r1");

        let trashed = repo.list_pages(&PageListQuery::trashed()).unwrap();
        assert_eq!(trashed.len(), 1);
        assert_eq!(trashed[0].deleted_at, Some(20));
    }

    #[test]
    fn purge_missing_page_is_not_found() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqlitePageRepository::try_new(&conn).unwrap();
        assert!(matches!(
            repo.purge_page("ghost").unwrap_err(),
            RepoError::NotFound(id) if id == "ghost"
        ));
    }

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        assert!(matches!(
            SqlitePageRepository::try_new(&conn),
            Err(RepoError::UninitializedConnection { .. })
        ));
    }
}
