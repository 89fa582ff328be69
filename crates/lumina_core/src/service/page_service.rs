//! Page use-case service.
//!
//! # Responsibility
//! - Fill creation defaults and apply partial updates to page documents.
//! - Enforce tree and trash rules above the repository layer.
//! - Run block, schema and view logic against stored pages.
//! - Export and import whole page documents.
//!
//! # Invariants
//! - Tree, search, row and export listings never include trashed pages.
//! - A re-parent never makes a page its own ancestor.
//! - A stored page always keeps at least one block.
//! - Trash transitions do not cascade to child pages.
//! - Updates merge present keys only; the last write wins per field.

use crate::editor::{BlockEditor, BlockOperation, EditorError};
use crate::model::block::{Block, BlockKind, BlockMetadata};
use crate::model::page::{
    default_blocks, default_database_schema, default_database_views, now_epoch_ms, NewPage,
    Page, PageId, PageKind, PageMetadata, PagePatch, RowProperties, DEFAULT_PAGE_TITLE,
};
use crate::repo::{PageListQuery, PageRepository, PageState, RepoError};
use crate::schema::{SchemaEditor, SchemaError, SchemaOperation};
use crate::view::{group_property, project_view, BoardColumnKey, ViewError, ViewProjection};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Id of the page created in an empty store.
pub const WELCOME_PAGE_ID: &str = "welcome-home";

/// Errors from page service operations.
#[derive(Debug)]
pub enum PageServiceError {
    PageNotFound(PageId),
    /// Target page is in the trash; only trash operations apply.
    PageTrashed(PageId),
    PageAlreadyExists(PageId),
    ParentNotFound(PageId),
    /// Re-parent would make the page its own ancestor.
    CycleDetected {
        page_id: PageId,
        parent_id: PageId,
    },
    /// A block update would leave the page without blocks.
    EmptyBlocks,
    /// Permanent delete requires the page to be in the trash first.
    NotInTrash(PageId),
    NotADatabase(PageId),
    ViewNotFound {
        database_id: PageId,
        view_id: String,
    },
    /// Public read of a private or trashed page.
    NotPublic(PageId),
    /// Bulk import payload is malformed.
    InvalidImport(String),
    Editor(EditorError),
    Schema(SchemaError),
    View(ViewError),
    Repo(RepoError),
}

impl Display for PageServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::PageTrashed(id) => write!(f, "page is in the trash: {id}"),
            Self::PageAlreadyExists(id) => write!(f, "page already exists: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent page not found: {id}"),
            Self::CycleDetected { page_id, parent_id } => write!(
                f,
                "moving page {page_id} under {parent_id} would create a cycle"
            ),
            Self::EmptyBlocks => write!(f, "a page must keep at least one block"),
            Self::NotInTrash(id) => write!(f, "page is not in the trash: {id}"),
            Self::NotADatabase(id) => write!(f, "page is not a database: {id}"),
            Self::ViewNotFound {
                database_id,
                view_id,
            } => write!(f, "view {view_id} not found on database {database_id}"),
            Self::NotPublic(id) => write!(f, "page is not public: {id}"),
            Self::InvalidImport(message) => write!(f, "invalid import payload: {message}"),
            Self::Editor(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::View(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PageServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Editor(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::View(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PageServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PageNotFound(id),
            RepoError::AlreadyExists(id) => Self::PageAlreadyExists(id),
            other => Self::Repo(other),
        }
    }
}

impl From<EditorError> for PageServiceError {
    fn from(value: EditorError) -> Self {
        Self::Editor(value)
    }
}

impl From<SchemaError> for PageServiceError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<ViewError> for PageServiceError {
    fn from(value: ViewError) -> Self {
        Self::View(value)
    }
}

pub type PageServiceResult<T> = Result<T, PageServiceError>;

/// Request to create one row under a database page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRow {
    #[serde(default)]
    pub title: Option<String>,
    /// Board column the row is created from; pre-populates the grouping
    /// property. Ignored when the database has no `select` property.
    #[serde(default)]
    pub column: Option<BoardColumnKey>,
    #[serde(default)]
    pub properties: Option<RowProperties>,
}

/// Page service facade.
pub struct PageService<R: PageRepository> {
    repo: R,
    public_by_default: bool,
}

impl<R: PageRepository> PageService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            public_by_default: false,
        }
    }

    /// Makes pages created without an explicit `isPublic` start public.
    pub fn with_public_by_default(mut self, public_by_default: bool) -> Self {
        self.public_by_default = public_by_default;
        self
    }

    /// Creates one page, filling every omitted field with its default.
    pub fn create_page(&self, new: NewPage) -> PageServiceResult<Page> {
        if let Some(parent_id) = new.parent_id.as_deref() {
            self.ensure_parent_exists(parent_id)?;
        }

        let now = now_epoch_ms();
        let kind = new.kind.unwrap_or_default();
        let is_database = kind == PageKind::Database;
        let page = Page {
            id: new.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            kind,
            title: new
                .title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string()),
            icon: new.icon,
            cover: new.cover,
            parent_id: new.parent_id,
            blocks: new
                .blocks
                .filter(|blocks| !blocks.is_empty())
                .unwrap_or_else(default_blocks),
            properties_schema: new
                .properties_schema
                .or_else(|| is_database.then(default_database_schema)),
            views: new
                .views
                .or_else(|| is_database.then(default_database_views)),
            properties: new.properties,
            is_public: new.is_public.unwrap_or(self.public_by_default),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.repo.insert_page(&page)?;
        info!(
            "event=page_create module=service status=ok page_id={} kind={} has_parent={}",
            page.id,
            page.kind.as_str(),
            page.parent_id.is_some()
        );
        Ok(page)
    }

    /// Loads one active page.
    pub fn get_page(&self, id: &str) -> PageServiceResult<Page> {
        let page = self.load_any(id)?;
        if page.is_trashed() {
            return Err(PageServiceError::PageTrashed(page.id));
        }
        Ok(page)
    }

    /// Shallow-merges `patch` into an active page.
    pub fn update_page(&self, id: &str, patch: PagePatch) -> PageServiceResult<Page> {
        let mut page = self.get_page(id)?;

        if patch.blocks.as_ref().is_some_and(Vec::is_empty) {
            return Err(PageServiceError::EmptyBlocks);
        }
        if let Some(Some(parent_id)) = patch.parent_change() {
            self.ensure_parent_allowed(id, parent_id)?;
        }

        patch.apply(&mut page);
        page.updated_at = now_epoch_ms();
        self.repo.update_page(&page)?;
        Ok(page)
    }

    /// Runs one editor operation against the stored blocks of an active page.
    pub fn apply_block_operation(
        &self,
        id: &str,
        operation: BlockOperation,
    ) -> PageServiceResult<Page> {
        let mut page = self.get_page(id)?;
        let mut editor = BlockEditor::new(std::mem::take(&mut page.blocks));
        editor.apply(operation)?;
        page.blocks = editor.into_blocks();
        page.updated_at = now_epoch_ms();
        self.repo.update_page(&page)?;
        Ok(page)
    }

    /// Runs one schema operation against an active database page.
    ///
    /// Row values are never rewritten.
    pub fn apply_schema_operation(
        &self,
        database_id: &str,
        operation: SchemaOperation,
    ) -> PageServiceResult<Page> {
        let mut database = self.get_database(database_id)?;
        let mut editor = SchemaEditor::new(database.properties_schema.take().unwrap_or_default());
        editor.apply(operation)?;
        database.properties_schema = Some(editor.into_properties());

        database.updated_at = now_epoch_ms();
        self.repo.update_page(&database)?;
        Ok(database)
    }

    /// Active pages as tree metadata, in list order.
    pub fn list_tree(&self) -> PageServiceResult<Vec<PageMetadata>> {
        let pages = self.repo.list_pages(&PageListQuery::active())?;
        Ok(pages.iter().map(Page::metadata).collect())
    }

    /// Trashed pages as metadata, each carrying `deletedAt`.
    pub fn list_trash(&self) -> PageServiceResult<Vec<PageMetadata>> {
        let pages = self.repo.list_pages(&PageListQuery::trashed())?;
        Ok(pages.iter().map(Page::metadata).collect())
    }

    /// Active pages whose title contains `query`, case-insensitively.
    pub fn search(&self, query: &str) -> PageServiceResult<Vec<PageMetadata>> {
        let needle = query.trim().to_lowercase();
        let pages = self.repo.list_pages(&PageListQuery::active())?;
        Ok(pages
            .iter()
            .filter(|page| needle.is_empty() || page.title.to_lowercase().contains(&needle))
            .map(Page::metadata)
            .collect())
    }

    /// Active child pages (rows) of an active database page.
    pub fn list_rows(&self, database_id: &str) -> PageServiceResult<Vec<Page>> {
        let database = self.get_database(database_id)?;
        self.active_rows(&database.id)
    }

    /// Creates one row under a database page.
    ///
    /// Explicit `properties` are written first; a board column then sets the
    /// grouping property.
    pub fn create_row(&self, database_id: &str, row: NewRow) -> PageServiceResult<Page> {
        let database = self.get_database(database_id)?;

        let mut properties = row.properties.unwrap_or_default();
        if let (Some(column), Some(group)) = (&row.column, group_property(database.schema())) {
            properties.extend(column.initial_properties(&group.id));
        }

        self.create_page(NewPage {
            title: row.title,
            parent_id: Some(database.id),
            properties: Some(properties),
            ..NewPage::default()
        })
    }

    /// Projects the rows of a database through one of its views.
    pub fn project_view(
        &self,
        database_id: &str,
        view_id: &str,
    ) -> PageServiceResult<ViewProjection> {
        let database = self.get_database(database_id)?;
        let view = database
            .views
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .find(|view| view.id == view_id)
            .ok_or_else(|| PageServiceError::ViewNotFound {
                database_id: database.id.clone(),
                view_id: view_id.to_string(),
            })?;
        let rows = self.active_rows(&database.id)?;
        Ok(project_view(view, database.schema(), &rows)?)
    }

    /// Moves one page to the trash. Already trashed pages stay unchanged.
    pub fn soft_delete(&self, id: &str) -> PageServiceResult<()> {
        let page = self.load_any(id)?;
        if page.is_trashed() {
            return Ok(());
        }
        let now = now_epoch_ms();
        self.repo.set_deleted_at(id, Some(now), now)?;
        info!("event=page_trash module=service status=ok page_id={id}");
        Ok(())
    }

    /// Takes one page out of the trash. Active pages stay unchanged.
    pub fn restore(&self, id: &str) -> PageServiceResult<Page> {
        let mut page = self.load_any(id)?;
        if !page.is_trashed() {
            return Ok(page);
        }
        page.restore();
        page.updated_at = now_epoch_ms();
        self.repo.set_deleted_at(id, None, page.updated_at)?;
        info!("event=page_restore module=service status=ok page_id={id}");
        Ok(page)
    }

    /// Removes one trashed page permanently.
    pub fn purge(&self, id: &str) -> PageServiceResult<()> {
        let page = self.load_any(id)?;
        if !page.is_trashed() {
            return Err(PageServiceError::NotInTrash(page.id));
        }
        self.repo.purge_page(id)?;
        info!("event=page_purge module=service status=ok page_id={id}");
        Ok(())
    }

    /// Full documents of every active page.
    pub fn export_pages(&self) -> PageServiceResult<Vec<Page>> {
        let pages = self.repo.list_pages(&PageListQuery::active())?;
        info!(
            "event=pages_export module=service status=ok count={}",
            pages.len()
        );
        Ok(pages)
    }

    /// Writes every page of a `{ "pages": [...] }` payload.
    ///
    /// Items are written one by one; a malformed item stops the import and
    /// leaves earlier items written. Returns the number of pages written.
    ///
    /// An item with no blocks gets the default paragraph block. Once the
    /// items are written, any imported page whose parent chain leads back to
    /// itself is moved to the root.
    pub fn import_pages(&self, payload: &serde_json::Value) -> PageServiceResult<usize> {
        let items = payload
            .get("pages")
            .ok_or_else(|| PageServiceError::InvalidImport("missing `pages`".to_string()))?
            .as_array()
            .ok_or_else(|| PageServiceError::InvalidImport("`pages` must be an array".to_string()))?;

        let mut written = Vec::with_capacity(items.len());
        let mut failure = None;
        for (index, item) in items.iter().enumerate() {
            let mut page = match serde_json::from_value::<Page>(item.clone()) {
                Ok(page) => page,
                Err(err) => {
                    warn!(
                        "event=pages_import module=service status=error imported={} failed_index={index}",
                        written.len()
                    );
                    failure = Some(PageServiceError::InvalidImport(format!(
                        "page at index {index}: {err}"
                    )));
                    break;
                }
            };
            if page.blocks.is_empty() {
                page.blocks = default_blocks();
            }
            self.repo.upsert_page(&page)?;
            written.push(page.id);
        }

        let detached = self.detach_import_cycles(&written)?;
        if detached > 0 {
            warn!("event=pages_import module=service status=cycle_repaired detached={detached}");
        }
        if let Some(err) = failure {
            return Err(err);
        }

        let imported = written.len();
        info!("event=pages_import module=service status=ok imported={imported}");
        Ok(imported)
    }

    /// Clears `parent_id` on each listed page whose ancestor chain returns to
    /// it. Pages are visited in order, so in a loop only the first listed
    /// member is detached.
    fn detach_import_cycles(&self, ids: &[String]) -> PageServiceResult<usize> {
        let mut detached = 0;
        for id in ids {
            let Some(mut page) = self.repo.get_page(id, true)? else {
                continue;
            };
            let Some(parent_id) = page.parent_id.clone() else {
                continue;
            };
            if self.chain_returns_to(id, &parent_id)? {
                page.parent_id = None;
                page.updated_at = now_epoch_ms();
                self.repo.update_page(&page)?;
                detached += 1;
            }
        }
        Ok(detached)
    }

    /// True when walking up from `start` reaches `page_id`. A loop that does
    /// not pass through `page_id` is not counted.
    fn chain_returns_to(&self, page_id: &str, start: &str) -> PageServiceResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(start.to_string());
        while let Some(current) = cursor {
            if current == page_id {
                return Ok(true);
            }
            if !visited.insert(current.clone()) {
                return Ok(false);
            }
            cursor = self
                .repo
                .get_page(&current, true)?
                .and_then(|page| page.parent_id);
        }
        Ok(false)
    }

    /// Loads a page for anonymous viewing; only public, active pages qualify.
    pub fn get_public_page(&self, id: &str) -> PageServiceResult<Page> {
        let page = self.load_any(id)?;
        if !page.is_public || page.is_trashed() {
            return Err(PageServiceError::NotPublic(page.id));
        }
        Ok(page)
    }

    /// Creates the welcome page when the store holds no page at all.
    ///
    /// Returns whether the page was created.
    pub fn ensure_seed(&self) -> PageServiceResult<bool> {
        let query = PageListQuery {
            state: PageState::Any,
            parent_id: None,
        };
        if !self.repo.list_pages(&query)?.is_empty() {
            return Ok(false);
        }

        let mut todo = Block::with_id("b3", BlockKind::Todo, "Create your first page");
        todo.metadata = Some(BlockMetadata {
            checked: Some(false),
            ..BlockMetadata::default()
        });
        self.create_page(NewPage {
            id: Some(WELCOME_PAGE_ID.to_string()),
            title: Some("Welcome to Lumina".to_string()),
            blocks: Some(vec![
                Block::with_id("b1", BlockKind::H1, "Getting Started"),
                Block::with_id(
                    "b2",
                    BlockKind::Text,
                    "This is your new block-based workspace. Try typing or use the drag handle to move things around.",
                ),
                todo,
            ]),
            ..NewPage::default()
        })?;
        Ok(true)
    }

    fn load_any(&self, id: &str) -> PageServiceResult<Page> {
        self.repo
            .get_page(id, true)?
            .ok_or_else(|| PageServiceError::PageNotFound(id.to_string()))
    }

    fn get_database(&self, id: &str) -> PageServiceResult<Page> {
        let page = self.get_page(id)?;
        if !page.is_database() {
            return Err(PageServiceError::NotADatabase(page.id));
        }
        Ok(page)
    }

    fn active_rows(&self, database_id: &str) -> PageServiceResult<Vec<Page>> {
        Ok(self
            .repo
            .list_pages(&PageListQuery::active_children_of(database_id))?)
    }

    fn ensure_parent_exists(&self, parent_id: &str) -> PageServiceResult<()> {
        if self.repo.get_page(parent_id, true)?.is_none() {
            return Err(PageServiceError::ParentNotFound(parent_id.to_string()));
        }
        Ok(())
    }

    fn ensure_parent_allowed(&self, page_id: &str, parent_id: &str) -> PageServiceResult<()> {
        self.ensure_parent_exists(parent_id)?;
        if self.would_create_cycle(page_id, parent_id)? {
            return Err(PageServiceError::CycleDetected {
                page_id: page_id.to_string(),
                parent_id: parent_id.to_string(),
            });
        }
        Ok(())
    }

    /// Walks the ancestor chain of `candidate_parent_id` looking for `page_id`.
    ///
    /// A missing ancestor ends the chain (purges do not cascade).
    fn would_create_cycle(
        &self,
        page_id: &str,
        candidate_parent_id: &str,
    ) -> PageServiceResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_parent_id.to_string());
        while let Some(current) = cursor {
            if current == page_id {
                return Ok(true);
            }
            if !visited.insert(current.clone()) {
                return Ok(true);
            }
            cursor = self
                .repo
                .get_page(&current, true)?
                .and_then(|page| page.parent_id);
        }
        Ok(false)
    }
}
