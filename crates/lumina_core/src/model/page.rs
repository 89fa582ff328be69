//! Page domain model.
//!
//! # Responsibility
//! - Define the page document shared by free-form pages, databases and rows.
//! - Define create/patch request shapes and their merge semantics.
//! - Provide lifecycle helpers for soft-delete (trash) semantics.
//!
//! # Invariants
//! - `deleted_at` is the source of truth for trash membership.
//! - `parent_id = None` means root level.
//! - A patch only touches the keys present in the request body
//!   (last-write-wins per field).

use crate::model::block::{Block, BlockKind};
use crate::model::property::{PropertySchema, PropertyType};
use crate::model::view::{DatabaseView, ViewKind};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Stable page identifier.
pub type PageId = String;

/// Row value map keyed by property id. Values are kept raw so that values
/// orphaned by schema edits survive untouched.
pub type RowProperties = BTreeMap<String, serde_json::Value>;

/// Title used when a page is created without one.
pub const DEFAULT_PAGE_TITLE: &str = "Untitled";

/// Page flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Page,
    Database,
}

impl PageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Database => "database",
        }
    }
}

/// Full page document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    #[serde(rename = "type", default)]
    pub kind: PageKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default)]
    pub parent_id: Option<PageId>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties_schema: Option<Vec<PropertySchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<Vec<DatabaseView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<RowProperties>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

impl Page {
    /// Whether this page is in the trash.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_database(&self) -> bool {
        self.kind == PageKind::Database
    }

    /// Schema entries in declaration order; empty when none is set.
    pub fn schema(&self) -> &[PropertySchema] {
        self.properties_schema.as_deref().unwrap_or(&[])
    }

    /// Moves this page to the trash at `now`.
    pub fn soft_delete(&mut self, now: i64) {
        self.deleted_at = Some(now);
    }

    /// Takes this page out of the trash.
    pub fn restore(&mut self) {
        self.deleted_at = None;
    }

    /// Tree/listing projection of this page.
    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            id: self.id.clone(),
            kind: self.kind,
            title: self.title.clone(),
            icon: self.icon.clone(),
            parent_id: self.parent_id.clone(),
            is_public: self.is_public,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

/// Lightweight listing shape used by tree, trash and search responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub id: PageId,
    #[serde(rename = "type")]
    pub kind: PageKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub parent_id: Option<PageId>,
    pub is_public: bool,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Create request. Every field is optional; defaults are filled by the
/// page service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPage {
    #[serde(default)]
    pub id: Option<PageId>,
    #[serde(default, rename = "type")]
    pub kind: Option<PageKind>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub parent_id: Option<PageId>,
    #[serde(default)]
    pub blocks: Option<Vec<Block>>,
    #[serde(default)]
    pub properties_schema: Option<Vec<PropertySchema>>,
    #[serde(default)]
    pub views: Option<Vec<DatabaseView>>,
    #[serde(default)]
    pub properties: Option<RowProperties>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// Partial page update.
///
/// Nullable fields use `Option<Option<_>>`: absent leaves the stored value,
/// `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PageKind>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<PageId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties_schema: Option<Vec<PropertySchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<Vec<DatabaseView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<RowProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl PagePatch {
    /// Shallow-merges every present key into `page`.
    ///
    /// Does not touch timestamps or trash state; callers own those.
    pub fn apply(&self, page: &mut Page) {
        if let Some(title) = &self.title {
            page.title = title.clone();
        }
        if let Some(kind) = self.kind {
            page.kind = kind;
        }
        if let Some(icon) = &self.icon {
            page.icon = icon.clone();
        }
        if let Some(cover) = &self.cover {
            page.cover = cover.clone();
        }
        if let Some(parent_id) = &self.parent_id {
            page.parent_id = parent_id.clone();
        }
        if let Some(blocks) = &self.blocks {
            page.blocks = blocks.clone();
        }
        if let Some(schema) = &self.properties_schema {
            page.properties_schema = Some(schema.clone());
        }
        if let Some(views) = &self.views {
            page.views = Some(views.clone());
        }
        if let Some(properties) = &self.properties {
            page.properties = Some(properties.clone());
        }
        if let Some(is_public) = self.is_public {
            page.is_public = is_public;
        }
    }

    /// Whether this patch re-parents the page.
    pub fn parent_change(&self) -> Option<Option<&str>> {
        self.parent_id.as_ref().map(|value| value.as_deref())
    }
}

/// Block sequence given to a freshly created page.
pub fn default_blocks() -> Vec<Block> {
    vec![Block::new(BlockKind::Text)]
}

/// Schema given to a freshly created database.
pub fn default_database_schema() -> Vec<PropertySchema> {
    let mut status = PropertySchema::new("Status", PropertyType::Select);
    status.options = Some(Vec::new());
    vec![status]
}

/// Views given to a freshly created database.
pub fn default_database_views() -> Vec<DatabaseView> {
    vec![DatabaseView::new("Table", ViewKind::Table)]
}

/// Current wall clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
