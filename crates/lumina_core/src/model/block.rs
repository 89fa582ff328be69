//! Block domain model.
//!
//! # Responsibility
//! - Define the atomic content unit stored in a page's block sequence.
//! - Expose type-gated metadata accessors.
//!
//! # Invariants
//! - `id` is unique within one page and never reused for another block.
//! - Metadata fields are only meaningful for the kind that owns them:
//!   `checked` (todo), `icon` (callout), `src`/`alt`/`caption` (image),
//!   `tableData`/`tableHeaders` (table). Accessors return `None` otherwise.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable block identifier, unique within its page.
pub type BlockId = String;

/// Content block kind. Serialized as `type` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    H1,
    H2,
    H3,
    Todo,
    Bullet,
    Divider,
    Image,
    Callout,
    Table,
}

impl BlockKind {
    /// Wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::Todo => "todo",
            Self::Bullet => "bullet",
            Self::Divider => "divider",
            Self::Image => "image",
            Self::Callout => "callout",
            Self::Table => "table",
        }
    }
}

/// Type-specific bag attached to a block.
///
/// Stored as-is; gating happens in the [`Block`] accessors so that a type
/// conversion never destroys metadata the user may convert back to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_data: Option<Vec<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_headers: Option<Vec<String>>,
}

/// Image reference view over image block metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef<'a> {
    pub src: Option<&'a str>,
    pub alt: Option<&'a str>,
    pub caption: Option<&'a str>,
}

/// One content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BlockMetadata>,
}

impl Block {
    /// Creates an empty block of `kind` with a freshly generated id.
    pub fn new(kind: BlockKind) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), kind, "")
    }

    /// Creates a block with a caller-provided id, used by import and seed paths.
    pub fn with_id(id: impl Into<BlockId>, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            metadata: None,
        }
    }

    /// Todo checked state. `None` for every non-todo kind.
    pub fn checked(&self) -> Option<bool> {
        if self.kind != BlockKind::Todo {
            return None;
        }
        Some(
            self.metadata
                .as_ref()
                .and_then(|metadata| metadata.checked)
                .unwrap_or(false),
        )
    }

    /// Callout icon, if this is a callout and one is set.
    pub fn callout_icon(&self) -> Option<&str> {
        if self.kind != BlockKind::Callout {
            return None;
        }
        self.metadata.as_ref()?.icon.as_deref()
    }

    /// Image fields, if this is an image block.
    pub fn image(&self) -> Option<ImageRef<'_>> {
        if self.kind != BlockKind::Image {
            return None;
        }
        let metadata = self.metadata.as_ref();
        Some(ImageRef {
            src: metadata.and_then(|m| m.src.as_deref()),
            alt: metadata.and_then(|m| m.alt.as_deref()),
            caption: metadata.and_then(|m| m.caption.as_deref()),
        })
    }

    /// Mutable metadata, created empty on first access.
    pub fn metadata_mut(&mut self) -> &mut BlockMetadata {
        self.metadata.get_or_insert_with(BlockMetadata::default)
    }
}

/// Partial block update. Present fields replace the stored ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BlockMetadata>,
}

impl BlockPatch {
    /// Shallow-merges this patch into `block`; `metadata` is replaced wholesale.
    pub fn apply(&self, block: &mut Block) {
        if let Some(content) = &self.content {
            block.content = content.clone();
        }
        if let Some(kind) = self.kind {
            block.kind = kind;
        }
        if let Some(metadata) = &self.metadata {
            block.metadata = Some(metadata.clone());
        }
    }
}
