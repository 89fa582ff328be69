//! Slash-command detection and block type menu.
//!
//! Typing `/` at the start of a block opens the type menu. The menu never
//! mutates the block: callers apply `convert_type` once a kind is chosen.

use crate::model::block::BlockKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SLASH_QUERY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/([^\s/]*)$").expect("slash query regex must compile"));

/// One selectable entry of the slash menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlashMenuItem {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub label: &'static str,
    pub description: &'static str,
}

const MENU: &[SlashMenuItem] = &[
    SlashMenuItem {
        kind: BlockKind::Text,
        label: "Text",
        description: "Just start writing with plain text",
    },
    SlashMenuItem {
        kind: BlockKind::H1,
        label: "Heading 1",
        description: "Big section heading",
    },
    SlashMenuItem {
        kind: BlockKind::H2,
        label: "Heading 2",
        description: "Medium section heading",
    },
    SlashMenuItem {
        kind: BlockKind::H3,
        label: "Heading 3",
        description: "Small section heading",
    },
    SlashMenuItem {
        kind: BlockKind::Todo,
        label: "To-do list",
        description: "Track tasks with a to-do list",
    },
    SlashMenuItem {
        kind: BlockKind::Bullet,
        label: "Bulleted list",
        description: "Create a simple bulleted list",
    },
    SlashMenuItem {
        kind: BlockKind::Divider,
        label: "Divider",
        description: "Visually divide blocks",
    },
    SlashMenuItem {
        kind: BlockKind::Callout,
        label: "Callout",
        description: "Make writing stand out",
    },
    SlashMenuItem {
        kind: BlockKind::Image,
        label: "Image",
        description: "Upload or embed with a link",
    },
];

/// Returns the menu filter when `content` is an open slash command.
///
/// `"/"` yields `Some("")`; `"/hea"` yields `Some("hea")`. Content that does
/// not start with `/`, or that contains whitespace after it, yields `None`.
pub fn slash_query(content: &str) -> Option<&str> {
    SLASH_QUERY_RE
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|filter| filter.as_str())
}

/// Menu entries whose label or kind contains `filter`, case-insensitively.
pub fn slash_menu(filter: &str) -> Vec<SlashMenuItem> {
    let needle = filter.trim().to_lowercase();
    MENU.iter()
        .filter(|item| {
            needle.is_empty()
                || item.label.to_lowercase().contains(&needle)
                || item.kind.as_str().contains(&needle)
        })
        .copied()
        .collect()
}
