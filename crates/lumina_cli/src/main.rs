//! Diagnostic entry point for Lumina database files.
//!
//! # Responsibility
//! - Print the core version.
//! - Dump the active page tree or export every active page of a database file.
//!
//! # Invariants
//! - Output goes to stdout; failures print one line to stderr and exit 1.

use lumina_core::{open_db, PageMetadata, PageService, SqlitePageRepository};
use std::collections::{BTreeMap, HashSet};
use std::process::ExitCode;

const USAGE: &str = "usage: lumina <version | tree <db-path> | export <db-path>>";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [command] if command == "version" => {
            println!("lumina_core version={}", lumina_core::core_version());
            Ok(())
        }
        [command, path] if command == "tree" => print_tree(path),
        [command, path] if command == "export" => export(path),
        _ => Err(USAGE.to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn print_tree(path: &str) -> Result<(), String> {
    let conn = open_db(path).map_err(|err| err.to_string())?;
    let repo = SqlitePageRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let pages = PageService::new(repo)
        .list_tree()
        .map_err(|err| err.to_string())?;

    for line in render_tree(&pages) {
        println!("{line}");
    }
    Ok(())
}

fn export(path: &str) -> Result<(), String> {
    let conn = open_db(path).map_err(|err| err.to_string())?;
    let repo = SqlitePageRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let pages = PageService::new(repo)
        .export_pages()
        .map_err(|err| err.to_string())?;
    let payload = serde_json::json!({ "pages": pages });
    let text = serde_json::to_string_pretty(&payload).map_err(|err| err.to_string())?;
    println!("{text}");
    Ok(())
}

/// Indented `title (type, id)` lines. Pages whose parent is not in the
/// listing are rendered as roots.
fn render_tree(pages: &[PageMetadata]) -> Vec<String> {
    let known: HashSet<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    let mut children: BTreeMap<Option<&str>, Vec<&PageMetadata>> = BTreeMap::new();
    for page in pages {
        let parent = page
            .parent_id
            .as_deref()
            .filter(|parent| known.contains(parent));
        children.entry(parent).or_default().push(page);
    }

    let mut lines = Vec::new();
    let mut stack: Vec<(&PageMetadata, usize)> = children
        .get(&None)
        .map(|roots| roots.iter().rev().map(|page| (*page, 0)).collect())
        .unwrap_or_default();
    while let Some((page, depth)) = stack.pop() {
        lines.push(format!(
            "{}{} ({}, {})",
            "  ".repeat(depth),
            page.title,
            page.kind.as_str(),
            page.id
        ));
        if let Some(kids) = children.get(&Some(page.id.as_str())) {
            stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::render_tree;
    use lumina_core::{PageKind, PageMetadata};

    fn meta(id: &str, parent: Option<&str>) -> PageMetadata {
        PageMetadata {
            id: id.to_string(),
            kind: PageKind::Page,
            title: id.to_uppercase(),
            icon: None,
            parent_id: parent.map(str::to_string),
            is_public: false,
            updated_at: 0,
            deleted_at: None,
        }
    }

    #[test]
    fn children_are_indented_under_parents() {
        let pages = vec![meta("a", None), meta("b", Some("a")), meta("c", None)];
        assert_eq!(
            render_tree(&pages),
            vec!["A (page, a)", "  B (page, b)", "C (page, c)"]
        );
    }

    #[test]
    fn orphans_render_as_roots() {
        let pages = vec![meta("x", Some("trashed-parent"))];
        assert_eq!(render_tree(&pages), vec!["X (page, x)"]);
    }
}
