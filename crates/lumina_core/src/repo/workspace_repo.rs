//! Workspace settings repository.
//!
//! # Invariants
//! - At most one row exists, keyed by [`WORKSPACE_ID`].
//! - Nested preference/privacy fields are stored as flat columns.

use crate::model::workspace::{
    Notifications, Preferences, Privacy, Theme, Workspace, WORKSPACE_ID,
};
use crate::repo::{bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const WORKSPACE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "icon",
    "color",
    "theme",
    "language",
    "notify_email_updates",
    "notify_page_views",
    "public_by_default",
    "show_activity",
    "updated_at",
];

pub trait WorkspaceRepository {
    /// Loads the singleton settings row, if it was ever saved.
    fn load_workspace(&self) -> RepoResult<Option<Workspace>>;
    /// Inserts or replaces the singleton settings row.
    fn save_workspace(&self, workspace: &Workspace, updated_at: i64) -> RepoResult<()>;
}

/// SQLite-backed workspace repository.
pub struct SqliteWorkspaceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkspaceRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "workspace", WORKSPACE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl WorkspaceRepository for SqliteWorkspaceRepository<'_> {
    fn load_workspace(&self) -> RepoResult<Option<Workspace>> {
        let row = self
            .conn
            .query_row(
                "SELECT
                    id,
                    name,
                    icon,
                    color,
                    theme,
                    language,
                    notify_email_updates,
                    notify_page_views,
                    public_by_default,
                    show_activity
                 FROM workspace
                 WHERE id = ?1;",
                [WORKSPACE_ID],
                |row| Ok(parse_workspace_row(row)),
            )
            .optional()?;

        row.transpose()
    }

    fn save_workspace(&self, workspace: &Workspace, updated_at: i64) -> RepoResult<()> {
        let preferences = &workspace.preferences;
        self.conn.execute(
            "INSERT INTO workspace (
                id, name, icon, color, theme, language,
                notify_email_updates, notify_page_views,
                public_by_default, show_activity, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                icon = excluded.icon,
                color = excluded.color,
                theme = excluded.theme,
                language = excluded.language,
                notify_email_updates = excluded.notify_email_updates,
                notify_page_views = excluded.notify_page_views,
                public_by_default = excluded.public_by_default,
                show_activity = excluded.show_activity,
                updated_at = excluded.updated_at;",
            params![
                WORKSPACE_ID,
                workspace.name.as_str(),
                workspace.icon.as_str(),
                workspace.color.as_str(),
                preferences.theme.as_str(),
                preferences.language.as_str(),
                bool_to_int(preferences.notifications.email_updates),
                bool_to_int(preferences.notifications.page_views),
                bool_to_int(workspace.privacy.public_by_default),
                bool_to_int(workspace.privacy.show_activity),
                updated_at,
            ],
        )?;
        Ok(())
    }
}

fn parse_workspace_row(row: &Row<'_>) -> RepoResult<Workspace> {
    let theme_text: String = row.get("theme")?;
    let theme = Theme::parse(&theme_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid theme `{theme_text}` in workspace.theme"))
    })?;

    Ok(Workspace {
        id: row.get("id")?,
        name: row.get("name")?,
        icon: row.get("icon")?,
        color: row.get("color")?,
        preferences: Preferences {
            theme,
            language: row.get("language")?,
            notifications: Notifications {
                email_updates: int_to_bool(
                    row.get("notify_email_updates")?,
                    "workspace.notify_email_updates",
                )?,
                page_views: int_to_bool(
                    row.get("notify_page_views")?,
                    "workspace.notify_page_views",
                )?,
            },
        },
        privacy: Privacy {
            public_by_default: int_to_bool(
                row.get("public_by_default")?,
                "workspace.public_by_default",
            )?,
            show_activity: int_to_bool(row.get("show_activity")?, "workspace.show_activity")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::{SqliteWorkspaceRepository, WorkspaceRepository};
    use crate::db::open_db_in_memory;
    use crate::model::workspace::{Theme, Workspace};

    #[test]
    fn save_then_load_roundtrips_nested_settings() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteWorkspaceRepository::try_new(&conn).unwrap();
        assert!(repo.load_workspace().unwrap().is_none());

        let mut workspace = Workspace::default();
        workspace.preferences.theme = Theme::Dark;
        workspace.privacy.public_by_default = true;
        repo.save_workspace(&workspace, 5).unwrap();

        assert_eq!(repo.load_workspace().unwrap(), Some(workspace));
    }
}
