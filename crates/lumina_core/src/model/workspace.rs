//! Workspace settings model.
//!
//! # Invariants
//! - Exactly one workspace exists per deployment (`id = "default"`).
//! - Patches merge shallowly at every nesting level.

use serde::{Deserialize, Serialize};

/// Id of the singleton workspace row.
pub const WORKSPACE_ID: &str = "default";

/// UI theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
    pub email_updates: bool,
    pub page_views: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
    pub notifications: Notifications,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Privacy {
    /// New pages start public when set and no explicit flag is given.
    pub public_by_default: bool,
    pub show_activity: bool,
}

/// Singleton workspace settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub preferences: Preferences,
    pub privacy: Privacy,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            id: WORKSPACE_ID.to_string(),
            name: "My Workspace".to_string(),
            icon: "📝".to_string(),
            color: "blue".to_string(),
            preferences: Preferences {
                theme: Theme::System,
                language: "en".to_string(),
                notifications: Notifications {
                    email_updates: true,
                    page_views: false,
                },
            },
            privacy: Privacy {
                public_by_default: false,
                show_activity: true,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsPatch {
    #[serde(default)]
    pub email_updates: Option<bool>,
    #[serde(default)]
    pub page_views: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub notifications: Option<NotificationsPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPatch {
    #[serde(default)]
    pub public_by_default: Option<bool>,
    #[serde(default)]
    pub show_activity: Option<bool>,
}

/// Partial workspace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspacePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub preferences: Option<PreferencesPatch>,
    #[serde(default)]
    pub privacy: Option<PrivacyPatch>,
}

impl WorkspacePatch {
    pub fn apply(&self, workspace: &mut Workspace) {
        if let Some(name) = &self.name {
            workspace.name = name.clone();
        }
        if let Some(icon) = &self.icon {
            workspace.icon = icon.clone();
        }
        if let Some(color) = &self.color {
            workspace.color = color.clone();
        }
        if let Some(preferences) = &self.preferences {
            let target = &mut workspace.preferences;
            if let Some(theme) = preferences.theme {
                target.theme = theme;
            }
            if let Some(language) = &preferences.language {
                target.language = language.clone();
            }
            if let Some(notifications) = &preferences.notifications {
                if let Some(value) = notifications.email_updates {
                    target.notifications.email_updates = value;
                }
                if let Some(value) = notifications.page_views {
                    target.notifications.page_views = value;
                }
            }
        }
        if let Some(privacy) = &self.privacy {
            if let Some(value) = privacy.public_by_default {
                workspace.privacy.public_by_default = value;
            }
            if let Some(value) = privacy.show_activity {
                workspace.privacy.show_activity = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Theme, Workspace, WorkspacePatch};

    #[test]
    fn nested_patch_keeps_sibling_fields() {
        let mut workspace = Workspace::default();
        let patch: WorkspacePatch = serde_json::from_str(
            r#"{"preferences": {"notifications": {"pageViews": true}}, "name": "Team"}"#,
        )
        .expect("parse");

        patch.apply(&mut workspace);

        assert_eq!(workspace.name, "Team");
        assert!(workspace.preferences.notifications.page_views);
        assert!(workspace.preferences.notifications.email_updates);
        assert_eq!(workspace.preferences.theme, Theme::System);
    }
}
