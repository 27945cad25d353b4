//! Project and task models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID
    #[serde(default)]
    pub id: i64,

    /// Owning workspace ID
    #[serde(default)]
    pub workspace_id: i64,

    /// Client ID (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,

    /// Project name
    pub name: String,

    /// Whether the project is active (not archived)
    #[serde(default)]
    pub active: bool,

    /// Billable default for new entries (paid workspaces only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,

    /// Set once the project has been deleted server-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_deleted_at: Option<DateTime<Utc>>,
}

impl Project {
    /// True if the project exists and is not archived.
    pub fn is_active(&self) -> bool {
        self.active && self.server_deleted_at.is_none()
    }
}

/// Project task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, alias = "wid")]
    pub workspace_id: i64,
    #[serde(default, alias = "pid")]
    pub project_id: i64,
    pub id: i64,
    pub name: String,
}
