//! Tag model

use serde::{Deserialize, Serialize};

/// Workspace tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Owning workspace ID
    #[serde(default)]
    pub workspace_id: i64,

    /// Tag ID
    #[serde(default)]
    pub id: i64,

    /// Tag name
    pub name: String,
}
