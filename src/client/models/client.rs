//! Client (customer) model

use serde::{Deserialize, Serialize};

/// Workspace client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Owning workspace ID
    #[serde(default, alias = "wid")]
    pub workspace_id: i64,

    /// Client ID
    #[serde(default)]
    pub id: i64,

    /// Client name
    pub name: String,

    /// Whether the client is archived
    #[serde(default)]
    pub archived: bool,

    /// Free-form notes
    #[serde(default, deserialize_with = "null_as_empty_string")]
    pub notes: String,
}

fn null_as_empty_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
