//! Account and workspace models

use serde::{Deserialize, Serialize};

use super::{Client, Project, Tag, Task, TimeEntry};

/// The authenticated user's account, optionally with related data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    /// Account ID
    #[serde(default)]
    pub id: i64,

    /// API token of the account
    #[serde(default)]
    pub api_token: String,

    /// IANA timezone name
    #[serde(default)]
    pub timezone: String,

    /// First day of the week (0 = Sunday)
    #[serde(default)]
    pub beginning_of_week: i64,

    /// Default workspace ID
    #[serde(default)]
    pub default_workspace_id: Option<i64>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub workspaces: Vec<Workspace>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub clients: Vec<Client>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub projects: Vec<Project>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tasks: Vec<Task>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Tag>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub time_entries: Vec<TimeEntry>,
}

/// User workspace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub rounding: i64,
    #[serde(default)]
    pub rounding_minutes: i64,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
