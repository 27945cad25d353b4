//! Toggl resource kinds and REST path builders

use std::fmt;

/// Entity categories exposed by the Toggl API.
///
/// Used as the partition key of [`crate::cache::ResourceCache`] and as the
/// path segment of workspace-scoped REST URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Client,
    Project,
    Tag,
    TimeEntry,
}

impl ResourceKind {
    /// Every kind, in declaration order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Client,
        ResourceKind::Project,
        ResourceKind::Tag,
        ResourceKind::TimeEntry,
    ];

    /// Stable plural name, as used in API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Client => "clients",
            ResourceKind::Project => "projects",
            ResourceKind::Tag => "tags",
            ResourceKind::TimeEntry => "time_entries",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path of a resource collection owned by the current user (`/me/<kind>`).
pub fn user_resource_path(kind: ResourceKind) -> String {
    format!("/me/{}", kind)
}

/// Path of a workspace-scoped resource collection.
pub fn resource_path(kind: ResourceKind, workspace_id: i64) -> String {
    format!("/workspaces/{}/{}", workspace_id, kind)
}

/// Path of a single workspace-scoped resource.
pub fn resource_path_with_id(kind: ResourceKind, workspace_id: i64, id: i64) -> String {
    format!("{}/{}", resource_path(kind, workspace_id), id)
}
