//! Workspace resource API trait (projects, tags, clients)

use async_trait::async_trait;

use crate::client::models::{Client, Project, Tag};
use crate::error::Result;

/// Workspace-scoped resource operations
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    // ========================================================================
    // Projects
    // ========================================================================

    /// List the projects of a workspace.
    async fn get_projects(&self, workspace_id: i64) -> Result<Vec<Project>>;

    /// Fetch one project.
    async fn get_project(&self, workspace_id: i64, id: i64) -> Result<Project>;

    /// Create an active project.
    async fn create_project(&self, workspace_id: i64, name: &str) -> Result<Project>;

    /// Replace an existing project.
    async fn update_project(&self, project: &Project) -> Result<Project>;

    /// Delete a project.
    async fn delete_project(&self, project: &Project) -> Result<()>;

    // ========================================================================
    // Tags
    // ========================================================================

    /// List the tags of a workspace.
    async fn get_tags(&self, workspace_id: i64) -> Result<Vec<Tag>>;

    async fn create_tag(&self, workspace_id: i64, name: &str) -> Result<Tag>;

    async fn update_tag(&self, tag: &Tag) -> Result<Tag>;

    async fn delete_tag(&self, tag: &Tag) -> Result<()>;

    // ========================================================================
    // Clients
    // ========================================================================

    /// List the clients of a workspace.
    async fn get_clients(&self, workspace_id: i64) -> Result<Vec<Client>>;

    async fn create_client(&self, workspace_id: i64, name: &str) -> Result<Client>;
}
