//! Account API trait

use async_trait::async_trait;

use crate::client::models::Account;
use crate::error::Result;

/// Account operations for the Toggl API
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Fetch the current user's account including workspaces, projects,
    /// clients, tags and recent time entries.
    async fn get_account(&self) -> Result<Account>;
}
