//! Mock Toggl API client for testing
//!
//! Keeps an in-memory workspace so create/update/delete calls behave the way
//! the service would, without making real API calls.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::Mutex;

use super::api::{AccountApi, ReportApi, TimeEntryApi, WorkspaceApi};
use super::models::{
    Account, Client, DetailedReport, Project, RUNNING_DURATION, SummaryReport, Tag, TagAction,
    TimeEntry, TimeEntryCreate,
};
use crate::error::{ApiError, Result};

/// First id handed out to entities created through the mock.
const FIRST_GENERATED_ID: i64 = 1000;

/// Mock API client for testing.
///
/// Configure the remote state via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockTogglClient::new()
///     .with_projects(vec![Project {
///         id: 1,
///         workspace_id: 7,
///         name: "Web".into(),
///         ..Default::default()
///     }])
///     .await;
///
/// let projects = mock.get_projects(7).await?;
/// assert_eq!(projects.len(), 1);
/// ```
pub struct MockTogglClient {
    /// Account returned from get_account
    account: Arc<Mutex<Account>>,
    /// Projects across all workspaces
    projects: Arc<Mutex<Vec<Project>>>,
    /// Tags across all workspaces
    tags: Arc<Mutex<Vec<Tag>>>,
    /// Clients across all workspaces
    clients: Arc<Mutex<Vec<Client>>>,
    /// Every time entry known to the mock
    entries: Arc<Mutex<Vec<TimeEntry>>>,
    /// Entries created through start_time_entry, in order
    created: Arc<Mutex<Vec<TimeEntry>>>,
    /// Ids passed to delete_time_entry, in order
    deleted: Arc<Mutex<Vec<i64>>>,
    /// Summary report to return
    summary: Arc<Mutex<SummaryReport>>,
    /// Detailed report pages; page N returns detailed_pages[N - 1]
    detailed_pages: Arc<Mutex<Vec<DetailedReport>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Error for the next delete_time_entry only
    delete_error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    next_id: AtomicI64,
}

impl Default for MockTogglClient {
    fn default() -> Self {
        Self {
            account: Arc::new(Mutex::new(Account::default())),
            projects: Arc::new(Mutex::new(Vec::new())),
            tags: Arc::new(Mutex::new(Vec::new())),
            clients: Arc::new(Mutex::new(Vec::new())),
            entries: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            summary: Arc::new(Mutex::new(SummaryReport::default())),
            detailed_pages: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
            delete_error: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
            next_id: AtomicI64::new(FIRST_GENERATED_ID),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub get_account: usize,
    // Time entries
    pub start_time_entry: usize,
    pub get_current_time_entry: usize,
    pub get_time_entries: usize,
    pub update_time_entry: usize,
    pub stop_time_entry: usize,
    pub delete_time_entry: usize,
    pub add_remove_tag: usize,
    // Workspace resources
    pub get_projects: usize,
    pub get_project: usize,
    pub create_project: usize,
    pub update_project: usize,
    pub delete_project: usize,
    pub get_tags: usize,
    pub create_tag: usize,
    pub update_tag: usize,
    pub delete_tag: usize,
    pub get_clients: usize,
    pub create_client: usize,
    // Reports
    pub get_summary_report: usize,
    pub get_detailed_report: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.get_account
            + self.start_time_entry
            + self.get_current_time_entry
            + self.get_time_entries
            + self.update_time_entry
            + self.stop_time_entry
            + self.delete_time_entry
            + self.add_remove_tag
            + self.get_projects
            + self.get_project
            + self.create_project
            + self.update_project
            + self.delete_project
            + self.get_tags
            + self.create_tag
            + self.update_tag
            + self.delete_tag
            + self.get_clients
            + self.create_client
            + self.get_summary_report
            + self.get_detailed_report
    }
}

impl MockTogglClient {
    /// Create a new mock client with an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the account returned from get_account.
    pub async fn with_account(self, account: Account) -> Self {
        *self.account.lock().await = account;
        self
    }

    /// Configure the projects known to the mock.
    pub async fn with_projects(self, projects: Vec<Project>) -> Self {
        *self.projects.lock().await = projects;
        self
    }

    /// Configure the tags known to the mock.
    pub async fn with_tags(self, tags: Vec<Tag>) -> Self {
        *self.tags.lock().await = tags;
        self
    }

    /// Configure the clients known to the mock.
    pub async fn with_clients(self, clients: Vec<Client>) -> Self {
        *self.clients.lock().await = clients;
        self
    }

    /// Configure the time entries known to the mock.
    pub async fn with_entries(self, entries: Vec<TimeEntry>) -> Self {
        *self.entries.lock().await = entries;
        self
    }

    /// Configure the summary report.
    pub async fn with_summary(self, summary: SummaryReport) -> Self {
        *self.summary.lock().await = summary;
        self
    }

    /// Configure detailed report pages, first page first.
    pub async fn with_detailed_pages(self, pages: Vec<DetailedReport>) -> Self {
        *self.detailed_pages.lock().await = pages;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Like [`Self::with_error`], for a mock already in use.
    pub async fn fail_next(&self, error: ApiError) {
        *self.error.lock().await = Some(error);
    }

    /// Make the next delete_time_entry fail; other calls are unaffected.
    pub async fn fail_next_delete(self, error: ApiError) -> Self {
        *self.delete_error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Entries created through start_time_entry.
    pub async fn created_entries(&self) -> Vec<TimeEntry> {
        self.created.lock().await.clone()
    }

    /// Ids of entries deleted through delete_time_entry.
    pub async fn deleted_entry_ids(&self) -> Vec<i64> {
        self.deleted.lock().await.clone()
    }

    /// Current state of all entries.
    pub async fn entries(&self) -> Vec<TimeEntry> {
        self.entries.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<()> {
        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e.into());
        }
        Ok(())
    }

    async fn count(&self, bump: impl FnOnce(&mut CallCounts)) {
        let mut counts = self.call_count.lock().await;
        bump(&mut counts);
    }

    fn generate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

// ============================================================================
// AccountApi Implementation
// ============================================================================

#[async_trait]
impl AccountApi for MockTogglClient {
    async fn get_account(&self) -> Result<Account> {
        self.check_error().await?;
        self.count(|c| c.get_account += 1).await;

        Ok(self.account.lock().await.clone())
    }
}

// ============================================================================
// TimeEntryApi Implementation
// ============================================================================

#[async_trait]
impl TimeEntryApi for MockTogglClient {
    async fn start_time_entry(&self, request: TimeEntryCreate) -> Result<TimeEntry> {
        self.check_error().await?;
        self.count(|c| c.start_time_entry += 1).await;

        let entry = TimeEntry {
            id: self.generate_id(),
            workspace_id: request.workspace_id,
            project_id: request.project_id,
            task_id: request.task_id,
            description: request.description,
            start: Some(request.start.unwrap_or_else(Utc::now)),
            stop: None,
            tags: request.tags,
            duration: RUNNING_DURATION,
            duronly: false,
            billable: request.billable,
        };

        self.entries.lock().await.push(entry.clone());
        self.created.lock().await.push(entry.clone());
        Ok(entry)
    }

    async fn get_current_time_entry(&self) -> Result<Option<TimeEntry>> {
        self.check_error().await?;
        self.count(|c| c.get_current_time_entry += 1).await;

        let entries = self.entries.lock().await;
        Ok(entries.iter().find(|e| e.is_running()).cloned())
    }

    async fn get_time_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>> {
        self.check_error().await?;
        self.count(|c| c.get_time_entries += 1).await;

        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|e| e.start.is_some_and(|s| s >= start && s <= end))
            .cloned()
            .collect())
    }

    async fn update_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry> {
        self.check_error().await?;
        self.count(|c| c.update_time_entry += 1).await;

        let mut entries = self.entries.lock().await;
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => entries.push(entry.clone()),
        }
        Ok(entry.clone())
    }

    async fn stop_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry> {
        self.check_error().await?;
        self.count(|c| c.stop_time_entry += 1).await;

        let mut stopped = entry.clone();
        let now = Utc::now();
        let start = stopped.start.unwrap_or(now);
        stopped.stop = Some(now);
        stopped.duration = (now - start).num_seconds();

        let mut entries = self.entries.lock().await;
        if let Some(existing) = entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = stopped.clone();
        }
        Ok(stopped)
    }

    async fn delete_time_entry(&self, entry: &TimeEntry) -> Result<()> {
        self.check_error().await?;
        self.count(|c| c.delete_time_entry += 1).await;

        if let Some(e) = self.delete_error.lock().await.take() {
            return Err(e.into());
        }

        self.entries.lock().await.retain(|e| e.id != entry.id);
        self.deleted.lock().await.push(entry.id);
        Ok(())
    }

    async fn add_remove_tag(
        &self,
        _workspace_id: i64,
        entry_id: i64,
        tag: &str,
        action: TagAction,
    ) -> Result<TimeEntry> {
        self.check_error().await?;
        self.count(|c| c.add_remove_tag += 1).await;

        let mut entries = self.entries.lock().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| ApiError::NotFound(format!("time entry {}", entry_id)))?;
        match action {
            TagAction::Add => entry.add_tag(tag),
            TagAction::Remove => entry.remove_tag(tag),
        }
        Ok(entry.clone())
    }
}

// ============================================================================
// WorkspaceApi Implementation
// ============================================================================

#[async_trait]
impl WorkspaceApi for MockTogglClient {
    async fn get_projects(&self, workspace_id: i64) -> Result<Vec<Project>> {
        self.check_error().await?;
        self.count(|c| c.get_projects += 1).await;

        let projects = self.projects.lock().await;
        Ok(projects
            .iter()
            .filter(|p| p.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    async fn get_project(&self, workspace_id: i64, id: i64) -> Result<Project> {
        self.check_error().await?;
        self.count(|c| c.get_project += 1).await;

        let projects = self.projects.lock().await;
        projects
            .iter()
            .find(|p| p.workspace_id == workspace_id && p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("project {}", id)).into())
    }

    async fn create_project(&self, workspace_id: i64, name: &str) -> Result<Project> {
        self.check_error().await?;
        self.count(|c| c.create_project += 1).await;

        let project = Project {
            id: self.generate_id(),
            workspace_id,
            name: name.to_string(),
            active: true,
            ..Project::default()
        };
        self.projects.lock().await.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, project: &Project) -> Result<Project> {
        self.check_error().await?;
        self.count(|c| c.update_project += 1).await;

        let mut projects = self.projects.lock().await;
        let existing = projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| ApiError::NotFound(format!("project {}", project.id)))?;
        *existing = project.clone();
        Ok(project.clone())
    }

    async fn delete_project(&self, project: &Project) -> Result<()> {
        self.check_error().await?;
        self.count(|c| c.delete_project += 1).await;

        self.projects.lock().await.retain(|p| p.id != project.id);
        Ok(())
    }

    async fn get_tags(&self, workspace_id: i64) -> Result<Vec<Tag>> {
        self.check_error().await?;
        self.count(|c| c.get_tags += 1).await;

        let tags = self.tags.lock().await;
        Ok(tags
            .iter()
            .filter(|t| t.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    async fn create_tag(&self, workspace_id: i64, name: &str) -> Result<Tag> {
        self.check_error().await?;
        self.count(|c| c.create_tag += 1).await;

        let tag = Tag {
            workspace_id,
            id: self.generate_id(),
            name: name.to_string(),
        };
        self.tags.lock().await.push(tag.clone());
        Ok(tag)
    }

    async fn update_tag(&self, tag: &Tag) -> Result<Tag> {
        self.check_error().await?;
        self.count(|c| c.update_tag += 1).await;

        let mut tags = self.tags.lock().await;
        let existing = tags
            .iter_mut()
            .find(|t| t.id == tag.id)
            .ok_or_else(|| ApiError::NotFound(format!("tag {}", tag.id)))?;
        *existing = tag.clone();
        Ok(tag.clone())
    }

    async fn delete_tag(&self, tag: &Tag) -> Result<()> {
        self.check_error().await?;
        self.count(|c| c.delete_tag += 1).await;

        self.tags.lock().await.retain(|t| t.id != tag.id);
        Ok(())
    }

    async fn get_clients(&self, workspace_id: i64) -> Result<Vec<Client>> {
        self.check_error().await?;
        self.count(|c| c.get_clients += 1).await;

        let clients = self.clients.lock().await;
        Ok(clients
            .iter()
            .filter(|c| c.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    async fn create_client(&self, workspace_id: i64, name: &str) -> Result<Client> {
        self.check_error().await?;
        self.count(|c| c.create_client += 1).await;

        let client = Client {
            workspace_id,
            id: self.generate_id(),
            name: name.to_string(),
            ..Client::default()
        };
        self.clients.lock().await.push(client.clone());
        Ok(client)
    }
}

// ============================================================================
// ReportApi Implementation
// ============================================================================

#[async_trait]
impl ReportApi for MockTogglClient {
    async fn get_summary_report(
        &self,
        _workspace_id: i64,
        _since: NaiveDate,
        _until: NaiveDate,
    ) -> Result<SummaryReport> {
        self.check_error().await?;
        self.count(|c| c.get_summary_report += 1).await;

        Ok(self.summary.lock().await.clone())
    }

    async fn get_detailed_report(
        &self,
        _workspace_id: i64,
        _since: NaiveDate,
        _until: NaiveDate,
        page: usize,
    ) -> Result<DetailedReport> {
        self.check_error().await?;
        self.count(|c| c.get_detailed_report += 1).await;

        let pages = self.detailed_pages.lock().await;
        Ok(page
            .checked_sub(1)
            .and_then(|idx| pages.get(idx))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_mock_start_and_current() {
        let mock = MockTogglClient::new();
        assert!(mock.get_current_time_entry().await.unwrap().is_none());

        let entry = mock
            .start_time_entry(TimeEntryCreate::start("Write docs", 7))
            .await
            .unwrap();

        assert_eq!(entry.id, FIRST_GENERATED_ID);
        assert!(entry.is_running());
        let current = mock.get_current_time_entry().await.unwrap().unwrap();
        assert_eq!(current.id, entry.id);
    }

    #[tokio::test]
    async fn test_mock_error_consumed_once() {
        let mock = MockTogglClient::new()
            .with_error(ApiError::Unauthorized)
            .await;

        let result = mock.get_projects(1).await;
        assert!(matches!(result, Err(Error::Api(ApiError::Unauthorized))));

        assert!(mock.get_projects(1).await.is_ok());
        assert_eq!(mock.call_counts().await.get_projects, 1);
    }

    #[tokio::test]
    async fn test_mock_projects_scoped_by_workspace() {
        let mock = MockTogglClient::new()
            .with_projects(vec![
                Project {
                    id: 1,
                    workspace_id: 7,
                    name: "Web".to_string(),
                    ..Project::default()
                },
                Project {
                    id: 2,
                    workspace_id: 8,
                    name: "Ops".to_string(),
                    ..Project::default()
                },
            ])
            .await;

        let projects = mock.get_projects(7).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Web");
        assert!(mock.get_project(7, 2).await.is_err());
    }
}
