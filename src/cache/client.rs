//! Cached wrapper for Toggl API clients
//!
//! Serves workspace listings and single project lookups from per-entity
//! [`ResourceCache`]s and keeps them coherent on writes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::Serialize;

use super::clock::{Clock, SystemClock};
use super::store::{CacheStats, DEFAULT_TTL, ResourceCache};
use crate::client::models::{
    Account, Client, DetailedReport, Project, SummaryReport, Tag, TagAction, TimeEntry,
    TimeEntryCreate,
};
use crate::client::{AccountApi, ReportApi, TimeEntryApi, TogglApi, WorkspaceApi};
use crate::error::Result;
use crate::resource::ResourceKind;

/// Statistics of every entity cache of a [`CachedTogglClient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheReport {
    pub clients: CacheStats,
    pub projects: CacheStats,
    pub tags: CacheStats,
    pub time_entries: CacheStats,
}

impl CacheReport {
    /// Statistics for one kind.
    pub fn for_kind(&self, kind: ResourceKind) -> CacheStats {
        match kind {
            ResourceKind::Client => self.clients,
            ResourceKind::Project => self.projects,
            ResourceKind::Tag => self.tags,
            ResourceKind::TimeEntry => self.time_entries,
        }
    }
}

/// Caching wrapper for any [`TogglApi`] implementation.
///
/// A workspace partition is only created by a full listing, so a resident
/// partition always holds the complete listing plus later write-throughs.
/// Writes to a workspace that was never listed are not cached.
pub struct CachedTogglClient<C: TogglApi> {
    inner: Arc<C>,
    clients: ResourceCache<Client>,
    projects: ResourceCache<Project>,
    tags: ResourceCache<Tag>,
    time_entries: ResourceCache<TimeEntry>,
}

impl<C: TogglApi> CachedTogglClient<C> {
    /// Wrap `inner` with caches using the default TTL.
    pub fn new(inner: C) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    /// Wrap `inner` with caches using `ttl` (zero means the default).
    pub fn with_ttl(inner: C, ttl: Duration) -> Self {
        Self::with_clock(inner, ttl, Arc::new(SystemClock))
    }

    /// Wrap `inner` with caches reading time from `clock`.
    pub fn with_clock(inner: C, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(inner),
            clients: ResourceCache::with_clock(ttl, clock.clone()),
            projects: ResourceCache::with_clock(ttl, clock.clone()),
            tags: ResourceCache::with_clock(ttl, clock.clone()),
            time_entries: ResourceCache::with_clock(ttl, clock),
        }
    }

    /// The wrapped client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Per-kind cache statistics.
    pub fn cache_stats(&self) -> CacheReport {
        CacheReport {
            clients: self.clients.stats(ResourceKind::Client),
            projects: self.projects.stats(ResourceKind::Project),
            tags: self.tags.stats(ResourceKind::Tag),
            time_entries: self.time_entries.stats(ResourceKind::TimeEntry),
        }
    }

    /// Change the TTL of every entity cache.
    pub fn set_cache_ttl(&self, ttl: Duration) {
        self.clients.set_ttl(ttl);
        self.projects.set_ttl(ttl);
        self.tags.set_ttl(ttl);
        self.time_entries.set_ttl(ttl);
    }

    /// A time entry seen by an earlier call, if still cached.
    pub fn cached_time_entry(&self, workspace_id: i64, id: i64) -> Option<TimeEntry> {
        self.time_entries.get(ResourceKind::TimeEntry, workspace_id, id)
    }

    fn remember_projects(&self, workspace_id: i64, projects: &[Project]) {
        for project in projects {
            self.projects.set(ResourceKind::Project, workspace_id, project.id, project.clone());
        }
    }

    /// Write-through for a project, only into an already listed workspace.
    fn store_project(&self, project: &Project) {
        if self.projects.contains_workspace(ResourceKind::Project, project.workspace_id) {
            self.projects.set(
                ResourceKind::Project,
                project.workspace_id,
                project.id,
                project.clone(),
            );
        }
    }

    fn store_tag(&self, tag: &Tag) {
        if self.tags.contains_workspace(ResourceKind::Tag, tag.workspace_id) {
            self.tags.set(ResourceKind::Tag, tag.workspace_id, tag.id, tag.clone());
        }
    }

    fn store_time_entry(&self, entry: &TimeEntry) {
        self.time_entries.set(
            ResourceKind::TimeEntry,
            entry.workspace_id,
            entry.id,
            entry.clone(),
        );
    }
}

#[async_trait]
impl<C: TogglApi> AccountApi for CachedTogglClient<C> {
    async fn get_account(&self) -> Result<Account> {
        self.inner.get_account().await
    }
}

#[async_trait]
impl<C: TogglApi> TimeEntryApi for CachedTogglClient<C> {
    async fn start_time_entry(&self, request: TimeEntryCreate) -> Result<TimeEntry> {
        let entry = self.inner.start_time_entry(request).await?;
        self.store_time_entry(&entry);
        Ok(entry)
    }

    async fn get_current_time_entry(&self) -> Result<Option<TimeEntry>> {
        let current = self.inner.get_current_time_entry().await?;
        if let Some(ref entry) = current {
            self.store_time_entry(entry);
        }
        Ok(current)
    }

    async fn get_time_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>> {
        let entries = self.inner.get_time_entries(start, end).await?;
        for entry in &entries {
            self.store_time_entry(entry);
        }
        Ok(entries)
    }

    async fn update_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry> {
        let updated = self.inner.update_time_entry(entry).await?;
        if updated.workspace_id != entry.workspace_id {
            self.time_entries.remove(ResourceKind::TimeEntry, entry.workspace_id, entry.id);
        }
        self.store_time_entry(&updated);
        Ok(updated)
    }

    async fn stop_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry> {
        let stopped = self.inner.stop_time_entry(entry).await?;
        self.store_time_entry(&stopped);
        Ok(stopped)
    }

    async fn delete_time_entry(&self, entry: &TimeEntry) -> Result<()> {
        self.inner.delete_time_entry(entry).await?;
        self.time_entries.remove(ResourceKind::TimeEntry, entry.workspace_id, entry.id);
        Ok(())
    }

    async fn add_remove_tag(
        &self,
        workspace_id: i64,
        entry_id: i64,
        tag: &str,
        action: TagAction,
    ) -> Result<TimeEntry> {
        let entry = self
            .inner
            .add_remove_tag(workspace_id, entry_id, tag, action)
            .await?;
        self.store_time_entry(&entry);
        Ok(entry)
    }
}

#[async_trait]
impl<C: TogglApi> WorkspaceApi for CachedTogglClient<C> {
    async fn get_projects(&self, workspace_id: i64) -> Result<Vec<Project>> {
        if let Some(projects) = self.projects.get_list(ResourceKind::Project, workspace_id) {
            debug!("Cache hit: projects of workspace {}", workspace_id);
            return Ok(projects);
        }

        debug!("Cache miss: projects of workspace {}", workspace_id);
        let projects = self.inner.get_projects(workspace_id).await?;
        self.remember_projects(workspace_id, &projects);
        Ok(projects)
    }

    async fn get_project(&self, workspace_id: i64, id: i64) -> Result<Project> {
        if let Some(project) = self.projects.get(ResourceKind::Project, workspace_id, id) {
            debug!("Cache hit: project {}", id);
            return Ok(project);
        }

        // A miss in an unlisted workspace loads the whole listing, so the
        // partition stays complete for later get_projects calls.
        if !self.projects.contains_workspace(ResourceKind::Project, workspace_id) {
            debug!("Cache miss: loading projects of workspace {}", workspace_id);
            let projects = self.inner.get_projects(workspace_id).await?;
            self.remember_projects(workspace_id, &projects);
            if let Some(project) = projects.into_iter().find(|p| p.id == id) {
                return Ok(project);
            }
        }

        debug!("Cache miss: fetching project {}", id);
        let project = self.inner.get_project(workspace_id, id).await?;
        self.store_project(&project);
        Ok(project)
    }

    async fn create_project(&self, workspace_id: i64, name: &str) -> Result<Project> {
        let project = self.inner.create_project(workspace_id, name).await?;
        self.store_project(&project);
        Ok(project)
    }

    async fn update_project(&self, project: &Project) -> Result<Project> {
        let updated = self.inner.update_project(project).await?;
        if updated.workspace_id != project.workspace_id {
            self.projects.remove(ResourceKind::Project, project.workspace_id, project.id);
        }
        self.store_project(&updated);
        Ok(updated)
    }

    async fn delete_project(&self, project: &Project) -> Result<()> {
        self.inner.delete_project(project).await?;
        self.projects.remove(ResourceKind::Project, project.workspace_id, project.id);
        Ok(())
    }

    async fn get_tags(&self, workspace_id: i64) -> Result<Vec<Tag>> {
        if let Some(tags) = self.tags.get_list(ResourceKind::Tag, workspace_id) {
            debug!("Cache hit: tags of workspace {}", workspace_id);
            return Ok(tags);
        }

        debug!("Cache miss: tags of workspace {}", workspace_id);
        let tags = self.inner.get_tags(workspace_id).await?;
        for tag in &tags {
            self.tags.set(ResourceKind::Tag, workspace_id, tag.id, tag.clone());
        }
        Ok(tags)
    }

    async fn create_tag(&self, workspace_id: i64, name: &str) -> Result<Tag> {
        let tag = self.inner.create_tag(workspace_id, name).await?;
        self.store_tag(&tag);
        Ok(tag)
    }

    async fn update_tag(&self, tag: &Tag) -> Result<Tag> {
        let updated = self.inner.update_tag(tag).await?;
        self.store_tag(&updated);
        Ok(updated)
    }

    async fn delete_tag(&self, tag: &Tag) -> Result<()> {
        self.inner.delete_tag(tag).await?;
        self.tags.remove(ResourceKind::Tag, tag.workspace_id, tag.id);
        Ok(())
    }

    async fn get_clients(&self, workspace_id: i64) -> Result<Vec<Client>> {
        if let Some(clients) = self.clients.get_list(ResourceKind::Client, workspace_id) {
            debug!("Cache hit: clients of workspace {}", workspace_id);
            return Ok(clients);
        }

        debug!("Cache miss: clients of workspace {}", workspace_id);
        let clients = self.inner.get_clients(workspace_id).await?;
        for client in &clients {
            self.clients.set(ResourceKind::Client, workspace_id, client.id, client.clone());
        }
        Ok(clients)
    }

    async fn create_client(&self, workspace_id: i64, name: &str) -> Result<Client> {
        let client = self.inner.create_client(workspace_id, name).await?;
        if self.clients.contains_workspace(ResourceKind::Client, workspace_id) {
            self.clients.set(ResourceKind::Client, workspace_id, client.id, client.clone());
        }
        Ok(client)
    }
}

// Reports are computed server-side over arbitrary ranges and never cached.
#[async_trait]
impl<C: TogglApi> ReportApi for CachedTogglClient<C> {
    async fn get_summary_report(
        &self,
        workspace_id: i64,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<SummaryReport> {
        self.inner
            .get_summary_report(workspace_id, since, until)
            .await
    }

    async fn get_detailed_report(
        &self,
        workspace_id: i64,
        since: NaiveDate,
        until: NaiveDate,
        page: usize,
    ) -> Result<DetailedReport> {
        self.inner
            .get_detailed_report(workspace_id, since, until, page)
            .await
    }
}
