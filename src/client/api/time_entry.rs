//! Time entry API trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::client::models::{TagAction, TimeEntry, TimeEntryCreate};
use crate::error::Result;

/// Timer operations for the Toggl API
///
/// These persist what the pure [`TimeEntry`] transitions compute; the
/// remote service is the arbiter of concurrent edits (last write wins).
#[async_trait]
pub trait TimeEntryApi: Send + Sync {
    /// Create a time entry. A negative duration starts a running timer.
    async fn start_time_entry(&self, request: TimeEntryCreate) -> Result<TimeEntry>;

    /// The currently running entry, if any.
    async fn get_current_time_entry(&self) -> Result<Option<TimeEntry>>;

    /// Entries started between `start` and `end`.
    async fn get_time_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>>;

    /// Replace an existing entry with `entry`.
    async fn update_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry>;

    /// Stop a running entry server-side.
    async fn stop_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry>;

    /// Delete an entry.
    async fn delete_time_entry(&self, entry: &TimeEntry) -> Result<()>;

    /// Add or remove one tag on an entry without sending the whole entry.
    async fn add_remove_tag(
        &self,
        workspace_id: i64,
        entry_id: i64,
        tag: &str,
        action: TagAction,
    ) -> Result<TimeEntry>;
}
