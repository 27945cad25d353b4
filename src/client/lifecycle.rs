//! Continue and unstop: recovering a timer from a previous entry
//!
//! Both operations read only the source entry's metadata and hand the
//! resulting request to a [`TimeEntryApi`]. Failures of that transport are
//! returned to the caller untouched, except for the unstop delete step which
//! is reported as a partial failure.

use chrono::{Local, NaiveDate};
use log::{debug, warn};

use super::api::TimeEntryApi;
use super::models::{TimeEntry, TimeEntryCreate};
use crate::error::{Result, TimeEntryError};

/// What continuing an entry amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    /// Run the same entry again (same id, original start).
    Resume(TimeEntry),
    /// Start a fresh entry carrying the source's metadata.
    StartNew(TimeEntryCreate),
}

impl Continuation {
    /// Decide how to continue `entry`.
    ///
    /// A duration-only continuation of an entry started `today` (local
    /// calendar day) resumes it in place. Anything else starts a new entry now
    /// with the same description, workspace, project, task, tags and billable
    /// flag.
    pub fn plan(entry: &TimeEntry, duration_only: bool, today: NaiveDate) -> Self {
        let started_today = entry
            .start
            .map(|start| start.with_timezone(&Local).date_naive() == today)
            .unwrap_or(false);

        if duration_only && started_today {
            Continuation::Resume(entry.resumed())
        } else {
            Continuation::StartNew(
                TimeEntryCreate::start(entry.description.clone(), entry.workspace_id)
                    .with_metadata_from(entry),
            )
        }
    }
}

/// Continue a stopped (or running) entry.
///
/// See [`Continuation::plan`] for which of resume or restart happens.
pub async fn continue_time_entry<A>(
    api: &A,
    entry: &TimeEntry,
    duration_only: bool,
) -> Result<TimeEntry>
where
    A: TimeEntryApi + ?Sized,
{
    let today = Local::now().date_naive();
    match Continuation::plan(entry, duration_only, today) {
        Continuation::Resume(resumed) => {
            debug!("Resuming time entry {} in place", entry.id);
            api.update_time_entry(&resumed).await
        }
        Continuation::StartNew(request) => {
            debug!("Continuing time entry {} as a new entry", entry.id);
            api.start_time_entry(request).await
        }
    }
}

/// Recreate `entry` as a running timer from its original start, then delete
/// the original.
///
/// If the delete fails the new entry already exists, so the error is
/// [`TimeEntryError::OldEntryNotDeleted`] carrying it; callers should retry
/// only the delete.
pub async fn unstop_time_entry<A>(api: &A, entry: &TimeEntry) -> Result<TimeEntry>
where
    A: TimeEntryApi + ?Sized,
{
    debug!("Unstopping time entry {}", entry.id);

    let mut request = TimeEntryCreate::start(entry.description.clone(), entry.workspace_id)
        .with_metadata_from(entry);
    request.start = entry.start;

    let created = api.start_time_entry(request).await?;

    if let Err(source) = api.delete_time_entry(entry).await {
        warn!(
            "Unstop of entry {} created entry {} but the delete failed: {}",
            entry.id, created.id, source
        );
        return Err(TimeEntryError::OldEntryNotDeleted {
            old_id: entry.id,
            created: Box::new(created),
            source: Box::new(source),
        }
        .into());
    }

    Ok(created)
}
