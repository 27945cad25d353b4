//! API trait definitions split by responsibility
//!
//! This module organizes the Toggl API surface into focused sub-traits:
//! - [`AccountApi`] - The authenticated user's account
//! - [`TimeEntryApi`] - Timer and time entry operations
//! - [`WorkspaceApi`] - Projects, tags and clients of a workspace
//! - [`ReportApi`] - Reports API
//!
//! The [`TogglApi`](super::TogglApi) super-trait combines all four.

mod account;
mod report;
mod time_entry;
mod workspace;

pub use account::AccountApi;
pub use report::ReportApi;
pub use time_entry::TimeEntryApi;
pub use workspace::WorkspaceApi;
