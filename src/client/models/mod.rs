//! Toggl API data models
//!
//! Domain types returned by the Toggl Track and Reports APIs, organized by
//! resource type.

mod account;
mod client;
mod project;
mod report;
mod tag;
mod time_entry;

// Re-export all models for convenient access
pub use account::{Account, Workspace};
pub use client::Client;
pub use project::{Project, Task};
pub use report::{
    DetailedReport, DetailedTimeEntry, SummaryGroup, SummaryItem, SummaryReport, SummaryTitle,
};
pub use tag::Tag;
pub use time_entry::{RUNNING_DURATION, TagAction, TimeEntry, TimeEntryCreate};
