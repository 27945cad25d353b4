//! Toggl API client
//!
//! [`TogglApi`] is the transport boundary: [`TogglClient`] talks HTTP to the
//! Toggl Track v9 and Reports v2 APIs, [`crate::cache::CachedTogglClient`]
//! memoizes reads in front of any implementation, and the test mock stands
//! in for both. [`lifecycle`] builds the continue/unstop recoveries on top.

pub mod api;
pub mod lifecycle;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod parallel;
pub mod toggl;

pub use api::{AccountApi, ReportApi, TimeEntryApi, WorkspaceApi};
pub use lifecycle::{Continuation, continue_time_entry, unstop_time_entry};
#[cfg(test)]
pub use mock::MockTogglClient;
pub use parallel::fetch_detailed_report;
pub use toggl::{ClientOptions, TogglClient};

/// The complete Toggl API surface.
///
/// Automatically implemented for any type implementing all sub-traits.
pub trait TogglApi: AccountApi + TimeEntryApi + WorkspaceApi + ReportApi {}

impl<T: AccountApi + TimeEntryApi + WorkspaceApi + ReportApi> TogglApi for T {}
