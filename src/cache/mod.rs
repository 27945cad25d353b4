//! In-memory caching of Toggl resources
//!
//! [`ResourceCache`] memoizes decoded entities by resource kind, workspace
//! and id with a TTL. [`CachedTogglClient`] puts one in front of any
//! [`TogglApi`](crate::client::TogglApi) implementation.
//! Nothing is persisted; the cache lives and dies with the process.

pub mod client;
pub mod clock;
pub mod store;

// Re-export main types
pub use client::{CachedTogglClient, CacheReport};
pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{CacheStats, DEFAULT_TTL, ResourceCache};
