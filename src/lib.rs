//! togglop - Toggl Track client library
//!
//! Typed access to the Toggl Track and Reports APIs, an in-memory resource
//! cache in front of them, and the continue/unstop time entry workflows.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod resource;

pub use error::{Error, Result};
