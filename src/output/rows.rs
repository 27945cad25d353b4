//! Table rows for API types

use chrono::Utc;
use tabled::Tabled;

use super::format::{elapsed_seconds, format_duration, format_local, format_millis};
use crate::client::models::{Client, DetailedTimeEntry, Project, SummaryGroup, TimeEntry};

#[derive(Debug, Clone, Tabled)]
pub struct EntryRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
    #[tabled(rename = "START")]
    pub start: String,
    #[tabled(rename = "STOP")]
    pub stop: String,
    #[tabled(rename = "DURATION")]
    pub duration: String,
    #[tabled(rename = "TAGS")]
    pub tags: String,
}

impl From<&TimeEntry> for EntryRow {
    fn from(entry: &TimeEntry) -> Self {
        let stop = if entry.is_running() {
            "running".to_string()
        } else {
            format_local(entry.stop_time())
        };
        Self {
            id: entry.id,
            description: entry.description.clone(),
            start: format_local(entry.start),
            stop,
            duration: format_duration(elapsed_seconds(entry, Utc::now())),
            tags: entry.tags.join(", "),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct ProjectRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "CLIENT")]
    pub client_id: String,
    #[tabled(rename = "ACTIVE")]
    pub active: String,
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            client_id: project
                .client_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            active: if project.is_active() { "yes" } else { "no" }.to_string(),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct ClientRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "ARCHIVED")]
    pub archived: String,
}

impl From<&Client> for ClientRow {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            archived: if client.archived { "yes" } else { "no" }.to_string(),
        }
    }
}

/// One project line of a summary report
#[derive(Debug, Clone, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "PROJECT")]
    pub project: String,
    #[tabled(rename = "CLIENT")]
    pub client: String,
    #[tabled(rename = "TIME")]
    pub time: String,
}

impl From<&SummaryGroup> for SummaryRow {
    fn from(group: &SummaryGroup) -> Self {
        Self {
            project: group
                .title
                .project
                .clone()
                .unwrap_or_else(|| "(no project)".to_string()),
            client: group.title.client.clone().unwrap_or_else(|| "-".to_string()),
            time: format_millis(group.time),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct DetailedRow {
    #[tabled(rename = "START")]
    pub start: String,
    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
    #[tabled(rename = "PROJECT")]
    pub project: String,
    #[tabled(rename = "TIME")]
    pub time: String,
}

impl From<&DetailedTimeEntry> for DetailedRow {
    fn from(entry: &DetailedTimeEntry) -> Self {
        Self {
            start: format_local(entry.start),
            description: entry.description.clone(),
            project: entry.project.clone().unwrap_or_else(|| "-".to_string()),
            time: format_millis(entry.dur),
        }
    }
}
