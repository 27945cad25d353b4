//! Reports API models

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary report grouped by project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Total tracked milliseconds
    #[serde(default)]
    pub total_grand: Option<i64>,
    #[serde(default)]
    pub data: Vec<SummaryGroup>,
}

/// One project group of a summary report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryGroup {
    #[serde(default)]
    pub id: Option<i64>,
    /// Milliseconds tracked in this group
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub title: SummaryTitle,
    #[serde(default)]
    pub items: Vec<SummaryItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryTitle {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub hex_color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryItem {
    #[serde(default)]
    pub title: HashMap<String, Option<String>>,
    #[serde(default)]
    pub time: i64,
}

/// One page of a detailed report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailedReport {
    #[serde(default)]
    pub total_grand: Option<i64>,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub per_page: usize,
    #[serde(default)]
    pub data: Vec<DetailedTimeEntry>,
}

impl DetailedReport {
    /// Page numbers after the first one needed to cover `total_count`.
    pub fn remaining_pages(&self) -> Vec<usize> {
        if self.per_page == 0 {
            return Vec::new();
        }
        let total_pages = self.total_count.div_ceil(self.per_page);
        (2..=total_pages).collect()
    }
}

/// Time entry as reported by the detailed report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailedTimeEntry {
    pub id: i64,
    #[serde(default)]
    pub pid: Option<i64>,
    #[serde(default)]
    pub tid: Option<i64>,
    #[serde(default)]
    pub uid: i64,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub project_color: Option<String>,
    #[serde(default)]
    pub project_hex_color: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    /// Milliseconds
    #[serde(default)]
    pub dur: i64,
    #[serde(default)]
    pub billable: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}
