//! Reports API trait

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::client::models::{DetailedReport, SummaryReport};
use crate::error::Result;

/// Read-only reporting operations
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// Time per project between two dates (inclusive).
    async fn get_summary_report(
        &self,
        workspace_id: i64,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<SummaryReport>;

    /// One page (1-based) of individual entries between two dates.
    async fn get_detailed_report(
        &self,
        workspace_id: i64,
        since: NaiveDate,
        until: NaiveDate,
        page: usize,
    ) -> Result<DetailedReport>;
}
