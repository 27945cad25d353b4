//! Concurrent fetching of paginated detailed reports.

use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::debug;

use super::api::ReportApi;
use super::models::DetailedReport;
use crate::error::Result;

/// Pages requested at once after the first one
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Fetch every page of a detailed report and merge them.
///
/// Page 1 tells how many pages exist; the rest are requested with up to
/// `max_concurrent` in flight. Entries keep page order. The first failing
/// page aborts the whole fetch.
pub async fn fetch_detailed_report<A>(
    api: &A,
    workspace_id: i64,
    since: NaiveDate,
    until: NaiveDate,
    max_concurrent: usize,
) -> Result<DetailedReport>
where
    A: ReportApi + ?Sized,
{
    let mut report = api
        .get_detailed_report(workspace_id, since, until, 1)
        .await?;

    let remaining = report.remaining_pages();
    if remaining.is_empty() {
        return Ok(report);
    }

    debug!(
        "Fetching {} more detailed report pages, {} at a time",
        remaining.len(),
        max_concurrent
    );

    let mut pages: Vec<(usize, DetailedReport)> = stream::iter(remaining)
        .map(|page| async move {
            let result = api.get_detailed_report(workspace_id, since, until, page).await?;
            debug!("Page {} returned {} entries", page, result.data.len());
            Ok::<_, crate::error::Error>((page, result))
        })
        .buffer_unordered(max_concurrent.max(1))
        .try_collect()
        .await?;

    pages.sort_by_key(|(page, _)| *page);
    for (_, page) in pages {
        report.data.extend(page.data);
    }

    Ok(report)
}
