//! Report command implementations

use chrono::{Duration, Local, NaiveDate};
use colored::Colorize;

use crate::cli::{CommandContext, DateRangeArgs, GlobalOptions, OutputFormat};
use crate::client::ReportApi;
use crate::client::models::{DetailedTimeEntry, SummaryGroup};
use crate::client::parallel::{DEFAULT_MAX_CONCURRENT, fetch_detailed_report};
use crate::error::{Error, Result};
use crate::output::format::format_millis;
use crate::output::json::format_json;
use crate::output::print_list;
use crate::output::rows::{DetailedRow, SummaryRow};

/// Resolve the range, defaulting to the last seven days including `today`.
fn resolve_range(range: &DateRangeArgs, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let until = range.until.unwrap_or(today);
    let since = range.since.unwrap_or(until - Duration::days(6));
    if since > until {
        return Err(Error::Other(format!(
            "--since {} is after --until {}",
            since, until
        )));
    }
    Ok((since, until))
}

fn print_total(total: Option<i64>, since: NaiveDate, until: NaiveDate) {
    println!(
        "{} {} → {}: {}",
        "Total".bold(),
        since,
        until,
        format_millis(total.unwrap_or(0))
    );
}

pub async fn summary(opts: &GlobalOptions, range: &DateRangeArgs) -> Result<()> {
    let (since, until) = resolve_range(range, Local::now().date_naive())?;
    let ctx = CommandContext::new(opts)?;
    let workspace_id = ctx.workspace_id().await?;

    let report = ctx
        .client
        .get_summary_report(workspace_id, since, until)
        .await?;

    match ctx.format {
        OutputFormat::Table => {
            print_list::<SummaryGroup, SummaryRow>(&report.data, ctx.format)?;
            print_total(report.total_grand, since, until);
        }
        OutputFormat::Json => println!("{}", format_json(&report)?),
    }
    Ok(())
}

pub async fn detailed(opts: &GlobalOptions, range: &DateRangeArgs) -> Result<()> {
    let (since, until) = resolve_range(range, Local::now().date_naive())?;
    let ctx = CommandContext::new(opts)?;
    let workspace_id = ctx.workspace_id().await?;

    let report = fetch_detailed_report(
        ctx.client.as_ref(),
        workspace_id,
        since,
        until,
        DEFAULT_MAX_CONCURRENT,
    )
    .await?;

    match ctx.format {
        OutputFormat::Table => {
            print_list::<DetailedTimeEntry, DetailedRow>(&report.data, ctx.format)?;
            print_total(report.total_grand, since, until);
        }
        OutputFormat::Json => println!("{}", format_json(&report)?),
    }
    Ok(())
}
