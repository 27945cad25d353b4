//! Timer commands: current, start, stop, continue, unstop, entries

use chrono::{Days, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use colored::Colorize;
use log::debug;

use crate::cli::project::resolve_project;
use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::client::models::{TimeEntry, TimeEntryCreate};
use crate::client::{TimeEntryApi, continue_time_entry, unstop_time_entry};
use crate::error::{Error, Result, TimeEntryError};
use crate::output::format::{elapsed_seconds, format_duration};
use crate::output::json::format_json;
use crate::output::print_list;
use crate::output::rows::EntryRow;

/// How far back continue and unstop look for the latest entry
const LOOKBACK_DAYS: i64 = 14;

fn print_entry(format: OutputFormat, headline: &str, entry: &TimeEntry) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let elapsed = format_duration(elapsed_seconds(entry, Utc::now()));
            println!("{} {} [{}]", headline.green(), entry.description.bold(), elapsed);
            println!("  id {}", entry.id);
            if !entry.tags.is_empty() {
                println!("  tags {}", entry.tags.join(", "));
            }
        }
        OutputFormat::Json => println!("{}", format_json(entry)?),
    }
    Ok(())
}

fn print_nothing_running(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", "No timer running.".dimmed()),
        OutputFormat::Json => println!("{}", format_json(&Option::<TimeEntry>::None)?),
    }
    Ok(())
}

/// Most recently started stopped entry within the lookback window.
async fn latest_stopped_entry(ctx: &CommandContext) -> Result<Option<TimeEntry>> {
    let now = Utc::now();
    let entries = ctx
        .client
        .get_time_entries(now - Duration::days(LOOKBACK_DAYS), now + Duration::minutes(1))
        .await?;
    Ok(entries
        .into_iter()
        .filter(|e| !e.is_running())
        .max_by_key(|e| e.start))
}

pub async fn current(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    match ctx.client.get_current_time_entry().await? {
        Some(entry) => print_entry(ctx.format, "Running:", &entry),
        None => print_nothing_running(ctx.format),
    }
}

pub async fn start(
    opts: &GlobalOptions,
    description: String,
    project: Option<String>,
    billable: bool,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let workspace_id = ctx.workspace_id().await?;

    let mut request = TimeEntryCreate::start(description, workspace_id).with_billable(billable);
    if let Some(project) = project {
        let project = resolve_project(&ctx, workspace_id, &project).await?;
        debug!("Starting under project {} ({})", project.name, project.id);
        request = request.with_project(project.id);
    }

    let entry = ctx.client.start_time_entry(request).await?;
    print_entry(ctx.format, "Started:", &entry)
}

pub async fn stop(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let Some(running) = ctx.client.get_current_time_entry().await? else {
        return print_nothing_running(ctx.format);
    };

    let stopped = ctx.client.stop_time_entry(&running).await?;
    print_entry(ctx.format, "Stopped:", &stopped)
}

pub async fn continue_last(opts: &GlobalOptions, duration_only: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    if let Some(running) = ctx.client.get_current_time_entry().await? {
        return Err(TimeEntryError::InvalidState(format!(
            "'{}' is still running; stop it first",
            running.description
        ))
        .into());
    }

    let Some(last) = latest_stopped_entry(&ctx).await? else {
        return Err(Error::Other(format!(
            "No time entries in the last {} days to continue",
            LOOKBACK_DAYS
        )));
    };

    let entry = continue_time_entry(ctx.client.as_ref(), &last, duration_only).await?;
    print_entry(ctx.format, "Continued:", &entry)
}

pub async fn unstop(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    if let Some(running) = ctx.client.get_current_time_entry().await? {
        return Err(TimeEntryError::InvalidState(format!(
            "'{}' is already running",
            running.description
        ))
        .into());
    }

    let Some(last) = latest_stopped_entry(&ctx).await? else {
        return Err(Error::Other(format!(
            "No stopped time entries in the last {} days",
            LOOKBACK_DAYS
        )));
    };

    match unstop_time_entry(ctx.client.as_ref(), &last).await {
        Ok(entry) => print_entry(ctx.format, "Unstopped:", &entry),
        Err(Error::TimeEntry(TimeEntryError::OldEntryNotDeleted {
            old_id,
            created,
            source,
        })) => {
            print_entry(ctx.format, "Unstopped:", &created)?;
            eprintln!(
                "{} Entry {} could not be deleted ({}); delete it manually.",
                "⚠".yellow(),
                old_id,
                source
            );
            Err(TimeEntryError::OldEntryNotDeleted {
                old_id,
                created,
                source,
            }
            .into())
        }
        Err(e) => Err(e),
    }
}

/// First calendar day of an `entries --days` listing ending `today`.
fn first_listed_day(today: NaiveDate, days: u32) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(u64::from(days.max(1)) - 1))
        .ok_or_else(|| Error::Other(format!("--days {} reaches before the calendar", days)))
}

pub async fn entries(opts: &GlobalOptions, days: u32) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let first_day = first_listed_day(Local::now().date_naive(), days)?;
    let since = Local
        .from_local_datetime(&first_day.and_time(NaiveTime::MIN))
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| first_day.and_time(NaiveTime::MIN).and_utc());

    let mut entries = ctx
        .client
        .get_time_entries(since, Utc::now() + Duration::minutes(1))
        .await?;
    entries.sort_by_key(|e| e.start);

    print_list::<TimeEntry, EntryRow>(&entries, ctx.format)
}
