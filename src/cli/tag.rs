//! Tag command implementations

use colored::Colorize;

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::client::TimeEntryApi;
use crate::client::models::TagAction;
use crate::error::{Error, Result};
use crate::output::json::format_json;

/// Add or remove `tag` on an entry, the running one unless `entry_id` is given.
pub async fn run(
    opts: &GlobalOptions,
    tag: &str,
    action: TagAction,
    entry_id: Option<i64>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let (workspace_id, entry_id) = match entry_id {
        Some(id) => (ctx.workspace_id().await?, id),
        None => {
            let running = ctx
                .client
                .get_current_time_entry()
                .await?
                .ok_or_else(|| Error::Other("No timer running; pass --entry".to_string()))?;
            (running.workspace_id, running.id)
        }
    };

    let entry = ctx
        .client
        .add_remove_tag(workspace_id, entry_id, tag, action)
        .await?;

    match ctx.format {
        OutputFormat::Table => {
            let verb = match action {
                TagAction::Add => "Tagged",
                TagAction::Remove => "Untagged",
            };
            println!(
                "{} {} '{}' ({})",
                "✓".green(),
                verb,
                entry.description.bold(),
                if entry.tags.is_empty() {
                    "no tags".to_string()
                } else {
                    entry.tags.join(", ")
                }
            );
        }
        OutputFormat::Json => println!("{}", format_json(&entry)?),
    }
    Ok(())
}
