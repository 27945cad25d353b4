//! Client command implementations

use colored::Colorize;

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::client::WorkspaceApi;
use crate::client::models::Client;
use crate::error::Result;
use crate::output::json::format_json;
use crate::output::print_list;
use crate::output::rows::ClientRow;

pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let workspace_id = ctx.workspace_id().await?;

    let mut clients = ctx.client.get_clients(workspace_id).await?;
    clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    print_list::<Client, ClientRow>(&clients, ctx.format)
}

pub async fn create(opts: &GlobalOptions, name: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let workspace_id = ctx.workspace_id().await?;

    let client = ctx.client.create_client(workspace_id, name).await?;
    match ctx.format {
        OutputFormat::Table => println!(
            "{} Created client {} ({})",
            "✓".green(),
            client.name.bold(),
            client.id
        ),
        OutputFormat::Json => println!("{}", format_json(&client)?),
    }
    Ok(())
}
