//! Init command implementation

use colored::Colorize;
use dialoguer::{Password, Select, theme::ColorfulTheme};

use crate::cli::GlobalOptions;
use crate::client::{AccountApi, TogglClient};
use crate::config::Config;
use crate::error::Result;

/// Prompt for an API token, verify it and pick a default workspace.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to togglop!".bold().green());
    println!("Your API token is at the bottom of https://track.toggl.com/profile\n");

    let api_token: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Toggl API token")
        .interact()?;

    let mut config = Config::load_or_default(opts.config_ref())?;

    println!("\n{}", "Checking token...".cyan());
    let client =
        TogglClient::with_options(api_token.clone(), config.client_options(opts.api_host_ref()))?;
    let account = client.get_account().await?;
    println!("{}", "✓ Token accepted".green());

    let workspace_id = match account.workspaces.as_slice() {
        [] => {
            println!("{}", "⚠ No workspaces found.".yellow());
            account.default_workspace_id
        }
        [only] => {
            println!("Using workspace {}", only.name.bold());
            Some(only.id)
        }
        workspaces => {
            let names: Vec<&str> = workspaces.iter().map(|w| w.name.as_str()).collect();
            let default_idx = workspaces
                .iter()
                .position(|w| Some(w.id) == account.default_workspace_id)
                .unwrap_or(0);
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Default workspace")
                .items(&names)
                .default(default_idx)
                .interact_opt()?;
            selection.map(|idx| workspaces[idx].id)
        }
    };

    config.api_token = Some(api_token);
    config.workspace_id = opts.workspace.or(workspace_id);
    if opts.api_host.is_some() {
        config.api_host = opts.api_host.clone();
    }
    config.save_at(opts.config_ref())?;

    let path = Config::resolve_path(opts.config_ref())?;
    println!("\n{} Configuration saved to: {}", "✓".green(), path.display());
    println!("\n{}", "Try:".bold());
    println!("  {} - start a timer", "togglop start \"Something\"".cyan());
    println!("  {} - see what is running", "togglop current".cyan());

    Ok(())
}
