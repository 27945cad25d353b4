//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::{Config, TOKEN_ENV};
use crate::error::Result;

/// Show where configuration comes from and what is set, without network calls
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "togglop configuration".bold());

    let path = Config::resolve_path(opts.config_ref())?;
    let file = Config::load_at(opts.config_ref());
    let env_token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());

    let config = match file {
        Ok(config) => {
            println!("Config file: {}", path.display().to_string().cyan());
            config
        }
        Err(_) if env_token.is_some() => {
            println!("Config file: {} {}", path.display(), "(not found)".dimmed());
            Config::default()
        }
        Err(_) => {
            println!("{} Configuration not found at {}", "✗".red(), path.display());
            println!("\nRun {} to create one.", "togglop init".cyan());
            return Ok(());
        }
    };
    println!();

    if env_token.is_some() {
        println!("{} API token from {}", "✓".green(), TOKEN_ENV);
    } else if config.api_token.is_some() {
        println!("{} API token configured", "✓".green());
    } else {
        println!("{} API token not configured", "✗".red());
        println!("  → Run 'togglop init' or set {}", TOKEN_ENV);
    }

    match opts.workspace.or(config.workspace_id) {
        Some(id) => println!("{} Default workspace: {}", "✓".green(), id),
        None => println!(
            "{} No default workspace (the account default is used)",
            "○".dimmed()
        ),
    }

    println!(
        "{} Cache TTL: {}s",
        "○".dimmed(),
        config.cache_ttl().as_secs()
    );

    if let Some(host) = opts.api_host.as_ref().or(config.api_host.as_ref()) {
        println!("{} Custom API host: {}", "○".dimmed(), host.cyan());
    }

    println!();
    Ok(())
}
