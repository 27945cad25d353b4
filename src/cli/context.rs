//! Command execution context
//!
//! Loads configuration, validates the token and builds the cached API client
//! once for every command that talks to Toggl.

use std::sync::Arc;

use log::debug;

use crate::cache::CachedTogglClient;
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{AccountApi, TogglClient};
use crate::config::Config;
use crate::error::{ConfigError, Result};

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded configuration with environment overrides applied
    pub config: Config,
    /// API client with resource caching
    pub client: Arc<CachedTogglClient<TogglClient>>,
    /// Output format preference
    pub format: OutputFormat,
    workspace_override: Option<i64>,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// A missing config file is fine as long as `TOGGL_API_TOKEN` is set.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_or_default(opts.config_ref())?.with_env_overrides();
        let token = config.require_api_token()?.to_string();

        let options = config.client_options(opts.api_host_ref());
        debug!("Using Toggl API at {}", options.api_base_url);
        let raw_client = TogglClient::with_options(token, options)?;
        let client = Arc::new(CachedTogglClient::with_ttl(raw_client, config.cache_ttl()));

        Ok(Self {
            config,
            client,
            format: opts.format,
            workspace_override: opts.workspace,
        })
    }

    /// Workspace from the flag or config, falling back to the account default.
    pub async fn workspace_id(&self) -> Result<i64> {
        if let Some(id) = self.workspace_override.or(self.config.workspace_id) {
            return Ok(id);
        }

        debug!("No workspace configured, asking the account for its default");
        let account = self.client.get_account().await?;
        account
            .default_workspace_id
            .or_else(|| account.workspaces.first().map(|w| w.id))
            .ok_or_else(|| ConfigError::MissingWorkspace.into())
    }
}

impl Drop for CommandContext {
    fn drop(&mut self) {
        debug!("Cache statistics: {:?}", self.client.cache_stats());
    }
}
