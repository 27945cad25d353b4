//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod args;
pub mod client;
pub mod context;
pub mod init;
pub mod project;
pub mod report;
pub mod status;
pub mod tag;
pub mod timer;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// Upper bound for `entries --days`
pub const MAX_ENTRY_DAYS: i64 = 3660;

/// togglop - Toggl Track from the command line
#[derive(Parser, Debug)]
#[command(name = "togglop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "TOGGLOP_FORMAT",
        default_value = "table",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override default workspace
    #[arg(long, global = true, env = "TOGGLOP_WORKSPACE", hide_env = true)]
    pub workspace: Option<i64>,

    /// Override config file location
    #[arg(long, global = true, env = "TOGGLOP_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "TOGGLOP_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Custom API host (development/testing)
    #[arg(long, global = true, env = "TOGGLOP_API_HOST", hide = true)]
    pub api_host: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize togglop configuration
    Init,

    /// Show configuration status
    Status,

    /// Show the running time entry
    Current,

    /// Start a new timer
    Start {
        /// What you are working on
        description: String,

        /// Project ID or name
        #[arg(long, short = 'p')]
        project: Option<String>,

        /// Mark the entry billable
        #[arg(long)]
        billable: bool,
    },

    /// Stop the running timer
    Stop,

    /// Continue the most recent time entry
    Continue {
        /// Resume today's entry in place instead of starting a new one
        #[arg(long)]
        duration_only: bool,
    },

    /// Restart the most recent stopped entry from its original start
    Unstop,

    /// List recent time entries
    Entries {
        /// Number of days to include, today counting as one
        #[arg(
            long,
            short = 'd',
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..=MAX_ENTRY_DAYS)
        )]
        days: u32,
    },

    /// Add or remove tags on a time entry
    #[command(subcommand)]
    Tag(TagCommands),

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Manage clients
    #[command(subcommand)]
    Client(ClientCommands),

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),
}

/// Tag subcommands
#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Add a tag
    Add {
        tag: String,

        /// Time entry ID (defaults to the running entry)
        #[arg(long)]
        entry: Option<i64>,
    },

    /// Remove a tag
    Remove {
        tag: String,

        /// Time entry ID (defaults to the running entry)
        #[arg(long)]
        entry: Option<i64>,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects of the workspace
    List {
        /// Include archived and deleted projects
        #[arg(long)]
        all: bool,
    },

    /// Create a project
    Create { name: String },
}

/// Client subcommands
#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// List clients of the workspace
    List,

    /// Create a client
    Create { name: String },
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Time per project
    Summary {
        #[command(flatten)]
        range: DateRangeArgs,
    },

    /// Every entry in the range
    Detailed {
        #[command(flatten)]
        range: DateRangeArgs,
    },
}

/// Date range of a report
#[derive(Debug, Clone, clap::Args)]
pub struct DateRangeArgs {
    /// First day (YYYY-MM-DD), defaults to six days before --until
    #[arg(long)]
    pub since: Option<chrono::NaiveDate>,

    /// Last day (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub until: Option<chrono::NaiveDate>,
}
