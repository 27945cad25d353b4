//! togglop CLI - Toggl Track from the command line

use clap::Parser;
use log::LevelFilter;

use togglop::Result;
use togglop::cli::{
    self, Cli, ClientCommands, Commands, GlobalOptions, ProjectCommands, ReportCommands,
    TagCommands,
};
use togglop::client::models::TagAction;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Current => cli::timer::current(&opts).await,
        Commands::Start {
            description,
            project,
            billable,
        } => cli::timer::start(&opts, description, project, billable).await,
        Commands::Stop => cli::timer::stop(&opts).await,
        Commands::Continue { duration_only } => {
            cli::timer::continue_last(&opts, duration_only).await
        }
        Commands::Unstop => cli::timer::unstop(&opts).await,
        Commands::Entries { days } => cli::timer::entries(&opts, days).await,
        Commands::Tag(tag_cmd) => match tag_cmd {
            TagCommands::Add { tag, entry } => {
                cli::tag::run(&opts, &tag, TagAction::Add, entry).await
            }
            TagCommands::Remove { tag, entry } => {
                cli::tag::run(&opts, &tag, TagAction::Remove, entry).await
            }
        },
        Commands::Project(project_cmd) => match project_cmd {
            ProjectCommands::List { all } => cli::project::list(&opts, all).await,
            ProjectCommands::Create { name } => cli::project::create(&opts, &name).await,
        },
        Commands::Client(client_cmd) => match client_cmd {
            ClientCommands::List => cli::client::list(&opts).await,
            ClientCommands::Create { name } => cli::client::create(&opts, &name).await,
        },
        Commands::Report(report_cmd) => match report_cmd {
            ReportCommands::Summary { range } => cli::report::summary(&opts, &range).await,
            ReportCommands::Detailed { range } => cli::report::detailed(&opts, &range).await,
        },
    }
}
