mod profile;
mod render;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::profile::{run_profile_check, ProfileArgs};
use crate::search::{run_search, SearchArgs};

#[derive(Debug, Parser)]
#[command(name = "scout")]
#[command(about = "Job-search assistant: stream a scouting run and print the matched roles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Submit a search and print the final report
    Search(SearchArgs),
    /// Candidate profile commands
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileCommands {
    /// Check that every profile section is filled in
    Check(ProfileArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = scout_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Search(args) => run_search(&config, &args).await,
        Commands::Profile {
            command: ProfileCommands::Check(args),
        } => run_profile_check(&args),
    }
}
