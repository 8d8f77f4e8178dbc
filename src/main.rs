//! ewm-server admin CLI
//!
//! Main application entry point

use std::sync::Arc;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use ewm_server::{
    config::Settings,
    database::{create_pool, run_migrations, DatabaseService},
    handlers::{handle_command, Command},
    services::{HttpStatsClient, ServiceFactory},
    utils::logging,
};

#[derive(Parser)]
#[command(name = "ewm-server", version)]
#[command(about = "Administer events and participation requests")]
struct Cli {
    /// Settings file, extension optional
    #[arg(long, default_value = "config")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    #[command(flatten)]
    Service(Command),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::from_file(&cli.config).context("failed to load settings")?;
    settings.validate()?;

    // Keep the guard alive so the file writer flushes on exit
    let _guard = logging::init_logging(&settings.logging)?;
    info!("Starting {}", ewm_server::info());

    info!("Connecting to database...");
    let pool = create_pool(&settings.database).await?;

    let command = match cli.command {
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("{}", serde_json::json!({ "migrated": true }));
            return Ok(());
        }
        Commands::Service(command) => command,
    };

    let database = DatabaseService::new(pool);
    let stats = HttpStatsClient::new(&settings.stats)?;
    let page_size = settings.events.default_page_size;
    let services = ServiceFactory::new(settings, database.stores(), Arc::new(stats));

    match handle_command(&services, command, page_size).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, kind = ?e.kind(), severity = %e.severity(), "Command failed");
            Err(e.into())
        }
    }
}
