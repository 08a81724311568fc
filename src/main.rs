use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use moneytrack::{
    config::{database, settings},
    core::{
        recurring::{self, RecurringEngine, format_generation_summary},
        store::SeaOrmStore,
    },
    errors::Result,
    models::MonthKey,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "moneytrack",
    about = "Generates the due instances of recurring transactions."
)]
struct Cli {
    /// Settings file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Defaults to a catch-up as of now
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Catch every template up to an instant
    Due {
        /// Wall-clock cutoff, e.g. 2025-03-01T08:00:00 (defaults to now)
        #[arg(long = "as-of")]
        as_of: Option<NaiveDateTime>,
    },
    /// Generate the occurrence of every monthly template in one month
    Month {
        /// Target month as YYYY-MM
        month: MonthKey,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenv().ok();
    let settings = settings::load_settings(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Connected to database"))
        .inspect_err(|e| error!("Failed to connect to {}: {}", database_url, e))?;
    database::create_tables(&db).await?;

    let calendar = settings.calendar.calendar();
    let report = match cli.command {
        None => recurring::catch_up(&db, calendar, Local::now().naive_local()).await,
        Some(Commands::Due { as_of }) => {
            let now = as_of.unwrap_or_else(|| Local::now().naive_local());
            recurring::catch_up(&db, calendar, now).await
        }
        Some(Commands::Month { month }) => {
            RecurringEngine::new(SeaOrmStore::new(&db), calendar)
                .generate_for_month(month)
                .await
        }
    }
    .inspect_err(|e| error!("Recurring generation failed: {}", e))?;

    info!("{}", format_generation_summary(&report).trim_end());
    Ok(())
}
