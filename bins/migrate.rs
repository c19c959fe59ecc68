use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tracing::info;

/// Apply or roll back the database schema from the command line.
#[derive(Parser)]
#[command(name = "migrate", about = "Database migration runner")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply all pending migrations (default)
    Up,
    /// Roll back the most recent migration
    Down,
    /// Drop everything and re-apply from scratch
    Fresh,
    /// Show applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let cli = Cli::parse();
    let db = models::db::connect().await?;

    match cli.command.unwrap_or(Command::Up) {
        Command::Up => {
            info!("applying pending migrations");
            Migrator::up(&db, None).await?;
        }
        Command::Down => {
            info!("rolling back one migration");
            Migrator::down(&db, Some(1)).await?;
        }
        Command::Fresh => {
            info!("dropping schema and re-applying all migrations");
            Migrator::fresh(&db).await?;
        }
        Command::Status => {
            Migrator::status(&db).await?;
        }
    }
    Ok(())
}
