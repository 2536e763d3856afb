mod seed;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use artswipe_db::Database;

use crate::seed::Seeder;

#[derive(Parser, Debug)]
#[command(name = "artswipe-batch")]
#[command(about = "Seed an artswipe database with dummy data", long_about = None)]
struct Cli {
    /// SQLite database to seed
    #[arg(long, env = "ARTSWIPE_DB_PATH", default_value = "artswipe.db")]
    db_path: PathBuf,

    /// Number of dummy users
    #[arg(long, default_value_t = 100)]
    count: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Insert dummy users
    Users,
    /// Insert one work per dummy user
    Works,
    /// Like neighbouring users' works and form matches
    Matches,
    /// Insert reviews for existing matches
    Reviews,
    /// Run every seeder in order
    All,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artswipe=info".into()),
        )
        .init();

    let cli = Cli::parse();
    info!("Seeding {} ({:?})", cli.db_path.display(), cli.command);

    let db = Arc::new(Database::open(&cli.db_path)?);
    let seeder = Seeder::new(db, cli.count);

    match cli.command {
        Command::Users => {
            seeder.seed_users()?;
        }
        Command::Works => {
            seeder.seed_works()?;
        }
        Command::Matches => {
            seeder.seed_matches()?;
        }
        Command::Reviews => {
            seeder.seed_reviews()?;
        }
        Command::All => {
            seeder.seed_users()?;
            seeder.seed_works()?;
            seeder.seed_matches()?;
            seeder.seed_reviews()?;
        }
    }

    Ok(())
}
