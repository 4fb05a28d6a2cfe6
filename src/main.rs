use clap::Parser;
use gamesync::{Config, Error, RunOptions, Synchronizer};
use std::path::Path;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Updates game rows of a Notion database with storefront and playtime data.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration.
    #[arg(short, long, default_value = "config/config.toml")]
    config: String,

    /// Log the updates instead of writing them.
    #[arg(long)]
    dry_run: bool,

    /// Process at most this many rows on the configured platform.
    #[arg(long)]
    limit: Option<usize>,
}

/// Loads `env_file` (or `.env`) first, so it may set `RUST_LOG` for the returned filter.
fn load_env(env_file: Option<&Path>) -> (bool, EnvFilter) {
    let loaded = match env_file {
        Some(path) => dotenv::from_path(path).is_ok(),
        None => dotenv::dotenv().is_ok(),
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    (loaded, env_filter)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let (loaded, env_filter) = load_env(None);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();

    let args = Cli::parse();

    if loaded {
        info!("Loaded environment from .env.");
    }

    let mut config = Config::from_file(&args.config)?;
    config.apply_env();
    config.validate()?;

    let options = RunOptions {
        dry_run: args.dry_run,
        limit: args.limit,
    };

    let synchronizer = Synchronizer::new(&config)?;
    synchronizer.run(&options).await?;

    Ok(())
}
