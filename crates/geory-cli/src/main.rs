mod run;

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::run::{run_merge, MergeOptions};

#[derive(Debug, Parser)]
#[command(name = "geory-merge")]
#[command(about = "Merge Google Takeout location history into a Geory backup")]
#[command(version)]
struct Cli {
    /// Geory backup to merge into (JSON export)
    #[arg(long)]
    geory_database: PathBuf,
    /// Root of an unpacked Google Takeout archive
    #[arg(long)]
    google_takeout_dir: PathBuf,
    /// Reverse-geocoding cache file (overrides GEORY_PLACES_CACHE_PATH)
    #[arg(long)]
    places_cache: Option<PathBuf>,
    /// Where to write the merged backup (defaults to `<name>-merged.<ext>`
    /// beside the input)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Run the full merge but do not write the merged backup
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_options(self) -> MergeOptions {
        MergeOptions {
            database: self.geory_database,
            takeout_dir: self.google_takeout_dir,
            places_cache: self.places_cache,
            output: self.output,
            dry_run: self.dry_run,
        }
    }
}

/// Parses arguments, exiting with status 1 on a usage error.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Usage errors win over configuration errors.
    let cli = parse_cli();
    let config = geory_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let summary = run_merge(&config, cli.into_options()).await?;
    summary.print();

    Ok(())
}
