use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use jiff::{Timestamp, Zoned};
use storemetrics::commands::{self, ChartArgs, GenerateArgs};
use storemetrics::{DATABASE_FILE, Settings, SqliteStore, init_logging};

#[derive(Parser, Debug)]
#[command(name = "storemetrics")]
#[command(about = "Synthetic retail metrics generator and chart reshaper")]
struct Args {
    /// Path to the data directory (default: ~/.storemetrics/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a domain dataset and store its documents
    Generate(GenerateArgs),
    /// Print chart data for a stored document as JSON
    Chart(ChartArgs),
    /// List stored documents
    List,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".storemetrics")
}

fn open_store(data_dir: &Path) -> color_eyre::Result<SqliteStore> {
    let path = data_dir.join(DATABASE_FILE);
    SqliteStore::open(&path).wrap_err_with(|| format!("failed to open {}", path.display()))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;
    let settings = Settings::load(&data_dir)?;

    match args.command {
        Command::Generate(generate) => {
            let ranges = settings.load_ranges(&data_dir)?;
            let mut store = open_store(&data_dir)?;
            let report =
                commands::generate(&mut store, &settings, &ranges, &generate, Timestamp::now())?;
            for meta in &report.documents {
                println!("{}  v{}", meta.key, meta.version);
            }
            if report.skipped > 0 {
                println!("{} contributions missing from composites (see log)", report.skipped);
            }
        }
        Command::Chart(chart) => {
            let store = open_store(&data_dir)?;
            let data = commands::chart(&store, &settings, &chart, Zoned::now().date())?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::List => {
            let store = open_store(&data_dir)?;
            for meta in commands::list(&store)? {
                println!(
                    "{}  v{}  created {}  updated {}",
                    meta.key, meta.version, meta.created_at, meta.updated_at
                );
            }
        }
    }

    tracing::info!("storemetrics finished");
    Ok(())
}
