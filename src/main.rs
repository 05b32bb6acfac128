use inventory_ingest::{
    create_vendor_summary, load_directory, logging, IngestionOrchestrator, PipelineConfig, Store,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "inventory-ingest")]
#[command(about = "Load inventory CSVs into SQLite and build the vendor sales summary")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file (default: inventory.db)
    #[arg(long, global = true, env = "INVENTORY_DB")]
    database: Option<PathBuf>,

    /// Directory for log files (default: logs)
    #[arg(long, global = true, env = "INVENTORY_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Rows per ingestion batch (default: 10000)
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    /// Print the run report as JSON on stdout
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every CSV in the data directory into a table named after the file
    Ingest {
        /// Directory holding the CSV files (default: data)
        #[arg(short, long, env = "INVENTORY_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },
    /// Build the vendor sales summary table from the loaded tables
    Summary,
    /// Ingest, then build the summary
    All {
        /// Directory holding the CSV files (default: data)
        #[arg(short, long, env = "INVENTORY_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },
}

impl Commands {
    fn log_file(&self) -> &'static str {
        match self {
            Commands::Ingest { .. } => "ingestion_db.log",
            Commands::Summary => "get_vendor_summary.log",
            Commands::All { .. } => "pipeline.log",
        }
    }
}

fn resolve_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env().context("Invalid environment configuration")?;
    if let Some(ref db) = args.database {
        config.database_path = db.clone();
    }
    if let Some(ref dir) = args.log_dir {
        config.log_dir = dir.clone();
    }
    if let Some(size) = args.batch_size {
        config.batch_size = size;
    }
    if let Commands::Ingest { data_dir: Some(ref dir) } | Commands::All { data_dir: Some(ref dir) } =
        args.command
    {
        config.data_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &PipelineConfig) -> Result<serde_json::Value> {
    let mut store = Store::open(&config.database_path).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;
    let orchestrator = IngestionOrchestrator::with_options(config.ingestion_options());

    let report = match args.command {
        Commands::Ingest { .. } => {
            let load = load_directory(&mut store, &orchestrator, &config.data_dir)?;
            json!({ "ingest": load })
        }
        Commands::Summary => {
            let summary = create_vendor_summary(&mut store, &orchestrator)?;
            json!({ "summary": summary })
        }
        Commands::All { .. } => {
            let load = load_directory(&mut store, &orchestrator, &config.data_dir)?;
            let summary = create_vendor_summary(&mut store, &orchestrator)?;
            json!({ "ingest": load, "summary": summary })
        }
    };

    store.close().context("Failed to close database")?;
    Ok(report)
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    let log_path = logging::init(&config.log_dir, args.command.log_file())?;

    info!("Database: {}", config.database_path.display());
    info!("Logging to {}", log_path.display());

    match run(&args, &config) {
        Ok(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Ok(())
        }
        Err(e) => {
            error!("{:#}", e);
            Err(e)
        }
    }
}
