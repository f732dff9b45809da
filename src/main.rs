//! Barcode Scanner - terminal front-end
//!
//! Looks up barcodes on Open Food Facts, runs the scan pipeline over frames
//! read from stdin, and shows or exports the saved files.

use barcode_scanner::config::{default_data_dir, Config, DEFAULT_CATALOG_URL};
use barcode_scanner::decode::text_image;
use barcode_scanner::display::{resolved_text, saved_files_report};
use barcode_scanner::export::export_files;
use barcode_scanner::{
    AnalysisLane, FramePool, LookupService, ScanError, ScanPipeline, StdoutSink,
    TextFrameDetector,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Barcode scanner - looks up products on Open Food Facts and records every response
#[derive(Parser, Debug)]
#[command(name = "barcode_scanner")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding api_responses.json and products.json
    #[arg(short, long, default_value_t = default_data_dir().to_string_lossy().to_string())]
    data_dir: String,

    /// Catalog base URL
    #[arg(long, default_value_t = DEFAULT_CATALOG_URL.to_string())]
    catalog_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a single barcode
    Lookup { barcode: String },
    /// Read frames from stdin, one per line; a line "reset" scans the next item
    Scan,
    /// Print the saved API responses and products
    Show,
    /// Copy the saved files to the downloads folder
    Export {
        /// Destination directory (default: downloads folder)
        #[arg(long)]
        dest: Option<PathBuf>,
    },
}

/// Frames the terminal front-end may hold at once
const FRAME_POOL_SIZE: usize = 4;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config {
        data_dir: PathBuf::from(&args.data_dir),
        catalog_url: args.catalog_url.clone(),
        request_timeout: Duration::from_secs(args.timeout_secs),
        ..Config::default()
    };
    log::debug!("Data directory: {}", config.data_dir.display());

    let result = match args.command {
        Command::Lookup { barcode } => run_lookup(&config, &barcode).await,
        Command::Scan => run_scan(&config).await,
        Command::Show => {
            println!(
                "{}",
                saved_files_report(&config.ledger_path(), &config.products_path())
            );
            Ok(())
        }
        Command::Export { dest } => run_export(Config {
            export_dir: dest,
            ..config
        }),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run_lookup(config: &Config, barcode: &str) -> barcode_scanner::Result<()> {
    let service = LookupService::from_config(config)?;
    let outcome = service.lookup(barcode).await;
    println!("{}", resolved_text(barcode, &outcome));
    Ok(())
}

async fn run_scan(config: &Config) -> barcode_scanner::Result<()> {
    let service = Arc::new(LookupService::from_config(config)?);
    let pipeline = Arc::new(ScanPipeline::new(
        Box::new(TextFrameDetector),
        service,
        Arc::new(StdoutSink),
        tokio::runtime::Handle::current(),
    ));
    let lane = AnalysisLane::spawn(Arc::clone(&pipeline))?;
    let pool = FramePool::new(FRAME_POOL_SIZE);

    log::info!("Scanning frames from stdin (\"reset\" to scan the next item)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("reset") {
            pipeline.reset();
            continue;
        }
        match pool.acquire(Some(text_image(line)), 0) {
            Some(frame) => {
                lane.offer(frame);
            }
            None => log::debug!("All frames in use, skipping input"),
        }
    }

    // Joining the worker blocks; keep it off the runtime threads
    if let Err(e) = tokio::task::spawn_blocking(move || lane.drain()).await {
        log::error!("Analysis lane did not stop cleanly: {}", e);
    }
    let outcomes = pipeline.wait_for_lookups().await;
    log::debug!("{} lookup(s) completed before exit", outcomes.len());
    pipeline.close();
    Ok(())
}

fn run_export(config: Config) -> barcode_scanner::Result<()> {
    let destination = config.export_dir().ok_or(ScanError::NoExportDir)?;
    let report = export_files(&config.ledger_path(), &config.products_path(), &destination)?;
    if report.copied.is_empty() {
        println!("Nothing to export yet");
    } else {
        println!("Files exported to:\n{}", report.destination.display());
    }
    Ok(())
}
