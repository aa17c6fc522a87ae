//! mcb-catalog - Music CD batch cataloging
//!
//! Subcommands:
//! - `process` - find or build a record for each CD in a TSV batch file
//! - `count` - count records in a binary MARC file
//! - `oclc-numbers` - list the OCLC numbers in a binary MARC file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mcb_catalog::config::{resolve_discogs_token, resolve_worldcat_credentials};
use mcb_catalog::sources::{DiscogsClient, MusicBrainzClient, WorldcatClient};
use mcb_catalog::workflow::{
    count_records, oclc_numbers, read_batch, select_rows, BatchPaths, BatchRunner, ItemProcessor,
    MarcFiles, ProcessingDates, TracingReviewSink, DEFAULT_ITEM_PAUSE,
};
use mcb_common::config::{LoggingConfig, TomlConfig};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for mcb-catalog
#[derive(Parser, Debug)]
#[command(name = "mcb-catalog")]
#[command(about = "Find or create catalog records for a batch of music CDs")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a TSV batch file (columns: UPC, call number, barcode, title)
    Process {
        /// Path to the TSV batch file
        music_data_file: PathBuf,

        /// First row to process (0-based)
        #[arg(short = 's', long = "start-index", default_value_t = 0)]
        start_index: usize,

        /// Row to stop before (0-based, exclusive)
        #[arg(short = 'e', long = "end-index")]
        end_index: Option<usize>,

        /// Log level (trace, debug, info, warn, error); overrides the config file
        #[arg(long)]
        log_level: Option<String>,

        /// Config file path
        #[arg(long, env = "MCB_CONFIG")]
        config: Option<PathBuf>,

        /// Add the missing container insert note to every record
        #[arg(long)]
        lacks_container_insert: bool,

        /// Directory for output records and the log file
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Count the records in a binary MARC file
    Count {
        marc_file: PathBuf,
    },

    /// Print the OCLC number of each record in a binary MARC file
    OclcNumbers {
        marc_file: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Process {
            music_data_file,
            start_index,
            end_index,
            log_level,
            config,
            lacks_container_insert,
            output_dir,
        } => {
            let loaded = TomlConfig::resolve_and_load(config.as_deref())
                .context("Failed to load configuration")?;
            let paths = BatchPaths::for_input(&music_data_file, &output_dir);
            init_tracing(&loaded.config.logging, log_level.as_deref(), &paths.log)?;
            loaded.outcome.log();

            process(
                &loaded.config,
                &music_data_file,
                &paths,
                start_index,
                end_index,
                lacks_container_insert,
            )
            .await
        }
        Command::Count { marc_file } => {
            let count = count_records(&marc_file)
                .with_context(|| format!("Failed to read {}", marc_file.display()))?;
            println!("{}", count);
            Ok(())
        }
        Command::OclcNumbers { marc_file } => {
            let numbers = oclc_numbers(&marc_file)
                .with_context(|| format!("Failed to read {}", marc_file.display()))?;
            for number in numbers {
                println!("{}", number);
            }
            Ok(())
        }
    }
}

async fn process(
    toml_config: &TomlConfig,
    music_data_file: &Path,
    paths: &BatchPaths,
    start_index: usize,
    end_index: Option<usize>,
    lacks_container_insert: bool,
) -> Result<()> {
    info!("Starting mcb-catalog {}", env!("CARGO_PKG_VERSION"));
    info!("Batch file: {}", music_data_file.display());

    let items = read_batch(music_data_file)
        .with_context(|| format!("Failed to read batch file {}", music_data_file.display()))?;
    let selected = select_rows(&items, start_index, end_index);
    info!("Processing {} of {} rows", selected.len(), items.len());

    let worldcat = resolve_worldcat_credentials(toml_config)?;
    let discogs_token = resolve_discogs_token(toml_config)?;

    let catalog = WorldcatClient::new(worldcat.client_id, worldcat.client_secret)
        .context("Failed to create WorldCat client")?;
    let discogs = DiscogsClient::new(discogs_token).context("Failed to create Discogs client")?;
    let musicbrainz = MusicBrainzClient::new().context("Failed to create MusicBrainz client")?;

    let processor = ItemProcessor::new(
        Arc::new(catalog),
        Arc::new(discogs),
        Arc::new(musicbrainz),
        Arc::new(TracingReviewSink),
        toml_config.local_fields.clone(),
        ProcessingDates::on(mcb_common::time::today()),
    )
    .with_lacks_container_insert(lacks_container_insert);

    let files = MarcFiles::from_paths(paths);
    let pause = toml_config
        .request_pause_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_ITEM_PAUSE);

    let summary = BatchRunner::new(&processor, &files)
        .with_pause(pause)
        .run(selected, start_index.min(items.len()))
        .await;

    info!(
        "Records written to {} and {}",
        paths.catalog_records.display(),
        paths.original_records.display()
    );
    println!(
        "{} rows: {} cataloged, {} synthesized, {} held locally, {} without source, {} failed",
        summary.total(),
        summary.cataloged,
        summary.synthesized,
        summary.duplicates,
        summary.no_source,
        summary.failed
    );
    Ok(())
}

/// Log to `{stem}.log` (no ANSI colors), or to stderr when configured
fn init_tracing(logging: &LoggingConfig, cli_level: Option<&str>, log_path: &Path) -> Result<()> {
    let logging = match cli_level {
        Some(level) => LoggingConfig {
            level: level.to_string(),
            ..logging.clone()
        },
        None => logging.clone(),
    };
    let level = logging.validated_level()?;
    let filter = EnvFilter::new(format!("{},reqwest=warn,hyper=warn", level));

    if logging.stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }
    Ok(())
}
