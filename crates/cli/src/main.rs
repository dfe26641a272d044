use clap::Parser;
use file_adapter::FileReportSource;
use listing_core::ports::{RecordSink, ReportSource};
use listing_core::{FormatErrorPolicy, IngestionServiceImpl, ListingError};
use sqlite_adapter::SqliteRecordSink;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// CLI tool to load a VMS directory listing into a SQLite table
#[derive(Parser, Debug)]
#[command(name = "vms2sqlite")]
#[command(about = "Parses a VMS DIRECTORY listing and stores one row per file in a SQLite FILES table")]
struct Cli {
    /// Path to the directory-listing text file
    #[arg(short = 'i', long = "input", default_value = "Directory Listings/DIR_LISTING.TXT")]
    input: PathBuf,

    /// Path of the SQLite database to write
    #[arg(short = 'o', long = "output-db", default_value = "DIRINFO.db")]
    output_db: PathBuf,

    /// Abort without writing anything if a record has an unparseable date or time
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Suppress non-error messages
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    quiet: bool,

    /// Increase verbosity
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    // stdout stays free for the summary line
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Fails with the same error the file adapter raises, before the database
/// file gets created.
fn check_input(input: &Path) -> Result<(), ListingError> {
    if input.is_file() {
        Ok(())
    } else {
        Err(ListingError::SourceNotFound(input.to_path_buf()))
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let policy = if cli.strict {
        FormatErrorPolicy::Abort
    } else {
        FormatErrorPolicy::Skip
    };

    if let Err(e) = check_input(&cli.input) {
        eprintln!("Error during ingestion: {}", e);
        std::process::exit(1);
    }

    // Instantiate concrete implementations of secondary adapters
    let report_source: Box<dyn ReportSource> = Box::new(FileReportSource::new(cli.input.clone()));
    let record_sink: Box<dyn RecordSink> = match SqliteRecordSink::open(&cli.output_db) {
        Ok(sink) => Box::new(sink),
        Err(e) => {
            eprintln!("Cannot open database {}: {}", cli.output_db.display(), e);
            std::process::exit(1);
        }
    };

    // Instantiate the core business service with dependency injection
    let service = IngestionServiceImpl::new(report_source, record_sink).with_policy(policy);

    info!(input = %cli.input.display(), output = %cli.output_db.display(), ?policy, "starting ingestion");

    match service.execute_ingestion() {
        Ok(summary) => {
            println!(
                "Stored {} files from {} directories in {} ({} skipped)",
                summary.records,
                summary.chunks,
                cli.output_db.display(),
                summary.skipped
            );
        }
        Err(e) => {
            eprintln!("Error during ingestion: {}", e);
            std::process::exit(1);
        }
    }
}
