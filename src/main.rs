//! EXIF Streamer - print image metadata as JSON.
//!
//! Reads a JPEG or TIFF file (or base64 string), fetching only the byte
//! ranges that hold metadata, and writes the decoded blocks to stdout.
//! Logs go to stderr.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exif_streamer::{
    config::{Config, Options},
    error::ParseError,
    io::{FileRangeReader, MemoryRangeReader, RangeReader},
    metadata::{MetadataReader, ParseReport},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let options = config.to_options();
    debug!(?options, "Decoder options");

    let result = if let Some(path) = &config.input {
        match FileRangeReader::open(path).await {
            Ok(reader) => read(reader, options).await,
            Err(e) => Err(e.into()),
        }
    } else {
        match MemoryRangeReader::from_base64(config.base64.as_deref().unwrap_or_default()) {
            Ok(reader) => read(reader, options).await,
            Err(e) => Err(e.into()),
        }
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to read metadata: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for block_error in &report.errors {
        warn!("{}", block_error);
    }

    if let Err(e) = print_report(&report, config.compact) {
        error!("Failed to write output: {}", e);
        return ExitCode::FAILURE;
    }

    if report.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn read<R: RangeReader>(
    reader: R,
    options: Options,
) -> Result<ParseReport, ParseError> {
    MetadataReader::new(reader, options).read().await
}

/// Print the decoded output, or `null` when there is none.
fn print_report(report: &ParseReport, compact: bool) -> Result<(), serde_json::Error> {
    let json = if compact {
        serde_json::to_string(&report.output)?
    } else {
        serde_json::to_string_pretty(&report.output)?
    };
    println!("{}", json);
    Ok(())
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "exif_streamer=debug"
    } else {
        "exif_streamer=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
