//! Tilepull CLI - Command-line interface
//!
//! Thin wrapper around the `tilepull` library: parses arguments, sets up
//! logging and the async runtime, and runs one download session.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tilepull::config::{DEFAULT_REFERER, DEFAULT_USER_AGENT};
use tilepull::provider::{AmapProvider, ReqwestClient};
use tilepull::{BoundingBox, DownloadConfig, DownloadSession};

/// Bulk-download map tiles covering a bounding box.
#[derive(Parser, Debug)]
#[command(name = "tilepull", version, about)]
struct Cli {
    /// First zoom level to download (inclusive)
    #[arg(long, default_value_t = 13)]
    zoom_start: u8,

    /// Last zoom level to download (inclusive)
    #[arg(long, default_value_t = 13)]
    zoom_end: u8,

    /// Root directory of the tile store
    #[arg(long, short, default_value = "./shanghai_tiles")]
    output: PathBuf,

    /// Maximum number of concurrent downloads
    #[arg(long, short, default_value_t = 6)]
    concurrency: usize,

    /// Pause between request submissions, in seconds
    #[arg(long, default_value_t = 0.2)]
    interval: f64,

    /// Re-download tiles that already exist on disk
    #[arg(long)]
    overwrite: bool,

    /// User-Agent header sent to the tile server
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Referer header sent to the tile server
    #[arg(long, default_value = DEFAULT_REFERER)]
    referer: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.concurrency == 0 {
        error!("--concurrency must be at least 1");
        return ExitCode::FAILURE;
    }
    if cli.zoom_start > cli.zoom_end {
        error!(
            zoom_start = cli.zoom_start,
            zoom_end = cli.zoom_end,
            "empty zoom range, nothing to download"
        );
        return ExitCode::FAILURE;
    }

    let config = DownloadConfig::new(
        BoundingBox::SHANGHAI,
        cli.zoom_start,
        cli.zoom_end,
        cli.output,
    )
    .with_max_concurrency(cli.concurrency)
    .with_request_interval(Duration::from_secs_f64(cli.interval.max(0.0)))
    .with_overwrite(cli.overwrite)
    .with_headers(vec![
        ("User-Agent".to_string(), cli.user_agent),
        ("Referer".to_string(), cli.referer),
    ]);

    let client = match ReqwestClient::new() {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "failed to create HTTP client");
            return ExitCode::FAILURE;
        }
    };
    let provider = AmapProvider::new(client).with_headers(config.headers.clone());

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "failed to create async runtime");
            return ExitCode::FAILURE;
        }
    };

    let session = DownloadSession::new(provider, config);
    match runtime.block_on(session.run()) {
        Ok(stats) => {
            info!(
                succeeded = stats.succeeded,
                total = stats.total_tiles,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "invalid download region");
            ExitCode::FAILURE
        }
    }
}
