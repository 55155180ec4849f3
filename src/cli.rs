//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use qdown::DownloaderConfig;
use qdown::config::{CONNECT_TIMEOUT_SECS, DEFAULT_SERVER_URL, READ_TIMEOUT_SECS};

const EXAMPLES: &str = "Examples:
  qdown 3kMM-X9S6-bMioFU0Fn8nHjAgQgWmG
  qdown https://drive.qualiteg.com/file/3kMM-X9S6-bMioFU0Fn8nHjAgQgWmG -o downloads
  qdown 3kMM-X9S6-bMioFU0Fn8nHjAgQgWmG -O report.pdf -q";

/// Download a file from a QualitegDrive server by ID or share URL.
#[derive(Parser, Debug)]
#[command(name = "qdown")]
#[command(author, version, about, after_help = EXAMPLES)]
pub struct Args {
    /// File ID or share URL to download
    #[arg(value_name = "ID")]
    pub id: Option<String>,

    /// Output filename
    #[arg(short = 'O', long = "output", value_name = "FILENAME")]
    pub output: Option<String>,

    /// Output directory (created if missing)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Server URL
    #[arg(short = 's', long = "server", value_name = "SERVER", env = "QDOWN_SERVER", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Hide progress and the saved-file message
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Connect timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", env = "QDOWN_CONNECT_TIMEOUT", default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// Read timeout in seconds between received chunks (1-3600)
    #[arg(long, value_name = "SECS", env = "QDOWN_READ_TIMEOUT", default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: u64,
}

impl Args {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Builds the downloader configuration from flags and environment.
    pub fn downloader_config(&self) -> DownloaderConfig {
        DownloaderConfig::default()
            .with_server_url(self.server.as_str())
            .with_timeouts(
                Duration::from_secs(self.connect_timeout),
                Duration::from_secs(self.read_timeout),
            )
    }
}
