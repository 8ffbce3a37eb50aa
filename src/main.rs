//! Linkmap main entry point
//!
//! This is the command-line interface for the linkmap crawl and query
//! server.

use clap::Parser;
use linkmap::config::{load_config, Config};
use linkmap::server::serve;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Linkmap: a depth-bounded crawl and link-graph API
///
/// Linkmap crawls outward from a seed URL up to a bounded depth, records
/// every visited page and the links found on it, and serves a query
/// interface over the accumulated graph.
#[derive(Parser, Debug)]
#[command(name = "linkmap")]
#[command(version)]
#[command(about = "Depth-bounded web crawler with a link-graph query API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!("Database: {}", config.storage.database_path);
    tracing::info!("Maximum crawl depth: {}", config.crawler.max_depth);

    serve(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkmap=info,warn"),
            1 => EnvFilter::new("linkmap=debug,info"),
            2 => EnvFilter::new("linkmap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
