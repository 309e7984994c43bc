mod io;
mod logging;
mod protocol;
mod relay;

#[cfg(test)]
mod test_utils;

use clap::Parser;
use logging::{LogConfig, init_logging};
use relay::{DEFAULT_ENDPOINT, HttpUpstream, Relay, UpstreamConfig};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{stdin, stdout};
use tracing::info;

/// CLI arguments for the MCP relay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Remote JSON-RPC endpoint every non-initialize message is POSTed to
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Abort a forward that takes longer than this many seconds (no limit by default)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log file path (overrides MCP_LOG_FILE env var)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_config = LogConfig::from_env().with_overrides(args.log_level, args.log_file);
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let config = UpstreamConfig {
        endpoint: args.endpoint,
        timeout: args.timeout_secs.map(Duration::from_secs),
    };
    let upstream = match HttpUpstream::new(config) {
        Ok(upstream) => upstream,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {e}");
            std::process::exit(1);
        }
    };

    info!("MCP relay ready, forwarding to {}", upstream.endpoint());

    let (output, writer) = io::OutputSink::spawn(stdout());
    let relay = Relay::new(Arc::new(upstream), output);

    // Interrupt exits at once; in-flight forwards are abandoned
    tokio::select! {
        result = relay.run(stdin()) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, exiting");
            std::process::exit(0);
        }
    }

    writer.await?;
    info!("Relay shutdown: input closed");

    Ok(())
}
