//! Prompt Gateway - async LLM completion gateway
//!
//! Serves OpenAI-compatible chat completions with provider failover

#![allow(missing_docs)]

use clap::Parser;
use prompt_gateway::server;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = "LLM completion gateway with provider failover")]
struct Cli {
    /// YAML configuration file; defaults to config/gateway.yaml, then the environment
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, env = "GATEWAY_LOG_JSON")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    match server::builder::run_server(cli.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps bind hints readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
