use std::time::Duration;

use anyhow::{Context, Result};
use arith_web::{ServerConfig, serve};
use clap::Parser;
use tokio::net::TcpListener;

/// Serve the arithmetic evaluator over HTTP.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(
        long,
        env = "ARITH_ADDR",
        value_name = "HOST:PORT",
        default_value = "127.0.0.1:8080",
        help = "Address to listen on"
    )]
    addr: String,

    #[arg(
        long,
        env = "ARITH_MAX_BODY_BYTES",
        value_name = "BYTES",
        default_value_t = ServerConfig::default().max_body_bytes,
        help = "Largest request body accepted"
    )]
    max_body_bytes: usize,

    #[arg(
        long,
        env = "ARITH_READ_TIMEOUT_SECS",
        value_name = "SECONDS",
        default_value_t = ServerConfig::default().read_timeout.as_secs(),
        help = "Seconds a client gets to send its request"
    )]
    read_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let listener = TcpListener::bind(&cli.addr)
        .await
        .with_context(|| format!("failed to bind {}", cli.addr))?;
    let config = ServerConfig {
        max_body_bytes: cli.max_body_bytes,
        read_timeout: Duration::from_secs(cli.read_timeout_secs),
    };
    serve(listener, config).await.context("server stopped")
}
