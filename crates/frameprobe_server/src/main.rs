use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use frameprobe_server::{bind, create_router, serve, ServerConfig, DEFAULT_BIND_ADDR};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Serves the frame probe test pages.
#[derive(Debug, Parser)]
#[command(name = "frameprobe-server", version)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "FRAMEPROBE_ADDR", default_value = DEFAULT_BIND_ADDR)]
    addr: SocketAddr,
    /// Directory containing the test page HTML files.
    #[arg(long, env = "FRAMEPROBE_PAGES_DIR")]
    pages_dir: Option<PathBuf>,
    /// Log debug output.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(
        level,
        ConfigBuilder::new().set_time_format_rfc3339().build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        bind_addr: args.addr,
        pages_dir: args.pages_dir.unwrap_or(defaults.pages_dir),
    };

    let listener = bind(&config).await?;
    serve(listener, create_router(&config))
        .await
        .context("test page server failed")
}
