mod platform;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use frameprobe_engine::{FetchSettings, FrameSettings, DEFAULT_HOST_ORIGIN};
use frameprobe_server::{ServerConfig, DEFAULT_BIND_ADDR};

use platform::logging::{self, LogDestination};
use platform::{run_app, AppConfig};

/// Loads pages into a frame and probes what the host can read from them.
#[derive(Debug, Parser)]
#[command(name = "frameprobe", version)]
struct Args {
    /// Address for the embedded test page server.
    #[arg(long, env = "FRAMEPROBE_ADDR", default_value = DEFAULT_BIND_ADDR)]
    addr: SocketAddr,
    /// Directory containing the test page HTML files.
    #[arg(long, env = "FRAMEPROBE_PAGES_DIR")]
    pages_dir: Option<PathBuf>,
    /// Don't start the embedded server; use `--host-origin` for an external one.
    #[arg(long)]
    no_server: bool,
    /// Origin of the hosting page when no embedded server runs.
    #[arg(long, default_value = DEFAULT_HOST_ORIGIN)]
    host_origin: String,
    /// Sandbox tokens for the frame element, e.g. `--sandbox allow-scripts`.
    #[arg(long, num_args = 1..)]
    sandbox: Vec<String>,
    #[arg(long, value_enum, default_value = "file")]
    log: LogDestination,
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::initialize(args.log, args.verbose);

    let server = (!args.no_server).then(|| {
        let defaults = ServerConfig::default();
        ServerConfig {
            bind_addr: args.addr,
            pages_dir: args.pages_dir.unwrap_or(defaults.pages_dir),
        }
    });
    let frame = FrameSettings {
        host_origin: args.host_origin,
        sandbox: args.sandbox,
        ..FrameSettings::default()
    };

    run_app(AppConfig {
        server,
        frame,
        fetch: FetchSettings::default(),
    })
}
