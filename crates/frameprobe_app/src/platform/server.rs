use std::net::SocketAddr;
use std::thread;

use anyhow::Context;
use frameprobe_logging::probe_error;
use frameprobe_server::{bind, create_router, serve, ServerConfig};

/// Starts the test page server on its own runtime thread and returns the bound address.
///
/// The listener is bound before returning, so relative targets resolve as soon as
/// the first load is requested.
pub fn spawn_embedded_server(config: ServerConfig) -> anyhow::Result<SocketAddr> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("building server runtime")?;
    let listener = runtime.block_on(bind(&config))?;
    let addr = listener.local_addr().context("reading bound address")?;
    let router = create_router(&config);

    thread::Builder::new()
        .name("frameprobe-server".into())
        .spawn(move || {
            if let Err(err) = runtime.block_on(serve(listener, router)) {
                probe_error!("test page server stopped: {err}");
            }
        })
        .context("starting server thread")?;
    Ok(addr)
}
