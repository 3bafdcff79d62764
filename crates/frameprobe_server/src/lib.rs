//! Static test pages with deliberate framing headers, plus two JSON endpoints.
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use frameprobe_logging::probe_info;
use tokio::net::TcpListener;

pub use routes::test_pages::{TestPage, TEST_PAGES};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding `<name>.html` for every file-backed test page.
    pub pages_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            pages_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/test-pages")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}

/// Shared, read-only state handed to every handler.
#[derive(Debug)]
pub(crate) struct ServerState {
    pub(crate) pages_dir: PathBuf,
}

pub fn create_router(config: &ServerConfig) -> Router {
    let state = Arc::new(ServerState {
        pages_dir: config.pages_dir.clone(),
    });
    routes::router(state)
}

/// Binds the configured address; the listener reports the actual port when `0` was asked for.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr,
            source,
        })
}

/// Serves `router` on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, router: Router) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        probe_info!("serving test pages on http://{addr}");
    }
    axum::serve(listener, router)
        .await
        .map_err(ServerError::Serve)
}
