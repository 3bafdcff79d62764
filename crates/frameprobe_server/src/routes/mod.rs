pub(crate) mod form_handler;
pub(crate) mod info;
pub(crate) mod test_pages;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::ServerState;

pub(crate) fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/test-pages/blocked", get(test_pages::serve_blocked))
        .route(
            "/api/test-pages/form-handler",
            post(form_handler::echo_form),
        )
        .route("/api/test-pages/{name}", get(test_pages::serve_page))
        .route("/api/iframe-info", get(info::iframe_info))
        .with_state(state)
}
