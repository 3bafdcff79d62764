use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use frameprobe_logging::{probe_info, probe_warn};

use crate::ServerState;

const HTML: &str = "text/html; charset=utf-8";

/// A file-backed page and the framing headers it is served with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestPage {
    pub name: &'static str,
    pub x_frame_options: &'static str,
    pub frame_ancestors: Option<&'static str>,
}

pub const TEST_PAGES: &[TestPage] = &[
    TestPage {
        name: "same-origin",
        x_frame_options: "SAMEORIGIN",
        frame_ancestors: None,
    },
    TestPage {
        name: "form-test",
        x_frame_options: "SAMEORIGIN",
        frame_ancestors: None,
    },
    TestPage {
        name: "secure-test",
        x_frame_options: "SAMEORIGIN",
        frame_ancestors: Some("'self'"),
    },
];

const BLOCKED_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Blocked Content</title>
    <style>
        body { font-family: Arial; padding: 40px; text-align: center; background: #f8d7da; color: #721c24; }
        .error { background: white; padding: 30px; border-radius: 10px; display: inline-block; }
    </style>
</head>
<body>
    <div class="error">
        <h1>Frame Access Denied</h1>
        <p>This page cannot be displayed in a frame due to X-Frame-Options: DENY</p>
        <p>This simulates how external sites protect against clickjacking.</p>
    </div>
</body>
</html>
"#;

pub(crate) async fn serve_page(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Response {
    let Some(page) = TEST_PAGES.iter().find(|page| page.name == name) else {
        probe_warn!("unknown test page {name}");
        return not_found();
    };

    let path = state.pages_dir.join(format!("{}.html", page.name));
    let body = match tokio::fs::read(&path).await {
        Ok(body) => body,
        Err(err) => {
            probe_warn!("test page {} unreadable at {}: {err}", page.name, path.display());
            return not_found();
        }
    };
    probe_info!("served test page {}", page.name);

    let mut response = (
        [
            (header::CONTENT_TYPE, HTML),
            (header::X_FRAME_OPTIONS, page.x_frame_options),
        ],
        body,
    )
        .into_response();
    if let Some(sources) = page.frame_ancestors {
        if let Ok(value) = format!("frame-ancestors {sources}").parse() {
            response
                .headers_mut()
                .insert(header::CONTENT_SECURITY_POLICY, value);
        }
    }
    response
}

pub(crate) async fn serve_blocked() -> Response {
    probe_info!("served blocked test page");
    (
        [(header::CONTENT_TYPE, HTML), (header::X_FRAME_OPTIONS, "DENY")],
        BLOCKED_PAGE,
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Test page not found",
    )
        .into_response()
}
