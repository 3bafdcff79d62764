use axum::http::{header, HeaderMap};
use axum::Json;
use frameprobe_logging::probe_info;
use serde_json::{json, Map, Value};

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("X-Frame-Options", "Information about frame embedding"),
    ("Content-Security-Policy", "Controls resource loading and execution"),
    ("X-Content-Type-Options", "Prevents MIME type sniffing"),
    ("Referrer-Policy", "Controls referrer information"),
];

const COMMON_RESTRICTIONS: &[&str] = &[
    "Cross-origin iframe access is heavily restricted",
    "Same-origin policy applies to DOM access",
    "postMessage() is the recommended communication method",
    "Cookies and storage access may be limited",
];

pub(crate) async fn iframe_info(headers: HeaderMap) -> Json<Value> {
    let server_origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .filter(|origin| !origin.is_empty())
        .unwrap_or("unknown");
    probe_info!("iframe-info requested from {server_origin}");

    Json(json!({
        "serverOrigin": server_origin,
        "requestHeaders": request_headers(&headers),
        "securityHeaders": SECURITY_HEADERS
            .iter()
            .map(|(name, about)| (name.to_string(), Value::from(*about)))
            .collect::<Map<_, _>>(),
        "commonRestrictions": COMMON_RESTRICTIONS,
    }))
}

/// Lowercased header names; repeated headers are joined with `, `.
fn request_headers(headers: &HeaderMap) -> Map<String, Value> {
    let mut out = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        out.insert(name.as_str().to_string(), Value::String(joined));
    }
    out
}
