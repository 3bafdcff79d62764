use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use frameprobe_logging::probe_info;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
pub(crate) struct FormEcho {
    success: bool,
    message: &'static str,
    data: Value,
    timestamp: String,
    headers: EchoedHeaders,
}

/// Request headers worth showing back; absent ones are left out.
#[derive(Debug, Serialize)]
struct EchoedHeaders {
    #[serde(rename = "content-type", skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(rename = "user-agent", skip_serializing_if = "Option::is_none")]
    user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    referer: Option<String>,
}

pub(crate) async fn echo_form(headers: HeaderMap, body: Bytes) -> Json<FormEcho> {
    let content_type = header_value(&headers, header::CONTENT_TYPE);
    let data = parse_body(content_type.as_deref(), &body);
    probe_info!(
        "form-handler received {} bytes ({})",
        body.len(),
        content_type.as_deref().unwrap_or("no content type")
    );

    Json(FormEcho {
        success: true,
        message: "Form data received successfully",
        data,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        headers: EchoedHeaders {
            content_type,
            user_agent: header_value(&headers, header::USER_AGENT),
            origin: header_value(&headers, header::ORIGIN),
            referer: header_value(&headers, header::REFERER),
        },
    })
}

/// JSON bodies are parsed, urlencoded bodies become a field map, anything else stays text.
fn parse_body(content_type: Option<&str>, body: &[u8]) -> Value {
    let mime = content_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime == "application/json" || mime.ends_with("+json") {
        if let Ok(value) = serde_json::from_slice(body) {
            return value;
        }
    } else if mime == "application/x-www-form-urlencoded" {
        let fields: Map<String, Value> = url::form_urlencoded::parse(body)
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect();
        return Value::Object(fields);
    }
    Value::String(String::from_utf8_lossy(body).into_owned())
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
