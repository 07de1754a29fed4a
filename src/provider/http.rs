//! HTTP client construction, SSE line parsing, and status mapping.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::YachtsyConfig;
use crate::error::{Result, YachtsyError};

/// Build the reqwest client for one configuration.
///
/// No overall request timeout is set; a long answer may stream for as
/// long as the upstream keeps the connection open.
pub fn build_client(config: &YachtsyConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .user_agent(config.user_agent())
        .pool_max_idle_per_host(10)
        .build()?;
    Ok(client)
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(mut val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Payload of an SSE `data:` line. One leading space is stripped.
pub fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line.strip_prefix("data:")?;
    Some(data.strip_prefix(' ').unwrap_or(data))
}

/// Map a non-success HTTP status to a request error.
pub fn status_to_error(status: u16, body: &str) -> YachtsyError {
    let message = extract_error_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        401 | 403 => YachtsyError::Authentication(message),
        _ => YachtsyError::api(status, message),
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    error_message(&value)
}

/// Message of an OpenAI-style `{"error": {"message": ...}}` or
/// `{"error": "..."}` payload.
pub fn error_message(value: &serde_json::Value) -> Option<String> {
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(str::to_owned)
}
