//! HTTP client construction, auth headers and error mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{ConvertError, ErrorDetails};

/// Build a reqwest client with the given per-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ConvertError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(ConvertError::Network)
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {token}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status and body to an error.
pub fn status_to_error(status: u16, body: &str) -> ConvertError {
    let parsed = parse_error_body(body);
    let message = parsed
        .as_ref()
        .map(|(message, _)| message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => ConvertError::Authentication(message),
        404 => ConvertError::NotFound(message),
        429 => ConvertError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => match parsed {
            Some((_, details)) => ConvertError::api_with_details(status, message, details),
            None => ConvertError::api(status, message),
        },
    }
}

fn parse_error_body(body: &str) -> Option<(String, ErrorDetails)> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    let error = value.get("error")?;
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();
    let details = ErrorDetails {
        code: error
            .get("code")
            .and_then(|c| c.as_str())
            .map(str::to_string),
        request_id: value
            .get("request_id")
            .and_then(|r| r.as_str())
            .map(str::to_string),
    };
    Some((message, details))
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}
