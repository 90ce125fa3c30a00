use std::fmt;

use anyhow::{Context, Result};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Parses a response body as JSON, wrapping non-JSON text under a `raw`
/// key instead of failing.
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

/// Returns the access token when the exchange succeeded, `None` when it
/// did not. A 2xx body without an `access_token` field is an error.
pub fn access_token_if_ok(status: StatusCode, body: &Value) -> Result<Option<String>> {
    if !status.is_success() {
        return Ok(None);
    }

    let token = body
        .get("access_token")
        .and_then(Value::as_str)
        .context("Token response did not contain an access_token")?;

    Ok(Some(token.to_string()))
}

pub fn granted_scopes(body: &Value) -> &str {
    body.get("scope").and_then(Value::as_str).unwrap_or_default()
}

#[derive(Debug)]
pub struct ProfileResponse {
    pub status: StatusCode,
    pub body: ProfileBody,
}

#[derive(Debug)]
pub enum ProfileBody {
    Json(Value),
    Text(String),
}

impl fmt::Display for ProfileBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileBody::Json(value) => write!(f, "{value:#}"),
            ProfileBody::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Verifies the token with one GET against the profile endpoint. The body
/// is kept as JSON only when the response says it is JSON.
pub async fn fetch_profile(
    client: &reqwest::Client,
    api_base: &str,
    access_token: &str,
) -> Result<ProfileResponse> {
    let response = client
        .get(format!("{api_base}/v1/me"))
        .header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {access_token}"))
                .context("Access token is not a valid header value")?,
        )
        .send()
        .await
        .context("Error sending profile request")?;

    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    let text = response
        .text()
        .await
        .context("Unable to read profile response body")?;

    let body = if is_json {
        ProfileBody::Json(parse_body(&text))
    } else {
        ProfileBody::Text(text)
    };

    Ok(ProfileResponse { status, body })
}
