use anyhow::{bail, ensure, Context, Result};
use base64::{engine::general_purpose::STANDARD as b64, Engine};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use url::Url;

use crate::config::{Credentials, AUTHORIZATION_URL};

#[derive(Serialize)]
struct AuthCodeRequest {
    client_id: String,
    response_type: String,
    redirect_uri: String,
    state: String,
    scope: String,
    show_dialog: bool,
}

impl AuthCodeRequest {
    fn new(creds: &Credentials, scopes: &[&str], show_dialog: bool) -> AuthCodeRequest {
        AuthCodeRequest {
            client_id: creds.client_id.clone(),
            response_type: "code".to_string(),
            redirect_uri: creds.redirect_uri.clone(),
            state: creds.state().to_string(),
            scope: scopes.join(" "),
            show_dialog,
        }
    }
}

/// Builds the authorization prompt URL. Pure string construction; the
/// caller opens it or prints it for manual use.
pub fn authorize_url(creds: &Credentials, scopes: &[&str], show_dialog: bool) -> Result<Url> {
    let query = serde_urlencoded::to_string(AuthCodeRequest::new(creds, scopes, show_dialog))
        .context("Error url-encoding authorization query")?;

    Url::parse(&format!("{AUTHORIZATION_URL}?{query}"))
        .context("Unable to parse authorization prompt url")
}

/// Extracts the authorization code from the operator's pasted line. The
/// line may be the bare code or the full redirect URL; in the latter case
/// the `code` query parameter is taken and `state`, when present, must
/// match the one sent in the authorization URL.
pub fn code_from_input(line: &str, expected_state: &str) -> Result<String> {
    let line = line.trim();
    ensure!(!line.is_empty(), "No code provided.");

    let Ok(url) = Url::parse(line) else {
        return Ok(line.to_string());
    };

    let mut code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => bail!("Authorization callback returned an error: {value}"),
            "state" => ensure!(
                value == expected_state,
                "State sent to Spotify does not match the one returned"
            ),
            _ => {}
        }
    }

    match code {
        Some(code) => Ok(code),
        None => bail!("Pasted redirect URL does not contain a 'code' parameter"),
    }
}

pub fn basic_auth_header(client_id: &str, client_secret: &str) -> Result<HeaderValue> {
    let header = format!("Basic {}", b64.encode(format!("{client_id}:{client_secret}")));
    HeaderValue::from_str(&header).context("Client credentials are not a valid header value")
}

/// Exchanges the authorization code for an access token. One POST, no
/// retry; the HTTP status is left to the caller.
pub async fn exchange_code(
    client: &reqwest::Client,
    token_url: &str,
    creds: &Credentials,
    code: &str,
) -> Result<reqwest::Response> {
    client
        .post(token_url)
        .header(
            AUTHORIZATION,
            basic_auth_header(&creds.client_id, &creds.client_secret)?,
        )
        .header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        )
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", creds.redirect_uri.as_str()),
        ])
        .send()
        .await
        .context("Error sending request for access token")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::SCOPES;

    fn test_creds() -> Credentials {
        Credentials::new("my-client-id", "my-client-secret", "http://localhost:8888/callback")
    }

    #[test]
    fn authorize_url_query_round_trips() {
        let creds = test_creds();
        let url = authorize_url(&creds, &SCOPES, true).unwrap();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(url.path(), "/authorize");

        let params: HashMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(params["client_id"], "my-client-id");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["redirect_uri"], "http://localhost:8888/callback");
        assert_eq!(params["scope"], SCOPES.join(" "));
        assert_eq!(params["show_dialog"], "true");
        assert_eq!(params["state"], creds.state());
    }

    #[test]
    fn scopes_are_space_joined_and_percent_encoded() {
        let creds = test_creds();
        let url = authorize_url(&creds, &["user-read-private", "user-read-email"], false).unwrap();

        assert!(url.query().unwrap().contains("scope=user-read-private+user-read-email"));
        assert!(!url.as_str().contains(' '));

        let decoded: HashMap<String, String> =
            serde_urlencoded::from_str(url.query().unwrap()).unwrap();
        assert_eq!(decoded["scope"], "user-read-private user-read-email");
    }

    #[test]
    fn bare_code_passes_through_trimmed() {
        let code = code_from_input("  AQDabc123  \n", "state").unwrap();
        assert_eq!(code, "AQDabc123");
    }

    #[test]
    fn empty_or_whitespace_input_is_an_error() {
        assert!(code_from_input("", "state").is_err());
        assert!(code_from_input("   \n", "state").is_err());
    }

    #[test]
    fn full_redirect_url_yields_the_code() {
        let code = code_from_input(
            "http://localhost:8888/callback?code=AQDabc123&state=xyz",
            "xyz",
        )
        .unwrap();
        assert_eq!(code, "AQDabc123");
    }

    #[test]
    fn state_mismatch_is_an_error() {
        let result = code_from_input(
            "http://localhost:8888/callback?code=AQDabc123&state=forged",
            "xyz",
        );
        assert!(result.is_err());
    }

    #[test]
    fn callback_error_parameter_is_an_error() {
        let result = code_from_input(
            "http://localhost:8888/callback?error=access_denied&state=xyz",
            "xyz",
        );
        assert!(result.unwrap_err().to_string().contains("access_denied"));
    }

    #[test]
    fn url_without_code_is_an_error() {
        assert!(code_from_input("http://localhost:8888/callback?state=xyz", "xyz").is_err());
    }

    #[test]
    fn basic_header_encodes_id_and_secret() {
        let header = basic_auth_header("my-id", "my-secret").unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic bXktaWQ6bXktc2VjcmV0");
    }
}
