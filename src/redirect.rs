use anyhow::{bail, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectCheck {
    Accepted,
    HttpsOnLoopback,
}

impl RedirectCheck {
    pub fn advisory(&self) -> Option<&'static str> {
        match self {
            RedirectCheck::Accepted => None,
            RedirectCheck::HttpsOnLoopback => Some(
                "Note: Browsers usually don't serve HTTPS on localhost. \
                 Use http://localhost:... and add it to your Spotify app Redirect URIs.",
            ),
        }
    }
}

/// Checks the configured redirect URI before any network call is made.
/// `https://localhost` is accepted with an advisory; anything that is
/// neither `https://` nor `http://localhost` is a configuration error.
pub fn check_redirect_uri(uri: &str) -> Result<RedirectCheck> {
    if uri.starts_with("https://localhost") {
        return Ok(RedirectCheck::HttpsOnLoopback);
    }
    if uri.starts_with("https://") || uri.starts_with("http://localhost") {
        return Ok(RedirectCheck::Accepted);
    }
    bail!(
        "Redirect URI must use https:// or be http://localhost/... \
         and must EXACTLY match your Spotify app setting"
    )
}
