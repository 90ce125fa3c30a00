use std::env;

use dotenvy::dotenv;
use rand::{distr::Alphanumeric, Rng};

pub const AUTHORIZATION_URL: &str = "https://accounts.spotify.com/authorize";
pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const API_BASE_URL: &str = "https://api.spotify.com";

pub const CLIENT_ID: &str = "";
pub const CLIENT_SECRET: &str = "";
pub const REDIRECT_URI: &str = "http://localhost:8888/callback";

pub const SCOPES: [&str; 14] = [
    "user-read-private",
    "user-read-email",
    "user-top-read",
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-follow-read",
    "user-read-recently-played",
    "streaming",
    "app-remote-control",
    "user-library-read",
    "user-library-modify",
    "playlist-read-private",
    "playlist-read-collaborative",
];

#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    state: String,
}

impl Credentials {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Credentials {
        Credentials {
            client_id: String::from(client_id),
            client_secret: String::from(client_secret),
            redirect_uri: String::from(redirect_uri),
            state: rand::rng()
                .sample_iter(&Alphanumeric)
                .take(64)
                .map(char::from)
                .collect(),
        }
    }

    /// Built-in constants, each overridable by `STX_CLIENT_ID`,
    /// `STX_CLIENT_SECRET` and `STX_REDIRECT_URI`. A `.env` file is honored
    /// when present.
    pub fn from_env() -> Credentials {
        dotenv().ok();

        Credentials::new(
            &env::var("STX_CLIENT_ID").unwrap_or_else(|_| CLIENT_ID.to_string()),
            &env::var("STX_CLIENT_SECRET").unwrap_or_else(|_| CLIENT_SECRET.to_string()),
            &env::var("STX_REDIRECT_URI").unwrap_or_else(|_| REDIRECT_URI.to_string()),
        )
    }

    pub fn state(&self) -> &str {
        &self.state
    }
}
