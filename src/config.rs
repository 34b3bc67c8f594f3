//! Application configuration loaded from environment variables.
//!
//! The Spotify client secret is read once at startup and only ever used
//! server-side for the token exchange.

use std::env;
use std::fmt;

const DEFAULT_FRONTEND_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_PORT: u16 = 8888;

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Spotify OAuth client ID (public)
    pub spotify_client_id: String,
    /// Redirect URI registered with Spotify (points at `/callback`)
    pub redirect_uri: String,
    /// Frontend URL the callback redirects to with the access token
    pub frontend_url: String,
    /// Origin used when building share links
    pub share_base_url: String,
    /// Server port
    pub port: u16,
    /// Spotify accounts service (authorize + token endpoints)
    pub accounts_base_url: String,
    /// Spotify Web API base
    pub api_base_url: String,

    // --- Secrets ---
    /// Spotify OAuth client secret
    pub spotify_client_secret: String,
    /// HMAC key for share links; unsigned links when absent
    pub share_signing_key: Option<Vec<u8>>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("spotify_client_id", &self.spotify_client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("frontend_url", &self.frontend_url)
            .field("share_base_url", &self.share_base_url)
            .field("port", &self.port)
            .field("accounts_base_url", &self.accounts_base_url)
            .field("api_base_url", &self.api_base_url)
            .field("spotify_client_secret", &"<redacted>")
            .field(
                "share_signing_key",
                &self.share_signing_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            spotify_client_id: "test_client_id".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            share_base_url: DEFAULT_FRONTEND_URL.to_string(),
            port: DEFAULT_PORT,
            accounts_base_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            spotify_client_secret: "test_secret".to_string(),
            share_signing_key: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let frontend_url = env::var("FRONTEND_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string());

        Ok(Self {
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            share_base_url: env::var("SHARE_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| frontend_url.clone()),
            frontend_url,
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
            accounts_base_url: env::var("SPOTIFY_ACCOUNTS_URL")
                .unwrap_or_else(|_| DEFAULT_ACCOUNTS_URL.to_string()),
            api_base_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),

            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            share_signing_key: env::var("SHARE_SIGNING_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(String::into_bytes),
        })
    }
}

/// Read a required, non-empty variable.
fn required(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(value.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Environment variable is empty: {0}")]
    Empty(&'static str),
}
