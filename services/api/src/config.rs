//! Service configuration
//!
//! Loaded with the `config` crate from built-in defaults, an optional
//! `config/gametube` file and `GAMETUBE__SECTION__KEY` environment variables.
//! The conventional `PORT`, `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET` and
//! `SENDGRID_API_KEY` variables take precedence over everything else.

use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::session::MAX_SESSION_TTL;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Directory holding games.json, channels.json and videos.json
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub ttl_secs: u64,
    pub prune_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

impl GithubConfig {
    /// GitHub login is only offered once a client id is set
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub from_address: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub session: SessionConfig,
    pub github: GithubConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("catalog.data_dir", "data")?
            .set_default("session.ttl_secs", 7 * 24 * 60 * 60)?
            .set_default("session.prune_interval_secs", 24 * 60 * 60)?
            .set_default("github.client_id", "")?
            .set_default("github.client_secret", "")?
            .set_default(
                "github.callback_url",
                "http://localhost:5000/auth/github/callback",
            )?
            .set_default("email.api_key", "")?
            .set_default("email.from_address", "gametube@example.com")?
            .set_default("email.base_url", "https://api.sendgrid.com")?
            .add_source(File::with_name("config/gametube").required(false))
            // e.g. GAMETUBE__SERVER__PORT=8080
            .add_source(Environment::with_prefix("GAMETUBE").separator("__"))
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("github.client_id", env::var("GITHUB_CLIENT_ID").ok())?
            .set_override_option(
                "github.client_secret",
                env::var("GITHUB_CLIENT_SECRET").ok(),
            )?
            .set_override_option("email.api_key", env::var("SENDGRID_API_KEY").ok())?
            .build()?;

        let config: Self = s.try_deserialize()?;
        if config.session.ttl_secs > MAX_SESSION_TTL.as_secs() {
            return Err(ConfigError::Message(format!(
                "session.ttl_secs must be at most {}",
                MAX_SESSION_TTL.as_secs()
            )));
        }

        Ok(config)
    }
}
