use std::net::SocketAddr;

use anyhow::Result;

use crate::db::DbConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub log_level: String,
    pub dev_mode: bool,
    pub database: DbConfig,
    /// Google OAuth client credentials. The handshake is handled outside this
    /// service; these only gate whether the provider is offered at all.
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let listen_addr = std::env::var("SOS_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let log_level = std::env::var("SOS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let dev_mode = std::env::var("SOS_DEV")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let database = DbConfig::from_env();

        let google_client_id = std::env::var("SOS_GOOGLE_CLIENT_ID").ok();
        let google_client_secret = std::env::var("SOS_GOOGLE_CLIENT_SECRET").ok();

        Ok(Self {
            listen_addr,
            log_level,
            dev_mode,
            database,
            google_client_id,
            google_client_secret,
        })
    }

    /// Whether both Google OAuth credentials are present.
    pub fn oauth_configured(&self) -> bool {
        self.google_client_id.is_some() && self.google_client_secret.is_some()
    }
}
