//! Server configuration for Folio.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `FOLIO_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use folio_core::session::MAX_TTL_SECS;

/// Default listener port.
const DEFAULT_PORT: u16 = 4567;

/// Default session lifetime: one day.
const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Directory holding the documents.
    pub data_dir: PathBuf,
    /// YAML file mapping usernames to bcrypt hashes.
    pub users_file: PathBuf,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Session lifetime in seconds, renewed on every request.
    pub session_ttl_secs: u64,
    /// Seconds between expired-session sweeps.
    pub session_prune_interval_secs: u64,
    /// Whether the session cookie carries the `Secure` attribute.
    pub secure_cookie: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on, binds to `0.0.0.0`
    /// - `FOLIO_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:4567`)
    /// - `FOLIO_DATA_DIR`: document directory (default: `./data`)
    /// - `FOLIO_USERS_FILE`: credentials file (default: `./users.yml`)
    /// - `FOLIO_LOG_LEVEL`: log filter (default: `info`)
    /// - `FOLIO_SESSION_TTL`: session lifetime in seconds (default: `86400`, capped at ten years)
    /// - `FOLIO_SESSION_PRUNE_INTERVAL`: seconds between sweeps (default: `300`)
    /// - `FOLIO_SECURE_COOKIE`: mark the session cookie `Secure` (default: `false`)
    #[must_use]
    pub fn from_env() -> Self {
        let default_addr = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));

        // Priority: FOLIO_BIND_ADDR > PORT > default 127.0.0.1:4567
        let bind_addr = if let Ok(addr) = std::env::var("FOLIO_BIND_ADDR") {
            addr.parse().unwrap_or(default_addr)
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            default_addr
        };

        let data_dir = std::env::var("FOLIO_DATA_DIR")
            .map_or_else(|_| PathBuf::from("./data"), PathBuf::from);

        let users_file = std::env::var("FOLIO_USERS_FILE")
            .map_or_else(|_| PathBuf::from("./users.yml"), PathBuf::from);

        let log_level = std::env::var("FOLIO_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        let session_ttl_secs =
            parse_session_ttl(std::env::var("FOLIO_SESSION_TTL").ok().as_deref());

        let session_prune_interval_secs = std::env::var("FOLIO_SESSION_PRUNE_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(300);

        let secure_cookie = std::env::var("FOLIO_SECURE_COOKIE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            bind_addr,
            data_dir,
            users_file,
            log_level,
            session_ttl_secs,
            session_prune_interval_secs,
            secure_cookie,
        }
    }
}

/// Parse `FOLIO_SESSION_TTL`, clamping oversized values to [`MAX_TTL_SECS`].
fn parse_session_ttl(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(DEFAULT_SESSION_TTL_SECS, |secs| secs.min(MAX_TTL_SECS))
}
