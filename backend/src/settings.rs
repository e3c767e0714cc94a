//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SEATING_*` environment variables or a
//! configuration file. Everything is optional: without a database URL the
//! record and profile stores live in memory, and without an identity URL an
//! in-memory identity provider stands in.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);
const DEFAULT_SESSION_KEY_PATH: &str = "/var/run/secrets/session_key";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the seating service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SEATING")]
pub struct SeatingSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL for the record and profile stores.
    pub database_url: Option<String>,
    // Switches are read from the environment or a file only: clap reports an
    // absent `SetTrue` flag as `false`, which would shadow both layers.
    /// Apply embedded migrations at startup when a database is configured.
    #[ortho_config(default = true, skip_cli)]
    pub run_migrations: bool,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Base URL of the GoTrue-compatible identity service.
    pub identity_url: Option<String>,
    /// API key sent as `apikey` on every identity call.
    pub identity_api_key: Option<String>,
    /// Identity request timeout in seconds.
    pub identity_timeout_secs: Option<u64>,
    /// File holding the session cookie key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true, skip_cli)]
    pub cookie_secure: bool,
    /// `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Permit a generated session key when the key file is unusable.
    #[ortho_config(default = false, skip_cli)]
    pub allow_ephemeral_key: bool,
    /// Administrator seeded into the in-memory identity provider.
    pub dev_admin_email: Option<String>,
    pub dev_admin_password: Option<String>,
}

impl Default for SeatingSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            run_migrations: true,
            db_max_connections: None,
            identity_url: None,
            identity_api_key: None,
            identity_timeout_secs: None,
            session_key_file: None,
            cookie_secure: true,
            same_site: None,
            allow_ephemeral_key: false,
            dev_admin_email: None,
            dev_admin_password: None,
        }
    }
}

impl SeatingSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(
            self.identity_timeout_secs
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
        )
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_PATH))
    }

    /// Seed credentials, present only when both halves are configured.
    pub fn dev_admin(&self) -> Option<(&str, &str)> {
        self.dev_admin_email
            .as_deref()
            .zip(self.dev_admin_password.as_deref())
    }
}
