//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
use seating::outbound::identity::GoTrueIdentityProvider;
use seating::outbound::persistence::DbPool;
use std::net::SocketAddr;

/// Credentials for an administrator seeded at startup.
#[derive(Debug, Clone)]
pub struct DevAdmin {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl DevAdmin {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity: Option<GoTrueIdentityProvider>,
    pub(crate) dev_admin: Option<DevAdmin>,
}

impl ServerConfig {
    /// Construct a server configuration from session and binding settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            identity: None,
            dev_admin: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, seat records and profiles live in PostgreSQL;
    /// otherwise both stores are held in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Use a GoTrue-compatible identity service instead of the in-memory one.
    #[must_use]
    pub fn with_identity(mut self, identity: GoTrueIdentityProvider) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Seed an administrator account when identity is held in memory.
    #[must_use]
    pub fn with_dev_admin(mut self, admin: Option<DevAdmin>) -> Self {
        self.dev_admin = admin;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
