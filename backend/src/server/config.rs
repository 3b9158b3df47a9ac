//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use backend::outbound::persistence::DbPool;
use url::Url;

/// Which DNS provider adapter to wire.
#[derive(Debug, Clone)]
pub enum ProviderChoice {
    /// Latency-simulating always-success stand-in.
    Simulated {
        /// Artificial latency per call.
        latency: Duration,
    },
    /// Reqwest adapter against a zone-management REST API.
    Http {
        /// API base URL.
        base: Url,
    },
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) provider: ProviderChoice,
    pub(crate) provider_timeout: Duration,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            provider: ProviderChoice::Simulated {
                latency: Duration::from_millis(300),
            },
            provider_timeout: Duration::from_secs(10),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed implementations for the
    /// driving ports; without it every port falls back to fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Select the DNS provider adapter.
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderChoice) -> Self {
        self.provider = provider;
        self
    }

    /// Deadline applied to each provider call.
    #[must_use]
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }
}
