//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use homecraft::inbound::http::state::ServiceContext;
use homecraft::outbound::memory::InMemoryForum;
use homecraft::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Where repositories keep their data.
#[derive(Clone)]
pub enum ForumStore {
    /// Process-local store; contents are lost on restart.
    Memory(Arc<InMemoryForum>),
    Postgres(DbPool),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: ForumStore,
    pub(crate) context: ServiceContext,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration backed by a fresh in-memory store.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        context: ServiceContext,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            store: ForumStore::Memory(Arc::new(InMemoryForum::new())),
            context,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Persist through PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.store = ForumStore::Postgres(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}
