//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use todo_backend::outbound::memory::InMemoryUnitOfWork;
use todo_backend::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Storage the Todo use cases run against.
#[derive(Clone)]
pub enum StorageBackend {
    Postgres(DbPool),
    InMemory(InMemoryUnitOfWork),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) api_prefix: String,
    pub(crate) storage: StorageBackend,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, api_prefix: String, storage: StorageBackend) -> Self {
        Self {
            bind_addr,
            api_prefix,
            storage,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
