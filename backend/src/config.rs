//! Server settings loaded via OrthoConfig.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_SHORT_DESCRIPTION_LIMIT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Process-wide settings read from `HOMECRAFT_*` variables and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOMECRAFT")]
pub struct AppSettings {
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Listen address, `0.0.0.0:8080` by default.
    pub bind_addr: Option<String>,
    pub db_max_connections: Option<u32>,
    /// Characters kept by topic list previews before the ellipsis.
    pub short_description_limit: Option<usize>,
}

impl AppSettings {
    /// The configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// # Errors
    ///
    /// Returns the parse failure when `bind_addr` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn short_description_limit(&self) -> usize {
        self.short_description_limit
            .unwrap_or(DEFAULT_SHORT_DESCRIPTION_LIMIT)
    }
}
