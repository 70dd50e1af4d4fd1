//! # Server Configuration Module
//!
//! Configuration of the HTTP surface. Crawler and proxy behaviour are
//! configured separately through `CrawlerConfig` and `ProxyConfig`.

use std::net::SocketAddr;

use crate::error::{Error, Result};

/// Address the server listens on when none is configured
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on, e.g. `0.0.0.0:8080`
    pub listen_addr: String,

    /// Answer CORS preflights and allow any origin
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            cors_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Parse the configured listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| Error::Config(format!("Invalid listen address '{}': {}", self.listen_addr, e)))
    }
}
