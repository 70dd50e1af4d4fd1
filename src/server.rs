//! # HTTP API Server
//!
//! Axum-based HTTP surface of the crawler and the rewrite proxy.
//!
//! | Route | Method | Purpose |
//! |---|---|---|
//! | `/crawl` | POST | Run one crawl invocation |
//! | `/submit-url` | POST | Add or reprioritize a queue entry |
//! | `/proxy` | POST | Fetch and rewrite a page for framing |
//! | `/search` | POST | Keyword search over stored pages |
//! | `/suggest` | GET | Title suggestions for `?q=` |
//! | `/stats` | GET | Queue and page store summary |
//! | `/health` | GET | Liveness |

mod handlers;
mod routes;
mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;

use std::future::Future;

use axum::Router;
use axum::http::Method;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::Result;

/// HTTP API server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// The router with all middleware applied
    pub fn router(&self) -> Router {
        let mut app = create_router(self.state.clone());

        if self.config.cors_enabled {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any)
                .allow_origin(Any);
            app = app.layer(cors);
        }

        app.layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("HTTP API server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("HTTP server shutting down");
            })
            .await?;

        Ok(())
    }
}
