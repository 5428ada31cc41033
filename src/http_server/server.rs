//! # HTTP Server
//!
//! Binds the outpass router behind a CORS layer.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::routes::outpass_routes;
use crate::config::AppConfig;
use crate::observability::{Event, Logger};
use crate::workflow::OutpassWorkflow;

/// Bind address and allowed CORS origins, taken from [`AppConfig::server`]
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty means any origin
    pub cors_origins: Vec<String>,
}

impl HttpServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        AppConfig::default().server()
    }
}

/// HTTP server for the outpass workflow
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, workflow: Arc<OutpassWorkflow>) -> Self {
        let router = Self::build_router(&config, workflow);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, workflow: Arc<OutpassWorkflow>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        outpass_routes(workflow).layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves or the listener fails
    pub async fn start<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;

        let addr_field = addr.to_string();
        Logger::info(Event::ServerStart, &[("addr", addr_field.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Logger::info(Event::ServerStop, &[("addr", addr_field.as_str())]);
        Ok(())
    }
}
