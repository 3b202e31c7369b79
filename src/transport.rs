//! Transport integration using rmcp SDK
//!
//! Stdio serves a single MCP client over stdin/stdout. HTTP mounts the MCP
//! streamable HTTP service at `/mcp` next to a `/health` check.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
};
use rmcp::{
    ServiceExt,
    transport::streamable_http_server::{
        StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
    },
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::server::CsvCleaningServer;

/// HTTP transport server using MCP streamable HTTP protocol
pub struct HttpTransportServer {
    pub host: String,
    pub port: u16,
    server: CsvCleaningServer,
}

impl HttpTransportServer {
    pub fn new(host: String, port: u16, server: CsvCleaningServer) -> Self {
        Self { host, port, server }
    }

    /// Axum router with the MCP endpoint, health check and CORS
    pub fn router(&self) -> Router {
        let server = self.server.clone();
        let service = StreamableHttpService::new(
            move || Ok(server.clone()),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig::default(),
        );

        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
            .allow_origin(Any);

        Router::new()
            .route("/health", get(handle_health_check))
            .nest_service("/mcp", service)
            .layer(cors)
    }

    /// Start the HTTP server with MCP streamable HTTP protocol support
    pub async fn start(&self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind HTTP server to {}", addr))?;
        info!("MCP HTTP streamable server listening on http://{}/mcp", addr);

        axum::serve(listener, self.router())
            .await
            .context("HTTP server error")?;
        Ok(())
    }
}

async fn handle_health_check() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "healthy",
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now()
    });
    (StatusCode::OK, Json(response))
}

/// Stdio transport server using MCP stdio protocol
pub struct StdioTransportServer {
    server: CsvCleaningServer,
}

impl StdioTransportServer {
    pub fn new(server: CsvCleaningServer) -> Self {
        Self { server }
    }

    /// Serve one client until stdin closes
    pub async fn start(&self) -> Result<()> {
        info!("Starting MCP stdio transport server");

        let service = self
            .server
            .clone()
            .serve(rmcp::transport::stdio())
            .await
            .inspect_err(|e| error!("Failed to start stdio service: {}", e))?;

        let reason = service.waiting().await?;
        info!("Stdio transport server shutting down: {:?}", reason);
        Ok(())
    }
}

/// Factory for creating transport servers
pub struct TransportFactory;

impl TransportFactory {
    /// Create an HTTP transport server
    pub fn create_http(host: &str, port: u16, server: CsvCleaningServer) -> HttpTransportServer {
        HttpTransportServer::new(host.to_string(), port, server)
    }

    /// Create a stdio transport server
    pub fn create_stdio(server: CsvCleaningServer) -> StdioTransportServer {
        StdioTransportServer::new(server)
    }
}
