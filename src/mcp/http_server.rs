//! HTTP server implementation for MCP
//!
//! Serves the note tools over SSE so several clients can share one loaded
//! model and one collection.

#[cfg(feature = "http-server")]
pub async fn serve_http(config: crate::Settings, bind: String) -> anyhow::Result<()> {
    use crate::mcp::NotesServer;
    use crate::notes::NoteService;
    use axum::Router;
    use rmcp::transport::{SseServer, sse_server::SseServerConfig};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use tracing::{debug, info};

    info!("Starting HTTP MCP server on {bind}");

    // Load the model once; every connection shares the service
    let service = Arc::new(NoteService::from_settings(&config)?);

    let ct = CancellationToken::new();
    let addr: std::net::SocketAddr = bind.parse()?;

    let sse_config = SseServerConfig {
        bind: addr,
        sse_path: "/mcp/sse".to_string(),
        post_path: "/mcp/message".to_string(),
        ct: ct.clone(),
        sse_keep_alive: Some(Duration::from_secs(15)),
    };

    let (sse_server, sse_router) = SseServer::new(sse_config);

    sse_server.with_service(move || {
        debug!("Creating MCP server instance for SSE connection");
        NotesServer::new(service.clone())
    });

    async fn health_check() -> &'static str {
        "OK"
    }

    async fn shutdown_signal() {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    }

    let router = Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(sse_router); // SSE endpoints at /mcp/sse and /mcp/message

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    eprintln!("HTTP MCP server listening on http://{bind}");
    eprintln!("SSE endpoint: http://{bind}/mcp/sse");
    eprintln!("POST endpoint: http://{bind}/mcp/message");
    eprintln!("Health check: http://{bind}/health");
    eprintln!("Press Ctrl+C to stop the server");

    let server = axum::serve(listener, router);

    tokio::select! {
        result = server => {
            result?;
        }
        _ = shutdown_signal() => {
            info!("Shutting down HTTP server...");
            ct.cancel();
        }
    }

    info!("HTTP server shut down gracefully");
    Ok(())
}

#[cfg(not(feature = "http-server"))]
pub async fn serve_http(_config: crate::Settings, _bind: String) -> anyhow::Result<()> {
    anyhow::bail!(
        "HTTP server support is not compiled in. Rebuild with: cargo build --features http-server"
    )
}
