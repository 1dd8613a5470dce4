use anyhow::Result;
use axum::Router;

const BODY: &str = "OK - Bot is running!";

/// Fixed responder for hosting-platform keep-alive probes. Answers every
/// path and method with 200.
pub fn app() -> Router {
    Router::new().fallback(|| async { BODY })
}

/// Serve the liveness responder until the process exits. Intentionally no
/// request tracing: keep-alive probes would flood the log.
pub async fn serve(host: String, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::info!("Health server on {}", listener.local_addr()?);

    axum::serve(listener, app()).await?;
    Ok(())
}
