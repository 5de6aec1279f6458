//! Process entry point for binding and serving the router.

use axum::Router;
use tokio::net::TcpListener;

/// Host and port to bind.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address, e.g. `0.0.0.0`.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_owned(), port: 8080 }
    }
}

/// Failure to bind or serve the HTTP listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured address could not be bound.
    #[error("failed to bind {0}: {1}")]
    Bind(String, std::io::Error),
    /// `axum::serve` returned an error after the listener was accepting.
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Bind `config`'s address and serve `router` until the process is killed.
///
/// # Errors
/// Returns [`ServerError::Bind`] if the address is already in use, or
/// [`ServerError::Serve`] if the accept loop fails.
pub async fn start_server(config: ServerConfig, router: Router) -> Result<(), ServerError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        TcpListener::bind(&addr).await.map_err(|e| ServerError::Bind(addr.clone(), e))?;

    tracing::info!(%addr, "listening");

    axum::serve(listener, router).await.map_err(ServerError::Serve)
}
