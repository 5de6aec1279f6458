//! Top-level error type for the engine binary.

/// Every failure mode that can abort engine startup or the tick scheduler.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The advisor backend could not be constructed.
    #[error("advisor backend error: {0}")]
    Advisor(#[from] polity_advisors::AdvisorError),

    /// A persistence-layer failure.
    #[error("storage error: {0}")]
    Db(#[from] polity_db::DbError),

    /// The HTTP listener failed to bind or serve.
    #[error("server error: {0}")]
    Server(#[from] polity_server::server::ServerError),
}
