//! Error type for the persistence layer.

/// Errors that can occur while loading or committing game state.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The `WorldState` blob failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No game exists under the given server id.
    #[error("no game found for server id {0}")]
    GameNotFound(String),

    /// A configuration error (e.g. an unparsable database URL).
    #[error("configuration error: {0}")]
    Config(String),
}
