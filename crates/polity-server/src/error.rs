//! Error type for the HTTP surface.
//!
//! [`ServerError`] unifies every user-facing failure mode -- auth, role,
//! phase, capacity -- into one enum with an [`IntoResponse`] impl, the way
//! the teacher's `ObserverError` does. Per `spec.md` §7, these are *user
//! errors*: they never mutate state and are reported to the caller with a
//! status code and a JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Errors surfaced to an HTTP caller.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No game exists under the given server id.
    #[error("no game found for server id {0}")]
    GameNotFound(String),

    /// The player id and token did not match a bound player.
    #[error("invalid authentication")]
    Unauthorized,

    /// The player's role does not permit the requested action type.
    #[error("role {role} may not submit action {action_type}")]
    WrongRole {
        /// The player's role.
        role: String,
        /// The rejected action type.
        action_type: String,
    },

    /// The game is not in `accepting_actions`, and the request requires it.
    #[error("game is not accepting actions or joins right now")]
    WrongPhase,

    /// The game has reached `max_players_per_server`.
    #[error("server is full")]
    ServerFull,

    /// The player already has `Player::MAX_PENDING` actions queued this tick.
    #[error("too many pending actions this tick")]
    TooManyPendingActions,

    /// The request body or query string was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A persistence-layer failure.
    #[error("storage error: {0}")]
    Storage(#[from] polity_db::DbError),

    /// An internal error that should not normally occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::GameNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::WrongRole { .. } => StatusCode::FORBIDDEN,
            Self::WrongPhase => StatusCode::CONFLICT,
            Self::ServerFull => StatusCode::FORBIDDEN,
            Self::TooManyPendingActions => StatusCode::TOO_MANY_REQUESTS,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
