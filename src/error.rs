//! Error types shared by the controller, the HTTP surface and the dispatcher.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::protocol::ErrorBody;

/// Main error type for a ping-pong instance.
#[derive(Error, Debug)]
pub enum GameError {
    /// Malformed control call (missing peer, bad delay).
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Control call not allowed in the current game state.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Any network-level failure while talking to another instance.
    #[error("Peer {peer} unreachable: {message}")]
    PeerUnreachable { peer: String, message: String },

    /// An instance answered a control call with a non-success status.
    #[error("Instance {instance} rejected the request ({status}): {message}")]
    Rejected {
        instance: String,
        status: u16,
        message: String,
    },

    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    pub fn peer_unreachable(peer: impl ToString, message: impl ToString) -> Self {
        Self::PeerUnreachable {
            peer: peer.to_string(),
            message: message.to_string(),
        }
    }

    /// HTTP status used when the error is surfaced as a rejected request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidState { .. } => StatusCode::CONFLICT,
            Self::PeerUnreachable { .. } => StatusCode::BAD_GATEWAY,
            Self::Rejected { .. } | Self::Config { .. } | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
