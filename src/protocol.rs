/// JSON messages exchanged between the dispatcher and the instances, and between peers.
use serde::{Deserialize, Serialize};

pub const GAME_STARTED: &str = "Game started";
pub const GAME_PAUSED: &str = "Game paused";
pub const GAME_RESUMED: &str = "Game resumed";
pub const GAME_STOPPED: &str = "Game stopped";
pub const PONG: &str = "pong";

/// Acknowledgment returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
    /// Only present on the Start acknowledgment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pong_time_ms: Option<u64>,
}

impl Ack {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            pong_time_ms: None,
        }
    }

    pub fn started(delay_ms: u64) -> Self {
        Self {
            message: GAME_STARTED.to_string(),
            pong_time_ms: Some(delay_ms),
        }
    }

    pub fn pong() -> Self {
        Self::new(PONG)
    }

    pub fn is_pong(&self) -> bool {
        self.message == PONG
    }
}

/// Query parameters of `POST /start/:delay`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartParams {
    pub instance_url_param: Option<String>,
}

/// Body of a rejected request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
