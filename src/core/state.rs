/// Mutable game state owned by one controller
use reqwest::Url;
use std::sync::Arc;
use tokio::sync::RwLock;

/// State shared between the control operations and the background ping loops.
pub type SharedState = Arc<RwLock<GameState>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Whether the current loop should keep emitting pings.
    pub running: bool,
    /// Wait time between pings, fixed per loop generation.
    pub delay_ms: u64,
    /// Unset until the first Start call.
    pub peer: Option<Url>,
    /// Bumped on every loop launch; older loops compare against it and bow out.
    pub generation: u64,
    pub pongs_received: u64,
}

impl GameState {
    pub fn new(default_delay_ms: u64) -> Self {
        Self {
            running: false,
            delay_ms: default_delay_ms,
            peer: None,
            generation: 0,
            pongs_received: 0,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}
