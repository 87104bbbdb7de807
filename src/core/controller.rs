/// Per-instance game controller: the four control operations plus the ping responder
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::network::PeerClient;
use crate::core::state::{GameState, SharedState};
use crate::engine::PingLoop;
use crate::error::GameError;
use crate::protocol::{Ack, GAME_PAUSED, GAME_RESUMED, GAME_STOPPED};

/// Owns the game state of one instance and launches its ping loops.
///
/// Cloning is cheap and every clone drives the same state, which is how the
/// HTTP handlers share one controller.
#[derive(Clone)]
pub struct PingController {
    state: SharedState,
    peer_client: Arc<dyn PeerClient>,
}

impl PingController {
    pub fn new(default_delay_ms: u64, peer_client: Arc<dyn PeerClient>) -> Self {
        Self {
            state: GameState::new(default_delay_ms).shared(),
            peer_client,
        }
    }

    /// Sets delay and peer, marks the game running and always launches a new loop.
    pub async fn start(&self, delay_ms: u64, peer: Option<Url>) -> Result<Ack, GameError> {
        let peer = peer.ok_or_else(|| GameError::invalid_request("missing instance_url_param"))?;

        let generation = {
            let mut state = self.state.write().await;
            state.delay_ms = delay_ms;
            state.peer = Some(peer.clone());
            state.running = true;
            state.generation += 1;
            state.generation
        };

        info!(delay_ms, peer = %peer, generation, "Game started");
        self.launch(generation, delay_ms, peer);
        Ok(Ack::started(delay_ms))
    }

    pub async fn pause(&self) -> Ack {
        self.halt().await;
        info!("Game paused");
        Ack::new(GAME_PAUSED)
    }

    /// Relaunches the loop with the delay and peer of the last Start.
    pub async fn resume(&self) -> Result<Ack, GameError> {
        let launch = {
            let mut state = self.state.write().await;
            let peer = state
                .peer
                .clone()
                .ok_or_else(|| GameError::invalid_state("game has not been started"))?;

            if state.running {
                None
            } else {
                state.running = true;
                state.generation += 1;
                Some((state.generation, state.delay_ms, peer))
            }
        };

        match launch {
            Some((generation, delay_ms, peer)) => {
                info!(delay_ms, peer = %peer, generation, "Game resumed");
                self.launch(generation, delay_ms, peer);
            }
            None => debug!("resume while running, keeping the current loop"),
        }
        Ok(Ack::new(GAME_RESUMED))
    }

    /// Same state transition as [`pause`](Self::pause); only the acknowledgment differs.
    pub async fn stop(&self) -> Ack {
        self.halt().await;
        info!("Game stopped");
        Ack::new(GAME_STOPPED)
    }

    /// Answers a peer's ping whatever the game state is.
    pub fn respond_ping(&self) -> Ack {
        Ack::pong()
    }

    pub async fn snapshot(&self) -> GameState {
        self.state.read().await.clone()
    }

    async fn halt(&self) {
        self.state.write().await.running = false;
    }

    fn launch(&self, generation: u64, delay_ms: u64, peer: Url) {
        // Detached; a superseded loop exits at its next state check.
        PingLoop::new(
            Arc::clone(&self.state),
            Arc::clone(&self.peer_client),
            generation,
            delay_ms,
            peer,
        )
        .spawn();
    }
}
