use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::network::PeerClient;
use crate::core::state::SharedState;

/// Why a ping loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// `running` was cleared by Pause or Stop.
    Halted,
    /// A later Start or Resume launched a newer generation.
    Superseded,
    /// A ping failed; the loop never retries.
    PeerUnreachable,
}

/// One generation of the background ping loop.
///
/// Delay and peer are captured at launch, so a loop keeps the settings of the
/// Start (or Resume) that spawned it. Termination is cooperative: the loop
/// re-reads the shared state before and after every sleep.
pub struct PingLoop {
    state: SharedState,
    peer_client: Arc<dyn PeerClient>,
    generation: u64,
    delay: Duration,
    peer: Url,
}

impl PingLoop {
    pub fn new(
        state: SharedState,
        peer_client: Arc<dyn PeerClient>,
        generation: u64,
        delay_ms: u64,
        peer: Url,
    ) -> Self {
        Self {
            state,
            peer_client,
            generation,
            delay: Duration::from_millis(delay_ms),
            peer,
        }
    }

    pub fn spawn(self) -> JoinHandle<LoopExit> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) -> LoopExit {
        debug!(
            generation = self.generation,
            delay_ms = self.delay.as_millis() as u64,
            peer = %self.peer,
            "ping loop started"
        );

        let exit = loop {
            if let Some(exit) = self.check().await {
                break exit;
            }

            tokio::time::sleep(self.delay).await;

            // Pause/Stop during the sleep must win over the next send.
            if let Some(exit) = self.check().await {
                break exit;
            }

            match self.peer_client.ping(&self.peer).await {
                Ok(_) => {
                    self.state.write().await.pongs_received += 1;
                    info!(peer = %self.peer, "Received pong");
                }
                Err(e) => {
                    warn!(peer = %self.peer, error = %e, "Failed to send ping");
                    let mut state = self.state.write().await;
                    if state.generation == self.generation {
                        state.running = false;
                    }
                    break LoopExit::PeerUnreachable;
                }
            }
        };

        debug!(generation = self.generation, ?exit, "ping loop finished");
        exit
    }

    async fn check(&self) -> Option<LoopExit> {
        let state = self.state.read().await;
        if state.generation != self.generation {
            Some(LoopExit::Superseded)
        } else if !state.running {
            Some(LoopExit::Halted)
        } else {
            None
        }
    }
}
