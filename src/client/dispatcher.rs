/// Fans control commands out to both instances, one after the other
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

use crate::core::network::{endpoint_url, parse_instance_url};
use crate::error::GameError;
use crate::protocol::{Ack, ErrorBody};

pub const DEFAULT_INSTANCE_A: &str = "http://127.0.0.1:8000";
pub const DEFAULT_INSTANCE_B: &str = "http://127.0.0.1:8001";

/// Control client for a pair of instances.
///
/// Calls are issued sequentially (A, then B). The first failure aborts the
/// rest of the command; nothing already applied is rolled back.
pub struct CommandDispatcher {
    client: reqwest::Client,
    instance_a: Url,
    instance_b: Url,
}

impl CommandDispatcher {
    pub fn new(instance_a: &str, instance_b: &str, timeout: Duration) -> Result<Self, GameError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GameError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            instance_a: parse_instance_url(instance_a)?,
            instance_b: parse_instance_url(instance_b)?,
        })
    }

    pub fn instances(&self) -> (&Url, &Url) {
        (&self.instance_a, &self.instance_b)
    }

    /// Each instance is told to ping the other one.
    pub async fn start(&self, delay_ms: u64) -> Result<[Ack; 2], GameError> {
        let path = format!("start/{delay_ms}");
        let a = self
            .post(&self.instance_a, &path, Some(&self.instance_b))
            .await?;
        let b = self
            .post(&self.instance_b, &path, Some(&self.instance_a))
            .await?;
        Ok([a, b])
    }

    pub async fn pause(&self) -> Result<[Ack; 2], GameError> {
        self.broadcast("pause").await
    }

    pub async fn resume(&self) -> Result<[Ack; 2], GameError> {
        self.broadcast("resume").await
    }

    pub async fn stop(&self) -> Result<[Ack; 2], GameError> {
        self.broadcast("stop").await
    }

    async fn broadcast(&self, path: &str) -> Result<[Ack; 2], GameError> {
        let a = self.post(&self.instance_a, path, None).await?;
        let b = self.post(&self.instance_b, path, None).await?;
        Ok([a, b])
    }

    async fn post(&self, instance: &Url, path: &str, peer: Option<&Url>) -> Result<Ack, GameError> {
        let url = endpoint_url(instance, path)?;
        debug!(%url, "dispatching");

        let mut request = self.client.post(url);
        if let Some(peer) = peer {
            request = request.query(&[("instance_url_param", peer_param(peer))]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GameError::peer_unreachable(instance, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(GameError::Rejected {
                instance: peer_param(instance).to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Ack>()
            .await
            .map_err(|e| GameError::peer_unreachable(instance, e))
    }
}

/// Instance URL as the peer expects it: no trailing slash on a bare host.
fn peer_param(url: &Url) -> &str {
    url.as_str().trim_end_matches('/')
}
