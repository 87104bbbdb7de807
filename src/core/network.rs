use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

use crate::error::GameError;
use crate::protocol::Ack;

/// Outbound half of the peer contract: ask the other instance for a pong.
#[async_trait]
pub trait PeerClient: Send + Sync + 'static {
    async fn ping(&self, peer: &Url) -> Result<Ack, GameError>;
}

/// Joins `path` onto an instance base URL, keeping any path prefix the base already has.
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url, GameError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| GameError::invalid_request(format!("bad URL '{joined}': {e}")))
}

/// Parses an instance address handed in by the dispatcher.
pub fn parse_instance_url(raw: &str) -> Result<Url, GameError> {
    let url = Url::parse(raw)
        .map_err(|e| GameError::invalid_request(format!("invalid instance URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(GameError::invalid_request(format!(
            "instance URL '{raw}' must be an absolute http(s) URL"
        ))),
    }
}

/// Sends pings over HTTP with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpPeerClient {
    client: reqwest::Client,
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> Result<Self, GameError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GameError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn ping(&self, peer: &Url) -> Result<Ack, GameError> {
        let url = endpoint_url(peer, "ping")?;
        debug!(%url, "sending ping");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| GameError::peer_unreachable(peer, e))?;

        let ack = response
            .json::<Ack>()
            .await
            .map_err(|e| GameError::peer_unreachable(peer, e))?;

        if !ack.is_pong() {
            return Err(GameError::peer_unreachable(
                peer,
                format!("expected pong, got '{}'", ack.message),
            ));
        }
        Ok(ack)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_appends_path() {
        let base = Url::parse("http://127.0.0.1:8001").unwrap();
        assert_eq!(
            endpoint_url(&base, "ping").unwrap().as_str(),
            "http://127.0.0.1:8001/ping"
        );
    }

    #[test]
    fn endpoint_url_keeps_prefix() {
        let base = Url::parse("http://host/game/").unwrap();
        assert_eq!(
            endpoint_url(&base, "/start/5").unwrap().as_str(),
            "http://host/game/start/5"
        );
    }

    #[test]
    fn instance_url_must_be_http() {
        assert!(parse_instance_url("http://127.0.0.1:8000").is_ok());
        assert!(parse_instance_url("127.0.0.1:8000").is_err());
        assert!(parse_instance_url("ftp://host").is_err());
        assert!(parse_instance_url("not a url").is_err());
    }

    #[tokio::test]
    async fn unreachable_peer_is_reported() {
        let client = HttpPeerClient::new(Duration::from_millis(500)).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let peer = Url::parse(&format!("http://{addr}")).unwrap();
        let err = client.ping(&peer).await.unwrap_err();
        assert!(matches!(err, GameError::PeerUnreachable { .. }));
    }

    /// Serves `reply` on `GET /ping` and returns the base URL.
    async fn ping_stub(reply: Ack) -> Url {
        use axum::{routing::get, Json, Router};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/ping", get(move || async move { Json(reply) }));
        tokio::spawn(async move { axum::serve(listener, app).await });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    #[tokio::test]
    async fn pong_reply_is_accepted() {
        let client = HttpPeerClient::new(Duration::from_secs(2)).unwrap();
        let peer = ping_stub(Ack::pong()).await;

        let ack = client.ping(&peer).await.unwrap();
        assert!(ack.is_pong());
    }

    #[tokio::test]
    async fn non_pong_reply_is_a_failed_ping() {
        let client = HttpPeerClient::new(Duration::from_secs(2)).unwrap();
        let peer = ping_stub(Ack::new(crate::protocol::GAME_PAUSED)).await;

        let err = client.ping(&peer).await.unwrap_err();
        match err {
            GameError::PeerUnreachable { message, .. } => {
                assert!(message.contains("Game paused"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
