//! HTTP surface of one instance.
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | POST | `/start/:delay?instance_url_param=<peer>` | Start |
//! | POST | `/pause` | Pause |
//! | POST | `/resume` | Resume |
//! | POST | `/stop` | Stop |
//! | GET | `/ping` | RespondPing |

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};

use crate::core::controller::PingController;
use crate::core::network::parse_instance_url;
use crate::error::GameError;
use crate::protocol::{Ack, StartParams};

/// Create the router with all control endpoints.
pub fn create_router(controller: PingController) -> Router {
    Router::new()
        .route("/start/:delay", post(start_game))
        .route("/pause", post(pause_game))
        .route("/resume", post(resume_game))
        .route("/stop", post(stop_game))
        .route("/ping", get(ping))
        .with_state(controller)
}

async fn start_game(
    State(controller): State<PingController>,
    Path(delay): Path<String>,
    Query(params): Query<StartParams>,
) -> Result<Json<Ack>, GameError> {
    let delay_ms = parse_delay(&delay)?;
    let peer = params
        .instance_url_param
        .as_deref()
        .map(parse_instance_url)
        .transpose()?;

    controller.start(delay_ms, peer).await.map(Json)
}

async fn pause_game(State(controller): State<PingController>) -> Json<Ack> {
    Json(controller.pause().await)
}

async fn resume_game(State(controller): State<PingController>) -> Result<Json<Ack>, GameError> {
    controller.resume().await.map(Json)
}

async fn stop_game(State(controller): State<PingController>) -> Json<Ack> {
    Json(controller.stop().await)
}

async fn ping(State(controller): State<PingController>) -> Json<Ack> {
    Json(controller.respond_ping())
}

fn parse_delay(raw: &str) -> Result<u64, GameError> {
    raw.parse::<u64>().map_err(|_| {
        GameError::invalid_request(format!(
            "delay must be a non-negative integer number of milliseconds, got '{raw}'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::testing::RecordingPeer;
    use crate::protocol::ErrorBody;
    use axum::body::{self, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (PingController, Router) {
        let controller = PingController::new(1000, Arc::new(RecordingPeer::reachable()));
        let router = create_router(controller.clone());
        (controller, router)
    }

    async fn call<T: DeserializeOwned>(router: Router, method: Method, uri: &str) -> (StatusCode, T) {
        let response = router
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn delay_must_be_non_negative_integer() {
        assert_eq!(parse_delay("250").unwrap(), 250);
        assert_eq!(parse_delay("0").unwrap(), 0);
        assert!(parse_delay("-1").is_err());
        assert!(parse_delay("1.5").is_err());
        assert!(parse_delay("soon").is_err());
    }

    #[tokio::test]
    async fn start_returns_effective_delay() {
        let (controller, router) = app();
        let (status, ack): (_, Ack) = call(
            router,
            Method::POST,
            "/start/200?instance_url_param=http://127.0.0.1:8001",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, Ack::started(200));
        let state = controller.snapshot().await;
        assert!(state.running);
        assert_eq!(state.delay_ms, 200);
        assert_eq!(state.peer.unwrap().as_str(), "http://127.0.0.1:8001/");
        controller.stop().await;
    }

    #[tokio::test]
    async fn start_without_peer_is_bad_request() {
        let (controller, router) = app();
        let (status, body): (_, ErrorBody) = call(router, Method::POST, "/start/200").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("instance_url_param"));
        assert!(!controller.snapshot().await.running);
    }

    #[tokio::test]
    async fn start_with_bad_delay_is_bad_request() {
        let (_, router) = app();
        let (status, _): (_, ErrorBody) = call(
            router,
            Method::POST,
            "/start/-5?instance_url_param=http://127.0.0.1:8001",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn start_with_bad_peer_is_bad_request() {
        let (_, router) = app();
        let (status, _): (_, ErrorBody) =
            call(router, Method::POST, "/start/10?instance_url_param=nowhere").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn resume_before_start_is_conflict() {
        let (_, router) = app();
        let (status, body): (_, ErrorBody) = call(router, Method::POST, "/resume").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.error.starts_with("Invalid state"));
    }

    #[tokio::test]
    async fn control_endpoints_acknowledge() {
        let (_, router) = app();
        let (_, ack): (_, Ack) = call(router.clone(), Method::POST, "/pause").await;
        assert_eq!(ack.message, "Game paused");
        let (_, ack): (_, Ack) = call(router.clone(), Method::POST, "/stop").await;
        assert_eq!(ack.message, "Game stopped");

        let (_, _): (_, Ack) = call(
            router.clone(),
            Method::POST,
            "/start/1000?instance_url_param=http://127.0.0.1:8001",
        )
        .await;
        let (status, ack): (_, Ack) = call(router.clone(), Method::POST, "/resume").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, Ack::new("Game resumed"));
        let (_, _): (_, Ack) = call(router, Method::POST, "/stop").await;
    }

    #[tokio::test]
    async fn ping_answers_pong_while_idle() {
        let (_, router) = app();
        let (status, ack): (_, Ack) = call(router, Method::GET, "/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert!(ack.is_pong());
        assert_eq!(ack.pong_time_ms, None);
    }
}
