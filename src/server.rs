//! HTTP transport for the control surface.
//!
//! | Route              | Operation                    |
//! |--------------------|------------------------------|
//! | `GET /api/screen`  | current screen and auto-rotate |
//! | `POST /api/screen` | change either or both        |
//! | `GET /api/status`  | status plus available screens |
//!
//! Any origin may call the API. Bodies over the configured limit are refused
//! with 413 before they reach a handler.

use crate::control::{Capabilities, ControlSurface, ScreenCommand, ScreenStatus, SelectionResponse};
use anyhow::{Context, Result};
use axum::{body::Bytes, extract::State, routing::get, Json, Router};
use std::future::Future;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

pub fn build_router(control: ControlSurface, max_body_bytes: usize) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/api/screen", get(get_screen).post(post_screen))
        .route("/api/status", get(get_status))
        .with_state(control)
        .layer(middleware)
}

/// Serve `app` until `shutdown` resolves, then drain in-flight requests.
pub async fn run_server(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr().context("reading control listener address")?;
    log::info!("Control API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("running control server")?;

    log::info!("Control API stopped");
    Ok(())
}

async fn get_screen(State(control): State<ControlSurface>) -> Json<ScreenStatus> {
    Json(control.screen_status())
}

async fn post_screen(State(control): State<ControlSurface>, body: Bytes) -> Json<SelectionResponse> {
    match ScreenCommand::from_json(&body) {
        Ok(command) => Json(control.set_screen_selection(&command)),
        Err(err) => {
            log::warn!("rejecting screen command: {err}");
            Json(control.reject())
        }
    }
}

async fn get_status(State(control): State<ControlSurface>) -> Json<Capabilities> {
    Json(control.capabilities())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DisplayHandle;
    use crate::Screen;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> (Router, DisplayHandle) {
        let handle = DisplayHandle::default();
        (build_router(ControlSurface::new(handle.clone()), 256), handle)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/screen")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_get_screen() {
        let (app, _) = app();
        let (status, json) = send(app, get("/api/screen")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["current_screen"], "weather");
        assert_eq!(json["auto_rotate"], true);
    }

    #[tokio::test]
    async fn test_post_screen_updates_state() {
        let (app, handle) = app();
        let (status, json) = send(app, post(r#"{"screen": "transit", "auto_rotate": false}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["current_screen"], "transit");
        assert_eq!(json["auto_rotate"], false);

        let state = handle.snapshot();
        assert_eq!(state.selected, Screen::Transit);
        assert!(!state.auto_rotate);
    }

    #[tokio::test]
    async fn test_post_unknown_screen_is_ignored() {
        let (app, handle) = app();
        let (status, json) = send(app, post(r#"{"screen": "football"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["current_screen"], "weather");
        assert_eq!(handle.snapshot().selected, Screen::Weather);
    }

    #[tokio::test]
    async fn test_post_malformed_body() {
        let (app, handle) = app();
        handle.update(Some(Screen::Standings), None);
        let (status, json) = send(app, post("screen=transit")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["current_screen"], "standings");
    }

    #[tokio::test]
    async fn test_oversized_body_is_refused() {
        let (app, handle) = app();
        let padding = "x".repeat(1024);
        let body = format!(r#"{{"screen": "transit", "pad": "{padding}"}}"#);
        let (status, _) = send(app, post(&body)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(handle.snapshot().selected, Screen::Weather);
    }

    #[tokio::test]
    async fn test_status_lists_screens() {
        let (app, _) = app();
        let (_, json) = send(app, get("/api/status")).await;
        assert_eq!(json["available_screens"], serde_json::json!(["weather", "standings", "transit"]));
        assert_eq!(json["current_screen"], "weather");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let (app, _) = app();
        let request = Request::builder()
            .uri("/api/screen")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_oversized_body_still_carries_cors_header() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/screen")
            .header(header::ORIGIN, "http://example.com")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("x".repeat(1024)))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (app, _) = app();
        let (status, _) = send(app, get("/api/weather")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
