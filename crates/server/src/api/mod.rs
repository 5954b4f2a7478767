use crate::config::{AppState, ServerConfig};
use anyhow::{Context, Result};
use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use datetool_core::DATE_PATH;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the API server
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = create_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!(
        "API server listening on http://{} (debug: {})",
        addr,
        config.server.debug
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Create the API router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::discovery))
        .route(DATE_PATH, get(handlers::get_date))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().include_headers(true))
                        .on_response(DefaultOnResponse::new().include_headers(true)),
                )
                .layer(CorsLayer::permissive()),
        )
        .with_state(Arc::new(state))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::with_details("Not found", uri.path())),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, Response};
    use chrono::{NaiveDate, NaiveDateTime};
    use datetool_core::{FixedClock, SystemClock};
    use regex::Regex;
    use std::time::Duration;
    use tower::ServiceExt;

    const DISCOVERY_JSON: &str = r#"{"tools":[{"name":"get_current_date","description":"Retrieves the current date and time from a local Flask server.","input_schema":{"type":"object","properties":{},"required":[]},"path":"/get-date","method":"GET"}]}"#;

    fn fixed_router() -> Router {
        let at = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap();
        create_router(AppState::new(Arc::new(FixedClock::new(at))))
    }

    async fn send(router: Router, method: Method, uri: &str) -> Response<Body> {
        router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_string(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn fetch_date(router: Router) -> String {
        let response = send(router, Method::GET, "/get-date").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        body["date"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_discovery_returns_literal_catalog() {
        let response = send(fixed_router(), Method::GET, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(body_string(response).await, DISCOVERY_JSON);
    }

    #[tokio::test]
    async fn test_discovery_is_byte_identical_across_requests() {
        let router = create_router(AppState::default());
        let first = body_string(send(router.clone(), Method::GET, "/").await).await;

        for _ in 0..5 {
            let next = body_string(send(router.clone(), Method::GET, "/").await).await;
            assert_eq!(next, first);
        }
    }

    #[tokio::test]
    async fn test_get_date_with_fixed_clock() {
        let response = send(fixed_router(), Method::GET, "/get-date").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"date":"2024-03-15 09:05:03"}"#);
    }

    #[tokio::test]
    async fn test_get_date_matches_pattern() {
        let pattern = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
        let router = create_router(AppState::new(Arc::new(SystemClock)));

        for _ in 0..3 {
            let date = fetch_date(router.clone()).await;
            assert!(pattern.is_match(&date), "unexpected date format: {}", date);
        }
    }

    #[tokio::test]
    async fn test_get_date_advances_with_wall_clock() {
        let router = create_router(AppState::new(Arc::new(SystemClock)));
        let parse = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();

        let first = parse(&fetch_date(router.clone()).await);
        tokio::time::sleep(Duration::from_secs(2)).await;
        let second = parse(&fetch_date(router).await);

        let elapsed = (second - first).num_seconds();
        assert!((1..=3).contains(&elapsed), "elapsed {} seconds", elapsed);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = send(fixed_router(), Method::GET, "/nonexistent").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "Not found");
        assert_eq!(body["details"], "/nonexistent");
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let response = send(fixed_router(), Method::POST, "/get-date").await;
        assert_ne!(response.status(), StatusCode::OK);

        let response = send(fixed_router(), Method::DELETE, "/").await;
        assert_ne!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_response_omits_empty_details() {
        let response = ErrorResponse {
            error: "Not found".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"error":"Not found"}"#);
    }
}
