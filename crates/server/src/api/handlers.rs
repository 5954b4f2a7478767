use crate::config::AppState;
use axum::{extract::State, Json};
use datetool_core::{discovery_document, DateResponse, DiscoveryDocument};
use std::sync::Arc;

/// Describe the tools this server exposes
pub async fn discovery() -> Json<DiscoveryDocument> {
    Json(discovery_document())
}

/// Current local date and time
pub async fn get_date(State(state): State<Arc<AppState>>) -> Json<DateResponse> {
    let response = DateResponse::now(state.clock.as_ref());
    tracing::debug!(date = %response.date, "Served current date");
    Json(response)
}
