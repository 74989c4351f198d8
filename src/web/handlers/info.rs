//! Service info handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::web::dto::InfoResponse;
use crate::web::handlers::{AppState, APP_NAME};

/// GET / - Service name, version and environment.
pub async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: APP_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment.as_str().to_string(),
    })
}
