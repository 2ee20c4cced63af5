//! `GET /up`: liveness plus a round-trip to the store.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::store::RosterStore;
use serde_json::json;

use crate::AppState;

pub async fn show<S>(State(state): State<AppState<S>>) -> Response
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  match state.store.ping().await {
    Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
    Err(e) => {
      tracing::warn!(error = %e, "health check failed");
      (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unavailable" }))).into_response()
    }
  }
}
