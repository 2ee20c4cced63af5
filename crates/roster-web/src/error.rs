//! Error types and axum `IntoResponse` implementation.
//!
//! Validation failures are not errors at this level: handlers recover them
//! locally into a 422 response. Everything here aborts the request.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::{Error as CoreError, store::StoreError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a store failure. Domain refusals keep their HTTP meaning: a row
  /// that vanished between lookup and write is still a 404, and a teacher
  /// that gained students is still a 409.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.as_core() {
      Some(core @ (CoreError::TeacherNotFound(_) | CoreError::StudentNotFound(_))) => {
        Error::NotFound(core.to_string())
      }
      Some(core @ CoreError::TeacherHasStudents { .. }) => Error::Conflict(core.to_string()),
      Some(CoreError::Invalid(_)) | None => Error::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    let message = match self {
      Error::NotFound(m) | Error::BadRequest(m) | Error::Conflict(m) => m,
      Error::Store(e) => e.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
