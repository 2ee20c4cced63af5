//! HTTP layer for Roster.
//!
//! Exposes an axum [`Router`] serving teachers and their nested students as
//! HTML pages or JSON, backed by any [`RosterStore`].

pub mod error;
pub mod handlers;
pub mod params;
pub mod paths;
pub mod respond;
pub mod views;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use roster_core::store::RosterStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{health, students, teachers};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_owned(),
      port:       3000,
      store_path: PathBuf::from("roster.db"),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RosterStore> {
  pub store: Arc<S>,
}

impl<S: RosterStore> AppState<S> {
  pub fn new(store: S) -> Self { Self { store: Arc::new(store) } }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the application.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/",                                   get(teachers::index::<S>))
    .route("/up",                                 get(health::show::<S>))
    .route("/teachers",                           get(teachers::index::<S>).post(teachers::create::<S>))
    .route("/teachers/new",                       get(teachers::new))
    .route(
      "/teachers/{teacher_id}",
      get(teachers::show::<S>)
        .patch(teachers::update::<S>)
        .put(teachers::update::<S>)
        .delete(teachers::destroy::<S>)
        .post(teachers::member_post::<S>),
    )
    .route("/teachers/{teacher_id}/edit",         get(teachers::edit::<S>))
    .route(
      "/teachers/{teacher_id}/students",
      get(students::index::<S>).post(students::create::<S>),
    )
    .route("/teachers/{teacher_id}/students/new", get(students::new::<S>))
    .route(
      "/teachers/{teacher_id}/students/{id}",
      get(students::show::<S>)
        .patch(students::update::<S>)
        .put(students::update::<S>)
        .delete(students::destroy::<S>)
        .post(students::member_post::<S>),
    )
    .route("/teachers/{teacher_id}/students/{id}/edit", get(students::edit::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
