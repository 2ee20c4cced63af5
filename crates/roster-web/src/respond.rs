//! Content negotiation and the shared response shapes.
//!
//! Every mutating handler ends in one of two branches: a redirect carrying a
//! [`Notice`] (HTML) or a resource body (JSON), and on validation failure a
//! 422 with either the re-rendered form or the error map.

use std::convert::Infallible;

use axum::{
  Json,
  extract::FromRequestParts,
  http::{HeaderMap, StatusCode, header, request::Parts},
  response::{Html, IntoResponse, Redirect, Response},
};
use roster_core::ValidationErrors;
use serde::Deserialize;

// ─── Format ──────────────────────────────────────────────────────────────────

/// The representation the client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  Html,
  Json,
}

impl Format {
  pub fn from_headers(headers: &HeaderMap) -> Self {
    let wants_json = headers
      .get_all(header::ACCEPT)
      .iter()
      .filter_map(|v| v.to_str().ok())
      .any(|v| v.contains("application/json"));
    if wants_json { Format::Json } else { Format::Html }
  }
}

impl<S> FromRequestParts<S> for Format
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    Ok(Format::from_headers(&parts.headers))
  }
}

// ─── Notice ──────────────────────────────────────────────────────────────────

/// A one-shot success message carried across a redirect as `?notice=<slug>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
  TeacherCreated,
  TeacherUpdated,
  TeacherDestroyed,
  StudentCreated,
  StudentUpdated,
  StudentDestroyed,
}

impl Notice {
  const ALL: [Notice; 6] = [
    Notice::TeacherCreated,
    Notice::TeacherUpdated,
    Notice::TeacherDestroyed,
    Notice::StudentCreated,
    Notice::StudentUpdated,
    Notice::StudentDestroyed,
  ];

  pub fn slug(self) -> &'static str {
    match self {
      Notice::TeacherCreated => "teacher_created",
      Notice::TeacherUpdated => "teacher_updated",
      Notice::TeacherDestroyed => "teacher_destroyed",
      Notice::StudentCreated => "student_created",
      Notice::StudentUpdated => "student_updated",
      Notice::StudentDestroyed => "student_destroyed",
    }
  }

  pub fn message(self) -> &'static str {
    match self {
      Notice::TeacherCreated => "Teacher was successfully created.",
      Notice::TeacherUpdated => "Teacher was successfully updated.",
      Notice::TeacherDestroyed => "Teacher was successfully destroyed.",
      Notice::StudentCreated => "Student was successfully created.",
      Notice::StudentUpdated => "Student was successfully updated.",
      Notice::StudentDestroyed => "Student was successfully destroyed.",
    }
  }

  pub fn from_slug(slug: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|n| n.slug() == slug)
  }
}

/// Query string of pages that can display a [`Notice`]. Unknown slugs are
/// ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
  #[serde(default)]
  notice: Option<String>,
}

impl NoticeQuery {
  pub fn notice(&self) -> Option<Notice> { self.notice.as_deref().and_then(Notice::from_slug) }
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// `303 See Other` to `location`, flashing `notice` on the target page.
pub fn see_other(location: &str, notice: Notice) -> Response {
  Redirect::to(&format!("{location}?notice={}", notice.slug())).into_response()
}

/// `422 Unprocessable Entity`: the error map for JSON clients, otherwise the
/// form produced by `form`.
pub fn invalid(
  format: Format,
  errors: ValidationErrors,
  form: impl FnOnce(&ValidationErrors) -> Html<String>,
) -> Response {
  tracing::debug!(%errors, "rejecting invalid submission");
  match format {
    Format::Json => (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
    Format::Html => (StatusCode::UNPROCESSABLE_ENTITY, form(&errors)).into_response(),
  }
}
