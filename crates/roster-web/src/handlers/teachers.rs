//! Handlers for `/teachers` endpoints. `GET /` is the teacher index too.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/teachers` | All teachers |
//! | `GET`  | `/teachers/new` | Form |
//! | `POST` | `/teachers` | Body: `teacher` params |
//! | `GET`  | `/teachers/{teacher_id}` | Teacher with their students |
//! | `GET`  | `/teachers/{teacher_id}/edit` | Form |
//! | `PATCH`/`PUT` | `/teachers/{teacher_id}` | Partial update |
//! | `DELETE` | `/teachers/{teacher_id}` | 409 while students remain |
//! | `POST` | `/teachers/{teacher_id}` | `_method=patch\|delete` from HTML forms |

use axum::{
  Form, Json,
  extract::{Path, Query, State, rejection::FormRejection},
  http::{StatusCode, header},
  response::{Html, IntoResponse, Response},
};
use roster_core::{
  ValidationErrors,
  store::RosterStore,
  student::Student,
  teacher::{Teacher, TeacherDraft, TeacherId, TeacherParams},
};
use serde::Serialize;

use crate::{
  AppState,
  error::Error,
  handlers::load_teacher,
  params::{self, Override, Permitted},
  paths,
  respond::{Format, Notice, NoticeQuery, invalid, see_other},
  views,
};

/// JSON shape of `GET /teachers/{teacher_id}`.
#[derive(Debug, Serialize)]
pub struct TeacherDetail {
  #[serde(flatten)]
  pub teacher:  Teacher,
  pub students: Vec<Student>,
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /teachers` and `GET /`
pub async fn index<S>(
  State(state): State<AppState<S>>,
  format: Format,
  Query(query): Query<NoticeQuery>,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let teachers = state.store.list_teachers().await.map_err(Error::store)?;
  Ok(match format {
    Format::Json => Json(teachers).into_response(),
    Format::Html => views::teachers_index(&teachers, query.notice()).into_response(),
  })
}

/// `GET /teachers/{teacher_id}`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Path(teacher_id): Path<TeacherId>,
  format: Format,
  Query(query): Query<NoticeQuery>,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let teacher = load_teacher(state.store.as_ref(), teacher_id).await?;
  let students = state
    .store
    .list_students(teacher.id)
    .await
    .map_err(Error::store)?;

  Ok(match format {
    Format::Json => Json(TeacherDetail { teacher, students }).into_response(),
    Format::Html => views::teacher_show(&teacher, &students, query.notice()).into_response(),
  })
}

/// `GET /teachers/new`
pub async fn new() -> Html<String> {
  views::teacher_form(None, &TeacherDraft::default(), &ValidationErrors::new())
}

/// `GET /teachers/{teacher_id}/edit`
pub async fn edit<S>(
  State(state): State<AppState<S>>,
  Path(teacher_id): Path<TeacherId>,
) -> Result<Html<String>, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let teacher = load_teacher(state.store.as_ref(), teacher_id).await?;
  Ok(views::teacher_form(Some(&teacher), &teacher.to_draft(), &ValidationErrors::new()))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /teachers`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  format: Format,
  Permitted(params): Permitted<TeacherParams>,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let mut draft = TeacherDraft::default();
  draft.apply(params);

  if let Err(errors) = draft.validate() {
    return Ok(invalid(format, errors, |e| views::teacher_form(None, &draft, e)));
  }

  let teacher = state.store.create_teacher(draft).await.map_err(Error::store)?;

  Ok(match format {
    Format::Html => see_other(&paths::teacher(teacher.id), Notice::TeacherCreated),
    Format::Json => (
      StatusCode::CREATED,
      [(header::LOCATION, paths::teacher(teacher.id))],
      Json(teacher),
    )
      .into_response(),
  })
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH|PUT /teachers/{teacher_id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(teacher_id): Path<TeacherId>,
  format: Format,
  params: Result<Permitted<TeacherParams>, Error>,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let teacher = load_teacher(store, teacher_id).await?;
  let Permitted(params) = params?;

  update_teacher(store, teacher, format, params).await
}

async fn update_teacher<S>(
  store: &S,
  teacher: Teacher,
  format: Format,
  params: TeacherParams,
) -> Result<Response, Error>
where
  S: RosterStore,
{
  let mut draft = teacher.to_draft();
  draft.apply(params);

  if let Err(errors) = draft.validate() {
    return Ok(invalid(format, errors, |e| views::teacher_form(Some(&teacher), &draft, e)));
  }

  let updated = store.update_teacher(teacher.id, draft).await.map_err(Error::store)?;

  Ok(match format {
    Format::Html => see_other(&paths::teacher(updated.id), Notice::TeacherUpdated),
    Format::Json => (
      StatusCode::OK,
      [(header::LOCATION, paths::teacher(updated.id))],
      Json(updated),
    )
      .into_response(),
  })
}

// ─── Destroy ─────────────────────────────────────────────────────────────────

/// `DELETE /teachers/{teacher_id}`
pub async fn destroy<S>(
  State(state): State<AppState<S>>,
  Path(teacher_id): Path<TeacherId>,
  format: Format,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let teacher = load_teacher(store, teacher_id).await?;
  destroy_teacher(store, &teacher, format).await
}

async fn destroy_teacher<S>(store: &S, teacher: &Teacher, format: Format) -> Result<Response, Error>
where
  S: RosterStore,
{
  let count = store.count_students(teacher.id).await.map_err(Error::store)?;
  if count > 0 {
    tracing::warn!(teacher_id = teacher.id, count, "refusing to delete teacher with students");
    return Err(Error::Conflict(format!(
      "teacher {} still has {count} student(s)",
      teacher.id
    )));
  }

  store.delete_teacher(teacher.id).await.map_err(Error::store)?;

  Ok(match format {
    Format::Html => see_other(&paths::teachers(), Notice::TeacherDestroyed),
    Format::Json => StatusCode::NO_CONTENT.into_response(),
  })
}

// ─── Method override ─────────────────────────────────────────────────────────

/// `POST /teachers/{teacher_id}` with a `_method` field.
pub async fn member_post<S>(
  State(state): State<AppState<S>>,
  Path(teacher_id): Path<TeacherId>,
  format: Format,
  form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let teacher = load_teacher(store, teacher_id).await?;
  let Form(pairs) = form.map_err(|e| Error::BadRequest(e.body_text()))?;

  match params::method_override(&pairs) {
    Some(Override::Update) => {
      let params = params::from_form::<TeacherParams>(pairs)?;
      update_teacher(store, teacher, format, params).await
    }
    Some(Override::Destroy) => destroy_teacher(store, &teacher, format).await,
    None => Ok(StatusCode::METHOD_NOT_ALLOWED.into_response()),
  }
}
