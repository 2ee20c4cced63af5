//! Handlers for students, always nested under their teacher.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/teachers/{teacher_id}/students` | The teacher's students |
//! | `GET`  | `/teachers/{teacher_id}/students/new` | Form |
//! | `POST` | `/teachers/{teacher_id}/students` | Body: `student` params |
//! | `GET`  | `/teachers/{teacher_id}/students/{id}` | 404 if not this teacher's |
//! | `GET`  | `/teachers/{teacher_id}/students/{id}/edit` | Form |
//! | `PATCH`/`PUT` | `/teachers/{teacher_id}/students/{id}` | Partial update |
//! | `DELETE` | `/teachers/{teacher_id}/students/{id}` | Strict delete |
//! | `POST` | `/teachers/{teacher_id}/students/{id}` | `_method=patch\|delete` from HTML forms |

use axum::{
  Form, Json,
  extract::{Path, Query, State, rejection::FormRejection},
  http::{StatusCode, header},
  response::{Html, IntoResponse, Response},
};
use roster_core::{
  ValidationErrors,
  store::RosterStore,
  student::{Student, StudentDraft, StudentId, StudentParams},
  teacher::{Teacher, TeacherId},
  validation::MUST_EXIST,
};

use crate::{
  AppState,
  error::Error,
  handlers::{load_student, load_teacher},
  params::{self, Override, Permitted},
  paths,
  respond::{Format, Notice, NoticeQuery, invalid, see_other},
  views,
};

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /teachers/{teacher_id}/students`
pub async fn index<S>(
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
    Format::Json => Json(students).into_response(),
    Format::Html => views::students_index(&teacher, &students, query.notice()).into_response(),
  })
}

/// `GET /teachers/{teacher_id}/students/{id}`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Path((teacher_id, id)): Path<(TeacherId, StudentId)>,
  format: Format,
  Query(query): Query<NoticeQuery>,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let teacher = load_teacher(state.store.as_ref(), teacher_id).await?;
  let student = load_student(state.store.as_ref(), &teacher, id).await?;

  Ok(match format {
    Format::Json => Json(student).into_response(),
    Format::Html => views::student_show(&teacher, &student, query.notice()).into_response(),
  })
}

/// `GET /teachers/{teacher_id}/students/new`
pub async fn new<S>(
  State(state): State<AppState<S>>,
  Path(teacher_id): Path<TeacherId>,
) -> Result<Html<String>, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let teacher = load_teacher(state.store.as_ref(), teacher_id).await?;
  let draft = StudentDraft::for_teacher(teacher.id);
  Ok(views::student_form(&teacher, None, &draft, &ValidationErrors::new()))
}

/// `GET /teachers/{teacher_id}/students/{id}/edit`
pub async fn edit<S>(
  State(state): State<AppState<S>>,
  Path((teacher_id, id)): Path<(TeacherId, StudentId)>,
) -> Result<Html<String>, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let teacher = load_teacher(state.store.as_ref(), teacher_id).await?;
  let student = load_student(state.store.as_ref(), &teacher, id).await?;
  Ok(views::student_form(&teacher, Some(&student), &student.to_draft(), &ValidationErrors::new()))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /teachers/{teacher_id}/students`
///
/// Redirects to the teacher (HTML) or returns 201 + the stored student (JSON).
/// The teacher is resolved before the body is looked at, so an unknown teacher
/// is a 404 whatever was submitted.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(teacher_id): Path<TeacherId>,
  format: Format,
  params: Result<Permitted<StudentParams>, Error>,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let teacher = load_teacher(store, teacher_id).await?;
  let Permitted(params) = params?;

  let mut draft = StudentDraft::for_teacher(teacher.id);
  draft.apply(params);

  let errors = check(store, &teacher, &draft).await?;
  if !errors.is_empty() {
    return Ok(invalid(format, errors, |e| views::student_form(&teacher, None, &draft, e)));
  }

  let student = store.create_student(draft).await.map_err(Error::store)?;

  Ok(match format {
    Format::Html => see_other(&paths::teacher(teacher.id), Notice::StudentCreated),
    Format::Json => (
      StatusCode::CREATED,
      [(header::LOCATION, paths::teacher(teacher.id))],
      Json(student),
    )
      .into_response(),
  })
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH|PUT /teachers/{teacher_id}/students/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path((teacher_id, id)): Path<(TeacherId, StudentId)>,
  format: Format,
  params: Result<Permitted<StudentParams>, Error>,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let teacher = load_teacher(store, teacher_id).await?;
  let student = load_student(store, &teacher, id).await?;
  let Permitted(params) = params?;

  update_student(store, teacher, student, format, params).await
}

async fn update_student<S>(
  store: &S,
  teacher: Teacher,
  student: Student,
  format: Format,
  params: StudentParams,
) -> Result<Response, Error>
where
  S: RosterStore,
{
  let mut draft = student.to_draft();
  draft.apply(params);

  let errors = check(store, &teacher, &draft).await?;
  if !errors.is_empty() {
    return Ok(invalid(format, errors, |e| {
      views::student_form(&teacher, Some(&student), &draft, e)
    }));
  }

  let updated = store.update_student(student.id, draft).await.map_err(Error::store)?;

  Ok(match format {
    Format::Html => see_other(&paths::teacher(teacher.id), Notice::StudentUpdated),
    Format::Json => (
      StatusCode::OK,
      [(header::LOCATION, paths::student(updated.teacher_id, updated.id))],
      Json(updated),
    )
      .into_response(),
  })
}

// ─── Destroy ─────────────────────────────────────────────────────────────────

/// `DELETE /teachers/{teacher_id}/students/{id}`
pub async fn destroy<S>(
  State(state): State<AppState<S>>,
  Path((teacher_id, id)): Path<(TeacherId, StudentId)>,
  format: Format,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let teacher = load_teacher(store, teacher_id).await?;
  let student = load_student(store, &teacher, id).await?;

  destroy_student(store, &teacher, &student, format).await
}

async fn destroy_student<S>(
  store: &S,
  teacher: &Teacher,
  student: &Student,
  format: Format,
) -> Result<Response, Error>
where
  S: RosterStore,
{
  // Any failure here is fatal for the request; nothing is retried.
  store.delete_student(student.id).await.map_err(Error::store)?;

  Ok(match format {
    Format::Html => see_other(&paths::students(teacher.id), Notice::StudentDestroyed),
    Format::Json => StatusCode::NO_CONTENT.into_response(),
  })
}

// ─── Method override ─────────────────────────────────────────────────────────

/// `POST /teachers/{teacher_id}/students/{id}` with a `_method` field.
pub async fn member_post<S>(
  State(state): State<AppState<S>>,
  Path((teacher_id, id)): Path<(TeacherId, StudentId)>,
  format: Format,
  form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, Error>
where
  S: RosterStore + Clone + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let teacher = load_teacher(store, teacher_id).await?;
  let student = load_student(store, &teacher, id).await?;
  let Form(pairs) = form.map_err(|e| Error::BadRequest(e.body_text()))?;

  match params::method_override(&pairs) {
    Some(Override::Update) => {
      let params = params::from_form::<StudentParams>(pairs)?;
      update_student(store, teacher, student, format, params).await
    }
    Some(Override::Destroy) => destroy_student(store, &teacher, &student, format).await,
    None => Ok(StatusCode::METHOD_NOT_ALLOWED.into_response()),
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Field rules plus the existence of the owning teacher. Only a reassigned
/// `teacher_id` needs another lookup; the path teacher was just resolved.
async fn check<S>(
  store: &S,
  owner: &Teacher,
  draft: &StudentDraft,
) -> Result<ValidationErrors, Error>
where
  S: RosterStore,
{
  let mut errors = draft.errors();
  if draft.teacher_id != owner.id
    && store
      .get_teacher(draft.teacher_id)
      .await
      .map_err(Error::store)?
      .is_none()
  {
    errors.add("teacher", MUST_EXIST);
  }
  Ok(errors)
}
