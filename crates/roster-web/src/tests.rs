//! Router tests against an in-memory store.

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use roster_core::{
  store::RosterStore,
  student::{Student, StudentDraft, StudentParams},
  teacher::{Teacher, TeacherDraft},
};
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, router};

const FORM: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";

async fn make_state() -> AppState<SqliteStore> {
  AppState::new(SqliteStore::open_in_memory().await.unwrap())
}

async fn oneshot_raw(
  state:   AppState<SqliteStore>,
  method:  &str,
  uri:     &str,
  headers: Vec<(header::HeaderName, &str)>,
  body:    &str,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(k, v);
  }
  let req = builder.body(Body::from(body.to_string())).unwrap();
  router(state).oneshot(req).await.unwrap()
}

async fn form(state: &AppState<SqliteStore>, method: &str, uri: &str, body: &str) -> Response {
  oneshot_raw(state.clone(), method, uri, vec![(header::CONTENT_TYPE, FORM)], body).await
}

async fn json_req(state: &AppState<SqliteStore>, method: &str, uri: &str, body: Value) -> Response {
  oneshot_raw(
    state.clone(),
    method,
    uri,
    vec![(header::CONTENT_TYPE, JSON), (header::ACCEPT, JSON)],
    &body.to_string(),
  )
  .await
}

async fn get(state: &AppState<SqliteStore>, uri: &str, accept: &str) -> Response {
  oneshot_raw(state.clone(), "GET", uri, vec![(header::ACCEPT, accept)], "").await
}

async fn body_text(resp: Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: Response) -> Value {
  serde_json::from_str(&body_text(resp).await).unwrap()
}

fn location(resp: &Response) -> &str {
  resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

async fn seed_teacher(state: &AppState<SqliteStore>, name: &str) -> Teacher {
  state
    .store
    .create_teacher(TeacherDraft { name: name.into(), ..Default::default() })
    .await
    .unwrap()
}

async fn seed_student(state: &AppState<SqliteStore>, teacher_id: i64, name: &str) -> Student {
  let mut draft = StudentDraft::for_teacher(teacher_id);
  draft.apply(StudentParams {
    name:     Some(name.into()),
    gender:   Some("F".into()),
    grade:    Some("10".into()),
    attended: Some(false),
    ..Default::default()
  });
  state.store.create_student(draft).await.unwrap()
}

// ── Student create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn html_create_redirects_to_teacher_with_notice() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;

  let resp = form(
    &state,
    "POST",
    &format!("/teachers/{}/students", teacher.id),
    "student[name]=Ada&student[gender]=F&student[grade]=10\
     &student[attended]=0&student[attended]=1",
  )
  .await;

  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), format!("/teachers/{}?notice=student_created", teacher.id));

  let students = state.store.list_students(teacher.id).await.unwrap();
  assert_eq!(students.len(), 1);
  assert_eq!(students[0].name, "Ada");
  assert_eq!(students[0].teacher_id, teacher.id);
  assert!(students[0].attended);

  let page = body_text(get(&state, location(&resp), "text/html").await).await;
  assert!(page.contains("Student was successfully created."), "{page}");
  assert!(page.contains("Ada"), "{page}");
}

#[tokio::test]
async fn json_create_returns_201_and_the_student() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;

  let resp = json_req(
    &state,
    "POST",
    &format!("/teachers/{}/students", teacher.id),
    json!({ "student": { "name": "Ada", "gender": "F", "grade": "10", "attended": true } }),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(location(&resp), format!("/teachers/{}", teacher.id));
  let body = body_json(resp).await;
  assert_eq!(body["name"], "Ada");
  assert_eq!(body["teacher_id"], teacher.id);
  assert_eq!(body["attended"], true);
}

#[tokio::test]
async fn create_under_missing_teacher_is_404_and_writes_nothing() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;

  let resp = form(
    &state,
    "POST",
    "/teachers/999/students",
    "student[name]=Ada&student[gender]=F&student[grade]=10",
  )
  .await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert!(state.store.list_students(teacher.id).await.unwrap().is_empty());
  assert_eq!(state.store.count_students(999).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_create_is_422_for_both_formats() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let uri = format!("/teachers/{}/students", teacher.id);

  let resp = json_req(
    &state,
    "POST",
    &uri,
    json!({ "student": { "gender": "F", "grade": "10" } }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body = body_json(resp).await;
  assert_eq!(body["name"], json!(["can't be blank"]));

  let resp = form(&state, "POST", &uri, "student[gender]=F&student[grade]=10").await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let page = body_text(resp).await;
  assert!(page.contains("Name can&#39;t be blank"), "{page}");
  assert!(page.contains("value=\"F\""), "submitted values are kept: {page}");

  assert!(state.store.list_students(teacher.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_resource_key_is_400() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let uri = format!("/teachers/{}/students", teacher.id);

  let resp = json_req(&state, "POST", &uri, json!({ "name": "Ada" })).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = form(&state, "POST", &uri, "name=Ada").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  assert!(state.store.list_students(teacher.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn reassigning_to_missing_teacher_is_422() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;

  let resp = json_req(
    &state,
    "POST",
    &format!("/teachers/{}/students", teacher.id),
    json!({ "student": { "name": "Ada", "gender": "F", "grade": "10", "teacher_id": 999 } }),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body = body_json(resp).await;
  assert_eq!(body["teacher"], json!(["must exist"]));
}

#[tokio::test]
async fn unknown_teacher_is_404_before_the_body_is_judged() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;
  let member = format!("/teachers/999/students/{}", ada.id);

  let cases: Vec<(&str, String, &str, String)> = vec![
    ("POST", "/teachers/999/students".into(), FORM, String::new()),
    ("POST", "/teachers/999/students".into(), JSON, json!({ "name": "Ada" }).to_string()),
    ("PATCH", member.clone(), JSON, json!({ "student": {} }).to_string()),
    ("POST", member.clone(), FORM, "_method=patch".into()),
    ("POST", member.clone(), "text/plain", "_method=delete".into()),
    ("PATCH", "/teachers/999".into(), JSON, json!({ "teacher": {} }).to_string()),
    ("POST", "/teachers/999".into(), "text/plain", String::new()),
  ];

  for (method, uri, content_type, body) in cases {
    let resp = oneshot_raw(
      state.clone(),
      method,
      &uri,
      vec![(header::CONTENT_TYPE, content_type), (header::ACCEPT, JSON)],
      &body,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method} {uri} ({content_type})");
  }

  assert_eq!(state.store.get_student(ada.id).await.unwrap().unwrap(), ada);
}

#[tokio::test]
async fn every_nested_action_under_unknown_teacher_is_404() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;
  let member = format!("/teachers/999/students/{}", ada.id);
  let valid_form = "student[name]=Eve&student[gender]=F&student[grade]=9";
  let valid_json = json!({ "student": { "name": "Eve", "gender": "F", "grade": "9" } }).to_string();

  let cases: Vec<(&str, String, Option<&str>, String)> = vec![
    ("GET", "/teachers/999/students".into(), None, String::new()),
    ("GET", "/teachers/999/students/new".into(), None, String::new()),
    ("POST", "/teachers/999/students".into(), Some(FORM), valid_form.into()),
    ("POST", "/teachers/999/students".into(), Some(JSON), valid_json.clone()),
    ("GET", member.clone(), None, String::new()),
    ("GET", format!("{member}/edit"), None, String::new()),
    ("PATCH", member.clone(), Some(FORM), valid_form.into()),
    ("PUT", member.clone(), Some(JSON), valid_json.clone()),
    ("POST", member.clone(), Some(FORM), format!("_method=patch&{valid_form}")),
    ("DELETE", member.clone(), None, String::new()),
    ("POST", member.clone(), Some(FORM), "_method=delete".into()),
  ];

  for (method, uri, content_type, body) in cases {
    let mut headers = vec![(header::ACCEPT, JSON)];
    if let Some(content_type) = content_type {
      headers.push((header::CONTENT_TYPE, content_type));
    }
    let resp = oneshot_raw(state.clone(), method, &uri, headers, &body).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method} {uri}");
  }

  assert_eq!(state.store.count_students(teacher.id).await.unwrap(), 1);
  assert_eq!(state.store.count_students(999).await.unwrap(), 0);
  assert_eq!(state.store.get_student(ada.id).await.unwrap().unwrap(), ada);
}

// ── Student reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn index_is_scoped_to_the_teacher() {
  let state = make_state().await;
  let frizzle = seed_teacher(&state, "Ms. Frizzle").await;
  let keating = seed_teacher(&state, "Mr. Keating").await;
  seed_student(&state, frizzle.id, "Ada").await;
  seed_student(&state, keating.id, "Todd").await;

  let resp = get(&state, &format!("/teachers/{}/students", frizzle.id), JSON).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  let names: Vec<_> = body.as_array().unwrap().iter().map(|s| s["name"].clone()).collect();
  assert_eq!(names, vec![json!("Ada")]);
}

#[tokio::test]
async fn another_teachers_student_is_404() {
  let state = make_state().await;
  let frizzle = seed_teacher(&state, "Ms. Frizzle").await;
  let keating = seed_teacher(&state, "Mr. Keating").await;
  let todd = seed_student(&state, keating.id, "Todd").await;

  let resp = get(&state, &format!("/teachers/{}/students/{}", frizzle.id, todd.id), JSON).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = get(&state, &format!("/teachers/{}/students/{}", keating.id, todd.id), JSON).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["name"], "Todd");
}

#[tokio::test]
async fn new_and_edit_forms_render() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;

  let resp = get(&state, &format!("/teachers/{}/students/new", teacher.id), "text/html").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let page = body_text(resp).await;
  assert!(page.contains("name=\"student[name]\""), "{page}");

  let resp = get(
    &state,
    &format!("/teachers/{}/students/{}/edit", teacher.id, ada.id),
    "text/html",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let page = body_text(resp).await;
  assert!(page.contains("value=\"Ada\""), "{page}");
  assert!(page.contains("name=\"_method\" value=\"patch\""), "{page}");
}

#[tokio::test]
async fn non_numeric_id_is_rejected() {
  let state = make_state().await;
  let resp = get(&state, "/teachers/abc/students", JSON).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Student update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn update_only_touches_permitted_fields() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;

  let resp = json_req(
    &state,
    "PATCH",
    &format!("/teachers/{}/students/{}", teacher.id, ada.id),
    json!({ "student": { "grade": "11", "id": 77, "created_at": "1999-01-01T00:00:00Z" } }),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::OK);
  let stored = state.store.get_student(ada.id).await.unwrap().unwrap();
  assert_eq!(stored.grade, "11");
  assert_eq!(stored.name, "Ada");
  assert_eq!(stored.id, ada.id);
  assert_eq!(stored.created_at, ada.created_at);
  assert!(state.store.get_student(77).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_update_leaves_the_row_alone() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;

  let resp = form(
    &state,
    "PATCH",
    &format!("/teachers/{}/students/{}", teacher.id, ada.id),
    "student[name]=&student[grade]=12",
  )
  .await;

  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let stored = state.store.get_student(ada.id).await.unwrap().unwrap();
  assert_eq!(stored, ada);
}

#[tokio::test]
async fn html_update_via_method_override() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;

  let resp = form(
    &state,
    "POST",
    &format!("/teachers/{}/students/{}", teacher.id, ada.id),
    "_method=patch&student[name]=Ada+Lovelace&student[attended]=0&student[attended]=1",
  )
  .await;

  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), format!("/teachers/{}?notice=student_updated", teacher.id));
  let stored = state.store.get_student(ada.id).await.unwrap().unwrap();
  assert_eq!(stored.name, "Ada Lovelace");
  assert!(stored.attended);
}

#[tokio::test]
async fn update_can_move_a_student_to_another_teacher() {
  let state = make_state().await;
  let frizzle = seed_teacher(&state, "Ms. Frizzle").await;
  let keating = seed_teacher(&state, "Mr. Keating").await;
  let ada = seed_student(&state, frizzle.id, "Ada").await;

  let resp = json_req(
    &state,
    "PUT",
    &format!("/teachers/{}/students/{}", frizzle.id, ada.id),
    json!({ "student": { "teacher_id": keating.id.to_string() } }),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(location(&resp), format!("/teachers/{}/students/{}", keating.id, ada.id));
  assert!(state.store.list_students(frizzle.id).await.unwrap().is_empty());
  assert_eq!(state.store.count_students(keating.id).await.unwrap(), 1);
}

// ── Student destroy ─────────────────────────────────────────────────────────

#[tokio::test]
async fn html_destroy_redirects_to_students_index() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;
  let uri = format!("/teachers/{}/students/{}", teacher.id, ada.id);

  let resp = oneshot_raw(state.clone(), "DELETE", &uri, vec![], "").await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(
    location(&resp),
    format!("/teachers/{}/students?notice=student_destroyed", teacher.id)
  );

  let resp = get(&state, &uri, JSON).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn json_destroy_is_204_and_second_destroy_is_404() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;
  let uri = format!("/teachers/{}/students/{}", teacher.id, ada.id);

  let resp = oneshot_raw(state.clone(), "DELETE", &uri, vec![(header::ACCEPT, JSON)], "").await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = oneshot_raw(state.clone(), "DELETE", &uri, vec![(header::ACCEPT, JSON)], "").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn destroy_via_method_override() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;

  let resp = form(
    &state,
    "POST",
    &format!("/teachers/{}/students/{}", teacher.id, ada.id),
    "_method=delete",
  )
  .await;

  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(state.store.get_student(ada.id).await.unwrap().is_none());
}

#[tokio::test]
async fn post_to_member_without_override_is_405() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  let ada = seed_student(&state, teacher.id, "Ada").await;

  let resp = form(
    &state,
    "POST",
    &format!("/teachers/{}/students/{}", teacher.id, ada.id),
    "student[name]=Eve",
  )
  .await;

  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  assert_eq!(state.store.get_student(ada.id).await.unwrap().unwrap().name, "Ada");
}

// ── Teachers ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn root_lists_teachers() {
  let state = make_state().await;
  seed_teacher(&state, "Ms. Frizzle").await;
  seed_teacher(&state, "Mr. <Keating>").await;

  let resp = get(&state, "/", "text/html").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let page = body_text(resp).await;
  assert!(page.contains("Ms. Frizzle"), "{page}");
  assert!(page.contains("Mr. &lt;Keating&gt;"), "{page}");

  let resp = get(&state, "/teachers", JSON).await;
  assert_eq!(body_json(resp).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn teacher_crud_round() {
  let state = make_state().await;

  let resp = form(&state, "POST", "/teachers", "teacher[name]=Ms.+Frizzle&teacher[age]=42").await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let teacher = state.store.list_teachers().await.unwrap().remove(0);
  assert_eq!(location(&resp), format!("/teachers/{}?notice=teacher_created", teacher.id));
  assert_eq!(teacher.age.as_deref(), Some("42"));

  let resp = json_req(
    &state,
    "PATCH",
    &format!("/teachers/{}", teacher.id),
    json!({ "teacher": { "visited": "1" } }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["visited"], true);
  assert_eq!(body["name"], "Ms. Frizzle");

  let resp = form(&state, "POST", "/teachers", "teacher[age]=30").await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

  let resp = oneshot_raw(
    state.clone(),
    "DELETE",
    &format!("/teachers/{}", teacher.id),
    vec![],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/teachers?notice=teacher_destroyed");
  assert!(state.store.list_teachers().await.unwrap().is_empty());
}

#[tokio::test]
async fn teacher_show_includes_students() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  seed_student(&state, teacher.id, "Ada").await;

  let resp = get(&state, &format!("/teachers/{}", teacher.id), JSON).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["name"], "Ms. Frizzle");
  assert_eq!(body["students"][0]["name"], "Ada");
}

#[tokio::test]
async fn teacher_with_students_cannot_be_destroyed() {
  let state = make_state().await;
  let teacher = seed_teacher(&state, "Ms. Frizzle").await;
  seed_student(&state, teacher.id, "Ada").await;

  let resp = oneshot_raw(
    state.clone(),
    "DELETE",
    &format!("/teachers/{}", teacher.id),
    vec![(header::ACCEPT, JSON)],
    "",
  )
  .await;

  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert!(state.store.get_teacher(teacher.id).await.unwrap().is_some());
  assert_eq!(state.store.count_students(teacher.id).await.unwrap(), 1);
}

// ── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn up_reports_ok() {
  let state = make_state().await;
  let resp = get(&state, "/up", JSON).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await, json!({ "status": "ok" }));
}
