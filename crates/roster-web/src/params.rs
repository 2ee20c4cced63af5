//! Extraction of the permitted parameters from a request body.
//!
//! Parameters live under a resource key: `{"student": {...}}` for JSON, and
//! `student[name]=...` pairs for an urlencoded form. The fields under that key
//! are then deserialised into the resource's params type, which silently
//! drops anything not on its whitelist.

use axum::{
  Form, Json,
  extract::{FromRequest, Request},
  http::{HeaderMap, header},
};
use roster_core::{student::StudentParams, teacher::TeacherParams};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Error;

/// The key a resource's parameters are nested under.
pub trait ParamKey {
  const KEY: &'static str;
}

impl ParamKey for StudentParams {
  const KEY: &'static str = "student";
}

impl ParamKey for TeacherParams {
  const KEY: &'static str = "teacher";
}

/// Extractor for the permitted parameters of resource `T`.
///
/// Rejects with 400 when the body cannot be parsed or carries nothing under
/// `T::KEY`.
#[derive(Debug)]
pub struct Permitted<T>(pub T);

impl<S, T> FromRequest<S> for Permitted<T>
where
  S: Send + Sync,
  T: DeserializeOwned + ParamKey,
{
  type Rejection = Error;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    if is_json(req.headers()) {
      let Json(body) = Json::<Value>::from_request(req, state)
        .await
        .map_err(|e| Error::BadRequest(e.body_text()))?;
      from_json(body).map(Permitted)
    } else {
      let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
        .await
        .map_err(|e| Error::BadRequest(e.body_text()))?;
      from_form(pairs).map(Permitted)
    }
  }
}

fn is_json(headers: &HeaderMap) -> bool {
  headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v.starts_with("application/json"))
}

/// Pull `T`'s fields out of a JSON body.
pub fn from_json<T>(mut body: Value) -> Result<T, Error>
where
  T: DeserializeOwned + ParamKey,
{
  let fields = body.get_mut(T::KEY).map(Value::take);
  permit(fields)
}

/// Pull `T`'s fields out of decoded form pairs. When a key repeats (the
/// hidden `0` a checkbox sends ahead of its checked `1`) the last one wins.
pub fn from_form<T>(pairs: Vec<(String, String)>) -> Result<T, Error>
where
  T: DeserializeOwned + ParamKey,
{
  let prefix = format!("{}[", T::KEY);
  let mut fields = Map::new();
  for (key, value) in pairs {
    if let Some(name) = key.strip_prefix(&prefix).and_then(|rest| rest.strip_suffix(']')) {
      fields.insert(name.to_owned(), Value::String(value));
    }
  }
  permit(Some(Value::Object(fields)))
}

fn permit<T>(fields: Option<Value>) -> Result<T, Error>
where
  T: DeserializeOwned + ParamKey,
{
  match fields {
    Some(Value::Object(map)) if !map.is_empty() => serde_json::from_value(Value::Object(map))
      .map_err(|e| Error::BadRequest(format!("invalid {} parameters: {e}", T::KEY))),
    _ => Err(Error::BadRequest(format!(
      "param is missing or the value is empty: {}",
      T::KEY
    ))),
  }
}

// ─── Method override ─────────────────────────────────────────────────────────

/// What a `POST` to a member path really means. HTML forms can only send GET
/// and POST, so they name the intended verb in a `_method` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
  Update,
  Destroy,
}

pub fn method_override(pairs: &[(String, String)]) -> Option<Override> {
  let (_, method) = pairs.iter().find(|(k, _)| k == "_method")?;
  match method.to_ascii_lowercase().as_str() {
    "patch" | "put" => Some(Override::Update),
    "delete" => Some(Override::Destroy),
    _ => None,
  }
}
