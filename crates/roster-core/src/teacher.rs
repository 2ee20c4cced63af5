//! Teachers: the parent record that owns students.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{cast, validation::ValidationErrors};

pub type TeacherId = i64;

/// A persisted teacher row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
  pub id:         TeacherId,
  pub name:       String,
  /// Free text; the schema stores age as `TEXT`.
  pub age:        Option<String>,
  pub visited:    bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Teacher {
  /// The editable attributes of this row, as a starting point for an update.
  pub fn to_draft(&self) -> TeacherDraft {
    TeacherDraft {
      name:    self.name.clone(),
      age:     self.age.clone(),
      visited: self.visited,
    }
  }
}

/// The permitted teacher parameters. Any other submitted field is dropped
/// during deserialisation; absent fields leave the draft unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TeacherParams {
  #[serde(default)]
  pub name:    Option<String>,
  #[serde(default)]
  pub age:     Option<String>,
  #[serde(default, deserialize_with = "cast::flag")]
  pub visited: Option<bool>,
}

/// Unsaved teacher attributes: input to `create_teacher` / `update_teacher`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeacherDraft {
  pub name:    String,
  pub age:     Option<String>,
  pub visited: bool,
}

impl TeacherDraft {
  /// Overwrite every attribute present in `params`.
  pub fn apply(&mut self, params: TeacherParams) {
    if let Some(name) = params.name {
      self.name = name;
    }
    if let Some(age) = params.age {
      self.age = Some(age).filter(|a| !a.trim().is_empty());
    }
    if let Some(visited) = params.visited {
      self.visited = visited;
    }
  }

  pub fn errors(&self) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.require_present("name", &self.name);
    errors
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> { self.errors().into_result() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_name_is_rejected() {
    let draft = TeacherDraft::default();
    let errors = draft.validate().unwrap_err();
    assert!(errors.get("name").is_some());
  }

  #[test]
  fn apply_only_touches_present_fields() {
    let mut draft = TeacherDraft {
      name:    "Ms. Frizzle".into(),
      age:     Some("40".into()),
      visited: true,
    };
    draft.apply(TeacherParams { age: Some("41".into()), ..Default::default() });
    assert_eq!(draft.name, "Ms. Frizzle");
    assert_eq!(draft.age.as_deref(), Some("41"));
    assert!(draft.visited);
  }

  #[test]
  fn blank_age_clears_it() {
    let mut draft = TeacherDraft { name: "Ms. Frizzle".into(), age: Some("40".into()), visited: false };
    draft.apply(TeacherParams { age: Some(" ".into()), ..Default::default() });
    assert_eq!(draft.age, None);
  }

  #[test]
  fn unknown_fields_are_dropped() {
    let params: TeacherParams = serde_json::from_value(serde_json::json!({
      "name": "Mr. Keating",
      "id": 42,
      "created_at": "1999-01-01T00:00:00Z",
    }))
    .unwrap();
    assert_eq!(params.name.as_deref(), Some("Mr. Keating"));
    assert_eq!(params.age, None);
  }
}
