//! Students: the child record, always owned by exactly one teacher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{cast, teacher::TeacherId, validation::ValidationErrors};

pub type StudentId = i64;

/// A persisted student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub id:         StudentId,
  pub name:       String,
  pub gender:     String,
  pub grade:      String,
  pub attended:   bool,
  pub teacher_id: TeacherId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Student {
  pub fn to_draft(&self) -> StudentDraft {
    StudentDraft {
      name:       self.name.clone(),
      gender:     self.gender.clone(),
      grade:      self.grade.clone(),
      attended:   self.attended,
      teacher_id: self.teacher_id,
    }
  }
}

/// The permitted student parameters: `name`, `gender`, `grade`, `attended`
/// and `teacher_id`. Nothing else can reach a student row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentParams {
  #[serde(default)]
  pub name:       Option<String>,
  #[serde(default)]
  pub gender:     Option<String>,
  #[serde(default)]
  pub grade:      Option<String>,
  #[serde(default, deserialize_with = "cast::flag")]
  pub attended:   Option<bool>,
  #[serde(default, deserialize_with = "cast::id")]
  pub teacher_id: Option<TeacherId>,
}

/// Unsaved student attributes: input to `create_student` / `update_student`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentDraft {
  pub name:       String,
  pub gender:     String,
  pub grade:      String,
  pub attended:   bool,
  pub teacher_id: TeacherId,
}

impl StudentDraft {
  /// A blank student already associated with `teacher_id`.
  pub fn for_teacher(teacher_id: TeacherId) -> Self {
    Self {
      name: String::new(),
      gender: String::new(),
      grade: String::new(),
      attended: false,
      teacher_id,
    }
  }

  /// Overwrite every attribute present in `params`, including the owning
  /// teacher when `teacher_id` was submitted.
  pub fn apply(&mut self, params: StudentParams) {
    if let Some(name) = params.name {
      self.name = name;
    }
    if let Some(gender) = params.gender {
      self.gender = gender;
    }
    if let Some(grade) = params.grade {
      self.grade = grade;
    }
    if let Some(attended) = params.attended {
      self.attended = attended;
    }
    if let Some(teacher_id) = params.teacher_id {
      self.teacher_id = teacher_id;
    }
  }

  /// Field-level rules. Whether `teacher_id` references an existing teacher
  /// needs the store and is checked by the caller.
  pub fn errors(&self) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.require_present("name", &self.name);
    errors.require_present("gender", &self.gender);
    errors.require_present("grade", &self.grade);
    errors
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> { self.errors().into_result() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ada(teacher_id: TeacherId) -> StudentDraft {
    let mut draft = StudentDraft::for_teacher(teacher_id);
    draft.apply(StudentParams {
      name:     Some("Ada".into()),
      gender:   Some("F".into()),
      grade:    Some("10".into()),
      attended: Some(true),
      ..Default::default()
    });
    draft
  }

  #[test]
  fn complete_draft_is_valid() {
    let draft = ada(1);
    assert_eq!(draft.validate(), Ok(()));
    assert_eq!(draft.teacher_id, 1);
    assert!(draft.attended);
  }

  #[test]
  fn blank_draft_reports_every_required_field() {
    let errors = StudentDraft::for_teacher(1).validate().unwrap_err();
    for field in ["name", "gender", "grade"] {
      assert!(errors.get(field).is_some(), "missing error for {field}");
    }
  }

  #[test]
  fn submitted_teacher_id_overrides_owner() {
    let mut draft = ada(1);
    draft.apply(StudentParams { teacher_id: Some(2), ..Default::default() });
    assert_eq!(draft.teacher_id, 2);
    assert_eq!(draft.name, "Ada");
  }

  #[test]
  fn disallowed_fields_never_deserialize() {
    let params: StudentParams = serde_json::from_value(serde_json::json!({
      "name": "Ada",
      "id": 99,
      "created_at": "2000-01-01T00:00:00Z",
      "admin": true,
    }))
    .unwrap();
    assert_eq!(params, StudentParams { name: Some("Ada".into()), ..Default::default() });
  }

  #[test]
  fn form_style_strings_cast() {
    let params: StudentParams = serde_json::from_value(serde_json::json!({
      "attended": "1",
      "teacher_id": "3",
    }))
    .unwrap();
    assert_eq!(params.attended, Some(true));
    assert_eq!(params.teacher_id, Some(3));
  }
}
