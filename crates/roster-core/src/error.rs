//! Error types for `roster-core`.

use thiserror::Error;

use crate::{student::StudentId, teacher::TeacherId, validation::ValidationErrors};

#[derive(Debug, Error)]
pub enum Error {
  #[error("teacher not found: {0}")]
  TeacherNotFound(TeacherId),

  #[error("student not found: {0}")]
  StudentNotFound(StudentId),

  #[error("teacher {teacher_id} still has {count} student(s)")]
  TeacherHasStudents { teacher_id: TeacherId, count: usize },

  #[error("validation failed: {0}")]
  Invalid(ValidationErrors),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
