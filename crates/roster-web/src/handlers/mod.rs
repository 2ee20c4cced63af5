//! Request handlers and the lookup steps they share.
//!
//! Each nested student action starts with [`load_teacher`]; member actions
//! follow with [`load_student`]. Both fail with 404 before anything is
//! written.

pub mod health;
pub mod students;
pub mod teachers;

use roster_core::{
  store::RosterStore,
  student::{Student, StudentId},
  teacher::{Teacher, TeacherId},
};

use crate::error::Error;

/// Resolve the teacher named in the path.
pub(crate) async fn load_teacher<S>(store: &S, id: TeacherId) -> Result<Teacher, Error>
where
  S: RosterStore,
{
  store
    .get_teacher(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| {
      tracing::debug!(teacher_id = id, "teacher lookup missed");
      Error::NotFound(format!("teacher {id} not found"))
    })
}

/// Resolve a student, scoped to the already-resolved `teacher`. A student
/// that belongs to someone else is reported exactly like a missing one.
pub(crate) async fn load_student<S>(
  store: &S,
  teacher: &Teacher,
  id: StudentId,
) -> Result<Student, Error>
where
  S: RosterStore,
{
  store
    .get_student(id)
    .await
    .map_err(Error::store)?
    .filter(|s| s.teacher_id == teacher.id)
    .ok_or_else(|| {
      tracing::debug!(teacher_id = teacher.id, student_id = id, "student lookup missed");
      Error::NotFound(format!("student {id} not found"))
    })
}
