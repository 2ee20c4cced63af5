//! The `RosterStore` trait: one repository surface for teachers and students.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! The web layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Error,
  student::{Student, StudentDraft, StudentId},
  teacher::{Teacher, TeacherDraft, TeacherId},
};

/// Error type of a [`RosterStore`] backend.
///
/// Backends wrap the domain [`Error`]s they raise themselves (a missing row,
/// a teacher that still owns students) next to their own I/O failures.
/// Callers use [`StoreError::as_core`] to tell the two apart.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The domain error behind this failure, if any.
  fn as_core(&self) -> Option<&Error>;

  /// `true` when the store refused the call because a row was missing.
  fn is_not_found(&self) -> bool {
    matches!(
      self.as_core(),
      Some(Error::TeacherNotFound(_) | Error::StudentNotFound(_))
    )
  }
}

/// Abstraction over a Roster store backend.
///
/// Lookups return `Ok(None)` for a missing row. Writes against a missing
/// row are errors. Backends assign ids and both timestamps.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: StoreError;

  /// Cheap round-trip used by the health check.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Teachers ──────────────────────────────────────────────────────────

  fn create_teacher(
    &self,
    draft: TeacherDraft,
  ) -> impl Future<Output = Result<Teacher, Self::Error>> + Send + '_;

  fn get_teacher(
    &self,
    id: TeacherId,
  ) -> impl Future<Output = Result<Option<Teacher>, Self::Error>> + Send + '_;

  /// All teachers, oldest first.
  fn list_teachers(
    &self,
  ) -> impl Future<Output = Result<Vec<Teacher>, Self::Error>> + Send + '_;

  /// Replace the editable attributes of an existing teacher.
  fn update_teacher(
    &self,
    id: TeacherId,
    draft: TeacherDraft,
  ) -> impl Future<Output = Result<Teacher, Self::Error>> + Send + '_;

  /// Delete a teacher. Fails if the teacher is missing or still owns
  /// students.
  fn delete_teacher(
    &self,
    id: TeacherId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  /// Persist a new student. Fails if `draft.teacher_id` does not reference
  /// an existing teacher.
  fn create_student(
    &self,
    draft: StudentDraft,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// Students owned by `teacher_id`, oldest first.
  fn list_students(
    &self,
    teacher_id: TeacherId,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  fn count_students(
    &self,
    teacher_id: TeacherId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn update_student(
    &self,
    id: StudentId,
    draft: StudentDraft,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Delete a student. Deleting a missing row is an error, never a no-op.
  fn delete_student(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
