//! [`SqliteStore`], the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use roster_core::{
  store::RosterStore,
  student::{Student, StudentDraft, StudentId},
  teacher::{Teacher, TeacherDraft, TeacherId},
};

use crate::{
  encode::{RawStudent, RawTeacher, STUDENT_COLUMNS, TEACHER_COLUMNS, encode_dt},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    tracing::debug!(path = %path.as_ref().display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_teacher(&self, id: TeacherId) -> Result<Option<RawTeacher>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = ?1"),
            rusqlite::params![id],
            RawTeacher::from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(raw)
  }

  async fn fetch_student(&self, id: StudentId) -> Result<Option<RawStudent>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
            rusqlite::params![id],
            RawStudent::from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(raw)
  }

  /// The store never writes a student whose owner is missing; the foreign
  /// key is only the last line.
  async fn ensure_teacher(&self, id: TeacherId) -> Result<()> {
    match self.fetch_teacher(id).await? {
      Some(_) => Ok(()),
      None => Err(roster_core::Error::TeacherNotFound(id).into()),
    }
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = crate::Error;

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Teachers ──────────────────────────────────────────────────────────────

  async fn create_teacher(&self, draft: TeacherDraft) -> Result<Teacher> {
    draft.validate().map_err(roster_core::Error::Invalid)?;

    let now    = Utc::now();
    let at_str = encode_dt(now);
    let TeacherDraft { name, age, visited } = draft.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO teachers (name, age, visited, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![name, age, visited, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::info!(teacher_id = id, "teacher created");
    Ok(Teacher {
      id,
      name:       draft.name,
      age:        draft.age,
      visited:    draft.visited,
      created_at: now,
      updated_at: now,
    })
  }

  async fn get_teacher(&self, id: TeacherId) -> Result<Option<Teacher>> {
    self.fetch_teacher(id).await?.map(RawTeacher::into_teacher).transpose()
  }

  async fn list_teachers(&self) -> Result<Vec<Teacher>> {
    let raws: Vec<RawTeacher> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawTeacher::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTeacher::into_teacher).collect()
  }

  async fn update_teacher(&self, id: TeacherId, draft: TeacherDraft) -> Result<Teacher> {
    draft.validate().map_err(roster_core::Error::Invalid)?;

    let at_str = encode_dt(Utc::now());
    let TeacherDraft { name, age, visited } = draft;

    let raw: Option<RawTeacher> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE teachers SET name = ?1, age = ?2, visited = ?3, updated_at = ?4
           WHERE id = ?5",
          rusqlite::params![name, age, visited, at_str, id],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = ?1"),
          rusqlite::params![id],
          RawTeacher::from_row,
        )?))
      })
      .await?;

    let teacher = raw
      .ok_or(roster_core::Error::TeacherNotFound(id))?
      .into_teacher()?;
    tracing::info!(teacher_id = id, "teacher updated");
    Ok(teacher)
  }

  async fn delete_teacher(&self, id: TeacherId) -> Result<()> {
    let count = self.count_students(id).await?;
    if count > 0 {
      return Err(roster_core::Error::TeacherHasStudents { teacher_id: id, count }.into());
    }

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM teachers WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if deleted == 0 {
      return Err(roster_core::Error::TeacherNotFound(id).into());
    }
    tracing::info!(teacher_id = id, "teacher deleted");
    Ok(())
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn create_student(&self, draft: StudentDraft) -> Result<Student> {
    draft.validate().map_err(roster_core::Error::Invalid)?;
    self.ensure_teacher(draft.teacher_id).await?;

    let now    = Utc::now();
    let at_str = encode_dt(now);
    let StudentDraft { name, gender, grade, attended, teacher_id } = draft.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (
             name, gender, grade, attended, teacher_id, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![name, gender, grade, attended, teacher_id, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::info!(student_id = id, teacher_id = draft.teacher_id, "student created");
    Ok(Student {
      id,
      name:       draft.name,
      gender:     draft.gender,
      grade:      draft.grade,
      attended:   draft.attended,
      teacher_id: draft.teacher_id,
      created_at: now,
      updated_at: now,
    })
  }

  async fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
    self.fetch_student(id).await?.map(RawStudent::into_student).transpose()
  }

  async fn list_students(&self, teacher_id: TeacherId) -> Result<Vec<Student>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS} FROM students WHERE teacher_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![teacher_id], RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn count_students(&self, teacher_id: TeacherId) -> Result<usize> {
    let count = self
      .conn
      .call(move |conn| {
        let count: i64 = conn.query_row(
          "SELECT COUNT(*) FROM students WHERE teacher_id = ?1",
          rusqlite::params![teacher_id],
          |row| row.get(0),
        )?;
        let count = usize::try_from(count).map_err(|e| {
          rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Integer, Box::new(e))
        })?;
        Ok(count)
      })
      .await?;
    Ok(count)
  }

  async fn update_student(&self, id: StudentId, draft: StudentDraft) -> Result<Student> {
    draft.validate().map_err(roster_core::Error::Invalid)?;
    self.ensure_teacher(draft.teacher_id).await?;

    let at_str = encode_dt(Utc::now());
    let StudentDraft { name, gender, grade, attended, teacher_id } = draft;

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE students
           SET name = ?1, gender = ?2, grade = ?3, attended = ?4, teacher_id = ?5,
               updated_at = ?6
           WHERE id = ?7",
          rusqlite::params![name, gender, grade, attended, teacher_id, at_str, id],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
          rusqlite::params![id],
          RawStudent::from_row,
        )?))
      })
      .await?;

    let student = raw
      .ok_or(roster_core::Error::StudentNotFound(id))?
      .into_student()?;
    tracing::info!(student_id = id, teacher_id = student.teacher_id, "student updated");
    Ok(student)
  }

  async fn delete_student(&self, id: StudentId) -> Result<()> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM students WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if deleted == 0 {
      return Err(roster_core::Error::StudentNotFound(id).into());
    }
    tracing::info!(student_id = id, "student deleted");
    Ok(())
  }
}
