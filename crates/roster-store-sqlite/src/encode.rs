//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; booleans as 0/1 integers.

use chrono::{DateTime, Utc};
use roster_core::{student::Student, teacher::Teacher};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const TEACHER_COLUMNS: &str = "id, name, age, visited, created_at, updated_at";

pub const STUDENT_COLUMNS: &str =
  "id, name, gender, grade, attended, teacher_id, created_at, updated_at";

/// Raw values read directly from a `teachers` row.
pub struct RawTeacher {
  pub id:         i64,
  pub name:       String,
  pub age:        Option<String>,
  pub visited:    bool,
  pub created_at: String,
  pub updated_at: String,
}

impl RawTeacher {
  /// Map a row selected with [`TEACHER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      age:        row.get(2)?,
      visited:    row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_teacher(self) -> Result<Teacher> {
    Ok(Teacher {
      id:         self.id,
      name:       self.name,
      age:        self.age,
      visited:    self.visited,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `students` row.
pub struct RawStudent {
  pub id:         i64,
  pub name:       String,
  pub gender:     String,
  pub grade:      String,
  pub attended:   bool,
  pub teacher_id: i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawStudent {
  /// Map a row selected with [`STUDENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      gender:     row.get(2)?,
      grade:      row.get(3)?,
      attended:   row.get(4)?,
      teacher_id: row.get(5)?,
      created_at: row.get(6)?,
      updated_at: row.get(7)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      id:         self.id,
      name:       self.name,
      gender:     self.gender,
      grade:      self.grade,
      attended:   self.attended,
      teacher_id: self.teacher_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
