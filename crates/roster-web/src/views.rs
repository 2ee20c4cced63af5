//! Minimal HTML pages.
//!
//! Every interpolated value goes through [`escape`]. Forms post with the
//! nested `teacher[...]` / `student[...]` field names that
//! [`crate::params`] expects.

use std::fmt::Write as _;

use axum::response::Html;
use roster_core::{
  ValidationErrors,
  student::{Student, StudentDraft},
  teacher::{Teacher, TeacherDraft},
};

use crate::{paths, respond::Notice};

// ─── Escaping ────────────────────────────────────────────────────────────────

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}

// ─── Building blocks ─────────────────────────────────────────────────────────

fn layout(title: &str, notice: Option<Notice>, body: &str) -> Html<String> {
  let notice = notice
    .map(|n| format!("<p id=\"notice\">{}</p>\n", escape(n.message())))
    .unwrap_or_default();
  Html(format!(
    "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
     <body>\n{notice}<h1>{title}</h1>\n{body}</body>\n</html>\n",
    title = escape(title),
  ))
}

fn link(href: &str, text: &str) -> String {
  format!("<a href=\"{}\">{}</a>", escape(href), escape(text))
}

/// A one-button form, for actions that must not be plain links.
fn button_to(action: &str, method: &str, label: &str) -> String {
  format!(
    "<form method=\"post\" action=\"{}\"><input type=\"hidden\" name=\"_method\" value=\"{}\">\
     <button type=\"submit\">{}</button></form>\n",
    escape(action),
    escape(method),
    escape(label),
  )
}

fn error_list(errors: &ValidationErrors) -> String {
  if errors.is_empty() {
    return String::new();
  }
  let mut out = format!(
    "<div id=\"error_explanation\">\n<h2>{} error(s) prohibited this record from being saved:</h2>\n<ul>\n",
    errors.len()
  );
  for message in errors.full_messages() {
    let _ = writeln!(out, "<li>{}</li>", escape(&message));
  }
  out.push_str("</ul>\n</div>\n");
  out
}

fn text_field(resource: &str, field: &str, label: &str, value: &str) -> String {
  format!(
    "<div><label for=\"{resource}_{field}\">{label}</label>\n\
     <input type=\"text\" id=\"{resource}_{field}\" name=\"{resource}[{field}]\" value=\"{}\"></div>\n",
    escape(value),
    label = escape(label),
  )
}

/// A checkbox preceded by a hidden `0`, so an unchecked box still submits.
fn check_box(resource: &str, field: &str, label: &str, checked: bool) -> String {
  format!(
    "<div><input type=\"hidden\" name=\"{resource}[{field}]\" value=\"0\">\
     <input type=\"checkbox\" id=\"{resource}_{field}\" name=\"{resource}[{field}]\" value=\"1\"{}>\
     <label for=\"{resource}_{field}\">{label}</label></div>\n",
    if checked { " checked" } else { "" },
    label = escape(label),
  )
}

fn form(action: &str, method: Option<&str>, fields: &str, submit: &str) -> String {
  let method = method
    .map(|m| format!("<input type=\"hidden\" name=\"_method\" value=\"{}\">\n", escape(m)))
    .unwrap_or_default();
  format!(
    "<form method=\"post\" action=\"{}\">\n{method}{fields}<button type=\"submit\">{}</button>\n</form>\n",
    escape(action),
    escape(submit),
  )
}

fn yes_no(flag: bool) -> &'static str { if flag { "Yes" } else { "No" } }

// ─── Teachers ────────────────────────────────────────────────────────────────

pub fn teachers_index(teachers: &[Teacher], notice: Option<Notice>) -> Html<String> {
  let mut body = String::from("<ul id=\"teachers\">\n");
  for teacher in teachers {
    let _ = writeln!(body, "<li>{}</li>", link(&paths::teacher(teacher.id), &teacher.name));
  }
  body.push_str("</ul>\n");
  body.push_str(&link(&paths::new_teacher(), "New teacher"));
  body.push('\n');
  layout("Teachers", notice, &body)
}

pub fn teacher_show(teacher: &Teacher, students: &[Student], notice: Option<Notice>) -> Html<String> {
  let mut body = format!(
    "<dl>\n<dt>Age</dt><dd>{}</dd>\n<dt>Visited</dt><dd>{}</dd>\n\
     <dt>Created</dt><dd>{}</dd>\n</dl>\n<h2>Students</h2>\n",
    escape(teacher.age.as_deref().unwrap_or("")),
    yes_no(teacher.visited),
    teacher.created_at.format("%Y-%m-%d %H:%M UTC"),
  );
  body.push_str(&student_list(teacher, students));
  body.push_str(&link(&paths::new_student(teacher.id), "New student"));
  body.push_str(" | ");
  body.push_str(&link(&paths::edit_teacher(teacher.id), "Edit this teacher"));
  body.push_str(" | ");
  body.push_str(&link(&paths::teachers(), "Back to teachers"));
  body.push('\n');
  body.push_str(&button_to(&paths::teacher(teacher.id), "delete", "Destroy this teacher"));
  layout(&teacher.name, notice, &body)
}

/// The new form when `existing` is `None`, otherwise the edit form.
pub fn teacher_form(
  existing: Option<&Teacher>,
  draft: &TeacherDraft,
  errors: &ValidationErrors,
) -> Html<String> {
  let fields = [
    text_field("teacher", "name", "Name", &draft.name),
    text_field("teacher", "age", "Age", draft.age.as_deref().unwrap_or("")),
    check_box("teacher", "visited", "Visited", draft.visited),
  ]
  .concat();

  let (title, action, method, back) = match existing {
    Some(t) => ("Editing teacher", paths::teacher(t.id), Some("patch"), paths::teacher(t.id)),
    None => ("New teacher", paths::teachers(), None, paths::teachers()),
  };
  let body = format!(
    "{}{}{}\n",
    error_list(errors),
    form(&action, method, &fields, "Save teacher"),
    link(&back, "Back"),
  );
  layout(title, None, &body)
}

// ─── Students ────────────────────────────────────────────────────────────────

fn student_list(teacher: &Teacher, students: &[Student]) -> String {
  let mut out = String::from("<table id=\"students\">\n<tr><th>Name</th><th>Gender</th><th>Grade</th><th>Attended</th></tr>\n");
  for s in students {
    let _ = writeln!(
      out,
      "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
      link(&paths::student(teacher.id, s.id), &s.name),
      escape(&s.gender),
      escape(&s.grade),
      yes_no(s.attended),
    );
  }
  out.push_str("</table>\n");
  out
}

pub fn students_index(teacher: &Teacher, students: &[Student], notice: Option<Notice>) -> Html<String> {
  let body = format!(
    "{}{} | {}\n",
    student_list(teacher, students),
    link(&paths::new_student(teacher.id), "New student"),
    link(&paths::teacher(teacher.id), &format!("Back to {}", teacher.name)),
  );
  layout(&format!("Students of {}", teacher.name), notice, &body)
}

pub fn student_show(teacher: &Teacher, student: &Student, notice: Option<Notice>) -> Html<String> {
  let body = format!(
    "<dl>\n<dt>Gender</dt><dd>{}</dd>\n<dt>Grade</dt><dd>{}</dd>\n\
     <dt>Attended</dt><dd>{}</dd>\n<dt>Teacher</dt><dd>{}</dd>\n</dl>\n{} | {}\n{}",
    escape(&student.gender),
    escape(&student.grade),
    yes_no(student.attended),
    link(&paths::teacher(teacher.id), &teacher.name),
    link(&paths::edit_student(teacher.id, student.id), "Edit this student"),
    link(&paths::students(teacher.id), "Back to students"),
    button_to(&paths::student(teacher.id, student.id), "delete", "Destroy this student"),
  );
  layout(&student.name, notice, &body)
}

/// The new form when `existing` is `None`, otherwise the edit form.
pub fn student_form(
  teacher: &Teacher,
  existing: Option<&Student>,
  draft: &StudentDraft,
  errors: &ValidationErrors,
) -> Html<String> {
  let fields = [
    text_field("student", "name", "Name", &draft.name),
    text_field("student", "gender", "Gender", &draft.gender),
    text_field("student", "grade", "Grade", &draft.grade),
    check_box("student", "attended", "Attended", draft.attended),
    text_field("student", "teacher_id", "Teacher", &draft.teacher_id.to_string()),
  ]
  .concat();

  let (title, action, method) = match existing {
    Some(s) => ("Editing student", paths::student(teacher.id, s.id), Some("patch")),
    None => ("New student", paths::students(teacher.id), None),
  };
  let body = format!(
    "{}{}{}\n",
    error_list(errors),
    form(&action, method, &fields, "Save student"),
    link(&paths::teacher(teacher.id), &format!("Back to {}", teacher.name)),
  );
  layout(title, None, &body)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escape_covers_markup() {
    assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
  }

  #[test]
  fn form_lists_errors_and_keeps_input() {
    let mut draft = StudentDraft::for_teacher(1);
    draft.name = "<Ada>".into();
    let errors = draft.errors();
    let teacher = Teacher {
      id:         1,
      name:       "Ms. Frizzle".into(),
      age:        None,
      visited:    false,
      created_at: chrono::Utc::now(),
      updated_at: chrono::Utc::now(),
    };
    let Html(page) = student_form(&teacher, None, &draft, &errors);
    assert!(page.contains("Gender can&#39;t be blank"), "{page}");
    assert!(page.contains("value=\"&lt;Ada&gt;\""), "{page}");
    assert!(page.contains("action=\"/teachers/1/students\""), "{page}");
  }
}
