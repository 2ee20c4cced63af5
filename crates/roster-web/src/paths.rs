//! URL builders for the resource routes.

use roster_core::{student::StudentId, teacher::TeacherId};

pub fn teachers() -> String { "/teachers".to_owned() }

pub fn new_teacher() -> String { "/teachers/new".to_owned() }

pub fn teacher(id: TeacherId) -> String { format!("/teachers/{id}") }

pub fn edit_teacher(id: TeacherId) -> String { format!("/teachers/{id}/edit") }

pub fn students(teacher_id: TeacherId) -> String { format!("/teachers/{teacher_id}/students") }

pub fn new_student(teacher_id: TeacherId) -> String {
  format!("/teachers/{teacher_id}/students/new")
}

pub fn student(teacher_id: TeacherId, id: StudentId) -> String {
  format!("/teachers/{teacher_id}/students/{id}")
}

pub fn edit_student(teacher_id: TeacherId, id: StudentId) -> String {
  format!("/teachers/{teacher_id}/students/{id}/edit")
}
