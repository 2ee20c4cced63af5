//! Field-level validation results.
//!
//! Errors are keyed by attribute name and serialise as a plain JSON object,
//! e.g. `{"name": ["can't be blank"]}`.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

pub const BLANK: &str = "can't be blank";
pub const MUST_EXIST: &str = "must exist";

/// Messages collected while validating a draft, grouped by attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_owned()).or_default().push(message.into());
  }

  /// Record [`BLANK`] against `field` if `value` is empty or whitespace.
  pub fn require_present(&mut self, field: &str, value: &str) {
    if value.trim().is_empty() {
      self.add(field, BLANK);
    }
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.values().map(Vec::len).sum() }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
  }

  /// Human-readable sentences such as `"Name can't be blank"`.
  pub fn full_messages(&self) -> Vec<String> {
    self
      .iter()
      .flat_map(|(field, messages)| {
        let label = humanize(field);
        messages.iter().map(move |m| format!("{label} {m}"))
      })
      .collect()
  }

  /// `Ok(())` when nothing was recorded.
  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.full_messages().join(", "))
  }
}

impl std::error::Error for ValidationErrors {}

fn humanize(field: &str) -> String {
  let spaced = field.strip_suffix("_id").unwrap_or(field).replace('_', " ");
  let mut chars = spaced.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
