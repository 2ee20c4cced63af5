//! Lenient attribute casting for submitted parameters.
//!
//! HTML forms submit every value as a string, while JSON clients send native
//! booleans and numbers. These `deserialize_with` helpers accept both, so the
//! same parameter types work for either body format.

use std::fmt;

use serde::{Deserializer, de};

/// Strings that cast to `false`. Anything else non-blank casts to `true`.
const FALSE_VALUES: &[&str] = &["0", "f", "false", "off", "n", "no"];

/// Cast a boolean flag: `true`/`false`, `1`/`0`, `on`/`off` and friends.
/// A blank string or `null` is treated as absent.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
  D: Deserializer<'de>,
{
  deserializer.deserialize_any(FlagVisitor)
}

/// Cast a record identifier from a number or a numeric string.
/// A blank string or `null` is treated as absent.
pub fn id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  deserializer.deserialize_any(IdVisitor)
}

struct FlagVisitor;

impl<'de> de::Visitor<'de> for FlagVisitor {
  type Value = Option<bool>;

  fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("a boolean or a boolean-like string")
  }

  fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> { Ok(Some(v)) }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> { Ok(Some(v != 0)) }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> { Ok(Some(v != 0)) }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
    let v = v.trim();
    if v.is_empty() {
      return Ok(None);
    }
    Ok(Some(!FALSE_VALUES.iter().any(|f| f.eq_ignore_ascii_case(v))))
  }

  fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }

  fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }
}

struct IdVisitor;

impl<'de> de::Visitor<'de> for IdVisitor {
  type Value = Option<i64>;

  fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("an integer id or a numeric string")
  }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> { Ok(Some(v)) }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
    i64::try_from(v)
      .map(Some)
      .map_err(|_| E::custom(format!("id out of range: {v}")))
  }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
    let v = v.trim();
    if v.is_empty() {
      return Ok(None);
    }
    v.parse()
      .map(Some)
      .map_err(|_| E::custom(format!("invalid id: {v:?}")))
  }

  fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }

  fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  #[derive(Debug, Deserialize)]
  struct Probe {
    #[serde(default, deserialize_with = "super::flag")]
    flag: Option<bool>,
    #[serde(default, deserialize_with = "super::id")]
    id:   Option<i64>,
  }

  fn probe(json: serde_json::Value) -> Probe { serde_json::from_value(json).unwrap() }

  #[test]
  fn flag_accepts_form_strings() {
    assert_eq!(probe(serde_json::json!({ "flag": "1" })).flag, Some(true));
    assert_eq!(probe(serde_json::json!({ "flag": "on" })).flag, Some(true));
    assert_eq!(probe(serde_json::json!({ "flag": "0" })).flag, Some(false));
    assert_eq!(probe(serde_json::json!({ "flag": "FALSE" })).flag, Some(false));
    assert_eq!(probe(serde_json::json!({ "flag": "" })).flag, None);
  }

  #[test]
  fn flag_accepts_json_booleans_and_null() {
    assert_eq!(probe(serde_json::json!({ "flag": true })).flag, Some(true));
    assert_eq!(probe(serde_json::json!({ "flag": null })).flag, None);
    assert_eq!(probe(serde_json::json!({})).flag, None);
  }

  #[test]
  fn id_accepts_numbers_and_numeric_strings() {
    assert_eq!(probe(serde_json::json!({ "id": 7 })).id, Some(7));
    assert_eq!(probe(serde_json::json!({ "id": " 12 " })).id, Some(12));
    assert_eq!(probe(serde_json::json!({ "id": "" })).id, None);
  }

  #[test]
  fn id_rejects_garbage() {
    let result = serde_json::from_value::<Probe>(serde_json::json!({ "id": "abc" }));
    assert!(result.is_err());
  }
}
