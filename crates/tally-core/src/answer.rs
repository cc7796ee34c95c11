//! Answer values.
//!
//! An answer is stored as a bare JSON scalar. Which variant is expected
//! depends on the question type: text for choice and free-text questions, a
//! number for ratings. Booleans are accepted when reading older blobs.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
  Flag(bool),
  Number(f64),
  Text(String),
}

impl Answer {
  /// True for the empty string, which counts as "no answer" everywhere.
  pub fn is_empty(&self) -> bool {
    matches!(self, Self::Text(s) if s.is_empty())
  }

  /// True when the answer is empty after trimming whitespace.
  pub fn is_blank(&self) -> bool {
    matches!(self, Self::Text(s) if s.trim().is_empty())
  }

  /// Numeric coercion used for rating summaries. Strings are parsed after
  /// trimming; booleans count as 1 and 0. Non-finite results are rejected.
  pub fn as_number(&self) -> Option<f64> {
    let n = match self {
      Self::Number(n) => *n,
      Self::Flag(b) => f64::from(u8::from(*b)),
      Self::Text(s) => {
        let trimmed = s.trim();
        if trimmed.is_empty() {
          return None;
        }
        trimmed.parse::<f64>().ok()?
      }
    };
    n.is_finite().then_some(n)
  }

  /// A whole-number rating within `min..=max`, if this answer is one.
  pub fn as_rating(&self, min: u8, max: u8) -> Option<u8> {
    match self {
      Self::Number(n)
        if n.fract() == 0.0 && *n >= f64::from(min) && *n <= f64::from(max) =>
      {
        Some(*n as u8)
      }
      _ => None,
    }
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }
}

/// Render a number the way it is keyed in tallies: integral values without a
/// fractional part (`5`, not `5.0`).
pub fn format_number(n: f64) -> String {
  if n.fract() == 0.0 && n.abs() < 1e15 {
    format!("{}", n as i64)
  } else {
    format!("{n}")
  }
}

impl fmt::Display for Answer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Flag(b) => write!(f, "{b}"),
      Self::Number(n) => f.write_str(&format_number(*n)),
      Self::Text(s) => f.write_str(s),
    }
  }
}

impl From<&str> for Answer {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for Answer {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<f64> for Answer {
  fn from(n: f64) -> Self { Self::Number(n) }
}

impl From<u8> for Answer {
  fn from(n: u8) -> Self { Self::Number(f64::from(n)) }
}

impl From<bool> for Answer {
  fn from(b: bool) -> Self { Self::Flag(b) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserialises_plain_scalars() {
    let answers: Vec<Answer> =
      serde_json::from_str(r#"[5, "Quality", true, 4.5]"#).unwrap();
    assert_eq!(answers, vec![
      Answer::Number(5.0),
      Answer::Text("Quality".into()),
      Answer::Flag(true),
      Answer::Number(4.5),
    ]);
  }

  #[test]
  fn numeric_coercion() {
    assert_eq!(Answer::from(" 4 ").as_number(), Some(4.0));
    assert_eq!(Answer::from("great").as_number(), None);
    assert_eq!(Answer::from("   ").as_number(), None);
    assert_eq!(Answer::from("NaN").as_number(), None);
    assert_eq!(Answer::Flag(true).as_number(), Some(1.0));
    assert_eq!(Answer::Number(3.0).as_number(), Some(3.0));
  }

  #[test]
  fn rating_must_be_whole_and_in_range() {
    assert_eq!(Answer::from(5u8).as_rating(1, 5), Some(5));
    assert_eq!(Answer::Number(4.5).as_rating(1, 5), None);
    assert_eq!(Answer::Number(0.0).as_rating(1, 5), None);
    assert_eq!(Answer::from("5").as_rating(1, 5), None);
  }

  #[test]
  fn display_drops_trailing_zero() {
    assert_eq!(Answer::Number(5.0).to_string(), "5");
    assert_eq!(Answer::Number(2.5).to_string(), "2.5");
    assert_eq!(Answer::Flag(false).to_string(), "false");
  }

  #[test]
  fn empty_versus_blank() {
    assert!(Answer::from("").is_empty());
    assert!(!Answer::from(" ").is_empty());
    assert!(Answer::from(" ").is_blank());
    assert!(!Answer::Number(0.0).is_blank());
  }
}
