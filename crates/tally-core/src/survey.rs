//! Survey and question records.
//!
//! Field names serialise in camelCase so the persisted blob keeps the same
//! layout as the collections it was first written with (`isPublished`,
//! `createdAt`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumString;

/// The fixed option set of a yes/no question.
pub const YES_NO_OPTIONS: [&str; 2] = ["Yes", "No"];

/// Smallest and largest value a rating answer may take.
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

// ─── QuestionType ────────────────────────────────────────────────────────────

/// The kind of answer a question collects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "kebab-case")]
pub enum QuestionType {
  MultipleChoice,
  Text,
  Rating,
  YesNo,
  /// A type string this build does not recognise. Kept so the blob
  /// round-trips; such questions get no summary in results.
  #[strum(default)]
  Unknown(String),
}

impl QuestionType {
  /// Every type an author can pick in the editor, in menu order.
  pub const AUTHORABLE: [QuestionType; 4] = [
    QuestionType::MultipleChoice,
    QuestionType::Text,
    QuestionType::Rating,
    QuestionType::YesNo,
  ];

  /// The discriminant written to the blob.
  pub fn as_str(&self) -> &str {
    match self {
      Self::MultipleChoice => "multiple-choice",
      Self::Text => "text",
      Self::Rating => "rating",
      Self::YesNo => "yes-no",
      Self::Unknown(other) => other,
    }
  }

  /// Human-readable name shown in the editor.
  pub fn label(&self) -> &str {
    match self {
      Self::MultipleChoice => "Multiple Choice",
      Self::Text => "Text Answer",
      Self::Rating => "Rating (1-5)",
      Self::YesNo => "Yes/No",
      Self::Unknown(other) => other,
    }
  }

  /// Whether answers are picked from a fixed option list.
  pub fn is_choice(&self) -> bool {
    matches!(self, Self::MultipleChoice | Self::YesNo)
  }

  /// The next authorable type, wrapping around. Unknown types cycle back to
  /// the first entry.
  pub fn next(&self) -> Self {
    let idx = Self::AUTHORABLE.iter().position(|t| t == self);
    match idx {
      Some(i) => Self::AUTHORABLE[(i + 1) % Self::AUTHORABLE.len()].clone(),
      None => Self::AUTHORABLE[0].clone(),
    }
  }
}

impl From<String> for QuestionType {
  fn from(s: String) -> Self {
    s.parse().unwrap_or_else(|_| Self::Unknown(s))
  }
}

impl From<QuestionType> for String {
  fn from(t: QuestionType) -> Self {
    match t {
      QuestionType::Unknown(other) => other,
      known => known.as_str().to_owned(),
    }
  }
}

// ─── Question ────────────────────────────────────────────────────────────────

/// One prompt within a survey. Owned by its survey; the id only needs to be
/// unique within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id:       String,
  #[serde(rename = "type")]
  pub kind:     QuestionType,
  pub title:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options:  Option<Vec<String>>,
  #[serde(default)]
  pub required: bool,
}

impl Question {
  /// The options a respondent chooses between. Yes/no questions always offer
  /// [`YES_NO_OPTIONS`], whatever is stored.
  pub fn choices(&self) -> Vec<&str> {
    match self.kind {
      QuestionType::YesNo => YES_NO_OPTIONS.to_vec(),
      _ => self.options.iter().flatten().map(String::as_str).collect(),
    }
  }
}

// ─── Survey ──────────────────────────────────────────────────────────────────

/// An authored questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
  pub id:           String,
  pub title:        String,
  #[serde(default)]
  pub description:  String,
  pub questions:    Vec<Question>,
  pub created_at:   DateTime<Utc>,
  #[serde(default)]
  pub is_published: bool,
}

impl Survey {
  /// Look up a question by id.
  pub fn question(&self, id: &str) -> Option<&Question> {
    self.questions.iter().find(|q| q.id == id)
  }

  pub fn required_count(&self) -> usize {
    self.questions.iter().filter(|q| q.required).count()
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`Repository::create_survey`](crate::repository::Repository::create_survey).
/// The id and `created_at` are assigned by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSurvey {
  pub title:        String,
  pub description:  String,
  pub questions:    Vec<Question>,
  pub is_published: bool,
}

/// A partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyPatch {
  pub title:        Option<String>,
  pub description:  Option<String>,
  pub questions:    Option<Vec<Question>>,
  pub is_published: Option<bool>,
}

impl SurveyPatch {
  /// A patch that only flips the publish flag.
  pub fn published(is_published: bool) -> Self {
    Self { is_published: Some(is_published), ..Self::default() }
  }

  /// Whether applying this patch can change the question set.
  pub fn touches_questions(&self) -> bool { self.questions.is_some() }

  pub fn apply(self, survey: &mut Survey) {
    if let Some(title) = self.title {
      survey.title = title;
    }
    if let Some(description) = self.description {
      survey.description = description;
    }
    if let Some(questions) = self.questions {
      survey.questions = questions;
    }
    if let Some(is_published) = self.is_published {
      survey.is_published = is_published;
    }
  }
}

impl From<NewSurvey> for SurveyPatch {
  fn from(new: NewSurvey) -> Self {
    Self {
      title:        Some(new.title),
      description:  Some(new.description),
      questions:    Some(new.questions),
      is_published: Some(new.is_published),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn question_type_round_trips_through_json() {
    let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
    assert_eq!(json, "\"multiple-choice\"");

    let parsed: QuestionType = serde_json::from_str("\"yes-no\"").unwrap();
    assert_eq!(parsed, QuestionType::YesNo);
  }

  #[test]
  fn unrecognised_question_type_is_preserved() {
    let parsed: QuestionType = serde_json::from_str("\"ranking\"").unwrap();
    assert_eq!(parsed, QuestionType::Unknown("ranking".into()));
    assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"ranking\"");
  }

  #[test]
  fn next_cycles_through_authorable_types() {
    assert_eq!(QuestionType::MultipleChoice.next(), QuestionType::Text);
    assert_eq!(QuestionType::YesNo.next(), QuestionType::MultipleChoice);
    assert_eq!(
      QuestionType::Unknown("x".into()).next(),
      QuestionType::MultipleChoice
    );
  }

  #[test]
  fn yes_no_choices_ignore_stored_options() {
    let q = Question {
      id:       "q".into(),
      kind:     QuestionType::YesNo,
      title:    "Recommend us?".into(),
      options:  None,
      required: true,
    };
    assert_eq!(q.choices(), vec!["Yes", "No"]);
  }

  #[test]
  fn survey_deserialises_camel_case_blob() {
    let json = r#"{
      "id": "s1",
      "title": "Feedback",
      "description": "",
      "createdAt": "2024-01-15T00:00:00.000Z",
      "isPublished": true,
      "questions": [
        { "id": "q1", "type": "rating", "title": "Overall?", "required": true }
      ]
    }"#;
    let survey: Survey = serde_json::from_str(json).unwrap();
    assert!(survey.is_published);
    assert_eq!(survey.questions[0].kind, QuestionType::Rating);
    assert_eq!(survey.required_count(), 1);
  }
}
