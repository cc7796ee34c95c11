//! One respondent's submitted answers to a survey.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::answer::Answer;

/// Answers keyed by question id.
pub type Answers = BTreeMap<String, Answer>;

/// Created atomically on submit and never modified afterwards. Removed only
/// when its survey is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
  pub id:           String,
  pub survey_id:    String,
  #[serde(rename = "responses", deserialize_with = "answers_skipping_null")]
  pub answers:      Answers,
  pub submitted_at: DateTime<Utc>,
}

impl Response {
  pub fn answer(&self, question_id: &str) -> Option<&Answer> {
    self.answers.get(question_id)
  }
}

/// A stored `null` means the question was left unanswered.
fn answers_skipping_null<'de, D>(deserializer: D) -> Result<Answers, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = BTreeMap::<String, Option<Answer>>::deserialize(deserializer)?;
  Ok(
    raw
      .into_iter()
      .filter_map(|(id, answer)| answer.map(|a| (id, a)))
      .collect(),
  )
}
