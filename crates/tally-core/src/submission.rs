//! Respondent-side validation.

use thiserror::Error;

use crate::{
  answer::Answer,
  response::Answers,
  survey::{QuestionType, RATING_MAX, RATING_MIN, Survey},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
  /// Ids of required questions left unanswered, in survey order.
  #[error("please answer all required questions before submitting")]
  MissingRequired(Vec<String>),

  #[error("question {question_id} expects {expected}")]
  WrongShape {
    question_id: String,
    expected:    &'static str,
  },

  #[error("question {0} takes a whole-number rating from 1 to 5")]
  RatingOutOfRange(String),

  #[error("survey has no question {0}")]
  UnknownQuestion(String),
}

/// Check `answers` against `survey` and return the set to store.
///
/// Blank text answers are dropped first, so a required question answered
/// with whitespace counts as missing. Every remaining answer must have the
/// shape its question expects.
pub fn validate_submission(
  survey: &Survey,
  mut answers: Answers,
) -> Result<Answers, SubmissionError> {
  if let Some(stray) = answers.keys().find(|id| survey.question(id).is_none()) {
    return Err(SubmissionError::UnknownQuestion(stray.clone()));
  }

  answers.retain(|_, a| !a.is_blank());

  let missing: Vec<String> = survey
    .questions
    .iter()
    .filter(|q| q.required && !answers.contains_key(&q.id))
    .map(|q| q.id.clone())
    .collect();
  if !missing.is_empty() {
    return Err(SubmissionError::MissingRequired(missing));
  }

  for question in &survey.questions {
    let Some(answer) = answers.get(&question.id) else {
      continue;
    };
    match question.kind {
      QuestionType::MultipleChoice | QuestionType::YesNo | QuestionType::Text => {
        if !matches!(answer, Answer::Text(_)) {
          return Err(SubmissionError::WrongShape {
            question_id: question.id.clone(),
            expected:    "a text answer",
          });
        }
      }
      QuestionType::Rating => {
        if answer.as_rating(RATING_MIN, RATING_MAX).is_none() {
          return Err(SubmissionError::RatingOutOfRange(question.id.clone()));
        }
      }
      QuestionType::Unknown(_) => {}
    }
  }

  Ok(answers)
}
