//! Survey authoring.
//!
//! A [`SurveyDraft`] is the in-memory editing state for a new or existing
//! survey. Nothing is persisted until [`SurveyDraft::validate`] succeeds and
//! the caller hands the result to the repository; an abandoned draft is lost.

use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

use crate::survey::{
  NewSurvey, Question, QuestionType, Survey, SurveyPatch, YES_NO_OPTIONS,
};

/// Minimum number of options on a multiple-choice question.
pub const MIN_OPTIONS: usize = 2;

/// Why a draft (or a patched survey) was refused. Indices are zero-based and
/// displayed one-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
  #[error("please provide a title and at least one question")]
  MissingTitle,

  #[error("please provide a title and at least one question")]
  NoQuestions,

  #[error("please provide a title for all questions (question {} is blank)", .0 + 1)]
  UntitledQuestion(usize),

  #[error("question {} needs at least two options", .0 + 1)]
  TooFewOptions(usize),

  #[error("question {} has a blank option", .0 + 1)]
  BlankOption(usize),

  #[error("question id {0:?} is used more than once")]
  DuplicateQuestionId(String),
}

/// Direction for [`SurveyDraft::move_question`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Up,
  Down,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyDraft {
  pub title:        String,
  pub description:  String,
  pub questions:    Vec<Question>,
  pub is_published: bool,
}

impl SurveyDraft {
  pub fn new() -> Self { Self::default() }

  /// Start editing an existing survey.
  pub fn from_survey(survey: &Survey) -> Self {
    Self {
      title:        survey.title.clone(),
      description:  survey.description.clone(),
      questions:    survey.questions.clone(),
      is_published: survey.is_published,
    }
  }

  pub fn is_empty(&self) -> bool { self.questions.is_empty() }

  // ── Questions ─────────────────────────────────────────────────────────────

  /// Append a blank multiple-choice question and return its index.
  pub fn add_question(&mut self) -> usize {
    self.questions.push(Question {
      id:       Uuid::new_v4().to_string(),
      kind:     QuestionType::MultipleChoice,
      title:    String::new(),
      options:  Some(default_options()),
      required: false,
    });
    self.questions.len() - 1
  }

  pub fn remove_question(&mut self, index: usize) -> Option<Question> {
    (index < self.questions.len()).then(|| self.questions.remove(index))
  }

  /// Swap a question with its neighbour. Returns `false` at the edges.
  pub fn move_question(&mut self, index: usize, direction: Direction) -> bool {
    let target = match direction {
      Direction::Up => index.checked_sub(1),
      Direction::Down => Some(index + 1),
    };
    match target {
      Some(t) if t < self.questions.len() && index < self.questions.len() => {
        self.questions.swap(index, t);
        true
      }
      _ => false,
    }
  }

  /// Change a question's type, resetting its options to fit.
  pub fn set_question_type(&mut self, index: usize, kind: QuestionType) {
    let Some(q) = self.questions.get_mut(index) else {
      return;
    };
    q.options = match kind {
      QuestionType::MultipleChoice => match q.kind {
        QuestionType::MultipleChoice => q.options.take(),
        _ => Some(default_options()),
      },
      QuestionType::YesNo => {
        Some(YES_NO_OPTIONS.iter().map(|s| (*s).to_owned()).collect())
      }
      _ => None,
    };
    q.kind = kind;
  }

  pub fn set_question_title(&mut self, index: usize, title: impl Into<String>) {
    if let Some(q) = self.questions.get_mut(index) {
      q.title = title.into();
    }
  }

  pub fn toggle_required(&mut self, index: usize) {
    if let Some(q) = self.questions.get_mut(index) {
      q.required = !q.required;
    }
  }

  // ── Options ───────────────────────────────────────────────────────────────

  /// Append `Option N` to a multiple-choice question.
  pub fn add_option(&mut self, index: usize) -> bool {
    match self.questions.get_mut(index) {
      Some(Question {
        kind: QuestionType::MultipleChoice,
        options: Some(options),
        ..
      }) => {
        options.push(format!("Option {}", options.len() + 1));
        true
      }
      _ => false,
    }
  }

  pub fn set_option(&mut self, index: usize, option: usize, text: impl Into<String>) {
    if let Some(slot) = self
      .questions
      .get_mut(index)
      .filter(|q| q.kind == QuestionType::MultipleChoice)
      .and_then(|q| q.options.as_mut())
      .and_then(|o| o.get_mut(option))
    {
      *slot = text.into();
    }
  }

  /// Remove an option. Refused while only [`MIN_OPTIONS`] remain.
  pub fn remove_option(&mut self, index: usize, option: usize) -> bool {
    match self.questions.get_mut(index).and_then(|q| q.options.as_mut()) {
      Some(options) if options.len() > MIN_OPTIONS && option < options.len() => {
        options.remove(option);
        true
      }
      _ => false,
    }
  }

  // ── Publishing & submit ───────────────────────────────────────────────────

  pub fn toggle_published(&mut self) { self.is_published = !self.is_published; }

  /// Check the draft and produce a trimmed [`NewSurvey`].
  pub fn validate(&self) -> Result<NewSurvey, DraftError> {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(DraftError::MissingTitle);
    }
    if self.questions.is_empty() {
      return Err(DraftError::NoQuestions);
    }

    let questions: Vec<Question> = self.questions.iter().map(normalise).collect();
    check_questions(&questions)?;

    Ok(NewSurvey {
      title: title.to_owned(),
      description: self.description.trim().to_owned(),
      questions,
      is_published: self.is_published,
    })
  }

  /// Validate for an edit of an existing survey.
  pub fn validate_patch(&self) -> Result<SurveyPatch, DraftError> {
    self.validate().map(SurveyPatch::from)
  }
}

/// Apply the same rules as [`SurveyDraft::validate`] to a stored survey.
pub fn validate_survey(survey: &Survey) -> Result<(), DraftError> {
  if survey.title.trim().is_empty() {
    return Err(DraftError::MissingTitle);
  }
  if survey.questions.is_empty() {
    return Err(DraftError::NoQuestions);
  }
  check_questions(&survey.questions)
}

fn check_questions(questions: &[Question]) -> Result<(), DraftError> {
  let mut seen = HashSet::new();
  for (i, q) in questions.iter().enumerate() {
    if !seen.insert(q.id.as_str()) {
      return Err(DraftError::DuplicateQuestionId(q.id.clone()));
    }
    if q.title.trim().is_empty() {
      return Err(DraftError::UntitledQuestion(i));
    }
    if q.kind == QuestionType::MultipleChoice {
      let options = q.options.as_deref().unwrap_or_default();
      if options.len() < MIN_OPTIONS {
        return Err(DraftError::TooFewOptions(i));
      }
      if options.iter().any(|o| o.trim().is_empty()) {
        return Err(DraftError::BlankOption(i));
      }
    }
  }
  Ok(())
}

fn normalise(q: &Question) -> Question {
  let options = match q.kind {
    QuestionType::YesNo => {
      Some(YES_NO_OPTIONS.iter().map(|s| (*s).to_owned()).collect())
    }
    QuestionType::MultipleChoice => q
      .options
      .as_ref()
      .map(|o| o.iter().map(|s| s.trim().to_owned()).collect()),
    _ => None,
  };
  Question {
    id: q.id.clone(),
    kind: q.kind.clone(),
    title: q.title.trim().to_owned(),
    options,
    required: q.required,
  }
}

fn default_options() -> Vec<String> {
  vec!["Option 1".to_owned(), "Option 2".to_owned()]
}

#[cfg(test)]
mod tests {
  use super::*;

  fn titled_draft() -> SurveyDraft {
    let mut draft = SurveyDraft::new();
    draft.title = "  Team lunch  ".into();
    let i = draft.add_question();
    draft.set_question_title(i, "Where shall we go?");
    draft
  }

  #[test]
  fn empty_draft_is_rejected() {
    assert_eq!(SurveyDraft::new().validate(), Err(DraftError::MissingTitle));

    let mut draft = SurveyDraft::new();
    draft.title = "Untitled".into();
    assert_eq!(draft.validate(), Err(DraftError::NoQuestions));
  }

  #[test]
  fn blank_question_title_is_rejected() {
    let mut draft = titled_draft();
    draft.add_question();
    assert_eq!(draft.validate(), Err(DraftError::UntitledQuestion(1)));
    assert_eq!(
      DraftError::UntitledQuestion(1).to_string(),
      "please provide a title for all questions (question 2 is blank)"
    );
  }

  #[test]
  fn valid_draft_is_trimmed() {
    let mut draft = titled_draft();
    draft.description = " lunch poll ".into();
    let new = draft.validate().unwrap();
    assert_eq!(new.title, "Team lunch");
    assert_eq!(new.description, "lunch poll");
    assert_eq!(new.questions.len(), 1);
    assert_eq!(
      new.questions[0].options.as_deref(),
      Some(&["Option 1".to_owned(), "Option 2".to_owned()][..])
    );
  }

  #[test]
  fn options_keep_a_floor_of_two() {
    let mut draft = titled_draft();
    assert!(!draft.remove_option(0, 0));
    assert!(draft.add_option(0));
    assert_eq!(draft.questions[0].options.as_ref().unwrap()[2], "Option 3");
    assert!(draft.remove_option(0, 0));
    assert_eq!(draft.questions[0].options.as_ref().unwrap().len(), 2);
  }

  #[test]
  fn blank_option_is_rejected() {
    let mut draft = titled_draft();
    draft.set_option(0, 1, "   ");
    assert_eq!(draft.validate(), Err(DraftError::BlankOption(0)));
  }

  #[test]
  fn type_change_resets_options() {
    let mut draft = titled_draft();
    draft.set_question_type(0, QuestionType::YesNo);
    assert_eq!(
      draft.questions[0].options.as_deref(),
      Some(&["Yes".to_owned(), "No".to_owned()][..])
    );
    assert!(!draft.add_option(0));

    draft.set_question_type(0, QuestionType::Rating);
    assert!(draft.questions[0].options.is_none());

    draft.set_question_type(0, QuestionType::MultipleChoice);
    assert_eq!(draft.questions[0].options.as_ref().unwrap().len(), 2);
  }

  #[test]
  fn move_question_is_bounded() {
    let mut draft = titled_draft();
    let second = draft.add_question();
    draft.set_question_title(second, "When?");

    assert!(!draft.move_question(0, Direction::Up));
    assert!(!draft.move_question(1, Direction::Down));
    assert!(draft.move_question(1, Direction::Up));
    assert_eq!(draft.questions[0].title, "When?");
  }

  #[test]
  fn publish_axis_is_independent() {
    let mut draft = titled_draft();
    draft.toggle_published();
    draft.add_question();
    draft.remove_question(1);
    assert!(draft.is_published);
    assert!(draft.validate().unwrap().is_published);
  }

  #[test]
  fn duplicate_question_ids_are_rejected() {
    let mut draft = titled_draft();
    let mut copy = draft.questions[0].clone();
    copy.title = "Again".into();
    draft.questions.push(copy);
    assert!(matches!(
      draft.validate(),
      Err(DraftError::DuplicateQuestionId(_))
    ));
  }
}
