//! Respondent form for the take view.

use tally_core::{
  answer::Answer,
  response::Answers,
  survey::{Question, QuestionType, RATING_MAX, RATING_MIN, Survey},
};

/// Answers being collected for one survey. The survey is a snapshot taken
/// when the form was opened.
#[derive(Debug, Clone)]
pub struct TakeForm {
  pub survey:    Survey,
  pub answers:   Answers,
  /// Index of the focused question.
  pub cursor:    usize,
  pub submitted: bool,
}

impl TakeForm {
  pub fn new(survey: Survey) -> Self {
    Self {
      survey,
      answers: Answers::new(),
      cursor: 0,
      submitted: false,
    }
  }

  pub fn current(&self) -> Option<&Question> { self.survey.questions.get(self.cursor) }

  pub fn move_cursor(&mut self, delta: isize) {
    let len = self.survey.questions.len() as isize;
    if len == 0 {
      return;
    }
    self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
  }

  /// Position of the current answer within the question's choices.
  pub fn selected_choice(&self, question: &Question) -> Option<usize> {
    let chosen = self.answers.get(&question.id)?.as_text()?;
    question.choices().iter().position(|c| *c == chosen)
  }

  /// Pick the `index`th choice (zero-based) for the focused question.
  pub fn select_choice(&mut self, index: usize) {
    let Some(q) = self.current().filter(|q| q.kind.is_choice()) else {
      return;
    };
    if let Some(choice) = q.choices().get(index).map(|c| (*c).to_owned()) {
      let id = q.id.clone();
      self.answers.insert(id, Answer::Text(choice));
    }
  }

  /// Move the selection for a choice question, wrapping at the ends.
  pub fn cycle_choice(&mut self, delta: isize) {
    let Some(q) = self.current().filter(|q| q.kind.is_choice()) else {
      return;
    };
    let len = q.choices().len() as isize;
    if len == 0 {
      return;
    }
    let next = match self.selected_choice(q) {
      Some(i) => (i as isize + delta).rem_euclid(len),
      None if delta < 0 => len - 1,
      None => 0,
    };
    self.select_choice(next as usize);
  }

  pub fn rating(&self, question: &Question) -> Option<u8> {
    self
      .answers
      .get(&question.id)
      .and_then(|a| a.as_rating(RATING_MIN, RATING_MAX))
  }

  pub fn set_rating(&mut self, value: u8) {
    let Some(q) = self.current().filter(|q| q.kind == QuestionType::Rating) else {
      return;
    };
    if (RATING_MIN..=RATING_MAX).contains(&value) {
      let id = q.id.clone();
      self.answers.insert(id, Answer::from(value));
    }
  }

  pub fn step_rating(&mut self, delta: i8) {
    let Some(q) = self.current() else {
      return;
    };
    let next = match self.rating(q) {
      Some(r) => r.saturating_add_signed(delta).clamp(RATING_MIN, RATING_MAX),
      None if delta < 0 => RATING_MAX,
      None => RATING_MIN,
    };
    self.set_rating(next);
  }

  /// The text typed so far for a text question.
  pub fn text(&self, question: &Question) -> &str {
    self
      .answers
      .get(&question.id)
      .and_then(Answer::as_text)
      .unwrap_or_default()
  }

  pub fn insert_char(&mut self, c: char) {
    let Some(q) = self.current().filter(|q| q.kind == QuestionType::Text) else {
      return;
    };
    let mut text = self.text(q).to_owned();
    text.push(c);
    let id = q.id.clone();
    self.answers.insert(id, Answer::Text(text));
  }

  pub fn backspace(&mut self) {
    let Some(q) = self.current().filter(|q| q.kind == QuestionType::Text) else {
      return;
    };
    let mut text = self.text(q).to_owned();
    text.pop();
    let id = q.id.clone();
    if text.is_empty() {
      self.answers.remove(&id);
    } else {
      self.answers.insert(id, Answer::Text(text));
    }
  }

  /// (answered, total) over required questions.
  pub fn required_progress(&self) -> (usize, usize) {
    let required = self.survey.questions.iter().filter(|q| q.required);
    let answered = required
      .clone()
      .filter(|q| self.answers.get(&q.id).is_some_and(|a| !a.is_blank()))
      .count();
    (answered, required.count())
  }
}
