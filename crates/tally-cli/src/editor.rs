//! Editor state for the create/edit view.
//!
//! Wraps a [`SurveyDraft`] with a keyboard focus. The focusable fields are
//! derived from the draft on every call, so adding or removing questions and
//! options never leaves a stale field list behind.

use tally_core::{
  draft::{Direction, DraftError, SurveyDraft},
  survey::{NewSurvey, QuestionType, Survey, SurveyPatch},
};

/// One focusable element of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Title,
  Description,
  Published,
  QuestionTitle(usize),
  QuestionType(usize),
  Required(usize),
  Option(usize, usize),
}

impl Field {
  /// The question this field belongs to, if any.
  pub fn question(self) -> Option<usize> {
    match self {
      Self::QuestionTitle(i)
      | Self::QuestionType(i)
      | Self::Required(i)
      | Self::Option(i, _) => Some(i),
      Self::Title | Self::Description | Self::Published => None,
    }
  }

  pub fn is_text(self) -> bool {
    matches!(
      self,
      Self::Title | Self::Description | Self::QuestionTitle(_) | Self::Option(..)
    )
  }
}

/// What a successful save should do.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveAction {
  Create(NewSurvey),
  Update(String, SurveyPatch),
}

#[derive(Debug, Clone, Default)]
pub struct Editor {
  pub draft:   SurveyDraft,
  /// Id of the survey being edited; `None` when creating.
  pub editing: Option<String>,
  pub cursor:  usize,
}

impl Editor {
  pub fn new() -> Self { Self::default() }

  pub fn edit(survey: &Survey) -> Self {
    Self {
      draft:   SurveyDraft::from_survey(survey),
      editing: Some(survey.id.clone()),
      cursor:  0,
    }
  }

  // ── Focus ─────────────────────────────────────────────────────────────────

  pub fn fields(&self) -> Vec<Field> {
    let mut fields = vec![Field::Title, Field::Description, Field::Published];
    for (i, q) in self.draft.questions.iter().enumerate() {
      fields.push(Field::QuestionTitle(i));
      fields.push(Field::QuestionType(i));
      fields.push(Field::Required(i));
      if q.kind == QuestionType::MultipleChoice {
        let count = q.options.as_ref().map_or(0, Vec::len);
        fields.extend((0..count).map(|j| Field::Option(i, j)));
      }
    }
    fields
  }

  pub fn focus(&self) -> Field {
    let fields = self.fields();
    fields[self.cursor.min(fields.len() - 1)]
  }

  pub fn move_focus(&mut self, delta: isize) {
    let len = self.fields().len() as isize;
    self.cursor = (self.cursor as isize + delta).clamp(0, len - 1) as usize;
  }

  fn focus_on(&mut self, field: Field) {
    if let Some(pos) = self.fields().iter().position(|f| *f == field) {
      self.cursor = pos;
    }
  }

  fn clamp_cursor(&mut self) {
    self.cursor = self.cursor.min(self.fields().len() - 1);
  }

  // ── Text input ────────────────────────────────────────────────────────────

  fn text_mut(&mut self) -> Option<&mut String> {
    match self.focus() {
      Field::Title => Some(&mut self.draft.title),
      Field::Description => Some(&mut self.draft.description),
      Field::QuestionTitle(i) => self.draft.questions.get_mut(i).map(|q| &mut q.title),
      Field::Option(i, j) => self
        .draft
        .questions
        .get_mut(i)
        .and_then(|q| q.options.as_mut())
        .and_then(|o| o.get_mut(j)),
      _ => None,
    }
  }

  pub fn insert_char(&mut self, c: char) {
    if let Some(text) = self.text_mut() {
      text.push(c);
    }
  }

  pub fn backspace(&mut self) {
    if let Some(text) = self.text_mut() {
      text.pop();
    }
  }

  /// Space/Enter on a non-text field: toggle or cycle it.
  pub fn activate(&mut self) {
    match self.focus() {
      Field::Published => self.draft.toggle_published(),
      Field::Required(i) => self.draft.toggle_required(i),
      Field::QuestionType(i) => self.cycle_type(i),
      _ => {}
    }
  }

  fn cycle_type(&mut self, index: usize) {
    if let Some(next) = self.draft.questions.get(index).map(|q| q.kind.next()) {
      self.draft.set_question_type(index, next);
      self.focus_on(Field::QuestionType(index));
    }
  }

  // ── Structure ─────────────────────────────────────────────────────────────

  pub fn add_question(&mut self) {
    let i = self.draft.add_question();
    self.focus_on(Field::QuestionTitle(i));
  }

  pub fn remove_question(&mut self) {
    if let Some(i) = self.focus().question() {
      self.draft.remove_question(i);
      self.clamp_cursor();
    }
  }

  pub fn move_question(&mut self, direction: Direction) {
    let Some(i) = self.focus().question() else {
      return;
    };
    if self.draft.move_question(i, direction) {
      let target = match direction {
        Direction::Up => i - 1,
        Direction::Down => i + 1,
      };
      self.focus_on(Field::QuestionTitle(target));
    }
  }

  pub fn add_option(&mut self) {
    let Some(i) = self.focus().question() else {
      return;
    };
    if self.draft.add_option(i) {
      let last = self.draft.questions[i].options.as_ref().map_or(0, Vec::len);
      self.focus_on(Field::Option(i, last.saturating_sub(1)));
    }
  }

  pub fn remove_option(&mut self) {
    if let Field::Option(i, j) = self.focus() {
      self.draft.remove_option(i, j);
      self.clamp_cursor();
    }
  }

  // ── Save ──────────────────────────────────────────────────────────────────

  pub fn save_action(&self) -> Result<SaveAction, DraftError> {
    match &self.editing {
      None => self.draft.validate().map(SaveAction::Create),
      Some(id) => self
        .draft
        .validate_patch()
        .map(|patch| SaveAction::Update(id.clone(), patch)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn type_str(editor: &mut Editor, s: &str) {
    for c in s.chars() {
      editor.insert_char(c);
    }
  }

  #[test]
  fn empty_editor_has_header_fields() {
    let editor = Editor::new();
    assert_eq!(editor.fields(), vec![
      Field::Title,
      Field::Description,
      Field::Published
    ]);
    assert_eq!(editor.focus(), Field::Title);
  }

  #[test]
  fn typing_edits_the_focused_field() {
    let mut editor = Editor::new();
    type_str(&mut editor, "Lunch");
    editor.backspace();
    assert_eq!(editor.draft.title, "Lunc");

    editor.add_question();
    assert_eq!(editor.focus(), Field::QuestionTitle(0));
    type_str(&mut editor, "Where?");
    assert_eq!(editor.draft.questions[0].title, "Where?");
  }

  #[test]
  fn activate_toggles_and_cycles() {
    let mut editor = Editor::new();
    editor.move_focus(2);
    editor.activate();
    assert!(editor.draft.is_published);

    editor.add_question();
    editor.move_focus(1);
    assert_eq!(editor.focus(), Field::QuestionType(0));
    editor.activate();
    assert_eq!(editor.draft.questions[0].kind, QuestionType::Text);
    // Text questions have no option fields.
    assert_eq!(editor.fields().len(), 6);
  }

  #[test]
  fn add_and_remove_options() {
    let mut editor = Editor::new();
    editor.add_question();
    editor.add_option();
    assert_eq!(editor.focus(), Field::Option(0, 2));
    type_str(&mut editor, "!");
    assert_eq!(editor.draft.questions[0].options.as_ref().unwrap()[2], "Option 3!");

    editor.remove_option();
    assert_eq!(editor.draft.questions[0].options.as_ref().unwrap().len(), 2);
    assert!(matches!(editor.focus(), Field::Option(0, _)));
  }

  #[test]
  fn remove_last_question_keeps_focus_valid() {
    let mut editor = Editor::new();
    editor.add_question();
    editor.move_focus(100);
    editor.remove_question();
    assert!(editor.draft.questions.is_empty());
    assert_eq!(editor.focus(), Field::Published);
  }

  #[test]
  fn move_question_follows_focus() {
    let mut editor = Editor::new();
    editor.add_question();
    type_str(&mut editor, "first");
    editor.add_question();
    type_str(&mut editor, "second");

    editor.move_question(Direction::Up);
    assert_eq!(editor.draft.questions[0].title, "second");
    assert_eq!(editor.focus(), Field::QuestionTitle(0));
  }

  #[test]
  fn save_action_depends_on_mode() {
    let mut editor = Editor::new();
    assert_eq!(editor.save_action(), Err(DraftError::MissingTitle));

    type_str(&mut editor, "Poll");
    editor.add_question();
    type_str(&mut editor, "Pick one");
    assert!(matches!(editor.save_action(), Ok(SaveAction::Create(_))));

    editor.editing = Some("abc".into());
    assert!(matches!(
      editor.save_action(),
      Ok(SaveAction::Update(id, _)) if id == "abc"
    ));
  }
}
