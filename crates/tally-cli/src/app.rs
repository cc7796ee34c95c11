//! Application state machine and event dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use tally_core::{
  Error as CoreError,
  draft::Direction,
  repository::Repository,
  store::SurveyStore,
  submission::SubmissionError,
  survey::{QuestionType, Survey},
};
use tracing::{error, info};

use crate::{
  editor::{Editor, Field, SaveAction},
  take::TakeForm,
};

// ─── Route / Screen ───────────────────────────────────────────────────────────

/// A navigation target. Resolved into a [`Screen`] by [`App::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Home,
  MySurveys,
  Create,
  Edit(String),
  Take(String),
  Results(String),
}

#[derive(Debug, Clone)]
pub enum Screen {
  /// Published surveys, ready to take.
  Home,
  /// Every survey, with management actions.
  MySurveys,
  Editor(Box<Editor>),
  Take(Box<TakeForm>),
  Results { survey_id: String, scroll: u16 },
  NotFound,
  /// Title of the unpublished survey that was requested.
  Unavailable(String),
}

/// A blocking overlay. While one is open it receives every key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
  Alert(String),
  ConfirmDelete { survey_id: String, title: String },
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  pub repo: Repository<S>,

  pub screen: Screen,

  pub modal: Option<Modal>,

  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* survey list.
  pub list_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl<S: SurveyStore> App<S> {
  pub fn new(repo: Repository<S>) -> Self {
    Self {
      repo,
      screen: Screen::Home,
      modal: None,
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      status_msg: String::new(),
    }
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Switch screens. Take and results resolve their survey here, so an
  /// unknown id lands on the not-found view and an unpublished survey on the
  /// unavailable view.
  pub fn navigate(&mut self, route: Route) {
    self.modal = None;
    self.status_msg.clear();
    self.screen = match route {
      Route::Home => self.enter_list(Screen::Home),
      Route::MySurveys => self.enter_list(Screen::MySurveys),
      Route::Create => Screen::Editor(Box::new(Editor::new())),
      Route::Edit(id) => match self.repo.survey(&id) {
        Some(survey) => Screen::Editor(Box::new(Editor::edit(survey))),
        None => Screen::NotFound,
      },
      Route::Take(id) => match self.repo.survey(&id) {
        None => Screen::NotFound,
        Some(survey) if !survey.is_published => Screen::Unavailable(survey.title.clone()),
        Some(survey) => Screen::Take(Box::new(TakeForm::new(survey.clone()))),
      },
      Route::Results(id) => match self.repo.survey(&id) {
        Some(_) => Screen::Results { survey_id: id, scroll: 0 },
        None => Screen::NotFound,
      },
    };
  }

  /// Arriving at a list from any other screen starts with a fresh filter and
  /// cursor.
  fn enter_list(&mut self, list: Screen) -> Screen {
    if std::mem::discriminant(&self.screen) != std::mem::discriminant(&list) {
      self.filter.clear();
      self.filter_active = false;
      self.list_cursor = 0;
    }
    list
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Surveys shown by the current list screen, narrowed by the filter.
  pub fn visible_surveys(&self) -> Vec<&Survey> {
    let all: Vec<&Survey> = match self.screen {
      Screen::Home => self.repo.published_surveys().collect(),
      _ => self.repo.surveys().iter().collect(),
    };
    if self.filter.is_empty() {
      return all;
    }
    let matcher = SkimMatcherV2::default();
    all
      .into_iter()
      .filter(|s| matcher.fuzzy_match(&s.title, &self.filter).is_some())
      .collect()
  }

  /// The survey under the list cursor in the filtered view, if any.
  pub fn cursor_survey(&self) -> Option<&Survey> {
    self.visible_surveys().get(self.list_cursor).copied()
  }

  fn cursor_survey_id(&self) -> Option<String> {
    self.cursor_survey().map(|s| s.id.clone())
  }

  // ── Error reporting ───────────────────────────────────────────────────────

  fn alert(&mut self, message: impl Into<String>) {
    self.modal = Some(Modal::Alert(message.into()));
  }

  /// Route a repository error to the surface that shows it.
  fn report(&mut self, err: CoreError) {
    match err {
      CoreError::InvalidSurvey(e) => self.alert(e.to_string()),
      CoreError::InvalidResponse(SubmissionError::MissingRequired(ids)) => {
        let count = ids.len();
        self.alert(format!(
          "{}\n\n{count} required question{} unanswered.",
          SubmissionError::MissingRequired(ids),
          if count == 1 { "" } else { "s" },
        ));
      }
      CoreError::InvalidResponse(e) => self.alert(e.to_string()),
      CoreError::SurveyNotFound(_) => self.screen = Screen::NotFound,
      CoreError::SurveyUnpublished(id) => {
        let title = self.repo.survey(&id).map(|s| s.title.clone()).unwrap_or(id);
        self.screen = Screen::Unavailable(title);
      }
      CoreError::Store(e) => {
        error!(error = %e, "store operation failed");
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.modal.is_some() {
      self.handle_modal_key(key).await;
      return Ok(true);
    }

    // Filter input mode: all printable keys go into the filter string.
    if self.filter_active {
      self.handle_filter_key(key);
      return Ok(true);
    }

    match self.screen {
      Screen::Home => Ok(self.handle_home_key(key)),
      Screen::MySurveys => self.handle_manage_key(key).await,
      Screen::Editor(_) => {
        self.handle_editor_key(key).await;
        Ok(true)
      }
      Screen::Take(_) => {
        self.handle_take_key(key).await;
        Ok(true)
      }
      Screen::Results { .. } => Ok(self.handle_results_key(key)),
      Screen::NotFound | Screen::Unavailable(_) => Ok(self.handle_notice_key(key)),
    }
  }

  async fn handle_modal_key(&mut self, key: KeyEvent) {
    match self.modal.take() {
      Some(Modal::Alert(message)) => {
        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
          self.modal = Some(Modal::Alert(message));
        }
      }
      Some(Modal::ConfirmDelete { survey_id, title }) => match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => self.delete_survey(&survey_id).await,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
        _ => self.modal = Some(Modal::ConfirmDelete { survey_id, title }),
      },
      None => {}
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  /// Keys shared by both list screens. Returns `true` if consumed.
  fn handle_list_nav(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_surveys().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Char('c') => self.navigate(Route::Create),
      KeyCode::Char('r') => {
        if let Some(id) = self.cursor_survey_id() {
          self.navigate(Route::Results(id));
        }
      }
      _ => return false,
    }
    true
  }

  fn handle_home_key(&mut self, key: KeyEvent) -> bool {
    if self.handle_list_nav(key) {
      return true;
    }
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Enter | KeyCode::Char('t') => {
        if let Some(id) = self.cursor_survey_id() {
          self.navigate(Route::Take(id));
        }
      }
      KeyCode::Char('m') | KeyCode::Tab => self.navigate(Route::MySurveys),
      _ => {}
    }
    true
  }

  async fn handle_manage_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if self.handle_list_nav(key) {
      return Ok(true);
    }
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Esc | KeyCode::Char('h') | KeyCode::Tab => self.navigate(Route::Home),
      KeyCode::Enter | KeyCode::Char('e') => {
        if let Some(id) = self.cursor_survey_id() {
          self.navigate(Route::Edit(id));
        }
      }
      KeyCode::Char('t') => {
        if let Some(id) = self.cursor_survey_id() {
          self.navigate(Route::Take(id));
        }
      }
      KeyCode::Char('p') => {
        if let Some(id) = self.cursor_survey_id() {
          match self.repo.toggle_published(&id).await {
            Ok(true) => self.status_msg = "Survey published.".into(),
            Ok(false) => self.status_msg = "Survey unpublished.".into(),
            Err(e) => self.report(e),
          }
        }
      }
      KeyCode::Char('d') => {
        if let Some(s) = self.cursor_survey() {
          self.modal = Some(Modal::ConfirmDelete {
            survey_id: s.id.clone(),
            title:     s.title.clone(),
          });
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn delete_survey(&mut self, survey_id: &str) {
    match self.repo.delete_survey(survey_id).await {
      Ok(removed) => {
        self.status_msg = format!("Survey deleted along with {removed} response(s).");
        let len = self.visible_surveys().len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
      }
      Err(e) => self.report(e),
    }
  }

  async fn handle_editor_key(&mut self, key: KeyEvent) {
    let Screen::Editor(editor) = &mut self.screen else {
      return;
    };
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
      KeyCode::Esc => self.navigate(Route::MySurveys),
      KeyCode::Char('s') if ctrl => self.save_editor().await,
      KeyCode::Char('n') if ctrl => editor.add_question(),
      KeyCode::Char('d') if ctrl => editor.remove_question(),
      KeyCode::Char('o') if ctrl => editor.add_option(),
      KeyCode::Char('x') if ctrl => editor.remove_option(),
      KeyCode::Up if alt => editor.move_question(Direction::Up),
      KeyCode::Down if alt => editor.move_question(Direction::Down),
      KeyCode::Up | KeyCode::BackTab => editor.move_focus(-1),
      KeyCode::Down | KeyCode::Tab => editor.move_focus(1),
      KeyCode::Enter => {
        if editor.focus().is_text() {
          editor.move_focus(1);
        } else {
          editor.activate();
        }
      }
      KeyCode::Left | KeyCode::Right if matches!(editor.focus(), Field::QuestionType(_)) => {
        editor.activate();
      }
      KeyCode::Char(' ') if !editor.focus().is_text() => editor.activate(),
      KeyCode::Backspace => editor.backspace(),
      KeyCode::Char(c) if !ctrl && !alt => editor.insert_char(c),
      _ => {}
    }
  }

  async fn save_editor(&mut self) {
    let Screen::Editor(editor) = &self.screen else {
      return;
    };
    let action = match editor.save_action() {
      Ok(action) => action,
      Err(e) => {
        self.alert(e.to_string());
        return;
      }
    };

    let saved = match action {
      SaveAction::Create(input) => self.repo.create_survey(input).await,
      SaveAction::Update(id, patch) => self.repo.update_survey(&id, patch).await,
    };
    match saved {
      Ok(survey) => {
        info!(survey_id = %survey.id, "editor saved survey");
        self.navigate(Route::MySurveys);
        self.status_msg = format!("Saved \"{}\".", survey.title);
      }
      Err(e) => self.report(e),
    }
  }

  async fn handle_take_key(&mut self, key: KeyEvent) {
    let Screen::Take(form) = &mut self.screen else {
      return;
    };

    if form.submitted {
      let id = form.survey.id.clone();
      match key.code {
        KeyCode::Enter | KeyCode::Char('r') => self.navigate(Route::Results(id)),
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('q') => self.navigate(Route::Home),
        _ => {}
      }
      return;
    }

    let kind = form.current().map(|q| q.kind.clone());
    match (key.code, kind) {
      (KeyCode::Esc, _) => self.navigate(Route::Home),
      (KeyCode::Enter, _) => self.submit_form().await,
      (KeyCode::Up | KeyCode::BackTab, _) => form.move_cursor(-1),
      (KeyCode::Down | KeyCode::Tab, _) => form.move_cursor(1),
      (KeyCode::Left, Some(k)) if k.is_choice() => form.cycle_choice(-1),
      (KeyCode::Right, Some(k)) if k.is_choice() => form.cycle_choice(1),
      (KeyCode::Char(c @ '1'..='9'), Some(k)) if k.is_choice() => {
        form.select_choice(c as usize - '1' as usize);
      }
      (KeyCode::Left, Some(QuestionType::Rating)) => form.step_rating(-1),
      (KeyCode::Right, Some(QuestionType::Rating)) => form.step_rating(1),
      (KeyCode::Char(c @ '1'..='9'), Some(QuestionType::Rating)) => {
        form.set_rating(c as u8 - b'0');
      }
      (KeyCode::Backspace, Some(QuestionType::Text)) => form.backspace(),
      (KeyCode::Char(c), Some(QuestionType::Text)) => form.insert_char(c),
      _ => {}
    }
  }

  async fn submit_form(&mut self) {
    let Screen::Take(form) = &self.screen else {
      return;
    };
    let survey_id = form.survey.id.clone();
    let answers = form.answers.clone();

    match self.repo.submit_response(&survey_id, answers).await {
      Ok(_) => {
        if let Screen::Take(form) = &mut self.screen {
          form.submitted = true;
        }
      }
      Err(e) => self.report(e),
    }
  }

  fn handle_results_key(&mut self, key: KeyEvent) -> bool {
    let Screen::Results { survey_id, scroll } = &mut self.screen else {
      return true;
    };
    // Scrolling moves one question card at a time and stops at the last one.
    let last = self
      .repo
      .survey(survey_id)
      .map_or(0, |s| s.questions.len().saturating_sub(1));
    let last = u16::try_from(last).unwrap_or(u16::MAX);
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1).min(last),
      KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
      KeyCode::PageDown => *scroll = scroll.saturating_add(3).min(last),
      KeyCode::PageUp => *scroll = scroll.saturating_sub(3),
      KeyCode::Char('t') => {
        let id = survey_id.clone();
        self.navigate(Route::Take(id));
      }
      KeyCode::Esc | KeyCode::Char('h') => self.navigate(Route::Home),
      KeyCode::Char('m') => self.navigate(Route::MySurveys),
      _ => {}
    }
    true
  }

  fn handle_notice_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => false,
      KeyCode::Enter | KeyCode::Esc | KeyCode::Char('h') => {
        self.navigate(Route::Home);
        true
      }
      _ => true,
    }
  }
}
