//! TUI rendering. Orchestrates all panes.

pub mod editor;
pub mod notice;
pub mod results;
pub mod survey_list;
pub mod take;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tally_core::store::SurveyStore;

use crate::app::{App, Modal, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: SurveyStore>(f: &mut Frame, app: &App<S>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  if let Some(modal) = &app.modal {
    draw_modal(f, area, modal);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S: SurveyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let tab = |label: &str, active: bool| {
    let style = if active {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::White)
    };
    Span::styled(format!(" {label} "), style)
  };

  let mut left = vec![Span::styled(
    " tally ",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];
  left.push(tab("Home", matches!(app.screen, Screen::Home)));
  left.push(tab("My Surveys", matches!(app.screen, Screen::MySurveys)));
  left.push(tab("Create", matches!(
    &app.screen,
    Screen::Editor(e) if e.editing.is_none()
  )));

  let stats = app.repo.stats();
  let right = Span::styled(
    format!(
      "{} surveys · {} published · {} responses ",
      stats.total_surveys, stats.published_surveys, stats.total_responses
    ),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width: usize = left.iter().map(|s| s.content.chars().count()).sum();
  let right_width = right.content.chars().count();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  left.push(Span::raw(" ".repeat(pad)));
  left.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(left)), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<S: SurveyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  match &app.screen {
    Screen::Home | Screen::MySurveys => {
      // Split into left list pane (40%) and right preview pane (60%).
      let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
      survey_list::draw(f, cols[0], app);
      survey_list::draw_preview(f, cols[1], app);
    }
    Screen::Editor(editor) => editor::draw(f, area, editor),
    Screen::Take(form) => take::draw(f, area, form),
    Screen::Results { survey_id, scroll } => match app.repo.results(survey_id) {
      Ok(results) => results::draw(f, area, &results, *scroll),
      Err(_) => notice::draw_not_found(f, area),
    },
    Screen::NotFound => notice::draw_not_found(f, area),
    Screen::Unavailable(title) => notice::draw_unavailable(f, area, title),
  }
}

// ─── Modal ────────────────────────────────────────────────────────────────────

fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  cell
}

fn draw_modal(f: &mut Frame, area: Rect, modal: &Modal) {
  let (title, body, hint, accent) = match modal {
    Modal::Alert(message) => (" Notice ", message.clone(), "Enter to dismiss", Color::Yellow),
    Modal::ConfirmDelete { title, .. } => (
      " Delete survey ",
      format!("Delete \"{title}\" and all of its responses?\nThis cannot be undone."),
      "y delete  n cancel",
      Color::Red,
    ),
  };

  let popup = centered(area, 56.min(area.width), 9.min(area.height));
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(accent));
  let inner = block.inner(popup);

  f.render_widget(Clear, popup);
  f.render_widget(block, popup);

  let mut lines: Vec<Line> = body.lines().map(|l| Line::from(l.to_owned())).collect();
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    hint,
    Style::default().fg(Color::DarkGray),
  )));
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: SurveyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match &app.screen {
    _ if app.modal.is_some() => ("MODAL", "Answer the dialog to continue"),
    Screen::Home | Screen::MySurveys if app.filter_active => (
      "SEARCH",
      "Type to filter  Esc cancel  Enter keep",
    ),
    Screen::Home => (
      "HOME",
      "↑↓/jk navigate  Enter take  r results  m my surveys  c create  / search  q quit",
    ),
    Screen::MySurveys => (
      "MANAGE",
      "Enter edit  t take  r results  p publish  d delete  c create  Esc home  q quit",
    ),
    Screen::Editor(_) => (
      "EDIT",
      "↑↓ field  Space toggle  ^N question  ^D drop  ^O option  ^X drop option  \
       Alt-↑↓ move  ^S save  Esc cancel",
    ),
    Screen::Take(form) if form.submitted => ("DONE", "Enter results  Esc home"),
    Screen::Take(_) => (
      "TAKE",
      "↑↓ question  ←→/1-5 choose  type to answer  Enter submit  Esc cancel",
    ),
    Screen::Results { .. } => ("RESULTS", "↑↓/jk scroll  t take  m my surveys  Esc home  q quit"),
    Screen::NotFound | Screen::Unavailable(_) => ("NOTICE", "Enter home  q quit"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
