//! Survey list pane and its preview, shared by home and my-surveys.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use tally_core::store::SurveyStore;

use crate::app::{App, Screen};

/// Render the survey list into `area`.
pub fn draw<S: SurveyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let filtered = app.visible_surveys();
  let managing = matches!(app.screen, Screen::MySurveys);
  let label = if managing { "My Surveys" } else { "Published" };

  // Title with count.
  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" {label} ({}) [filtered] ", filtered.len())
  } else {
    format!(" {label} ({}) ", filtered.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|survey| {
      let count = app.repo.response_count(&survey.id);
      let mut spans = Vec::new();
      if managing {
        let (badge, color) = if survey.is_published {
          ("● ", Color::Green)
        } else {
          ("○ ", Color::DarkGray)
        };
        spans.push(Span::styled(badge, Style::default().fg(color)));
      }
      spans.push(Span::raw(survey.title.clone()));
      spans.push(Span::styled(
        format!("  {count}"),
        Style::default().fg(Color::DarkGray),
      ));
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // If filter is active or set, show a filter bar at the bottom of the inner area.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if filtered.is_empty() {
    let empty = if managing {
      "No surveys yet. Press c to create one."
    } else {
      "No published surveys. Press c to create one."
    };
    f.render_widget(
      Paragraph::new(empty).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  // Scrollable list with cursor tracking.
  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}

/// Render details of the survey under the cursor.
pub fn draw_preview<S: SurveyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let block = Block::default()
    .title(" Survey ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(survey) = app.cursor_survey() else {
    f.render_widget(
      Paragraph::new("Select a survey.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let dim = Style::default().fg(Color::DarkGray);
  let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

  let mut lines = vec![
    Line::from(Span::styled(
      survey.title.clone(),
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Line::from(survey.description.clone()),
    Line::from(""),
    Line::from(vec![
      Span::styled(format!("{:<12}", "Questions"), key),
      Span::raw(format!(
        "{} ({} required)",
        survey.questions.len(),
        survey.required_count()
      )),
    ]),
    Line::from(vec![
      Span::styled(format!("{:<12}", "Responses"), key),
      Span::raw(app.repo.response_count(&survey.id).to_string()),
    ]),
    Line::from(vec![
      Span::styled(format!("{:<12}", "Created"), key),
      Span::raw(survey.created_at.format("%Y-%m-%d").to_string()),
    ]),
    Line::from(vec![
      Span::styled(format!("{:<12}", "Status"), key),
      if survey.is_published {
        Span::styled("published", Style::default().fg(Color::Green))
      } else {
        Span::styled("draft", dim)
      },
    ]),
    Line::from(""),
  ];

  for (i, q) in survey.questions.iter().enumerate() {
    let mut spans = vec![
      Span::styled(format!("{:>2}. ", i + 1), dim),
      Span::raw(q.title.clone()),
      Span::styled(format!("  [{}]", q.kind.label()), dim),
    ];
    if q.required {
      spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(spans));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
