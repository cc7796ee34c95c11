//! Not-found and unavailable views.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

fn draw_notice(f: &mut Frame, area: Rect, heading: &str, body: String) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let lines = vec![
    Line::from(""),
    Line::from(Span::styled(
      heading.to_owned(),
      Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
    Line::from(body),
    Line::from(""),
    Line::from(Span::styled(
      "Press Enter to return home.",
      Style::default().fg(Color::DarkGray),
    )),
  ];
  f.render_widget(
    Paragraph::new(lines)
      .alignment(ratatui::layout::Alignment::Center)
      .wrap(Wrap { trim: true }),
    inner,
  );
}

pub fn draw_not_found(f: &mut Frame, area: Rect) {
  draw_notice(
    f,
    area,
    "Survey not found",
    "The survey you're looking for doesn't exist or may have been deleted.".into(),
  );
}

pub fn draw_unavailable(f: &mut Frame, area: Rect, title: &str) {
  draw_notice(
    f,
    area,
    "Survey unavailable",
    format!("\"{title}\" is not currently accepting responses."),
  );
}
