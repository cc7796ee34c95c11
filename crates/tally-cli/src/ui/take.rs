//! Respondent view.

use ratatui::{
  Frame,
  layout::{Alignment, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use tally_core::survey::{QuestionType, RATING_MAX, RATING_MIN};

use crate::take::TakeForm;

pub fn draw(f: &mut Frame, area: Rect, form: &TakeForm) {
  let block = Block::default()
    .title(format!(" {} ", form.survey.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if form.submitted {
    let lines = vec![
      Line::from(""),
      Line::from(Span::styled(
        "Thank you!",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
      )),
      Line::from(""),
      Line::from("Your response has been submitted successfully."),
      Line::from(""),
      Line::from(Span::styled(
        "Enter to view results, Esc to return home.",
        Style::default().fg(Color::DarkGray),
      )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    return;
  }

  let dim = Style::default().fg(Color::DarkGray);
  let selected = Style::default()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

  let (answered, required) = form.required_progress();
  let mut lines = vec![
    Line::from(form.survey.description.clone()),
    Line::from(Span::styled(
      format!("{answered}/{required} required answered"),
      dim,
    )),
    Line::from(""),
  ];
  let mut focus_line = 0;

  for (i, q) in form.survey.questions.iter().enumerate() {
    let focused = i == form.cursor;
    if focused {
      focus_line = lines.len();
    }
    let marker = if focused { "▶ " } else { "  " };
    let mut heading = vec![
      Span::styled(marker, Style::default().fg(Color::Cyan)),
      Span::styled(
        format!("{}. {}", i + 1, q.title),
        Style::default().add_modifier(Modifier::BOLD),
      ),
    ];
    if q.required {
      heading.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(heading));

    let mut answer = vec![Span::raw("    ")];
    match &q.kind {
      kind if kind.is_choice() => {
        let chosen = form.selected_choice(q);
        for (j, choice) in q.choices().iter().enumerate() {
          let style = if chosen == Some(j) { selected } else { Style::default() };
          answer.push(Span::styled(format!(" {} {} ", j + 1, choice), style));
          answer.push(Span::raw(" "));
        }
      }
      QuestionType::Rating => {
        let rating = form.rating(q);
        for n in RATING_MIN..=RATING_MAX {
          let filled = rating.is_some_and(|r| n <= r);
          let style = if filled {
            Style::default().fg(Color::Yellow)
          } else {
            dim
          };
          answer.push(Span::styled(if filled { "★ " } else { "☆ " }, style));
        }
        if let Some(r) = rating {
          answer.push(Span::styled(format!(" {r}/{RATING_MAX}"), dim));
        }
      }
      QuestionType::Text => {
        let text = form.text(q);
        if text.is_empty() && !focused {
          answer.push(Span::styled("Enter your answer…", dim));
        } else {
          answer.push(Span::raw(text.to_owned()));
          if focused {
            answer.push(Span::styled("_", Style::default().fg(Color::Cyan)));
          }
        }
      }
      QuestionType::Unknown(other) => {
        answer.push(Span::styled(format!("(unsupported question type: {other})"), dim));
      }
      _ => {}
    }
    lines.push(Line::from(answer));
    lines.push(Line::from(""));
  }

  let scroll = (focus_line as u16).saturating_sub(inner.height.saturating_sub(4) / 2);
  f.render_widget(
    Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .scroll((scroll, 0)),
    inner,
  );
}
