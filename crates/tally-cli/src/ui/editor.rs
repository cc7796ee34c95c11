//! Create/edit view.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use tally_core::survey::{QuestionType, YES_NO_OPTIONS};

use crate::editor::{Editor, Field};

pub fn draw(f: &mut Frame, area: Rect, editor: &Editor) {
  let title = if editor.editing.is_some() {
    " Edit Survey "
  } else {
    " Create Survey "
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let focus = editor.focus();
  let draft = &editor.draft;
  let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
  let dim = Style::default().fg(Color::DarkGray);

  // Each row: label, value, and whether it holds the cursor.
  let row = |field: Field, name: String, value: String| -> Line<'static> {
    let focused = field == focus;
    let value_style = if focused {
      Style::default().bg(Color::Blue).fg(Color::White)
    } else {
      Style::default()
    };
    let caret = if focused && field.is_text() { "_" } else { "" };
    Line::from(vec![
      Span::styled(if focused { "▶ " } else { "  " }, label),
      Span::styled(format!("{name:<14}"), label),
      Span::styled(format!("{value}{caret}"), value_style),
    ])
  };
  let check = |on: bool| (if on { "[x]" } else { "[ ]" }).to_owned();

  let mut lines = vec![
    row(Field::Title, "Title".into(), draft.title.clone()),
    row(Field::Description, "Description".into(), draft.description.clone()),
    row(Field::Published, "Published".into(), check(draft.is_published)),
    Line::from(""),
  ];

  if draft.is_empty() {
    lines.push(Line::from(Span::styled(
      "  No questions yet. Press Ctrl-N to add one.",
      dim,
    )));
  }

  for (i, q) in draft.questions.iter().enumerate() {
    lines.push(Line::from(Span::styled(
      format!("  Question {}", i + 1),
      Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )));
    lines.push(row(Field::QuestionTitle(i), "Text".into(), q.title.clone()));
    lines.push(row(
      Field::QuestionType(i),
      "Type".into(),
      format!("‹ {} ›", q.kind.label()),
    ));
    lines.push(row(Field::Required(i), "Required".into(), check(q.required)));

    match q.kind {
      QuestionType::MultipleChoice => {
        for (j, option) in q.options.iter().flatten().enumerate() {
          lines.push(row(
            Field::Option(i, j),
            format!("  Option {}", j + 1),
            option.clone(),
          ));
        }
      }
      QuestionType::YesNo => lines.push(Line::from(Span::styled(
        format!("                {}", YES_NO_OPTIONS.join(" / ")),
        dim,
      ))),
      QuestionType::Rating => lines.push(Line::from(Span::styled(
        "                1 ★ … 5 ★",
        dim,
      ))),
      _ => {}
    }
    lines.push(Line::from(""));
  }

  // Keep the focused row visible.
  let focus_line = lines
    .iter()
    .position(|l| l.spans.first().is_some_and(|s| s.content == "▶ "))
    .unwrap_or(0) as u16;
  let scroll = focus_line.saturating_sub(inner.height.saturating_sub(3));

  f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}
