//! Results view. Drawn from a freshly computed [`SurveyResults`] every frame.
//!
//! Each question gets its own bordered card; `scroll` counts whole cards.

use ratatui::{
  Frame,
  layout::{Direction, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};
use tally_core::{
  results::{QuestionResult, Summary, SurveyResults, percentage},
  survey::RATING_MAX,
};

pub fn draw(f: &mut Frame, area: Rect, results: &SurveyResults, scroll: u16) {
  let survey = &results.survey;
  let block = Block::default()
    .title(format!(" Results: {} ", survey.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let dim = Style::default().fg(Color::DarkGray);
  let mut header = Vec::new();
  if !survey.description.is_empty() {
    header.push(Line::from(survey.description.clone()));
  }
  let status = if survey.is_published { "Published" } else { "Draft" };
  header.push(Line::from(vec![
    Span::styled(
      format!("{} responses", results.total_responses),
      Style::default().add_modifier(Modifier::BOLD),
    ),
    Span::styled(
      format!("  ·  {} questions  ·  {status}", survey.questions.len()),
      dim,
    ),
  ]));
  header.push(Line::from(""));

  let header_height = (header.len() as u16).min(inner.height);
  f.render_widget(Paragraph::new(header), Rect { height: header_height, ..inner });
  let mut rest = Rect {
    y: inner.y + header_height,
    height: inner.height - header_height,
    ..inner
  };

  if results.total_responses == 0 {
    f.render_widget(
      Paragraph::new("No responses yet. Share the survey to start collecting answers.")
        .style(dim),
      rest,
    );
    return;
  }

  let skip = (scroll as usize).min(results.question_results.len().saturating_sub(1));
  for (i, qr) in results.question_results.iter().enumerate().skip(skip) {
    if rest.height < 3 {
      break;
    }
    let height = card_height(qr).min(rest.height);
    draw_card(f, Rect { height, ..rest }, i, qr, results.total_responses);
    rest.y += height;
    rest.height -= height;
  }
}

// ─── Question cards ───────────────────────────────────────────────────────────

fn card_height(qr: &QuestionResult) -> u16 {
  let body = match &qr.summary {
    Some(Summary::Choice { .. }) => qr.choice_breakdown().len().max(1),
    Some(Summary::Rating { .. }) => 1 + qr.rating_breakdown().len().max(1),
    Some(Summary::Text { text_responses }) => 1 + text_responses.len(),
    None => 1,
  };
  // Borders.
  body as u16 + 2
}

fn draw_card(f: &mut Frame, area: Rect, index: usize, qr: &QuestionResult, total: usize) {
  let dim = Style::default().fg(Color::DarkGray);
  let block = Block::default()
    .title(Span::styled(
      format!(" {}. {} ", index + 1, qr.question.title),
      Style::default().add_modifier(Modifier::BOLD),
    ))
    .borders(Borders::ALL)
    .border_style(dim);
  let inner = block.inner(area);
  f.render_widget(block, area);

  match &qr.summary {
    Some(Summary::Choice { .. }) => {
      let bars = choice_bars(&qr.choice_breakdown(), total);
      if bars.is_empty() {
        f.render_widget(Paragraph::new("No options").style(dim), inner);
      } else {
        f.render_widget(histogram(&bars, Color::Blue), inner);
      }
    }
    Some(Summary::Rating { average, .. }) => {
      let average_line = Line::from(vec![
        Span::raw("Average "),
        Span::styled(
          format!("★ {average:.1}"),
          Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" / {RATING_MAX}.0"), dim),
      ]);
      f.render_widget(Paragraph::new(average_line), Rect { height: 1, ..inner });
      let below = Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1),
        ..inner
      };
      let bars = rating_bars(&qr.rating_breakdown());
      if bars.is_empty() {
        f.render_widget(Paragraph::new("No ratings yet").style(dim), below);
      } else {
        f.render_widget(histogram(&bars, Color::Yellow), below);
      }
    }
    Some(Summary::Text { text_responses }) => {
      let mut lines = vec![Line::from(Span::styled(
        format!("{} text responses", text_responses.len()),
        dim,
      ))];
      lines.extend(text_responses.iter().map(|text| {
        Line::from(vec![
          Span::styled("│ ", Style::default().fg(Color::Blue)),
          Span::raw(text.clone()),
        ])
      }));
      f.render_widget(Paragraph::new(lines), inner);
    }
    None => f.render_widget(
      Paragraph::new(format!(
        "{} answers; no summary for question type \"{}\"",
        qr.responses.len(),
        qr.question.kind.as_str()
      ))
      .style(dim),
      inner,
    ),
  }
}

// ─── Bars ─────────────────────────────────────────────────────────────────────

/// One horizontal bar per row, one cell thick.
fn histogram<'a>(bars: &'a [Bar<'a>], color: Color) -> BarChart<'a> {
  BarChart::default()
    .direction(Direction::Horizontal)
    .bar_width(1)
    .bar_gap(0)
    .bar_style(Style::default().fg(color))
    .value_style(Style::default().fg(Color::Black).bg(color))
    .data(BarGroup::default().bars(bars))
}

/// Choice bars carry the count and its share of all responses.
fn choice_bars(rows: &[(String, usize)], total: usize) -> Vec<Bar<'static>> {
  rows
    .iter()
    .map(|(option, count)| {
      Bar::default()
        .label(Line::from(option.clone()))
        .value(*count as u64)
        .text_value(format!("{count} ({:.1}%)", percentage(*count, total)))
    })
    .collect()
}

fn rating_bars(rows: &[(String, usize)]) -> Vec<Bar<'static>> {
  rows
    .iter()
    .map(|(rating, count)| {
      let unit = if rating == "1" { "Star" } else { "Stars" };
      Bar::default()
        .label(Line::from(format!("{rating} {unit}")))
        .value(*count as u64)
        .text_value(count.to_string())
    })
    .collect()
}
