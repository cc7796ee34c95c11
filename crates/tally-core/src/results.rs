//! Results aggregation.
//!
//! [`compute_results`] turns a survey and the full response list into
//! per-question summaries. Results are never stored; callers recompute them
//! on every view.

use std::{cmp::Ordering, collections::BTreeMap};

use crate::{
  answer::{Answer, format_number},
  response::Response,
  survey::{Question, QuestionType, Survey},
};

// ─── Types ───────────────────────────────────────────────────────────────────

/// The type-specific digest of one question's answers.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
  /// Multiple-choice and yes/no: answer string → count.
  Choice { option_counts: BTreeMap<String, usize> },
  /// Rating: mean of the numeric answers and a value → count histogram.
  Rating {
    average:      f64,
    distribution: BTreeMap<String, usize>,
  },
  /// Free text: every non-empty answer in submission order.
  Text { text_responses: Vec<String> },
}

/// One question's slice of the results.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
  pub question:  Question,
  /// Non-empty answers in response order, before any coercion.
  pub responses: Vec<Answer>,
  /// Absent for question types the aggregator does not understand.
  pub summary:   Option<Summary>,
}

/// The derived view of every response to one survey.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResults {
  pub survey:           Survey,
  pub total_responses:  usize,
  /// One entry per question, in survey order.
  pub question_results: Vec<QuestionResult>,
}

impl SurveyResults {
  pub fn question_result(&self, question_id: &str) -> Option<&QuestionResult> {
    self
      .question_results
      .iter()
      .find(|r| r.question.id == question_id)
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Aggregate `all_responses` for `survey`.
///
/// Responses belonging to other surveys are ignored, as are answers keyed by
/// question ids the survey no longer contains. Never fails: a survey with no
/// responses yields zero counts and empty summaries.
pub fn compute_results(survey: &Survey, all_responses: &[Response]) -> SurveyResults {
  let responses: Vec<&Response> = all_responses
    .iter()
    .filter(|r| r.survey_id == survey.id)
    .collect();

  let question_results = survey
    .questions
    .iter()
    .map(|q| summarise_question(q, &responses))
    .collect();

  SurveyResults {
    survey: survey.clone(),
    total_responses: responses.len(),
    question_results,
  }
}

fn summarise_question(question: &Question, responses: &[&Response]) -> QuestionResult {
  let answers: Vec<Answer> = responses
    .iter()
    .filter_map(|r| r.answer(&question.id))
    .filter(|a| !a.is_empty())
    .cloned()
    .collect();

  let summary = match question.kind {
    QuestionType::MultipleChoice | QuestionType::YesNo => Some(Summary::Choice {
      option_counts: count_by_key(answers.iter().map(Answer::to_string)),
    }),
    QuestionType::Rating => Some(summarise_rating(&answers)),
    QuestionType::Text => Some(Summary::Text {
      text_responses: answers.iter().map(Answer::to_string).collect(),
    }),
    QuestionType::Unknown(_) => None,
  };

  QuestionResult { question: question.clone(), responses: answers, summary }
}

fn summarise_rating(answers: &[Answer]) -> Summary {
  // Uncoercible answers stay in `responses` but are left out of the maths.
  let numbers: Vec<f64> = answers.iter().filter_map(Answer::as_number).collect();

  let average = if numbers.is_empty() {
    0.0
  } else {
    numbers.iter().sum::<f64>() / numbers.len() as f64
  };

  Summary::Rating {
    average,
    distribution: count_by_key(numbers.iter().copied().map(format_number)),
  }
}

fn count_by_key(keys: impl Iterator<Item = String>) -> BTreeMap<String, usize> {
  let mut counts = BTreeMap::new();
  for key in keys {
    *counts.entry(key).or_insert(0) += 1;
  }
  counts
}

// ─── Presentation helpers ────────────────────────────────────────────────────

impl QuestionResult {
  /// Choice tallies with the question's own options first (zero counts
  /// included, in authored order), followed by any answers outside the option
  /// list.
  pub fn choice_breakdown(&self) -> Vec<(String, usize)> {
    let Some(Summary::Choice { option_counts }) = &self.summary else {
      return Vec::new();
    };

    let choices = self.question.choices();
    let mut rows: Vec<(String, usize)> = choices
      .iter()
      .map(|c| ((*c).to_owned(), option_counts.get(*c).copied().unwrap_or(0)))
      .collect();
    rows.extend(
      option_counts
        .iter()
        .filter(|(k, _)| !choices.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), *v)),
    );
    rows
  }

  /// Rating histogram sorted by numeric value, ascending.
  pub fn rating_breakdown(&self) -> Vec<(String, usize)> {
    let Some(Summary::Rating { distribution, .. }) = &self.summary else {
      return Vec::new();
    };

    let mut rows: Vec<(String, usize)> =
      distribution.iter().map(|(k, v)| (k.clone(), *v)).collect();
    rows.sort_by(|a, b| {
      let (x, y) = (a.0.parse::<f64>().ok(), b.0.parse::<f64>().ok());
      x.partial_cmp(&y).unwrap_or(Ordering::Equal)
    });
    rows
  }
}

/// `count` as a percentage of `total`; zero when there is nothing to divide.
pub fn percentage(count: usize, total: usize) -> f64 {
  if total == 0 {
    0.0
  } else {
    count as f64 / total as f64 * 100.0
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::response::Answers;

  fn question(id: &str, kind: QuestionType, options: Option<&[&str]>) -> Question {
    Question {
      id: id.into(),
      kind,
      title: format!("Question {id}"),
      options: options.map(|o| o.iter().map(|s| (*s).to_owned()).collect()),
      required: false,
    }
  }

  fn survey(questions: Vec<Question>) -> Survey {
    Survey {
      id: "s1".into(),
      title: "Test survey".into(),
      description: String::new(),
      questions,
      created_at: Utc::now(),
      is_published: true,
    }
  }

  fn response(survey_id: &str, answers: &[(&str, Answer)]) -> Response {
    Response {
      id:           uuid::Uuid::new_v4().to_string(),
      survey_id:    survey_id.into(),
      answers:      answers
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect::<Answers>(),
      submitted_at: Utc::now(),
    }
  }

  fn summary<'a>(results: &'a SurveyResults, id: &str) -> &'a Summary {
    results
      .question_result(id)
      .and_then(|r| r.summary.as_ref())
      .expect("summary present")
  }

  #[test]
  fn no_responses_yields_empty_summaries() {
    let s = survey(vec![
      question("mc", QuestionType::MultipleChoice, Some(&["A", "B"])),
      question("yn", QuestionType::YesNo, None),
      question("r", QuestionType::Rating, None),
      question("t", QuestionType::Text, None),
    ]);

    let results = compute_results(&s, &[]);

    assert_eq!(results.total_responses, 0);
    assert_eq!(results.question_results.len(), 4);
    assert_eq!(summary(&results, "mc"), &Summary::Choice {
      option_counts: BTreeMap::new(),
    });
    assert_eq!(summary(&results, "yn"), &Summary::Choice {
      option_counts: BTreeMap::new(),
    });
    assert_eq!(summary(&results, "r"), &Summary::Rating {
      average:      0.0,
      distribution: BTreeMap::new(),
    });
    assert_eq!(summary(&results, "t"), &Summary::Text {
      text_responses: Vec::new(),
    });
  }

  #[test]
  fn rating_average_and_distribution() {
    let s = survey(vec![question("r", QuestionType::Rating, None)]);
    let responses: Vec<Response> = [5u8, 4, 5, 3]
      .into_iter()
      .map(|n| response("s1", &[("r", Answer::from(n))]))
      .collect();

    let results = compute_results(&s, &responses);

    let Summary::Rating { average, distribution } = summary(&results, "r") else {
      panic!("expected rating summary");
    };
    assert_eq!(*average, 4.25);
    assert_eq!(distribution.len(), 3);
    assert_eq!(distribution["5"], 2);
    assert_eq!(distribution["4"], 1);
    assert_eq!(distribution["3"], 1);
  }

  #[test]
  fn uncoercible_ratings_are_kept_raw_but_not_averaged() {
    let s = survey(vec![question("r", QuestionType::Rating, None)]);
    let responses = vec![
      response("s1", &[("r", Answer::from(4u8))]),
      response("s1", &[("r", Answer::from("excellent"))]),
      response("s1", &[("r", Answer::from("2"))]),
    ];

    let results = compute_results(&s, &responses);
    let qr = results.question_result("r").unwrap();

    assert_eq!(qr.responses.len(), 3);
    let Some(Summary::Rating { average, distribution }) = &qr.summary else {
      panic!("expected rating summary");
    };
    assert_eq!(*average, 3.0);
    assert_eq!(distribution.values().sum::<usize>(), 2);
  }

  #[test]
  fn choice_tallies_are_lenient() {
    let s = survey(vec![question(
      "mc",
      QuestionType::MultipleChoice,
      Some(&["Yes", "No"]),
    )]);
    let responses = vec![
      response("s1", &[("mc", Answer::from("Yes"))]),
      response("s1", &[("mc", Answer::from("Yes"))]),
      response("s1", &[("mc", Answer::from("No"))]),
      response("s1", &[("mc", Answer::from("yes"))]),
    ];

    let results = compute_results(&s, &responses);

    let Summary::Choice { option_counts } = summary(&results, "mc") else {
      panic!("expected choice summary");
    };
    assert_eq!(option_counts["Yes"], 2);
    assert_eq!(option_counts["No"], 1);
    assert_eq!(option_counts["yes"], 1);
  }

  #[test]
  fn filters_other_surveys_and_empty_answers() {
    let s = survey(vec![question("t", QuestionType::Text, None)]);
    let responses = vec![
      response("s1", &[("t", Answer::from("first"))]),
      response("s1", &[("t", Answer::from(""))]),
      response("s1", &[]),
      response("other", &[("t", Answer::from("elsewhere"))]),
      response("s1", &[("t", Answer::from("second"))]),
    ];

    let results = compute_results(&s, &responses);

    assert_eq!(results.total_responses, 4);
    assert_eq!(summary(&results, "t"), &Summary::Text {
      text_responses: vec!["first".into(), "second".into()],
    });
  }

  #[test]
  fn orphaned_answers_are_ignored() {
    let s = survey(vec![question("kept", QuestionType::Text, None)]);
    let responses = vec![response("s1", &[
      ("kept", Answer::from("hello")),
      ("deleted", Answer::from("lost")),
    ])];

    let results = compute_results(&s, &responses);

    assert_eq!(results.question_results.len(), 1);
    assert!(results.question_result("deleted").is_none());
  }

  #[test]
  fn unknown_question_type_has_no_summary() {
    let s = survey(vec![question(
      "x",
      QuestionType::Unknown("ranking".into()),
      None,
    )]);
    let responses = vec![response("s1", &[("x", Answer::from("a"))])];

    let results = compute_results(&s, &responses);
    let qr = results.question_result("x").unwrap();

    assert!(qr.summary.is_none());
    assert_eq!(qr.responses, vec![Answer::from("a")]);
  }

  #[test]
  fn aggregation_is_idempotent() {
    let s = survey(vec![
      question("r", QuestionType::Rating, None),
      question("t", QuestionType::Text, None),
    ]);
    let responses = vec![
      response("s1", &[("r", Answer::from(2u8)), ("t", Answer::from("ok"))]),
      response("s1", &[("r", Answer::from(5u8))]),
    ];

    assert_eq!(compute_results(&s, &responses), compute_results(&s, &responses));
  }

  #[test]
  fn choice_breakdown_lists_options_then_strays() {
    let s = survey(vec![question(
      "mc",
      QuestionType::MultipleChoice,
      Some(&["Speed", "Quality", "Price"]),
    )]);
    let responses = vec![
      response("s1", &[("mc", Answer::from("Quality"))]),
      response("s1", &[("mc", Answer::from("Other"))]),
    ];

    let results = compute_results(&s, &responses);
    let rows = results.question_result("mc").unwrap().choice_breakdown();

    assert_eq!(rows, vec![
      ("Speed".to_owned(), 0),
      ("Quality".to_owned(), 1),
      ("Price".to_owned(), 0),
      ("Other".to_owned(), 1),
    ]);
  }

  #[test]
  fn rating_breakdown_sorts_numerically() {
    let s = survey(vec![question("r", QuestionType::Rating, None)]);
    let responses: Vec<Response> = [5u8, 1, 3]
      .into_iter()
      .map(|n| response("s1", &[("r", Answer::from(n))]))
      .collect();

    let results = compute_results(&s, &responses);
    let keys: Vec<String> = results
      .question_result("r")
      .unwrap()
      .rating_breakdown()
      .into_iter()
      .map(|(k, _)| k)
      .collect();

    assert_eq!(keys, vec!["1", "3", "5"]);
  }

  #[test]
  fn percentage_handles_zero_total() {
    assert_eq!(percentage(3, 0), 0.0);
    assert_eq!(percentage(1, 4), 25.0);
  }
}
