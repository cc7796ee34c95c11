//! Demo data written to an empty store on first run.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
  answer::Answer,
  response::Response,
  survey::{Question, QuestionType, Survey},
};

fn january(day: u32) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(2024, 1, day, 0, 0, 0)
    .single()
    .unwrap_or_default()
}

fn question(
  id: &str,
  kind: QuestionType,
  title: &str,
  options: &[&str],
  required: bool,
) -> Question {
  Question {
    id: id.to_owned(),
    kind,
    title: title.to_owned(),
    options: (!options.is_empty())
      .then(|| options.iter().map(|o| (*o).to_owned()).collect()),
    required,
  }
}

/// Two published surveys covering every question type.
pub fn demo_surveys() -> Vec<Survey> {
  vec![
    Survey {
      id:           "demo-survey-1".into(),
      title:        "Customer Satisfaction Survey".into(),
      description:  "Help us understand how we can improve our services by \
                     sharing your feedback."
        .into(),
      questions:    vec![
        question(
          "q1",
          QuestionType::Rating,
          "How satisfied are you with our service overall?",
          &[],
          true,
        ),
        question(
          "q2",
          QuestionType::MultipleChoice,
          "Which aspect of our service do you value most?",
          &["Speed", "Quality", "Price", "Customer Support"],
          true,
        ),
        question(
          "q3",
          QuestionType::YesNo,
          "Would you recommend our service to others?",
          &[],
          true,
        ),
        question(
          "q4",
          QuestionType::Text,
          "What improvements would you like to see?",
          &[],
          false,
        ),
      ],
      created_at:   january(15),
      is_published: true,
    },
    Survey {
      id:           "demo-survey-2".into(),
      title:        "Website Usability Study".into(),
      description:  "Share your experience using our website to help us make \
                     it better."
        .into(),
      questions:    vec![
        question(
          "q5",
          QuestionType::MultipleChoice,
          "How did you first discover our website?",
          &[
            "Search Engine",
            "Social Media",
            "Word of Mouth",
            "Advertisement",
            "Other",
          ],
          true,
        ),
        question(
          "q6",
          QuestionType::Rating,
          "How easy was it to find what you were looking for?",
          &[],
          true,
        ),
        question(
          "q7",
          QuestionType::MultipleChoice,
          "What device did you primarily use?",
          &["Desktop Computer", "Laptop", "Tablet", "Mobile Phone"],
          true,
        ),
        question(
          "q8",
          QuestionType::Text,
          "Any additional comments about your experience?",
          &[],
          false,
        ),
      ],
      created_at:   january(20),
      is_published: true,
    },
  ]
}

fn response(survey_id: &str, day: u32, answers: [(&str, Answer); 4]) -> Response {
  Response {
    id:           Uuid::new_v4().to_string(),
    survey_id:    survey_id.to_owned(),
    answers:      answers
      .into_iter()
      .map(|(k, v)| (k.to_owned(), v))
      .collect(),
    submitted_at: january(day),
  }
}

/// Eight responses spread across the two demo surveys.
pub fn demo_responses() -> Vec<Response> {
  const CSAT: &str = "demo-survey-1";
  const UX: &str = "demo-survey-2";

  vec![
    response(CSAT, 16, [
      ("q1", 5u8.into()),
      ("q2", "Quality".into()),
      ("q3", "Yes".into()),
      ("q4", "More payment options would be great".into()),
    ]),
    response(CSAT, 17, [
      ("q1", 4u8.into()),
      ("q2", "Speed".into()),
      ("q3", "Yes".into()),
      ("q4", "Faster response times".into()),
    ]),
    response(CSAT, 18, [
      ("q1", 5u8.into()),
      ("q2", "Customer Support".into()),
      ("q3", "Yes".into()),
      ("q4", "".into()),
    ]),
    response(CSAT, 19, [
      ("q1", 3u8.into()),
      ("q2", "Price".into()),
      ("q3", "No".into()),
      ("q4", "Lower prices and better quality control".into()),
    ]),
    response(CSAT, 20, [
      ("q1", 4u8.into()),
      ("q2", "Quality".into()),
      ("q3", "Yes".into()),
      ("q4", "More product variety".into()),
    ]),
    response(UX, 21, [
      ("q5", "Search Engine".into()),
      ("q6", 4u8.into()),
      ("q7", "Desktop Computer".into()),
      ("q8", "Great website overall!".into()),
    ]),
    response(UX, 22, [
      ("q5", "Social Media".into()),
      ("q6", 5u8.into()),
      ("q7", "Mobile Phone".into()),
      ("q8", "Mobile version works perfectly".into()),
    ]),
    response(UX, 23, [
      ("q5", "Word of Mouth".into()),
      ("q6", 3u8.into()),
      ("q7", "Laptop".into()),
      ("q8", "Navigation could be clearer".into()),
    ]),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{draft::validate_survey, results::{Summary, compute_results}};

  #[test]
  fn demo_surveys_are_valid() {
    for survey in demo_surveys() {
      validate_survey(&survey).unwrap();
    }
  }

  #[test]
  fn demo_responses_reference_demo_surveys() {
    let surveys = demo_surveys();
    let responses = demo_responses();
    assert_eq!(responses.len(), 8);
    for r in &responses {
      let survey = surveys.iter().find(|s| s.id == r.survey_id).unwrap();
      assert!(r.answers.keys().all(|k| survey.question(k).is_some()));
    }
  }

  #[test]
  fn demo_satisfaction_results() {
    let surveys = demo_surveys();
    let results = compute_results(&surveys[0], &demo_responses());

    assert_eq!(results.total_responses, 5);
    let Some(Summary::Rating { average, .. }) =
      &results.question_result("q1").unwrap().summary
    else {
      panic!("expected rating summary");
    };
    assert_eq!(*average, 4.2);

    // The empty q4 answer is not counted.
    assert_eq!(results.question_result("q4").unwrap().responses.len(), 4);
  }
}
