//! Integration tests for `SqliteStore` against in-memory and on-disk
//! databases.

use chrono::{TimeZone, Utc};
use tally_core::{
  Error as CoreError,
  answer::Answer,
  repository::Repository,
  response::{Answers, Response},
  seed,
  store::SurveyStore,
  survey::{Question, QuestionType, Survey},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn survey(id: &str) -> Survey {
  Survey {
    id:           id.into(),
    title:        "Office move".into(),
    description:  "Where should we go next?".into(),
    questions:    vec![Question {
      id:       "city".into(),
      kind:     QuestionType::MultipleChoice,
      title:    "Preferred city".into(),
      options:  Some(vec!["Leeds".into(), "York".into()]),
      required: true,
    }],
    created_at:   Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
    is_published: false,
  }
}

fn response(survey_id: &str, city: &str) -> Response {
  Response {
    id:           uuid::Uuid::new_v4().to_string(),
    survey_id:    survey_id.into(),
    answers:      Answers::from([("city".to_owned(), Answer::from(city))]),
    submitted_at: Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap(),
  }
}

// ─── Raw collections ─────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_store_has_no_collections() {
  let s = store().await;
  assert!(s.load_surveys().await.unwrap().is_none());
  assert!(s.load_responses().await.unwrap().is_none());
}

#[tokio::test]
async fn surveys_round_trip_with_dates() {
  let s = store().await;
  let surveys = vec![survey("a"), survey("b")];

  s.save_surveys(&surveys).await.unwrap();

  let loaded = s.load_surveys().await.unwrap().unwrap();
  assert_eq!(loaded, surveys);
  assert_eq!(loaded[0].created_at, surveys[0].created_at);
}

#[tokio::test]
async fn responses_round_trip() {
  let s = store().await;
  let responses = vec![response("a", "Leeds"), response("a", "York")];

  s.save_responses(&responses).await.unwrap();

  assert_eq!(s.load_responses().await.unwrap().unwrap(), responses);
}

#[tokio::test]
async fn save_overwrites_whole_collection() {
  let s = store().await;
  s.save_surveys(&[survey("a"), survey("b")]).await.unwrap();
  s.save_surveys(&[survey("c")]).await.unwrap();

  let loaded = s.load_surveys().await.unwrap().unwrap();
  assert_eq!(loaded.len(), 1);
  assert_eq!(loaded[0].id, "c");
}

#[tokio::test]
async fn saving_empty_collection_is_not_absence() {
  let s = store().await;
  s.save_responses(&[]).await.unwrap();
  assert_eq!(s.load_responses().await.unwrap(), Some(Vec::new()));
}

#[tokio::test]
async fn corrupt_blob_is_reported() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO blobs (key, value, updated_at) VALUES ('surveys', 'not json', '')",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.load_surveys().await.unwrap_err();
  assert!(matches!(err, Error::Corrupt { key: "surveys", .. }));
}

#[tokio::test]
async fn null_answers_in_a_stored_blob_are_dropped() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute(
        r#"INSERT INTO blobs (key, value, updated_at) VALUES ('survey-responses',
           '[{"id":"r1","surveyId":"s1","submittedAt":"2024-01-16T00:00:00Z",
              "responses":{"q1":5,"q4":null}}]', '')"#,
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let loaded = s.load_responses().await.unwrap().unwrap();
  assert_eq!(loaded.len(), 1);
  assert_eq!(loaded[0].answer("q1"), Some(&Answer::Number(5.0)));
  assert!(loaded[0].answer("q4").is_none());
}

// ─── Combined writes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn save_all_writes_both_collections() {
  let s = store().await;
  let responses = vec![response("a", "York")];

  s.save_all(&[survey("a")], &responses).await.unwrap();

  assert_eq!(s.load_surveys().await.unwrap().unwrap(), vec![survey("a")]);
  assert_eq!(s.load_responses().await.unwrap().unwrap(), responses);
}

#[tokio::test]
async fn save_all_rolls_back_when_one_write_fails() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute_batch(
        "CREATE TRIGGER refuse_responses BEFORE INSERT ON blobs
         WHEN NEW.key = 'survey-responses'
         BEGIN SELECT RAISE(ABORT, 'refused'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let result = s.save_all(&[survey("a")], &[response("a", "Leeds")]).await;

  assert!(result.is_err());
  assert!(s.load_surveys().await.unwrap().is_none());
  assert!(s.load_responses().await.unwrap().is_none());
}

// ─── Through the repository ──────────────────────────────────────────────────

#[tokio::test]
async fn repository_seeds_an_empty_database() {
  let repo = Repository::open(store().await).await.unwrap();

  assert_eq!(repo.surveys(), seed::demo_surveys().as_slice());
  assert_eq!(repo.stats().total_responses, 8);
  assert_eq!(repo.store().load_responses().await.unwrap().unwrap().len(), 8);
}

#[tokio::test]
async fn deletions_survive_reopening_the_file() {
  let path = std::env::temp_dir().join(format!("tally-{}.db", uuid::Uuid::new_v4()));

  {
    let mut repo = Repository::open(SqliteStore::open(&path).await.unwrap())
      .await
      .unwrap();
    repo.delete_survey("demo-survey-2").await.unwrap();
  }

  let repo = Repository::open(SqliteStore::open(&path).await.unwrap())
    .await
    .unwrap();
  assert_eq!(repo.surveys().len(), 1);
  assert_eq!(repo.stats().total_responses, 5);
  assert!(matches!(
    repo.results("demo-survey-2"),
    Err(CoreError::SurveyNotFound(_))
  ));

  drop(repo);
  let _ = std::fs::remove_file(&path);
}
