//! [`SqliteStore`], the SQLite implementation of [`SurveyStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use tally_core::{response::Response, store::SurveyStore, survey::Survey};

use crate::{
  Result,
  encode::{
    RESPONSES_KEY, SURVEYS_KEY, decode_collection, encode_collection, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally store backed by a single SQLite file.
///
/// Clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read the raw JSON for `key`, or `None` if it was never written.
  async fn get_blob(&self, key: &'static str) -> Result<Option<String>> {
    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM blobs WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  /// Replace the whole value stored under `key`.
  async fn put_blob(&self, key: &'static str, value: String) -> Result<()> {
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
          rusqlite::params![key, value, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Replace several values in one transaction.
  async fn put_blobs(&self, entries: Vec<(&'static str, String)>) -> Result<()> {
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for (key, value) in &entries {
          tx.execute(
            "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
               SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, at_str],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn load<T>(&self, key: &'static str) -> Result<Option<Vec<T>>>
  where
    T: serde::de::DeserializeOwned,
  {
    self
      .get_blob(key)
      .await?
      .map(|raw| decode_collection(key, &raw))
      .transpose()
  }
}

// ─── SurveyStore impl ────────────────────────────────────────────────────────

impl SurveyStore for SqliteStore {
  type Error = crate::Error;

  async fn load_surveys(&self) -> Result<Option<Vec<Survey>>> {
    self.load(SURVEYS_KEY).await
  }

  async fn load_responses(&self) -> Result<Option<Vec<Response>>> {
    self.load(RESPONSES_KEY).await
  }

  async fn save_surveys(&self, surveys: &[Survey]) -> Result<()> {
    let value = encode_collection(surveys)?;
    self.put_blob(SURVEYS_KEY, value).await
  }

  async fn save_responses(&self, responses: &[Response]) -> Result<()> {
    let value = encode_collection(responses)?;
    self.put_blob(RESPONSES_KEY, value).await
  }

  async fn save_all(&self, surveys: &[Survey], responses: &[Response]) -> Result<()> {
    let entries = vec![
      (SURVEYS_KEY, encode_collection(surveys)?),
      (RESPONSES_KEY, encode_collection(responses)?),
    ];
    self.put_blobs(entries).await
  }
}
