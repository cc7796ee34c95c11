//! The `SurveyStore` trait and an in-memory implementation.
//!
//! A store persists two collections, surveys and responses, each as a whole.
//! It knows nothing about validation or cascades; those live in
//! [`Repository`](crate::repository::Repository).

use std::{
  convert::Infallible,
  future::Future,
  sync::{Mutex, PoisonError},
};

use crate::{response::Response, survey::Survey};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable blob store holding the two collections.
///
/// Saves overwrite the whole collection. Loads return `None` when the
/// collection has never been saved, which is how the repository decides to
/// seed demo data.
pub trait SurveyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn load_surveys(
    &self,
  ) -> impl Future<Output = Result<Option<Vec<Survey>>, Self::Error>> + Send + '_;

  fn load_responses(
    &self,
  ) -> impl Future<Output = Result<Option<Vec<Response>>, Self::Error>> + Send + '_;

  fn save_surveys<'a>(
    &'a self,
    surveys: &'a [Survey],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn save_responses<'a>(
    &'a self,
    responses: &'a [Response],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Overwrite both collections together. Backends that can write them in
  /// one transaction should override this; the default saves surveys, then
  /// responses.
  fn save_all<'a>(
    &'a self,
    surveys: &'a [Survey],
    responses: &'a [Response],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    async move {
      self.save_surveys(surveys).await?;
      self.save_responses(responses).await
    }
  }
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

/// A store that lives only as long as the process. Used by tests and by the
/// CLI's `--ephemeral` mode.
#[derive(Debug, Default)]
pub struct MemoryStore {
  surveys:   Mutex<Option<Vec<Survey>>>,
  responses: Mutex<Option<Vec<Response>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// A store that already holds both collections, so nothing gets seeded.
  pub fn with_contents(surveys: Vec<Survey>, responses: Vec<Response>) -> Self {
    Self {
      surveys:   Mutex::new(Some(surveys)),
      responses: Mutex::new(Some(responses)),
    }
  }
}

impl SurveyStore for MemoryStore {
  type Error = Infallible;

  async fn load_surveys(&self) -> Result<Option<Vec<Survey>>, Infallible> {
    Ok(self.surveys.lock().unwrap_or_else(PoisonError::into_inner).clone())
  }

  async fn load_responses(&self) -> Result<Option<Vec<Response>>, Infallible> {
    Ok(
      self
        .responses
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone(),
    )
  }

  async fn save_surveys(&self, surveys: &[Survey]) -> Result<(), Infallible> {
    *self.surveys.lock().unwrap_or_else(PoisonError::into_inner) =
      Some(surveys.to_vec());
    Ok(())
  }

  async fn save_responses(&self, responses: &[Response]) -> Result<(), Infallible> {
    *self.responses.lock().unwrap_or_else(PoisonError::into_inner) =
      Some(responses.to_vec());
    Ok(())
  }
}
