//! Error types for `tally-core`.

use thiserror::Error;

use crate::{draft::DraftError, submission::SubmissionError};

#[derive(Debug, Error)]
pub enum Error {
  #[error("survey not found: {0}")]
  SurveyNotFound(String),

  #[error("survey {0} is not published")]
  SurveyUnpublished(String),

  #[error("invalid survey: {0}")]
  InvalidSurvey(#[from] DraftError),

  #[error("invalid response: {0}")]
  InvalidResponse(#[from] SubmissionError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error from any [`SurveyStore`](crate::store::SurveyStore).
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
