//! [`Repository`], the single owner of survey and response state.
//!
//! The repository keeps both collections in memory and writes the affected
//! collection back to its [`SurveyStore`] after every mutation. A mutation is
//! only applied in memory once the save has succeeded, so a failed write
//! leaves the previous state in place.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  draft::validate_survey,
  response::{Answers, Response},
  results::{SurveyResults, compute_results},
  seed,
  store::SurveyStore,
  submission::validate_submission,
  survey::{NewSurvey, Survey, SurveyPatch},
};

/// Headline counts for the listing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
  pub total_surveys:     usize,
  pub published_surveys: usize,
  pub total_responses:   usize,
}

pub struct Repository<S> {
  store:     S,
  surveys:   Vec<Survey>,
  responses: Vec<Response>,
}

impl<S: SurveyStore> Repository<S> {
  /// Load both collections from `store`, seeding demo data for any
  /// collection that has never been saved.
  pub async fn open(store: S) -> Result<Self> {
    let surveys = match store.load_surveys().await.map_err(Error::store)? {
      Some(surveys) => surveys,
      None => {
        let seeded = seed::demo_surveys();
        store.save_surveys(&seeded).await.map_err(Error::store)?;
        info!(count = seeded.len(), "seeded demo surveys");
        seeded
      }
    };

    let responses = match store.load_responses().await.map_err(Error::store)? {
      Some(responses) => responses,
      None => {
        let seeded = seed::demo_responses();
        store.save_responses(&seeded).await.map_err(Error::store)?;
        info!(count = seeded.len(), "seeded demo responses");
        seeded
      }
    };

    debug!(
      surveys = surveys.len(),
      responses = responses.len(),
      "repository loaded"
    );
    Ok(Self { store, surveys, responses })
  }

  pub fn store(&self) -> &S { &self.store }

  // ── Queries ───────────────────────────────────────────────────────────────

  /// Every survey, in creation order.
  pub fn surveys(&self) -> &[Survey] { &self.surveys }

  pub fn published_surveys(&self) -> impl Iterator<Item = &Survey> {
    self.surveys.iter().filter(|s| s.is_published)
  }

  pub fn survey(&self, id: &str) -> Option<&Survey> {
    self.surveys.iter().find(|s| s.id == id)
  }

  pub fn responses_for<'a>(
    &'a self,
    survey_id: &'a str,
  ) -> impl Iterator<Item = &'a Response> + 'a {
    self.responses.iter().filter(move |r| r.survey_id == survey_id)
  }

  pub fn response_count(&self, survey_id: &str) -> usize {
    self.responses_for(survey_id).count()
  }

  pub fn stats(&self) -> Stats {
    Stats {
      total_surveys:     self.surveys.len(),
      published_surveys: self.published_surveys().count(),
      total_responses:   self.responses.len(),
    }
  }

  /// Aggregate the responses to a survey. Recomputed on every call.
  pub fn results(&self, survey_id: &str) -> Result<SurveyResults> {
    let survey = self
      .survey(survey_id)
      .ok_or_else(|| Error::SurveyNotFound(survey_id.to_owned()))?;
    Ok(compute_results(survey, &self.responses))
  }

  // ── Survey mutations ──────────────────────────────────────────────────────

  pub async fn create_survey(&mut self, input: NewSurvey) -> Result<Survey> {
    let survey = Survey {
      id:           Uuid::new_v4().to_string(),
      title:        input.title,
      description:  input.description,
      questions:    input.questions,
      created_at:   Utc::now(),
      is_published: input.is_published,
    };
    validate_survey(&survey)?;

    let mut next = self.surveys.clone();
    next.push(survey.clone());
    self.commit_surveys(next).await?;

    info!(survey_id = %survey.id, title = %survey.title, "survey created");
    Ok(survey)
  }

  pub async fn update_survey(&mut self, id: &str, patch: SurveyPatch) -> Result<Survey> {
    let index = self.index_of(id)?;
    let touches_questions = patch.touches_questions();

    let mut updated = self.surveys[index].clone();
    patch.apply(&mut updated);
    validate_survey(&updated)?;

    if touches_questions {
      let orphaned = self
        .responses_for(id)
        .flat_map(|r| r.answers.keys())
        .filter(|k| updated.question(k).is_none())
        .count();
      if orphaned > 0 {
        warn!(
          survey_id = %id,
          orphaned,
          "edit leaves stored answers without a question; they will not be aggregated"
        );
      }
    }

    let mut next = self.surveys.clone();
    next[index] = updated.clone();
    self.commit_surveys(next).await?;

    info!(survey_id = %id, "survey updated");
    Ok(updated)
  }

  pub async fn set_published(&mut self, id: &str, is_published: bool) -> Result<Survey> {
    self.update_survey(id, SurveyPatch::published(is_published)).await
  }

  /// Flip the publish flag and return the new value.
  pub async fn toggle_published(&mut self, id: &str) -> Result<bool> {
    let current = self.surveys[self.index_of(id)?].is_published;
    let survey = self.set_published(id, !current).await?;
    Ok(survey.is_published)
  }

  /// Delete a survey and every response that references it. Returns the
  /// number of responses removed.
  pub async fn delete_survey(&mut self, id: &str) -> Result<usize> {
    let index = self.index_of(id)?;

    let mut surveys = self.surveys.clone();
    surveys.remove(index);
    let responses: Vec<Response> = self
      .responses
      .iter()
      .filter(|r| r.survey_id != id)
      .cloned()
      .collect();
    let removed = self.responses.len() - responses.len();

    self
      .store
      .save_all(&surveys, &responses)
      .await
      .map_err(Error::store)?;
    self.surveys = surveys;
    self.responses = responses;

    info!(survey_id = %id, responses_removed = removed, "survey deleted");
    Ok(removed)
  }

  // ── Responses ─────────────────────────────────────────────────────────────

  /// Validate and store one response. On any error nothing is written.
  pub async fn submit_response(
    &mut self,
    survey_id: &str,
    answers: Answers,
  ) -> Result<Response> {
    let survey = self
      .survey(survey_id)
      .ok_or_else(|| Error::SurveyNotFound(survey_id.to_owned()))?;
    if !survey.is_published {
      return Err(Error::SurveyUnpublished(survey_id.to_owned()));
    }

    let answers = validate_submission(survey, answers).inspect_err(|e| {
      warn!(survey_id = %survey_id, error = %e, "response rejected");
    })?;

    let response = Response {
      id: Uuid::new_v4().to_string(),
      survey_id: survey_id.to_owned(),
      answers,
      submitted_at: Utc::now(),
    };

    let mut next = self.responses.clone();
    next.push(response.clone());
    self.commit_responses(next).await?;

    info!(survey_id = %survey_id, response_id = %response.id, "response submitted");
    Ok(response)
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  fn index_of(&self, id: &str) -> Result<usize> {
    self
      .surveys
      .iter()
      .position(|s| s.id == id)
      .ok_or_else(|| Error::SurveyNotFound(id.to_owned()))
  }

  async fn commit_surveys(&mut self, next: Vec<Survey>) -> Result<()> {
    self.store.save_surveys(&next).await.map_err(Error::store)?;
    self.surveys = next;
    Ok(())
  }

  async fn commit_responses(&mut self, next: Vec<Response>) -> Result<()> {
    self.store.save_responses(&next).await.map_err(Error::store)?;
    self.responses = next;
    Ok(())
  }
}
