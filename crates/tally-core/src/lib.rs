//! Core types and operations for the Tally survey tool.
//!
//! This crate is free of database and terminal dependencies. It owns the data
//! model, the results aggregator, the authoring and submission rules, and the
//! [`Repository`](repository::Repository) that funnels every mutation through
//! a [`SurveyStore`](store::SurveyStore) backend.

pub mod answer;
pub mod draft;
pub mod error;
pub mod repository;
pub mod response;
pub mod results;
pub mod seed;
pub mod store;
pub mod submission;
pub mod survey;

pub use error::{Error, Result};
