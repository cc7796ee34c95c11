//! Encoding and decoding helpers between Rust domain types and the text
//! stored in the `blobs` table.
//!
//! Collections are stored as compact JSON arrays. Timestamps inside records
//! are RFC 3339 strings (chrono's serde format), and the row's own
//! `updated_at` column uses the same representation.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

// ─── Collection keys ─────────────────────────────────────────────────────────

pub const SURVEYS_KEY: &str = "surveys";
pub const RESPONSES_KEY: &str = "survey-responses";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Collections ─────────────────────────────────────────────────────────────

pub fn encode_collection<T: Serialize>(records: &[T]) -> Result<String> {
  Ok(serde_json::to_string(records)?)
}

pub fn decode_collection<T: DeserializeOwned>(
  key: &'static str,
  raw: &str,
) -> Result<Vec<T>> {
  serde_json::from_str(raw).map_err(|source| Error::Corrupt { key, source })
}
