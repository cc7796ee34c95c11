//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per collection. `value` is always overwritten whole.
CREATE TABLE IF NOT EXISTS blobs (
    key         TEXT PRIMARY KEY,  -- 'surveys' | 'survey-responses'
    value       TEXT NOT NULL,     -- JSON array of records
    updated_at  TEXT NOT NULL      -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";
