//! Primitive aliases shared by every layer.

/// Primary key of every table (`BIGSERIAL`).
pub type DbId = i64;

/// Stored as `TIMESTAMPTZ` and always handled in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
