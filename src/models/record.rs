//! Record data models.
//!
//! `Record` mirrors a row of the `records` table. `RecordInput` is what clients
//! POST; it is validated into a `NewRecord` before anything touches the store.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};

/// Column width of `records.name`.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum number of records returned by a list call.
pub const LIST_LIMIT: i64 = 10;

/// A stored record. Field names match the column names.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Record {
    pub id: i32,
    pub name: String,
    pub value: Option<i32>,
    pub timestamp: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

/// Request body of `POST /api/data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordInput {
    pub name: Option<String>,
    pub value: Option<i32>,
    /// RFC 3339; any offset is converted to UTC
    pub timestamp: Option<DateTime<Utc>>,
}

/// A validated insert, ready to bind.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub value: Option<i32>,
    pub timestamp: NaiveDateTime,
}

impl RecordInput {
    /// Validate the payload, substituting `now` for a missing timestamp.
    pub fn validate(self, now: DateTime<Utc>) -> DbResult<NewRecord> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| DbError::invalid_input("'name' is required"))?;

        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(DbError::invalid_input(format!(
                "'name' must be at most {MAX_NAME_LEN} characters (got {len})"
            )));
        }

        Ok(NewRecord {
            name,
            value: self.value,
            timestamp: self.timestamp.unwrap_or(now).naive_utc(),
        })
    }
}
