//! Queries against the `records` table.
//!
//! Every operation is a single statement; connections are checked out per
//! query and returned to the pool when the future completes.

use crate::db::pool::DbPool;
use crate::error::DbResult;
use crate::models::{Aggregates, NewRecord, Record, Statistics};
use tracing::debug;

mod queries {
    pub const LIST_RECENT: &str = r#"
        SELECT id, name, value, timestamp, created_at
        FROM records
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#;

    pub const INSERT: &str = r#"
        INSERT INTO records (name, value, timestamp)
        VALUES ($1, $2, $3)
        RETURNING id, name, value, timestamp, created_at
        "#;

    pub const COUNT: &str = "SELECT COUNT(*) FROM records";
    pub const AVERAGE: &str = "SELECT AVG(value)::float8 FROM records";
    pub const MAXIMUM: &str = "SELECT MAX(value) FROM records";
    pub const MINIMUM: &str = "SELECT MIN(value) FROM records";
}

pub struct RecordStore;

impl RecordStore {
    /// Newest records first, at most `limit`.
    pub async fn list_recent(pool: &DbPool, limit: i64) -> DbResult<Vec<Record>> {
        let records = sqlx::query_as::<_, Record>(queries::LIST_RECENT)
            .bind(limit)
            .fetch_all(pool.pg())
            .await?;
        debug!(count = records.len(), "Listed records");
        Ok(records)
    }

    /// Insert one record and return the stored row.
    pub async fn insert(pool: &DbPool, record: &NewRecord) -> DbResult<Record> {
        let stored = sqlx::query_as::<_, Record>(queries::INSERT)
            .bind(&record.name)
            .bind(record.value)
            .bind(record.timestamp)
            .fetch_one(pool.pg())
            .await?;
        debug!(id = stored.id, "Inserted record");
        Ok(stored)
    }

    /// Run the four aggregate queries concurrently and normalize the result.
    pub async fn statistics(pool: &DbPool) -> DbResult<Statistics> {
        let pg = pool.pg();
        let (count, average, maximum, minimum) = tokio::try_join!(
            sqlx::query_scalar::<_, i64>(queries::COUNT).fetch_one(pg),
            sqlx::query_scalar::<_, Option<f64>>(queries::AVERAGE).fetch_one(pg),
            sqlx::query_scalar::<_, Option<i32>>(queries::MAXIMUM).fetch_one(pg),
            sqlx::query_scalar::<_, Option<i32>>(queries::MINIMUM).fetch_one(pg),
        )?;

        Ok(Aggregates {
            count,
            average,
            maximum,
            minimum,
        }
        .into())
    }
}
