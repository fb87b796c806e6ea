//! `GET /api/stats` - aggregates over `records.value`.

use crate::api::AppState;
use crate::db::{DatabaseDescriptor, RecordStore};
use crate::error::DbResult;
use crate::models::Statistics;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub statistics: Statistics,
    pub database: DatabaseDescriptor,
}

pub async fn statistics(State(state): State<AppState>) -> DbResult<Json<StatsResponse>> {
    let statistics = RecordStore::statistics(&state.pool).await?;
    Ok(Json(StatsResponse {
        success: true,
        statistics,
        database: state.pool.descriptor().clone(),
    }))
}
