//! `GET /api/data` and `POST /api/data`.

use crate::api::AppState;
use crate::db::RecordStore;
use crate::error::{DbError, DbResult};
use crate::models::{LIST_LIMIT, Record, RecordInput};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Record>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Record,
}

/// The ten most recently created records, newest first.
pub async fn list_records(State(state): State<AppState>) -> DbResult<Json<ListResponse>> {
    let data = RecordStore::list_recent(&state.pool, LIST_LIMIT).await?;
    Ok(Json(ListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<RecordInput>, JsonRejection>,
) -> DbResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(input) = payload.map_err(|rejection| DbError::invalid_input(rejection.body_text()))?;
    let new_record = input.validate(Utc::now())?;

    let record = RecordStore::insert(&state.pool, &new_record).await?;
    info!(id = record.id, name = %record.name, "Record created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            message: "Record created successfully",
            data: record,
        }),
    ))
}
