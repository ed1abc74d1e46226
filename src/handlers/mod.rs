/// HTTP request handlers
use crate::domain::{
    Health, NewReport, Report, ReportFilter, ReportPatch, Statistics, AIRPORTS, REPORT_TIMES,
};
use crate::errors::{ApiError, ApiResult};
use crate::query;
use crate::store::ReportStore;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReportStore>,
}

/// Successful response carrying a payload
#[derive(Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Successful response carrying a status message
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(message: impl Into<String>, id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::new(message)
        }
    }
}

/// Statistics accepts the date and time filters only; the headquarters
/// view always spans all airports.
#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    pub report_date: Option<String>,
    pub report_time: Option<String>,
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Submit a new report
pub async fn submit_report(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<MessageResponse>> {
    let payload = decode::<NewReport>(body)?;
    let report = state.store.create(payload).await?;
    Ok(Json(MessageResponse::with_id(
        "report submitted successfully",
        report.id,
    )))
}

/// List reports, optionally filtered, newest first
pub async fn list_reports(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> ApiResult<Json<DataResponse<Vec<Report>>>> {
    let mut reports = state.store.list(&filter).await;
    query::sort_descending(&mut reports);
    Ok(Json(DataResponse::new(reports)))
}

/// Fetch one report by id
pub async fn get_report(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<Json<DataResponse<Report>>> {
    let report = state.store.get(id).await?;
    Ok(Json(DataResponse::new(report)))
}

/// Apply a partial update to a report
pub async fn update_report(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<MessageResponse>> {
    let patch = decode::<ReportPatch>(body)?;
    state.store.update(id, patch).await?;
    Ok(Json(MessageResponse::new("report updated")))
}

/// Delete a report by id; deleting an absent id is still a success
pub async fn delete_report(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete(id).await?;
    Ok(Json(MessageResponse::new("report deleted")))
}

/// Headquarters statistics over the (optionally filtered) collection
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatisticsQuery>,
) -> ApiResult<Json<DataResponse<Statistics>>> {
    let filter = ReportFilter {
        airport: None,
        report_date: params.report_date,
        report_time: params.report_time,
    };

    let reports = state.store.snapshot().await;
    let matched = query::filter_reports(&reports, &filter);
    Ok(Json(DataResponse::new(query::aggregate_statistics(
        &matched,
    ))))
}

/// Fixed reference data for client views
pub async fn get_reference() -> Json<DataResponse<Value>> {
    Json(DataResponse::new(serde_json::json!({
        "airports": AIRPORTS,
        "report_times": REPORT_TIMES,
    })))
}

/// Decode a request body from raw JSON so malformed payloads surface as
/// the uniform failure envelope instead of a framework rejection.
fn decode<T: serde::de::DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::Validation(format!("malformed report payload: {e}")))
}
