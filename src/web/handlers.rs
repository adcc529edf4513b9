use super::AppState;
use crate::live_feed::LiveSnapshot;
use crate::report_core::{parse_report_date, DailyReport, RangeReport, ReportError};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn required_date(value: Option<&str>, name: &str) -> Result<NaiveDate, ReportError> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse_report_date(raw),
        _ => Err(ReportError::Validation(format!("Missing {} param", name))),
    }
}

/// Query strings axum cannot decode get the same JSON error body as bad dates
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ReportError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ReportError::Validation(rejection.body_text()))
}

pub async fn daily(
    State(state): State<AppState>,
    query: Result<Query<DailyQuery>, QueryRejection>,
) -> Result<Json<DailyReport>, ReportError> {
    let query = query_params(query)?;
    let date = required_date(query.date.as_deref(), "date")?;
    let report = state.reports.build_daily_report(date).await?;
    Ok(Json(report))
}

pub async fn range(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<RangeReport>, ReportError> {
    let query = query_params(query)?;
    let start = required_date(query.start_date.as_deref(), "startDate")?;
    let end = required_date(query.end_date.as_deref(), "endDate")?;
    let report = state.reports.build_range_report(start, end).await?;
    Ok(Json(report))
}

pub async fn live(State(state): State<AppState>) -> Json<LiveSnapshot> {
    let snapshot = state.live.borrow().as_ref().clone();
    Json(snapshot)
}

pub async fn health() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}
