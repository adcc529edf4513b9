//! HTTP surface
//!
//! ```text
//! GET /api/daily?date=YYYY-MM-DD               → DailyReport
//! GET /api/range?startDate=...&endDate=...     → RangeReport
//! GET /api/live                                → LiveSnapshot
//! ```

pub mod error;
pub mod handlers;

use crate::live_feed::LiveSnapshot;
use crate::report_core::ReportService;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::sync::watch;

pub use error::ErrorBody;

#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportService>,
    pub live: watch::Receiver<Arc<LiveSnapshot>>,
}

impl AppState {
    pub fn new(reports: Arc<ReportService>, live: watch::Receiver<Arc<LiveSnapshot>>) -> Self {
        Self { reports, live }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/daily", get(handlers::daily))
        .route("/api/range", get(handlers::range))
        .route("/api/live", get(handlers::live))
        .route("/healthz", get(handlers::health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report_core::{offset_from_minutes, Reading};
    use crate::store::{ReadingStore, SqliteReadingStore};
    use axum::body::{self, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{DateTime, Utc};
    use tower::ServiceExt; // for `oneshot`

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    async fn app_with(readings: &[Reading]) -> Router {
        let store = SqliteReadingStore::in_memory().unwrap();
        for reading in readings {
            store.insert_reading(reading).await.unwrap();
        }
        let service = ReportService::new(Arc::new(store), offset_from_minutes(-300).unwrap());
        let (_tx, live) = watch::channel(Arc::new(LiveSnapshot::default()));
        router(AppState::new(Arc::new(service), live))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_daily_report_ok() {
        let app = app_with(&[
            Reading::new(at("2024-01-01T05:00:00Z"), 20.0, 50.0),
            Reading::new(at("2024-01-01T05:30:00Z"), 22.0, 54.0),
        ])
        .await;

        let (status, json) = get_json(app, "/api/daily?date=2024-01-01").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["averageTemperature"], 21.0);
        assert_eq!(json["hourlyAverages"].as_array().unwrap().len(), 24);
        assert_eq!(json["hourlyAverages"][0]["hour"], "00:00");
        assert_eq!(json["hourlyAverages"][0]["averageHumidity"], 52.0);
        assert!(json["hourlyAverages"][1]["averageTemperature"].is_null());
    }

    #[tokio::test]
    async fn test_daily_missing_or_malformed_date_is_400() {
        let (status, json) = get_json(app_with(&[]).await, "/api/daily").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION");

        let (status, _) = get_json(app_with(&[]).await, "/api/daily?date=2024-13-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_undecodable_query_is_json_validation_error() {
        let (status, json) = get_json(
            app_with(&[]).await,
            "/api/daily?date=2024-01-01&date=2024-01-02",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION");
        assert!(json["error"].as_str().unwrap().contains("date"));

        let (status, json) = get_json(
            app_with(&[]).await,
            "/api/range?startDate=2024-01-01&startDate=2024-01-02&endDate=2024-01-03",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION");
    }

    #[tokio::test]
    async fn test_daily_without_rows_is_no_data() {
        let (status, json) = get_json(app_with(&[]).await, "/api/daily?date=2024-01-01").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "NO_DATA");
        assert_eq!(json["error"], "No data found");
    }

    #[tokio::test]
    async fn test_range_report_ok() {
        let app = app_with(&[
            Reading::new(at("2024-01-01T12:00:00Z"), 20.0, 50.0),
            Reading::new(at("2024-01-02T12:00:00Z"), 24.0, 60.0),
        ])
        .await;

        let (status, json) =
            get_json(app, "/api/range?startDate=2024-01-01&endDate=2024-01-02").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["startDate"], "2024-01-01");
        let daily = json["dailyData"].as_array().unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0]["date"], "2024-01-01");
        assert_eq!(daily[1]["averageTemperature"], 24.0);
    }

    #[tokio::test]
    async fn test_range_validation() {
        let (status, json) = get_json(app_with(&[]).await, "/api/range?startDate=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing endDate param");

        let (status, json) = get_json(
            app_with(&[]).await,
            "/api/range?startDate=2024-01-05&endDate=2024-01-01",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION");
    }

    #[tokio::test]
    async fn test_live_snapshot() {
        let store = SqliteReadingStore::in_memory().unwrap();
        let service = ReportService::new(Arc::new(store), offset_from_minutes(0).unwrap());
        let (_tx, live) = watch::channel(Arc::new(LiveSnapshot::default()));
        let app = router(AppState::new(Arc::new(service), live));

        let (status, json) = get_json(app, "/api/live").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"], "disconnected");
        assert!(json["current"].is_null());
        assert_eq!(json["readings"].as_array().unwrap().len(), 0);
    }
}
