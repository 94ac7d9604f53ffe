use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfoData {
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsData {
    pub service: &'static str,
    pub status: &'static str,
    pub uptime_seconds: i64,
}

pub async fn root() -> ApiSuccess<ServiceInfoData> {
    ApiSuccess::new(
        StatusCode::OK,
        ServiceInfoData {
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

pub async fn health() -> ApiSuccess<HealthData> {
    ApiSuccess::new(StatusCode::OK, HealthData { status: "healthy" })
}

pub async fn metrics(State(state): State<AppState>) -> ApiSuccess<MetricsData> {
    ApiSuccess::new(
        StatusCode::OK,
        MetricsData {
            service: env!("CARGO_PKG_NAME"),
            status: "healthy",
            uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
        },
    )
}

pub async fn fallback() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
