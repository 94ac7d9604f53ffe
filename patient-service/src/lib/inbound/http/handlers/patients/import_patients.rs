use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::patient::models::ImportSummary;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::QueryParams;
use crate::inbound::http::router::AppState;

const DEFAULT_IMPORT_COUNT: u32 = 10;

pub async fn import_patients(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ImportParams>,
) -> Result<ApiSuccess<ImportResponseData>, ApiError> {
    let count = params.count.unwrap_or(DEFAULT_IMPORT_COUNT);

    state
        .patient_service
        .import_external_patients(count)
        .await
        .map_err(ApiError::from)
        .map(|summary| ApiSuccess::new(StatusCode::OK, summary.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportParams {
    count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportResponseData {
    pub message: String,
    pub imported: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl From<ImportSummary> for ImportResponseData {
    fn from(summary: ImportSummary) -> Self {
        Self {
            message: format!(
                "Successfully imported {} patients from external API",
                summary.imported
            ),
            imported: summary.imported,
            skipped: summary.skipped,
            failed: summary.failed,
        }
    }
}
