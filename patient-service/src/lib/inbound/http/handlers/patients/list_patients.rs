use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::PatientData;
use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::PatientQuery;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::QueryParams;
use crate::inbound::http::router::AppState;

pub async fn list_patients(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListPatientsParams>,
) -> Result<ApiSuccess<Vec<PatientData>>, ApiError> {
    let query = PatientQuery::new(params.search, params.skip, params.limit)
        .map_err(PatientError::from)?;

    state
        .patient_service
        .search_patients(query)
        .await
        .map_err(ApiError::from)
        .map(|patients| {
            ApiSuccess::new(
                StatusCode::OK,
                patients.iter().map(PatientData::from).collect(),
            )
        })
}

/// `?search=&skip=&limit=`; unsigned types reject negative offsets up front.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListPatientsParams {
    search: Option<String>,
    skip: Option<u32>,
    limit: Option<u32>,
}
