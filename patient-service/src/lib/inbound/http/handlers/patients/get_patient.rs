use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::parse_patient_id;
use super::PatientData;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<ApiSuccess<PatientData>, ApiError> {
    let patient_id = parse_patient_id(&patient_id)?;

    state
        .patient_service
        .get_patient(&patient_id)
        .await
        .map_err(ApiError::from)
        .map(|ref patient| ApiSuccess::new(StatusCode::OK, patient.into()))
}
