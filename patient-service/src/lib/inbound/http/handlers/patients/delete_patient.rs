use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::parse_patient_id;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

pub async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let patient_id = parse_patient_id(&patient_id)?;

    state
        .patient_service
        .delete_patient(&patient_id)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageData::new("Patient deleted successfully"),
            )
        })
}
