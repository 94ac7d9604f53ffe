use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::parse_patient_id;
use super::PatientData;
use crate::domain::patient::models::PatientName;
use crate::domain::patient::models::PhoneNumber;
use crate::domain::patient::models::UpdatePatientCommand;
use crate::domain::patient::ports::PatientServicePort;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::FieldError;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::router::AppState;

pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    JsonBody(body): JsonBody<UpdatePatientRequest>,
) -> Result<ApiSuccess<PatientData>, ApiError> {
    let patient_id = parse_patient_id(&patient_id)?;
    let command = body.try_into_command().map_err(ApiError::Validation)?;

    state
        .patient_service
        .update_patient(&patient_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref patient| ApiSuccess::new(StatusCode::OK, patient.into()))
}

/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdatePatientRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

impl UpdatePatientRequest {
    fn try_into_command(self) -> Result<UpdatePatientCommand, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self
            .name
            .map(PatientName::new)
            .transpose()
            .unwrap_or_else(|e| {
                errors.push(FieldError::new("name", e));
                None
            });
        let email = self
            .email
            .map(EmailAddress::new)
            .transpose()
            .unwrap_or_else(|e| {
                errors.push(FieldError::new("email", e));
                None
            });
        let phone = self
            .phone
            .map(PhoneNumber::new)
            .transpose()
            .unwrap_or_else(|e| {
                errors.push(FieldError::new("phone", e));
                None
            });

        if errors.is_empty() {
            Ok(UpdatePatientCommand::new(name, email, phone))
        } else {
            Err(errors)
        }
    }
}
