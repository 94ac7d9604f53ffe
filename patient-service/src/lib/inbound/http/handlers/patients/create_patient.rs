use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::PatientData;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::PatientName;
use crate::domain::patient::models::PhoneNumber;
use crate::domain::patient::ports::PatientServicePort;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::FieldError;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::router::AppState;

pub async fn create_patient(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePatientRequest>,
) -> Result<ApiSuccess<PatientData>, ApiError> {
    let command = body.try_into_command().map_err(ApiError::Validation)?;

    state
        .patient_service
        .create_patient(command)
        .await
        .map_err(ApiError::from)
        .map(|ref patient| ApiSuccess::new(StatusCode::CREATED, patient.into()))
}

/// HTTP request body for creating a patient (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePatientRequest {
    name: String,
    email: String,
    phone: String,
}

impl CreatePatientRequest {
    fn try_into_command(self) -> Result<CreatePatientCommand, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = PatientName::new(self.name)
            .map_err(|e| errors.push(FieldError::new("name", e)))
            .ok();
        let email = EmailAddress::new(self.email)
            .map_err(|e| errors.push(FieldError::new("email", e)))
            .ok();
        let phone = PhoneNumber::new(self.phone)
            .map_err(|e| errors.push(FieldError::new("phone", e)))
            .ok();

        match (name, email, phone) {
            (Some(name), Some(email), Some(phone)) => {
                Ok(CreatePatientCommand::new(name, email, phone))
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_aggregated() {
        let errors = CreatePatientRequest {
            name: "A".to_string(),
            email: "ana@x.com".to_string(),
            phone: "123".to_string(),
        }
        .try_into_command()
        .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "phone"]);
    }
}
