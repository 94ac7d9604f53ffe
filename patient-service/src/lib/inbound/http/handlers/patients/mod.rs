use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::patient::models::Patient;
use crate::domain::patient::models::PatientId;
use crate::inbound::http::handlers::ApiError;

pub mod create_patient;
pub mod delete_patient;
pub mod get_patient;
pub mod import_patients;
pub mod list_patients;
pub mod update_patient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Patient> for PatientData {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id.to_string(),
            name: patient.name.as_str().to_string(),
            email: patient.email.as_str().to_string(),
            phone: patient.phone.as_str().to_string(),
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

/// Parse a path id; a malformed id can never name an existing patient.
fn parse_patient_id(raw: &str) -> Result<PatientId, ApiError> {
    PatientId::from_string(raw).map_err(|_| ApiError::NotFound("Patient not found".to_string()))
}
