use async_trait::async_trait;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::ExternalPatient;
use crate::domain::patient::models::ImportSummary;
use crate::domain::patient::models::Patient;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::models::PatientQuery;
use crate::domain::patient::models::UpdatePatientCommand;

/// Port for patient record use cases.
#[async_trait]
pub trait PatientServicePort: Send + Sync + 'static {
    /// Create a new patient.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Another patient already uses this email
    /// * `DatabaseError` - Database operation failed
    async fn create_patient(&self, command: CreatePatientCommand) -> Result<Patient, PatientError>;

    /// Retrieve patient by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Patient does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_patient(&self, id: &PatientId) -> Result<Patient, PatientError>;

    /// List patients, newest first, optionally filtered by name.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn search_patients(&self, query: PatientQuery) -> Result<Vec<Patient>, PatientError>;

    /// Apply a partial update.
    ///
    /// # Errors
    /// * `NotFound` - Patient does not exist
    /// * `EmailAlreadyExists` - New email belongs to another patient
    /// * `DatabaseError` - Database operation failed
    async fn update_patient(
        &self,
        id: &PatientId,
        command: UpdatePatientCommand,
    ) -> Result<Patient, PatientError>;

    /// Delete a patient.
    ///
    /// # Errors
    /// * `NotFound` - Patient does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_patient(&self, id: &PatientId) -> Result<(), PatientError>;

    /// Import up to `count` patients from the external source.
    ///
    /// Records whose email is already known are skipped; invalid records are
    /// counted as failed. Nothing is retried.
    ///
    /// # Errors
    /// * `InvalidImportCount` - Count outside 1-100
    /// * `ImportFailed` - The source could not be fetched
    async fn import_external_patients(&self, count: u32) -> Result<ImportSummary, PatientError>;
}

/// Persistence operations for patient aggregate.
#[async_trait]
pub trait PatientRepository: Send + Sync + 'static {
    /// Persist a new patient, assigning id and timestamps.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, command: CreatePatientCommand) -> Result<Patient, PatientError>;

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>, PatientError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, PatientError>;

    /// Name substring match (case-insensitive), newest first, paginated.
    async fn search(&self, query: &PatientQuery) -> Result<Vec<Patient>, PatientError>;

    /// Apply the provided fields and refresh `updated_at`.
    ///
    /// Returns `None` when the patient does not exist.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - New email belongs to another patient
    /// * `DatabaseError` - Database operation failed
    async fn update(
        &self,
        id: &PatientId,
        command: UpdatePatientCommand,
    ) -> Result<Option<Patient>, PatientError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: &PatientId) -> Result<bool, PatientError>;
}

/// External provider of patient records for bulk import.
#[async_trait]
pub trait PatientSource: Send + Sync + 'static {
    /// Fetch at most `count` cleaned records.
    ///
    /// # Errors
    /// * `ImportFailed` - Source unreachable or returned an unusable payload
    async fn fetch_patients(&self, count: u32) -> Result<Vec<ExternalPatient>, PatientError>;
}
