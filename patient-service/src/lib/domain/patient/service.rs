use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::ImportSummary;
use crate::domain::patient::models::Patient;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::models::PatientQuery;
use crate::domain::patient::models::UpdatePatientCommand;
use crate::domain::patient::ports::PatientRepository;
use crate::domain::patient::ports::PatientServicePort;
use crate::domain::patient::ports::PatientSource;

/// Domain service implementation for patient records.
///
/// Concrete implementation of PatientServicePort with dependency injection.
pub struct PatientService<PR, PS>
where
    PR: PatientRepository,
    PS: PatientSource,
{
    repository: Arc<PR>,
    source: Arc<PS>,
}

impl<PR, PS> PatientService<PR, PS>
where
    PR: PatientRepository,
    PS: PatientSource,
{
    pub const MAX_IMPORT_COUNT: u32 = 100;

    /// Create a new patient service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Patient persistence implementation
    /// * `source` - External record provider used by imports
    pub fn new(repository: Arc<PR>, source: Arc<PS>) -> Self {
        Self { repository, source }
    }

    async fn ensure_email_available(
        &self,
        email: &str,
        owner: Option<&PatientId>,
    ) -> Result<(), PatientError> {
        match self.repository.find_by_email(email).await? {
            Some(existing) if Some(&existing.id) != owner => {
                Err(PatientError::EmailAlreadyExists(email.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<PR, PS> PatientServicePort for PatientService<PR, PS>
where
    PR: PatientRepository,
    PS: PatientSource,
{
    async fn create_patient(&self, command: CreatePatientCommand) -> Result<Patient, PatientError> {
        self.ensure_email_available(command.email.as_str(), None)
            .await?;

        let patient = self.repository.create(command).await?;

        tracing::info!(patient_id = %patient.id, "Patient created");

        Ok(patient)
    }

    async fn get_patient(&self, id: &PatientId) -> Result<Patient, PatientError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| PatientError::NotFound(id.to_string()))
    }

    async fn search_patients(&self, query: PatientQuery) -> Result<Vec<Patient>, PatientError> {
        self.repository.search(&query).await
    }

    async fn update_patient(
        &self,
        id: &PatientId,
        command: UpdatePatientCommand,
    ) -> Result<Patient, PatientError> {
        if let Some(email) = &command.email {
            self.ensure_email_available(email.as_str(), Some(id)).await?;
        }

        let patient = self
            .repository
            .update(id, command)
            .await?
            .ok_or_else(|| PatientError::NotFound(id.to_string()))?;

        tracing::info!(patient_id = %patient.id, "Patient updated");

        Ok(patient)
    }

    async fn delete_patient(&self, id: &PatientId) -> Result<(), PatientError> {
        if !self.repository.delete(id).await? {
            return Err(PatientError::NotFound(id.to_string()));
        }

        tracing::info!(patient_id = %id, "Patient deleted");

        Ok(())
    }

    async fn import_external_patients(&self, count: u32) -> Result<ImportSummary, PatientError> {
        if count == 0 || count > Self::MAX_IMPORT_COUNT {
            return Err(PatientError::InvalidImportCount {
                max: Self::MAX_IMPORT_COUNT,
                actual: count,
            });
        }

        let records = self.source.fetch_patients(count).await?;
        let mut summary = ImportSummary::default();

        for record in records.into_iter().take(count as usize) {
            match self.repository.find_by_email(record.email.trim()).await {
                Ok(Some(_)) => {
                    summary.skipped += 1;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Import lookup failed");
                    summary.failed += 1;
                    continue;
                }
            }

            let command = match record.try_into_command() {
                Ok(command) => command,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping invalid external record");
                    summary.failed += 1;
                    continue;
                }
            };

            match self.repository.create(command).await {
                Ok(patient) => {
                    tracing::debug!(patient_id = %patient.id, "Patient imported");
                    summary.imported += 1;
                }
                // Raced with a concurrent insert of the same email.
                Err(PatientError::EmailAlreadyExists(_)) => summary.skipped += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "Import insert failed");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            failed = summary.failed,
            "Patient import finished"
        );

        Ok(summary)
    }
}
