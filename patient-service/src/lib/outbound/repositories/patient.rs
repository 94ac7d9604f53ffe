use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::Patient;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::models::PatientName;
use crate::domain::patient::models::PatientQuery;
use crate::domain::patient::models::PhoneNumber;
use crate::domain::patient::models::UpdatePatientCommand;
use crate::domain::patient::ports::PatientRepository;
use crate::domain::user::models::EmailAddress;

const PATIENT_COLUMNS: &str = "id, name, email, phone, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PatientRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<PatientRow> for Patient {
    type Error = PatientError;

    fn try_from(r: PatientRow) -> Result<Self, Self::Error> {
        Ok(Patient {
            id: PatientId(r.id),
            name: PatientName::new(r.name)?,
            email: EmailAddress::new(r.email)?,
            phone: PhoneNumber::new(r.phone)?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Escape `LIKE` metacharacters so user input only ever matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_write_error(e: sqlx::Error, email: Option<&str>) -> PatientError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("patients_email_key") {
            return PatientError::EmailAlreadyExists(email.unwrap_or_default().to_string());
        }
    }
    PatientError::DatabaseError(e.to_string())
}

pub struct PostgresPatientRepository {
    pool: PgPool,
}

impl PostgresPatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientRepository for PostgresPatientRepository {
    async fn create(&self, command: CreatePatientCommand) -> Result<Patient, PatientError> {
        let sql = format!(
            r#"
            INSERT INTO patients (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING {PATIENT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, PatientRow>(&sql)
            .bind(command.name.as_str())
            .bind(command.email.as_str())
            .bind(command.phone.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, Some(command.email.as_str())))?;

        Patient::try_from(row)
    }

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>, PatientError> {
        let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1");

        let row = sqlx::query_as::<_, PatientRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        row.map(Patient::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, PatientError> {
        let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE email = $1");

        let row = sqlx::query_as::<_, PatientRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        row.map(Patient::try_from).transpose()
    }

    async fn search(&self, query: &PatientQuery) -> Result<Vec<Patient>, PatientError> {
        let sql = format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            WHERE ($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\')
            ORDER BY created_at DESC, id
            OFFSET $2
            LIMIT $3
            "#
        );
        let pattern = query.search().map(|term| format!("%{}%", escape_like(term)));

        let rows = sqlx::query_as::<_, PatientRow>(&sql)
            .bind(pattern)
            .bind(i64::from(query.skip()))
            .bind(i64::from(query.limit()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Patient::try_from).collect()
    }

    async fn update(
        &self,
        id: &PatientId,
        command: UpdatePatientCommand,
    ) -> Result<Option<Patient>, PatientError> {
        let sql = format!(
            r#"
            UPDATE patients
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PATIENT_COLUMNS}
            "#
        );
        let email = command.email.as_ref().map(EmailAddress::as_str);

        let row = sqlx::query_as::<_, PatientRow>(&sql)
            .bind(id.0)
            .bind(command.name.as_ref().map(PatientName::as_str))
            .bind(email)
            .bind(command.phone.as_ref().map(PhoneNumber::as_str))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, email))?;

        row.map(Patient::try_from).transpose()
    }

    async fn delete(&self, id: &PatientId) -> Result<bool, PatientError> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
