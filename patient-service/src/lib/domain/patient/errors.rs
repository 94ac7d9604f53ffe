use thiserror::Error;

use crate::user::errors::EmailError;

/// Error for PatientId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatientIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for PatientName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatientNameError {
    #[error("Name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Name can only contain letters, spaces, hyphens, and apostrophes")]
    InvalidCharacters,
}

/// Error for PhoneNumber validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Invalid phone number format: {0}")]
    InvalidFormat(String),
}

/// Error for patient listing parameters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatientQueryError {
    #[error("Limit must be between 1 and {max}, got {actual}")]
    LimitOutOfRange { max: u32, actual: u32 },

    #[error("Search term must be at least {min} characters")]
    SearchTooShort { min: usize },
}

/// Top-level error for all patient operations
#[derive(Debug, Clone, Error)]
pub enum PatientError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid patient ID: {0}")]
    InvalidPatientId(#[from] PatientIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] PatientNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] PatientQueryError),

    // Domain-level errors
    #[error("Patient not found: {0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Invalid patient data: {0}")]
    InvalidPatientData(String),

    #[error("Import count must be between 1 and {max}, got {actual}")]
    InvalidImportCount { max: u32, actual: u32 },

    #[error("Import failed: {0}")]
    ImportFailed(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
