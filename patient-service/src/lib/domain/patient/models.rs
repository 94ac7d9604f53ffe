use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::errors::PatientIdError;
use crate::domain::patient::errors::PatientNameError;
use crate::domain::patient::errors::PatientQueryError;
use crate::domain::patient::errors::PhoneError;
use crate::domain::user::models::EmailAddress;

lazy_static! {
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9\s\-()]{10,20}$").unwrap();
}

/// Patient aggregate entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub name: PatientName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Patient unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatientId(pub Uuid);

impl PatientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a patient ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PatientIdError> {
        Uuid::parse_str(s)
            .map(PatientId)
            .map_err(|e| PatientIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for PatientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Patient display name: 2-100 letters, spaces, hyphens or apostrophes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientName(String);

impl PatientName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `TooShort` / `TooLong` - Outside 2-100 characters after trimming
    /// * `InvalidCharacters` - Anything but letters, spaces, `-` and `'`
    pub fn new(name: String) -> Result<Self, PatientNameError> {
        let name = name.trim();
        let length = name.chars().count();

        if length < Self::MIN_LENGTH {
            return Err(PatientNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(PatientNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !name
            .chars()
            .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'')
        {
            return Err(PatientNameError::InvalidCharacters);
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Contact phone number, kept as entered after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    // Leading `+` included; the `phone` column is VARCHAR(20).
    const MAX_LENGTH: usize = 20;

    /// # Errors
    /// * `InvalidFormat` - Not 10-20 digits, spaces, dashes or parentheses
    ///   with an optional leading `+`, or over 20 characters in total
    pub fn new(phone: String) -> Result<Self, PhoneError> {
        let phone = phone.trim();
        if phone.len() <= Self::MAX_LENGTH && PHONE_RE.is_match(phone) {
            Ok(Self(phone.to_string()))
        } else {
            Err(PhoneError::InvalidFormat(phone.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a patient with domain types
#[derive(Debug, Clone)]
pub struct CreatePatientCommand {
    pub name: PatientName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
}

impl CreatePatientCommand {
    pub fn new(name: PatientName, email: EmailAddress, phone: PhoneNumber) -> Self {
        Self { name, email, phone }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePatientCommand {
    pub name: Option<PatientName>,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
}

impl UpdatePatientCommand {
    pub fn new(
        name: Option<PatientName>,
        email: Option<EmailAddress>,
        phone: Option<PhoneNumber>,
    ) -> Self {
        Self { name, email, phone }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Listing parameters: optional name filter plus offset pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientQuery {
    search: Option<String>,
    skip: u32,
    limit: u32,
}

impl PatientQuery {
    pub const DEFAULT_LIMIT: u32 = 100;
    pub const MAX_LIMIT: u32 = 1000;
    const MIN_SEARCH_LENGTH: usize = 2;

    /// Build a validated query.
    ///
    /// A blank search term is treated as no filter.
    ///
    /// # Errors
    /// * `LimitOutOfRange` - Limit is 0 or above 1000
    /// * `SearchTooShort` - Search term shorter than 2 characters
    pub fn new(
        search: Option<String>,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Self, PatientQueryError> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(PatientQueryError::LimitOutOfRange {
                max: Self::MAX_LIMIT,
                actual: limit,
            });
        }

        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(term) = &search {
            if term.chars().count() < Self::MIN_SEARCH_LENGTH {
                return Err(PatientQueryError::SearchTooShort {
                    min: Self::MIN_SEARCH_LENGTH,
                });
            }
        }

        Ok(Self {
            search,
            skip: skip.unwrap_or(0),
            limit,
        })
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn skip(&self) -> u32 {
        self.skip
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PatientQuery {
    fn default() -> Self {
        Self {
            search: None,
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Raw patient record handed over by an external source, already cleaned
/// but not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPatient {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ExternalPatient {
    /// Validate into a creation command.
    ///
    /// # Errors
    /// * `InvalidName`, `InvalidEmail`, `InvalidPhone` - Field failed validation
    pub fn try_into_command(self) -> Result<CreatePatientCommand, PatientError> {
        Ok(CreatePatientCommand::new(
            PatientName::new(self.name)?,
            EmailAddress::new(self.email)?,
            PhoneNumber::new(self.phone)?,
        ))
    }
}

/// Outcome counters of a best-effort import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl ImportSummary {
    pub fn total(&self) -> u32 {
        self.imported + self.skipped + self.failed
    }
}
