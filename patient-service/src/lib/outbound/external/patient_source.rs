use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::ExternalPatient;
use crate::domain::patient::ports::PatientSource;

lazy_static! {
    static ref HONORIFIC_RE: Regex = Regex::new(r"\b(?:Mrs|Mr|Ms|Dr|Prof)\b\.?\s*").unwrap();
    static ref TRAILING_INITIAL_RE: Regex = Regex::new(r"\s+[A-Z]\.?$").unwrap();
    static ref DISALLOWED_RE: Regex = Regex::new(r"[^\p{L}\s'-]").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref EXTENSION_RE: Regex = Regex::new(r"\s*x\d+.*$").unwrap();
}

/// Record shape served by `GET {base_url}/users`; other fields are ignored.
#[derive(Debug, Deserialize)]
struct RemoteUser {
    name: String,
    email: String,
    phone: String,
}

impl From<RemoteUser> for ExternalPatient {
    fn from(remote: RemoteUser) -> Self {
        ExternalPatient {
            name: clean_name(&remote.name),
            email: remote.email.trim().to_string(),
            phone: clean_phone(&remote.phone),
        }
    }
}

/// Strip honorifics and a trailing initial, then anything a patient name
/// may not contain.
pub fn clean_name(name: &str) -> String {
    let name = HONORIFIC_RE.replace_all(name, "");
    let name = TRAILING_INITIAL_RE.replace(&name, "");
    let name = DISALLOWED_RE.replace_all(&name, "");
    WHITESPACE_RE.replace_all(&name, " ").trim().to_string()
}

/// Drop an `x123` extension and keep the first token.
pub fn clean_phone(phone: &str) -> String {
    let phone = EXTENSION_RE.replace(phone, "");
    phone.split_whitespace().next().unwrap_or_default().to_string()
}

/// Patient source backed by a JSONPlaceholder-style `/users` endpoint.
pub struct HttpPatientSource {
    client: Client,
    base_url: String,
}

impl HttpPatientSource {
    /// # Errors
    /// Fails when the HTTP client cannot be built (TLS backend unavailable).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PatientSource for HttpPatientSource {
    async fn fetch_patients(&self, count: u32) -> Result<Vec<ExternalPatient>, PatientError> {
        let url = format!("{}/users", self.base_url);

        tracing::debug!(url = %url, count, "Fetching external patients");

        let users: Vec<RemoteUser> = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| PatientError::ImportFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| PatientError::ImportFailed(format!("Invalid payload: {}", e)))?;

        Ok(users
            .into_iter()
            .take(count as usize)
            .map(ExternalPatient::from)
            .collect())
    }
}
