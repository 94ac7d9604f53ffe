#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use chrono::Duration;
use patient_service::domain::patient::errors::PatientError;
use patient_service::domain::patient::models::ExternalPatient;
use patient_service::domain::patient::ports::PatientSource;
use patient_service::domain::patient::service::PatientService;
use patient_service::domain::user::service::AuthService;
use patient_service::inbound::http::router::create_router;
use patient_service::outbound::repositories::InMemoryPatientRepository;
use patient_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PASSWORD: &str = "Abcdef1!";

/// Import source serving a fixed list, or failing outright.
pub struct StubPatientSource {
    records: Vec<ExternalPatient>,
    unavailable: bool,
}

impl StubPatientSource {
    pub fn with_records(records: Vec<ExternalPatient>) -> Self {
        Self {
            records,
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl PatientSource for StubPatientSource {
    async fn fetch_patients(&self, count: u32) -> Result<Vec<ExternalPatient>, PatientError> {
        if self.unavailable {
            return Err(PatientError::ImportFailed("connection refused".to_string()));
        }
        Ok(self.records.iter().take(count as usize).cloned().collect())
    }
}

pub fn external(name: &str, email: &str, phone: &str) -> ExternalPatient {
    ExternalPatient {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    }
}

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub users: Arc<InMemoryUserRepository>,
    pub patients: Arc<InMemoryPatientRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_source(StubPatientSource::with_records(Vec::new())).await
    }

    pub async fn spawn_with_source(source: StubPatientSource) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = Arc::new(InMemoryUserRepository::new());
        let patients = Arc::new(InMemoryPatientRepository::new());

        let authenticator = Arc::new(Authenticator::new(JWT_SECRET, Duration::minutes(30)));
        let auth_service = Arc::new(AuthService::new(Arc::clone(&users), authenticator));
        let patient_service = Arc::new(PatientService::new(
            Arc::clone(&patients),
            Arc::new(source),
        ));

        let router = create_router(auth_service, patient_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            users,
            patients,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            jwt_handler: JwtHandler::new(JWT_SECRET, Duration::minutes(30)),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user with the shared test password.
    pub async fn register(&self, username: &str, email: &str) -> Value {
        let response = self
            .post("/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": PASSWORD,
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Post credentials to the token endpoint.
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/token")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register `alice01` and return a valid token for that account.
    pub async fn token(&self) -> String {
        self.register("alice01", "alice@x.com").await;
        let body: Value = self
            .login("alice01", PASSWORD)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }
}
