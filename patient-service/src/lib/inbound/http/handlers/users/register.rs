use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FullName;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::FieldError;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = body.try_into_command().map_err(ApiError::Validation)?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    #[serde(default)]
    full_name: Option<String>,
}

impl RegisterRequest {
    /// Validate every field, collecting all failures instead of stopping at
    /// the first.
    fn try_into_command(self) -> Result<RegisterUserCommand, Vec<FieldError>> {
        let mut errors = Vec::new();

        let username = Username::new(self.username)
            .map_err(|e| errors.push(FieldError::new("username", e)))
            .ok();
        let email = EmailAddress::new(self.email)
            .map_err(|e| errors.push(FieldError::new("email", e)))
            .ok();
        let password = Password::new(self.password)
            .map_err(|e| errors.push(FieldError::new("password", e)))
            .ok();
        let full_name = match self.full_name.filter(|n| !n.trim().is_empty()) {
            Some(name) => match FullName::new(name) {
                Ok(name) => Some(name),
                Err(e) => {
                    errors.push(FieldError::new("full_name", e));
                    None
                }
            },
            None => None,
        };

        match (username, email, password) {
            (Some(username), Some(email), Some(password)) if errors.is_empty() => Ok(
                RegisterUserCommand::new(username, email, password, full_name),
            ),
            _ => Err(errors),
        }
    }
}
