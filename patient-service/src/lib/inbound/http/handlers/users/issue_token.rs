use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::AccessToken;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::router::AppState;

/// Exchange a username/password pair for a bearer token.
///
/// The username is looked up exactly as given; no validation happens here so
/// that malformed input fails the same way as a wrong password.
pub async fn issue_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TokenRequestBody>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let user = state
        .auth_service
        .authenticate(&body.username, &body.password)
        .await?;

    state
        .auth_service
        .issue_session_token(&user)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, token.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl From<AccessToken> for TokenResponseData {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type.to_string(),
            expires_at: token.expires_at,
        }
    }
}
