use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for registration and authentication.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hasher and token issuer built from configuration
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    // Argon2 is deliberately slow; keep it off the async workers.
    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let stored_hash = stored_hash.to_string();

        tokio::task::spawn_blocking(move || authenticator.verify_password(&password, &stored_hash))
            .await
            .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_username(command.username.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.as_str().to_string(),
            ));
        }

        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = self.hash_password(command.password).await?;

        let new_user = NewUser::new(
            command.username,
            command.email,
            password_hash,
            command.full_name,
        );

        if !new_user.is_valid_for_creation() {
            return Err(UserError::InvalidUserData(
                "username, email and password are required".to_string(),
            ));
        }

        let user = self.repository.create(new_user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError> {
        let Some(user) = self.repository.find_by_username(username).await? else {
            tracing::debug!(username, reason = "unknown_user", "Authentication failed");
            return Err(UserError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::debug!(username, reason = "password_mismatch", "Authentication failed");
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::debug!(username, reason = "inactive", "Authentication failed");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn issue_session_token(&self, user: &User) -> Result<AccessToken, UserError> {
        let issued = self
            .authenticator
            .issue_token(user.username.as_str(), None)
            .map_err(|e| UserError::Unknown(format!("Token generation failed: {}", e)))?;

        tracing::info!(user_id = %user.id, expires_at = %issued.expires_at, "Access token issued");

        Ok(AccessToken::bearer(issued.token, issued.expires_at))
    }

    async fn resolve_token(&self, token: &str) -> Result<User, UserError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            UserError::InvalidToken
        })?;

        match self.repository.find_by_username(claims.subject()).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => {
                tracing::debug!(username = claims.subject(), "Token subject is inactive");
                Err(UserError::InvalidToken)
            }
            None => {
                tracing::debug!(username = claims.subject(), "Token subject not found");
                Err(UserError::InvalidToken)
            }
        }
    }
}
