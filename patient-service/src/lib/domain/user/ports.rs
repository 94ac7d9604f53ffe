use async_trait::async_trait;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for registration and authentication use cases.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// Username uniqueness is checked before email uniqueness; the first
    /// failure wins.
    ///
    /// # Arguments
    /// * `command` - Validated username, email, password and optional full name
    ///
    /// # Returns
    /// Stored user entity (active, not a superuser)
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `InvalidUserData` - Required fields empty before persistence
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Check a username/password pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user, wrong password or inactive account,
    ///   deliberately indistinguishable
    /// * `DatabaseError` - Database operation failed
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError>;

    /// Issue a bearer token for an authenticated user, with the configured TTL.
    ///
    /// # Errors
    /// * `Unknown` - Token signing failed
    async fn issue_session_token(&self, user: &User) -> Result<AccessToken, UserError>;

    /// Resolve a bearer token back to its user.
    ///
    /// # Errors
    /// * `InvalidToken` - Malformed, forged, expired, subject-less token, or a
    ///   subject that no longer maps to an active user
    /// * `DatabaseError` - Database operation failed
    async fn resolve_token(&self, token: &str) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Implementations must enforce username and email uniqueness themselves;
/// the service's pre-checks are advisory.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user, assigning id and timestamps.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username, matched exactly as stored.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
}
