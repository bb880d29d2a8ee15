use async_trait::async_trait;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPatch;
use crate::user::errors::UserError;

/// Port for account and authentication operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a user and issue their first access token.
    ///
    /// # Errors
    /// * `DuplicateField` - Username or email is already taken
    /// * `Password` / `Token` - Hashing or signing failed
    /// * `Database` - Database operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<AccessToken, UserError>;

    /// Exchange a username/password pair for an access token.
    ///
    /// # Errors
    /// * `Unauthorized` - Unknown username or wrong password (indistinguishable)
    /// * `Database` - Database operation failed
    async fn login(&self, credentials: Credentials) -> Result<AccessToken, UserError>;

    /// Retrieve all users.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Update existing user with optional fields.
    ///
    /// A new password is hashed before it reaches the directory.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DuplicateField` - New username or email is already taken
    /// * `Database` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Delete existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for the user directory.
///
/// Implementations own uniqueness of username and email and must enforce it
/// atomically: two concurrent `create` calls for one username cannot both
/// succeed.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `DuplicateField` - Username or email is already taken; username is
    ///   reported when both collide
    /// * `Database` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier. `None` if not found.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username. `None` if not found.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve all users, newest first.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Apply a sparse patch and return the stored result.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DuplicateField` - New username or email is already taken
    /// * `Database` - Database operation failed
    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
