use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::Password;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPatch;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account and authentication operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User directory implementation
    /// * `authenticator` - Credential hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    // bcrypt is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
                .await??;
        Ok(hash)
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<AccessToken, UserError> {
        let password_hash = self.hash_password(command.password).await?;
        let user = User::new(command.username, command.email, password_hash);

        let created_user = self.repository.create(user).await.map_err(|e| {
            if let UserError::DuplicateField(field) = &e {
                tracing::info!(field = %field, "Sign-up rejected: duplicate field");
            }
            e
        })?;

        let token = self
            .authenticator
            .issue_token(created_user.id, created_user.username.as_str())?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User signed up"
        );

        Ok(AccessToken(token))
    }

    async fn login(&self, credentials: Credentials) -> Result<AccessToken, UserError> {
        let Some(user) = self
            .repository
            .find_by_username(&credentials.username)
            .await?
        else {
            let authenticator = Arc::clone(&self.authenticator);
            let password = credentials.password;
            tokio::task::spawn_blocking(move || {
                authenticator.reject_unknown_user(password.expose())
            })
            .await?;

            tracing::debug!("Login rejected");
            return Err(UserError::Unauthorized);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let password = credentials.password;
        let user_id = user.id;
        let outcome = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(
                password.expose(),
                &user.password_hash,
                user.id,
                user.username.as_str(),
            )
        })
        .await?;

        match outcome {
            Ok(result) => {
                tracing::info!(user_id = %user_id, "User logged in");
                Ok(AccessToken(result.access_token))
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!("Login rejected");
                Err(UserError::Unauthorized)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(user_id = %user_id, error = %e, "Stored password hash is unusable");
                Err(e.into())
            }
            Err(AuthenticationError::JwtError(e)) => Err(e.into()),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let password_hash = match command.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let patch = UserPatch {
            username: command.username,
            email: command.email,
            password_hash,
        };

        let updated_user = self.repository.update(id, patch).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        let user = self.get_user(id).await?;
        self.repository.delete(&user.id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
