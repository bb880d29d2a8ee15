use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPatch;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UniqueField;
use crate::user::errors::UserError;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Translate a failed INSERT/UPDATE into a domain error.
    ///
    /// Postgres reports only the first violated constraint, so on any unique
    /// violation the username is re-checked first: when both fields collide
    /// the caller always sees `username`.
    async fn map_write_error(
        &self,
        error: sqlx::Error,
        id: &UserId,
        username: Option<&str>,
    ) -> UserError {
        let constraint = match error.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => db_err.constraint().map(str::to_owned),
            _ => return UserError::Database(error.to_string()),
        };

        if let Some(username) = username {
            match self.username_taken_by_other(username, id).await {
                Ok(true) => return UserError::DuplicateField(UniqueField::Username),
                Ok(false) => {}
                Err(e) => return e,
            }
        }

        match constraint.as_deref() {
            Some(USERNAME_CONSTRAINT) => UserError::DuplicateField(UniqueField::Username),
            Some(EMAIL_CONSTRAINT) => UserError::DuplicateField(UniqueField::Email),
            _ => UserError::Database(error.to_string()),
        }
    }

    async fn username_taken_by_other(&self, username: &str, id: &UserId) -> Result<bool, UserError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id <> $2)
            "#,
        )
        .bind(username)
        .bind(id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => User::try_from(row),
            Err(e) => Err(self
                .map_write_error(e, &user.id, Some(user.username.as_str()))
                .await),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))?
        .map(User::try_from)
        .transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, UserError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = $5
            WHERE id = $1
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(patch.username.as_ref().map(|u| u.as_str()))
        .bind(patch.email.as_ref().map(|e| e.as_str()))
        .bind(patch.password_hash.as_deref())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => User::try_from(row),
            Ok(None) => Err(UserError::NotFound(id.to_string())),
            Err(e) => Err(self
                .map_write_error(e, id, patch.username.as_ref().map(|u| u.as_str()))
                .await),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
