use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;
use coffee_api::config::AuthConfig;
use coffee_api::domain::user::models::User;
use coffee_api::domain::user::models::UserId;
use coffee_api::domain::user::models::UserPatch;
use coffee_api::domain::user::ports::UserRepository;
use coffee_api::domain::user::service::UserService;
use coffee_api::inbound::http::router::create_router;
use coffee_api::user::errors::UniqueField;
use coffee_api::user::errors::UserError;
use serde_json::json;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Authenticator,
}

impl TestApp {
    /// Spawn the application with the default (public login, stateless guard) settings
    pub async fn spawn() -> Self {
        Self::spawn_with(AuthConfig::default()).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with(auth: AuthConfig) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_repo = Arc::new(InMemoryUserRepository::default());
        let authenticator = Arc::new(Authenticator::new(JWT_SECRET));
        let user_service = Arc::new(UserService::new(user_repo, Arc::clone(&authenticator)));

        let router = create_router(user_service, authenticator, auth);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator: Authenticator::new(JWT_SECRET),
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

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the issued access token
    pub async fn sign_up(&self, username: &str, email: &str, password: &str) -> String {
        let response = self
            .post("/auth/signup")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Resolve the user id carried by a token
    pub fn user_id_of(&self, token: &str) -> String {
        self.authenticator.validate_token(token).unwrap().sub
    }
}

/// Throwaway Postgres database with migrations applied
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    admin_url: String,
}

impl TestDb {
    /// Create a uniquely named database on the server at `DATABASE_URL`
    ///
    /// Returns `None` when `DATABASE_URL` is unset, so suites needing a real
    /// server are skipped on machines without one.
    pub async fn new() -> Option<Self> {
        let Ok(admin_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return None;
        };

        let db_name = format!(
            "test_coffee_api_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = admin_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            admin_url,
        })
    }

    /// Close the pool and drop the database
    pub async fn teardown(self) {
        self.pool.close().await;

        if let Ok(mut conn) = PgConnection::connect(&self.admin_url).await {
            let _ = conn
                .execute(
                    format!(
                        r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                        self.db_name
                    )
                    .as_str(),
                )
                .await;

            let _ = conn
                .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, self.db_name).as_str())
                .await;
        }
    }
}

/// Directory double keeping users in process memory.
///
/// Uniqueness is enforced like the database constraints, username first.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    fn check_unique(
        users: &[User],
        id: &UserId,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), UserError> {
        let others: Vec<&User> = users.iter().filter(|u| u.id != *id).collect();

        if let Some(username) = username {
            if others.iter().any(|u| u.username.as_str() == username) {
                return Err(UserError::DuplicateField(UniqueField::Username));
            }
        }
        if let Some(email) = email {
            if others.iter().any(|u| u.email.as_str() == email) {
                return Err(UserError::DuplicateField(UniqueField::Email));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        Self::check_unique(
            &users,
            &user.id,
            Some(user.username.as_str()),
            Some(user.email.as_str()),
        )?;
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username.as_str() == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().rev().cloned().collect())
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        // Existence first: an UPDATE matching no row never reaches a constraint
        let index = users
            .iter()
            .position(|u| u.id == *id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        Self::check_unique(
            &users,
            id,
            patch.username.as_ref().map(|u| u.as_str()),
            patch.email.as_ref().map(|e| e.as_str()),
        )?;

        let user = &mut users[index];

        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != *id);

        if users.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
