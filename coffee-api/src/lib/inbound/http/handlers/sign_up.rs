use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::AccessTokenResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::UsernameError;

pub async fn sign_up<S: UserServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<SignUpRequest>,
) -> Result<ApiSuccess<AccessTokenResponseData>, ApiError> {
    state
        .user_service
        .sign_up(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::CREATED, token.into()))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Deserialize)]
pub struct SignUpRequest {
    username: String,
    password: String,
    email: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSignUpRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl SignUpRequest {
    fn try_into_command(self) -> Result<SignUpCommand, ParseSignUpRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        Ok(SignUpCommand::new(
            username,
            email,
            Password::new(self.password),
        ))
    }
}

impl From<ParseSignUpRequestError> for ApiError {
    fn from(err: ParseSignUpRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
