use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::AccessTokenResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::Password;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<S: UserServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<AccessTokenResponseData>, ApiError> {
    let credentials = Credentials {
        username: body.username,
        password: Password::new(body.password),
    };

    state
        .user_service
        .login(credentials)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, token.into()))
}

/// HTTP request body for logging in (raw JSON)
#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}
