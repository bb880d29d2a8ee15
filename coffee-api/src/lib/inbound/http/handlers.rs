use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::user::errors::UserError;
use crate::user::models::AccessToken;
use crate::user::models::User;

pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod sign_up;
pub mod update_user;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiErrorBody::new(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::DuplicateField(_) => ApiError::Conflict(err.to_string()),
            UserError::Unauthorized => ApiError::Unauthorized(err.to_string()),
            UserError::InvalidUserId(_) => ApiError::BadRequest(err.to_string()),
            UserError::InvalidUsername(_) | UserError::InvalidEmail(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::Password(_)
            | UserError::Token(_)
            | UserError::Database(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub status_code: u16,
    pub message: String,
}

impl ApiErrorBody {
    pub fn new(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message,
        }
    }
}

/// Body returned by sign-up and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessTokenResponseData {
    pub access_token: String,
}

impl From<AccessToken> for AccessTokenResponseData {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.0,
        }
    }
}

/// Public view of a user record. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::errors::UniqueField;

    #[test]
    fn test_user_error_status_mapping() {
        assert!(matches!(
            ApiError::from(UserError::DuplicateField(UniqueField::Email)),
            ApiError::Conflict(msg) if msg == "A user with this email already exists"
        ));
        assert!(matches!(
            ApiError::from(UserError::NotFound("1".to_string())),
            ApiError::NotFound(_)
        ));
        assert_eq!(
            ApiError::from(UserError::Unauthorized),
            ApiError::Unauthorized("Unauthorized".to_string())
        );
        assert!(matches!(
            ApiError::from(UserError::Database("boom".to_string())),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response =
            ApiError::InternalServerError("password_hash column missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
