use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Identity resolved from a validated bearer token.
///
/// Inserted into request extensions for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Middleware that validates JWT bearer tokens before protected handlers run.
///
/// By default the signature alone is trusted; with
/// `auth.verify_subject_exists` the subject must also still exist.
pub async fn authenticate<S: UserServicePort>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT validation failed");
        unauthorized()
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user ID");
        unauthorized()
    })?;

    if state.auth.verify_subject_exists {
        match state.user_service.get_user(&user_id).await {
            Ok(_) => {}
            Err(UserError::NotFound(_)) => {
                tracing::warn!(user_id = %user_id, "Token subject no longer exists");
                return Err(unauthorized());
            }
            Err(e) => return Err(ApiError::from(e)),
        }
    }

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

fn unauthorized() -> ApiError {
    ApiError::from(UserError::Unauthorized)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::debug!("Missing Authorization header");
            unauthorized()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| unauthorized())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => {
            tracing::debug!("Authorization header is not a bearer token");
            Err(unauthorized())
        }
    }
}
