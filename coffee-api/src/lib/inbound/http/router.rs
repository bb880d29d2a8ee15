use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::sign_up::sign_up;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::config::AuthConfig;
use crate::domain::user::ports::UserServicePort;

pub struct AppState<S: UserServicePort> {
    pub user_service: Arc<S>,
    pub authenticator: Arc<Authenticator>,
    pub auth: AuthConfig,
}

impl<S: UserServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            authenticator: Arc::clone(&self.authenticator),
            auth: self.auth.clone(),
        }
    }
}

pub fn create_router<S: UserServicePort>(
    user_service: Arc<S>,
    authenticator: Arc<Authenticator>,
    auth: AuthConfig,
) -> Router {
    let state = AppState {
        user_service,
        authenticator,
        auth,
    };

    let guard = || middleware::from_fn_with_state(state.clone(), auth_middleware::<S>);

    let public_routes = Router::new().route("/auth/signup", post(sign_up::<S>));

    let login_routes = Router::new().route("/auth/login", post(login::<S>));
    let login_routes = if state.auth.guard_login {
        tracing::warn!("POST /auth/login requires a bearer token (auth.guard_login = true)");
        login_routes.route_layer(guard())
    } else {
        login_routes
    };

    let protected_routes = Router::new()
        .route("/users", get(list_users::<S>))
        .route(
            "/users/:user_id",
            get(get_user::<S>)
                .patch(update_user::<S>)
                .delete(delete_user::<S>),
        )
        .route_layer(guard());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
