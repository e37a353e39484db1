use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::JwtVerifier;
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

use super::handlers::admin;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::config::CookieConfig;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub verifier: Arc<JwtVerifier>,
    pub cookie: CookieConfig,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    authenticator: Arc<Authenticator>,
    cookie: CookieConfig,
) -> Router {
    let state = AppState {
        user_service,
        verifier: Arc::new(authenticator.verifier()),
        authenticator,
        cookie,
    };

    let public_routes = Router::new()
        .route("/api/users", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", get(logout));

    let protected_routes = Router::new()
        .route(
            "/api/users/me",
            get(me::get_me).patch(me::update_me).delete(me::delete_me),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Layers run bottom-up: authenticate, then require_admin.
    let admin_routes = Router::new()
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/:user_id", get(admin::get_user))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

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
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
