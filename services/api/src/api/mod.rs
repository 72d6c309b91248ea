//! HTTP API handlers and routing.

pub mod authz;
pub mod error;
pub mod gate;
pub mod session;

mod auth;
mod command_center;
mod dashboard;
mod health;
mod inventory;
mod sos;

use axum::{
    http::{header, Method},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

use error::ApiError;

/// Create the main API router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(Any);

    Router::new()
        // Health endpoints (no auth required)
        .merge(health::routes())
        // Authentication (public by design: the gate's login target)
        .nest("/auth", auth::routes())
        // Access-denied surface the gate redirects to
        .route("/unauthorized", get(unauthorized))
        // Protected application areas
        .nest("/sos", sos::routes())
        .nest("/dashboard", dashboard::routes())
        .nest("/inventory", inventory::routes())
        .nest("/command-center", command_center::routes())
        // Middleware: the route gate runs closest to the routes, before any
        // handler; tracing and CORS wrap it.
        .layer(middleware::from_fn_with_state(state.clone(), gate::layer))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Application state
        .with_state(state)
}

/// Access-denied surface.
///
/// GET /unauthorized
async fn unauthorized() -> impl IntoResponse {
    ApiError::forbidden(
        "forbidden",
        "You do not have access to this area",
    )
}
