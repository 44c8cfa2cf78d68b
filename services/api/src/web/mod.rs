pub mod middleware;
pub mod rest;
pub mod state;

pub use middleware::require_session;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use rest::{
    analyze_handler, current_user_handler, deactivate_handler, login_handler, logout_handler,
    set_active_handler, state_handler, upload_image_handler,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Screenshots and profile pictures travel base64 encoded inside JSON.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Builds the API router around the shared state.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/session/login", post(login_handler))
        .route("/session/me", get(current_user_handler))
        .route("/session/logout", post(logout_handler))
        .route("/session/state", get(state_handler));

    // Protected routes (authenticated session required)
    let protected_routes = Router::new()
        .route("/profile/image", post(upload_image_handler))
        .route("/profile/deactivate", post(deactivate_handler))
        .route("/profile/{id}/active", put(set_active_handler))
        .route("/analyze", post(analyze_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
