//! services/api/src/web/middleware.rs
//!
//! Session guard for the routes that only make sense once signed in.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

/// Middleware that lets the request through only while the session store
/// reports an authenticated session. Otherwise returns 401 Unauthorized.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if !state.session.state().is_authenticated() {
        warn!(path = %req.uri().path(), "Rejected request without an authenticated session");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}
