//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Every operation answers `200 OK` with the `{success, message, data}`
//! envelope; failures are reported inside the envelope, not as HTTP errors.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};
use wingman_core::{Envelope, GlobalState, InferenceResponse, Profile};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        login_handler,
        current_user_handler,
        logout_handler,
        state_handler,
        upload_image_handler,
        deactivate_handler,
        set_active_handler,
        analyze_handler,
    ),
    components(
        schemas(EnvelopeBody, UploadImageRequest, ActiveStatusRequest, AnalyzeImageRequest)
    ),
    tags(
        (name = "Wingman API", description = "Session, profile and opener endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The normalized result of an operation, as documented in the OpenAPI schema.
#[allow(dead_code)]
#[derive(Serialize, ToSchema)]
pub struct EnvelopeBody {
    success: bool,
    message: String,
    /// A profile row, the raw model response, or absent on failure.
    #[schema(value_type = Option<Object>)]
    data: Option<serde_json::Value>,
}

#[derive(Deserialize, ToSchema)]
pub struct UploadImageRequest {
    pub file_name: String,
    /// The picture, base64 encoded.
    pub base64: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ActiveStatusRequest {
    pub is_active: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct AnalyzeImageRequest {
    /// The screenshot, base64 encoded JPEG.
    pub image_base64: String,
    #[serde(default)]
    pub prompt: String,
}

//=========================================================================================
// Session Handlers
//=========================================================================================

/// Create this device's profile and start a session.
#[utoipa::path(
    post,
    path = "/session/login",
    responses((status = 200, description = "Normalized login result", body = EnvelopeBody))
)]
pub async fn login_handler(State(app_state): State<Arc<AppState>>) -> Json<Envelope<Profile>> {
    Json(app_state.session.login().await.into())
}

/// Look up this device's active profile.
#[utoipa::path(
    get,
    path = "/session/me",
    responses((status = 200, description = "Normalized lookup result", body = EnvelopeBody))
)]
pub async fn current_user_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<Envelope<Profile>> {
    Json(app_state.session.fetch_current_user().await.into())
}

/// End the local session. The remote profile is left as it is.
#[utoipa::path(
    post,
    path = "/session/logout",
    responses((status = 204, description = "Session marked as signed out"))
)]
pub async fn logout_handler(State(app_state): State<Arc<AppState>>) -> StatusCode {
    app_state.session.log_out();
    info!("Session signed out locally");
    StatusCode::NO_CONTENT
}

/// The current session state.
#[utoipa::path(
    get,
    path = "/session/state",
    responses((status = 200, description = "Snapshot of the session store"))
)]
pub async fn state_handler(State(app_state): State<Arc<AppState>>) -> Json<GlobalState> {
    Json(app_state.session.state())
}

//=========================================================================================
// Profile Handlers
//=========================================================================================

/// Upload a new profile picture and point the profile at it.
#[utoipa::path(
    post,
    path = "/profile/image",
    request_body = UploadImageRequest,
    responses(
        (status = 200, description = "Normalized upload result", body = EnvelopeBody),
        (status = 401, description = "No authenticated session")
    )
)]
pub async fn upload_image_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<UploadImageRequest>,
) -> Json<Envelope<Profile>> {
    Json(
        app_state
            .session
            .upload_profile_image(&req.file_name, &req.base64)
            .await
            .into(),
    )
}

/// Deactivate this device's profile.
#[utoipa::path(
    post,
    path = "/profile/deactivate",
    responses(
        (status = 200, description = "Normalized deactivation result", body = EnvelopeBody),
        (status = 401, description = "No authenticated session")
    )
)]
pub async fn deactivate_handler(State(app_state): State<Arc<AppState>>) -> Json<Envelope<()>> {
    Json(app_state.session.deactivate_profile().await.into())
}

/// Set the active flag of one profile.
#[utoipa::path(
    put,
    path = "/profile/{id}/active",
    request_body = ActiveStatusRequest,
    params(("id" = i64, Path, description = "The profile id.")),
    responses(
        (status = 200, description = "Normalized status change", body = EnvelopeBody),
        (status = 401, description = "No authenticated session")
    )
)]
pub async fn set_active_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<ActiveStatusRequest>,
) -> Json<Envelope<Profile>> {
    Json(app_state.session.set_active_status(id, req.is_active).await.into())
}

//=========================================================================================
// Opener Handler
//=========================================================================================

/// Ask the vision model for an opener based on a profile screenshot.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeImageRequest,
    responses(
        (
            status = 200,
            description = "Normalized analysis result with the raw model response",
            body = EnvelopeBody
        ),
        (status = 401, description = "No authenticated session")
    )
)]
pub async fn analyze_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeImageRequest>,
) -> Json<Envelope<InferenceResponse>> {
    Json(
        app_state
            .session
            .analyze_image(&req.image_base64, &req.prompt)
            .await
            .into(),
    )
}
