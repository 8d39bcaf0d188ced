use axum::{extract::State, http::StatusCode, Json};

use crate::auth::service::{
    self, LoginRequest, LoginResponse, PasswordResetConfirm, PasswordResetRequest, SignupRequest,
    SignupResponse,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::UserProfile;
use crate::state::AppState;

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let response = service::signup(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = service::login(&state.db, state.config.session_ttl_hours, request).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    service::logout(&state.db, &user.token_hash).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/password-reset
///
/// Always 202, whether or not the email is registered.
pub async fn handle_password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<StatusCode, AppError> {
    service::request_password_reset(&state.db, request).await?;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/password-reset/confirm
pub async fn handle_password_reset_confirm(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetConfirm>,
) -> Result<StatusCode, AppError> {
    service::confirm_password_reset(&state.db, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(user: AuthUser) -> Json<UserProfile> {
    Json(user.profile)
}
