//! Account operations behind the auth handlers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::auth::store;
use crate::auth::tokens::{generate_token, hash_token};
use crate::errors::AppError;
use crate::models::user::UserProfile;

const RESET_TOKEN_TTL_MINUTES: i64 = 60;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Trims and lower-cases an email; rejects anything without a local part and domain.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::Validation("email must be a valid address".to_string())),
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub async fn signup(pool: &PgPool, request: SignupRequest) -> Result<SignupResponse, AppError> {
    let email = normalize_email(&request.email)?;
    validate_password(&request.password)?;
    let display_name = request.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(AppError::Validation("display_name cannot be empty".to_string()));
    }

    let password_hash = hash_password(request.password).await?;

    let user_id = store::insert_user(pool, &email, &display_name, &password_hash)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("an account with this email already exists".to_string())
            }
            other => AppError::Database(other),
        })?;

    info!("Created account {user_id}");
    Ok(SignupResponse { user_id })
}

pub async fn login(
    pool: &PgPool,
    session_ttl_hours: i64,
    request: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let Ok(email) = normalize_email(&request.email) else {
        return Err(AppError::Unauthorized);
    };

    let Some(user) = store::find_user_by_email(pool, &email).await? else {
        return Err(AppError::Unauthorized);
    };

    if !verify_password(request.password, user.password_hash.clone()).await? {
        return Err(AppError::Unauthorized);
    }

    let token = generate_token();
    let expires_at = Utc::now() + Duration::hours(session_ttl_hours);
    store::insert_session(pool, user.id, &hash_token(&token), expires_at).await?;

    info!("User {} signed in", user.id);
    Ok(LoginResponse {
        token,
        expires_at,
        user: user.into(),
    })
}

pub async fn logout(pool: &PgPool, token_hash: &str) -> Result<(), AppError> {
    store::delete_session(pool, token_hash).await?;
    Ok(())
}

/// Issues a reset token when the account exists. Returns nothing either way so
/// callers cannot discover which emails are registered. Delivery of the token is
/// handled outside this service.
pub async fn request_password_reset(
    pool: &PgPool,
    request: PasswordResetRequest,
) -> Result<(), AppError> {
    let Ok(email) = normalize_email(&request.email) else {
        return Ok(());
    };

    if let Some(user) = store::find_user_by_email(pool, &email).await? {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        let reset_id =
            store::insert_password_reset(pool, user.id, &hash_token(&token), expires_at).await?;
        info!("Issued password reset {reset_id} for user {}", user.id);
    }

    Ok(())
}

pub async fn confirm_password_reset(
    pool: &PgPool,
    request: PasswordResetConfirm,
) -> Result<(), AppError> {
    validate_password(&request.new_password)?;

    let user_id = store::consume_password_reset(pool, &hash_token(request.token.trim()))
        .await?
        .ok_or_else(|| AppError::Validation("reset token is invalid or expired".to_string()))?;

    let password_hash = hash_password(request.new_password).await?;
    store::replace_password(pool, user_id, &password_hash).await?;

    info!("Password reset completed for user {user_id}; sessions revoked");
    Ok(())
}
