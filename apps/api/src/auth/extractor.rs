//! Bearer-session extractors.
//!
//! `AuthUser`: any signed-in user, else 401.
//! `HrUser`: signed-in user with an HR-capable role, else 403.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::auth::store::find_user_by_session;
use crate::auth::tokens::hash_token;
use crate::errors::AppError;
use crate::models::user::UserProfile;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Hr,
    Admin,
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hr" => Role::Hr,
            "admin" => Role::Admin,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn can_use_hr_tools(&self) -> bool {
        matches!(self, Role::Hr | Role::Admin)
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub profile: UserProfile,
    /// Hash of the bearer token that authenticated this request.
    pub token_hash: String,
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let token_hash = hash_token(token);

        let user = find_user_by_session(&state.db, &token_hash)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser {
            id: user.id,
            role: Role::parse(&user.role),
            profile: user.into(),
            token_hash,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HrUser(pub AuthUser);

impl HrUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for HrUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.can_use_hr_tools() {
            return Err(AppError::Forbidden);
        }
        Ok(HrUser(user))
    }
}
