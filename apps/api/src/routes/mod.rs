pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::dashboard;
use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Identity
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route("/api/v1/auth/password-reset", post(auth::handle_password_reset))
        .route(
            "/api/v1/auth/password-reset/confirm",
            post(auth::handle_password_reset_confirm),
        )
        // Resumes and jobs
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload_resume)
                .layer(DefaultBodyLimit::max(upload_limit))
                .get(resumes::handle_list_resumes),
        )
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        // Analysis
        .route("/api/v1/analysis/parse", post(analysis::handle_parse))
        .route("/api/v1/analysis/fit", post(analysis::handle_fit))
        .route("/api/v1/analysis/red-flags", post(analysis::handle_red_flags))
        .route(
            "/api/v1/analysis/interview-questions",
            post(analysis::handle_interview_questions),
        )
        .route("/api/v1/analysis/recent", get(analysis::handle_recent))
        .route("/api/v1/dashboard/stats", get(dashboard::handle_stats))
        .with_state(state)
}
