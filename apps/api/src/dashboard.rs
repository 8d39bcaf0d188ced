use axum::{extract::State, Json};
use serde::Serialize;

use crate::analysis::store::count_results_for_user;
use crate::auth::HrUser;
use crate::errors::AppError;
use crate::jobs::store::count_jobs_for_user;
use crate::resumes::store::count_resumes_for_user;
use crate::state::AppState;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_candidates: i64,
    pub jobs_posted: i64,
    pub matches_made: i64,
}

/// GET /api/v1/dashboard/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    user: HrUser,
) -> Result<Json<DashboardStats>, AppError> {
    let user_id = user.id();
    let (total_candidates, jobs_posted, matches_made) = tokio::try_join!(
        count_resumes_for_user(&state.db, user_id),
        count_jobs_for_user(&state.db, user_id),
        count_results_for_user(&state.db, user_id),
    )?;

    Ok(Json(DashboardStats {
        total_candidates,
        jobs_posted,
        matches_made,
    }))
}
