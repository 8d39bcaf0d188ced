use axum::{extract::State, http::StatusCode, Json};

use crate::auth::HrUser;
use crate::errors::AppError;
use crate::jobs::store::{insert_job, list_jobs_for_user, CreateJobRequest};
use crate::models::job::JobDescriptionRow;
use crate::state::AppState;

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    user: HrUser,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobDescriptionRow>), AppError> {
    let job = request.validated()?;
    let row = insert_job(&state.db, user.id(), &job).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    user: HrUser,
) -> Result<Json<Vec<JobDescriptionRow>>, AppError> {
    let jobs = list_jobs_for_user(&state.db, user.id()).await?;
    Ok(Json(jobs))
}
