use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::fitment::FitmentSummary;
use crate::analysis::models::{FitAnalysis, InterviewQuestionSet, ParsedResume, RedFlagReport};
use crate::analysis::store::{clamp_recent_limit, recent_results_for_user, save_analysis_result};
use crate::auth::HrUser;
use crate::errors::AppError;
use crate::jobs::store::get_job_for_user;
use crate::models::analysis::{AnalysisPayload, AnalysisResultRow};
use crate::models::job::JobDescriptionRow;
use crate::models::resume::ResumeRow;
use crate::resumes::store::get_resume_for_user;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumeJobRequest {
    pub resume_id: Uuid,
    pub job_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RedFlagsRequest {
    pub resume_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FitResponse {
    pub result_id: Uuid,
    pub analysis: FitAnalysis,
    pub fitment: FitmentSummary,
}

#[derive(Debug, Serialize)]
pub struct InterviewQuestionsResponse {
    pub result_id: Uuid,
    pub questions: InterviewQuestionSet,
}

async fn load_resume(state: &AppState, resume_id: Uuid, user_id: Uuid) -> Result<ResumeRow, AppError> {
    get_resume_for_user(&state.db, resume_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("resume {resume_id} not found")))
}

async fn load_resume_and_job(
    state: &AppState,
    request: &ResumeJobRequest,
    user_id: Uuid,
) -> Result<(ResumeRow, JobDescriptionRow), AppError> {
    let resume = load_resume(state, request.resume_id, user_id).await?;
    let job = get_job_for_user(&state.db, request.job_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {} not found", request.job_id)))?;
    Ok((resume, job))
}

/// POST /api/v1/analysis/parse
///
/// Field extraction over pasted text. Nothing is stored.
pub async fn handle_parse(
    State(state): State<AppState>,
    _user: HrUser,
    Json(request): Json<ParseRequest>,
) -> Result<Json<ParsedResume>, AppError> {
    let text = request.resume_text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let parsed = state.orchestrator.extract_resume_fields(text).await?;
    Ok(Json(parsed))
}

/// POST /api/v1/analysis/fit
pub async fn handle_fit(
    State(state): State<AppState>,
    user: HrUser,
    Json(request): Json<ResumeJobRequest>,
) -> Result<(StatusCode, Json<FitResponse>), AppError> {
    let (resume, job) = load_resume_and_job(&state, &request, user.id()).await?;

    let analysis = state
        .orchestrator
        .score_fit(&resume.parsed_data, &job.description)
        .await?;
    let fitment = FitmentSummary::from_raw(analysis.score);

    let payload = AnalysisPayload::Fit {
        analysis: analysis.clone(),
        fitment: fitment.clone(),
    };
    let row = save_analysis_result(&state.db, resume.id, job.id, &payload).await?;

    info!(
        "Fit for resume {} against job {}: {} ({})",
        resume.id, job.id, fitment.score, fitment.label
    );
    Ok((
        StatusCode::CREATED,
        Json(FitResponse {
            result_id: row.id,
            analysis,
            fitment,
        }),
    ))
}

/// POST /api/v1/analysis/red-flags
///
/// Not persisted: results are keyed by resume and job, and red flags have no job.
pub async fn handle_red_flags(
    State(state): State<AppState>,
    user: HrUser,
    Json(request): Json<RedFlagsRequest>,
) -> Result<Json<RedFlagReport>, AppError> {
    let resume = load_resume(&state, request.resume_id, user.id()).await?;
    let report = state.orchestrator.detect_red_flags(&resume.parsed_data).await?;
    Ok(Json(report))
}

/// POST /api/v1/analysis/interview-questions
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    user: HrUser,
    Json(request): Json<ResumeJobRequest>,
) -> Result<(StatusCode, Json<InterviewQuestionsResponse>), AppError> {
    let (resume, job) = load_resume_and_job(&state, &request, user.id()).await?;

    let questions = state
        .orchestrator
        .generate_interview_questions(&resume.parsed_data, &job.description)
        .await?;

    let payload = AnalysisPayload::InterviewQuestions {
        questions: questions.clone(),
    };
    let row = save_analysis_result(&state.db, resume.id, job.id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(InterviewQuestionsResponse {
            result_id: row.id,
            questions,
        }),
    ))
}

/// GET /api/v1/analysis/recent?limit=N
pub async fn handle_recent(
    State(state): State<AppState>,
    user: HrUser,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<AnalysisResultRow>>, AppError> {
    let limit = clamp_recent_limit(query.limit);
    let rows = recent_results_for_user(&state.db, user.id(), limit).await?;
    Ok(Json(rows))
}
