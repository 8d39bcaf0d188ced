use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::analysis::{AnalysisPayload, AnalysisResultRow};
use crate::resumes::store::resume_ids_for_user;

pub const DEFAULT_RECENT_LIMIT: i64 = 10;
pub const MAX_RECENT_LIMIT: i64 = 100;

/// Missing means the default; anything else is pinned to `1..=MAX_RECENT_LIMIT`.
pub fn clamp_recent_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT)
}

pub async fn save_analysis_result(
    pool: &PgPool,
    resume_id: Uuid,
    job_id: Uuid,
    payload: &AnalysisPayload,
) -> Result<AnalysisResultRow, sqlx::Error> {
    sqlx::query_as::<_, AnalysisResultRow>(
        r#"
        INSERT INTO analysis_results (id, resume_id, job_id, results)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(resume_id)
    .bind(job_id)
    .bind(Json(payload))
    .fetch_one(pool)
    .await
}

/// Most recent results across every resume the user owns.
///
/// Resolves the user's resume ids first, then selects results for those ids.
pub async fn recent_results_for_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<AnalysisResultRow>, sqlx::Error> {
    let resume_ids = resume_ids_for_user(pool, user_id).await?;
    if resume_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, AnalysisResultRow>(
        r#"
        SELECT * FROM analysis_results
        WHERE resume_id = ANY($1)
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(&resume_ids)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn count_results_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM analysis_results a
        JOIN resumes r ON r.id = a.resume_id
        WHERE r.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}
