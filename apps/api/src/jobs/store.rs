use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobDescriptionRow;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: String,
}

impl CreateJobRequest {
    /// Trims every field and rejects blanks. An empty location becomes `None`.
    pub fn validated(self) -> Result<Self, AppError> {
        let title = required("title", &self.title)?;
        let company = required("company", &self.company)?;
        let description = required("description", &self.description)?;
        let location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Ok(Self {
            title,
            company,
            location,
            description,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

pub async fn insert_job(
    pool: &PgPool,
    user_id: Uuid,
    job: &CreateJobRequest,
) -> Result<JobDescriptionRow, sqlx::Error> {
    sqlx::query_as::<_, JobDescriptionRow>(
        r#"
        INSERT INTO job_descriptions (id, user_id, title, company, location, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.location)
    .bind(&job.description)
    .fetch_one(pool)
    .await
}

/// Newest first.
pub async fn list_jobs_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<JobDescriptionRow>, sqlx::Error> {
    sqlx::query_as::<_, JobDescriptionRow>(
        "SELECT * FROM job_descriptions WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_job_for_user(
    pool: &PgPool,
    job_id: Uuid,
    user_id: Uuid,
) -> Result<Option<JobDescriptionRow>, sqlx::Error> {
    sqlx::query_as::<_, JobDescriptionRow>(
        "SELECT * FROM job_descriptions WHERE id = $1 AND user_id = $2",
    )
    .bind(job_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn count_jobs_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM job_descriptions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}
