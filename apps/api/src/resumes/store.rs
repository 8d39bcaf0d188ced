use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::models::ParsedResume;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;

pub struct NewResume<'a> {
    pub user_id: Uuid,
    pub file_name: &'a str,
    pub file_key: &'a str,
    pub content_type: &'a str,
    pub parsed_data: &'a ParsedResume,
}

/// Object key for an uploaded resume: scoped by user, unique per upload.
pub fn resume_object_key(user_id: Uuid, upload_id: Uuid, safe_file_name: &str) -> String {
    format!("resumes/{user_id}/{upload_id}-{safe_file_name}")
}

pub async fn upload_resume_file(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    bytes: Bytes,
    content_type: &str,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(bytes))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed for {key}: {e}")))?;

    info!("Uploaded resume file to s3://{bucket}/{key}");
    Ok(())
}

pub async fn delete_resume_file(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 delete failed for {key}: {e}")))?;
    Ok(())
}

/// Removes the stored file when the step that follows the upload failed.
/// The original error is returned either way.
pub async fn discard_upload_on_error<T>(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    if result.is_err() {
        match delete_resume_file(s3, bucket, key).await {
            Ok(()) => info!("Removed orphaned upload s3://{bucket}/{key}"),
            Err(e) => warn!("Could not remove orphaned upload: {e}"),
        }
    }
    result
}

pub async fn insert_resume(pool: &PgPool, resume: NewResume<'_>) -> Result<ResumeRow, sqlx::Error> {
    let NewResume {
        user_id,
        file_name,
        file_key,
        content_type,
        parsed_data,
    } = resume;

    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, file_name, file_key, content_type, parsed_data)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(file_name)
    .bind(file_key)
    .bind(content_type)
    .bind(Json(parsed_data))
    .fetch_one(pool)
    .await
}

/// Newest first.
pub async fn list_resumes_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_resume_for_user(
    pool: &PgPool,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(resume_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn resume_ids_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM resumes WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn count_resumes_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}
