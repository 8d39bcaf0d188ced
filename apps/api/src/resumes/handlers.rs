use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::auth::HrUser;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::extract::{extract_text, sanitize_file_name, ResumeFormat};
use crate::resumes::store::{
    discard_upload_on_error, insert_resume, list_resumes_for_user, resume_object_key,
    upload_resume_file, NewResume,
};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

async fn read_file_field(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".to_string()));
        }
        if bytes.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "uploaded file exceeds the {max_bytes} byte limit"
            )));
        }

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}

/// POST /api/v1/resumes
///
/// Extracts text, runs field extraction, stores the original file, then
/// records the resume. A failed model call or insert leaves nothing behind.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    user: HrUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let upload = read_file_field(&mut multipart, state.config.max_upload_bytes).await?;
    let format = ResumeFormat::detect(upload.content_type.as_deref(), &upload.file_name)?;

    let text = extract_text(format, upload.bytes.to_vec()).await?;
    let parsed = state.orchestrator.extract_resume_fields(&text).await?;

    let safe_name = sanitize_file_name(&upload.file_name);
    let file_key = resume_object_key(user.id(), Uuid::new_v4(), &safe_name);
    upload_resume_file(
        &state.s3,
        &state.config.s3_bucket,
        &file_key,
        upload.bytes,
        format.content_type(),
    )
    .await?;

    let inserted = insert_resume(
        &state.db,
        NewResume {
            user_id: user.id(),
            file_name: &upload.file_name,
            file_key: &file_key,
            content_type: format.content_type(),
            parsed_data: &parsed,
        },
    )
    .await
    .map_err(AppError::from);
    let row =
        discard_upload_on_error(&state.s3, &state.config.s3_bucket, &file_key, inserted).await?;

    info!("Stored resume {} for user {}", row.id, user.id());
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: HrUser,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let resumes = list_resumes_for_user(&state.db, user.id()).await?;
    Ok(Json(resumes))
}
