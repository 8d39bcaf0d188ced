//! Plain-text extraction from uploaded resume files.

use anyhow::anyhow;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    /// Detects the format from the declared content type, falling back to the
    /// file extension when the client sent `application/octet-stream` or nothing.
    pub fn detect(content_type: Option<&str>, file_name: &str) -> Result<Self, AppError> {
        let declared = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match (declared.as_deref(), extension.as_str()) {
            (Some("application/pdf"), _) | (None, "pdf") => Ok(ResumeFormat::Pdf),
            (Some("text/plain"), _) | (None, "txt") => Ok(ResumeFormat::PlainText),
            (Some("application/msword"), _)
            | (Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"), _)
            | (None, "doc" | "docx") => Err(AppError::UnsupportedMediaType(
                "Word documents cannot be read yet. Please upload a PDF or TXT file.".to_string(),
            )),
            _ => Err(AppError::UnsupportedMediaType(
                "Please upload a PDF or TXT file.".to_string(),
            )),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "application/pdf",
            ResumeFormat::PlainText => "text/plain",
        }
    }
}

/// Extracts text. PDF parsing is CPU-bound and runs on the blocking pool.
pub async fn extract_text(format: ResumeFormat, bytes: Vec<u8>) -> Result<String, AppError> {
    let text = match format {
        ResumeFormat::PlainText => String::from_utf8(bytes)
            .map_err(|_| AppError::Validation("text file is not valid UTF-8".to_string()))?,
        ResumeFormat::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow!("pdf extraction task panicked: {e}")))?
        .map_err(|e| AppError::Validation(format!("could not read PDF: {e}")))?,
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(
            "no readable text found in the uploaded resume".to_string(),
        ));
    }
    Ok(text)
}

/// Keeps a file name safe for use inside an object key.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}
