use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::models::ParsedResume;

/// A stored resume. `parsed_data` is decoded into `ParsedResume` on read;
/// a row whose JSON no longer matches the shape fails the query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_key: String,
    pub content_type: String,
    pub parsed_data: Json<ParsedResume>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
