use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::fitment::FitmentSummary;
use crate::analysis::models::{FitAnalysis, InterviewQuestionSet};

/// What an analysis result row holds, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisPayload {
    Fit {
        analysis: FitAnalysis,
        fitment: FitmentSummary,
    },
    InterviewQuestions {
        questions: InterviewQuestionSet,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisResultRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub results: Json<AnalysisPayload>,
    pub created_at: DateTime<Utc>,
}
