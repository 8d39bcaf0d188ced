use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::analysis::AnalysisOrchestrator;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Every model-backed operation goes through here.
    pub orchestrator: AnalysisOrchestrator,
    pub config: Config,
}
