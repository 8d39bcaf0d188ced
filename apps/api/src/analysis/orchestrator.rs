//! Turns resumes and job descriptions into prompts, and model output back into
//! typed results.
//!
//! Each operation builds one prompt, makes one model call and decodes the
//! reply. Nothing is cached or retried here; callers own their retry policy.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::decode::{decode_response, Envelope};
use crate::analysis::models::{FitAnalysis, InterviewQuestionSet, ParsedResume, RedFlagReport};
use crate::analysis::prompts::{
    EXTRACT_RESUME_TEMPLATE, INTERVIEW_QUESTIONS_TEMPLATE, INTERVIEW_QUESTION_COUNT,
    RED_FLAGS_TEMPLATE, SCORE_FIT_TEMPLATE,
};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{LlmError, TextGenerator};

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The model call itself failed (network, auth, quota, provider error).
    #[error("model invocation failed during {operation}: {source}")]
    ModelInvocation {
        operation: Operation,
        #[source]
        source: LlmError,
    },

    /// The call succeeded but the reply could not be decoded into the expected shape.
    #[error("could not decode {operation} response: {reason}")]
    ResponseDecode {
        operation: Operation,
        reason: String,
        raw: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ExtractResumeFields,
    ScoreFit,
    DetectRedFlags,
    GenerateInterviewQuestions,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ExtractResumeFields => "extract_resume_fields",
            Operation::ScoreFit => "score_fit",
            Operation::DetectRedFlags => "detect_red_flags",
            Operation::GenerateInterviewQuestions => "generate_interview_questions",
        }
    }

    fn envelope(self) -> Envelope {
        match self {
            Operation::GenerateInterviewQuestions => Envelope::Array,
            _ => Envelope::Object,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    model: Arc<dyn TextGenerator>,
}

impl AnalysisOrchestrator {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    pub async fn extract_resume_fields(
        &self,
        resume_text: &str,
    ) -> Result<ParsedResume, AnalysisError> {
        let prompt = build_extract_prompt(resume_text);
        self.run(Operation::ExtractResumeFields, &prompt).await
    }

    pub async fn score_fit(
        &self,
        resume: &ParsedResume,
        job_description: &str,
    ) -> Result<FitAnalysis, AnalysisError> {
        let prompt = build_score_fit_prompt(resume, job_description);
        self.run(Operation::ScoreFit, &prompt).await
    }

    pub async fn detect_red_flags(
        &self,
        resume: &ParsedResume,
    ) -> Result<RedFlagReport, AnalysisError> {
        let prompt = build_red_flags_prompt(resume);
        self.run(Operation::DetectRedFlags, &prompt).await
    }

    pub async fn generate_interview_questions(
        &self,
        resume: &ParsedResume,
        job_description: &str,
    ) -> Result<InterviewQuestionSet, AnalysisError> {
        let prompt = build_interview_questions_prompt(resume, job_description);
        self.run(Operation::GenerateInterviewQuestions, &prompt).await
    }

    async fn run<T: DeserializeOwned>(
        &self,
        operation: Operation,
        prompt: &str,
    ) -> Result<T, AnalysisError> {
        debug!(
            "{operation}: sending {} prompt chars to {}",
            prompt.len(),
            self.model.model()
        );

        let raw = self
            .model
            .generate(prompt)
            .await
            .map_err(|source| AnalysisError::ModelInvocation { operation, source })?;

        match decode_response::<T>(&raw, operation.envelope()) {
            Ok(result) => {
                info!("{operation}: decoded model response");
                Ok(result)
            }
            Err(failure) => {
                warn!(
                    "{operation}: undecodable model response ({}). Raw response: {raw}",
                    failure.reason
                );
                Err(AnalysisError::ResponseDecode {
                    operation,
                    reason: failure.reason,
                    raw,
                })
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders (pure functions of their inputs)
// ────────────────────────────────────────────────────────────────────────────

pub fn build_extract_prompt(resume_text: &str) -> String {
    fill_template(
        EXTRACT_RESUME_TEMPLATE,
        &[("resume_text", resume_text), ("json_only", JSON_ONLY_INSTRUCTION)],
    )
}

pub fn build_score_fit_prompt(resume: &ParsedResume, job_description: &str) -> String {
    let resume_json = resume_to_json(resume);
    fill_template(
        SCORE_FIT_TEMPLATE,
        &[
            ("resume_json", &resume_json),
            ("job_description", job_description),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

pub fn build_red_flags_prompt(resume: &ParsedResume) -> String {
    let resume_json = resume_to_json(resume);
    fill_template(
        RED_FLAGS_TEMPLATE,
        &[("resume_json", &resume_json), ("json_only", JSON_ONLY_INSTRUCTION)],
    )
}

pub fn build_interview_questions_prompt(resume: &ParsedResume, job_description: &str) -> String {
    let resume_json = resume_to_json(resume);
    let count = INTERVIEW_QUESTION_COUNT.to_string();
    fill_template(
        INTERVIEW_QUESTIONS_TEMPLATE,
        &[
            ("question_count", &count),
            ("resume_json", &resume_json),
            ("job_description", job_description),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

fn resume_to_json(resume: &ParsedResume) -> String {
    // ParsedResume is plain strings and lists; serialization cannot fail.
    serde_json::to_string(resume).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{QuestionCategory, Severity};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stub model: replays a fixed reply and records every prompt it sees.
    struct StubModel {
        reply: Result<String, (u16, String)>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubModel {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16, message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err((status, message.to_string())),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl TextGenerator for StubModel {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err((status, message)) => Err(LlmError::Api {
                    status: *status,
                    message: message.clone(),
                }),
            }
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn orchestrator(model: &Arc<StubModel>) -> AnalysisOrchestrator {
        AnalysisOrchestrator::new(model.clone())
    }

    fn sample_resume() -> ParsedResume {
        ParsedResume {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            skills: vec!["Go".to_string(), "SQL".to_string()],
            ..Default::default()
        }
    }

    const FIT_JSON: &str = r#"{
        "score": 78,
        "analysis": "Solid backend background.",
        "strengths": ["Go", "SQL"],
        "weaknesses": ["No Kubernetes"],
        "redFlags": [],
        "recommendedQuestions": ["Describe a schema migration you led."]
    }"#;

    const RED_FLAGS_JSON: &str = r#"{
        "redFlags": [
            {"type": "gap", "description": "Nine months without a role in 2022", "severity": "medium"},
            {"type": "job_hopping", "description": "Four roles in three years", "severity": "severe"}
        ],
        "summary": "Minor timeline concerns."
    }"#;

    const QUESTIONS_JSON: &str = r#"[
        {"question": "How do you tune SQL queries?", "rationale": "Core skill", "category": "technical"},
        {"question": "Tell me about a disagreement.", "rationale": "Teamwork", "category": "behavioral"},
        {"question": "Walk me through your last project.", "rationale": "Depth", "category": "experience"}
    ]"#;

    // ── well-formed replies ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_extract_resume_fields_direct_json() {
        let model = StubModel::replying(
            r#"{"name":"Jane Doe","email":"jane@x.com","phone":"555","linkedin":"in/jane",
               "education":[{"institution":"State U","degree":"BSc","field":"CS","startDate":"2012","endDate":"2016"}],
               "experience":[{"company":"Acme","role":"Engineer","startDate":"2016","endDate":"2020","description":"APIs"}],
               "skills":["Go"],
               "certifications":[{"name":"CKA","issuer":"CNCF","date":"2021"}]}"#,
        );
        let parsed = orchestrator(&model)
            .extract_resume_fields("Jane Doe resume")
            .await
            .unwrap();

        assert_eq!(parsed.phone.as_deref(), Some("555"));
        assert_eq!(parsed.education[0].field.as_deref(), Some("CS"));
        assert_eq!(parsed.experience[0].company, "Acme");
        assert_eq!(parsed.certifications[0].issuer.as_deref(), Some("CNCF"));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_score_fit_direct_json_keeps_every_field() {
        let model = StubModel::replying(FIT_JSON);
        let fit = orchestrator(&model)
            .score_fit(&sample_resume(), "Backend engineer, Go")
            .await
            .unwrap();

        assert_eq!(fit.score, 78);
        assert_eq!(fit.strengths, vec!["Go", "SQL"]);
        assert_eq!(fit.weaknesses, vec!["No Kubernetes"]);
        assert!(fit.red_flags.is_empty());
        assert_eq!(fit.recommended_questions.len(), 1);
    }

    #[tokio::test]
    async fn test_detect_red_flags_coerces_unknown_severity() {
        let model = StubModel::replying(RED_FLAGS_JSON);
        let report = orchestrator(&model)
            .detect_red_flags(&sample_resume())
            .await
            .unwrap();

        assert_eq!(report.red_flags.len(), 2);
        assert_eq!(report.red_flags[0].severity, Severity::Medium);
        assert_eq!(report.red_flags[1].severity, Severity::Unknown);
        assert_eq!(report.summary, "Minor timeline concerns.");
    }

    #[tokio::test]
    async fn test_generate_interview_questions_preserves_order() {
        let model = StubModel::replying(QUESTIONS_JSON);
        let questions = orchestrator(&model)
            .generate_interview_questions(&sample_resume(), "Backend engineer")
            .await
            .unwrap();

        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].category, QuestionCategory::Technical);
        assert_eq!(questions[1].category, QuestionCategory::Behavioral);
        assert_eq!(questions[2].question, "Walk me through your last project.");
    }

    // ── salvage scan ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_extract_resume_fields_salvages_fenced_reply() {
        let model = StubModel::replying(
            "Here is the JSON:\n```json\n{\"name\":\"Jane Doe\",\"email\":\"jane@x.com\",\"skills\":[\"Go\",\"SQL\"]}\n```",
        );
        let parsed = orchestrator(&model)
            .extract_resume_fields("Jane Doe, jane@x.com\nSkills: Go, SQL")
            .await
            .unwrap();

        assert_eq!(parsed.name.as_deref(), Some("Jane Doe"));
        assert_eq!(parsed.email.as_deref(), Some("jane@x.com"));
        assert_eq!(parsed.skills, vec!["Go", "SQL"]);
        assert!(parsed.phone.is_none());
        assert!(parsed.linkedin.is_none());
        assert!(parsed.education.is_empty());
        assert!(parsed.experience.is_empty());
        assert!(parsed.certifications.is_empty());
    }

    #[tokio::test]
    async fn test_score_fit_salvages_prefixed_reply() {
        let model = StubModel::replying(&format!("Based on my review:\n{FIT_JSON}\nHope this helps."));
        let fit = orchestrator(&model)
            .score_fit(&sample_resume(), "Backend engineer")
            .await
            .unwrap();
        assert_eq!(fit.score, 78);
    }

    #[tokio::test]
    async fn test_detect_red_flags_salvages_fenced_reply() {
        let model = StubModel::replying(&format!("```json\n{RED_FLAGS_JSON}\n```"));
        let report = orchestrator(&model)
            .detect_red_flags(&sample_resume())
            .await
            .unwrap();
        assert_eq!(report.red_flags.len(), 2);
    }

    #[tokio::test]
    async fn test_generate_interview_questions_salvages_fenced_reply() {
        let model = StubModel::replying(&format!("Sure! Questions below.\n```json\n{QUESTIONS_JSON}\n```"));
        let questions = orchestrator(&model)
            .generate_interview_questions(&sample_resume(), "Backend engineer")
            .await
            .unwrap();
        assert_eq!(questions.len(), 3);
    }

    // ── failures ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_each_operation_fails_on_prose_only_reply() {
        let prose = "I'm sorry, I cannot evaluate this candidate without more detail.";
        let model = StubModel::replying(prose);
        let orch = orchestrator(&model);
        let resume = sample_resume();

        let errors = vec![
            orch.extract_resume_fields("text").await.unwrap_err(),
            orch.score_fit(&resume, "job").await.unwrap_err(),
            orch.detect_red_flags(&resume).await.unwrap_err(),
            orch.generate_interview_questions(&resume, "job").await.unwrap_err(),
        ];

        for err in errors {
            match err {
                AnalysisError::ResponseDecode { raw, .. } => assert_eq!(raw, prose),
                other => panic!("expected ResponseDecode, got {other:?}"),
            }
        }
        assert_eq!(model.calls(), 4);
    }

    #[tokio::test]
    async fn test_detect_red_flags_plain_prose_is_decode_error() {
        let model = StubModel::replying("The candidate looks fine overall. No concerns.");
        let err = orchestrator(&model)
            .detect_red_flags(&sample_resume())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ResponseDecode {
                operation: Operation::DetectRedFlags,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_interview_questions_reject_bare_object() {
        let bare = r#"{"question": "Why Go?", "rationale": "fit", "category": "technical"}"#;
        let model = StubModel::replying(bare);
        let err = orchestrator(&model)
            .generate_interview_questions(&sample_resume(), "job")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ResponseDecode { .. }));

        // The same reply would satisfy an object-shaped operation's scan.
        let model = StubModel::replying(&format!("Note: {bare}"));
        let parsed = orchestrator(&model).extract_resume_fields("text").await;
        assert!(parsed.is_ok());
    }

    #[tokio::test]
    async fn test_partial_fit_analysis_is_rejected() {
        let model = StubModel::replying(r#"{"analysis": "Looks good", "strengths": ["Go"]}"#);
        let err = orchestrator(&model)
            .score_fit(&sample_resume(), "job")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ResponseDecode { .. }));
    }

    #[tokio::test]
    async fn test_score_fit_rejects_array_wrapped_object() {
        let model = StubModel::replying(r#"[{"score": 80, "analysis": "good"}]"#);
        let err = orchestrator(&model)
            .score_fit(&sample_resume(), "job")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ResponseDecode {
                operation: Operation::ScoreFit,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_extract_resume_fields_keeps_resume_with_incomplete_entries() {
        let model = StubModel::replying(
            r#"{"name": "Jane Doe", "skills": null, "certifications": [{"issuer": "AWS"}], "experience": [{"company": null, "role": "Engineer"}]}"#,
        );
        let parsed = orchestrator(&model)
            .extract_resume_fields("Jane Doe resume")
            .await
            .unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Jane Doe"));
        assert!(parsed.skills.is_empty());
        assert_eq!(parsed.certifications.len(), 1);
        assert_eq!(parsed.experience[0].role, "Engineer");
    }

    #[tokio::test]
    async fn test_score_fit_out_of_range_score_is_not_rejected() {
        let model = StubModel::replying(
            r#"{"score": 101, "analysis": "Exceptional", "strengths": [], "weaknesses": [], "redFlags": [], "recommendedQuestions": []}"#,
        );
        let fit = orchestrator(&model)
            .score_fit(&sample_resume(), "job")
            .await
            .unwrap();
        assert_eq!(fit.score, 101);
    }

    #[tokio::test]
    async fn test_model_failure_is_invocation_error_without_retry() {
        let model = StubModel::failing(429, "quota exhausted");
        let err = orchestrator(&model)
            .score_fit(&sample_resume(), "job")
            .await
            .unwrap_err();

        match err {
            AnalysisError::ModelInvocation { operation, source } => {
                assert_eq!(operation, Operation::ScoreFit);
                assert!(matches!(source, LlmError::Api { status: 429, .. }));
            }
            other => panic!("expected ModelInvocation, got {other:?}"),
        }
        assert_eq!(model.calls(), 1);
    }

    // ── round trip & prompts ───────────────────────────────────────────────

    #[test]
    fn test_fit_analysis_round_trips_through_decoder() {
        let original = FitAnalysis {
            score: 64,
            analysis: "Partial match".to_string(),
            strengths: vec!["SQL".to_string()],
            weaknesses: vec!["No Go".to_string()],
            red_flags: vec!["Short tenure".to_string()],
            recommended_questions: vec!["Why leave after 8 months?".to_string()],
        };
        let text = serde_json::to_string(&original).unwrap();
        let decoded: FitAnalysis = decode_response(&text, Envelope::Object).unwrap();
        assert_eq!(decoded, original);
    }

    #[tokio::test]
    async fn test_prompts_embed_inputs_verbatim() {
        let model = StubModel::replying(FIT_JSON);
        let orch = orchestrator(&model);

        orch.score_fit(&sample_resume(), "Senior Go engineer, {remote}")
            .await
            .unwrap();
        let prompt = model.last_prompt();
        assert!(prompt.contains("Senior Go engineer, {remote}"));
        assert!(prompt.contains(r#""name":"Jane Doe""#));
        assert!(prompt.contains(JSON_ONLY_INSTRUCTION));
        assert!(prompt.contains(r#""recommendedQuestions": [string]"#));
    }

    #[test]
    fn test_extract_prompt_embeds_resume_text() {
        let prompt = build_extract_prompt("Jane Doe, jane@x.com\nSkills: Go, SQL");
        assert!(prompt.contains("Jane Doe, jane@x.com\nSkills: Go, SQL"));
        assert!(prompt.contains("\"certifications\""));
    }

    #[test]
    fn test_red_flags_prompt_lists_concerns() {
        let prompt = build_red_flags_prompt(&sample_resume());
        assert!(prompt.contains("Gaps in employment"));
        assert!(prompt.contains("Frequent job changes"));
        assert!(!prompt.contains("{resume_json}"));
    }

    #[test]
    fn test_interview_prompt_asks_for_array_and_count() {
        let prompt = build_interview_questions_prompt(&sample_resume(), "Data engineer");
        assert!(prompt.starts_with("Generate 5 tailored interview questions"));
        assert!(prompt.contains("JSON array"));
        assert!(prompt.contains("Data engineer"));
    }

    #[test]
    fn test_prompt_builders_are_deterministic() {
        let resume = sample_resume();
        assert_eq!(
            build_score_fit_prompt(&resume, "job"),
            build_score_fit_prompt(&resume, "job")
        );
    }
}
