//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::catalog::{CatalogEntry, SkillCategory};
use crate::analysis::models::AnalysisResult;
use crate::analysis::scorer::ScoringProfile;
use crate::documents::{self, check_size, DocumentError, DocumentKind, ResumeUpload};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub optimized: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSource {
    File,
    Text,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub analysis_id: Uuid,
    pub resume_length: usize,
    pub job_description_length: usize,
    pub source: ResumeSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_kind: Option<DocumentKind>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub data: AnalysisResult,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategoriesResponse {
    pub profile: ScoringProfile,
    pub categories: Vec<SkillCategory>,
    pub keywords: Vec<CatalogEntry>,
}

/// Validated inputs for one analysis, whichever endpoint they came from.
struct AnalysisRequest {
    resume_text: String,
    job_description: String,
    optimized: bool,
    source: ResumeSource,
    document_kind: Option<DocumentKind>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-resume
///
/// Multipart fields: `resume` (file) or `resumeText`, `jobDescription`,
/// optional `optimized`. A file takes precedence over pasted text.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut upload: Option<ResumeUpload> = None;
    let mut resume_text: Option<String> = None;
    let mut job_description: Option<String> = None;
    let mut optimized: Option<bool> = None;
    let limit = state.config.max_upload_bytes;
    let field_error = move |err: MultipartError| multipart_error(err, limit);

    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(field_error)?;
                upload = Some(ResumeUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            "resumeText" => resume_text = Some(field.text().await.map_err(field_error)?),
            "jobDescription" => {
                job_description = Some(field.text().await.map_err(field_error)?)
            }
            "optimized" => {
                let raw = field.text().await.map_err(field_error)?;
                optimized = Some(parse_flag(&raw)?);
            }
            _ => {}
        }
    }

    let optimized = optimized.unwrap_or(state.config.optimized_scoring);
    // reject before any extraction work
    let job_description = required(job_description)?;

    let request = match upload {
        Some(upload) => {
            let kind = DocumentKind::detect(
                upload.content_type.as_deref(),
                upload.file_name.as_deref(),
            )
            .map_err(|e| {
                warn!(file_name = ?upload.file_name, "Rejected upload: {e}");
                AppError::from(e)
            })?;

            if !state.config.accepts_mime(kind.mime()) {
                warn!(kind = ?kind, "Rejected upload: type disabled by configuration");
                return Err(DocumentError::UnsupportedType(kind.mime().to_string()).into());
            }

            check_size(upload.data.len(), state.config.max_upload_bytes).map_err(|e| {
                warn!("Rejected upload: {e}");
                AppError::from(e)
            })?;

            let text = documents::extract_text(upload, kind).await?;
            AnalysisRequest {
                resume_text: text,
                job_description,
                optimized,
                source: ResumeSource::File,
                document_kind: Some(kind),
            }
        }
        None => AnalysisRequest {
            resume_text: resume_text.ok_or_else(|| {
                AppError::Validation(
                    "Provide a resume file in 'resume' or its text in 'resumeText'".to_string(),
                )
            })?,
            job_description,
            optimized,
            source: ResumeSource::Text,
            document_kind: None,
        },
    };

    run_analysis(&state, request).await.map(Json)
}

/// POST /api/analyze-text
///
/// JSON body `{resumeText, jobDescription, optimized?}`.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let request = AnalysisRequest {
        resume_text: required(request.resume_text)?,
        job_description: required(request.job_description)?,
        optimized: request.optimized.unwrap_or(state.config.optimized_scoring),
        source: ResumeSource::Text,
        document_kind: None,
    };

    run_analysis(&state, request).await.map(Json)
}

/// GET /api/skill-categories
///
/// The active catalog: category weights and every keyword with its weight.
pub async fn handle_skill_categories(
    State(state): State<AppState>,
) -> Json<SkillCategoriesResponse> {
    let catalog = state.scorer.catalog();
    Json(SkillCategoriesResponse {
        profile: state.scorer.profile(),
        categories: catalog.categories.clone(),
        keywords: catalog.entries.clone(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Shared pipeline
// ────────────────────────────────────────────────────────────────────────────

async fn run_analysis(
    state: &AppState,
    request: AnalysisRequest,
) -> Result<AnalyzeResponse, AppError> {
    let resume_length = request.resume_text.trim().chars().count();
    if resume_length < state.config.min_resume_chars {
        return Err(AppError::Validation(format!(
            "Resume text is too short ({resume_length} characters, minimum {})",
            state.config.min_resume_chars
        )));
    }

    let job_description_length = request.job_description.chars().count();
    let scorer = state.scorer.clone();
    let AnalysisRequest {
        resume_text,
        job_description,
        optimized,
        source,
        document_kind,
    } = request;

    // Scoring is CPU-bound; keep it off the async executor.
    let data = tokio::task::spawn_blocking(move || {
        scorer.analyze(&resume_text, &job_description, optimized)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in analysis: {e}")))?;

    let analysis_id = Uuid::new_v4();
    info!(
        %analysis_id,
        profile = %data.profile,
        score = data.overall_score,
        source = ?source,
        resume_length,
        job_description_length,
        "Resume analyzed"
    );

    Ok(AnalyzeResponse {
        success: true,
        data,
        metadata: AnalysisMetadata {
            analysis_id,
            resume_length,
            job_description_length,
            source,
            document_kind,
            analyzed_at: Utc::now(),
        },
    })
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Rejected upload: request body over limit");
        return AppError::PayloadTooLarge { limit };
    }
    AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
}

fn required(value: Option<String>) -> Result<String, AppError> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        AppError::Validation("Both resume text and job description are required".to_string())
    })
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::Validation(format!(
            "'optimized' must be true or false, got '{other}'"
        ))),
    }
}
