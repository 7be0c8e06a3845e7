//! Axum route handlers for the advisory API and the advisor configuration view.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::advisory::heuristics::DEFAULT_ROLE;
use crate::advisory::models::{
    CandidateProfile, ResumeAnalysis, Roadmap, SalaryPrediction, SkillGapReport,
};
use crate::errors::{parse_id, AppError};
use crate::llm_client::ChatMessage;
use crate::models::Student;
use crate::state::AppState;

const DEFAULT_SALARY_CGPA: f64 = 7.0;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeResumeRequest {
    pub resume_text: Option<String>,
    pub target_role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillGapRequest {
    pub student_id: Option<String>,
    pub target_role: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PredictSalaryRequest {
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: i32,
    #[serde(default)]
    pub internships: i32,
    pub branch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoadmapRequest {
    pub student_id: Option<String>,
    pub career_goal: Option<String>,
    pub target_package: Option<f64>,
}

/// A prior chat turn as sent by the client; missing fields are tolerated.
#[derive(Debug, Deserialize)]
pub struct HistoryTurn {
    #[serde(default = "default_turn_role")]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

fn default_turn_role() -> String {
    "user".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct AdvisorConfigResponse {
    pub advisor_configured: bool,
    pub advisor_key_masked: String,
    pub advisor_model: String,
}

/// Trimmed, non-empty text or `None`.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn role_or_default(role: Option<String>) -> String {
    present(role).unwrap_or_else(|| DEFAULT_ROLE.to_string())
}

/// Loads the student named by an optional id. Blank ids count as absent.
async fn optional_student(
    state: &AppState,
    raw_id: Option<String>,
) -> Result<Option<Student>, AppError> {
    let Some(raw_id) = present(raw_id) else {
        return Ok(None);
    };
    let id = parse_id("student", &raw_id)?;
    let student = state
        .store
        .get_student(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
    Ok(Some(student))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/ai/analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeResumeRequest>, JsonRejection>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let Json(req) = payload?;
    let resume_text = present(req.resume_text)
        .ok_or_else(|| AppError::Validation("Resume text is required".to_string()))?;
    let target_role = role_or_default(req.target_role);

    let advisor = state.advisor();
    info!(backend = advisor.backend(), %target_role, "Analyzing resume");
    Ok(Json(advisor.analyze_resume(&resume_text, &target_role).await))
}

/// POST /api/ai/skill-gap
///
/// A `student_id` replaces any `skills` in the body with the stored profile.
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    payload: Result<Json<SkillGapRequest>, JsonRejection>,
) -> Result<Json<SkillGapReport>, AppError> {
    let Json(req) = payload?;
    let target_role = role_or_default(req.target_role);

    let (skills, profile) = match optional_student(&state, req.student_id).await? {
        Some(student) => (student.skills.clone(), Some(CandidateProfile::from(&student))),
        None => (req.skills, None),
    };
    if skills.iter().all(|s| s.trim().is_empty()) {
        return Err(AppError::Validation("Skills are required".to_string()));
    }

    let advisor = state.advisor();
    info!(backend = advisor.backend(), %target_role, "Running skill-gap analysis");
    Ok(Json(
        advisor
            .skill_gap(&skills, &target_role, profile.as_ref())
            .await,
    ))
}

/// POST /api/ai/predict-salary
pub async fn handle_predict_salary(
    State(state): State<AppState>,
    payload: Result<Json<PredictSalaryRequest>, JsonRejection>,
) -> Result<Json<SalaryPrediction>, AppError> {
    let Json(req) = payload?;
    let profile = CandidateProfile {
        cgpa: req.cgpa.unwrap_or(DEFAULT_SALARY_CGPA),
        skills: req.skills,
        projects: req.projects,
        internships: req.internships,
        branch: present(req.branch).unwrap_or_else(|| CandidateProfile::default().branch),
        ..CandidateProfile::default()
    };

    let advisor = state.advisor();
    info!(backend = advisor.backend(), cgpa = profile.cgpa, "Predicting salary");
    Ok(Json(advisor.predict_salary(&profile).await))
}

/// POST /api/ai/roadmap
pub async fn handle_roadmap(
    State(state): State<AppState>,
    payload: Result<Json<RoadmapRequest>, JsonRejection>,
) -> Result<Json<Roadmap>, AppError> {
    let Json(req) = payload?;
    let career_goal = role_or_default(req.career_goal);
    let profile = optional_student(&state, req.student_id)
        .await?
        .map(|s| CandidateProfile::from(&s))
        .unwrap_or_default();

    let advisor = state.advisor();
    info!(backend = advisor.backend(), %career_goal, "Generating roadmap");
    Ok(Json(
        advisor
            .roadmap(&profile, &career_goal, req.target_package)
            .await,
    ))
}

/// POST /api/ai/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload?;
    let message = present(req.message)
        .ok_or_else(|| AppError::Validation("Message is required".to_string()))?;
    let history: Vec<ChatMessage> = req
        .history
        .into_iter()
        .map(|turn| ChatMessage {
            role: turn.role,
            content: turn.content,
        })
        .collect();

    let response = state.advisor().chat(&message, &history).await;
    Ok(Json(ChatResponse { response }))
}

/// GET /api/config
pub async fn handle_advisor_config(State(state): State<AppState>) -> Json<AdvisorConfigResponse> {
    Json(AdvisorConfigResponse {
        advisor_configured: state.llm.is_some(),
        advisor_key_masked: state.config.masked_advisor_key(),
        advisor_model: state.config.advisor_model.clone(),
    })
}
