//! Model-backed advisor. Every task substitutes the heuristic answer when the
//! call fails for any reason: transport, status, empty or unparseable reply,
//! or a reply that parses but leaves the schema's fields unset.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::advisory::models::{
    CandidateProfile, Complete, ResumeAnalysis, Roadmap, SalaryPrediction, SkillGapReport,
};
use crate::advisory::{heuristics, prompts, Advisor};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SCHEMA_INSTRUCTION};
use crate::llm_client::{ChatMessage, LlmClient, LlmError};

/// Prior turns forwarded with each chat message.
pub const CHAT_HISTORY_TURNS: usize = 6;

pub struct LlmAdvisor {
    client: LlmClient,
}

impl LlmAdvisor {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    async fn structured<T>(&self, task: &'static str, prompt: String) -> Result<T, LlmError>
    where
        T: serde::de::DeserializeOwned + Complete,
    {
        let prompt = format!("{prompt}\n\n{SCHEMA_INSTRUCTION}");
        let reply = self.client.call_json::<T>(&prompt, JSON_ONLY_SYSTEM).await?;
        if !reply.is_complete() {
            return Err(LlmError::SchemaMismatch(task));
        }
        info!(task, model = self.client.model(), "Advisory call succeeded");
        Ok(reply)
    }
}

fn fallback<T>(task: &str, result: Result<T, LlmError>, local: impl FnOnce() -> T) -> T {
    result.unwrap_or_else(|e| {
        warn!(task, error = %e, "Advisory call failed, using heuristic result");
        local()
    })
}

fn profile_line(profile: &CandidateProfile) -> String {
    format!(
        "Student CGPA: {}, Projects: {}, Internships: {}, Branch: {}",
        profile.cgpa, profile.projects, profile.internships, profile.branch
    )
}

/// Keeps the most recent turns only.
pub fn recent_history(history: &[ChatMessage]) -> &[ChatMessage] {
    let start = history.len().saturating_sub(CHAT_HISTORY_TURNS);
    &history[start..]
}

#[async_trait]
impl Advisor for LlmAdvisor {
    async fn analyze_resume(&self, resume_text: &str, target_role: &str) -> ResumeAnalysis {
        let prompt = prompts::fill(
            prompts::RESUME_ANALYSIS,
            &[
                ("target_role", target_role.to_string()),
                ("resume_text", resume_text.to_string()),
            ],
        );
        let result = self.structured("analyze_resume", prompt).await;
        fallback("analyze_resume", result, || {
            heuristics::analyze_resume(resume_text, target_role)
        })
    }

    async fn skill_gap(
        &self,
        skills: &[String],
        target_role: &str,
        profile: Option<&CandidateProfile>,
    ) -> SkillGapReport {
        let prompt = prompts::fill(
            prompts::SKILL_GAP,
            &[
                ("target_role", target_role.to_string()),
                ("skills", skills.join(", ")),
                ("student_info", profile.map(profile_line).unwrap_or_default()),
            ],
        );
        let result = self.structured("skill_gap", prompt).await;
        fallback("skill_gap", result, || heuristics::skill_gap(skills, target_role))
    }

    async fn predict_salary(&self, profile: &CandidateProfile) -> SalaryPrediction {
        let prompt = prompts::fill(
            prompts::SALARY_PREDICTION,
            &[
                ("cgpa", profile.cgpa.to_string()),
                ("skills", profile.skills.join(", ")),
                ("projects", profile.projects.to_string()),
                ("internships", profile.internships.to_string()),
                ("branch", profile.branch.clone()),
            ],
        );
        let result = self.structured("predict_salary", prompt).await;
        fallback("predict_salary", result, || heuristics::predict_salary(profile))
    }

    async fn roadmap(
        &self,
        profile: &CandidateProfile,
        career_goal: &str,
        target_package: Option<f64>,
    ) -> Roadmap {
        let package_line = target_package
            .map(|p| format!("- Target package: {p} LPA"))
            .unwrap_or_default();
        let prompt = prompts::fill(
            prompts::ROADMAP,
            &[
                ("name", profile.name.clone()),
                ("branch", profile.branch.clone()),
                ("cgpa", profile.cgpa.to_string()),
                ("skills", profile.skills.join(", ")),
                ("projects", profile.projects.to_string()),
                ("internships", profile.internships.to_string()),
                ("target_package", package_line),
                ("career_goal", career_goal.to_string()),
            ],
        );
        let result = self.structured("roadmap", prompt).await;
        fallback("roadmap", result, || heuristics::roadmap(career_goal))
    }

    async fn chat(&self, message: &str, history: &[ChatMessage]) -> String {
        let result = self
            .client
            .chat(prompts::CHAT_SYSTEM, recent_history(history), message)
            .await;
        fallback("chat", result, || heuristics::CHAT_FALLBACK.to_string())
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}
