//! Advisory tasks: resume analysis, skill gap, salary prediction, roadmap and chat.
//!
//! `Advisor` is the capability seam. `HeuristicAdvisor` answers locally;
//! `LlmAdvisor` asks the configured model and falls back to the heuristics on
//! any failure. Every task is infallible from the caller's point of view.

use async_trait::async_trait;

use crate::llm_client::ChatMessage;

pub mod handlers;
pub mod heuristics;
pub mod llm;
pub mod models;
pub mod prompts;

pub use llm::LlmAdvisor;
pub use models::{CandidateProfile, ResumeAnalysis, Roadmap, SalaryPrediction, SkillGapReport};

#[async_trait]
pub trait Advisor: Send + Sync {
    async fn analyze_resume(&self, resume_text: &str, target_role: &str) -> ResumeAnalysis;

    /// `profile` is present when the skills came from a stored student.
    async fn skill_gap(
        &self,
        skills: &[String],
        target_role: &str,
        profile: Option<&CandidateProfile>,
    ) -> SkillGapReport;

    async fn predict_salary(&self, profile: &CandidateProfile) -> SalaryPrediction;

    /// `target_package` is in LPA.
    async fn roadmap(
        &self,
        profile: &CandidateProfile,
        career_goal: &str,
        target_package: Option<f64>,
    ) -> Roadmap;

    async fn chat(&self, message: &str, history: &[ChatMessage]) -> String;

    /// "heuristic" | "llm", reported for transparency.
    fn backend(&self) -> &'static str;
}

/// Local, deterministic advisor. Never calls out.
pub struct HeuristicAdvisor;

#[async_trait]
impl Advisor for HeuristicAdvisor {
    async fn analyze_resume(&self, resume_text: &str, target_role: &str) -> ResumeAnalysis {
        heuristics::analyze_resume(resume_text, target_role)
    }

    async fn skill_gap(
        &self,
        skills: &[String],
        target_role: &str,
        _profile: Option<&CandidateProfile>,
    ) -> SkillGapReport {
        heuristics::skill_gap(skills, target_role)
    }

    async fn predict_salary(&self, profile: &CandidateProfile) -> SalaryPrediction {
        heuristics::predict_salary(profile)
    }

    async fn roadmap(
        &self,
        _profile: &CandidateProfile,
        career_goal: &str,
        _target_package: Option<f64>,
    ) -> Roadmap {
        heuristics::roadmap(career_goal)
    }

    async fn chat(&self, _message: &str, _history: &[ChatMessage]) -> String {
        heuristics::CHAT_FALLBACK.to_string()
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}
