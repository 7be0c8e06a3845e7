//! Response schemas shared by every advisor backend.
//!
//! All fields default so a model reply that omits one still deserializes.
//! A reply must still pass [`Complete::is_complete`] before it is used.

use serde::{Deserialize, Serialize};

use crate::models::Student;

/// Months in every career roadmap.
pub const ROADMAP_MONTHS: u32 = 6;

/// Whether a deserialized reply carries the fields the schema is about.
/// Defaults alone (`{}` or unrelated keys) never count.
pub trait Complete {
    fn is_complete(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeAnalysis {
    pub skills_found: Vec<String>,
    pub experience_years: f64,
    pub education: String,
    pub match_score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningStep {
    pub skill: String,
    pub resource: String,
    pub duration: String,
    pub priority: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGapReport {
    pub missing_skills: Vec<String>,
    pub skills_to_improve: Vec<String>,
    pub learning_path: Vec<LearningStep>,
    pub estimated_time_to_ready: String,
    pub match_percentage: u32,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryFactor {
    pub factor: String,
    /// "positive", "neutral" or "negative".
    pub impact: String,
    pub detail: String,
}

/// Salary figures are in LPA.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryPrediction {
    pub predicted_min_lpa: f64,
    pub predicted_max_lpa: f64,
    pub predicted_avg_lpa: f64,
    pub confidence: String,
    pub factors: Vec<SalaryFactor>,
    pub recommendations_to_increase: Vec<String>,
    pub market_insight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapMonth {
    pub month: u32,
    pub title: String,
    pub focus_areas: Vec<String>,
    pub skills_to_learn: Vec<String>,
    pub projects: Vec<String>,
    pub certifications: Vec<String>,
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roadmap {
    pub career_goal: String,
    pub current_readiness: u32,
    pub months: Vec<RoadmapMonth>,
    pub resources: Vec<String>,
    pub tips: Vec<String>,
}

impl Complete for ResumeAnalysis {
    fn is_complete(&self) -> bool {
        !self.skills_found.is_empty() || !self.summary.trim().is_empty()
    }
}

impl Complete for SkillGapReport {
    fn is_complete(&self) -> bool {
        !self.estimated_time_to_ready.trim().is_empty()
            || !self.missing_skills.is_empty()
            || !self.learning_path.is_empty()
    }
}

impl Complete for SalaryPrediction {
    fn is_complete(&self) -> bool {
        self.predicted_avg_lpa > 0.0
            && self.predicted_min_lpa >= 0.0
            && self.predicted_min_lpa <= self.predicted_max_lpa
    }
}

impl Complete for Roadmap {
    fn is_complete(&self) -> bool {
        self.months.len() == ROADMAP_MONTHS as usize
    }
}

/// The slice of a student record the advisory tasks look at.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    pub name: String,
    pub branch: String,
    pub cgpa: f64,
    pub skills: Vec<String>,
    pub projects: i32,
    pub internships: i32,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            name: "Student".to_string(),
            branch: "Computer Science".to_string(),
            cgpa: 7.0,
            skills: Vec::new(),
            projects: 0,
            internships: 0,
        }
    }
}

impl From<&Student> for CandidateProfile {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            branch: student.branch.clone(),
            cgpa: student.cgpa,
            skills: student.skills.clone(),
            projects: student.projects,
            internships: student.internships,
        }
    }
}
