//! Deterministic local estimates used whenever the advisory service is
//! unavailable or fails. Pure functions: no I/O, no randomness, never fail.

use crate::advisory::models::{
    CandidateProfile, LearningStep, ResumeAnalysis, Roadmap, RoadmapMonth, SalaryFactor,
    SalaryPrediction, SkillGapReport, ROADMAP_MONTHS,
};

/// Terms the resume scan looks for, matched against whitespace-separated tokens.
pub const RESUME_VOCABULARY: [&str; 16] = [
    "python",
    "java",
    "javascript",
    "react",
    "node",
    "sql",
    "html",
    "css",
    "c++",
    "machine",
    "learning",
    "flask",
    "django",
    "aws",
    "docker",
    "git",
];

const RESUME_SCORE_PER_TERM: usize = 10;
const RESUME_SCORE_CAP: usize = 85;

pub const DEFAULT_ROLE: &str = "Software Engineer";

/// Built-in requirement lists. Unknown roles use the first entry.
pub const ROLE_REQUIREMENTS: [(&str, &[&str]); 4] = [
    (
        "Software Engineer",
        &["DSA", "System Design", "Python", "Java", "Git", "SQL", "REST APIs"],
    ),
    (
        "Data Scientist",
        &["Python", "Machine Learning", "Statistics", "SQL", "TensorFlow", "Pandas"],
    ),
    (
        "Web Developer",
        &["HTML", "CSS", "JavaScript", "React", "Node.js", "MongoDB", "Git"],
    ),
    (
        "DevOps Engineer",
        &["Docker", "Kubernetes", "AWS", "CI/CD", "Linux", "Terraform"],
    ),
];

const GAP_PENALTY_PER_SKILL: usize = 15;
const LEARNING_PATH_LEN: usize = 5;

const SALARY_BASE_LPA: f64 = 3.5;
const SALARY_CGPA_FLOOR: f64 = 6.0;
const SALARY_PER_CGPA_POINT: f64 = 1.2;
const SALARY_PER_SKILL: f64 = 0.3;
const SALARY_PER_PROJECT: f64 = 0.4;
const SALARY_PER_INTERNSHIP: f64 = 0.8;
const SALARY_MIN_LPA: f64 = 2.5;

const ROADMAP_READINESS: u32 = 40;

const SETUP_HINT: &str = "Configure the advisory service API key for personalized analysis";

pub const CHAT_FALLBACK: &str = "I'm the placement assistant! Full AI-powered answers need the \
    advisory service API key to be configured. In the meantime: consistent practice, building \
    projects, and networking are key to landing a great placement!";

pub fn analyze_resume(resume_text: &str, target_role: &str) -> ResumeAnalysis {
    let lowered = resume_text.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    let skills_found: Vec<String> = RESUME_VOCABULARY
        .iter()
        .filter(|term| tokens.contains(term))
        .map(|term| term.to_string())
        .collect();

    let strengths = if skills_found.is_empty() {
        vec!["Resume submitted".to_string()]
    } else {
        skills_found.iter().take(3).cloned().collect()
    };

    ResumeAnalysis {
        match_score: (skills_found.len() * RESUME_SCORE_PER_TERM).min(RESUME_SCORE_CAP) as u32,
        skills_found,
        experience_years: 0.0,
        education: "Extracted from resume".to_string(),
        strengths,
        weaknesses: vec!["Detailed analysis unavailable, keyword scan only".to_string()],
        recommendations: vec![SETUP_HINT.to_string()],
        summary: format!("Basic keyword analysis for {target_role}."),
    }
}

/// Requirement list for `role`, falling back to the default role.
pub fn role_requirements(role: &str) -> &'static [&'static str] {
    ROLE_REQUIREMENTS
        .iter()
        .find(|(name, _)| *name == role)
        .unwrap_or(&ROLE_REQUIREMENTS[0])
        .1
}

pub fn skill_gap(skills: &[String], target_role: &str) -> SkillGapReport {
    let owned: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();

    let missing_skills: Vec<String> = role_requirements(target_role)
        .iter()
        .filter(|req| !owned.contains(&req.to_lowercase()))
        .map(|req| req.to_string())
        .collect();

    let learning_path = missing_skills
        .iter()
        .take(LEARNING_PATH_LEN)
        .map(|skill| LearningStep {
            skill: skill.clone(),
            resource: format!("Learn {skill} online"),
            duration: "2-4 weeks".to_string(),
            priority: "high".to_string(),
        })
        .collect();

    let penalty = missing_skills.len() * GAP_PENALTY_PER_SKILL;

    SkillGapReport {
        match_percentage: 100usize.saturating_sub(penalty) as u32,
        missing_skills,
        skills_to_improve: skills.iter().take(3).cloned().collect(),
        learning_path,
        estimated_time_to_ready: "3-6 months".to_string(),
        recommendations: vec![SETUP_HINT.to_string()],
    }
}

/// Point estimate in LPA before the range is applied.
pub fn salary_base(profile: &CandidateProfile) -> f64 {
    SALARY_BASE_LPA
        + (profile.cgpa - SALARY_CGPA_FLOOR).max(0.0) * SALARY_PER_CGPA_POINT
        + profile.skills.len() as f64 * SALARY_PER_SKILL
        + profile.projects.max(0) as f64 * SALARY_PER_PROJECT
        + profile.internships.max(0) as f64 * SALARY_PER_INTERNSHIP
}

pub fn predict_salary(profile: &CandidateProfile) -> SalaryPrediction {
    let base = salary_base(profile);
    let cgpa_impact = if profile.cgpa > 7.0 { "positive" } else { "neutral" };

    SalaryPrediction {
        predicted_min_lpa: round1((base - 1.5).max(SALARY_MIN_LPA)),
        predicted_max_lpa: round1(base + 2.5),
        predicted_avg_lpa: round1(base),
        confidence: "low".to_string(),
        factors: vec![
            SalaryFactor {
                factor: "CGPA".to_string(),
                impact: cgpa_impact.to_string(),
                detail: format!("CGPA: {}", profile.cgpa),
            },
            SalaryFactor {
                factor: "Skills".to_string(),
                impact: "positive".to_string(),
                detail: format!("{} skills listed", profile.skills.len()),
            },
        ],
        recommendations_to_increase: vec![SETUP_HINT.to_string()],
        market_insight: "Basic estimate from profile metrics only.".to_string(),
    }
}

pub fn roadmap(career_goal: &str) -> Roadmap {
    let months = (1..=ROADMAP_MONTHS)
        .map(|month| RoadmapMonth {
            month,
            title: format!("Month {month}"),
            focus_areas: vec!["Study core concepts".to_string()],
            skills_to_learn: vec![SETUP_HINT.to_string()],
            projects: vec!["Practice project".to_string()],
            certifications: Vec::new(),
            milestones: vec![format!("Complete month {month} goals")],
        })
        .collect();

    Roadmap {
        career_goal: career_goal.to_string(),
        current_readiness: ROADMAP_READINESS,
        months,
        resources: vec![SETUP_HINT.to_string()],
        tips: vec![
            "Focus on fundamentals".to_string(),
            "Build projects".to_string(),
            "Practice coding daily".to_string(),
        ],
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(cgpa: f64, skills: usize, projects: i32, internships: i32) -> CandidateProfile {
        CandidateProfile {
            cgpa,
            skills: (0..skills).map(|i| format!("skill{i}")).collect(),
            projects,
            internships,
            ..CandidateProfile::default()
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resume_scan_counts_vocabulary_tokens() {
        let result = analyze_resume("Built REST services in Python and Java with Docker", "SDE");
        assert_eq!(result.skills_found, strings(&["python", "java", "docker"]));
        assert_eq!(result.match_score, 30);
        assert_eq!(result.strengths, strings(&["python", "java", "docker"]));
        assert!(result.summary.contains("SDE"));
    }

    #[test]
    fn resume_scan_caps_score() {
        let text = RESUME_VOCABULARY.join(" ");
        let result = analyze_resume(&text, DEFAULT_ROLE);
        assert_eq!(result.skills_found.len(), 16);
        assert_eq!(result.match_score, 85);
        assert_eq!(result.strengths.len(), 3);
    }

    #[test]
    fn resume_scan_with_no_terms() {
        let result = analyze_resume("Enthusiastic team player", DEFAULT_ROLE);
        assert!(result.skills_found.is_empty());
        assert_eq!(result.match_score, 0);
        assert_eq!(result.strengths, strings(&["Resume submitted"]));
    }

    #[test]
    fn resume_scan_matches_whole_tokens_only() {
        // "javascript," keeps its comma, "pythonic" is not "python".
        let result = analyze_resume("pythonic javascript, sql", DEFAULT_ROLE);
        assert_eq!(result.skills_found, strings(&["sql"]));
    }

    #[test]
    fn skill_gap_is_case_insensitive() {
        let report = skill_gap(&strings(&["python", "SQL", "git"]), DEFAULT_ROLE);
        assert_eq!(
            report.missing_skills,
            strings(&["DSA", "System Design", "Java", "REST APIs"])
        );
        assert_eq!(report.match_percentage, 40);
        assert_eq!(report.learning_path.len(), 4);
        assert_eq!(report.learning_path[0].resource, "Learn DSA online");
        assert_eq!(report.skills_to_improve, strings(&["python", "SQL", "git"]));
    }

    #[test]
    fn skill_gap_unknown_role_uses_default_list() {
        let report = skill_gap(&[], "Astronaut");
        assert_eq!(report.missing_skills.len(), 7);
        assert_eq!(report.match_percentage, 0);
        assert_eq!(report.learning_path.len(), 5);
    }

    #[test]
    fn skill_gap_full_coverage() {
        let skills = strings(&["docker", "kubernetes", "aws", "ci/cd", "linux", "terraform"]);
        let report = skill_gap(&skills, "DevOps Engineer");
        assert!(report.missing_skills.is_empty());
        assert_eq!(report.match_percentage, 100);
        assert!(report.learning_path.is_empty());
    }

    #[test]
    fn salary_estimate_worked_example() {
        // 3.5 + 2.0*1.2 + 4*0.3 + 3*0.4 + 1*0.8 = 9.1
        let result = predict_salary(&profile(8.0, 4, 3, 1));
        assert_eq!(result.predicted_avg_lpa, 9.1);
        assert_eq!(result.predicted_min_lpa, 7.6);
        assert_eq!(result.predicted_max_lpa, 11.6);
        assert_eq!(result.confidence, "low");
        assert_eq!(result.factors[0].impact, "positive");
    }

    #[test]
    fn salary_estimate_floor_for_weak_profile() {
        let result = predict_salary(&profile(5.0, 0, 0, 0));
        assert_eq!(result.predicted_avg_lpa, 3.5);
        assert_eq!(result.predicted_min_lpa, 2.5);
        assert_eq!(result.predicted_max_lpa, 6.0);
        assert_eq!(result.factors[0].impact, "neutral");
    }

    #[test]
    fn salary_estimate_is_monotonic_in_each_input() {
        let baseline = salary_base(&profile(7.0, 3, 2, 1));
        assert!(salary_base(&profile(8.0, 3, 2, 1)) > baseline);
        assert!(salary_base(&profile(7.0, 4, 2, 1)) > baseline);
        assert!(salary_base(&profile(7.0, 3, 3, 1)) > baseline);
        assert!(salary_base(&profile(7.0, 3, 2, 2)) > baseline);
        // Below the CGPA floor the grade does not move the estimate.
        assert_eq!(
            salary_base(&profile(4.0, 3, 2, 1)),
            salary_base(&profile(6.0, 3, 2, 1))
        );
    }

    #[test]
    fn roadmap_has_six_numbered_months() {
        let plan = roadmap("Data Scientist");
        assert_eq!(plan.career_goal, "Data Scientist");
        assert_eq!(plan.current_readiness, 40);
        let numbers: Vec<u32> = plan.months.iter().map(|m| m.month).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(plan.months[5].milestones, strings(&["Complete month 6 goals"]));
        assert_eq!(plan.tips.len(), 3);
    }
}
