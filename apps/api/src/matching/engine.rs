//! Matching Engine: scores one student against every company.
//!
//! Per company:
//! 1. overlap = lower-cased student skills ∩ lower-cased requirements
//! 2. base = round(|overlap| / |requirements| × 100), or uniform [40, 70]
//!    when the company lists no requirements
//! 3. +10 when CGPA > 8.5
//! 4. + uniform jitter in [-5, 5]
//! 5. clamp to [30, 98]
//!
//! Randomness comes only from the caller's `Rng`, so a seeded generator makes
//! the output reproducible.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{lowercase_set, Company, Student};

pub const MAX_RECOMMENDATIONS: usize = 5;
pub const MIN_SCORE: i32 = 30;
pub const MAX_SCORE: i32 = 98;

const CGPA_BONUS_THRESHOLD: f64 = 8.5;
const CGPA_BONUS: i32 = 10;
const JITTER: RangeInclusive<i32> = -5..=5;
const OPEN_REQUIREMENTS_BASE: RangeInclusive<i32> = 40..=70;
const FALLBACK_SKILL_COUNT: usize = 2;
const REASON_SKILL_COUNT: usize = 3;

/// Display placeholders; there is no job-posting model behind them.
const ROLES: &[&str] = &[
    "Software Engineer",
    "Data Analyst",
    "Product Intern",
    "UI/UX Developer",
    "Backend Dev",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub company_id: Uuid,
    pub company: String,
    pub industry: String,
    pub role: String,
    /// LPA, drawn from the company's package band.
    pub package: f64,
    pub match_score: u32,
    pub matched_skills: Vec<String>,
    pub reason: String,
}

/// Overlap percentage for a non-empty requirement set; `None` when there are
/// no requirements to compare against.
pub fn overlap_score(overlap: usize, requirements: usize) -> Option<i32> {
    if requirements == 0 {
        return None;
    }
    Some(((overlap as f64 / requirements as f64) * 100.0).round() as i32)
}

/// Applies the CGPA bonus and jitter, then clamps into `[MIN_SCORE, MAX_SCORE]`.
pub fn finalize_score(base: i32, cgpa: f64, jitter: i32) -> u32 {
    let bonus = if cgpa > CGPA_BONUS_THRESHOLD { CGPA_BONUS } else { 0 };
    (base + bonus + jitter).clamp(MIN_SCORE, MAX_SCORE) as u32
}

/// Requirements lower-cased and de-duplicated, keeping declaration order.
fn normalized_requirements(company: &Company) -> Vec<String> {
    let mut seen = HashSet::new();
    company
        .requirements
        .iter()
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty() && seen.insert(r.clone()))
        .collect()
}

fn build_reason(overlap: &[String], industry: &str) -> String {
    let focus = if overlap.is_empty() {
        "core requirements".to_string()
    } else {
        overlap
            .iter()
            .take(REASON_SKILL_COUNT)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("Strong overlap in {focus} and alignment with {industry} standards.")
}

fn estimate_package<R: Rng + ?Sized>(company: &Company, rng: &mut R) -> f64 {
    let low = company.min_package.min(company.max_package).max(0.0);
    let high = company.min_package.max(company.max_package).max(low);
    let package = rng.gen_range(low..=high);
    (package * 100.0).round() / 100.0
}

/// Scores a single company for a student whose skills are already lower-cased.
pub fn score_company<R: Rng + ?Sized>(
    student_skills: &HashSet<String>,
    cgpa: f64,
    company: &Company,
    rng: &mut R,
) -> JobMatch {
    let requirements = normalized_requirements(company);
    let overlap: Vec<String> = requirements
        .iter()
        .filter(|r| student_skills.contains(*r))
        .cloned()
        .collect();

    let base = overlap_score(overlap.len(), requirements.len())
        .unwrap_or_else(|| rng.gen_range(OPEN_REQUIREMENTS_BASE));
    let match_score = finalize_score(base, cgpa, rng.gen_range(JITTER));

    let role = ROLES.choose(rng).copied().unwrap_or(ROLES[0]).to_string();
    let package = estimate_package(company, rng);

    let matched_skills = if overlap.is_empty() {
        requirements.iter().take(FALLBACK_SKILL_COUNT).cloned().collect()
    } else {
        overlap.clone()
    };

    JobMatch {
        company_id: company.id,
        company: company.name.clone(),
        industry: company.industry.clone(),
        role,
        package,
        match_score,
        matched_skills,
        reason: build_reason(&overlap, &company.industry),
    }
}

/// Top `MAX_RECOMMENDATIONS` companies by score; ties broken by company id.
pub fn recommend<R: Rng + ?Sized>(
    student: &Student,
    companies: &[Company],
    rng: &mut R,
) -> Vec<JobMatch> {
    let skills = lowercase_set(&student.skills);

    let mut matches: Vec<JobMatch> = companies
        .iter()
        .map(|company| score_company(&skills, student.cgpa, company, rng))
        .collect();

    matches.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then(a.company_id.cmp(&b.company_id))
    });
    matches.truncate(MAX_RECOMMENDATIONS);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn student(skills: &[&str], cgpa: f64) -> Student {
        Student {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@college.edu".to_string(),
            branch: "Computer Science".to_string(),
            cgpa,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            projects: 2,
            internships: 1,
            placed: false,
            resume_text: String::new(),
            gender: None,
            created_at: Utc::now(),
        }
    }

    fn company(name: &str, requirements: &[&str], min: f64, max: f64) -> Company {
        Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            industry: "Technology".to_string(),
            min_package: min,
            max_package: max,
            requirements: requirements.iter().map(|s| s.to_string()).collect(),
            website: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn worked_example_lands_in_expected_window() {
        let s = student(&["Python", "SQL"], 9.0);
        let c = company("Acme", &["python", "Java", "sql"], 6.0, 12.0);
        let skills = lowercase_set(&s.skills);

        assert_eq!(overlap_score(2, 3), Some(67));
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let m = score_company(&skills, s.cgpa, &c, &mut rng);
            assert!(
                (72..=82).contains(&m.match_score),
                "seed {seed} gave {}",
                m.match_score
            );
            assert_eq!(m.matched_skills, vec!["python", "sql"]);
            assert!((6.0..=12.0).contains(&m.package));
        }
    }

    #[test]
    fn empty_requirements_draw_open_base() {
        let c = company("Open", &[], 3.0, 5.0);
        let skills = lowercase_set(&["rust".to_string()]);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let m = score_company(&skills, 7.0, &c, &mut rng);
            // base [40, 70], no bonus, jitter ±5
            assert!((35..=75).contains(&m.match_score));
            assert!(m.matched_skills.is_empty());
            assert!(m.reason.contains("core requirements"));
        }
    }

    #[test]
    fn scores_always_within_clamp() {
        let s = student(&["a", "b", "c"], 9.9);
        let companies = vec![
            company("Full", &["a", "b", "c"], 1.0, 2.0),
            company("None", &["x", "y", "z"], 1.0, 2.0),
            company("Open", &[], 1.0, 2.0),
        ];
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            for m in recommend(&s, &companies, &mut rng) {
                assert!(m.match_score >= MIN_SCORE as u32 && m.match_score <= MAX_SCORE as u32);
            }
        }
    }

    #[test]
    fn finalize_clamps_both_ends() {
        assert_eq!(finalize_score(0, 6.0, -5), 30);
        assert_eq!(finalize_score(100, 9.0, 5), 98);
        assert_eq!(finalize_score(67, 9.0, 0), 77);
        assert_eq!(finalize_score(67, 8.5, 0), 67);
    }

    #[test]
    fn overlap_score_is_monotonic() {
        for total in 1..=10 {
            let mut previous = 0;
            for overlap in 0..=total {
                let score = overlap_score(overlap, total).unwrap();
                assert!(score >= previous);
                previous = score;
            }
        }
        assert_eq!(overlap_score(0, 0), None);
    }

    #[test]
    fn returns_at_most_five_sorted() {
        let s = student(&["python"], 7.5);
        let companies: Vec<Company> = (0..9)
            .map(|i| company(&format!("Co{i}"), &["python", "go"], 4.0, 9.0))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);
        let matches = recommend(&s, &companies, &mut rng);
        assert_eq!(matches.len(), MAX_RECOMMENDATIONS);
        assert!(matches.windows(2).all(|w| {
            w[0].match_score > w[1].match_score
                || (w[0].match_score == w[1].match_score && w[0].company_id < w[1].company_id)
        }));
    }

    #[test]
    fn fewer_companies_fewer_results() {
        let s = student(&["python"], 7.5);
        let companies = vec![company("Only", &["python"], 4.0, 9.0)];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(recommend(&s, &companies, &mut rng).len(), 1);
        assert!(recommend(&s, &[], &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_output() {
        let s = student(&["python", "sql"], 8.0);
        let companies = vec![
            company("A", &["python"], 4.0, 9.0),
            company("B", &[], 5.0, 15.0),
            company("C", &["java", "sql"], 3.0, 6.0),
        ];
        let first = recommend(&s, &companies, &mut StdRng::seed_from_u64(42));
        let second = recommend(&s, &companies, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn no_overlap_falls_back_to_first_two_requirements() {
        let c = company("Acme", &["Go", "Kafka", "Rust"], 4.0, 9.0);
        let skills = lowercase_set(&["python".to_string()]);
        let m = score_company(&skills, 7.0, &c, &mut StdRng::seed_from_u64(3));
        assert_eq!(m.matched_skills, vec!["go", "kafka"]);
        assert_eq!(
            m.reason,
            "Strong overlap in core requirements and alignment with Technology standards."
        );
    }

    #[test]
    fn reason_names_at_most_three_skills() {
        let c = company("Acme", &["a", "b", "c", "d"], 4.0, 9.0);
        let skills = lowercase_set(&["a", "b", "c", "d"].map(String::from));
        let m = score_company(&skills, 7.0, &c, &mut StdRng::seed_from_u64(3));
        assert_eq!(
            m.reason,
            "Strong overlap in a, b, c and alignment with Technology standards."
        );
        assert_eq!(m.matched_skills.len(), 4);
    }

    #[test]
    fn inverted_package_band_still_estimates() {
        let c = company("Odd", &["python"], 9.0, 4.0);
        let skills = lowercase_set(&["python".to_string()]);
        let m = score_company(&skills, 7.0, &c, &mut StdRng::seed_from_u64(5));
        assert!((4.0..=9.0).contains(&m.package));
    }
}
