//! Aggregation Engine: pure functions from a `Snapshot` to reporting payloads.
//!
//! "Placed" always means "referenced by at least one confirmed placement"
//! (`Snapshot::placed_student_ids`); the stored `placed` flag is not read here.
//! Every average or ratio over an empty set is 0. Monetary values are rounded
//! to 2 decimals only when the output struct is built.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::student::DEFAULT_GENDER;
use crate::store::Snapshot;

pub const DEFAULT_TOP_COMPANIES: usize = 10;
pub const DEFAULT_TOP_SKILLS: usize = 15;

/// Half-open `[lower, upper)` package bands in LPA; `None` is open-ended.
const SALARY_BUCKETS: &[(&str, Option<f64>)] = &[
    ("0-3 LPA", Some(3.0)),
    ("3-5 LPA", Some(5.0)),
    ("5-8 LPA", Some(8.0)),
    ("8-12 LPA", Some(12.0)),
    ("12-20 LPA", Some(20.0)),
    ("20+ LPA", None),
];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ────────────────────────────────────────────────────────────────────────────
// Output payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_students: usize,
    pub placed_students: usize,
    /// Percentage, 1 decimal.
    pub placement_rate: f64,
    pub avg_package: f64,
    pub highest_package: f64,
    pub lowest_package: f64,
    pub total_companies: usize,
    /// Confirmed placements only.
    pub total_placements: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOverview {
    pub placed: usize,
    pub not_placed: usize,
}

/// Parallel label/value arrays for chart endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl ChartSeries {
    fn push(&mut self, label: impl Into<String>, value: usize) {
        self.labels.push(label.into());
        self.values.push(value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchStat {
    pub branch: String,
    pub total: usize,
    pub placed: usize,
    pub not_placed: usize,
    pub avg_package: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyHires {
    pub company_id: Uuid,
    pub company: String,
    pub hires: usize,
    pub avg_package: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CgpaPackagePoint {
    pub cgpa: f64,
    pub package: f64,
    pub branch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrends {
    pub labels: Vec<String>,
    pub placements: Vec<usize>,
    pub avg_packages: Vec<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

fn money(value: f64) -> f64 {
    round_to(value, 2)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Running sum/count pair; `mean()` is 0 for an empty accumulator.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        ratio(self.sum, self.count as f64)
    }
}

fn bucket_label(package: f64) -> &'static str {
    SALARY_BUCKETS
        .iter()
        .find(|(_, upper)| upper.map_or(true, |u| package < u))
        .map(|(label, _)| *label)
        .unwrap_or("20+ LPA")
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

pub fn overall_stats(snapshot: &Snapshot) -> OverallStats {
    let total_students = snapshot.students.len();
    let placed_ids = snapshot.placed_student_ids();
    let placed_students = snapshot
        .students
        .iter()
        .filter(|s| placed_ids.contains(&s.id))
        .count();

    let mut mean = Mean::default();
    let mut highest = f64::MIN;
    let mut lowest = f64::MAX;
    for p in snapshot.confirmed() {
        mean.add(p.package);
        highest = highest.max(p.package);
        lowest = lowest.min(p.package);
    }
    if mean.count == 0 {
        highest = 0.0;
        lowest = 0.0;
    }

    OverallStats {
        total_students,
        placed_students,
        placement_rate: round_to(
            ratio(placed_students as f64, total_students as f64) * 100.0,
            1,
        ),
        avg_package: money(mean.mean()),
        highest_package: money(highest),
        lowest_package: money(lowest),
        total_companies: snapshot.companies.len(),
        total_placements: mean.count,
    }
}

pub fn placement_overview(snapshot: &Snapshot) -> PlacementOverview {
    let placed_ids = snapshot.placed_student_ids();
    let placed = snapshot
        .students
        .iter()
        .filter(|s| placed_ids.contains(&s.id))
        .count();
    PlacementOverview {
        placed,
        not_placed: snapshot.students.len() - placed,
    }
}

/// Every band is present in the output, in ascending order, even at 0.
pub fn salary_distribution(snapshot: &Snapshot) -> ChartSeries {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in snapshot.confirmed() {
        *counts.entry(bucket_label(p.package)).or_default() += 1;
    }

    let mut series = ChartSeries::default();
    for (label, _) in SALARY_BUCKETS {
        series.push(*label, counts.get(label).copied().unwrap_or(0));
    }
    series
}

/// One row per branch present among students, sorted by branch name.
pub fn branch_stats(snapshot: &Snapshot) -> Vec<BranchStat> {
    let placed_ids = snapshot.placed_student_ids();
    let branch_of: HashMap<Uuid, &str> = snapshot
        .students
        .iter()
        .map(|s| (s.id, s.branch.as_str()))
        .collect();

    let mut totals: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for student in &snapshot.students {
        let entry = totals.entry(student.branch.as_str()).or_default();
        entry.0 += 1;
        if placed_ids.contains(&student.id) {
            entry.1 += 1;
        }
    }

    let mut packages: HashMap<&str, Mean> = HashMap::new();
    for p in snapshot.confirmed() {
        if let Some(branch) = branch_of.get(&p.student_id) {
            packages.entry(*branch).or_default().add(p.package);
        }
    }

    totals
        .into_iter()
        .map(|(branch, (total, placed))| BranchStat {
            branch: branch.to_string(),
            total,
            placed,
            not_placed: total - placed,
            avg_package: money(packages.get(branch).map(Mean::mean).unwrap_or(0.0)),
        })
        .collect()
}

/// Ranked by confirmed hires, ties broken by company id ascending.
/// Placements pointing at a deleted company are skipped.
pub fn top_companies(snapshot: &Snapshot, limit: usize) -> Vec<CompanyHires> {
    let names: HashMap<Uuid, &str> = snapshot
        .companies
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut hires: HashMap<Uuid, Mean> = HashMap::new();
    for p in snapshot.confirmed() {
        if names.contains_key(&p.company_id) {
            hires.entry(p.company_id).or_default().add(p.package);
        }
    }

    let mut ranked: Vec<(Uuid, Mean)> = hires.into_iter().collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| b.count.cmp(&a.count).then(a_id.cmp(b_id)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(company_id, mean)| CompanyHires {
            company_id,
            company: names[&company_id].to_string(),
            hires: mean.count,
            avg_package: money(mean.mean()),
        })
        .collect()
}

/// One point per confirmed placement whose student still exists.
pub fn cgpa_vs_package(snapshot: &Snapshot) -> Vec<CgpaPackagePoint> {
    let students: HashMap<Uuid, (f64, &str)> = snapshot
        .students
        .iter()
        .map(|s| (s.id, (s.cgpa, s.branch.as_str())))
        .collect();

    snapshot
        .confirmed()
        .filter_map(|p| {
            students.get(&p.student_id).map(|(cgpa, branch)| CgpaPackagePoint {
                cgpa: *cgpa,
                package: money(p.package),
                branch: branch.to_string(),
            })
        })
        .collect()
}

/// Skill frequency among placed students. Skills compare case-insensitively;
/// the label is the first spelling seen. Ties broken by lower-cased name.
pub fn top_skills(snapshot: &Snapshot, limit: usize) -> ChartSeries {
    let placed_ids = snapshot.placed_student_ids();
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();

    for student in snapshot.students.iter().filter(|s| placed_ids.contains(&s.id)) {
        let mut seen = HashSet::new();
        for skill in &student.skills {
            let key = skill.trim().to_lowercase();
            if key.is_empty() || !seen.insert(key.clone()) {
                continue;
            }
            counts
                .entry(key)
                .or_insert_with(|| (skill.trim().to_string(), 0))
                .1 += 1;
        }
    }

    let mut ranked: Vec<(String, (String, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(a_key, (_, a)), (b_key, (_, b))| b.cmp(a).then(a_key.cmp(b_key)));

    let mut series = ChartSeries::default();
    for (_, (label, count)) in ranked.into_iter().take(limit) {
        series.push(label, count);
    }
    series
}

/// Grouped by calendar month regardless of year; empty months are omitted.
pub fn monthly_trends(snapshot: &Snapshot) -> MonthlyTrends {
    let mut months: BTreeMap<u32, Mean> = BTreeMap::new();
    for p in snapshot.confirmed() {
        months.entry(p.placement_date.month()).or_default().add(p.package);
    }

    let mut trends = MonthlyTrends::default();
    for (month, mean) in months {
        trends.labels.push(MONTHS[(month - 1) as usize].to_string());
        trends.placements.push(mean.count);
        trends.avg_packages.push(money(mean.mean()));
    }
    trends
}

/// Missing or blank gender counts as "Other". Labels sorted alphabetically.
pub fn gender_distribution(snapshot: &Snapshot) -> ChartSeries {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for student in &snapshot.students {
        let gender = student
            .gender
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(DEFAULT_GENDER);
        *counts.entry(gender).or_default() += 1;
    }

    let mut series = ChartSeries::default();
    for (label, count) in counts {
        series.push(label, count);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, Placement, PlacementStatus, Student};
    use chrono::{TimeZone, Utc};

    fn student(name: &str, branch: &str, cgpa: f64, skills: &[&str]) -> Student {
        Student {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@college.edu", name.to_lowercase()),
            branch: branch.to_string(),
            cgpa,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            projects: 2,
            internships: 1,
            placed: false,
            resume_text: String::new(),
            gender: Some("Female".to_string()),
            created_at: Utc::now(),
        }
    }

    fn company(name: &str) -> Company {
        Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            industry: "Technology".to_string(),
            min_package: 3.0,
            max_package: 30.0,
            requirements: vec![],
            website: String::new(),
            created_at: Utc::now(),
        }
    }

    fn placement(
        student: &Student,
        company: &Company,
        package: f64,
        status: PlacementStatus,
        month: u32,
    ) -> Placement {
        Placement {
            id: Uuid::new_v4(),
            student_id: student.id,
            company_id: company.id,
            role: "Software Engineer".to_string(),
            package,
            status,
            placement_date: Utc.with_ymd_and_hms(2025, month, 15, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_snapshot_yields_zeroes() {
        let stats = overall_stats(&Snapshot::default());
        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.placed_students, 0);
        assert_eq!(stats.placement_rate, 0.0);
        assert_eq!(stats.avg_package, 0.0);
        assert_eq!(stats.highest_package, 0.0);
        assert_eq!(stats.lowest_package, 0.0);
        assert_eq!(stats.total_companies, 0);
        assert_eq!(stats.total_placements, 0);
        assert!(!stats.placement_rate.is_nan());
    }

    #[test]
    fn overall_stats_counts_confirmed_only() {
        let a = student("Asha", "CS", 9.1, &["Python"]);
        let b = student("Bala", "CS", 7.0, &["Java"]);
        let c = student("Chen", "IT", 6.5, &[]);
        let acme = company("Acme");
        let snapshot = Snapshot {
            placements: vec![
                placement(&a, &acme, 10.0, PlacementStatus::Confirmed, 1),
                placement(&a, &acme, 12.0, PlacementStatus::Confirmed, 2),
                placement(&b, &acme, 50.0, PlacementStatus::Pending, 2),
            ],
            students: vec![a, b, c],
            companies: vec![acme],
        };

        let stats = overall_stats(&snapshot);
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.placed_students, 1);
        assert_eq!(stats.placement_rate, 33.3);
        assert_eq!(stats.avg_package, 11.0);
        assert_eq!(stats.highest_package, 12.0);
        assert_eq!(stats.lowest_package, 10.0);
        assert_eq!(stats.total_placements, 2);
    }

    #[test]
    fn stale_placed_flag_is_ignored() {
        let mut a = student("Asha", "CS", 8.0, &[]);
        a.placed = true; // no confirmed placement backs this
        let snapshot = Snapshot {
            students: vec![a],
            ..Default::default()
        };
        assert_eq!(placement_overview(&snapshot).placed, 0);
        assert_eq!(overall_stats(&snapshot).placed_students, 0);
    }

    #[test]
    fn salary_distribution_fills_every_bucket() {
        let a = student("Asha", "CS", 8.0, &[]);
        let acme = company("Acme");
        let snapshot = Snapshot {
            placements: vec![
                placement(&a, &acme, 2.0, PlacementStatus::Confirmed, 1),
                placement(&a, &acme, 4.0, PlacementStatus::Confirmed, 1),
                placement(&a, &acme, 25.0, PlacementStatus::Confirmed, 1),
            ],
            students: vec![a],
            companies: vec![acme],
        };

        let dist = salary_distribution(&snapshot);
        assert_eq!(
            dist.labels,
            vec!["0-3 LPA", "3-5 LPA", "5-8 LPA", "8-12 LPA", "12-20 LPA", "20+ LPA"]
        );
        assert_eq!(dist.values, vec![1, 1, 0, 0, 0, 1]);
        assert_eq!(dist.values.iter().sum::<usize>(), 3);
    }

    #[test]
    fn bucket_edges_are_half_open() {
        assert_eq!(bucket_label(0.0), "0-3 LPA");
        assert_eq!(bucket_label(3.0), "3-5 LPA");
        assert_eq!(bucket_label(7.99), "5-8 LPA");
        assert_eq!(bucket_label(20.0), "20+ LPA");
        assert_eq!(bucket_label(400.0), "20+ LPA");
    }

    #[test]
    fn branch_stats_average_all_confirmed_packages() {
        let a = student("Asha", "CS", 8.0, &[]);
        let b = student("Bala", "CS", 8.0, &[]);
        let c = student("Chen", "Mechanical", 8.0, &[]);
        let acme = company("Acme");
        let snapshot = Snapshot {
            placements: vec![
                placement(&a, &acme, 6.0, PlacementStatus::Confirmed, 3),
                placement(&b, &acme, 9.0, PlacementStatus::Confirmed, 3),
                placement(&c, &acme, 40.0, PlacementStatus::Rejected, 3),
            ],
            students: vec![c, a, b],
            companies: vec![acme],
        };

        let stats = branch_stats(&snapshot);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].branch, "CS");
        assert_eq!(stats[0].total, 2);
        assert_eq!(stats[0].placed, 2);
        assert_eq!(stats[0].not_placed, 0);
        assert_eq!(stats[0].avg_package, 7.5);
        assert_eq!(stats[1].branch, "Mechanical");
        assert_eq!(stats[1].placed, 0);
        assert_eq!(stats[1].avg_package, 0.0);
    }

    #[test]
    fn top_companies_ranked_by_hires_and_limited() {
        let a = student("Asha", "CS", 8.0, &[]);
        let companies: Vec<Company> = (0..12).map(|i| company(&format!("Co{i}"))).collect();
        let mut placements = Vec::new();
        for (i, c) in companies.iter().enumerate() {
            for _ in 0..(i % 4) + 1 {
                placements.push(placement(&a, c, 5.0 + i as f64, PlacementStatus::Confirmed, 1));
            }
        }
        let snapshot = Snapshot {
            students: vec![a],
            companies,
            placements,
        };

        let top = top_companies(&snapshot, DEFAULT_TOP_COMPANIES);
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].hires >= w[1].hires));
        for pair in top.windows(2).filter(|w| w[0].hires == w[1].hires) {
            assert!(pair[0].company_id < pair[1].company_id);
        }
        assert_eq!(top[0].hires, 4);
    }

    #[test]
    fn top_companies_skips_deleted_company() {
        let a = student("Asha", "CS", 8.0, &[]);
        let ghost = company("Ghost");
        let snapshot = Snapshot {
            placements: vec![placement(&a, &ghost, 5.0, PlacementStatus::Confirmed, 1)],
            students: vec![a],
            companies: vec![],
        };
        assert!(top_companies(&snapshot, 10).is_empty());
    }

    #[test]
    fn cgpa_vs_package_one_point_per_confirmed() {
        let a = student("Asha", "CS", 9.25, &[]);
        let acme = company("Acme");
        let snapshot = Snapshot {
            placements: vec![
                placement(&a, &acme, 12.346, PlacementStatus::Confirmed, 1),
                placement(&a, &acme, 8.0, PlacementStatus::Pending, 1),
            ],
            students: vec![a],
            companies: vec![acme],
        };
        let points = cgpa_vs_package(&snapshot);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].cgpa, 9.25);
        assert_eq!(points[0].package, 12.35);
        assert_eq!(points[0].branch, "CS");
    }

    #[test]
    fn top_skills_counts_placed_students_case_insensitively() {
        let a = student("Asha", "CS", 8.0, &["Python", "SQL"]);
        let b = student("Bala", "CS", 8.0, &["python", "Java", "PYTHON"]);
        let c = student("Chen", "CS", 8.0, &["Rust"]);
        let acme = company("Acme");
        let snapshot = Snapshot {
            placements: vec![
                placement(&a, &acme, 5.0, PlacementStatus::Confirmed, 1),
                placement(&b, &acme, 5.0, PlacementStatus::Confirmed, 1),
            ],
            students: vec![a, b, c],
            companies: vec![acme],
        };

        let skills = top_skills(&snapshot, DEFAULT_TOP_SKILLS);
        assert_eq!(skills.labels, vec!["Python", "Java", "SQL"]);
        assert_eq!(skills.values, vec![2, 1, 1]);

        let limited = top_skills(&snapshot, 1);
        assert_eq!(limited.labels, vec!["Python"]);
    }

    #[test]
    fn monthly_trends_sorted_and_sparse() {
        let a = student("Asha", "CS", 8.0, &[]);
        let acme = company("Acme");
        let snapshot = Snapshot {
            placements: vec![
                placement(&a, &acme, 10.0, PlacementStatus::Confirmed, 11),
                placement(&a, &acme, 4.0, PlacementStatus::Confirmed, 3),
                placement(&a, &acme, 6.0, PlacementStatus::Confirmed, 3),
                placement(&a, &acme, 99.0, PlacementStatus::Pending, 5),
            ],
            students: vec![a],
            companies: vec![acme],
        };

        let trends = monthly_trends(&snapshot);
        assert_eq!(trends.labels, vec!["Mar", "Nov"]);
        assert_eq!(trends.placements, vec![2, 1]);
        assert_eq!(trends.avg_packages, vec![5.0, 10.0]);
    }

    #[test]
    fn gender_distribution_maps_missing_to_other() {
        let mut a = student("Asha", "CS", 8.0, &[]);
        let mut b = student("Bala", "CS", 8.0, &[]);
        let mut c = student("Chen", "CS", 8.0, &[]);
        a.gender = None;
        b.gender = Some("Other".to_string());
        c.gender = Some("Male".to_string());
        let snapshot = Snapshot {
            students: vec![a, b, c],
            ..Default::default()
        };

        let dist = gender_distribution(&snapshot);
        assert_eq!(dist.labels, vec!["Male", "Other"]);
        assert_eq!(dist.values, vec![1, 2]);
    }
}
