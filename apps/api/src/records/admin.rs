//! Admin endpoints: CSV exports, store summary and reset.

use anyhow::{anyhow, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::models::{PlacementView, Student};
use crate::state::AppState;
use crate::store::StudentFilter;

const STUDENT_COLUMNS: [&str; 10] = [
    "ID",
    "Name",
    "Email",
    "Branch",
    "CGPA",
    "Skills",
    "Projects",
    "Internships",
    "Placed",
    "Gender",
];

const PLACEMENT_COLUMNS: [&str; 7] = [
    "ID",
    "Student",
    "Company",
    "Role",
    "Package (LPA)",
    "Date",
    "Status",
];

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("CSV flush failed: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn students_csv(students: &[Student]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(STUDENT_COLUMNS)?;

    for s in students {
        writer.write_record([
            s.id.to_string(),
            s.name.clone(),
            s.email.clone(),
            s.branch.clone(),
            s.cgpa.to_string(),
            s.skills.join(", "),
            s.projects.to_string(),
            s.internships.to_string(),
            if s.placed { "Yes" } else { "No" }.to_string(),
            s.gender.clone().unwrap_or_default(),
        ])?;
    }
    finish(writer)
}

pub fn placements_csv(placements: &[PlacementView]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(PLACEMENT_COLUMNS)?;

    for view in placements {
        let p = &view.placement;
        writer.write_record([
            p.id.to_string(),
            view.student_name.clone().unwrap_or_default(),
            view.company_name.clone().unwrap_or_default(),
            p.role.clone(),
            p.package.to_string(),
            p.placement_date.format("%Y-%m-%d").to_string(),
            p.status.to_string(),
        ])?;
    }
    finish(writer)
}

fn csv_attachment(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        body,
    )
}

/// GET /api/admin/export/students
pub async fn handle_export_students(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let students = state.store.find_students(&StudentFilter::default()).await?;
    let body = students_csv(&students)?;
    Ok(csv_attachment("students_export.csv", body))
}

/// GET /api/admin/export/placements
pub async fn handle_export_placements(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let placements = state.store.find_placements(None).await?;
    let body = placements_csv(&placements)?;
    Ok(csv_attachment("placements_export.csv", body))
}

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_students: i64,
    pub total_companies: i64,
    /// All statuses.
    pub total_placements: i64,
    pub placed_students: i64,
    pub branches: Vec<String>,
}

/// GET /api/admin/stats
pub async fn handle_admin_stats(State(state): State<AppState>) -> Result<Json<AdminStats>, AppError> {
    let counts = state.store.counts().await?;
    let branches = state.store.distinct_branches().await?;
    Ok(Json(AdminStats {
        total_students: counts.students,
        total_companies: counts.companies,
        total_placements: counts.placements,
        placed_students: counts.placed_students,
        branches,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// POST /api/admin/reset-database
pub async fn handle_reset_database(
    State(state): State<AppState>,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    if !req.confirm {
        return Err(AppError::Validation(
            "Please confirm reset by sending {\"confirm\": true}".to_string(),
        ));
    }

    state.store.reset().await?;
    warn!("All students, companies and placements deleted by admin reset");
    Ok(Json(json!({ "message": "Database reset successful" })))
}
