//! Axum route handlers for student, company and placement records.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{parse_id, AppError};
use crate::models::{Company, Placement, PlacementStatus, PlacementView, Student};
use crate::records::requests::{
    check_package_band, CompanyPayload, PlacementPayload, StudentPayload,
};
use crate::state::AppState;
use crate::store::{CompanyFilter, StudentFilter};

pub const DEFAULT_PER_PAGE: i64 = 50;
pub const MAX_PER_PAGE: i64 = 500;

fn deleted(kind: &str) -> Json<Value> {
    Json(json!({ "message": format!("{kind} deleted successfully") }))
}

fn not_found(kind: &str) -> AppError {
    AppError::NotFound(format!("{kind} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Students
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StudentListQuery {
    pub branch: Option<String>,
    pub placed: Option<bool>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct StudentPage {
    pub students: Vec<Student>,
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
}

/// Clamped `(page, per_page)`.
pub fn page_window(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /api/students
pub async fn handle_list_students(
    State(state): State<AppState>,
    Query(params): Query<StudentListQuery>,
) -> Result<Json<StudentPage>, AppError> {
    let (page, per_page) = page_window(params.page, params.per_page);
    let mut filter = StudentFilter {
        branch: blank_to_none(params.branch),
        placed: params.placed,
        search: blank_to_none(params.search),
        offset: None,
        limit: None,
    };

    let total = state.store.count_students(&filter).await?;
    filter.offset = Some((page - 1).saturating_mul(per_page));
    filter.limit = Some(per_page);
    let students = state.store.find_students(&filter).await?;

    Ok(Json(StudentPage {
        students,
        total,
        pages: (total + per_page - 1) / per_page,
        current_page: page,
    }))
}

/// GET /api/students/branches
pub async fn handle_student_branches(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.distinct_branches().await?))
}

/// GET /api/students/:id
pub async fn handle_get_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let id = parse_id("student", &raw_id)?;
    let student = state
        .store
        .get_student(id)
        .await?
        .ok_or_else(|| not_found("Student"))?;
    Ok(Json(student))
}

/// POST /api/students
pub async fn handle_create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let Json(req) = payload?;
    let student = state.store.insert_student(req.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// PUT /api/students/:id
pub async fn handle_update_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> Result<Json<Student>, AppError> {
    let id = parse_id("student", &raw_id)?;
    let Json(req) = payload?;
    let student = state
        .store
        .update_student(id, req.into_changes()?)
        .await?
        .ok_or_else(|| not_found("Student"))?;
    Ok(Json(student))
}

/// DELETE /api/students/:id
pub async fn handle_delete_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id("student", &raw_id)?;
    if !state.store.delete_student(id).await? {
        return Err(not_found("Student"));
    }
    Ok(deleted("Student"))
}

// ────────────────────────────────────────────────────────────────────────────
// Companies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CompanyListQuery {
    pub industry: Option<String>,
    pub search: Option<String>,
}

/// GET /api/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
    Query(params): Query<CompanyListQuery>,
) -> Result<Json<Vec<Company>>, AppError> {
    let filter = CompanyFilter {
        industry: blank_to_none(params.industry),
        search: blank_to_none(params.search),
    };
    Ok(Json(state.store.find_companies(&filter).await?))
}

/// GET /api/companies/industries
pub async fn handle_company_industries(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.distinct_industries().await?))
}

/// GET /api/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Company>, AppError> {
    let id = parse_id("company", &raw_id)?;
    let company = state
        .store
        .get_company(id)
        .await?
        .ok_or_else(|| not_found("Company"))?;
    Ok(Json(company))
}

/// POST /api/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    payload: Result<Json<CompanyPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    let Json(req) = payload?;
    let company = state.store.insert_company(req.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// PUT /api/companies/:id
///
/// A partial band update is checked against the stored other end.
pub async fn handle_update_company(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<CompanyPayload>, JsonRejection>,
) -> Result<Json<Company>, AppError> {
    let id = parse_id("company", &raw_id)?;
    let Json(req) = payload?;
    let changes = req.into_changes()?;

    if changes.min_package.is_some() || changes.max_package.is_some() {
        let stored = state
            .store
            .get_company(id)
            .await?
            .ok_or_else(|| not_found("Company"))?;
        check_package_band(
            changes.min_package.unwrap_or(stored.min_package),
            changes.max_package.unwrap_or(stored.max_package),
        )?;
    }

    let company = state
        .store
        .update_company(id, changes)
        .await?
        .ok_or_else(|| not_found("Company"))?;
    Ok(Json(company))
}

/// DELETE /api/companies/:id
pub async fn handle_delete_company(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id("company", &raw_id)?;
    if !state.store.delete_company(id).await? {
        return Err(not_found("Company"));
    }
    Ok(deleted("Company"))
}

// ────────────────────────────────────────────────────────────────────────────
// Placements
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PlacementListQuery {
    pub status: Option<String>,
}

/// GET /api/placements
pub async fn handle_list_placements(
    State(state): State<AppState>,
    Query(params): Query<PlacementListQuery>,
) -> Result<Json<Vec<PlacementView>>, AppError> {
    let status = blank_to_none(params.status)
        .map(|s| s.parse::<PlacementStatus>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(state.store.find_placements(status).await?))
}

/// GET /api/placements/:id
pub async fn handle_get_placement(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<PlacementView>, AppError> {
    let id = parse_id("placement", &raw_id)?;
    let placement = state
        .store
        .get_placement(id)
        .await?
        .ok_or_else(|| not_found("Placement"))?;
    Ok(Json(placement))
}

/// POST /api/placements
///
/// A confirmed placement marks its student as placed.
pub async fn handle_create_placement(
    State(state): State<AppState>,
    payload: Result<Json<PlacementPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Placement>), AppError> {
    let Json(req) = payload?;
    let placement = state.store.insert_placement(req.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(placement)))
}

/// PUT /api/placements/:id
pub async fn handle_update_placement(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<PlacementPayload>, JsonRejection>,
) -> Result<Json<Placement>, AppError> {
    let id = parse_id("placement", &raw_id)?;
    let Json(req) = payload?;
    let placement = state
        .store
        .update_placement(id, req.into_changes()?)
        .await?
        .ok_or_else(|| not_found("Placement"))?;
    Ok(Json(placement))
}

/// DELETE /api/placements/:id
pub async fn handle_delete_placement(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id("placement", &raw_id)?;
    if !state.store.delete_placement(id).await? {
        return Err(not_found("Placement"));
    }
    Ok(deleted("Placement"))
}
