//! Axum route handlers for the analytics API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::analytics::aggregation::{
    self, BranchStat, CgpaPackagePoint, ChartSeries, CompanyHires, MonthlyTrends, OverallStats,
    PlacementOverview, DEFAULT_TOP_COMPANIES, DEFAULT_TOP_SKILLS,
};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// GET /api/analytics/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<OverallStats>, AppError> {
    let snapshot = state.store.snapshot().await?;
    Ok(Json(aggregation::overall_stats(&snapshot)))
}

/// GET /api/analytics/placement-overview
pub async fn handle_placement_overview(
    State(state): State<AppState>,
) -> Result<Json<PlacementOverview>, AppError> {
    let snapshot = state.store.snapshot().await?;
    Ok(Json(aggregation::placement_overview(&snapshot)))
}

/// GET /api/analytics/salary-distribution
pub async fn handle_salary_distribution(
    State(state): State<AppState>,
) -> Result<Json<ChartSeries>, AppError> {
    let snapshot = state.store.snapshot().await?;
    Ok(Json(aggregation::salary_distribution(&snapshot)))
}

/// GET /api/analytics/branch-stats
pub async fn handle_branch_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<BranchStat>>, AppError> {
    let snapshot = state.store.snapshot().await?;
    Ok(Json(aggregation::branch_stats(&snapshot)))
}

/// GET /api/analytics/top-companies?limit=10
pub async fn handle_top_companies(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<CompanyHires>>, AppError> {
    let snapshot = state.store.snapshot().await?;
    let limit = params.limit.unwrap_or(DEFAULT_TOP_COMPANIES);
    Ok(Json(aggregation::top_companies(&snapshot, limit)))
}

/// GET /api/analytics/cgpa-vs-package
pub async fn handle_cgpa_vs_package(
    State(state): State<AppState>,
) -> Result<Json<Vec<CgpaPackagePoint>>, AppError> {
    let snapshot = state.store.snapshot().await?;
    Ok(Json(aggregation::cgpa_vs_package(&snapshot)))
}

/// GET /api/analytics/top-skills?limit=15
pub async fn handle_top_skills(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<ChartSeries>, AppError> {
    let snapshot = state.store.snapshot().await?;
    let limit = params.limit.unwrap_or(DEFAULT_TOP_SKILLS);
    Ok(Json(aggregation::top_skills(&snapshot, limit)))
}

/// GET /api/analytics/monthly-trends
pub async fn handle_monthly_trends(
    State(state): State<AppState>,
) -> Result<Json<MonthlyTrends>, AppError> {
    let snapshot = state.store.snapshot().await?;
    Ok(Json(aggregation::monthly_trends(&snapshot)))
}

/// GET /api/analytics/gender-distribution
pub async fn handle_gender_distribution(
    State(state): State<AppState>,
) -> Result<Json<ChartSeries>, AppError> {
    let snapshot = state.store.snapshot().await?;
    Ok(Json(aggregation::gender_distribution(&snapshot)))
}
