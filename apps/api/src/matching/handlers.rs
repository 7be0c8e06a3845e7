//! Axum route handlers for job recommendations.

use axum::{
    extract::{Path, State},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::{parse_id, AppError};
use crate::matching::engine::{recommend, JobMatch};
use crate::store::CompanyFilter;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub student_id: Uuid,
    pub matches: Vec<JobMatch>,
}

/// GET /api/jobs/recommendations/:student_id
///
/// Scores the student against every company and returns the top 5.
/// Each request seeds its own generator, so scores vary between calls.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let student_id = parse_id("student", &raw_id)?;

    let student = state
        .store
        .get_student(student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
    let companies = state.store.find_companies(&CompanyFilter::default()).await?;

    let mut rng = StdRng::from_entropy();
    let matches = recommend(&student, &companies, &mut rng);
    info!(
        "Scored {} companies for student {student_id}, returning {}",
        companies.len(),
        matches.len()
    );

    Ok(Json(RecommendationsResponse {
        student_id,
        matches,
    }))
}
