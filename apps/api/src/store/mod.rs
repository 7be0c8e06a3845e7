//! Entity store: read/write access to the three collections.
//!
//! `AppState` holds an `Arc<dyn EntityStore>`: `PgStore` in production,
//! `MemoryStore` when no database is configured and in tests.
//!
//! The `placed` flag on students is a projection of "has at least one
//! confirmed placement". Every implementation recomputes it in the same
//! write that changes a placement, including cascading deletes.

pub mod memory;
pub mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Company, CompanyChanges, NewCompany, NewPlacement, NewStudent, Placement, PlacementChanges,
    PlacementStatus, PlacementView, Student, StudentChanges,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub branch: Option<String>,
    pub placed: Option<bool>,
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    pub industry: Option<String>,
    /// Case-insensitive substring of name.
    pub search: Option<String>,
}

/// Collection sizes for the admin summary. `placements` counts every status.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreCounts {
    pub students: i64,
    pub companies: i64,
    pub placements: i64,
    pub placed_students: i64,
}

/// A point-in-time read of all three collections. The engines compute over this.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub students: Vec<Student>,
    pub companies: Vec<Company>,
    pub placements: Vec<Placement>,
}

impl Snapshot {
    pub fn confirmed(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(|p| p.is_confirmed())
    }

    /// Students referenced by at least one confirmed placement.
    /// This, not the stored flag, is what the engines treat as "placed".
    pub fn placed_student_ids(&self) -> HashSet<Uuid> {
        self.confirmed().map(|p| p.student_id).collect()
    }
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    // Students
    async fn find_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, AppError>;
    async fn count_students(&self, filter: &StudentFilter) -> Result<i64, AppError>;
    async fn get_student(&self, id: Uuid) -> Result<Option<Student>, AppError>;
    async fn insert_student(&self, new: NewStudent) -> Result<Student, AppError>;
    async fn update_student(
        &self,
        id: Uuid,
        changes: StudentChanges,
    ) -> Result<Option<Student>, AppError>;
    /// Removes the student and every placement referencing it.
    async fn delete_student(&self, id: Uuid) -> Result<bool, AppError>;
    async fn distinct_branches(&self) -> Result<Vec<String>, AppError>;

    // Companies
    async fn find_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, AppError>;
    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, AppError>;
    async fn insert_company(&self, new: NewCompany) -> Result<Company, AppError>;
    async fn update_company(
        &self,
        id: Uuid,
        changes: CompanyChanges,
    ) -> Result<Option<Company>, AppError>;
    /// Removes the company and every placement referencing it, then
    /// recomputes `placed` for the affected students.
    async fn delete_company(&self, id: Uuid) -> Result<bool, AppError>;
    async fn distinct_industries(&self) -> Result<Vec<String>, AppError>;

    // Placements
    async fn find_placements(
        &self,
        status: Option<PlacementStatus>,
    ) -> Result<Vec<PlacementView>, AppError>;
    async fn get_placement(&self, id: Uuid) -> Result<Option<PlacementView>, AppError>;
    /// Fails with `NotFound` when the student or company does not exist.
    async fn insert_placement(&self, new: NewPlacement) -> Result<Placement, AppError>;
    async fn update_placement(
        &self,
        id: Uuid,
        changes: PlacementChanges,
    ) -> Result<Option<Placement>, AppError>;
    async fn delete_placement(&self, id: Uuid) -> Result<bool, AppError>;

    // Whole-store
    async fn snapshot(&self) -> Result<Snapshot, AppError>;
    async fn counts(&self) -> Result<StoreCounts, AppError>;
    async fn reset(&self) -> Result<(), AppError>;
}
