use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{CompanyFilter, EntityStore, Snapshot, StoreCounts, StudentFilter};
use crate::errors::AppError;
use crate::models::{
    Company, CompanyChanges, NewCompany, NewPlacement, NewStudent, Placement, PlacementChanges,
    PlacementStatus, PlacementView, Student, StudentChanges,
};

/// Process-local store. Collections keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_student(student: &Student, filter: &StudentFilter) -> bool {
    if let Some(branch) = &filter.branch {
        if &student.branch != branch {
            return false;
        }
    }
    if let Some(placed) = filter.placed {
        if student.placed != placed {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !student.name.to_lowercase().contains(&needle)
            && !student.email.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

fn matches_company(company: &Company, filter: &CompanyFilter) -> bool {
    if let Some(industry) = &filter.industry {
        if &company.industry != industry {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        if !company.name.to_lowercase().contains(&search.to_lowercase()) {
            return false;
        }
    }
    true
}

/// Re-derives `placed` for the given students from the confirmed placements.
fn refresh_placed(data: &mut Snapshot, student_ids: &[Uuid]) {
    for student in data.students.iter_mut().filter(|s| student_ids.contains(&s.id)) {
        student.placed = data
            .placements
            .iter()
            .any(|p| p.student_id == student.id && p.is_confirmed());
    }
}

fn email_taken(data: &Snapshot, email: &str, except: Option<Uuid>) -> bool {
    data.students
        .iter()
        .any(|s| s.email == email && Some(s.id) != except)
}

fn view_of(data: &Snapshot, placement: &Placement) -> PlacementView {
    PlacementView {
        placement: placement.clone(),
        student_name: data
            .students
            .iter()
            .find(|s| s.id == placement.student_id)
            .map(|s| s.name.clone()),
        company_name: data
            .companies
            .iter()
            .find(|c| c.id == placement.company_id)
            .map(|c| c.name.clone()),
    }
}

fn sorted_distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut values: Vec<String> = values.collect();
    values.sort();
    values.dedup();
    values
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, AppError> {
        let data = self.inner.read().await;
        let mut students: Vec<Student> = data
            .students
            .iter()
            .filter(|s| matches_student(s, filter))
            .cloned()
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let limit = filter.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(students.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_students(&self, filter: &StudentFilter) -> Result<i64, AppError> {
        let data = self.inner.read().await;
        Ok(data
            .students
            .iter()
            .filter(|s| matches_student(s, filter))
            .count() as i64)
    }

    async fn get_student(&self, id: Uuid) -> Result<Option<Student>, AppError> {
        let data = self.inner.read().await;
        Ok(data.students.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_student(&self, new: NewStudent) -> Result<Student, AppError> {
        let mut data = self.inner.write().await;
        if email_taken(&data, &new.email, None) {
            return Err(AppError::Validation(format!(
                "A student with email '{}' already exists",
                new.email
            )));
        }
        let student = new.into_student(Uuid::new_v4());
        data.students.push(student.clone());
        info!("Inserted student {}", student.id);
        Ok(student)
    }

    async fn update_student(
        &self,
        id: Uuid,
        changes: StudentChanges,
    ) -> Result<Option<Student>, AppError> {
        let mut data = self.inner.write().await;
        if let Some(email) = &changes.email {
            if email_taken(&data, email, Some(id)) {
                return Err(AppError::Validation(format!(
                    "A student with email '{email}' already exists"
                )));
            }
        }
        let Some(student) = data.students.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        changes.apply(student);
        Ok(Some(student.clone()))
    }

    async fn delete_student(&self, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.inner.write().await;
        let before = data.students.len();
        data.students.retain(|s| s.id != id);
        if data.students.len() == before {
            return Ok(false);
        }
        data.placements.retain(|p| p.student_id != id);
        info!("Deleted student {id} and its placements");
        Ok(true)
    }

    async fn distinct_branches(&self) -> Result<Vec<String>, AppError> {
        let data = self.inner.read().await;
        Ok(sorted_distinct(data.students.iter().map(|s| s.branch.clone())))
    }

    async fn find_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, AppError> {
        let data = self.inner.read().await;
        let mut companies: Vec<Company> = data
            .companies
            .iter()
            .filter(|c| matches_company(c, filter))
            .cloned()
            .collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(companies)
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let data = self.inner.read().await;
        Ok(data.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_company(&self, new: NewCompany) -> Result<Company, AppError> {
        let mut data = self.inner.write().await;
        let company = new.into_company(Uuid::new_v4());
        data.companies.push(company.clone());
        info!("Inserted company {}", company.id);
        Ok(company)
    }

    async fn update_company(
        &self,
        id: Uuid,
        changes: CompanyChanges,
    ) -> Result<Option<Company>, AppError> {
        let mut data = self.inner.write().await;
        let Some(company) = data.companies.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        // Band is re-checked against the row as it is under the lock.
        let mut updated = company.clone();
        changes.apply(&mut updated);
        if updated.min_package > updated.max_package {
            return Err(AppError::Validation(
                "min_package must not exceed max_package".to_string(),
            ));
        }
        *company = updated.clone();
        info!("Updated company {id}");
        Ok(Some(updated))
    }

    async fn delete_company(&self, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.inner.write().await;
        let before = data.companies.len();
        data.companies.retain(|c| c.id != id);
        if data.companies.len() == before {
            return Ok(false);
        }
        let affected: Vec<Uuid> = data
            .placements
            .iter()
            .filter(|p| p.company_id == id)
            .map(|p| p.student_id)
            .collect();
        data.placements.retain(|p| p.company_id != id);
        refresh_placed(&mut data, &affected);
        info!(
            "Deleted company {id}; refreshed placement status for {} students",
            affected.len()
        );
        Ok(true)
    }

    async fn distinct_industries(&self) -> Result<Vec<String>, AppError> {
        let data = self.inner.read().await;
        Ok(sorted_distinct(data.companies.iter().map(|c| c.industry.clone())))
    }

    async fn find_placements(
        &self,
        status: Option<PlacementStatus>,
    ) -> Result<Vec<PlacementView>, AppError> {
        let data = self.inner.read().await;
        let mut views: Vec<PlacementView> = data
            .placements
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .map(|p| view_of(&data, p))
            .collect();
        views.sort_by(|a, b| {
            b.placement
                .placement_date
                .cmp(&a.placement.placement_date)
                .then(a.placement.id.cmp(&b.placement.id))
        });
        Ok(views)
    }

    async fn get_placement(&self, id: Uuid) -> Result<Option<PlacementView>, AppError> {
        let data = self.inner.read().await;
        Ok(data
            .placements
            .iter()
            .find(|p| p.id == id)
            .map(|p| view_of(&data, p)))
    }

    async fn insert_placement(&self, new: NewPlacement) -> Result<Placement, AppError> {
        let mut data = self.inner.write().await;
        if !data.students.iter().any(|s| s.id == new.student_id) {
            return Err(AppError::NotFound(format!(
                "Student {} not found",
                new.student_id
            )));
        }
        if !data.companies.iter().any(|c| c.id == new.company_id) {
            return Err(AppError::NotFound(format!(
                "Company {} not found",
                new.company_id
            )));
        }
        let placement = new.into_placement(Uuid::new_v4());
        data.placements.push(placement.clone());
        refresh_placed(&mut data, &[placement.student_id]);
        info!(
            "Inserted placement {} ({}) for student {}",
            placement.id, placement.status, placement.student_id
        );
        Ok(placement)
    }

    async fn update_placement(
        &self,
        id: Uuid,
        changes: PlacementChanges,
    ) -> Result<Option<Placement>, AppError> {
        let mut data = self.inner.write().await;
        let Some(placement) = data.placements.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        changes.apply(placement);
        let updated = placement.clone();
        refresh_placed(&mut data, &[updated.student_id]);
        Ok(Some(updated))
    }

    async fn delete_placement(&self, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.inner.write().await;
        let Some(pos) = data.placements.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        let removed = data.placements.remove(pos);
        refresh_placed(&mut data, &[removed.student_id]);
        info!("Deleted placement {id}");
        Ok(true)
    }

    async fn snapshot(&self) -> Result<Snapshot, AppError> {
        Ok(self.inner.read().await.clone())
    }

    async fn counts(&self) -> Result<StoreCounts, AppError> {
        let data = self.inner.read().await;
        Ok(StoreCounts {
            students: data.students.len() as i64,
            companies: data.companies.len() as i64,
            placements: data.placements.len() as i64,
            placed_students: data.students.iter().filter(|s| s.placed).count() as i64,
        })
    }

    async fn reset(&self) -> Result<(), AppError> {
        let mut data = self.inner.write().await;
        *data = Snapshot::default();
        info!("Memory store reset");
        Ok(())
    }
}
