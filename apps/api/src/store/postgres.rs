use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use super::{CompanyFilter, EntityStore, Snapshot, StoreCounts, StudentFilter};
use crate::errors::AppError;
use crate::models::{
    Company, CompanyChanges, NewCompany, NewPlacement, NewStudent, Placement, PlacementChanges,
    PlacementStatus, PlacementView, Student, StudentChanges,
};

const PLACEMENT_VIEW_SELECT: &str = r#"
    SELECT p.id, p.student_id, p.company_id, p.role, p.package, p.status, p.placement_date,
           s.name AS student_name, c.name AS company_name
    FROM placements p
    LEFT JOIN students s ON s.id = p.student_id
    LEFT JOIN companies c ON c.id = p.company_id
"#;

/// Postgres-backed store. Writes that touch placements run in one transaction
/// together with the `placed` recomputation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE metacharacters and wraps the term for substring matching.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn package_band_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_check_violation() => {
            AppError::Validation("min_package must not exceed max_package".to_string())
        }
        _ => AppError::Database(err),
    }
}

fn unique_email_violation(err: sqlx::Error, email: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Validation(format!("A student with email '{email}' already exists"))
        }
        _ => AppError::Database(err),
    }
}

async fn refresh_placed(
    tx: &mut Transaction<'_, Postgres>,
    student_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    if student_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        r#"
        UPDATE students s
        SET placed = EXISTS (
            SELECT 1 FROM placements p
            WHERE p.student_id = s.id AND p.status = 'confirmed'
        )
        WHERE s.id = ANY($1)
        "#,
    )
    .bind(student_ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl EntityStore for PgStore {
    async fn find_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, AppError> {
        Ok(sqlx::query_as::<_, Student>(
            r#"
            SELECT * FROM students
            WHERE ($1::text IS NULL OR branch = $1)
              AND ($2::boolean IS NULL OR placed = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR email ILIKE $3)
            ORDER BY name ASC, id ASC
            OFFSET $4
            LIMIT $5
            "#,
        )
        .bind(filter.branch.as_deref())
        .bind(filter.placed)
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.offset.unwrap_or(0).max(0))
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn count_students(&self, filter: &StudentFilter) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM students
            WHERE ($1::text IS NULL OR branch = $1)
              AND ($2::boolean IS NULL OR placed = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR email ILIKE $3)
            "#,
        )
        .bind(filter.branch.as_deref())
        .bind(filter.placed)
        .bind(filter.search.as_deref().map(like_pattern))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_student(&self, id: Uuid) -> Result<Option<Student>, AppError> {
        Ok(
            sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_student(&self, new: NewStudent) -> Result<Student, AppError> {
        let email = new.email.clone();
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students
                (id, name, email, branch, cgpa, skills, projects, internships,
                 placed, resume_text, gender)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.branch)
        .bind(new.cgpa)
        .bind(&new.skills)
        .bind(new.projects)
        .bind(new.internships)
        .bind(&new.resume_text)
        .bind(&new.gender)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_email_violation(e, &email))?;

        info!("Inserted student {}", student.id);
        Ok(student)
    }

    async fn update_student(
        &self,
        id: Uuid,
        changes: StudentChanges,
    ) -> Result<Option<Student>, AppError> {
        let email = changes.email.clone().unwrap_or_default();
        sqlx::query_as::<_, Student>(
            r#"
            UPDATE students SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                branch = COALESCE($4, branch),
                cgpa = COALESCE($5, cgpa),
                skills = COALESCE($6, skills),
                projects = COALESCE($7, projects),
                internships = COALESCE($8, internships),
                resume_text = COALESCE($9, resume_text),
                gender = COALESCE($10, gender)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.branch)
        .bind(changes.cgpa)
        .bind(changes.skills)
        .bind(changes.projects)
        .bind(changes.internships)
        .bind(changes.resume_text)
        .bind(changes.gender)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_email_violation(e, &email))
    }

    async fn delete_student(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM placements WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;

        if deleted > 0 {
            info!("Deleted student {id} and its placements");
        }
        Ok(deleted > 0)
    }

    async fn distinct_branches(&self) -> Result<Vec<String>, AppError> {
        Ok(
            sqlx::query_scalar("SELECT DISTINCT branch FROM students ORDER BY branch")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, AppError> {
        Ok(sqlx::query_as::<_, Company>(
            r#"
            SELECT * FROM companies
            WHERE ($1::text IS NULL OR industry = $1)
              AND ($2::text IS NULL OR name ILIKE $2)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(filter.industry.as_deref())
        .bind(filter.search.as_deref().map(like_pattern))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        Ok(
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_company(&self, new: NewCompany) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies
                (id, name, industry, min_package, max_package, requirements, website)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.industry)
        .bind(new.min_package)
        .bind(new.max_package)
        .bind(&new.requirements)
        .bind(&new.website)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted company {}", company.id);
        Ok(company)
    }

    async fn update_company(
        &self,
        id: Uuid,
        changes: CompanyChanges,
    ) -> Result<Option<Company>, AppError> {
        Ok(sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                industry = COALESCE($3, industry),
                min_package = COALESCE($4, min_package),
                max_package = COALESCE($5, max_package),
                requirements = COALESCE($6, requirements),
                website = COALESCE($7, website)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.industry)
        .bind(changes.min_package)
        .bind(changes.max_package)
        .bind(changes.requirements)
        .bind(changes.website)
        .fetch_optional(&self.pool)
        .await
        .map_err(package_band_violation)?)
    }

    async fn delete_company(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let affected: Vec<Uuid> =
            sqlx::query_scalar("DELETE FROM placements WHERE company_id = $1 RETURNING student_id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        let deleted = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        refresh_placed(&mut tx, &affected).await?;
        tx.commit().await?;

        if deleted > 0 {
            info!(
                "Deleted company {id}; refreshed placement status for {} students",
                affected.len()
            );
        }
        Ok(deleted > 0)
    }

    async fn distinct_industries(&self) -> Result<Vec<String>, AppError> {
        Ok(
            sqlx::query_scalar("SELECT DISTINCT industry FROM companies ORDER BY industry")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find_placements(
        &self,
        status: Option<PlacementStatus>,
    ) -> Result<Vec<PlacementView>, AppError> {
        let query = format!(
            "{PLACEMENT_VIEW_SELECT} WHERE ($1::text IS NULL OR p.status = $1) \
             ORDER BY p.placement_date DESC, p.id ASC"
        );
        Ok(sqlx::query_as::<_, PlacementView>(&query)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_placement(&self, id: Uuid) -> Result<Option<PlacementView>, AppError> {
        let query = format!("{PLACEMENT_VIEW_SELECT} WHERE p.id = $1");
        Ok(sqlx::query_as::<_, PlacementView>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_placement(&self, new: NewPlacement) -> Result<Placement, AppError> {
        let mut tx = self.pool.begin().await?;

        let student_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE id = $1)")
                .bind(new.student_id)
                .fetch_one(&mut *tx)
                .await?;
        if !student_exists {
            return Err(AppError::NotFound(format!(
                "Student {} not found",
                new.student_id
            )));
        }
        let company_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM companies WHERE id = $1)")
                .bind(new.company_id)
                .fetch_one(&mut *tx)
                .await?;
        if !company_exists {
            return Err(AppError::NotFound(format!(
                "Company {} not found",
                new.company_id
            )));
        }

        let placement = sqlx::query_as::<_, Placement>(
            r#"
            INSERT INTO placements
                (id, student_id, company_id, role, package, status, placement_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.student_id)
        .bind(new.company_id)
        .bind(&new.role)
        .bind(new.package)
        .bind(new.status.as_str())
        .bind(new.placement_date)
        .fetch_one(&mut *tx)
        .await?;

        refresh_placed(&mut tx, &[placement.student_id]).await?;
        tx.commit().await?;

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
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Placement>(
            r#"
            UPDATE placements SET
                role = COALESCE($2, role),
                package = COALESCE($3, package),
                status = COALESCE($4, status),
                placement_date = COALESCE($5, placement_date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.role)
        .bind(changes.package)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.placement_date)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(placement) = &updated {
            refresh_placed(&mut tx, &[placement.student_id]).await?;
        }
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_placement(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let student_id: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM placements WHERE id = $1 RETURNING student_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if let Some(student_id) = student_id {
            refresh_placed(&mut tx, &[student_id]).await?;
        }
        tx.commit().await?;

        if student_id.is_some() {
            info!("Deleted placement {id}");
        }
        Ok(student_id.is_some())
    }

    async fn snapshot(&self) -> Result<Snapshot, AppError> {
        // REPEATABLE READ so the three reads see one consistent state.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let students = sqlx::query_as::<_, Student>("SELECT * FROM students ORDER BY created_at, id")
            .fetch_all(&mut *tx)
            .await?;
        let companies =
            sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY created_at, id")
                .fetch_all(&mut *tx)
                .await?;
        let placements =
            sqlx::query_as::<_, Placement>("SELECT * FROM placements ORDER BY placement_date, id")
                .fetch_all(&mut *tx)
                .await?;
        tx.commit().await?;

        Ok(Snapshot {
            students,
            companies,
            placements,
        })
    }

    async fn counts(&self) -> Result<StoreCounts, AppError> {
        let (students, companies, placements, placed_students): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM students),
                    (SELECT COUNT(*) FROM companies),
                    (SELECT COUNT(*) FROM placements),
                    (SELECT COUNT(*) FROM students WHERE placed)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(StoreCounts {
            students,
            companies,
            placements,
            placed_students,
        })
    }

    async fn reset(&self) -> Result<(), AppError> {
        sqlx::query("TRUNCATE placements, companies, students")
            .execute(&self.pool)
            .await?;
        info!("Postgres store reset");
        Ok(())
    }
}
