//! JSON payloads for the record endpoints and their validation.
//!
//! Every field is optional on the wire so one payload type serves both create
//! and partial update. `placed` is not accepted; unknown fields are ignored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{parse_id, AppError};
use crate::models::student::DEFAULT_GENDER;
use crate::models::{
    normalize_skill_list, CompanyChanges, NewCompany, NewPlacement, NewStudent,
    PlacementChanges, PlacementStatus, StudentChanges,
};

const MAX_CGPA: f64 = 10.0;

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

/// Required on create: present and non-blank.
fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    optional_text(field, value)?.ok_or_else(|| invalid(format!("{field} is required")))
}

/// May be absent, but if sent must not be blank.
fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Err(invalid(format!("{field} must not be empty"))),
        other => Ok(other),
    }
}

fn check_email(email: &str) -> Result<(), AppError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(invalid("email must contain '@'"))
    }
}

fn check_cgpa(cgpa: f64) -> Result<(), AppError> {
    if (0.0..=MAX_CGPA).contains(&cgpa) {
        Ok(())
    } else {
        Err(invalid(format!("cgpa must be between 0 and {MAX_CGPA}")))
    }
}

fn check_count(field: &str, value: i32) -> Result<(), AppError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must not be negative")))
    }
}

fn check_amount(field: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must not be negative")))
    }
}

/// Package band check, shared by create and update.
pub fn check_package_band(min_package: f64, max_package: f64) -> Result<(), AppError> {
    check_amount("min_package", min_package)?;
    check_amount("max_package", max_package)?;
    if min_package > max_package {
        return Err(invalid("min_package must not exceed max_package"));
    }
    Ok(())
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| invalid("placement_date must be an RFC 3339 timestamp or YYYY-MM-DD"))
}

fn parse_status(raw: &str) -> Result<PlacementStatus, AppError> {
    raw.parse().map_err(|e: crate::models::placement::UnknownStatus| invalid(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Students
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StudentPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub branch: Option<String>,
    pub cgpa: Option<f64>,
    pub skills: Option<Vec<String>>,
    pub projects: Option<i32>,
    pub internships: Option<i32>,
    pub resume_text: Option<String>,
    pub gender: Option<String>,
}

impl StudentPayload {
    pub fn into_new(self) -> Result<NewStudent, AppError> {
        let name = required_text("name", self.name)?;
        let email = required_text("email", self.email)?;
        check_email(&email)?;
        let branch = required_text("branch", self.branch)?;

        let cgpa = self.cgpa.unwrap_or(0.0);
        check_cgpa(cgpa)?;
        let projects = self.projects.unwrap_or(0);
        check_count("projects", projects)?;
        let internships = self.internships.unwrap_or(0);
        check_count("internships", internships)?;

        Ok(NewStudent {
            name,
            email,
            branch,
            cgpa,
            skills: normalize_skill_list(self.skills.unwrap_or_default()),
            projects,
            internships,
            resume_text: self.resume_text.unwrap_or_default(),
            gender: optional_text("gender", self.gender)?
                .unwrap_or_else(|| DEFAULT_GENDER.to_string()),
        })
    }

    pub fn into_changes(self) -> Result<StudentChanges, AppError> {
        let changes = StudentChanges {
            name: optional_text("name", self.name)?,
            email: optional_text("email", self.email)?,
            branch: optional_text("branch", self.branch)?,
            cgpa: self.cgpa,
            skills: self.skills.map(normalize_skill_list),
            projects: self.projects,
            internships: self.internships,
            resume_text: self.resume_text,
            gender: optional_text("gender", self.gender)?,
        };

        if let Some(email) = &changes.email {
            check_email(email)?;
        }
        if let Some(cgpa) = changes.cgpa {
            check_cgpa(cgpa)?;
        }
        if let Some(projects) = changes.projects {
            check_count("projects", projects)?;
        }
        if let Some(internships) = changes.internships {
            check_count("internships", internships)?;
        }

        let empty = changes.name.is_none()
            && changes.email.is_none()
            && changes.branch.is_none()
            && changes.cgpa.is_none()
            && changes.skills.is_none()
            && changes.projects.is_none()
            && changes.internships.is_none()
            && changes.resume_text.is_none()
            && changes.gender.is_none();
        if empty {
            return Err(invalid("No fields to update"));
        }
        Ok(changes)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Companies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CompanyPayload {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub min_package: Option<f64>,
    pub max_package: Option<f64>,
    pub requirements: Option<Vec<String>>,
    pub website: Option<String>,
}

impl CompanyPayload {
    pub fn into_new(self) -> Result<NewCompany, AppError> {
        let name = required_text("name", self.name)?;
        let industry = required_text("industry", self.industry)?;
        let min_package = self.min_package.unwrap_or(0.0);
        let max_package = self.max_package.unwrap_or(0.0);
        check_package_band(min_package, max_package)?;

        Ok(NewCompany {
            name,
            industry,
            min_package,
            max_package,
            requirements: normalize_skill_list(self.requirements.unwrap_or_default()),
            website: self.website.map(|w| w.trim().to_string()).unwrap_or_default(),
        })
    }

    /// Band checks that need the stored counterpart are done by the handler.
    pub fn into_changes(self) -> Result<CompanyChanges, AppError> {
        let changes = CompanyChanges {
            name: optional_text("name", self.name)?,
            industry: optional_text("industry", self.industry)?,
            min_package: self.min_package,
            max_package: self.max_package,
            requirements: self.requirements.map(normalize_skill_list),
            website: self.website.map(|w| w.trim().to_string()),
        };

        if let Some(min) = changes.min_package {
            check_amount("min_package", min)?;
        }
        if let Some(max) = changes.max_package {
            check_amount("max_package", max)?;
        }

        let empty = changes.name.is_none()
            && changes.industry.is_none()
            && changes.min_package.is_none()
            && changes.max_package.is_none()
            && changes.requirements.is_none()
            && changes.website.is_none();
        if empty {
            return Err(invalid("No fields to update"));
        }
        Ok(changes)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Placements
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PlacementPayload {
    pub student_id: Option<String>,
    pub company_id: Option<String>,
    pub role: Option<String>,
    pub package: Option<f64>,
    pub status: Option<String>,
    pub placement_date: Option<String>,
}

fn required_id(kind: &str, raw: Option<String>) -> Result<Uuid, AppError> {
    let raw = required_text(&format!("{kind}_id"), raw)?;
    parse_id(kind, &raw)
}

impl PlacementPayload {
    pub fn into_new(self) -> Result<NewPlacement, AppError> {
        let student_id = required_id("student", self.student_id)?;
        let company_id = required_id("company", self.company_id)?;
        let role = required_text("role", self.role)?;
        let package = self
            .package
            .ok_or_else(|| invalid("package is required"))?;
        check_amount("package", package)?;

        Ok(NewPlacement {
            student_id,
            company_id,
            role,
            package,
            status: self
                .status
                .as_deref()
                .map(parse_status)
                .transpose()?
                .unwrap_or_default(),
            placement_date: self
                .placement_date
                .as_deref()
                .map(parse_date)
                .transpose()?
                .unwrap_or_else(Utc::now),
        })
    }

    /// A placement keeps its student and company; sending either is rejected.
    pub fn into_changes(self) -> Result<PlacementChanges, AppError> {
        if self.student_id.is_some() || self.company_id.is_some() {
            return Err(invalid(
                "student_id and company_id cannot be changed; create a new placement instead",
            ));
        }

        let changes = PlacementChanges {
            role: optional_text("role", self.role)?,
            package: self.package,
            status: self.status.as_deref().map(parse_status).transpose()?,
            placement_date: self.placement_date.as_deref().map(parse_date).transpose()?,
        };
        if let Some(package) = changes.package {
            check_amount("package", package)?;
        }

        let empty = changes.role.is_none()
            && changes.package.is_none()
            && changes.status.is_none()
            && changes.placement_date.is_none();
        if empty {
            return Err(invalid("No fields to update"));
        }
        Ok(changes)
    }
}
