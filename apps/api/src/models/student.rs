use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_GENDER: &str = "Other";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub branch: String,
    pub cgpa: f64,
    pub skills: Vec<String>,
    pub projects: i32,
    pub internships: i32,
    /// Projection of "has at least one confirmed placement". Maintained by the store.
    pub placed: bool,
    pub resume_text: String,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated student ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub branch: String,
    pub cgpa: f64,
    pub skills: Vec<String>,
    pub projects: i32,
    pub internships: i32,
    pub resume_text: String,
    pub gender: String,
}

impl NewStudent {
    pub fn into_student(self, id: Uuid) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            branch: self.branch,
            cgpa: self.cgpa,
            skills: self.skills,
            projects: self.projects,
            internships: self.internships,
            placed: false,
            resume_text: self.resume_text,
            gender: Some(self.gender),
            created_at: Utc::now(),
        }
    }
}

/// Field-level update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct StudentChanges {
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

impl StudentChanges {
    pub fn apply(self, student: &mut Student) {
        if let Some(v) = self.name {
            student.name = v;
        }
        if let Some(v) = self.email {
            student.email = v;
        }
        if let Some(v) = self.branch {
            student.branch = v;
        }
        if let Some(v) = self.cgpa {
            student.cgpa = v;
        }
        if let Some(v) = self.skills {
            student.skills = v;
        }
        if let Some(v) = self.projects {
            student.projects = v;
        }
        if let Some(v) = self.internships {
            student.internships = v;
        }
        if let Some(v) = self.resume_text {
            student.resume_text = v;
        }
        if let Some(v) = self.gender {
            student.gender = Some(v);
        }
    }
}
