use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub industry: String,
    /// LPA
    pub min_package: f64,
    /// LPA
    pub max_package: f64,
    pub requirements: Vec<String>,
    pub website: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub industry: String,
    pub min_package: f64,
    pub max_package: f64,
    pub requirements: Vec<String>,
    pub website: String,
}

impl NewCompany {
    pub fn into_company(self, id: Uuid) -> Company {
        Company {
            id,
            name: self.name,
            industry: self.industry,
            min_package: self.min_package,
            max_package: self.max_package,
            requirements: self.requirements,
            website: self.website,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub min_package: Option<f64>,
    pub max_package: Option<f64>,
    pub requirements: Option<Vec<String>>,
    pub website: Option<String>,
}

impl CompanyChanges {
    pub fn apply(self, company: &mut Company) {
        if let Some(v) = self.name {
            company.name = v;
        }
        if let Some(v) = self.industry {
            company.industry = v;
        }
        if let Some(v) = self.min_package {
            company.min_package = v;
        }
        if let Some(v) = self.max_package {
            company.max_package = v;
        }
        if let Some(v) = self.requirements {
            company.requirements = v;
        }
        if let Some(v) = self.website {
            company.website = v;
        }
    }
}
