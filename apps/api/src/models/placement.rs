use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Only `Confirmed` placements count toward analytics and the `placed` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    #[default]
    Confirmed,
    Pending,
    Rejected,
}

#[derive(Debug, Error)]
#[error("unknown placement status '{0}'")]
pub struct UnknownStatus(pub String);

impl PlacementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementStatus::Confirmed => "confirmed",
            PlacementStatus::Pending => "pending",
            PlacementStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(PlacementStatus::Confirmed),
            "pending" => Ok(PlacementStatus::Pending),
            "rejected" => Ok(PlacementStatus::Rejected),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for PlacementStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Placement {
    pub id: Uuid,
    pub student_id: Uuid,
    pub company_id: Uuid,
    pub role: String,
    /// LPA. Expected inside the company's package band but not enforced.
    pub package: f64,
    #[sqlx(try_from = "String")]
    pub status: PlacementStatus,
    pub placement_date: DateTime<Utc>,
}

impl Placement {
    pub fn is_confirmed(&self) -> bool {
        self.status == PlacementStatus::Confirmed
    }
}

/// A placement joined with display names. Names are `None` for dangling references.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlacementView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub placement: Placement,
    pub student_name: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPlacement {
    pub student_id: Uuid,
    pub company_id: Uuid,
    pub role: String,
    pub package: f64,
    pub status: PlacementStatus,
    pub placement_date: DateTime<Utc>,
}

impl NewPlacement {
    pub fn into_placement(self, id: Uuid) -> Placement {
        Placement {
            id,
            student_id: self.student_id,
            company_id: self.company_id,
            role: self.role,
            package: self.package,
            status: self.status,
            placement_date: self.placement_date,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlacementChanges {
    pub role: Option<String>,
    pub package: Option<f64>,
    pub status: Option<PlacementStatus>,
    pub placement_date: Option<DateTime<Utc>>,
}

impl PlacementChanges {
    pub fn apply(self, placement: &mut Placement) {
        if let Some(v) = self.role {
            placement.role = v;
        }
        if let Some(v) = self.package {
            placement.package = v;
        }
        if let Some(v) = self.status {
            placement.status = v;
        }
        if let Some(v) = self.placement_date {
            placement.placement_date = v;
        }
    }
}
