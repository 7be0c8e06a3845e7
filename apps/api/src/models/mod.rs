pub mod company;
pub mod placement;
pub mod student;

pub use company::{Company, CompanyChanges, NewCompany};
pub use placement::{NewPlacement, Placement, PlacementChanges, PlacementStatus, PlacementView};
pub use student::{NewStudent, Student, StudentChanges};

use std::collections::HashSet;

/// Trims entries, drops empties, and removes case-insensitive duplicates
/// keeping the first spelling.
pub fn normalize_skill_list(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

/// Lower-cased set used for every skill comparison.
pub fn lowercase_set(items: &[String]) -> HashSet<String> {
    items.iter().map(|s| s.trim().to_lowercase()).collect()
}
