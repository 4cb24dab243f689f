use crate::domain::model::{Site, Student};

pub fn has_capacity(remaining: u32) -> bool {
    remaining > 0
}

/// Case-insensitive containment either way between workplace and site name.
///
/// Partial names overlap on purpose: "University Hospital" conflicts with "Hospital".
pub fn is_employment_conflict(student: &Student, site: &Site) -> bool {
    let Some(workplace) = student.workplace_text() else {
        return false;
    };

    let site_name = site.name.trim();
    if site_name.is_empty() {
        return false;
    }

    let workplace = workplace.to_lowercase();
    let site_name = site_name.to_lowercase();

    workplace.contains(&site_name) || site_name.contains(&workplace)
}

pub fn within_travel_capacity(student: &Student, site: &Site) -> bool {
    f64::from(student.max_distance) >= site.distance
}

/// Capacity first, then employment conflict, then travel distance.
pub fn is_feasible(student: &Student, site: &Site, remaining: u32) -> bool {
    has_capacity(remaining)
        && !is_employment_conflict(student, site)
        && within_travel_capacity(student, site)
}
