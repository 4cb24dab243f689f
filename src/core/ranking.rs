use crate::core::feasibility::is_feasible;
use crate::domain::model::{CapacityLedger, Site, Student};
use std::cmp::Ordering;

/// Case-insensitive exact match of the student's preferred type against the site type.
pub fn preference_matches(student: &Student, site: &Site) -> bool {
    student
        .preference()
        .map(|preferred| preferred.to_lowercase() == site.site_type.trim().to_lowercase())
        .unwrap_or(false)
}

/// Ordering between two candidates for the same student:
/// preference match first, then nearer, then fewer remaining slots.
pub fn compare_candidates(
    student: &Student,
    (a, a_remaining): (&Site, u32),
    (b, b_remaining): (&Site, u32),
) -> Ordering {
    let a_pref = preference_matches(student, a);
    let b_pref = preference_matches(student, b);

    b_pref
        .cmp(&a_pref)
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| a_remaining.cmp(&b_remaining))
}

/// Feasible sites for `student`, best first. Sites missing from the ledger are skipped.
pub fn rank_feasible_sites<'a>(
    student: &Student,
    sites: &'a [Site],
    ledger: &CapacityLedger,
) -> Vec<(&'a Site, u32)> {
    let mut feasible: Vec<(&Site, u32)> = sites
        .iter()
        .filter_map(|site| ledger.remaining(&site.id).map(|left| (site, left)))
        .filter(|(site, left)| is_feasible(student, site, *left))
        .collect();

    // sort_by 是穩定排序，平手時保留輸入順序
    feasible.sort_by(|a, b| compare_candidates(student, *a, *b));
    feasible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_for(sites: &[Site]) -> CapacityLedger {
        let mut ledger = CapacityLedger::default();
        for site in sites {
            ledger.insert(&site.id, site.capacity);
        }
        ledger
    }

    fn ids(ranked: &[(&Site, u32)]) -> Vec<String> {
        ranked.iter().map(|(s, _)| s.id.clone()).collect()
    }

    #[test]
    fn test_preference_match_ranks_before_nearer_site() {
        let sites = vec![
            Site::new("near", "Near Clinic", "Clinic", 2.0, 3),
            Site::new("far", "Far Hospital", "Hospital", 12.0, 3),
        ];
        let student = Student::new("1", "Ann", 15).with_preferred_type("hospital");

        let ranked = rank_feasible_sites(&student, &sites, &ledger_for(&sites));
        assert_eq!(ids(&ranked), vec!["far", "near"]);
    }

    #[test]
    fn test_no_preference_sorts_by_distance_then_capacity() {
        let sites = vec![
            Site::new("big", "Big", "Clinic", 5.0, 9),
            Site::new("small", "Small", "Clinic", 5.0, 1),
            Site::new("closest", "Closest", "Clinic", 1.0, 9),
        ];
        let student = Student::new("1", "Ann", 15);

        let ranked = rank_feasible_sites(&student, &sites, &ledger_for(&sites));
        assert_eq!(ids(&ranked), vec!["closest", "small", "big"]);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let sites = vec![
            Site::new("first", "One", "Clinic", 4.0, 2),
            Site::new("second", "Two", "Clinic", 4.0, 2),
        ];
        let student = Student::new("1", "Ann", 15);

        let ranked = rank_feasible_sites(&student, &sites, &ledger_for(&sites));
        assert_eq!(ids(&ranked), vec!["first", "second"]);
    }

    #[test]
    fn test_infeasible_sites_are_dropped() {
        let sites = vec![
            Site::new("full", "Full", "Clinic", 1.0, 0),
            Site::new("far", "Far", "Clinic", 40.0, 2),
            Site::new("work", "Work Clinic", "Clinic", 1.0, 2),
            Site::new("ok", "Ok", "Clinic", 3.0, 2),
        ];
        let student = Student::new("1", "Ann", 15).with_workplace("work clinic");

        let ranked = rank_feasible_sites(&student, &sites, &ledger_for(&sites));
        assert_eq!(ids(&ranked), vec!["ok"]);
    }
}
