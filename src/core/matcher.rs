use crate::core::feasibility::is_employment_conflict;
use crate::core::ranking::{preference_matches, rank_feasible_sites};
use crate::domain::model::{AssignmentRecord, CapacityLedger, MatchOutcome, Site, Student};
use crate::utils::error::{MatchError, Result};
use std::collections::HashSet;

pub const NO_FEASIBLE_SITE_REASON: &str =
    "No feasible site found within travel capacity and capacity constraints.";

pub const EMPLOYMENT_CONFLICT_WARNING: &str =
    "WARNING: employment conflict detected (check manually).";

/// Greedy one-pass matcher.
///
/// Students go tightest travel radius first; each takes the best ranked
/// feasible site and consumes one slot from the ledger. Decisions are final.
#[derive(Debug)]
pub struct Matcher<'a> {
    sites: &'a [Site],
    ledger: CapacityLedger,
}

impl<'a> Matcher<'a> {
    pub fn new(sites: &'a [Site]) -> Result<Self> {
        let mut ledger = CapacityLedger::default();
        for site in sites {
            if !ledger.insert(&site.id, site.capacity) {
                return Err(MatchError::DuplicateSiteId {
                    site_id: site.id.clone(),
                });
            }
        }
        tracing::debug!("Capacity ledger opened for {} sites", ledger.len());

        Ok(Self { sites, ledger })
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    pub fn run(mut self, students: &[Student]) -> Result<MatchOutcome> {
        check_students(students)?;

        let mut ordered: Vec<&Student> = students.iter().collect();
        ordered.sort_by_key(|student| student.max_distance);

        let mut assignments = Vec::with_capacity(ordered.len());
        let mut unassigned = Vec::new();

        for student in ordered {
            match self.assign_one(student)? {
                Some(record) => assignments.push(record),
                None => {
                    tracing::debug!(
                        "Student {} ({}) has no feasible site",
                        student.name,
                        student.id
                    );
                    assignments.push(unassigned_record(student));
                    unassigned.push(student.clone());
                }
            }
        }

        tracing::info!(
            "🧮 Matched {} of {} students ({} unassigned)",
            assignments.len() - unassigned.len(),
            assignments.len(),
            unassigned.len()
        );

        Ok(MatchOutcome {
            assignments,
            unassigned,
            ledger: self.ledger,
        })
    }

    fn assign_one(&mut self, student: &Student) -> Result<Option<AssignmentRecord>> {
        let chosen = match rank_feasible_sites(student, self.sites, &self.ledger).first() {
            Some((site, _)) => *site,
            None => return Ok(None),
        };

        self.consume_slot(&chosen.id)?;

        tracing::debug!(
            "Assigned {} ({}) to {} ({})",
            student.name,
            student.id,
            chosen.name,
            chosen.id
        );

        Ok(Some(AssignmentRecord {
            id: student.id.clone(),
            name: student.name.clone(),
            assigned_site_id: chosen.id.clone(),
            assigned_site_name: chosen.name.clone(),
            assigned_site_type: Some(chosen.site_type.clone()),
            reason: build_reason(student, chosen),
        }))
    }

    fn consume_slot(&mut self, site_id: &str) -> Result<()> {
        let slot = self
            .ledger
            .slot_mut(site_id)
            .ok_or_else(|| MatchError::UnknownSite {
                site_id: site_id.to_string(),
            })?;

        *slot = slot
            .checked_sub(1)
            .ok_or_else(|| MatchError::CapacityUnderflow {
                site_id: site_id.to_string(),
            })?;
        Ok(())
    }
}

/// Runs one matching pass over `students` against `sites`.
pub fn match_students_to_sites(students: &[Student], sites: &[Site]) -> Result<MatchOutcome> {
    Matcher::new(sites)?.run(students)
}

/// Justification text for an assignment decision.
pub fn build_reason(student: &Student, site: &Site) -> String {
    let mut parts = vec![format!(
        "Within {} miles (site distance {} miles).",
        student.max_distance, site.distance
    )];

    if preference_matches(student, site) {
        if let Some(preferred) = student.preference() {
            parts.push(format!("Matches preferred setting type: {}.", preferred));
        }
    }

    // Feasibility already excludes conflicts; this only fires for hand-built pairs.
    if is_employment_conflict(student, site) {
        parts.push(EMPLOYMENT_CONFLICT_WARNING.to_string());
    }

    parts.join(" ")
}

fn unassigned_record(student: &Student) -> AssignmentRecord {
    AssignmentRecord {
        id: student.id.clone(),
        name: student.name.clone(),
        assigned_site_id: String::new(),
        assigned_site_name: String::new(),
        assigned_site_type: None,
        reason: NO_FEASIBLE_SITE_REASON.to_string(),
    }
}

fn check_students(students: &[Student]) -> Result<()> {
    let mut seen = HashSet::with_capacity(students.len());
    for student in students {
        if student.id.trim().is_empty() {
            return Err(MatchError::MissingStudentId);
        }
        if !seen.insert(student.id.as_str()) {
            return Err(MatchError::DuplicateStudentId {
                student_id: student.id.clone(),
            });
        }
    }
    Ok(())
}
