use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 實習單位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub site_type: String,
    /// Distance in miles from the program's reference point.
    pub distance: f64,
    /// Open slots at the start of the run. The engine never writes this field.
    pub capacity: u32,
}

impl Site {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        site_type: impl Into<String>,
        distance: f64,
        capacity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            site_type: site_type.into(),
            distance,
            capacity,
        }
    }
}

/// 學生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub workplace: Option<String>,
    pub max_distance: u32,
    pub preferred_type: Option<String>,
    /// Carried through to the output untouched.
    pub other_constraints: Option<String>,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_distance: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            workplace: None,
            max_distance,
            preferred_type: None,
            other_constraints: None,
        }
    }

    pub fn with_workplace(mut self, workplace: impl Into<String>) -> Self {
        self.workplace = Some(workplace.into());
        self
    }

    pub fn with_preferred_type(mut self, preferred_type: impl Into<String>) -> Self {
        self.preferred_type = Some(preferred_type.into());
        self
    }

    pub fn with_other_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.other_constraints = Some(constraints.into());
        self
    }

    /// Workplace text, `None` when absent or blank.
    pub fn workplace_text(&self) -> Option<&str> {
        self.workplace
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Preferred site type, `None` when absent or blank.
    pub fn preference(&self) -> Option<&str> {
        self.preferred_type
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// One output row per processed student. Site fields are empty for unassigned students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: String,
    pub name: String,
    pub assigned_site_id: String,
    pub assigned_site_name: String,
    pub assigned_site_type: Option<String>,
    pub reason: String,
}

impl AssignmentRecord {
    pub fn is_assigned(&self) -> bool {
        !self.assigned_site_id.is_empty()
    }
}

/// Remaining slots per site id. Owned by the engine for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapacityLedger {
    remaining: HashMap<String, u32>,
}

impl CapacityLedger {
    pub fn remaining(&self, site_id: &str) -> Option<u32> {
        self.remaining.get(site_id).copied()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub(crate) fn insert(&mut self, site_id: &str, capacity: u32) -> bool {
        self.remaining.insert(site_id.to_string(), capacity).is_none()
    }

    pub(crate) fn slot_mut(&mut self, site_id: &str) -> Option<&mut u32> {
        self.remaining.get_mut(site_id)
    }
}

/// Everything one matching run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub assignments: Vec<AssignmentRecord>,
    pub unassigned: Vec<Student>,
    pub ledger: CapacityLedger,
}

impl MatchOutcome {
    pub fn assigned_count(&self) -> usize {
        self.assignments.iter().filter(|r| r.is_assigned()).count()
    }
}

/// A roster row the reader refused, kept for the operator report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRejection {
    pub source_name: String,
    pub row: usize,
    pub reason: String,
}

/// Parsed rosters handed from the reader to the engine.
#[derive(Debug, Clone, Default)]
pub struct Rosters {
    pub sites: Vec<Site>,
    pub students: Vec<Student>,
    pub rejections: Vec<RowRejection>,
}

/// Raw file contents read during extract.
#[derive(Debug, Clone)]
pub struct RosterSource {
    pub sites_name: String,
    pub sites_csv: Vec<u8>,
    pub students_name: String,
    pub students_csv: Vec<u8>,
}

/// Result of transform: the parsed rosters plus the engine's outcome.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub sites: Vec<Site>,
    pub outcome: MatchOutcome,
    pub rejections: Vec<RowRejection>,
}

impl MatchReport {
    /// Operator summary lines: remaining capacity per site, then students needing review.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec!["Remaining site capacity:".to_string()];
        for site in &self.sites {
            let left = self.outcome.ledger.remaining(&site.id).unwrap_or(site.capacity);
            lines.push(format!("Site {} ({}): {} spots left", site.name, site.id, left));
        }

        if !self.outcome.unassigned.is_empty() {
            lines.push("Students without feasible match (need manual review):".to_string());
            for student in &self.outcome.unassigned {
                lines.push(format!("{} (ID: {})", student.name, student.id));
            }
        }

        lines
    }
}
