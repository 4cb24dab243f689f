use crate::domain::model::{AssignmentRecord, MatchReport, RowRejection, Student};
use crate::utils::error::{MatchError, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

// 精確到微秒
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.6f";

pub const ASSIGNMENT_HEADER: [&str; 6] = [
    "id",
    "name",
    "assigned_site_id",
    "assigned_site_name",
    "assigned_site_type",
    "reason",
];

pub fn timestamped_name(
    prefix: &str,
    generated_at: &DateTime<Local>,
    extension: &str,
) -> String {
    format!(
        "{}-{}.{}",
        prefix,
        generated_at.format(TIMESTAMP_FORMAT),
        extension
    )
}

/// Assignment rows with header
/// `id,name,assigned_site_id,assigned_site_name,assigned_site_type,reason`.
pub fn assignments_csv(records: &[AssignmentRecord]) -> Result<Vec<u8>> {
    // 手動寫表頭，沒有資料時也要有表頭
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(ASSIGNMENT_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    into_bytes(writer)
}

pub fn unassigned_csv(students: &[Student]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "name",
        "max_distance",
        "workplace",
        "preferred_type",
        "other_constraints",
    ])?;
    for student in students {
        let max_distance = student.max_distance.to_string();
        writer.write_record([
            student.id.as_str(),
            student.name.as_str(),
            max_distance.as_str(),
            student.workplace.as_deref().unwrap_or_default(),
            student.preferred_type.as_deref().unwrap_or_default(),
            student.other_constraints.as_deref().unwrap_or_default(),
        ])?;
    }
    into_bytes(writer)
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| MatchError::ProcessingError {
        message: format!("Failed to flush CSV buffer: {}", e),
    })
}

#[derive(Debug, Serialize)]
pub struct SiteCapacity {
    pub id: String,
    pub name: String,
    pub initial: u32,
    pub remaining: u32,
}

/// Machine-readable run summary written next to the CSV.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub generated_at: String,
    pub students: usize,
    pub assigned: usize,
    pub unassigned: Vec<&'a str>,
    pub sites: Vec<SiteCapacity>,
    pub rejected_rows: &'a [RowRejection],
}

impl<'a> RunSummary<'a> {
    pub fn from_report(report: &'a MatchReport, generated_at: &DateTime<Local>) -> Self {
        let sites = report
            .sites
            .iter()
            .map(|site| SiteCapacity {
                id: site.id.clone(),
                name: site.name.clone(),
                initial: site.capacity,
                remaining: report
                    .outcome
                    .ledger
                    .remaining(&site.id)
                    .unwrap_or(site.capacity),
            })
            .collect();

        Self {
            generated_at: generated_at.to_rfc3339(),
            students: report.outcome.assignments.len(),
            assigned: report.outcome.assigned_count(),
            unassigned: report
                .outcome
                .unassigned
                .iter()
                .map(|s| s.id.as_str())
                .collect(),
            sites,
            rejected_rows: &report.rejections,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
