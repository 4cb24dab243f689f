use crate::config::toml_config::MatchSettings;
use crate::domain::model::{RowRejection, Site, Student};
use crate::domain::ports::TravelClassifier;
use crate::utils::error::{MatchError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;

/// Turns roster CSV bytes into typed records.
///
/// Bad rows are logged and returned as [`RowRejection`]s; only a missing
/// required column fails the whole file. Row numbers are zero-based data rows
/// (header excluded).
pub struct RosterReader<'a, C: TravelClassifier> {
    settings: &'a MatchSettings,
    classifier: &'a C,
}

struct HeaderIndex {
    source_name: String,
    headers: StringRecord,
}

impl HeaderIndex {
    fn required(&self, column: &str) -> Result<usize> {
        self.optional(column).ok_or_else(|| MatchError::MissingColumn {
            column: column.to_string(),
            source_name: self.source_name.clone(),
        })
    }

    fn optional(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == column)
    }
}

fn cell(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn reject(rejections: &mut Vec<RowRejection>, source_name: &str, row: usize, reason: String) {
    tracing::warn!("⚠️ Skipping row {} of {}: {}", row, source_name, reason);
    rejections.push(RowRejection {
        source_name: source_name.to_string(),
        row,
        reason,
    });
}

fn open(data: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(data)
}

fn parse_distance(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("distance '{}' is not a number", raw))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("distance '{}' must be a non-negative number", raw));
    }
    Ok(value)
}

fn parse_capacity(raw: &str) -> std::result::Result<u32, String> {
    if let Ok(value) = raw.parse::<u32>() {
        return Ok(value);
    }
    // 試算表常把整數存成 "3.0"
    match raw.parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) => {
            Ok(value as u32)
        }
        _ => Err(format!("capacity '{}' must be a non-negative integer", raw)),
    }
}

impl<'a, C: TravelClassifier> RosterReader<'a, C> {
    pub fn new(settings: &'a MatchSettings, classifier: &'a C) -> Self {
        Self {
            settings,
            classifier,
        }
    }

    pub fn read_sites(
        &self,
        source_name: &str,
        data: &[u8],
    ) -> Result<(Vec<Site>, Vec<RowRejection>)> {
        let columns = &self.settings.sites.columns;
        let mut reader = open(data);
        let index = HeaderIndex {
            source_name: source_name.to_string(),
            headers: reader.headers()?.clone(),
        };

        let id_col = Some(index.required(&columns.id)?);
        let name_col = Some(index.required(&columns.name)?);
        let type_col = Some(index.required(&columns.site_type)?);
        let distance_col = Some(index.required(&columns.distance)?);
        let capacity_col = Some(index.required(&columns.capacity)?);

        let mut sites = Vec::new();
        let mut rejections = Vec::new();
        let mut seen = HashSet::new();

        for (row, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    reject(&mut rejections, source_name, row, e.to_string());
                    continue;
                }
            };

            let Some(id) = cell(&record, id_col) else {
                reject(&mut rejections, source_name, row, "missing site id".to_string());
                continue;
            };
            let Some(name) = cell(&record, name_col) else {
                reject(&mut rejections, source_name, row, "missing site name".to_string());
                continue;
            };
            let site_type = cell(&record, type_col).unwrap_or_default();

            let parsed = cell(&record, distance_col)
                .ok_or_else(|| "missing distance".to_string())
                .and_then(parse_distance)
                .and_then(|distance| {
                    cell(&record, capacity_col)
                        .ok_or_else(|| "missing capacity".to_string())
                        .and_then(parse_capacity)
                        .map(|capacity| (distance, capacity))
                });

            let (distance, capacity) = match parsed {
                Ok(values) => values,
                Err(reason) => {
                    reject(&mut rejections, source_name, row, reason);
                    continue;
                }
            };

            if !seen.insert(id.to_string()) {
                reject(
                    &mut rejections,
                    source_name,
                    row,
                    format!("duplicate site id '{}'", id),
                );
                continue;
            }

            sites.push(Site::new(id, name, site_type, distance, capacity));
        }

        tracing::info!(
            "🏥 Loaded {} sites from {} ({} rows skipped)",
            sites.len(),
            source_name,
            rejections.len()
        );
        Ok((sites, rejections))
    }

    pub fn read_students(
        &self,
        source_name: &str,
        data: &[u8],
    ) -> Result<(Vec<Student>, Vec<RowRejection>)> {
        let columns = &self.settings.students.columns;
        let mut reader = open(data);
        let index = HeaderIndex {
            source_name: source_name.to_string(),
            headers: reader.headers()?.clone(),
        };

        let id_col = Some(index.required(&columns.id)?);
        let travel_col = Some(index.required(&columns.travel_capacity)?);
        let name_col = index.optional(&columns.name);
        let workplace_col = index.optional(&columns.workplace);
        let preference_col = index.optional(&columns.preference);
        let constraints_col = index.optional(&columns.constraints);

        if name_col.is_none() {
            tracing::debug!(
                "No '{}' column in {}, using placeholder names",
                columns.name,
                source_name
            );
        }

        let mut students = Vec::new();
        let mut rejections = Vec::new();
        let mut seen = HashSet::new();

        for (row, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    reject(&mut rejections, source_name, row, e.to_string());
                    continue;
                }
            };

            let Some(id) = cell(&record, id_col) else {
                reject(&mut rejections, source_name, row, "missing ID".to_string());
                continue;
            };

            let travel_text = cell(&record, travel_col).unwrap_or_default();
            let max_distance = match self.classifier.max_distance(travel_text) {
                Ok(miles) => miles,
                Err(e) => {
                    reject(&mut rejections, source_name, row, e.to_string());
                    continue;
                }
            };

            if !seen.insert(id.to_string()) {
                reject(
                    &mut rejections,
                    source_name,
                    row,
                    format!("duplicate student id '{}'", id),
                );
                continue;
            }

            // 欄位缺少或儲存格空白都用預設名稱
            let name = cell(&record, name_col)
                .map(str::to_string)
                .unwrap_or_else(|| format!("FirstName LastName {}", row));

            students.push(Student {
                id: id.to_string(),
                name,
                workplace: cell(&record, workplace_col).map(str::to_string),
                max_distance,
                preferred_type: cell(&record, preference_col).map(str::to_string),
                other_constraints: cell(&record, constraints_col).map(str::to_string),
            });
        }

        tracing::info!(
            "🎓 Loaded {} students from {} ({} rows skipped)",
            students.len(),
            source_name,
            rejections.len()
        );
        Ok((students, rejections))
    }
}
