use crate::domain::model::MatchReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

/// What a completed run hands back to the caller.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub output_path: Option<String>,
    pub summary_lines: Vec<String>,
    pub assigned: usize,
    pub unassigned: usize,
    pub rejected_rows: usize,
}

impl RunResult {
    fn from_report(report: &MatchReport, output_path: Option<String>) -> Self {
        Self {
            output_path,
            summary_lines: report.summary_lines(),
            assigned: report.outcome.assigned_count(),
            unassigned: report.outcome.unassigned.len(),
            rejected_rows: report.rejections.len(),
        }
    }
}

pub struct MatchRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> MatchRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    async fn extract_and_match(&self) -> Result<MatchReport> {
        tracing::info!("📥 Reading rosters...");
        let source = self.pipeline.extract().await?;
        tracing::debug!(
            "Read {} bytes of sites and {} bytes of students",
            source.sites_csv.len(),
            source.students_csv.len()
        );

        tracing::info!("🔧 Matching students to sites...");
        let report = self.pipeline.transform(source).await?;

        if !report.rejections.is_empty() {
            tracing::warn!(
                "⚠️ {} roster rows were skipped, see the warnings above",
                report.rejections.len()
            );
        }
        Ok(report)
    }

    pub async fn run(&self) -> Result<RunResult> {
        tracing::info!("🚀 Starting placement matching");
        let report = self.extract_and_match().await?;

        tracing::info!("💾 Writing results...");
        let mut result = RunResult::from_report(&report, None);
        let output_path = self.pipeline.load(report).await?;
        result.output_path = Some(output_path);

        for line in &result.summary_lines {
            tracing::info!("{}", line);
        }
        Ok(result)
    }

    /// Parses and matches without writing anything.
    pub async fn dry_run(&self) -> Result<RunResult> {
        tracing::info!("🔍 DRY RUN MODE - no output files will be written");
        let report = self.extract_and_match().await?;
        let result = RunResult::from_report(&report, None);

        for line in &result.summary_lines {
            tracing::info!("{}", line);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        CapacityLedger, MatchOutcome, RosterSource, RowRejection, Site, Student,
    };
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedPipeline {
        loaded: AtomicBool,
    }

    #[async_trait::async_trait]
    impl Pipeline for FixedPipeline {
        async fn extract(&self) -> Result<RosterSource> {
            Ok(RosterSource {
                sites_name: "sites.csv".to_string(),
                sites_csv: Vec::new(),
                students_name: "students.csv".to_string(),
                students_csv: Vec::new(),
            })
        }

        async fn transform(&self, _source: RosterSource) -> Result<MatchReport> {
            let sites = vec![Site::new("A", "Mercy", "Hospital", 5.0, 1)];
            let students = vec![Student::new("1", "Ann", 3)];
            let outcome = crate::core::matcher::match_students_to_sites(&students, &sites)?;
            Ok(MatchReport {
                sites,
                outcome,
                rejections: vec![RowRejection {
                    source_name: "students.csv".to_string(),
                    row: 2,
                    reason: "missing ID".to_string(),
                }],
            })
        }

        async fn load(&self, _report: MatchReport) -> Result<String> {
            self.loaded.store(true, Ordering::SeqCst);
            Ok("out/assignments.csv".to_string())
        }
    }

    fn runner() -> MatchRunner<FixedPipeline> {
        MatchRunner::new(FixedPipeline {
            loaded: AtomicBool::new(false),
        })
    }

    #[tokio::test]
    async fn test_run_loads_and_summarizes() {
        let runner = runner();
        let result = runner.run().await.unwrap();

        assert_eq!(result.output_path.as_deref(), Some("out/assignments.csv"));
        assert_eq!(result.assigned, 0);
        assert_eq!(result.unassigned, 1);
        assert_eq!(result.rejected_rows, 1);
        assert!(result.summary_lines.contains(&"Site Mercy (A): 1 spots left".to_string()));
        assert!(result.summary_lines.contains(&"Ann (ID: 1)".to_string()));
        assert!(runner.pipeline.loaded.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dry_run_skips_load() {
        let runner = runner();
        let result = runner.dry_run().await.unwrap();

        assert!(result.output_path.is_none());
        assert!(!runner.pipeline.loaded.load(Ordering::SeqCst));
    }

    #[test]
    fn test_run_result_counts() {
        let mut ledger = CapacityLedger::default();
        ledger.insert("A", 1);
        let report = MatchReport {
            sites: vec![],
            outcome: MatchOutcome {
                assignments: vec![],
                unassigned: vec![],
                ledger,
            },
            rejections: vec![],
        };
        let result = RunResult::from_report(&report, None);
        assert_eq!(result.assigned, 0);
        assert_eq!(result.summary_lines, vec!["Remaining site capacity:".to_string()]);
    }
}
