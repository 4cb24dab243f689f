use crate::app::classifier::PatternClassifier;
use crate::app::report::{assignments_csv, timestamped_name, unassigned_csv, RunSummary};
use crate::app::roster::RosterReader;
use crate::config::toml_config::MatchSettings;
use crate::core::matcher::match_students_to_sites;
use crate::domain::model::{MatchReport, RosterSource};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use chrono::Local;
use std::path::Path;

/// 讀取兩份名冊、配對、寫出結果
pub struct RosterPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) source: S,
    pub(crate) sink: S,
    pub(crate) config: C,
    pub(crate) settings: MatchSettings,
    classifier: PatternClassifier,
}

impl<S: Storage, C: ConfigProvider> RosterPipeline<S, C> {
    /// `source` resolves the roster paths, `sink` receives the output files.
    pub fn new(source: S, sink: S, config: C, settings: MatchSettings) -> Result<Self> {
        let classifier = settings.classifier()?;
        tracing::debug!(
            "Travel policy: no transportation = {} miles",
            classifier.policy().no_transportation_miles
        );
        Ok(Self {
            source,
            sink,
            config,
            settings,
            classifier,
        })
    }

    fn display_name(path: &str) -> String {
        Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path)
            .to_string()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RosterPipeline<S, C> {
    async fn extract(&self) -> Result<RosterSource> {
        let sites_path = self.config.sites_path();
        let students_path = self.config.students_path();

        tracing::debug!("Reading site roster from: {}", sites_path);
        let sites_csv = self.source.read_file(sites_path).await?;

        tracing::debug!("Reading student roster from: {}", students_path);
        let students_csv = self.source.read_file(students_path).await?;

        Ok(RosterSource {
            sites_name: Self::display_name(sites_path),
            sites_csv,
            students_name: Self::display_name(students_path),
            students_csv,
        })
    }

    async fn transform(&self, source: RosterSource) -> Result<MatchReport> {
        let reader = RosterReader::new(&self.settings, &self.classifier);

        let (sites, mut rejections) = reader.read_sites(&source.sites_name, &source.sites_csv)?;
        let (students, student_rejections) =
            reader.read_students(&source.students_name, &source.students_csv)?;
        rejections.extend(student_rejections);

        if sites.is_empty() {
            tracing::warn!("⚠️ No usable sites in {}", source.sites_name);
        }

        // 配對本身是同步的單次計算
        let outcome = match_students_to_sites(&students, &sites)?;

        Ok(MatchReport {
            sites,
            outcome,
            rejections,
        })
    }

    async fn load(&self, report: MatchReport) -> Result<String> {
        let generated_at = Local::now();
        let output = &self.settings.output;

        let file_name = timestamped_name(&output.filename_prefix, &generated_at, "csv");
        let data = assignments_csv(&report.outcome.assignments)?;
        tracing::debug!("Writing {} bytes to {}", data.len(), file_name);
        self.sink.write_file(&file_name, &data).await?;

        if output.write_unassigned && !report.outcome.unassigned.is_empty() {
            let unassigned_name = timestamped_name("unassigned", &generated_at, "csv");
            let data = unassigned_csv(&report.outcome.unassigned)?;
            self.sink.write_file(&unassigned_name, &data).await?;
            tracing::info!("📝 Unassigned students written to {}", unassigned_name);
        }

        if output.write_summary_json {
            let summary_name = timestamped_name(&output.filename_prefix, &generated_at, "json");
            let data = RunSummary::from_report(&report, &generated_at).to_json()?;
            self.sink.write_file(&summary_name, &data).await?;
            tracing::info!("📝 Run summary written to {}", summary_name);
        }

        let output_path = Path::new(self.config.output_path())
            .join(&file_name)
            .to_string_lossy()
            .into_owned();
        tracing::info!("💾 Assignments written to {}", output_path);
        Ok(output_path)
    }
}
