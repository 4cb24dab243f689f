use crate::domain::model::{MatchReport, RosterSource};
use crate::domain::travel::TravelTier;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn sites_path(&self) -> &str;
    fn students_path(&self) -> &str;
    fn output_path(&self) -> &str;
}

/// Maps free-text travel answers to a tier and a numeric maximum distance.
pub trait TravelClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<TravelTier>;
    fn max_distance(&self, text: &str) -> Result<u32>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RosterSource>;
    async fn transform(&self, source: RosterSource) -> Result<MatchReport>;
    async fn load(&self, report: MatchReport) -> Result<String>;
}
