pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::app::classifier::PatternClassifier;
pub use crate::app::pipelines::roster_pipeline::RosterPipeline;
pub use crate::config::{cli::LocalStorage, toml_config::MatchSettings, CliConfig};
pub use crate::core::matcher::{match_students_to_sites, Matcher};
pub use crate::core::runner::{MatchRunner, RunResult};
pub use crate::domain::model::{AssignmentRecord, CapacityLedger, MatchOutcome, Site, Student};
pub use crate::domain::travel::{TierPolicy, TravelTier};
pub use crate::utils::error::{MatchError, Result};
