pub mod feasibility;
pub mod matcher;
pub mod ranking;
pub mod runner;

pub use crate::domain::model::{AssignmentRecord, CapacityLedger, MatchOutcome, Site, Student};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TravelClassifier};
pub use crate::utils::error::Result;
