pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_input_file, validate_path, Validate};
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", command(name = "placement-matcher"))]
#[cfg_attr(feature = "cli", command(about = "Match students to placement sites"))]
pub struct CliConfig {
    /// CSV storing the sites for matching
    #[cfg_attr(feature = "cli", arg(long))]
    pub sites: String,

    /// CSV storing the students to be matched
    #[cfg_attr(feature = "cli", arg(long))]
    pub students: String,

    /// Optional TOML file with column mapping and travel rules
    #[cfg_attr(feature = "cli", arg(long))]
    pub config: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON lines"))]
    pub log_json: bool,

    #[cfg_attr(
        feature = "cli",
        arg(long, help = "Parse and match without writing output files")
    )]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn new(
        sites: impl Into<String>,
        students: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            sites: sites.into(),
            students: students.into(),
            config: None,
            output_path: output_path.into(),
            verbose: false,
            log_json: false,
            dry_run: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn sites_path(&self) -> &str {
        &self.sites
    }

    fn students_path(&self) -> &str {
        &self.students
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_input_file("sites", &self.sites, &["csv"])?;
        validate_input_file("students", &self.students, &["csv"])?;
        validate_path("output_path", &self.output_path)?;
        if let Some(config) = &self.config {
            validate_input_file("config", config, &["toml"])?;
        }
        Ok(())
    }
}
