use crate::app::classifier::{default_rules, PatternClassifier, TravelRuleConfig};
use crate::domain::travel::TierPolicy;
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 配對設定檔 (欄位對應、交通規則、輸出選項)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub sites: SiteSection,
    pub students: StudentSection,
    pub travel: TravelConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub columns: SiteColumns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteColumns {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub site_type: String,
    pub distance: String,
    pub capacity: String,
}

impl Default for SiteColumns {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            name: "name".to_string(),
            site_type: "type".to_string(),
            distance: "distance".to_string(),
            capacity: "capacity".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentSection {
    pub columns: StudentColumns,
}

/// Student roster headers as exported by the intake survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentColumns {
    pub id: String,
    /// Optional column; rows get a placeholder name when it is absent.
    pub name: String,
    pub workplace: String,
    pub travel_capacity: String,
    pub preference: String,
    pub constraints: String,
}

impl Default for StudentColumns {
    fn default() -> Self {
        Self {
            id: "Student ID".to_string(),
            name: "Student Name".to_string(),
            workplace: "Workplace_2_TEXT".to_string(),
            travel_capacity: "Travel_capacity".to_string(),
            preference: "Preference".to_string(),
            constraints: "Constraints_2_TEXT".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelConfig {
    pub no_transportation_miles: u32,
    pub rules: Vec<TravelRuleConfig>,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            no_transportation_miles: TierPolicy::default().no_transportation_miles,
            rules: default_rules(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub filename_prefix: String,
    pub write_unassigned: bool,
    pub write_summary_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename_prefix: "assignments".to_string(),
            write_unassigned: false,
            write_summary_json: false,
        }
    }
}

impl MatchSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROSTER_ID_COLUMN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MatchError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn tier_policy(&self) -> TierPolicy {
        TierPolicy {
            no_transportation_miles: self.travel.no_transportation_miles,
        }
    }

    pub fn classifier(&self) -> Result<PatternClassifier> {
        PatternClassifier::new(&self.travel.rules, self.tier_policy())
    }

    pub fn validate_config(&self) -> Result<()> {
        let site_columns = [
            ("sites.columns.id", &self.sites.columns.id),
            ("sites.columns.name", &self.sites.columns.name),
            ("sites.columns.type", &self.sites.columns.site_type),
            ("sites.columns.distance", &self.sites.columns.distance),
            ("sites.columns.capacity", &self.sites.columns.capacity),
        ];
        let student_columns = [
            ("students.columns.id", &self.students.columns.id),
            ("students.columns.name", &self.students.columns.name),
            ("students.columns.workplace", &self.students.columns.workplace),
            (
                "students.columns.travel_capacity",
                &self.students.columns.travel_capacity,
            ),
            ("students.columns.preference", &self.students.columns.preference),
            ("students.columns.constraints", &self.students.columns.constraints),
        ];
        for (field, value) in site_columns.iter().chain(student_columns.iter()) {
            validate_non_empty_string(field, value)?;
        }

        // 不可超過本地範圍，否則「無交通工具」反而比本地範圍遠
        validate_range(
            "travel.no_transportation_miles",
            self.travel.no_transportation_miles,
            0,
            TierPolicy::LOCAL_AREA_MILES,
        )?;

        if self.travel.rules.is_empty() {
            return Err(MatchError::ConfigValidationError {
                field: "travel.rules".to_string(),
                message: "At least one travel rule is required".to_string(),
            });
        }
        self.classifier()?;

        validate_non_empty_string("output.filename_prefix", &self.output.filename_prefix)?;
        if self.output.filename_prefix.contains(&['/', '\\'][..]) {
            return Err(MatchError::InvalidConfigValueError {
                field: "output.filename_prefix".to_string(),
                value: self.output.filename_prefix.clone(),
                reason: "Prefix must not contain path separators".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for MatchSettings {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
