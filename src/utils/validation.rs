use crate::utils::error::{MatchError, Result};
use std::collections::HashSet;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 檢查輸入檔案存在且副檔名在允許清單內
pub fn validate_input_file(
    field_name: &str,
    path: &str,
    allowed_extensions: &[&str],
) -> Result<()> {
    validate_path(field_name, path)?;

    if !Path::new(path).is_file() {
        return Err(MatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "File not found".to_string(),
        });
    }

    validate_file_extensions(field_name, &[path.to_string()], allowed_extensions)
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        let extension = Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension {
            Some(ext) if allowed_set.contains(ext.as_str()) => {}
            Some(ext) => {
                return Err(MatchError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        ext,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(MatchError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["sites.csv".to_string(), "STUDENTS.CSV".to_string()];
        assert!(validate_file_extensions("rosters", &files, &["csv"]).is_ok());

        let invalid_files = vec!["sites.xlsx".to_string()];
        assert!(validate_file_extensions("rosters", &invalid_files, &["csv"]).is_err());

        let no_extension = vec!["sites".to_string()];
        assert!(validate_file_extensions("rosters", &no_extension, &["csv"]).is_err());
    }

    #[test]
    fn test_validate_input_file() {
        let mut csv_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(csv_file, "id,name").unwrap();
        let path = csv_file.path().to_str().unwrap().to_string();
        assert!(validate_input_file("sites", &path, &["csv"]).is_ok());

        assert!(validate_input_file("sites", "/definitely/not/here.csv", &["csv"]).is_err());

        let txt_file = Builder::new().suffix(".txt").tempfile().unwrap();
        let txt_path = txt_file.path().to_str().unwrap().to_string();
        assert!(validate_input_file("sites", &txt_path, &["csv"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("travel.no_transportation_miles", 1, 0, 8).is_ok());
        assert!(validate_range("travel.no_transportation_miles", 9, 0, 8).is_err());
    }
}
