//! Generation settings.
//!
//! Settings come from an optional YAML file; command-line flags are applied
//! on top by the binary. Every field has a default, so an empty file (or no
//! file at all) is a valid configuration.
//!
//! ```yaml
//! students_file: data/students.csv
//! grading_file: data/grading.csv
//! sections_file: data/sections.csv
//! output_dir: out
//! include_student_id: true
//! target_lab: all          # or "Lab 3", or just 3
//! group_by_lab_number: false
//! duplicate_pages: true
//! copies: 2
//! padding_pages: true
//! heavy_row_interval: 5    # 0 or negative disables banding
//! ```

use crate::error::{MarksheetError, MarksheetResult};
use crate::excel::{AssemblyOptions, LayoutOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_STUDENTS_FILE: &str = "./data/students.csv";
pub const DEFAULT_GRADING_FILE: &str = "./data/grading.csv";
pub const DEFAULT_SECTIONS_FILE: &str = "./data/sections.csv";
pub const DEFAULT_COPIES: u32 = 2;
pub const DEFAULT_HEAVY_ROW_INTERVAL: i64 = 5;

/// Which lab(s) to generate when grouping by lab number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawTargetLab")]
pub enum TargetLab {
    #[default]
    All,
    Named(String),
}

impl TargetLab {
    /// `all` (any case) and `0` select every lab, a bare number `N` selects
    /// `Lab N`, anything else is taken as a literal scheme id.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return TargetLab::All;
        }
        match trimmed.parse::<i64>() {
            Ok(number) => Self::from_number(number),
            Err(_) => TargetLab::Named(trimmed.to_string()),
        }
    }

    fn from_number(number: i64) -> Self {
        if number == 0 {
            TargetLab::All
        } else {
            TargetLab::Named(format!("Lab {}", number))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTargetLab {
    Number(i64),
    Text(String),
}

impl From<RawTargetLab> for TargetLab {
    fn from(raw: RawTargetLab) -> Self {
        match raw {
            RawTargetLab::Number(number) => TargetLab::from_number(number),
            RawTargetLab::Text(text) => TargetLab::parse(&text),
        }
    }
}

/// How workbooks are grouped and which ones are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationMode {
    /// One workbook for a single grading scheme, one sheet per section.
    SingleLab(String),
    /// One workbook per grading scheme, one sheet per section.
    AllLabs,
    /// One workbook per section, one sheet per grading scheme.
    AllSections,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarksheetConfig {
    pub students_file: PathBuf,
    pub grading_file: PathBuf,
    pub sections_file: PathBuf,
    pub output_dir: PathBuf,
    pub include_student_id: bool,
    pub target_lab: TargetLab,
    pub group_by_lab_number: bool,
    pub duplicate_pages: bool,
    pub copies: u32,
    pub padding_pages: bool,
    pub heavy_row_interval: i64,
}

impl Default for MarksheetConfig {
    fn default() -> Self {
        Self {
            students_file: PathBuf::from(DEFAULT_STUDENTS_FILE),
            grading_file: PathBuf::from(DEFAULT_GRADING_FILE),
            sections_file: PathBuf::from(DEFAULT_SECTIONS_FILE),
            output_dir: PathBuf::from("."),
            include_student_id: false,
            target_lab: TargetLab::All,
            group_by_lab_number: false,
            duplicate_pages: false,
            copies: DEFAULT_COPIES,
            padding_pages: false,
            heavy_row_interval: DEFAULT_HEAVY_ROW_INTERVAL,
        }
    }
}

impl MarksheetConfig {
    pub fn from_yaml_str(content: &str) -> MarksheetResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: MarksheetConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> MarksheetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            MarksheetError::FileAccess {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> MarksheetResult<()> {
        if self.duplicate_pages && self.copies == 0 {
            return Err(MarksheetError::Config(
                "copies must be at least 1 when duplicate_pages is enabled".to_string(),
            ));
        }
        Ok(())
    }

    pub fn mode(&self) -> GenerationMode {
        match (&self.group_by_lab_number, &self.target_lab) {
            (true, TargetLab::All) => GenerationMode::AllLabs,
            (true, TargetLab::Named(lab)) => GenerationMode::SingleLab(lab.clone()),
            (false, _) => GenerationMode::AllSections,
        }
    }

    /// Banding interval, or `None` when banding is disabled.
    pub fn heavy_rows(&self) -> Option<usize> {
        usize::try_from(self.heavy_row_interval)
            .ok()
            .filter(|interval| *interval > 0)
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            include_student_id: self.include_student_id,
            heavy_row_interval: self.heavy_rows(),
        }
    }

    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            duplicate_copies: self.duplicate_pages.then_some(self.copies),
            padding_pages: self.padding_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MarksheetConfig::default();
        assert_eq!(config.students_file, PathBuf::from(DEFAULT_STUDENTS_FILE));
        assert_eq!(config.heavy_rows(), Some(5));
        assert_eq!(config.mode(), GenerationMode::AllSections);
        assert_eq!(config.assembly_options().duplicate_copies, None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = MarksheetConfig::from_yaml_str("").unwrap();
        assert_eq!(config, MarksheetConfig::default());
    }

    #[test]
    fn test_yaml_overrides() {
        let config = MarksheetConfig::from_yaml_str(
            "include_student_id: true\ngroup_by_lab_number: true\ntarget_lab: 3\nduplicate_pages: true\ncopies: 3\nheavy_row_interval: -1\n",
        )
        .unwrap();

        assert!(config.include_student_id);
        assert_eq!(config.target_lab, TargetLab::Named("Lab 3".to_string()));
        assert_eq!(config.mode(), GenerationMode::SingleLab("Lab 3".to_string()));
        assert_eq!(config.assembly_options().duplicate_copies, Some(3));
        assert_eq!(config.heavy_rows(), None);
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let result = MarksheetConfig::from_yaml_str("colour: blue\n");
        assert!(matches!(result, Err(MarksheetError::Yaml(_))));
    }

    #[test]
    fn test_target_lab_parse() {
        assert_eq!(TargetLab::parse("all"), TargetLab::All);
        assert_eq!(TargetLab::parse("ALL"), TargetLab::All);
        assert_eq!(TargetLab::parse("0"), TargetLab::All);
        assert_eq!(TargetLab::parse("4"), TargetLab::Named("Lab 4".to_string()));
        assert_eq!(
            TargetLab::parse("Midterm"),
            TargetLab::Named("Midterm".to_string())
        );
    }

    #[test]
    fn test_target_lab_parse_trims_whitespace() {
        assert_eq!(
            TargetLab::parse(" Midterm \n"),
            TargetLab::Named("Midterm".to_string())
        );
        assert_eq!(TargetLab::parse(" 3 "), TargetLab::Named("Lab 3".to_string()));
        assert_eq!(TargetLab::default(), TargetLab::All);
    }

    #[test]
    fn test_zero_interval_disables_banding() {
        let config = MarksheetConfig {
            heavy_row_interval: 0,
            ..Default::default()
        };
        assert_eq!(config.heavy_rows(), None);
    }

    #[test]
    fn test_zero_copies_rejected_when_duplicating() {
        let config = MarksheetConfig {
            duplicate_pages: true,
            copies: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MarksheetError::Config(_))));

        let config = MarksheetConfig {
            copies: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_named_lab_ignored_when_grouping_by_section() {
        let config = MarksheetConfig {
            target_lab: TargetLab::Named("Lab 1".to_string()),
            ..Default::default()
        };
        assert_eq!(config.mode(), GenerationMode::AllSections);
    }
}
