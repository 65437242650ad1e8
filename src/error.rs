use std::path::PathBuf;
use thiserror::Error;

pub type MarksheetResult<T> = Result<T, MarksheetError>;

#[derive(Error, Debug)]
pub enum MarksheetError {
    #[error("Failed to access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Error parsing {kind} line {line_no} ({found} fields): {line}")]
    MalformedLine {
        kind: &'static str,
        line_no: usize,
        line: String,
        found: usize,
    },

    #[error("Excel error: {0}")]
    Excel(String),
}

impl From<rust_xlsxwriter::XlsxError> for MarksheetError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        MarksheetError::Excel(e.to_string())
    }
}
