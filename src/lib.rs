//! Lab Marksheets - printable grading sheets from CSV rosters
//!
//! This library reads three comma-separated input files (student roster,
//! grading schemes, section headers) and writes `.xlsx` workbooks with one
//! marksheet per lab section and grading scheme.
//!
//! # Features
//!
//! - Workbooks grouped by lab (one sheet per section) or by section (one sheet per lab)
//! - Optional student id column
//! - Heavy-border banding every N students
//! - Duplicate sheets and blank padding pages for duplex printing
//!
//! # Example
//!
//! ```no_run
//! use lab_marksheets::config::MarksheetConfig;
//! use lab_marksheets::excel::{plan_workbooks, write_workbooks};
//! use lab_marksheets::parser::load_model;
//!
//! let config = MarksheetConfig::default();
//! let (model, report) = load_model(
//!     &config.students_file,
//!     &config.grading_file,
//!     &config.sections_file,
//! )?;
//! println!("Skipped {} malformed lines", report.diagnostics.len());
//!
//! let plans = plan_workbooks(&model, &config.mode(), &config.assembly_options());
//! let result = write_workbooks(&model, &plans, &config.layout_options(), &config.output_dir);
//! println!("Wrote {} workbooks", result.written().count());
//! # Ok::<(), lab_marksheets::error::MarksheetError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod parser;
pub mod types;

// Re-export commonly used types
pub use error::{MarksheetError, MarksheetResult};
pub use types::{GradingSchemes, MarksheetModel, Roster, SectionHeader, SectionHeaders, StudentRecord};
