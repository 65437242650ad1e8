//! Workbook assembly: which sheets go into which workbook, and writing them.

use super::layout::{render_padding, LayoutOptions, SheetLayout};
use crate::config::GenerationMode;
use crate::error::MarksheetError;
use crate::types::MarksheetModel;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const XLSX_EXTENSION: &str = ".xlsx";
const PADDING_SHEET_PREFIX: &str = "Sheet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssemblyOptions {
    /// Emit each marksheet this many times, suffixing the copy index to its
    /// name. `None` emits one copy with the bare name.
    pub duplicate_copies: Option<u32>,
    /// Follow every marksheet with a blank padding sheet.
    pub padding_pages: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetEntry {
    Marksheet {
        name: String,
        scheme_id: String,
        section_id: String,
    },
    Padding,
}

/// Ordered sheet list for one output workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookPlan {
    /// Grouping key: a scheme id when grouping by lab, a section id otherwise.
    pub name: String,
    pub sheets: Vec<SheetEntry>,
}

impl WorkbookPlan {
    /// One workbook for `scheme_id`, one marksheet per registered section.
    pub fn by_lab(model: &MarksheetModel, scheme_id: &str, options: &AssemblyOptions) -> Self {
        let mut plan = Self::empty(scheme_id);
        for section_id in model.sections.ids() {
            plan.push_marksheet(section_id, scheme_id, section_id, options);
        }
        plan
    }

    /// One workbook for `section_id`, one marksheet per registered scheme.
    pub fn by_section(model: &MarksheetModel, section_id: &str, options: &AssemblyOptions) -> Self {
        let mut plan = Self::empty(section_id);
        for scheme_id in model.grading.ids() {
            plan.push_marksheet(scheme_id, scheme_id, section_id, options);
        }
        plan
    }

    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sheets: Vec::new(),
        }
    }

    fn push_marksheet(
        &mut self,
        base_name: &str,
        scheme_id: &str,
        section_id: &str,
        options: &AssemblyOptions,
    ) {
        let names: Vec<String> = match options.duplicate_copies {
            Some(copies) => (0..copies)
                .map(|copy| format!("{}{}", base_name, copy))
                .collect(),
            None => vec![base_name.to_string()],
        };

        for name in names {
            self.sheets.push(SheetEntry::Marksheet {
                name,
                scheme_id: scheme_id.to_string(),
                section_id: section_id.to_string(),
            });
            if options.padding_pages {
                self.sheets.push(SheetEntry::Padding);
            }
        }
    }

    /// Names of the marksheets, skipping padding sheets.
    pub fn marksheet_names(&self) -> Vec<&str> {
        self.sheets
            .iter()
            .filter_map(|entry| match entry {
                SheetEntry::Marksheet { name, .. } => Some(name.as_str()),
                SheetEntry::Padding => None,
            })
            .collect()
    }

    pub fn marksheet_count(&self) -> usize {
        self.marksheet_names().len()
    }

    /// Output file name, with `.xlsx` appended unless already present.
    pub fn file_name(&self) -> String {
        if self.name.to_ascii_lowercase().ends_with(XLSX_EXTENSION) {
            self.name.clone()
        } else {
            format!("{}{}", self.name, XLSX_EXTENSION)
        }
    }

    /// Names for the padding sheets, in order.
    ///
    /// Padding sheets are named `SheetN` after their position in the workbook,
    /// skipping any name a marksheet already uses. Sheet names compare
    /// case-insensitively.
    pub fn padding_names(&self) -> Vec<String> {
        let mut taken: HashSet<String> = self
            .marksheet_names()
            .into_iter()
            .map(str::to_lowercase)
            .collect();

        let mut names = Vec::new();
        for (index, entry) in self.sheets.iter().enumerate() {
            if !matches!(entry, SheetEntry::Padding) {
                continue;
            }
            let mut number = index + 1;
            let name = loop {
                let candidate = format!("{}{}", PADDING_SHEET_PREFIX, number);
                if taken.insert(candidate.to_lowercase()) {
                    break candidate;
                }
                number += 1;
            };
            names.push(name);
        }
        names
    }

    /// Lay out every sheet into a new in-memory workbook.
    pub fn build(
        &self,
        model: &MarksheetModel,
        layout: &LayoutOptions,
    ) -> Result<Workbook, MarksheetError> {
        let mut workbook = Workbook::new();
        let mut padding_names = self.padding_names().into_iter();

        for entry in &self.sheets {
            match entry {
                SheetEntry::Marksheet {
                    name,
                    scheme_id,
                    section_id,
                } => {
                    let sheet = SheetLayout::plan(model, scheme_id, section_id, layout);
                    let worksheet = workbook.add_worksheet();
                    worksheet.set_name(name)?;
                    sheet.render(worksheet)?;
                }
                SheetEntry::Padding => {
                    let worksheet = workbook.add_worksheet();
                    if let Some(name) = padding_names.next() {
                        worksheet.set_name(name)?;
                    }
                    render_padding(worksheet)?;
                }
            }
        }

        Ok(workbook)
    }

    /// Build and save under `output_dir`. Failures are captured in the outcome;
    /// an I/O failure while saving becomes [`MarksheetError::FileAccess`].
    pub fn write(
        &self,
        model: &MarksheetModel,
        layout: &LayoutOptions,
        output_dir: &Path,
    ) -> WorkbookOutcome {
        let path = output_dir.join(self.file_name());

        let result = self.build(model, layout).and_then(|mut workbook| {
            workbook.save(&path).map_err(|error| match error {
                XlsxError::IoError(source) => MarksheetError::FileAccess {
                    path: path.clone(),
                    source,
                },
                other => other.into(),
            })
        });

        match result {
            Ok(()) => {
                info!(workbook = %self.name, path = %path.display(), "saved workbook");
                WorkbookOutcome::Written {
                    name: self.name.clone(),
                    path,
                    sheets: self.sheets.len(),
                }
            }
            Err(error) => {
                warn!(workbook = %self.name, %error, "failed to save workbook");
                WorkbookOutcome::Failed {
                    name: self.name.clone(),
                    path,
                    error,
                }
            }
        }
    }
}

/// Plan every workbook for a generation mode.
pub fn plan_workbooks(
    model: &MarksheetModel,
    mode: &GenerationMode,
    options: &AssemblyOptions,
) -> Vec<WorkbookPlan> {
    let plans: Vec<WorkbookPlan> = match mode {
        GenerationMode::SingleLab(scheme_id) => {
            vec![WorkbookPlan::by_lab(model, scheme_id, options)]
        }
        GenerationMode::AllLabs => model
            .grading
            .ids()
            .map(|scheme_id| WorkbookPlan::by_lab(model, scheme_id, options))
            .collect(),
        GenerationMode::AllSections => model
            .sections
            .ids()
            .map(|section_id| WorkbookPlan::by_section(model, section_id, options))
            .collect(),
    };
    debug!(?mode, workbooks = plans.len(), "planned workbooks");
    plans
}

#[derive(Debug)]
pub enum WorkbookOutcome {
    Written {
        name: String,
        path: PathBuf,
        sheets: usize,
    },
    Failed {
        name: String,
        path: PathBuf,
        error: MarksheetError,
    },
}

impl WorkbookOutcome {
    pub fn name(&self) -> &str {
        match self {
            WorkbookOutcome::Written { name, .. } | WorkbookOutcome::Failed { name, .. } => name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            WorkbookOutcome::Written { path, .. } | WorkbookOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, WorkbookOutcome::Written { .. })
    }
}

/// Per-workbook results of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub outcomes: Vec<WorkbookOutcome>,
}

impl GenerationReport {
    pub fn written(&self) -> impl Iterator<Item = &WorkbookOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_written())
    }

    pub fn failed(&self) -> impl Iterator<Item = &WorkbookOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_written())
    }

    pub fn all_written(&self) -> bool {
        self.outcomes.iter().all(WorkbookOutcome::is_written)
    }
}

/// Write every planned workbook, one at a time. A failing workbook does not
/// stop the ones after it.
pub fn write_workbooks(
    model: &MarksheetModel,
    plans: &[WorkbookPlan],
    layout: &LayoutOptions,
    output_dir: &Path,
) -> GenerationReport {
    GenerationReport {
        outcomes: plans
            .iter()
            .map(|plan| plan.write(model, layout, output_dir))
            .collect(),
    }
}
