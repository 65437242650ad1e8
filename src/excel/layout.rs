//! Marksheet layout: one worksheet per (grading scheme, section) pair.
//!
//! Layout is computed first as a plain [`SheetLayout`] value and then rendered
//! onto a `rust_xlsxwriter` worksheet, so the grid can be inspected without
//! writing a file.
//!
//! ```text
//!        col 0        col 1       [col 2]   data columns...
//! row 0  <section>    <scheme>              +---------+
//! row 1  First Name   Last Name   [CSID]    | Q1 (2r) | ...
//! row 2  students, sorted by (first, last, id)
//! ```

use crate::error::MarksheetResult;
use crate::types::MarksheetModel;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Worksheet};
use tracing::debug;

pub const FIRST_NAME_HEADER: &str = "First Name";
pub const LAST_NAME_HEADER: &str = "Last Name";
pub const STUDENT_ID_HEADER: &str = "CSID";

pub const NAME_COLUMN_WIDTH: f64 = 15.0;
pub const DATA_COLUMN_WIDTH: f64 = 12.0;

/// Row index of the first student row (rows 0-1 are headers).
pub const FIRST_STUDENT_ROW: u32 = 2;

const MARGIN_SIDE: f64 = 0.75;
const MARGIN_TOP_BOTTOM: f64 = 1.0;
const MARGIN_HEADER_FOOTER: f64 = 0.3;

/// Contents of the padding sheet inserted for duplex printing.
pub const PADDING_TEXT: &str = " ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutOptions {
    /// Add the CSID column after the name columns.
    pub include_student_id: bool,
    /// Every Nth student row gets a heavy bottom border. `None` disables banding.
    pub heavy_row_interval: Option<usize>,
}

impl LayoutOptions {
    /// Whether the student row at `index` (0-based among student rows) is heavy.
    pub fn is_heavy_row(&self, index: usize) -> bool {
        match self.heavy_row_interval {
            Some(interval) if interval > 0 => (index + 1) % interval == 0,
            _ => false,
        }
    }
}

/// A student row: name cells followed by blank grading cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub name_cells: Vec<String>,
    pub heavy: bool,
}

/// Fully resolved contents of one marksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub section_id: String,
    pub scheme_id: String,
    /// Excel header string, absent when the section has no header text.
    pub page_header: Option<String>,
    pub name_headers: Vec<&'static str>,
    pub data_columns: Vec<String>,
    pub rows: Vec<StudentRow>,
}

impl SheetLayout {
    /// Resolve the layout for `scheme_id` x `section_id`.
    ///
    /// Missing registry entries degrade instead of failing: an unknown or
    /// empty scheme gets the single `Total` column, an unknown section header
    /// leaves the page header empty, and a section without students yields a
    /// header-only sheet.
    pub fn plan(
        model: &MarksheetModel,
        scheme_id: &str,
        section_id: &str,
        options: &LayoutOptions,
    ) -> Self {
        let mut name_headers = vec![FIRST_NAME_HEADER, LAST_NAME_HEADER];
        if options.include_student_id {
            name_headers.push(STUDENT_ID_HEADER);
        }

        let rows = model
            .roster
            .sorted_students(section_id)
            .into_iter()
            .enumerate()
            .map(|(index, student)| {
                let mut name_cells = vec![student.first_name.clone(), student.last_name.clone()];
                if options.include_student_id {
                    name_cells.push(student.student_id.clone().unwrap_or_default());
                }
                StudentRow {
                    name_cells,
                    heavy: options.is_heavy_row(index),
                }
            })
            .collect();

        Self {
            section_id: section_id.to_string(),
            scheme_id: scheme_id.to_string(),
            page_header: model
                .sections
                .header(section_id)
                .map(|header| header.to_excel_header()),
            name_headers,
            data_columns: model
                .grading
                .data_columns(scheme_id)
                .into_iter()
                .map(str::to_string)
                .collect(),
            rows,
        }
    }

    pub fn first_data_column(&self) -> u16 {
        self.name_headers.len() as u16
    }

    /// Index of the last column holding data.
    pub fn last_column(&self) -> u16 {
        self.first_data_column() + self.data_columns.len() as u16 - 1
    }

    pub fn heavy_row_count(&self) -> usize {
        self.rows.iter().filter(|row| row.heavy).count()
    }

    /// Write the layout onto `worksheet`.
    pub fn render(&self, worksheet: &mut Worksheet) -> MarksheetResult<()> {
        let right_bold = Format::new().set_bold().set_align(FormatAlign::Right);
        let bold = Format::new().set_bold();
        let header_cell = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border_bottom(FormatBorder::Medium);
        let heavy_bottom = Format::new().set_border_bottom(FormatBorder::Medium);

        // Page setup
        worksheet.set_landscape();
        worksheet.set_margins(
            MARGIN_SIDE,
            MARGIN_SIDE,
            MARGIN_TOP_BOTTOM,
            MARGIN_TOP_BOTTOM,
            MARGIN_HEADER_FOOTER,
            MARGIN_HEADER_FOOTER,
        );
        worksheet.set_screen_gridlines(false);
        if let Some(header) = &self.page_header {
            worksheet.set_header(header);
        }

        // Header rows
        worksheet.write_string_with_format(0, 0, &self.section_id, &right_bold)?;
        worksheet.write_string_with_format(0, 1, &self.scheme_id, &bold)?;
        for (col, label) in self.name_headers.iter().enumerate() {
            worksheet.write_string_with_format(1, col as u16, *label, &header_cell)?;
        }

        let first_data = self.first_data_column();
        for (offset, label) in self.data_columns.iter().enumerate() {
            let col = first_data + offset as u16;
            worksheet.merge_range(0, col, 1, col, label, &header_cell)?;
        }

        for col in 0..2 {
            worksheet.set_column_width(col, NAME_COLUMN_WIDTH)?;
        }
        for col in 2..=self.last_column() {
            worksheet.set_column_width(col, DATA_COLUMN_WIDTH)?;
        }
        worksheet.set_print_fit_to_pages(1, 1);

        // Student rows
        for (index, row) in self.rows.iter().enumerate() {
            let excel_row = FIRST_STUDENT_ROW + index as u32;

            if row.heavy {
                for (col, value) in row.name_cells.iter().enumerate() {
                    worksheet.write_string_with_format(
                        excel_row,
                        col as u16,
                        value,
                        &heavy_bottom,
                    )?;
                }
                for col in first_data..=self.last_column() {
                    worksheet.write_blank(excel_row, col, &heavy_bottom)?;
                }
            } else {
                for (col, value) in row.name_cells.iter().enumerate() {
                    worksheet.write_string(excel_row, col as u16, value)?;
                }
            }
        }

        debug!(
            section = %self.section_id,
            scheme = %self.scheme_id,
            students = self.rows.len(),
            columns = self.data_columns.len(),
            "rendered marksheet"
        );
        Ok(())
    }
}

/// Blank landscape page used to keep duplex printing aligned.
pub fn render_padding(worksheet: &mut Worksheet) -> MarksheetResult<()> {
    worksheet.write_string(0, 0, PADDING_TEXT)?;
    worksheet.set_landscape();
    Ok(())
}
