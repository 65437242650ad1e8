//! Excel marksheet generation
//!
//! - Layout: one (grading scheme, section) pair → one worksheet
//! - Assembly: group worksheets into workbooks by lab or by section, then save

mod assembly;
mod layout;

pub use assembly::{
    plan_workbooks, write_workbooks, AssemblyOptions, GenerationReport, SheetEntry,
    WorkbookOutcome, WorkbookPlan,
};
pub use layout::{
    render_padding, LayoutOptions, SheetLayout, StudentRow, DATA_COLUMN_WIDTH, FIRST_NAME_HEADER,
    FIRST_STUDENT_ROW, LAST_NAME_HEADER, NAME_COLUMN_WIDTH, PADDING_TEXT, STUDENT_ID_HEADER,
};
