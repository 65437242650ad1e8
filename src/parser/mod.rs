//! Line parsers for the three marksheet input files.
//!
//! All three files are comma separated, one record per line. Lines starting
//! with `#` and blank lines are ignored. A line with the wrong number of fields
//! is reported as a [`MarksheetError::MalformedLine`] diagnostic and skipped;
//! it never aborts loading.
//!
//! | File     | Format                                        |
//! |----------|-----------------------------------------------|
//! | roster   | `FirstName,LastName[,CSID],SectionID`         |
//! | grading  | `SchemeID[,Column1,Column2,...]`              |
//! | sections | `SectionID,LeftHeader,CenterHeader[,RightHeader]` |

use crate::error::{MarksheetError, MarksheetResult};
use crate::types::{
    GradingSchemes, MarksheetModel, Roster, SectionHeader, SectionHeaders, StudentRecord,
};
use std::path::Path;
use tracing::{debug, warn};

pub const COMMENT_MARKER: char = '#';

pub const ROSTER_KIND: &str = "roster";
pub const GRADING_KIND: &str = "grading";
pub const SECTIONS_KIND: &str = "sections";

/// Result of parsing a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine<T> {
    /// Comment or blank line.
    Ignored,
    Record(T),
    /// Wrong number of fields.
    Malformed { found: usize },
}

/// Outcome of loading one or more input files.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: usize,
    pub ignored: usize,
    pub diagnostics: Vec<MarksheetError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn merge(&mut self, other: LoadReport) {
        self.records += other.records;
        self.ignored += other.ignored;
        self.diagnostics.extend(other.diagnostics);
    }
}

fn is_ignored(line: &str) -> bool {
    line.starts_with(COMMENT_MARKER) || line.trim().is_empty()
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',')
        .map(|field| field.replace(['\r', '\n'], ""))
        .collect()
}

/// Parse `FirstName,LastName[,CSID],SectionID` into `(section_id, student)`.
pub fn parse_student_line(line: &str) -> ParsedLine<(String, StudentRecord)> {
    if is_ignored(line) {
        return ParsedLine::Ignored;
    }

    let mut fields = split_fields(line);
    match fields.len() {
        3 | 4 => {
            let section_id = fields.pop().unwrap_or_default();
            let mut fields = fields.into_iter();
            let first_name = fields.next().unwrap_or_default();
            let last_name = fields.next().unwrap_or_default();
            let student = StudentRecord {
                first_name,
                last_name,
                student_id: fields.next(),
            };
            ParsedLine::Record((section_id, student))
        }
        found => ParsedLine::Malformed { found },
    }
}

/// Parse `SchemeID[,Column...]` into `(scheme_id, columns)`. Any field count is valid.
pub fn parse_grading_line(line: &str) -> ParsedLine<(String, Vec<String>)> {
    if is_ignored(line) {
        return ParsedLine::Ignored;
    }

    let mut fields = split_fields(line).into_iter();
    let scheme_id = fields.next().unwrap_or_default();
    ParsedLine::Record((scheme_id, fields.collect()))
}

/// Parse `SectionID,Left,Center[,Right]` into `(section_id, header)`.
pub fn parse_section_line(line: &str) -> ParsedLine<(String, SectionHeader)> {
    if is_ignored(line) {
        return ParsedLine::Ignored;
    }

    let fields = split_fields(line);
    match fields.len() {
        3 | 4 => {
            let mut fields = fields.into_iter();
            let section_id = fields.next().unwrap_or_default();
            let header = SectionHeader {
                left: fields.next().unwrap_or_default(),
                center: fields.next().unwrap_or_default(),
                right: fields.next().unwrap_or_default(),
            };
            ParsedLine::Record((section_id, header))
        }
        found => ParsedLine::Malformed { found },
    }
}

/// Feed every line of `content` through `parse`, handing records to `apply`.
fn ingest<T>(
    kind: &'static str,
    content: &str,
    parse: impl Fn(&str) -> ParsedLine<T>,
    mut apply: impl FnMut(T),
) -> LoadReport {
    let mut report = LoadReport::default();

    for (idx, line) in content.lines().enumerate() {
        match parse(line) {
            ParsedLine::Ignored => report.ignored += 1,
            ParsedLine::Record(record) => {
                apply(record);
                report.records += 1;
            }
            ParsedLine::Malformed { found } => {
                let diagnostic = MarksheetError::MalformedLine {
                    kind,
                    line_no: idx + 1,
                    line: line.to_string(),
                    found,
                };
                warn!("{}", diagnostic);
                report.diagnostics.push(diagnostic);
            }
        }
    }

    debug!(
        kind,
        records = report.records,
        ignored = report.ignored,
        malformed = report.diagnostics.len(),
        "ingested input"
    );
    report
}

pub fn read_roster(content: &str, roster: &mut Roster) -> LoadReport {
    ingest(ROSTER_KIND, content, parse_student_line, |(section, student)| {
        roster.add_student(section, student);
    })
}

pub fn read_grading(content: &str, grading: &mut GradingSchemes) -> LoadReport {
    ingest(GRADING_KIND, content, parse_grading_line, |(scheme, columns)| {
        grading.set_scheme(scheme, columns);
    })
}

pub fn read_sections(content: &str, sections: &mut SectionHeaders) -> LoadReport {
    ingest(SECTIONS_KIND, content, parse_section_line, |(section, header)| {
        sections.set_header(section, header);
    })
}

fn read_input(path: &Path) -> MarksheetResult<String> {
    std::fs::read_to_string(path).map_err(|source| MarksheetError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// Read all three input files into a model.
///
/// Every file is read fully before anything is generated. Only an unreadable
/// file is an error; malformed lines end up in the returned report.
pub fn load_model(
    students_file: &Path,
    grading_file: &Path,
    sections_file: &Path,
) -> MarksheetResult<(MarksheetModel, LoadReport)> {
    let mut model = MarksheetModel::new();
    let mut report = LoadReport::default();

    report.merge(read_grading(&read_input(grading_file)?, &mut model.grading));
    report.merge(read_sections(
        &read_input(sections_file)?,
        &mut model.sections,
    ));
    report.merge(read_roster(&read_input(students_file)?, &mut model.roster));

    Ok((model, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_line_without_id() {
        let parsed = parse_student_line("Jane,Doe,L1A");
        assert_eq!(
            parsed,
            ParsedLine::Record(("L1A".to_string(), StudentRecord::new("Jane", "Doe")))
        );
    }

    #[test]
    fn test_student_line_with_id() {
        let parsed = parse_student_line("Jane,Doe,a1b2,L1A\r\n");
        assert_eq!(
            parsed,
            ParsedLine::Record((
                "L1A".to_string(),
                StudentRecord::new("Jane", "Doe").with_id("a1b2")
            ))
        );
    }

    #[test]
    fn test_student_line_wrong_field_count() {
        assert_eq!(
            parse_student_line("Jane,L1A"),
            ParsedLine::Malformed { found: 2 }
        );
        assert_eq!(
            parse_student_line("a,b,c,d,e"),
            ParsedLine::Malformed { found: 5 }
        );
    }

    #[test]
    fn test_comment_and_blank_lines_are_ignored() {
        assert_eq!(parse_student_line("# first,last,section"), ParsedLine::Ignored);
        assert_eq!(parse_grading_line("#Lab1,Q1"), ParsedLine::Ignored);
        assert_eq!(parse_section_line("   "), ParsedLine::Ignored);
        assert_eq!(parse_section_line(""), ParsedLine::Ignored);
    }

    #[test]
    fn test_grading_line_without_columns() {
        assert_eq!(
            parse_grading_line("Lab1"),
            ParsedLine::Record(("Lab1".to_string(), vec![]))
        );
    }

    #[test]
    fn test_grading_line_strips_carriage_return() {
        assert_eq!(
            parse_grading_line("Lab1,Q1,Q2\r"),
            ParsedLine::Record(("Lab1".to_string(), vec!["Q1".into(), "Q2".into()]))
        );
    }

    #[test]
    fn test_section_line_right_text_optional() {
        assert_eq!(
            parse_section_line("L1A,Left,Center"),
            ParsedLine::Record(("L1A".to_string(), SectionHeader::new("Left", "Center", "")))
        );
        assert_eq!(
            parse_section_line("L1A,Left,Center,Right"),
            ParsedLine::Record((
                "L1A".to_string(),
                SectionHeader::new("Left", "Center", "Right")
            ))
        );
    }

    #[test]
    fn test_section_line_wrong_field_count() {
        assert_eq!(parse_section_line("L1A,Left"), ParsedLine::Malformed { found: 2 });
        assert_eq!(
            parse_section_line("L1A,a,b,c,d"),
            ParsedLine::Malformed { found: 5 }
        );
    }

    #[test]
    fn test_read_roster_skips_malformed_without_touching_registry() {
        let mut roster = Roster::new();
        let report = read_roster("# header\nJane,Doe,L1A\nbroken\nJohn,Roe,L1A\n", &mut roster);

        assert_eq!(report.records, 2);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(roster.students("L1A").len(), 2);
        assert_eq!(roster.section_count(), 1);

        match &report.diagnostics[0] {
            MarksheetError::MalformedLine {
                kind,
                line_no,
                line,
                found,
            } => {
                assert_eq!(*kind, ROSTER_KIND);
                assert_eq!(*line_no, 3);
                assert_eq!(line, "broken");
                assert_eq!(*found, 1);
            }
            other => panic!("unexpected diagnostic: {other:?}"),
        }
    }

    #[test]
    fn test_read_sections_last_write_wins() {
        let mut sections = SectionHeaders::new();
        let report = read_sections("L1A,a,b,c\nL1B,d,e\nL1A,x,y,z\n", &mut sections);

        assert!(report.is_clean());
        assert_eq!(sections.ids().collect::<Vec<_>>(), vec!["L1A", "L1B"]);
        assert_eq!(sections.header("L1A"), Some(&SectionHeader::new("x", "y", "z")));
    }

    #[test]
    fn test_load_model_missing_file_is_error() {
        let missing = Path::new("definitely/not/here.csv");
        let result = load_model(missing, missing, missing);
        assert!(matches!(result, Err(MarksheetError::FileAccess { .. })));
    }
}
