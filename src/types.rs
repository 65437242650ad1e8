use indexmap::IndexMap;

/// Column label used when a grading scheme declares no columns.
pub const FALLBACK_COLUMN: &str = "Total";

//==============================================================================
// Records
//==============================================================================

/// One roster entry.
///
/// Field order is significant: the derived `Ord` sorts by first name, then
/// last name, then student id (absent ids sort before present ones).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentRecord {
    pub first_name: String,
    pub last_name: String,
    pub student_id: Option<String>,
}

impl StudentRecord {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            student_id: None,
        }
    }

    pub fn with_id(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }
}

/// Page header text for a section, split across the three header zones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionHeader {
    pub left: String,
    pub center: String,
    pub right: String,
}

impl SectionHeader {
    pub fn new(
        left: impl Into<String>,
        center: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            left: left.into(),
            center: center.into(),
            right: right.into(),
        }
    }

    /// Render as an Excel header string (`&L..&C..&R..`).
    ///
    /// `&` starts a control code in Excel headers, so literal ampersands are doubled.
    pub fn to_excel_header(&self) -> String {
        format!(
            "&L{}&C{}&R{}",
            escape_header_text(&self.left),
            escape_header_text(&self.center),
            escape_header_text(&self.right)
        )
    }
}

fn escape_header_text(text: &str) -> String {
    text.replace('&', "&&")
}

//==============================================================================
// Registries
//==============================================================================

/// Students grouped by section id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    sections: IndexMap<String, Vec<StudentRecord>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a student to a section, creating the section list if needed.
    pub fn add_student(&mut self, section_id: impl Into<String>, student: StudentRecord) {
        self.sections
            .entry(section_id.into())
            .or_default()
            .push(student);
    }

    /// Students of a section in roster-file order. Unknown sections are empty.
    pub fn students(&self, section_id: &str) -> &[StudentRecord] {
        self.sections
            .get(section_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Students of a section in marksheet order.
    pub fn sorted_students(&self, section_id: &str) -> Vec<&StudentRecord> {
        let mut students: Vec<&StudentRecord> = self.students(section_id).iter().collect();
        students.sort();
        students
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn student_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Grading schemes in registration order.
#[derive(Debug, Clone, Default)]
pub struct GradingSchemes {
    schemes: IndexMap<String, Vec<String>>,
}

impl GradingSchemes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a scheme's columns. A redeclared scheme keeps its
    /// original position.
    pub fn set_scheme(&mut self, scheme_id: impl Into<String>, columns: Vec<String>) {
        self.schemes.insert(scheme_id.into(), columns);
    }

    pub fn columns(&self, scheme_id: &str) -> Option<&[String]> {
        self.schemes.get(scheme_id).map(Vec::as_slice)
    }

    /// Column labels as laid out on a marksheet: the declared columns, or the
    /// single fallback column when the scheme is unknown or empty.
    pub fn data_columns(&self, scheme_id: &str) -> Vec<&str> {
        match self.columns(scheme_id) {
            Some(columns) if !columns.is_empty() => columns.iter().map(String::as_str).collect(),
            _ => vec![FALLBACK_COLUMN],
        }
    }

    pub fn contains(&self, scheme_id: &str) -> bool {
        self.schemes.contains_key(scheme_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

/// Section page headers in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SectionHeaders {
    sections: IndexMap<String, SectionHeader>,
}

impl SectionHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a section's header. The first declaration fixes iteration order;
    /// later declarations only replace the text.
    pub fn set_header(&mut self, section_id: impl Into<String>, header: SectionHeader) {
        self.sections.insert(section_id.into(), header);
    }

    pub fn header(&self, section_id: &str) -> Option<&SectionHeader> {
        self.sections.get(section_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// All input data, populated once and read-only during generation.
#[derive(Debug, Clone, Default)]
pub struct MarksheetModel {
    pub roster: Roster,
    pub grading: GradingSchemes,
    pub sections: SectionHeaders,
}

impl MarksheetModel {
    pub fn new() -> Self {
        Self::default()
    }
}
