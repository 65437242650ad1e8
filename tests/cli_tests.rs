//! CLI command tests

use lab_marksheets::cli::commands;
use lab_marksheets::config::{MarksheetConfig, TargetLab};
use lab_marksheets::excel::WorkbookOutcome;
use lab_marksheets::MarksheetError;
use std::fs;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> MarksheetConfig {
    let students = dir.path().join("students.csv");
    let grading = dir.path().join("grading.csv");
    let sections = dir.path().join("sections.csv");
    fs::write(
        &students,
        "# First,Last,Section\nJane,Doe,L1A\nJohn,Roe,L1B\nbroken line\n",
    )
    .unwrap();
    fs::write(&grading, "Lab 1,Q1,Q2\nLab 2\n").unwrap();
    fs::write(&sections, "L1A,Mon,CS 121,Room 1\nL1B,Tue,CS 121\n").unwrap();

    MarksheetConfig {
        students_file: students,
        grading_file: grading,
        sections_file: sections,
        output_dir: dir.path().join("out"),
        ..Default::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// GENERATE COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_generate_by_section() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let report = commands::generate(&config, false).unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.all_written());
    assert!(dir.path().join("out/L1A.xlsx").is_file());
    assert!(dir.path().join("out/L1B.xlsx").is_file());
}

#[test]
fn test_generate_all_labs_verbose() {
    let dir = TempDir::new().unwrap();
    let config = MarksheetConfig {
        group_by_lab_number: true,
        ..config_in(&dir)
    };

    let report = commands::generate(&config, true).unwrap();

    let names: Vec<&str> = report.outcomes.iter().map(|o| o.name()).collect();
    assert_eq!(names, vec!["Lab 1", "Lab 2"]);
    assert!(dir.path().join("out/Lab 1.xlsx").is_file());
}

#[test]
fn test_generate_single_lab_by_number() {
    let dir = TempDir::new().unwrap();
    let config = MarksheetConfig {
        group_by_lab_number: true,
        target_lab: TargetLab::parse("2"),
        ..config_in(&dir)
    };

    let report = commands::generate(&config, false).unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].name(), "Lab 2");
    assert!(!dir.path().join("out/Lab 1.xlsx").exists());
}

#[test]
fn test_generate_reports_failure_and_continues() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    fs::create_dir_all(dir.path().join("out/L1A.xlsx")).unwrap();

    let report = commands::generate(&config, false).unwrap();

    assert_eq!(report.failed().count(), 1);
    assert_eq!(report.written().count(), 1);
    assert!(dir.path().join("out/L1B.xlsx").is_file());
}

#[test]
fn test_generate_invalid_sheet_name_is_build_failure() {
    let dir = TempDir::new().unwrap();
    let config = MarksheetConfig {
        group_by_lab_number: true,
        ..config_in(&dir)
    };
    fs::write(&config.sections_file, "L1A,Mon,CS 121\nbad[name],Tue,CS 121\n").unwrap();

    let report = commands::generate(&config, false).unwrap();

    assert_eq!(report.failed().count(), 2);
    for outcome in report.failed() {
        assert!(
            matches!(
                outcome,
                WorkbookOutcome::Failed {
                    error: MarksheetError::Excel(_),
                    ..
                }
            ),
            "unexpected failure: {:?}",
            outcome
        );
    }
}

#[test]
fn test_generate_missing_input_is_error() {
    let dir = TempDir::new().unwrap();
    let config = MarksheetConfig {
        students_file: dir.path().join("nope.csv"),
        ..config_in(&dir)
    };

    let result = commands::generate(&config, false);
    assert!(matches!(result, Err(MarksheetError::FileAccess { .. })));
}

#[test]
fn test_generate_zero_copies_is_config_error() {
    let dir = TempDir::new().unwrap();
    let config = MarksheetConfig {
        duplicate_pages: true,
        copies: 0,
        ..config_in(&dir)
    };

    let result = commands::generate(&config, false);
    assert!(matches!(result, Err(MarksheetError::Config(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// CHECK COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_check_reports_malformed_lines() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let report = commands::check(&config).unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert!(!dir.path().join("out").exists(), "check must not write output");
}
