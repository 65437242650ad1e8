use crate::config::{GenerationMode, MarksheetConfig, TargetLab};
use crate::error::{MarksheetError, MarksheetResult};
use crate::excel::{plan_workbooks, write_workbooks, GenerationReport, WorkbookOutcome};
use crate::parser::{self, LoadReport};
use crate::types::MarksheetModel;
use colored::Colorize;
use std::fs;
use tracing::warn;

fn load(config: &MarksheetConfig, verbose: bool) -> MarksheetResult<(MarksheetModel, LoadReport)> {
    if verbose {
        println!("{}", "📖 Reading input files...".cyan());
        println!("   Students: {}", config.students_file.display());
        println!("   Grading:  {}", config.grading_file.display());
        println!("   Sections: {}", config.sections_file.display());
    }

    let (model, report) = parser::load_model(
        &config.students_file,
        &config.grading_file,
        &config.sections_file,
    )?;

    if !report.is_clean() {
        println!(
            "{}",
            format!("⚠️  Skipped {} malformed input lines", report.diagnostics.len()).yellow()
        );
    }

    if verbose {
        println!(
            "   Found {} students in {} roster sections, {} grading schemes, {} sections\n",
            model.roster.student_count(),
            model.roster.section_count(),
            model.grading.len(),
            model.sections.len()
        );
    }

    Ok((model, report))
}

/// Execute the generate command
///
/// Per-workbook failures are reported and collected; only unreadable inputs,
/// an invalid configuration, or an uncreatable output directory are errors.
pub fn generate(config: &MarksheetConfig, verbose: bool) -> MarksheetResult<GenerationReport> {
    println!("{}", "📝 Lab Marksheets - Generating".bold().green());
    config.validate()?;

    let mode = config.mode();
    match &mode {
        GenerationMode::SingleLab(lab) => println!("   Mode: lab {}", lab.bright_blue().bold()),
        GenerationMode::AllLabs => println!("   Mode: {}", "all labs".bright_blue().bold()),
        GenerationMode::AllSections => {
            println!("   Mode: {}", "all sections".bright_blue().bold());
            if let TargetLab::Named(lab) = &config.target_lab {
                warn!(lab = %lab, "lab selection only applies when grouping by lab number");
                println!(
                    "{}",
                    format!("⚠️  Ignoring lab '{}' (only used with --num)", lab).yellow()
                );
            }
        }
    }
    println!("   Output: {}\n", config.output_dir.display());

    let (model, _) = load(config, verbose)?;

    if let GenerationMode::SingleLab(lab) = &mode {
        if !model.grading.contains(lab) {
            warn!(lab = %lab, "lab has no grading scheme; sheets will only have a Total column");
            println!(
                "{}",
                format!("⚠️  No grading scheme named '{}', using a Total column", lab).yellow()
            );
        }
    }

    fs::create_dir_all(&config.output_dir).map_err(|source| MarksheetError::FileAccess {
        path: config.output_dir.clone(),
        source,
    })?;

    let plans = plan_workbooks(&model, &mode, &config.assembly_options());
    if verbose {
        println!("{}", format!("📊 Writing {} workbooks...", plans.len()).cyan());
    }

    let report = write_workbooks(&model, &plans, &config.layout_options(), &config.output_dir);

    for outcome in &report.outcomes {
        let path = outcome.path().display();
        match outcome {
            WorkbookOutcome::Written { sheets, .. } => {
                println!("   ✅ {} ({} sheets)", path, sheets);
            }
            // Saving failed on disk: usually the file is open elsewhere
            WorkbookOutcome::Failed {
                error: MarksheetError::FileAccess { source, .. },
                ..
            } => {
                println!(
                    "{}",
                    format!("   ❌ Error accessing file, try closing {}: {}", path, source).red()
                );
            }
            WorkbookOutcome::Failed { error, .. } => {
                println!(
                    "{}",
                    format!("   ❌ Could not build {}: {}", path, error).red()
                );
            }
        }
    }

    println!();
    println!("{}", "✅ Generating Marksheets Complete!".bold().green());

    Ok(report)
}

/// Execute the check command: parse inputs and report problems without writing.
pub fn check(config: &MarksheetConfig) -> MarksheetResult<LoadReport> {
    println!("{}", "🔍 Lab Marksheets - Checking inputs".bold().green());
    config.validate()?;

    let (model, report) = load(config, true)?;

    let missing: Vec<&str> = model
        .sections
        .ids()
        .filter(|section| model.roster.students(section).is_empty())
        .collect();
    if !missing.is_empty() {
        println!(
            "{}",
            format!("⚠️  Sections without students: {}", missing.join(", ")).yellow()
        );
    }

    for diagnostic in &report.diagnostics {
        println!("   {}", diagnostic.to_string().yellow());
    }

    if report.is_clean() {
        println!("{}", "✅ All input lines parsed".bold().green());
    } else {
        println!(
            "{}",
            format!("❌ {} malformed lines skipped", report.diagnostics.len())
                .bold()
                .red()
        );
    }

    Ok(report)
}
