use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lab_marksheets::cli;
use lab_marksheets::config::{MarksheetConfig, TargetLab};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marksheets")]
#[command(about = "Generate printable lab marksheets (.xlsx) from CSV rosters.")]
#[command(long_about = "Lab Marksheets - printable grading sheets from CSV rosters

INPUT FILES (comma separated, lines starting with # are ignored):
  students.csv   FirstName,LastName[,CSID],SectionID
  grading.csv    SchemeID,Column1,Column2,...
  sections.csv   SectionID,LeftHeader,CenterHeader[,RightHeader]

COMMANDS:
  generate   - Write marksheet workbooks
  check      - Parse input files and report malformed lines

EXAMPLES:
  marksheets generate                     # One workbook per section
  marksheets generate --num               # One workbook per lab
  marksheets generate --num --lab 3       # Only 'Lab 3'
  marksheets generate --duplicate --padding  # Duplex printing
  marksheets check --config marksheets.yaml")]
#[command(version)]
struct Cli {
    /// YAML configuration file (flags override its values)
    #[arg(long, global = true, env = "MARKSHEETS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Generate marksheet workbooks.

GROUPING:
  Default: one workbook per section (from sections.csv), one sheet per lab.
  --num:   one workbook per lab (from grading.csv), one sheet per section.
  --num --lab N: only the workbook for 'Lab N' (or a literal scheme id).

DUPLEX PRINTING:
  --duplicate writes every sheet --copies times (names suffixed 0, 1, ...).
  --padding inserts a blank landscape page after every sheet.

A workbook that cannot be saved (e.g. open in Excel) is reported and
skipped; the remaining workbooks are still written.")]
    /// Generate marksheet workbooks
    Generate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Include student ids (CSID column)
        #[arg(short = 'c', long = "csid")]
        include_student_id: bool,

        /// Lab to generate when grouping by lab: 'all', a number, or a scheme id
        #[arg(short, long)]
        lab: Option<String>,

        /// Group workbooks by lab number instead of by section
        #[arg(short = 'n', long = "num")]
        group_by_lab_number: bool,

        /// Write every sheet several times for duplex printing
        #[arg(long)]
        duplicate: bool,

        /// Copies per sheet when --duplicate is set
        #[arg(long)]
        copies: Option<u32>,

        /// Insert a blank page after every sheet
        #[arg(long)]
        padding: bool,

        /// Heavy border every N students (0 or negative disables)
        #[arg(long, allow_negative_numbers = true)]
        heavy_rows: Option<i64>,

        /// Directory for the generated workbooks
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse input files and report malformed lines
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Student roster file
    #[arg(long)]
    students: Option<PathBuf>,

    /// Grading scheme file
    #[arg(long)]
    grading: Option<PathBuf>,

    /// Section header file
    #[arg(long)]
    sections: Option<PathBuf>,
}

impl InputArgs {
    fn apply(self, config: &mut MarksheetConfig) {
        if let Some(path) = self.students {
            config.students_file = path;
        }
        if let Some(path) = self.grading {
            config.grading_file = path;
        }
        if let Some(path) = self.sections {
            config.sections_file = path;
        }
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<MarksheetConfig> {
    match path {
        Some(path) => MarksheetConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(MarksheetConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Generate {
            inputs,
            include_student_id,
            lab,
            group_by_lab_number,
            duplicate,
            copies,
            padding,
            heavy_rows,
            output_dir,
            verbose,
        } => {
            init_tracing(if verbose { "info" } else { "warn" });
            inputs.apply(&mut config);
            config.include_student_id |= include_student_id;
            config.group_by_lab_number |= group_by_lab_number;
            config.duplicate_pages |= duplicate;
            config.padding_pages |= padding;
            if let Some(lab) = lab {
                config.target_lab = TargetLab::parse(&lab);
            }
            if let Some(copies) = copies {
                config.copies = copies;
            }
            if let Some(interval) = heavy_rows {
                config.heavy_row_interval = interval;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }

            cli::generate(&config, verbose).context("Marksheet generation failed")?;
        }

        Commands::Check { inputs } => {
            // check prints every diagnostic itself
            init_tracing("error");
            inputs.apply(&mut config);
            let report = cli::check(&config).context("Input check failed")?;
            if !report.is_clean() {
                anyhow::bail!("{} malformed input lines", report.diagnostics.len());
            }
        }
    }

    Ok(())
}
