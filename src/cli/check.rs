//! # Check Command
//!
//! This module implements the check/fix command for license headers.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use super::prompt::confirm;
use crate::config::load_config;
use crate::diff::DiffManager;
use crate::info_log;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  print_all_files_ok, print_blank_line, print_file_errors, print_fix_applied, print_hint, print_start_message,
  print_summary, print_violations,
};
use crate::processor::{FileError, Processor, ProcessorConfig, absolutize_path};
use crate::report::{ProcessingSummary, ReportFormat, ReportGenerator, ViolationReport};

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
  /// Project root to check. Every file below it is a candidate.
  #[arg(default_value = ".")]
  pub root: PathBuf,

  /// Path to config file (default: $HEADERCHECK_CONFIG, then
  /// .headercheck.toml in the project root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore all config files. Without a config file nothing sets the
  /// required global `entity`, so this is only useful to check that a
  /// project cannot run without one
  #[arg(long, conflicts_with = "config")]
  pub no_config: bool,

  /// Fix mode: preview and apply the fix of every violation
  #[arg(long)]
  pub fix: bool,

  /// Apply fixes without asking for confirmation
  #[arg(long, short = 'y', requires = "fix")]
  pub yes: bool,

  /// Show the diff of every fix on stderr
  #[arg(long)]
  pub show_diff: bool,

  /// Save the diff of every fix to a file
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except violations and errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Generate a JSON report of the run and save to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Generate a CSV report of the run and save to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_csv: Option<PathBuf>,
}

/// Run the check command with the given arguments
///
/// # Returns
///
/// [`ExitCode::SUCCESS`] when no violation remains and every file could be
/// checked, exit code 1 otherwise.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid, or if
/// the project root cannot be traversed.
pub fn run_check(args: CheckArgs) -> Result<ExitCode> {
  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let project_root = absolutize_path(&args.root)?;
  debug!("Using project root: {}", project_root.display());

  let config = load_config(args.config.as_deref(), &project_root, args.no_config)
    .context("Failed to load configuration")?;
  let processor = Processor::new(ProcessorConfig::from_config(&config, &project_root)?);

  // Fix mode always previews the diff before asking
  let diff_manager = DiffManager::new(args.show_diff || args.fix, args.save_diff.clone());
  diff_manager.init()?;
  let show_diffs = diff_manager.show_diff || diff_manager.save_diff_path.is_some();

  print_start_message(&args.root);
  let start_time = Instant::now();

  let mut run = processor.check()?;

  print_blank_line();
  print_violations(&run.violations);
  print_file_errors(&run.errors);

  let mut fixed = vec![false; run.violations.len()];
  let mut fix_errors = Vec::new();

  if args.fix && !run.violations.is_empty() {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompt_output = io::stderr();

    for (violation, fixed) in run.violations.iter().zip(fixed.iter_mut()) {
      diff_manager.display_diff(&violation.diff())?;

      let question = format!(
        "Apply fix \"{}\" to {}?",
        violation.fix_description(),
        violation.display_path()
      );
      if !args.yes && !confirm(&question, &mut input, &mut prompt_output)? {
        debug!("Declined fix for {}", violation.display_path());
        continue;
      }

      match violation.fix.apply() {
        Ok(()) => {
          *fixed = true;
          print_fix_applied(violation);
        }
        Err(error) => fix_errors.push(FileError {
          path: violation.display_path().to_string(),
          error,
        }),
      }
    }
  } else if show_diffs {
    for violation in &run.violations {
      diff_manager.display_diff(&violation.diff())?;
    }
  }

  print_file_errors(&fix_errors);
  run.errors.extend(fix_errors);

  let fixed_count = fixed.iter().filter(|fixed| **fixed).count();
  let remaining = run.violations.len() - fixed_count;
  let summary = ProcessingSummary::from_run(&run, fixed_count, start_time.elapsed());

  if run.is_clean() {
    print_all_files_ok(run.files_checked);
  }

  print_blank_line();
  print_summary(&summary);

  if remaining > 0 && !args.fix {
    print_blank_line();
    print_hint("Run with --fix to apply the fixes.");
  }

  let records: Vec<ViolationReport> = run
    .violations
    .iter()
    .zip(&fixed)
    .map(|(violation, fixed)| ViolationReport::new(violation, *fixed))
    .collect();

  if let Some(ref output_path) = args.report_json {
    let report_generator = ReportGenerator::new(ReportFormat::Json, output_path);
    if let Err(e) = report_generator.generate(&records, &summary) {
      eprintln!("Error generating JSON report: {:#}", e);
    } else {
      info_log!("Generated JSON report at {}", output_path.display());
    }
  }

  if let Some(ref output_path) = args.report_csv {
    let report_generator = ReportGenerator::new(ReportFormat::Csv, output_path);
    if let Err(e) = report_generator.generate(&records, &summary) {
      eprintln!("Error generating CSV report: {:#}", e);
    } else {
      info_log!("Generated CSV report at {}", output_path.display());
    }
  }

  if remaining == 0 && run.errors.is_empty() {
    Ok(ExitCode::SUCCESS)
  } else {
    Ok(ExitCode::FAILURE)
  }
}
