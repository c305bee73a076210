//! # Output Module
//!
//! This module centralizes all user-facing output for the headercheck tool.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! ## Design Goals
//!
//! - **Informative**: Every violation is printed with its location
//! - **Scannable**: Use formatting to make output easy to parse visually
//! - **Progressive**: More detail with `-v`, silence with `-q`
//! - **Scriptable**: Violation lines on stdout keep a stable `path:line:` shape

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::processor::FileError;
use crate::report::ProcessingSummary;
use crate::violation::Violation;

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Fix applied
  pub const FIXED: &str = "\u{21bb}"; // ↻
}

const fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
  if count == 1 { one } else { many }
}

/// Print the initial "Checking <root>..." message.
pub fn print_start_message(root: &std::path::Path) {
  if is_quiet() {
    return;
  }

  println!("Checking {}...", root.display());
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Format a violation as `path:line: kind: message`.
pub fn format_violation(violation: &Violation) -> String {
  violation.to_string()
}

/// Print every violation, one per line.
///
/// Violation lines are printed in quiet mode as well, without color, so that
/// the output stays usable in scripts.
pub fn print_violations(violations: &[Violation]) {
  for violation in violations {
    if is_quiet() {
      println!("{}", format_violation(violation));
    } else {
      println!(
        "{} {}",
        symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
        format_violation(violation)
      );
    }
  }
}

/// Print files that could not be checked to stderr.
pub fn print_file_errors(errors: &[FileError]) {
  for error in errors {
    eprintln!(
      "{} {}: {}",
      "ERROR:".if_supports_color(Stream::Stderr, |s| s.red()),
      error.path,
      error.error
    );
  }
}

/// Print the result of applying one fix.
pub fn print_fix_applied(violation: &Violation) {
  if is_quiet() {
    return;
  }

  println!(
    "{} {} to {}",
    symbols::FIXED.if_supports_color(Stream::Stdout, |s| s.yellow()),
    violation.fix_description(),
    violation.display_path()
  );
}

/// Print the success message when every checked file complies.
pub fn print_all_files_ok(files_checked: usize) {
  if is_quiet() {
    return;
  }

  println!(
    "{} All {} {} have valid license headers.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    files_checked,
    plural(files_checked, "file", "files")
  );
}

/// Format the summary line.
///
/// Format: "Summary: N files checked, X OK, Y with violations, Z ignored"
pub fn format_summary(summary: &ProcessingSummary) -> String {
  let violations_str = if summary.files_with_violations > 0 {
    summary
      .files_with_violations
      .if_supports_color(Stream::Stdout, |s| s.red())
      .to_string()
  } else {
    summary
      .files_with_violations
      .if_supports_color(Stream::Stdout, |s| s.cyan())
      .to_string()
  };

  let mut line = format!(
    "Summary: {} {} checked, {} OK, {} with violations, {} ignored",
    summary.files_checked,
    plural(summary.files_checked, "file", "files"),
    summary.files_ok.if_supports_color(Stream::Stdout, |s| s.cyan()),
    violations_str,
    summary.files_ignored.if_supports_color(Stream::Stdout, |s| s.dimmed())
  );

  if summary.fixed > 0 {
    line.push_str(&format!(", {} fixed", summary.fixed));
  }
  if summary.errors > 0 {
    line.push_str(&format!(", {} {}", summary.errors, plural(summary.errors, "error", "errors")));
  }

  line
}

/// Print the processing summary.
///
/// In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  let mut line = format_summary(summary);
  if is_verbose() {
    line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", line);
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}
