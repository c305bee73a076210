//! # Violation Module
//!
//! A [`Violation`] is the value the checker produces for a non-compliant file.
//! It carries everything needed to preview and apply the fix later: the
//! content snapshot taken at check time, the detected header range and the
//! rendered header. Nothing in it refers back to an open file.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::dialect::HeaderRange;
use crate::error::EngineError;
use crate::fixer;
use crate::rules::LineSet;

/// Categories of compliance problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
  /// The detected header differs from the expected one.
  LicenseHeaderMismatch,
}

impl ViolationKind {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::LicenseHeaderMismatch => "License Header Mismatch",
    }
  }
}

impl fmt::Display for ViolationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Line terminator used when writing rendered header lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
  Lf,
  CrLf,
}

impl LineEnding {
  /// `\r\n` if the first line of `content` ends with it, `\n` otherwise.
  pub fn detect(content: &str) -> Self {
    match content.find('\n') {
      Some(index) if content[..index].ends_with('\r') => Self::CrLf,
      _ => Self::Lf,
    }
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Lf => "\n",
      Self::CrLf => "\r\n",
    }
  }
}

/// How a violating file will be rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixPlan {
  /// Filesystem path of the file.
  pub path: PathBuf,
  /// Project-relative path used in messages and diff labels.
  pub display: String,
  /// File content as read by the checker.
  pub original: String,
  /// Existing header block, possibly empty.
  pub range: HeaderRange,
  /// The expected header, already in comment syntax.
  pub header: Vec<String>,
  /// Header indices whose original line is kept.
  pub skip_lines: LineSet,
  pub line_ending: LineEnding,
}

impl FixPlan {
  /// Short description of the rewrite.
  pub fn description(&self) -> &'static str {
    if self.range.is_empty() {
      "Prepend Header"
    } else {
      "Replace Header"
    }
  }

  /// The fixed file as individual lines, terminators included.
  pub fn fixed_lines(&self) -> Vec<String> {
    let original: Vec<&str> = self.original.split_inclusive('\n').collect();
    fixer::render_fixed(&original, self.range, &self.header, &self.skip_lines, self.line_ending).collect()
  }

  /// The fixed file content.
  pub fn fixed_content(&self) -> String {
    self.fixed_lines().concat()
  }

  /// Unified diff between the snapshot and the fixed content.
  ///
  /// Pure: reads nothing from disk and can be called any number of times.
  pub fn diff(&self) -> Vec<String> {
    fixer::build_diff(&self.display, &self.original, &self.fixed_content())
  }

  /// Writes the fixed content over the file.
  ///
  /// # Errors
  ///
  /// See [`fixer::apply_fix`].
  pub fn apply(&self) -> Result<(), EngineError> {
    fixer::apply_fix(self)
  }
}

/// One compliance problem in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
  /// 0-based line index of the first mismatch.
  pub line: usize,
  pub kind: ViolationKind,
  pub message: String,
  pub fix: FixPlan,
}

impl Violation {
  /// Project-relative path of the violating file.
  pub fn display_path(&self) -> &str {
    &self.fix.display
  }

  pub fn path(&self) -> &Path {
    &self.fix.path
  }

  pub fn fix_description(&self) -> &'static str {
    self.fix.description()
  }

  pub fn diff(&self) -> Vec<String> {
    self.fix.diff()
  }
}

impl fmt::Display for Violation {
  /// `path:line: kind: message`, with a 1-based line number.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}: {}: {}", self.fix.display, self.line + 1, self.kind, self.message)
  }
}
