//! # Fixer Module
//!
//! Rewrites a non-compliant file: the lines before the detected header range
//! and from its end onward are kept verbatim, and the range itself is
//! replaced by the rendered header. Fixed content can be previewed as a
//! unified diff or written back atomically.

use similar::TextDiff;
use tracing::debug;

use crate::dialect::HeaderRange;
use crate::error::EngineError;
use crate::processor::FileIO;
use crate::rules::LineSet;
use crate::violation::{FixPlan, LineEnding};

/// Number of unchanged lines shown around each diff hunk.
pub const DIFF_CONTEXT_LINES: usize = 3;

/// Lazily produces the fixed file, line by line, terminators included.
///
/// A header index listed in `skip_lines` keeps the original line at that
/// position when the existing header block has one. Calling this again with
/// the same inputs yields the same lines.
pub fn render_fixed<'a>(
  original: &'a [&'a str],
  range: HeaderRange,
  header: &'a [String],
  skip_lines: &'a LineSet,
  line_ending: LineEnding,
) -> impl Iterator<Item = String> + 'a {
  let start = range.start.min(original.len());
  let end = range.end.clamp(start, original.len());

  let before = original[..start].iter().map(move |line| terminated(line, line_ending));

  let replaced = header.iter().enumerate().map(move |(i, rendered)| {
    let index = start + i;
    if skip_lines.contains(i) && index < end {
      terminated(original[index], line_ending)
    } else {
      format!("{}{}", rendered, line_ending.as_str())
    }
  });

  let after = original[end..].iter().map(|line| (*line).to_string());

  before.chain(replaced).chain(after)
}

/// Writes the plan's fixed content over its file.
///
/// The file is re-read first. If it already holds the fixed content nothing
/// is written; if it no longer matches the snapshot taken at check time the
/// fix is refused.
///
/// # Errors
///
/// Returns [`EngineError::ChangedSinceCheck`] if the file changed since it was
/// checked, or [`EngineError::Io`] if it cannot be read or replaced.
pub fn apply_fix(plan: &FixPlan) -> Result<(), EngineError> {
  let current = FileIO::read_full_content(&plan.path)?;
  let fixed = plan.fixed_content();

  if current == fixed {
    debug!("{} already carries the expected header", plan.display);
    return Ok(());
  }

  if current != plan.original {
    return Err(EngineError::ChangedSinceCheck {
      path: plan.path.clone(),
    });
  }

  FileIO::write_atomic(&plan.path, &fixed)?;
  debug!("Applied \"{}\" to {}", plan.description(), plan.display);

  Ok(())
}

/// Unified diff from `original` to `fixed`, labelled `display` and
/// `display.fix`.
pub fn build_diff(display: &str, original: &str, fixed: &str) -> Vec<String> {
  let proposed = format!("{display}.fix");

  TextDiff::from_lines(original, fixed)
    .unified_diff()
    .context_radius(DIFF_CONTEXT_LINES)
    .header(display, &proposed)
    .to_string()
    .lines()
    .map(str::to_string)
    .collect()
}

fn terminated(line: &str, line_ending: LineEnding) -> String {
  if line.ends_with('\n') {
    line.to_string()
  } else {
    format!("{}{}", line, line_ending.as_str())
  }
}
