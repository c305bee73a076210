//! # Diff Module
//!
//! This module displays and saves the unified diffs attached to violations.
//! It's used by the command line driver for `--show-diff`, `--save-diff` and
//! the preview shown before a fix is applied.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

/// Manages diff rendering for license header fixes.
///
/// This struct handles:
/// - Displaying diffs to stderr with colorization
/// - Saving diffs to a file
pub struct DiffManager {
  /// Whether to show diffs on stderr
  pub show_diff: bool,

  /// Path to append diffs to
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  /// Creates a new DiffManager with the specified configuration.
  ///
  /// # Parameters
  ///
  /// * `show_diff` - Whether to show diffs on stderr
  /// * `save_diff_path` - Path to save diffs to
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Truncates the save file so that a run starts from an empty diff.
  ///
  /// # Errors
  ///
  /// Returns an error if the save file cannot be created.
  pub fn init(&self) -> Result<()> {
    if let Some(ref diff_path) = self.save_diff_path {
      std::fs::write(diff_path, "").with_context(|| format!("Failed to create diff file: {}", diff_path.display()))?;
    }
    Ok(())
  }

  /// Displays and/or saves one diff.
  ///
  /// Multiple diffs from different files are appended to the same file,
  /// creating a single consolidated diff file.
  ///
  /// # Parameters
  ///
  /// * `diff` - Lines of a unified diff, without terminators
  ///
  /// # Errors
  ///
  /// Returns an error if the save file cannot be written.
  pub fn display_diff(&self, diff: &[String]) -> Result<()> {
    if self.show_diff {
      print_diff(diff);
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut content = diff.join("\n");
      content.push('\n');

      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      file
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}

/// Prints a unified diff to stderr, coloring added and removed lines.
pub fn print_diff(diff: &[String]) {
  for line in diff {
    if line.starts_with("+++") || line.starts_with("---") {
      eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.bold()));
    } else if line.starts_with("@@") {
      eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.cyan()));
    } else if line.starts_with('+') {
      eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.green()));
    } else if line.starts_with('-') {
      eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.red()));
    } else {
      eprintln!("{}", line);
    }
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  fn sample_diff(name: &str) -> Vec<String> {
    vec![
      format!("--- {name}"),
      format!("+++ {name}.fix"),
      "@@ -1 +1 @@".to_string(),
      "-# Copyright 2023 Acme".to_string(),
      "+# Copyright 2024 Acme".to_string(),
    ]
  }

  #[test]
  fn test_save_diff_appends() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let diff_path = temp_dir.path().join("changes.diff");
    let manager = DiffManager::new(false, Some(diff_path.clone()));

    manager.init().expect("init");
    manager.display_diff(&sample_diff("/a.py")).expect("first diff");
    manager.display_diff(&sample_diff("/b.py")).expect("second diff");

    let saved = std::fs::read_to_string(&diff_path).expect("read diff file");
    assert!(saved.starts_with("--- /a.py\n+++ /a.py.fix\n"));
    assert!(saved.contains("--- /b.py\n"));
    assert_eq!(saved.lines().count(), 10);
  }

  #[test]
  fn test_init_truncates_previous_run() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let diff_path = temp_dir.path().join("changes.diff");
    std::fs::write(&diff_path, "stale\n").expect("write stale diff");

    DiffManager::new(false, Some(diff_path.clone())).init().expect("init");

    assert_eq!(std::fs::read_to_string(&diff_path).expect("read diff file"), "");
  }

  #[test]
  fn test_no_save_path_writes_nothing() {
    let manager = DiffManager::new(false, None);
    manager.init().expect("init");
    manager.display_diff(&sample_diff("/a.py")).expect("diff");
  }
}
