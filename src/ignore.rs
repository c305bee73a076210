//! # Ignore Module
//!
//! This module decides which files are excluded from checking before any rule
//! is resolved for them. Ignored files are counted separately and never
//! reach the checker.
//!
//! It supports:
//! - `[ignore].patterns` path patterns from the configuration
//! - a `.licenseignore` file in the project root, using gitignore-style
//!   pattern matching

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::trace;

use crate::config::ConfigError;
use crate::pathglob::PathPattern;
use crate::verbose_log;

/// Name of the gitignore-style ignore file looked up in the project root.
pub const LICENSEIGNORE_FILENAME: &str = ".licenseignore";

/// Manager for handling ignore patterns from various sources.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
///
/// use headercheck::ignore::IgnoreManager;
///
/// # fn main() -> anyhow::Result<()> {
/// let mut manager = IgnoreManager::new(&["/vendor/**".to_string()])?;
/// manager.load_licenseignore(Path::new("."))?;
///
/// assert!(manager.is_ignored("/vendor/lib/a.py"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct IgnoreManager {
  /// Compiled `[ignore].patterns`.
  patterns: Vec<PathPattern>,

  /// Gitignore matcher for the project's `.licenseignore`.
  gitignore: Option<Gitignore>,
}

impl IgnoreManager {
  /// Creates a new ignore manager from configured path patterns.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidPattern`] if any pattern fails to compile.
  pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
    let patterns = patterns
      .iter()
      .map(|pattern| PathPattern::compile(pattern))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self {
      patterns,
      gitignore: None,
    })
  }

  /// Loads `<root>/.licenseignore`, if it exists.
  ///
  /// Blank lines and `#` comments are skipped.
  ///
  /// # Errors
  ///
  /// Returns an error if the file exists but cannot be read or contains an
  /// invalid pattern.
  pub fn load_licenseignore(&mut self, project_root: &Path) -> Result<()> {
    let ignore_path = project_root.join(LICENSEIGNORE_FILENAME);
    if !ignore_path.is_file() {
      trace!("No {} in {}", LICENSEIGNORE_FILENAME, project_root.display());
      return Ok(());
    }

    verbose_log!("Loading .licenseignore file: {}", ignore_path.display());
    let content = fs::read_to_string(&ignore_path)
      .with_context(|| format!("Failed to read .licenseignore file: {}", ignore_path.display()))?;

    let mut builder = GitignoreBuilder::new(project_root);
    for line in content.lines() {
      if !line.trim().is_empty() && !line.trim().starts_with('#') {
        builder
          .add_line(Some(PathBuf::from(project_root)), line)
          .with_context(|| format!("Failed to add line from .licenseignore file: {}", ignore_path.display()))?;
      }
    }

    let gitignore = builder.build().with_context(|| "Failed to build gitignore matcher")?;
    self.gitignore = Some(gitignore);

    Ok(())
  }

  /// Checks if a file should be ignored.
  ///
  /// # Parameters
  ///
  /// * `candidate` - Project-relative path with a leading `/`, e.g.
  ///   `/src/main.py`
  ///
  /// # Returns
  ///
  /// `true` if the file should be ignored, `false` otherwise.
  pub fn is_ignored(&self, candidate: &str) -> bool {
    if let Some(pattern) = self.patterns.iter().find(|pattern| pattern.is_match(candidate)) {
      verbose_log!("Skipping: {} (matches ignore pattern {})", candidate, pattern);
      return true;
    }

    if let Some(ref gitignore) = self.gitignore
      && gitignore
        .matched_path_or_any_parents(candidate.trim_start_matches('/'), false)
        .is_ignore()
    {
      verbose_log!("Skipping: {} (matches .licenseignore pattern)", candidate);
      return true;
    }

    false
  }
}
