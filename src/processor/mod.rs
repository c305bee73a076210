//! # Processor Module
//!
//! This module drives a check run over a project tree.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and atomic writing
//! - [`file_collector`] - Directory traversal and candidate paths
//!
//! The [`Processor`] enumerates candidate files, drops ignored ones, resolves
//! the effective rule of every remaining file and hands it to the checker.
//! Per-file I/O errors are collected instead of aborting the run.

mod file_collector;
mod file_io;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
pub use file_collector::{CandidateFile, FileCollector, absolutize_path, candidate_path, normalize_relative_path};
pub use file_io::FileIO;
use tracing::{debug, trace};

use crate::checker;
use crate::config::ConfigFile;
use crate::error::EngineError;
use crate::ignore::IgnoreManager;
use crate::rules::RuleSet;
use crate::verbose_log;
use crate::violation::Violation;

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub project_root: PathBuf,
  pub rules: RuleSet,
  pub ignore_manager: IgnoreManager,
}

impl ProcessorConfig {
  /// Creates a new ProcessorConfig that ignores nothing.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     ignore_manager,
  ///     ..ProcessorConfig::new(project_root, rules)
  /// }
  /// ```
  pub fn new(project_root: PathBuf, rules: RuleSet) -> Self {
    Self {
      project_root,
      rules,
      ignore_manager: IgnoreManager::default(),
    }
  }

  /// Builds the rules and ignore matchers of a merged configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if the configuration is invalid or the project's
  /// `.licenseignore` cannot be loaded.
  pub fn from_config(config: &ConfigFile, project_root: &Path) -> Result<Self> {
    let rules = RuleSet::build(config, project_root).context("Invalid configuration")?;

    let mut ignore_manager = IgnoreManager::new(&config.ignore.patterns).context("Invalid ignore pattern")?;
    ignore_manager.load_licenseignore(project_root)?;

    Ok(Self {
      project_root: project_root.to_path_buf(),
      rules,
      ignore_manager,
    })
  }
}

/// A file whose check failed.
#[derive(Debug)]
pub struct FileError {
  /// Candidate path of the file.
  pub path: String,
  pub error: EngineError,
}

/// Outcome of a check run.
#[derive(Debug, Default)]
pub struct CheckRun {
  /// Non-ignored files, whether or not any rule applied to them.
  pub files_checked: usize,
  pub files_ignored: usize,
  /// Violations in candidate path order.
  pub violations: Vec<Violation>,
  pub errors: Vec<FileError>,
}

impl CheckRun {
  /// `true` when there are no violations and no errors.
  pub fn is_clean(&self) -> bool {
    self.violations.is_empty() && self.errors.is_empty()
  }

  /// Number of distinct files with at least one violation.
  pub fn files_with_violations(&self) -> usize {
    self
      .violations
      .iter()
      .map(Violation::display_path)
      .collect::<BTreeSet<_>>()
      .len()
  }

  /// Number of checked files with neither a violation nor an error.
  pub fn files_ok(&self) -> usize {
    self
      .files_checked
      .saturating_sub(self.files_with_violations())
      .saturating_sub(self.errors.len())
  }
}

/// Processor for checking license headers across a project.
pub struct Processor {
  /// Root of the project; candidate paths are relative to it.
  project_root: PathBuf,

  rules: RuleSet,

  ignore_manager: IgnoreManager,

  file_collector: FileCollector,
}

impl Processor {
  /// Creates a new processor with the specified configuration.
  pub fn new(config: ProcessorConfig) -> Self {
    let file_collector = FileCollector::new(config.project_root.clone());

    Self {
      project_root: config.project_root,
      rules: config.rules,
      ignore_manager: config.ignore_manager,
      file_collector,
    }
  }

  pub fn project_root(&self) -> &Path {
    &self.project_root
  }

  pub fn rules(&self) -> &RuleSet {
    &self.rules
  }

  /// Checks every file under the project root.
  ///
  /// # Returns
  ///
  /// The run outcome. Files are visited in candidate path order, so
  /// violations and errors come out sorted.
  ///
  /// # Errors
  ///
  /// Returns an error only if the project root cannot be traversed.
  pub fn check(&self) -> Result<CheckRun> {
    let files = self.file_collector.collect()?;
    Ok(self.check_files(files))
  }

  /// Checks an already collected list of files.
  pub fn check_files(&self, files: Vec<CandidateFile>) -> CheckRun {
    let mut run = CheckRun::default();

    if files.is_empty() {
      debug!("No files to check");
      return run;
    }

    for file in files {
      if self.ignore_manager.is_ignored(&file.candidate) {
        run.files_ignored += 1;
        continue;
      }

      run.files_checked += 1;
      verbose_log!("Checking: {}", file.candidate);

      let rule = self.rules.rule_for(&file.candidate);
      match checker::evaluate(&file.path, &file.candidate, &rule) {
        Ok(violations) => {
          trace!("{}: {} violation(s)", file.candidate, violations.len());
          run.violations.extend(violations);
        }
        Err(error) => {
          debug!("{}: {}", file.candidate, error);
          run.errors.push(FileError {
            path: file.candidate,
            error,
          });
        }
      }
    }

    debug!(
      "Checked {} files ({} ignored), {} violation(s), {} error(s)",
      run.files_checked,
      run.files_ignored,
      run.violations.len(),
      run.errors.len()
    );

    run
  }

  /// Checks a single file under the project root.
  ///
  /// Ignore rules are not consulted.
  ///
  /// # Errors
  ///
  /// Returns an [`EngineError`] if the file cannot be read or its header
  /// cannot be rendered.
  pub fn check_file(&self, path: &Path) -> Result<Vec<Violation>, EngineError> {
    let candidate = candidate_path(path, &self.project_root);
    let rule = self.rules.rule_for(&candidate);
    checker::evaluate(path, &candidate, &rule)
  }
}
