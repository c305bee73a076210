//! # Error Module
//!
//! Errors raised while checking or fixing a single file. Configuration
//! problems are reported separately through [`crate::config::ConfigError`]
//! before any file is read.

use std::path::PathBuf;

use crate::templates::TemplateError;

/// Per-file failure of the check or fix step.
///
/// These never abort a run on their own; the driver collects them and turns
/// them into a non-zero exit status.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  /// The file could not be read, or the fixed content could not be written.
  #[error("I/O error on '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The expected header could not be rendered.
  #[error("Failed to render license header: {0}")]
  Template(#[from] TemplateError),

  /// The file was modified between the check and the fix.
  #[error("'{path}' changed since it was checked; refusing to overwrite it")]
  ChangedSinceCheck { path: PathBuf },
}

impl EngineError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}
