//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the checker
//! and the fixer. Writes are atomic: the new content goes to a temporary
//! file in the same directory, which then replaces the target.

use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use crate::error::EngineError;

/// File I/O operations for the engine.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Read full file content as UTF-8 text.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to read
  ///
  /// # Returns
  ///
  /// The complete file content as a String.
  ///
  /// # Errors
  ///
  /// Returns [`EngineError::Io`] naming the path if the file cannot be read
  /// or is not valid UTF-8.
  pub fn read_full_content(path: &Path) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))
  }

  /// Replace a file's content atomically.
  ///
  /// The content is written to a temporary file next to `path`, flushed, given
  /// the original file's permissions and then renamed over `path`. On failure
  /// the original file is left untouched.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to replace
  /// * `content` - The complete new content
  ///
  /// # Errors
  ///
  /// Returns [`EngineError::Io`] naming the path if any step fails.
  pub fn write_atomic(path: &Path, content: &str) -> Result<(), EngineError> {
    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| EngineError::io(path, e))?;
    trace!("Writing {} via {}", path.display(), temp.path().display());

    temp
      .write_all(content.as_bytes())
      .and_then(|()| temp.as_file().sync_all())
      .map_err(|e| EngineError::io(path, e))?;

    if let Ok(metadata) = std::fs::metadata(path) {
      std::fs::set_permissions(temp.path(), metadata.permissions()).map_err(|e| EngineError::io(path, e))?;
    }

    temp.persist(path).map_err(|e| EngineError::io(path, e.error))?;

    Ok(())
  }
}
