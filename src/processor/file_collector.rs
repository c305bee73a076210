//! # File Collector Module
//!
//! This module walks the project tree and turns every regular file into a
//! [`CandidateFile`]: its filesystem path plus the project-relative candidate
//! path (`/src/main.py`) that ignore and rule patterns are matched against.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory names that are never traversed.
const SKIPPED_DIRS: &[&str] = &[".git"];

/// A file found under the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
  /// Filesystem path of the file.
  pub path: PathBuf,
  /// Project-relative path with a leading `/` and `/` separators.
  pub candidate: String,
}

/// File collector for directory traversal.
///
/// The `FileCollector` handles:
/// - Traversing the project root in a stable, sorted order
/// - Skipping version control directories
/// - Computing candidate paths relative to the root
pub struct FileCollector {
  /// Root of the project
  project_root: PathBuf,
}

impl FileCollector {
  /// Creates a new FileCollector for the specified project root.
  ///
  /// # Parameters
  ///
  /// * `project_root` - The root directory of the project
  pub const fn new(project_root: PathBuf) -> Self {
    Self { project_root }
  }

  /// Collects every regular file under the project root.
  ///
  /// Symbolic links are not followed. Entries that cannot be read are logged
  /// and skipped.
  ///
  /// # Returns
  ///
  /// The files, sorted by candidate path.
  ///
  /// # Errors
  ///
  /// Returns an error if the project root itself cannot be read.
  pub fn collect(&self) -> Result<Vec<CandidateFile>> {
    std::fs::read_dir(&self.project_root)
      .with_context(|| format!("Failed to read project root: {}", self.project_root.display()))?;

    debug!("Scanning directory: {}", self.project_root.display());
    let start_time = std::time::Instant::now();

    let walker = WalkDir::new(&self.project_root)
      .follow_links(false)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| {
        !(entry.file_type().is_dir() && entry.file_name().to_str().is_some_and(|name| SKIPPED_DIRS.contains(&name)))
      });

    let mut files = Vec::new();
    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          warn!("Skipping unreadable entry: {}", e);
          continue;
        }
      };

      if !entry.file_type().is_file() {
        continue;
      }

      let path = entry.into_path();
      let candidate = candidate_path(&path, &self.project_root);
      files.push(CandidateFile { path, candidate });
    }

    files.sort_by(|a, b| a.candidate.cmp(&b.candidate));

    debug!(
      "Found {} files in {}ms",
      files.len(),
      start_time.elapsed().as_millis()
    );

    Ok(files)
  }
}

/// Computes the candidate path of `path` relative to `project_root`.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
///
/// use headercheck::processor::candidate_path;
///
/// assert_eq!(candidate_path(Path::new("/work/src/main.py"), Path::new("/work")), "/src/main.py");
/// ```
pub fn candidate_path(path: &Path, project_root: &Path) -> String {
  let relative = normalize_relative_path(path, project_root);

  let segments: Vec<String> = relative
    .components()
    .filter_map(|component| match component {
      Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
      Component::ParentDir => Some("..".to_string()),
      _ => None,
    })
    .collect();

  format!("/{}", segments.join("/"))
}

/// Converts a potentially relative path to an absolute path.
///
/// # Parameters
///
/// * `path` - The path to absolutize
///
/// # Returns
///
/// The absolute path.
pub fn absolutize_path(path: &Path) -> Result<PathBuf> {
  if path.is_absolute() {
    Ok(path.to_path_buf())
  } else {
    let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
    Ok(current_dir.join(path))
  }
}

/// Normalizes a path to be relative to a given directory.
///
/// # Parameters
///
/// * `path` - The path to normalize
/// * `base` - The directory to make the path relative to
///
/// # Returns
///
/// The normalized relative path.
pub fn normalize_relative_path(path: &Path, base: &Path) -> PathBuf {
  if let Ok(stripped) = path.strip_prefix(base) {
    return stripped.to_path_buf();
  }

  if path.is_absolute()
    && let Some(rel_path) = pathdiff::diff_paths(path, base)
  {
    return rel_path;
  }

  path
    .components()
    .filter(|component| !matches!(component, Component::CurDir))
    .collect()
}
