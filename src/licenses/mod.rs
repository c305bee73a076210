//! # Licenses Module
//!
//! The built-in license catalog, plus loading of custom header templates from
//! arbitrary files.
//!
//! Catalog entries are compiled into the binary and keyed by their exact
//! display name (for example `"Apache 2.0"`).

use std::fs;
use std::path::Path;

use crate::config::ConfigError;
use crate::templates::LicenseTemplate;
use crate::verbose_log;

/// A license known to the built-in catalog.
struct CatalogEntry {
  name: &'static str,
  header: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
  CatalogEntry {
    name: "Apache 2.0",
    header: include_str!("apache_2.0_header.txt"),
  },
  CatalogEntry {
    name: "MIT",
    header: include_str!("mit_header.txt"),
  },
];

/// Names of every license in the built-in catalog.
pub fn available_licenses() -> impl Iterator<Item = &'static str> {
  CATALOG.iter().map(|entry| entry.name)
}

/// Loads the header template of a catalog license.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownLicense`] if no catalog entry has that name.
pub fn load_named_header(name: &str) -> Result<LicenseTemplate, ConfigError> {
  CATALOG
    .iter()
    .find(|entry| entry.name == name)
    .map(|entry| LicenseTemplate::from_text(entry.header))
    .ok_or_else(|| ConfigError::UnknownLicense { name: name.to_string() })
}

/// Loads a header template from a file.
///
/// # Errors
///
/// Returns [`ConfigError::ReadHeader`] if the file cannot be read as UTF-8
/// text.
pub fn load_header_from_path(path: &Path) -> Result<LicenseTemplate, ConfigError> {
  verbose_log!("Loading license header from: {}", path.display());

  let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadHeader {
    path: path.to_path_buf(),
    source,
  })?;

  Ok(LicenseTemplate::from_text(&content))
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_load_named_header_apache() {
    let template = load_named_header("Apache 2.0").expect("Apache 2.0 should be in the catalog");

    assert_eq!(template.lines()[0], "Copyright (c) {year} {entity}");
    assert_eq!(template.lines()[1], "");
    assert_eq!(
      template.lines().last().map(String::as_str),
      Some("limitations under the License.")
    );
  }

  #[test]
  fn test_load_named_header_unknown() {
    let err = load_named_header("Beerware").expect_err("unknown license should fail");
    assert!(matches!(err, ConfigError::UnknownLicense { ref name } if name == "Beerware"));
  }

  #[test]
  fn test_available_licenses() {
    let names: Vec<_> = available_licenses().collect();
    assert_eq!(names, vec!["Apache 2.0", "MIT"]);
  }

  #[test]
  fn test_load_header_from_path() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("header.txt");
    std::fs::write(&path, "Copyright {year} {entity}\nInternal use only.\n").expect("write header");

    let template = load_header_from_path(&path).expect("load should succeed");
    assert_eq!(template.lines(), ["Copyright {year} {entity}", "Internal use only."]);
  }

  #[test]
  fn test_load_header_from_missing_path() {
    let err = load_header_from_path(Path::new("/nonexistent/header.txt")).expect_err("missing file should fail");
    assert!(matches!(err, ConfigError::ReadHeader { .. }));
  }
}
