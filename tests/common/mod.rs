#![allow(dead_code)]

use std::fs;
use std::path::Path;
use assert_cmd::Command;

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Project configuration used by most tests: Python files need a
/// `Copyright {year} {entity}` header rendered from `header.txt`.
pub const ACME_CONFIG: &str = r#"[global]
entity = "Acme"
year = "2024"

[[pattern]]
path = "*.py"
custom_license_header_path = "header.txt"
"#;

/// Writes `content` to `relative` below `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<()> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn read_file(root: &Path, relative: &str) -> Result<String> {
  let path = root.join(relative);
  fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Creates a project with the given `.headercheck.toml` and the Acme
/// `header.txt`.
pub fn project(config: &str) -> Result<TempDir> {
  let temp_dir = TempDir::new()?;
  write_file(temp_dir.path(), ".headercheck.toml", config)?;
  write_file(temp_dir.path(), "header.txt", "Copyright {year} {entity}\n")?;
  Ok(temp_dir)
}

/// The headercheck binary, isolated from the user's configuration.
///
/// `HOME` points at a directory without a `.headercheck.toml`, the config
/// environment variable is cleared and colors are disabled.
pub fn headercheck(home: &Path) -> Result<Command> {
  let mut cmd = Command::cargo_bin("headercheck")?;
  cmd
    .env("HOME", home)
    .env_remove("HEADERCHECK_CONFIG")
    .env_remove("RUST_LOG")
    .arg("--colors=never");
  Ok(cmd)
}
