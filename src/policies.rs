//! # Policies Module
//!
//! Built-in configuration presets. A preset is an ordinary configuration
//! layer placed underneath every file layer, so anything a user configures
//! overrides it.

use crate::config::{ConfigError, ConfigFile, GlobalSection, PatternSection};

/// Names of every built-in preset.
pub const AVAILABLE_POLICIES: &[&str] = &["apache-2.0"];

/// Builds the configuration layer for a preset.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPolicy`] if no preset has that name.
pub fn load_policy(name: &str) -> Result<ConfigFile, ConfigError> {
  match name {
    "apache-2.0" => Ok(apache_2_0()),
    _ => Err(ConfigError::UnknownPolicy { name: name.to_string() }),
  }
}

/// Apache 2.0 headers on Python sources and Maven-style Java sources, with
/// the copyright year kept current.
fn apache_2_0() -> ConfigFile {
  ConfigFile {
    global: GlobalSection {
      auto_year: Some(true),
      ..GlobalSection::default()
    },
    patterns: vec![
      PatternSection::expecting("/**/*.py", "Apache 2.0"),
      PatternSection::expecting("**/src/main/**/*.java", "Apache 2.0"),
    ],
    ..ConfigFile::default()
  }
}
