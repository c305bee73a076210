//! # Configuration Module
//!
//! This module loads the `headercheck` configuration: a TOML document with a
//! `[global]` section, any number of `[[pattern]]` sections, an `[ignore]`
//! section and an optional `[policy]` preset.
//!
//! Configuration is layered. From lowest to highest precedence:
//!
//! 1. the policy preset named by `[policy].name`, if any
//! 2. `/etc/headercheck.toml`
//! 3. `$HOME/.headercheck.toml`
//! 4. the project file: `--config`, else `HEADERCHECK_CONFIG`, else
//!    `.headercheck.toml` in the project root
//!
//! Scalar `[global]` keys from a higher layer replace lower ones. Pattern
//! sections and ignore patterns are concatenated in layer order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::pathglob::PatternError;
use crate::policies;
use crate::templates::TemplateError;
use crate::verbose_log;

/// The default project config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".headercheck.toml";

/// Environment variable for specifying the project config file path.
pub const CONFIG_ENV_VAR: &str = "HEADERCHECK_CONFIG";

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/headercheck.toml";

/// Error type for configuration operations.
///
/// Every variant is fatal: the run stops before any file is read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML or an unsupported key.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// `[global].entity` is not set in any layer.
  #[error("Global option 'entity' must be set")]
  MissingEntity,

  /// Neither `year` nor `auto_year` is set.
  #[error("Global option 'year' must be set, or 'auto_year' enabled")]
  MissingYear,

  #[error("Unknown license '{name}'")]
  UnknownLicense { name: String },

  #[error("Unknown language '{name}'")]
  UnknownLanguage { name: String },

  #[error("Unknown policy '{name}'")]
  UnknownPolicy { name: String },

  #[error(transparent)]
  InvalidPattern(#[from] PatternError),

  /// A `skip_header_lines` expression could not be parsed.
  #[error("Invalid line range expression '{expression}'")]
  InvalidLineRange { expression: String },

  /// A custom license header file could not be read.
  #[error("Failed to read license header '{path}': {source}")]
  ReadHeader { path: PathBuf, source: std::io::Error },

  /// A license header template does not render with the configured values.
  #[error("License header '{header}' cannot be rendered: {source}")]
  Template { header: String, source: TemplateError },
}

/// The `[policy]` section.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
  /// Name of a built-in preset, e.g. `"apache-2.0"`.
  #[serde(default)]
  pub name: Option<String>,
}

/// The `[global]` section. Every key is optional in a single layer; required
/// keys are enforced once all layers are merged.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GlobalSection {
  #[serde(default)]
  pub entity: Option<String>,

  #[serde(default, deserialize_with = "deserialize_year")]
  pub year: Option<String>,

  #[serde(default)]
  pub auto_year: Option<bool>,

  /// First year of the copyright range.
  #[serde(default, alias = "base_year", deserialize_with = "deserialize_year")]
  pub start_year: Option<String>,

  /// Default license header for files matching at least one pattern.
  #[serde(default)]
  pub expect_license_header: Option<String>,

  #[serde(default)]
  pub license_header_pad: Option<String>,

  #[serde(default)]
  pub strip_license: Option<bool>,

  #[serde(default)]
  pub start_comment: Option<String>,

  #[serde(default)]
  pub end_comment: Option<String>,
}

impl GlobalSection {
  /// Overlays `higher` onto `self`, key by key.
  fn merge(self, higher: Self) -> Self {
    Self {
      entity: higher.entity.or(self.entity),
      year: higher.year.or(self.year),
      auto_year: higher.auto_year.or(self.auto_year),
      start_year: higher.start_year.or(self.start_year),
      expect_license_header: higher.expect_license_header.or(self.expect_license_header),
      license_header_pad: higher.license_header_pad.or(self.license_header_pad),
      strip_license: higher.strip_license.or(self.strip_license),
      start_comment: higher.start_comment.or(self.start_comment),
      end_comment: higher.end_comment.or(self.end_comment),
    }
  }
}

/// One `[[pattern]]` section.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PatternSection {
  /// Path pattern selecting the files this section applies to.
  pub path: String,

  /// Name of a catalog license.
  #[serde(default)]
  pub expect_license_header: Option<String>,

  /// Custom header template file, relative to the project root unless
  /// absolute. Takes precedence over `expect_license_header`.
  #[serde(default)]
  pub custom_license_header_path: Option<PathBuf>,

  #[serde(default)]
  pub start_comment: Option<String>,

  #[serde(default)]
  pub end_comment: Option<String>,

  /// Explicit language, overriding extension-based classification.
  #[serde(default)]
  pub language: Option<String>,

  /// Header line indices exempt from comparison, e.g. `"0,2-4"`.
  #[serde(default)]
  pub skip_header_lines: Option<String>,

  /// Marker that exempts a file when found inside its header.
  #[serde(default)]
  pub skip_header_on_stanza: Option<String>,

  #[serde(default)]
  pub license_header_pad: Option<String>,

  #[serde(default)]
  pub strip_license: Option<bool>,
}

impl PatternSection {
  /// Creates a section for `path` that expects the named license.
  pub fn expecting(path: &str, license: &str) -> Self {
    Self {
      path: path.to_string(),
      expect_license_header: Some(license.to_string()),
      ..Self::default()
    }
  }
}

/// The `[ignore]` section.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IgnoreSection {
  /// Path patterns of files excluded from checking.
  #[serde(default)]
  pub patterns: Vec<String>,
}

/// A configuration layer, or the merge of several.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
  #[serde(default)]
  pub policy: PolicySection,

  #[serde(default)]
  pub global: GlobalSection,

  #[serde(default, rename = "pattern")]
  pub patterns: Vec<PatternSection>,

  #[serde(default)]
  pub ignore: IgnoreSection,
}

impl ConfigFile {
  /// Load one configuration layer from a file.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::ReadError`] if the file cannot be read and
  /// [`ConfigError::ParseError`] for invalid TOML or unsupported keys.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    verbose_log!(
      "Loaded {} pattern section(s) and {} ignore pattern(s)",
      config.patterns.len(),
      config.ignore.patterns.len()
    );

    Ok(config)
  }

  /// Overlays a higher-precedence layer onto this one.
  pub fn merge(mut self, higher: Self) -> Self {
    self.patterns.extend(higher.patterns);
    self.ignore.patterns.extend(higher.ignore.patterns);

    Self {
      policy: PolicySection {
        name: higher.policy.name.or(self.policy.name),
      },
      global: self.global.merge(higher.global),
      patterns: self.patterns,
      ignore: self.ignore,
    }
  }
}

/// Well-known locations of the machine and user config layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocations {
  pub system: PathBuf,
  pub home: Option<PathBuf>,
}

impl ConfigLocations {
  /// Locations derived from the running environment.
  pub fn from_env() -> Self {
    Self {
      system: PathBuf::from(SYSTEM_CONFIG_PATH),
      home: std::env::var_os("HOME").map(PathBuf::from),
    }
  }
}

/// Discover the project configuration file path.
///
/// The project file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `HEADERCHECK_CONFIG` environment variable
/// 3. `.headercheck.toml` in the project root
///
/// An explicit path is returned even if it does not exist, so that loading it
/// reports the problem instead of silently running without it.
pub fn discover_config_path(explicit_path: Option<&Path>, project_root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path.to_path_buf());
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.is_file() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let project_config = project_root.join(DEFAULT_CONFIG_FILENAME);
  if project_config.is_file() {
    verbose_log!("Using project config: {}", project_config.display());
    return Some(project_config);
  }

  verbose_log!("No project config file found");
  None
}

/// Lists the config files to load, lowest precedence first.
pub fn discover_config_layers(
  locations: &ConfigLocations,
  explicit_path: Option<&Path>,
  project_root: &Path,
) -> Vec<PathBuf> {
  let mut layers = Vec::new();

  if locations.system.is_file() {
    layers.push(locations.system.clone());
  }

  if let Some(ref home) = locations.home {
    let user_config = home.join(DEFAULT_CONFIG_FILENAME);
    if user_config.is_file() {
      layers.push(user_config);
    }
  }

  if let Some(project) = discover_config_path(explicit_path, project_root)
    && !layers.contains(&project)
  {
    layers.push(project);
  }

  layers
}

/// Merges the given layers in order and places the selected policy preset
/// underneath them.
///
/// # Errors
///
/// Returns the first error from loading a layer, or
/// [`ConfigError::UnknownPolicy`] for an unrecognized preset.
pub fn load_layers(paths: &[PathBuf]) -> Result<ConfigFile, ConfigError> {
  let mut merged = ConfigFile::default();

  for path in paths {
    merged = merged.merge(ConfigFile::load(path)?);
  }

  apply_policy(merged)
}

/// Places the preset named by `[policy].name` underneath `config`.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPolicy`] for an unrecognized preset.
pub fn apply_policy(config: ConfigFile) -> Result<ConfigFile, ConfigError> {
  match config.policy.name.as_deref() {
    Some(name) => {
      verbose_log!("Applying policy preset: {}", name);
      Ok(policies::load_policy(name)?.merge(config))
    }
    None => Ok(config),
  }
}

/// Load the merged configuration for a project.
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `project_root` - The project root directory
/// * `no_config` - If true, skip every config file layer
///
/// # Errors
///
/// Returns a [`ConfigError`] if any layer cannot be loaded.
pub fn load_config(explicit_path: Option<&Path>, project_root: &Path, no_config: bool) -> Result<ConfigFile, ConfigError> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(ConfigFile::default());
  }

  let layers = discover_config_layers(&ConfigLocations::from_env(), explicit_path, project_root);
  load_layers(&layers)
}

/// Accepts a year written either as a string or as a bare integer.
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Year {
    Text(String),
    Number(i64),
  }

  Ok(Option::<Year>::deserialize(deserializer)?.map(|year| match year {
    Year::Text(text) => text,
    Year::Number(number) => number.to_string(),
  }))
}
