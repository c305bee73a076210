//! # Rules Module
//!
//! Turns the merged configuration into immutable rule values:
//!
//! - [`GlobalRule`]: entity, year and defaults, verified once.
//! - [`PatternRule`]: a compiled path pattern plus optional overrides.
//! - [`EffectiveRule`]: the fold of the global rule with every pattern rule
//!   that applies to one file, in declaration order.
//!
//! All templates are loaded and dry-rendered while the [`RuleSet`] is built,
//! so a missing license, an unreadable header file or an unbound placeholder
//! stops the run before any file is touched.

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Datelike;
use tracing::debug;

use crate::config::{ConfigError, ConfigFile, GlobalSection, PatternSection};
use crate::dialect::{DEFAULT_PAD, DialectOptions, Language};
use crate::licenses;
use crate::pathglob::PathPattern;
use crate::templates::{Bindings, LicenseTemplate};

/// Set of 0-based header line indices, parsed from expressions like
/// `"0,2-10"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSet {
  ranges: Vec<RangeInclusive<usize>>,
}

impl LineSet {
  /// Returns `true` if `index` is in the set.
  pub fn contains(&self, index: usize) -> bool {
    self.ranges.iter().any(|range| range.contains(&index))
  }

  pub fn is_empty(&self) -> bool {
    self.ranges.is_empty()
  }
}

impl fmt::Display for LineSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self
      .ranges
      .iter()
      .map(|range| {
        if range.start() == range.end() {
          range.start().to_string()
        } else {
          format!("{}-{}", range.start(), range.end())
        }
      })
      .collect();
    f.write_str(&parts.join(","))
  }
}

/// Parses a comma separated list of indices and inclusive `a-b` ranges.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidLineRange`] for empty items, non-numeric
/// bounds, or a range whose end is below its start.
pub fn parse_lines(expression: &str) -> Result<LineSet, ConfigError> {
  let invalid = || ConfigError::InvalidLineRange {
    expression: expression.to_string(),
  };

  let mut ranges = Vec::new();

  for item in expression.split(',') {
    let item = item.trim();

    let range = match item.split_once('-') {
      Some((start, end)) => {
        let start: usize = start.trim().parse().ok().ok_or_else(invalid)?;
        let end: usize = end.trim().parse().ok().ok_or_else(invalid)?;
        if end < start {
          return Err(invalid());
        }
        start..=end
      }
      None => {
        let index: usize = item.parse().ok().ok_or_else(invalid)?;
        index..=index
      }
    };

    ranges.push(range);
  }

  Ok(LineSet { ranges })
}

/// Verified global defaults.
#[derive(Debug, Clone)]
pub struct GlobalRule {
  pub entity: String,
  /// Either a single year or a `"start - end"` range.
  pub year: String,
  pub license_header: Option<Arc<LicenseTemplate>>,
  pub pad: String,
  pub strip_license: bool,
  pub start_comment: Option<String>,
  pub end_comment: Option<String>,
}

impl GlobalRule {
  /// Verifies a merged `[global]` section.
  ///
  /// `entity` must be set, and the year must be explicit or `auto_year`
  /// enabled. An explicit year always wins; `auto_year` only fills in
  /// `current_year` when no year is set. A start year turns the
  /// year into a range. The default license header is not loaded here.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::MissingEntity`] or [`ConfigError::MissingYear`].
  pub fn verify(section: &GlobalSection, current_year: i32) -> Result<Self, ConfigError> {
    let entity = section.entity.clone().ok_or(ConfigError::MissingEntity)?;

    let year = match (section.year.clone(), section.auto_year.unwrap_or(false)) {
      (Some(year), _) => year,
      (None, true) => current_year.to_string(),
      (None, false) => return Err(ConfigError::MissingYear),
    };

    let year = match section.start_year {
      Some(ref start_year) => format!("{} - {}", start_year, year),
      None => year,
    };

    Ok(Self {
      entity,
      year,
      license_header: None,
      pad: section
        .license_header_pad
        .clone()
        .unwrap_or_else(|| DEFAULT_PAD.to_string()),
      strip_license: section.strip_license.unwrap_or(true),
      start_comment: section.start_comment.clone(),
      end_comment: section.end_comment.clone(),
    })
  }
}

/// One compiled `[[pattern]]` section.
#[derive(Debug, Clone)]
pub struct PatternRule {
  pub pattern: PathPattern,
  pub license_header: Option<Arc<LicenseTemplate>>,
  pub custom_license_header: Option<Arc<LicenseTemplate>>,
  pub start_comment: Option<String>,
  pub end_comment: Option<String>,
  pub language: Option<Language>,
  pub skip_lines: Option<LineSet>,
  pub skip_on_stanza: Option<String>,
  pub pad: Option<String>,
  pub strip_license: Option<bool>,
}

impl PatternRule {
  /// A rule with a pattern and no overrides.
  pub fn new(pattern: PathPattern) -> Self {
    Self {
      pattern,
      license_header: None,
      custom_license_header: None,
      start_comment: None,
      end_comment: None,
      language: None,
      skip_lines: None,
      skip_on_stanza: None,
      pad: None,
      strip_license: None,
    }
  }

  pub fn applies_to(&self, candidate: &str) -> bool {
    self.pattern.is_match(candidate)
  }
}

/// The fully resolved rule for one file.
#[derive(Debug, Clone)]
pub struct EffectiveRule {
  pub entity: String,
  pub year: String,
  pub license_header: Option<Arc<LicenseTemplate>>,
  pub custom_license_header: Option<Arc<LicenseTemplate>>,
  pub start_comment: Option<String>,
  pub end_comment: Option<String>,
  pub language: Option<Language>,
  pub skip_lines: LineSet,
  pub skip_on_stanza: Option<String>,
  pub pad: String,
  pub strip_license: bool,
}

impl EffectiveRule {
  /// The template to check against. A custom header file wins over a named
  /// catalog license.
  pub fn header_template(&self) -> Option<&LicenseTemplate> {
    self
      .custom_license_header
      .as_deref()
      .or(self.license_header.as_deref())
  }

  /// Returns `true` if this rule expects a header at all.
  pub fn expects_header(&self) -> bool {
    self.header_template().is_some()
  }

  /// Placeholder values for rendering the header.
  pub fn bindings(&self) -> Bindings<'_> {
    HashMap::from([("entity", self.entity.as_str()), ("year", self.year.as_str())])
  }

  pub fn dialect_options(&self) -> DialectOptions {
    DialectOptions {
      pad: self.pad.clone(),
      strip_license: self.strip_license,
      start_comment: self.start_comment.clone(),
      end_comment: self.end_comment.clone(),
    }
  }
}

/// Folds the global rule with the applicable pattern rules, in order.
///
/// Each field a pattern sets replaces the running value. With no applicable
/// pattern the result expects no header.
pub fn resolve<'a>(global: &GlobalRule, patterns: impl IntoIterator<Item = &'a PatternRule>) -> EffectiveRule {
  let mut rule = EffectiveRule {
    entity: global.entity.clone(),
    year: global.year.clone(),
    license_header: None,
    custom_license_header: None,
    start_comment: global.start_comment.clone(),
    end_comment: global.end_comment.clone(),
    language: None,
    skip_lines: LineSet::default(),
    skip_on_stanza: None,
    pad: global.pad.clone(),
    strip_license: global.strip_license,
  };

  let mut matched = false;

  for pattern in patterns {
    if !matched {
      rule.license_header = global.license_header.clone();
      matched = true;
    }

    if let Some(ref header) = pattern.license_header {
      rule.license_header = Some(Arc::clone(header));
    }
    if let Some(ref header) = pattern.custom_license_header {
      rule.custom_license_header = Some(Arc::clone(header));
    }
    if let Some(ref start) = pattern.start_comment {
      rule.start_comment = Some(start.clone());
    }
    if let Some(ref end) = pattern.end_comment {
      rule.end_comment = Some(end.clone());
    }
    if let Some(language) = pattern.language {
      rule.language = Some(language);
    }
    if let Some(ref skip_lines) = pattern.skip_lines {
      rule.skip_lines = skip_lines.clone();
    }
    if let Some(ref stanza) = pattern.skip_on_stanza {
      rule.skip_on_stanza = Some(stanza.clone());
    }
    if let Some(ref pad) = pattern.pad {
      rule.pad = pad.clone();
    }
    if let Some(strip_license) = pattern.strip_license {
      rule.strip_license = strip_license;
    }
  }

  rule
}

/// Loads each template once and remembers where it came from.
struct TemplateCache<'a> {
  project_root: &'a Path,
  named: HashMap<String, Arc<LicenseTemplate>>,
  custom: HashMap<PathBuf, Arc<LicenseTemplate>>,
}

impl<'a> TemplateCache<'a> {
  fn new(project_root: &'a Path) -> Self {
    Self {
      project_root,
      named: HashMap::new(),
      custom: HashMap::new(),
    }
  }

  fn named(&mut self, name: &str) -> Result<Arc<LicenseTemplate>, ConfigError> {
    if let Some(template) = self.named.get(name) {
      return Ok(Arc::clone(template));
    }

    let template = Arc::new(licenses::load_named_header(name)?);
    self.named.insert(name.to_string(), Arc::clone(&template));
    Ok(template)
  }

  fn custom(&mut self, path: &Path) -> Result<Arc<LicenseTemplate>, ConfigError> {
    let path = self.project_root.join(path);

    if let Some(template) = self.custom.get(&path) {
      return Ok(Arc::clone(template));
    }

    let template = Arc::new(licenses::load_header_from_path(&path)?);
    self.custom.insert(path, Arc::clone(&template));
    Ok(template)
  }

  /// Renders every loaded template once with the real bindings.
  fn dry_render(&self, bindings: &Bindings<'_>) -> Result<(), ConfigError> {
    let named = self.named.iter().map(|(name, template)| (name.clone(), template));
    let custom = self
      .custom
      .iter()
      .map(|(path, template)| (path.display().to_string(), template));

    for (header, template) in named.chain(custom) {
      template
        .render(bindings)
        .map_err(|source| ConfigError::Template { header, source })?;
    }

    Ok(())
  }
}

/// Every rule of a run, built once from the merged configuration.
#[derive(Debug, Clone)]
pub struct RuleSet {
  global: GlobalRule,
  patterns: Vec<PatternRule>,
}

impl RuleSet {
  /// Builds the rule set using the current local year for `auto_year`.
  ///
  /// # Errors
  ///
  /// Returns the first [`ConfigError`] found; see [`RuleSet::build_for_year`].
  pub fn build(config: &ConfigFile, project_root: &Path) -> Result<Self, ConfigError> {
    Self::build_for_year(config, project_root, chrono::Local::now().year())
  }

  /// Builds the rule set with an explicit current year.
  ///
  /// # Errors
  ///
  /// Returns a [`ConfigError`] for a missing entity or year, an unknown
  /// license or language, an invalid pattern or line range, an unreadable
  /// custom header, or a template that does not render.
  pub fn build_for_year(config: &ConfigFile, project_root: &Path, current_year: i32) -> Result<Self, ConfigError> {
    let mut templates = TemplateCache::new(project_root);

    let mut global = GlobalRule::verify(&config.global, current_year)?;
    if let Some(ref name) = config.global.expect_license_header {
      global.license_header = Some(templates.named(name)?);
    }

    let patterns = config
      .patterns
      .iter()
      .map(|section| build_pattern(section, &mut templates))
      .collect::<Result<Vec<_>, _>>()?;

    let bindings = HashMap::from([("entity", global.entity.as_str()), ("year", global.year.as_str())]);
    templates.dry_render(&bindings)?;

    debug!(
      entity = %global.entity,
      year = %global.year,
      patterns = patterns.len(),
      "Built rule set"
    );

    Ok(Self { global, patterns })
  }

  /// Builds a rule set from already verified parts.
  pub fn from_parts(global: GlobalRule, patterns: Vec<PatternRule>) -> Self {
    Self { global, patterns }
  }

  pub fn global(&self) -> &GlobalRule {
    &self.global
  }

  pub fn patterns(&self) -> &[PatternRule] {
    &self.patterns
  }

  /// Resolves the effective rule for a project-relative candidate path such
  /// as `/src/main.py`.
  pub fn rule_for(&self, candidate: &str) -> EffectiveRule {
    resolve(
      &self.global,
      self.patterns.iter().filter(|pattern| pattern.applies_to(candidate)),
    )
  }
}

fn build_pattern(section: &PatternSection, templates: &mut TemplateCache<'_>) -> Result<PatternRule, ConfigError> {
  let mut rule = PatternRule::new(PathPattern::compile(&section.path)?);

  rule.license_header = section
    .expect_license_header
    .as_deref()
    .map(|name| templates.named(name))
    .transpose()?;
  rule.custom_license_header = section
    .custom_license_header_path
    .as_deref()
    .map(|path| templates.custom(path))
    .transpose()?;
  rule.language = section
    .language
    .as_deref()
    .map(|name| Language::from_name(name).ok_or_else(|| ConfigError::UnknownLanguage { name: name.to_string() }))
    .transpose()?;
  rule.skip_lines = section.skip_header_lines.as_deref().map(parse_lines).transpose()?;
  rule.start_comment = section.start_comment.clone();
  rule.end_comment = section.end_comment.clone();
  rule.skip_on_stanza = section.skip_header_on_stanza.clone();
  rule.pad = section.license_header_pad.clone();
  rule.strip_license = section.strip_license;

  Ok(rule)
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  fn global_section(entity: &str, year: &str) -> GlobalSection {
    GlobalSection {
      entity: Some(entity.to_string()),
      year: Some(year.to_string()),
      ..GlobalSection::default()
    }
  }

  #[test]
  fn test_parse_lines_list() {
    let lines = parse_lines("0,1,2").expect("valid expression");
    for index in 0..=2 {
      assert!(lines.contains(index));
    }
    assert!(!lines.contains(3));
  }

  #[test]
  fn test_parse_lines_range() {
    let lines = parse_lines("0,2-10").expect("valid expression");
    assert!(lines.contains(0));
    assert!(!lines.contains(1));
    for index in 2..=10 {
      assert!(lines.contains(index));
    }
    assert!(!lines.contains(11));
    assert_eq!(lines.to_string(), "0,2-10");
  }

  #[test]
  fn test_parse_lines_invalid() {
    for expression in ["", "a", "1,", "3-1", "1-x", "-2"] {
      assert!(
        matches!(parse_lines(expression), Err(ConfigError::InvalidLineRange { .. })),
        "{expression:?} should be rejected"
      );
    }
  }

  #[test]
  fn test_global_verify_requires_entity() {
    let section = GlobalSection {
      year: Some("2024".to_string()),
      ..GlobalSection::default()
    };
    assert!(matches!(
      GlobalRule::verify(&section, 2024),
      Err(ConfigError::MissingEntity)
    ));
  }

  #[test]
  fn test_global_verify_requires_year() {
    let section = GlobalSection {
      entity: Some("Acme".to_string()),
      ..GlobalSection::default()
    };
    assert!(matches!(GlobalRule::verify(&section, 2024), Err(ConfigError::MissingYear)));
  }

  #[test]
  fn test_global_verify_auto_year_and_range() {
    let section = GlobalSection {
      entity: Some("Acme".to_string()),
      auto_year: Some(true),
      start_year: Some("2015".to_string()),
      ..GlobalSection::default()
    };

    let global = GlobalRule::verify(&section, 2026).expect("valid global section");
    assert_eq!(global.year, "2015 - 2026");
    assert_eq!(global.pad, " ");
    assert!(global.strip_license);
  }

  #[test]
  fn test_global_verify_explicit_year_wins_over_auto_year() {
    let section = GlobalSection {
      auto_year: Some(true),
      ..global_section("Acme", "2024")
    };

    let global = GlobalRule::verify(&section, 2026).expect("valid global section");
    assert_eq!(global.year, "2024");
  }

  #[test]
  fn test_rule_set_keeps_user_year_under_policy() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(".headercheck.toml");
    std::fs::write(
      &config_path,
      "[policy]\nname = \"apache-2.0\"\n[global]\nentity = \"Acme\"\nyear = \"2024\"\n",
    )
    .expect("write config");

    let config = crate::config::load_layers(&[config_path]).expect("load should succeed");
    assert_eq!(config.global.auto_year, Some(true));

    let rules = RuleSet::build_for_year(&config, temp_dir.path(), 2026).expect("valid rules");
    assert_eq!(rules.global().year, "2024");
  }

  #[test]
  fn test_global_verify_explicit_year() {
    let global = GlobalRule::verify(&global_section("Acme", "2024"), 2030).expect("valid global section");
    assert_eq!(global.entity, "Acme");
    assert_eq!(global.year, "2024");
  }

  #[test]
  fn test_resolve_without_patterns_expects_nothing() {
    let mut global = GlobalRule::verify(&global_section("Acme", "2024"), 2024).expect("valid");
    global.license_header = Some(Arc::new(LicenseTemplate::from_text("Copyright {year} {entity}")));

    let rule = resolve(&global, Vec::<&PatternRule>::new());
    assert!(!rule.expects_header());
  }

  #[test]
  fn test_resolve_later_patterns_override_fields() {
    let global = GlobalRule::verify(&global_section("Acme", "2024"), 2024).expect("valid");

    let mut first = PatternRule::new(PathPattern::compile("*.py").expect("pattern"));
    first.license_header = Some(Arc::new(LicenseTemplate::from_text("first")));
    first.pad = Some("  ".to_string());
    first.skip_on_stanza = Some("@generated".to_string());

    let mut second = PatternRule::new(PathPattern::compile("/src/**").expect("pattern"));
    second.license_header = Some(Arc::new(LicenseTemplate::from_text("second")));
    second.strip_license = Some(false);

    let rule = resolve(&global, [&first, &second]);

    assert_eq!(rule.header_template().map(LicenseTemplate::lines), Some(&["second".to_string()][..]));
    assert_eq!(rule.pad, "  ");
    assert!(!rule.strip_license);
    assert_eq!(rule.skip_on_stanza.as_deref(), Some("@generated"));
  }

  #[test]
  fn test_custom_header_wins_over_named_header() {
    let global = GlobalRule::verify(&global_section("Acme", "2024"), 2024).expect("valid");

    let mut custom = PatternRule::new(PathPattern::compile("*.py").expect("pattern"));
    custom.custom_license_header = Some(Arc::new(LicenseTemplate::from_text("custom")));

    let mut named = PatternRule::new(PathPattern::compile("*.py").expect("pattern"));
    named.license_header = Some(Arc::new(LicenseTemplate::from_text("named")));

    let rule = resolve(&global, [&custom, &named]);
    assert_eq!(rule.header_template().map(|t| t.lines()[0].as_str()), Some("custom"));
  }

  #[test]
  fn test_rule_set_uses_global_header_for_matching_files() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config: ConfigFile = toml::from_str(concat!(
      "[global]\n",
      "entity = \"Acme\"\n",
      "year = \"2024\"\n",
      "expect_license_header = \"MIT\"\n",
      "[[pattern]]\n",
      "path = \"*.py\"\n",
    ))
    .expect("valid config");

    let rules = RuleSet::build_for_year(&config, temp_dir.path(), 2024).expect("rules should build");

    assert!(rules.rule_for("/src/main.py").expects_header());
    assert!(!rules.rule_for("/src/main.rs").expects_header());
  }

  #[test]
  fn test_rule_set_resolves_language_and_skip_lines() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config: ConfigFile = toml::from_str(concat!(
      "[global]\n",
      "entity = \"Acme\"\n",
      "year = \"2024\"\n",
      "[[pattern]]\n",
      "path = \"/tools/*\"\n",
      "expect_license_header = \"MIT\"\n",
      "language = \"hash\"\n",
      "skip_header_lines = \"0-1\"\n",
    ))
    .expect("valid config");

    let rules = RuleSet::build_for_year(&config, temp_dir.path(), 2024).expect("rules should build");
    let rule = rules.rule_for("/tools/run");

    assert_eq!(rule.language, Some(Language::Hash));
    assert!(rule.skip_lines.contains(1));
    assert!(!rule.skip_lines.contains(2));
  }

  #[test]
  fn test_rule_set_rejects_unknown_language() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config: ConfigFile = toml::from_str(concat!(
      "[global]\n",
      "entity = \"Acme\"\n",
      "year = \"2024\"\n",
      "[[pattern]]\n",
      "path = \"*.x\"\n",
      "language = \"cobol\"\n",
    ))
    .expect("valid config");

    assert!(matches!(
      RuleSet::build_for_year(&config, temp_dir.path(), 2024),
      Err(ConfigError::UnknownLanguage { .. })
    ));
  }

  #[test]
  fn test_rule_set_rejects_unknown_license() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config: ConfigFile = toml::from_str(concat!(
      "[global]\n",
      "entity = \"Acme\"\n",
      "year = \"2024\"\n",
      "[[pattern]]\n",
      "path = \"*.py\"\n",
      "expect_license_header = \"Beerware\"\n",
    ))
    .expect("valid config");

    assert!(matches!(
      RuleSet::build_for_year(&config, temp_dir.path(), 2024),
      Err(ConfigError::UnknownLicense { .. })
    ));
  }

  #[test]
  fn test_rule_set_rejects_unbound_placeholder() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join("header.txt"), "Copyright {year} {owner}\n").expect("write header");

    let config: ConfigFile = toml::from_str(concat!(
      "[global]\n",
      "entity = \"Acme\"\n",
      "year = \"2024\"\n",
      "[[pattern]]\n",
      "path = \"*.py\"\n",
      "custom_license_header_path = \"header.txt\"\n",
    ))
    .expect("valid config");

    assert!(matches!(
      RuleSet::build_for_year(&config, temp_dir.path(), 2024),
      Err(ConfigError::Template { .. })
    ));
  }

  #[test]
  fn test_rule_set_loads_custom_header_relative_to_root() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::create_dir_all(temp_dir.path().join("etc")).expect("create etc");
    std::fs::write(temp_dir.path().join("etc/header.txt"), "Copyright {year} {entity}\n").expect("write header");

    let config: ConfigFile = toml::from_str(concat!(
      "[global]\n",
      "entity = \"Acme\"\n",
      "year = \"2024\"\n",
      "[[pattern]]\n",
      "path = \"*.py\"\n",
      "custom_license_header_path = \"etc/header.txt\"\n",
    ))
    .expect("valid config");

    let rules = RuleSet::build_for_year(&config, temp_dir.path(), 2024).expect("rules should build");
    let rule = rules.rule_for("/a.py");
    let template = rule.header_template().expect("header expected");

    assert_eq!(
      template.render(&rule.bindings()).expect("render"),
      vec!["Copyright 2024 Acme".to_string()]
    );
  }
}
