//! # Path Glob Module
//!
//! Strict glob matching for project-relative file paths.
//!
//! A pattern is split on `|` into alternatives, and each alternative on `/`
//! into segments:
//!
//! - `**` as a whole segment matches any run of characters, `/` included.
//! - `*` inside a segment matches one or more characters other than `/`.
//! - Everything else is matched literally.
//!
//! Alternatives starting with `/` are anchored at the start of the path. Every
//! alternative is anchored at the end, so `*.py` matches Python files at any
//! depth while `/**/*.py` spells the same thing out.
//!
//! ```rust
//! use headercheck::pathglob::PathPattern;
//!
//! # fn main() -> anyhow::Result<()> {
//! let pattern = PathPattern::compile("*.bin|*.baz")?;
//! assert!(pattern.is_match("/hello/this/is/the/end.bin"));
//! assert!(pattern.is_match("/hello/this/is/the/end.baz"));
//! assert!(!pattern.is_match("/hello/end.txt"));
//! # Ok(())
//! # }
//! ```

use std::fmt;

use regex::Regex;

/// Error returned when a pattern cannot be compiled.
#[derive(Debug, thiserror::Error)]
#[error("Invalid path pattern '{pattern}': {source}")]
pub struct PatternError {
  pub pattern: String,
  #[source]
  pub source: regex::Error,
}

/// A compiled path pattern.
///
/// Patterns are compiled once per configuration section and then shared
/// read-only across every candidate file.
#[derive(Clone)]
pub struct PathPattern {
  source: String,
  regex: Regex,
}

impl PathPattern {
  /// Compiles a pattern string into a matcher.
  ///
  /// # Errors
  ///
  /// Returns a [`PatternError`] if the translated expression is rejected by
  /// the regex engine.
  pub fn compile(pattern: &str) -> Result<Self, PatternError> {
    let expression = translate(pattern);

    let regex = Regex::new(&expression).map_err(|source| PatternError {
      pattern: pattern.to_string(),
      source,
    })?;

    Ok(Self {
      source: pattern.to_string(),
      regex,
    })
  }

  /// Returns `true` if any alternative matches the given path.
  pub fn is_match(&self, path: &str) -> bool {
    self.regex.is_match(path)
  }

  /// The pattern string this matcher was compiled from.
  pub fn as_str(&self) -> &str {
    &self.source
  }
}

impl fmt::Debug for PathPattern {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("PathPattern").field(&self.source).finish()
  }
}

impl fmt::Display for PathPattern {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}

/// Translates a full pattern (with alternatives) into a single expression.
fn translate(pattern: &str) -> String {
  pattern
    .split('|')
    .map(|alternative| format!("(?:{})", translate_alternative(alternative)))
    .collect::<Vec<_>>()
    .join("|")
}

fn translate_alternative(alternative: &str) -> String {
  let body = alternative
    .split('/')
    .map(|segment| {
      if segment == "**" {
        return ".*".to_string();
      }

      segment
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[^/]+")
    })
    .collect::<Vec<_>>()
    .join("/");

  if alternative.starts_with('/') {
    format!("^{body}$")
  } else {
    format!("{body}$")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn compile(pattern: &str) -> PathPattern {
    PathPattern::compile(pattern).expect("pattern should compile")
  }

  #[test]
  fn test_absolute_pattern_with_double_star() {
    let pattern = compile("/*/**/*.bin");
    assert!(pattern.is_match("/hello/this/is/the/end.bin"));
    assert!(!pattern.is_match("hello/this/is/the/end.bin"));
  }

  #[test]
  fn test_relative_pattern_matches_at_any_depth() {
    let pattern = compile("*.bin");
    assert!(pattern.is_match("/hello/this/is/the/end.bin"));
    assert!(pattern.is_match("/end.bin"));
    assert!(!pattern.is_match("/end.bin.bak"));
  }

  #[test]
  fn test_alternation() {
    let pattern = compile("*.bin|*.baz");
    assert!(pattern.is_match("/hello/this/is/the/end.bin"));
    assert!(pattern.is_match("/hello/this/is/the/end.baz"));
    assert!(!pattern.is_match("/hello/this/is/the/end.bar"));
  }

  #[test]
  fn test_single_star_does_not_cross_directories() {
    let pattern = compile("/*.py");
    assert!(pattern.is_match("/setup.py"));
    assert!(!pattern.is_match("/pkg/setup.py"));
  }

  #[test]
  fn test_single_star_requires_one_character() {
    let pattern = compile("/src/*.py");
    assert!(pattern.is_match("/src/a.py"));
    assert!(!pattern.is_match("/src/.py"));
  }

  #[test]
  fn test_double_star_matches_nested_directories() {
    let pattern = compile("**/src/main/**/*.java");
    assert!(pattern.is_match("/project/src/main/java/com/Foo.java"));
    assert!(!pattern.is_match("/project/src/test/java/com/Foo.java"));
  }

  #[test]
  fn test_absolute_double_star_requires_a_directory() {
    let pattern = compile("/**/*.py");
    assert!(pattern.is_match("/pkg/mod.py"));
    assert!(!pattern.is_match("/mod.py"));
  }

  #[test]
  fn test_literal_characters_are_escaped() {
    let pattern = compile("/a+b/(x).txt");
    assert!(pattern.is_match("/a+b/(x).txt"));
    assert!(!pattern.is_match("/aab/x.txt"));
  }

  #[test]
  fn test_alternatives_anchor_independently() {
    let pattern = compile("/top.py|nested.py");
    assert!(pattern.is_match("/top.py"));
    assert!(!pattern.is_match("/dir/top.py"));
    assert!(pattern.is_match("/dir/nested.py"));
  }

  #[test]
  fn test_compile_is_deterministic() {
    assert_eq!(translate("/*/**/*.bin"), translate("/*/**/*.bin"));
    assert_eq!(compile("*.rs").as_str(), "*.rs");
  }
}
