use std::fmt;
use std::path::Path;

use super::{BlockComments, Dialect, DialectOptions, GenericComments, HashComments};

/// Source file families, in classification priority order.
///
/// More specific languages come first; [`Language::Generic`] matches every
/// file and therefore comes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
  Python,
  Shell,
  Java,
  CLike,
  CStyle,
  Hash,
  Generic,
}

const PRIORITY: [Language; 7] = [
  Language::Python,
  Language::Shell,
  Language::Java,
  Language::CLike,
  Language::CStyle,
  Language::Hash,
  Language::Generic,
];

const C_LIKE_EXTENSIONS: &[&str] = &["h", "hpp", "c", "cpp"];

const C_STYLE_EXTENSIONS: &[&str] = &[
  "h", "hpp", "c", "cpp", "m", "mm", "cc", "cs", "go", "rs", "swift", "kt", "scala", "js", "ts", "css", "proto",
];

impl Language {
  /// Name used for explicit `language` overrides in configuration.
  pub const fn name(self) -> &'static str {
    match self {
      Self::Python => "python",
      Self::Shell => "shell",
      Self::Java => "java",
      Self::CLike => "c-like",
      Self::CStyle => "c-style",
      Self::Hash => "hash",
      Self::Generic => "generic",
    }
  }

  /// Looks a language up by its override name.
  pub fn from_name(name: &str) -> Option<Self> {
    PRIORITY.into_iter().find(|language| language.name() == name)
  }

  /// Every language, in priority order.
  pub fn all() -> impl Iterator<Item = Self> {
    PRIORITY.into_iter()
  }

  const fn extensions(self) -> &'static [&'static str] {
    match self {
      Self::Python => &["py", "pyi", "pyw"],
      Self::Shell => &["sh", "bash", "zsh", "rb", "pl", "yaml", "yml", "toml", "tf"],
      Self::Java => &["java"],
      Self::CLike => C_LIKE_EXTENSIONS,
      Self::CStyle => C_STYLE_EXTENSIONS,
      Self::Hash | Self::Generic => &[],
    }
  }

  /// Whether this language claims the file.
  ///
  /// An explicit override claims the file for exactly the named language.
  /// Otherwise the file extension decides, and the generic fallback claims
  /// everything.
  pub fn matches(self, path: &Path, language: Option<Self>) -> bool {
    if let Some(language) = language {
      return language == self;
    }

    if self == Self::Generic {
      return true;
    }

    path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| self.extensions().contains(&ext))
  }

  /// Picks the first language in priority order that claims the file.
  pub fn classify(path: &Path, language: Option<Self>) -> Self {
    PRIORITY
      .into_iter()
      .find(|candidate| candidate.matches(path, language))
      .unwrap_or(Self::Generic)
  }

  /// Builds the comment dialect for this language.
  pub fn dialect(self, options: &DialectOptions) -> Dialect {
    match self {
      Self::Python | Self::Shell | Self::Hash => Dialect::Hash(HashComments::new(options)),
      Self::Java => Dialect::Block(BlockComments::new(options, "/**", "**/")),
      Self::CLike | Self::CStyle => Dialect::Block(BlockComments::new(options, "/*", "*/")),
      Self::Generic => Dialect::Generic(GenericComments::new(options)),
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_classify_by_extension() {
    assert_eq!(Language::classify(Path::new("/a/b.py"), None), Language::Python);
    assert_eq!(Language::classify(Path::new("/deploy.sh"), None), Language::Shell);
    assert_eq!(Language::classify(Path::new("/src/Main.java"), None), Language::Java);
    assert_eq!(Language::classify(Path::new("/src/main.c"), None), Language::CLike);
    assert_eq!(Language::classify(Path::new("/src/View.m"), None), Language::CStyle);
    assert_eq!(Language::classify(Path::new("/src/lib.rs"), None), Language::CStyle);
  }

  #[test]
  fn test_classify_unknown_falls_back_to_generic() {
    assert_eq!(Language::classify(Path::new("/README"), None), Language::Generic);
    assert_eq!(Language::classify(Path::new("/notes.txt"), None), Language::Generic);
  }

  #[test]
  fn test_override_takes_precedence_over_extension() {
    assert_eq!(
      Language::classify(Path::new("/src/main.c"), Some(Language::Hash)),
      Language::Hash
    );
    assert_eq!(
      Language::classify(Path::new("/Makefile"), Some(Language::Shell)),
      Language::Shell
    );
  }

  #[test]
  fn test_hash_only_matches_by_override() {
    assert!(!Language::Hash.matches(Path::new("/x.py"), None));
    assert!(Language::Hash.matches(Path::new("/x.txt"), Some(Language::Hash)));
  }

  #[test]
  fn test_from_name_round_trips() {
    for language in Language::all() {
      assert_eq!(Language::from_name(language.name()), Some(language));
    }
    assert_eq!(Language::from_name("cobol"), None);
  }

  #[test]
  fn test_dialect_tokens_per_language() {
    let options = DialectOptions::default();

    match Language::Java.dialect(&options) {
      Dialect::Block(block) => {
        assert_eq!(block.start_comment(), "/**");
        assert_eq!(block.end_comment(), "**/");
      }
      other => panic!("expected block dialect, got {}", other.name()),
    }

    match Language::CLike.dialect(&options) {
      Dialect::Block(block) => {
        assert_eq!(block.start_comment(), "/*");
        assert_eq!(block.end_comment(), "*/");
      }
      other => panic!("expected block dialect, got {}", other.name()),
    }

    assert_eq!(Language::Python.dialect(&options).name(), "hash");
    assert_eq!(Language::Generic.dialect(&options).name(), "generic");
  }
}
