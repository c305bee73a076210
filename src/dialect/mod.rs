//! # Comment Dialect Module
//!
//! A comment dialect knows two things about a family of source files:
//!
//! - where an existing header comment sits at the top of a file
//!   ([`Dialect::find_header_range`]), and
//! - how to wrap license lines in that family's comment syntax
//!   ([`Dialect::render_header_comment`]).
//!
//! The family is chosen by [`Language::classify`], which walks a fixed
//! priority list of languages and ends in a generic fallback that never
//! detects a header and renders lines unchanged.
//!
//! ## Example
//!
//! ```rust
//! use std::path::Path;
//!
//! use headercheck::dialect::{DialectOptions, HeaderRange, Language};
//!
//! let language = Language::classify(Path::new("/tools/run.py"), None);
//! let dialect = language.dialect(&DialectOptions::default());
//!
//! let range = dialect.find_header_range(&["#", "# DO NOT CARE", "#", "import os"]);
//! assert_eq!(range, HeaderRange::new(0, 3));
//!
//! let rendered = dialect.render_header_comment(&["Copyright 2024 Acme".to_string()]);
//! assert_eq!(rendered, vec!["# Copyright 2024 Acme".to_string()]);
//! ```

mod block;
mod hash;
mod language;

use std::fmt;

pub use block::BlockComments;
pub use hash::HashComments;
pub use language::Language;

/// Default padding placed between a comment marker and the license text.
pub const DEFAULT_PAD: &str = " ";

/// Half-open line range `[start, end)` occupied by a header block.
///
/// An empty range means no header block was detected; `start` still marks
/// where a header would be inserted (after a shebang, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderRange {
  pub start: usize,
  pub end: usize,
}

impl HeaderRange {
  pub const fn new(start: usize, end: usize) -> Self {
    Self { start, end }
  }

  /// An empty range at the top of the file.
  pub const fn empty() -> Self {
    Self { start: 0, end: 0 }
  }

  pub const fn is_empty(&self) -> bool {
    self.start >= self.end
  }

  pub const fn len(&self) -> usize {
    self.end.saturating_sub(self.start)
  }
}

impl From<(usize, usize)> for HeaderRange {
  fn from((start, end): (usize, usize)) -> Self {
    Self { start, end }
  }
}

impl fmt::Display for HeaderRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}, {})", self.start, self.end)
  }
}

/// Rendering and detection knobs taken from a file's effective rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectOptions {
  /// Padding between the comment marker and the text.
  pub pad: String,
  /// Render blank license lines as a bare comment marker.
  pub strip_license: bool,
  /// Block comment opening token override.
  pub start_comment: Option<String>,
  /// Block comment closing token override.
  pub end_comment: Option<String>,
}

impl Default for DialectOptions {
  fn default() -> Self {
    Self {
      pad: DEFAULT_PAD.to_string(),
      strip_license: true,
      start_comment: None,
      end_comment: None,
    }
  }
}

/// Identity dialect for files no language claims.
///
/// It never detects an existing header. When comment tokens were configured
/// explicitly, rendered lines are wrapped in them so the override still takes
/// effect for unrecognized file types.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenericComments {
  start_comment: Option<String>,
  end_comment: Option<String>,
}

impl GenericComments {
  pub fn new(options: &DialectOptions) -> Self {
    Self {
      start_comment: options.start_comment.clone(),
      end_comment: options.end_comment.clone(),
    }
  }

  fn render_header_comment(&self, lines: &[String]) -> Vec<String> {
    let mut rendered = Vec::with_capacity(lines.len() + 2);

    if let Some(ref start) = self.start_comment {
      rendered.push(start.clone());
    }

    rendered.extend(lines.iter().map(|line| strip_line_end(line).to_string()));

    if let Some(ref end) = self.end_comment {
      rendered.push(end.clone());
    }

    rendered
  }
}

/// The closed set of comment dialects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialect {
  /// `#`-prefixed line comments with an optional shebang line.
  Hash(HashComments),
  /// Block comments delimited by start and end tokens.
  Block(BlockComments),
  /// Fallback: no detection, identity rendering.
  Generic(GenericComments),
}

impl Dialect {
  /// Locates the header block at the top of `lines`.
  ///
  /// Lines are expected without their line terminators.
  pub fn find_header_range<S: AsRef<str>>(&self, lines: &[S]) -> HeaderRange {
    match self {
      Self::Hash(hash) => hash.find_header_range(lines),
      Self::Block(block) => block.find_header_range(lines),
      Self::Generic(_) => HeaderRange::empty(),
    }
  }

  /// Wraps rendered license lines in this dialect's comment syntax.
  pub fn render_header_comment(&self, lines: &[String]) -> Vec<String> {
    match self {
      Self::Hash(hash) => hash.render_header_comment(lines),
      Self::Block(block) => block.render_header_comment(lines),
      Self::Generic(generic) => generic.render_header_comment(lines),
    }
  }

  /// Short name used in diagnostics.
  pub const fn name(&self) -> &'static str {
    match self {
      Self::Hash(_) => "hash",
      Self::Block(_) => "block",
      Self::Generic(_) => "generic",
    }
  }
}

/// Removes a trailing `\n` or `\r\n` from a line.
pub fn strip_line_end(line: &str) -> &str {
  let line = line.strip_suffix('\n').unwrap_or(line);
  line.strip_suffix('\r').unwrap_or(line)
}
