//! # Templates Module
//!
//! This module provides [`LicenseTemplate`], an ordered list of license header
//! lines with named placeholders, and the rendering that turns a template and
//! a set of bindings into concrete header lines.
//!
//! Placeholders are written `{name}`. Literal braces are written `{{` and
//! `}}`. Rendering never mutates the template and fails fast on a placeholder
//! that has no binding instead of emitting it verbatim.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use headercheck::templates::LicenseTemplate;
//!
//! # fn main() -> anyhow::Result<()> {
//! let template = LicenseTemplate::from_text("Copyright {year} {entity}");
//!
//! let mut bindings = HashMap::new();
//! bindings.insert("year", "2024");
//! bindings.insert("entity", "Acme");
//!
//! assert_eq!(template.render(&bindings)?, vec!["Copyright 2024 Acme".to_string()]);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

/// Error produced while rendering a template line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
  /// A placeholder names a value that was not supplied.
  #[error("Unbound placeholder '{{{name}}}' in template line {line}")]
  Unbound { name: String, line: usize },

  /// A brace is opened but never closed, or closed without being opened.
  #[error("Unbalanced brace in template line {line}: {text}")]
  Unbalanced { line: usize, text: String },
}

/// Bindings for template placeholders, keyed by placeholder name.
pub type Bindings<'a> = HashMap<&'a str, &'a str>;

/// A license header template.
///
/// Loaded once from the license catalog or from a file and shared read-only
/// between every file that expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseTemplate {
  lines: Vec<String>,
}

impl LicenseTemplate {
  /// Creates a template from individual lines.
  pub const fn new(lines: Vec<String>) -> Self {
    Self { lines }
  }

  /// Creates a template by splitting text into lines.
  ///
  /// A trailing line terminator does not produce an extra empty line.
  pub fn from_text(text: &str) -> Self {
    Self {
      lines: text.lines().map(str::to_string).collect(),
    }
  }

  /// The raw template lines.
  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  /// Renders every line with the given bindings.
  ///
  /// # Errors
  ///
  /// Returns a [`TemplateError`] for an unbound placeholder or an unbalanced
  /// brace.
  pub fn render(&self, bindings: &Bindings<'_>) -> Result<Vec<String>, TemplateError> {
    self
      .lines
      .iter()
      .enumerate()
      .map(|(index, line)| render_line(line, index + 1, bindings))
      .collect()
  }
}

fn render_line(line: &str, number: usize, bindings: &Bindings<'_>) -> Result<String, TemplateError> {
  // Lines without braces are the common case.
  if !line.contains(['{', '}']) {
    return Ok(line.to_string());
  }

  let unbalanced = || TemplateError::Unbalanced {
    line: number,
    text: line.to_string(),
  };

  let mut rendered = String::with_capacity(line.len());
  let mut chars = line.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '{' if chars.peek() == Some(&'{') => {
        chars.next();
        rendered.push('{');
      }
      '}' if chars.peek() == Some(&'}') => {
        chars.next();
        rendered.push('}');
      }
      '{' => {
        let mut name = String::new();
        loop {
          match chars.next() {
            Some('}') => break,
            Some('{') | None => return Err(unbalanced()),
            Some(other) => name.push(other),
          }
        }

        let value = bindings.get(name.as_str()).ok_or_else(|| TemplateError::Unbound {
          name: name.clone(),
          line: number,
        })?;
        rendered.push_str(value);
      }
      '}' => return Err(unbalanced()),
      other => rendered.push(other),
    }
  }

  Ok(rendered)
}
