use super::{DialectOptions, HeaderRange, strip_line_end};

/// Block comments delimited by a start and an end token, with ` *`
/// continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComments {
  start_comment: String,
  end_comment: String,
  pad: String,
  strip_license: bool,
}

impl BlockComments {
  /// Creates a block dialect, falling back to the language's default tokens
  /// where the options do not override them.
  pub fn new(options: &DialectOptions, default_start: &str, default_end: &str) -> Self {
    Self {
      start_comment: options
        .start_comment
        .clone()
        .unwrap_or_else(|| default_start.to_string()),
      end_comment: options.end_comment.clone().unwrap_or_else(|| default_end.to_string()),
      pad: options.pad.clone(),
      strip_license: options.strip_license,
    }
  }

  pub fn start_comment(&self) -> &str {
    &self.start_comment
  }

  pub fn end_comment(&self) -> &str {
    &self.end_comment
  }

  /// The header must open on the first line, continue with lines starting
  /// with `*`, and runs up to and including the first line ending with the
  /// end token. An unterminated or interrupted block is not a header.
  pub fn find_header_range<S: AsRef<str>>(&self, lines: &[S]) -> HeaderRange {
    for (i, line) in lines.iter().enumerate() {
      let line = line.as_ref();

      if i == 0 && !line.trim_start().starts_with(self.start_comment.as_str()) {
        break;
      }

      if line.trim_end().ends_with(self.end_comment.as_str()) {
        return HeaderRange::new(0, i + 1);
      }

      if i > 0 && !line.trim_start().starts_with('*') {
        break;
      }
    }

    HeaderRange::empty()
  }

  pub fn render_header_comment(&self, lines: &[String]) -> Vec<String> {
    let mut rendered = Vec::with_capacity(lines.len() + 2);
    rendered.push(self.start_comment.clone());

    for line in lines {
      let text = strip_line_end(line);

      if self.strip_license && text.is_empty() {
        rendered.push(" *".to_string());
      } else {
        rendered.push(format!(" *{}{}", self.pad, text));
      }
    }

    rendered.push(format!("{}{}", self.pad, self.end_comment));
    rendered
  }
}
