use super::{DialectOptions, HeaderRange, strip_line_end};

/// Comments that are hash-based (`#`), as used by scripting languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashComments {
  pad: String,
  strip_license: bool,
}

impl HashComments {
  pub fn new(options: &DialectOptions) -> Self {
    Self {
      pad: options.pad.clone(),
      strip_license: options.strip_license,
    }
  }

  /// The header is the run of `#` lines at the top of the file, starting
  /// after a shebang line if there is one.
  pub fn find_header_range<S: AsRef<str>>(&self, lines: &[S]) -> HeaderRange {
    let mut start = 0;

    for (i, line) in lines.iter().enumerate() {
      let line = line.as_ref();

      if i == 0 && line.starts_with("#!") {
        start = 1;
        continue;
      }

      if !line.trim_end().starts_with('#') {
        return HeaderRange::new(start, i);
      }
    }

    HeaderRange::new(start, lines.len())
  }

  pub fn render_header_comment(&self, lines: &[String]) -> Vec<String> {
    lines
      .iter()
      .map(|line| {
        let text = strip_line_end(line);

        if self.strip_license && text.is_empty() {
          "#".to_string()
        } else {
          format!("#{}{}", self.pad, text)
        }
      })
      .collect()
  }
}
