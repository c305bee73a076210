//! # Checker Module
//!
//! Compares the header block at the top of a file with the header its
//! effective rule expects.
//!
//! The comparison walks the detected header block and the rendered header in
//! lockstep and stops at the first difference, so a file produces at most one
//! [`Violation`]. When the block is shorter than the expected header, only
//! the overlapping lines are compared.

use std::path::Path;

use tracing::{debug, trace};

use crate::dialect::{HeaderRange, Language, strip_line_end};
use crate::error::EngineError;
use crate::processor::FileIO;
use crate::rules::EffectiveRule;
use crate::violation::{FixPlan, LineEnding, Violation, ViolationKind};

/// Checks one file against its effective rule.
///
/// A rule without a header expectation yields no violations and the file is
/// not read.
///
/// # Parameters
///
/// * `path` - Filesystem path of the file
/// * `candidate` - Project-relative path such as `/src/main.py`, used for
///   classification, messages and diff labels
/// * `rule` - The file's effective rule
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the file cannot be read, or
/// [`EngineError::Template`] if the header does not render.
pub fn evaluate(path: &Path, candidate: &str, rule: &EffectiveRule) -> Result<Vec<Violation>, EngineError> {
  if !rule.expects_header() {
    trace!("No header expected for {}", candidate);
    return Ok(Vec::new());
  }

  let content = FileIO::read_full_content(path)?;
  evaluate_content(path, candidate, content, rule)
}

/// Checks already loaded file content against its effective rule.
///
/// The content becomes the snapshot a later fix is checked against.
///
/// # Errors
///
/// Returns [`EngineError::Template`] if the header does not render.
pub fn evaluate_content(
  path: &Path,
  candidate: &str,
  content: String,
  rule: &EffectiveRule,
) -> Result<Vec<Violation>, EngineError> {
  let Some(template) = rule.header_template() else {
    return Ok(Vec::new());
  };

  let expected = template.render(&rule.bindings())?;

  let language = Language::classify(Path::new(candidate), rule.language);
  let dialect = language.dialect(&rule.dialect_options());
  let header = dialect.render_header_comment(&expected);

  let lines: Vec<&str> = content.split_inclusive('\n').map(strip_line_end).collect();
  let range = dialect.find_header_range(&lines);

  trace!("{}: language {}, header range {}", candidate, language, range);

  let relevant = if range.is_empty() {
    &lines[range.start.min(lines.len())..]
  } else {
    if let Some(ref stanza) = rule.skip_on_stanza
      && lines[range.start..range.end].iter().any(|line| line.contains(stanza.as_str()))
    {
      debug!("Skipping {}: header contains stanza {:?}", candidate, stanza);
      return Ok(Vec::new());
    }
    &lines[range.start..range.end]
  };

  let Some(mismatch) = first_mismatch(relevant, &header, rule) else {
    return Ok(Vec::new());
  };

  let message = format!("\"{}\" != \"{}\"", mismatch.actual, mismatch.expected);
  debug!("{}: {}", candidate, message);

  let violation = Violation {
    line: range.start + mismatch.index,
    kind: ViolationKind::LicenseHeaderMismatch,
    message,
    fix: FixPlan {
      path: path.to_path_buf(),
      display: candidate.to_string(),
      line_ending: LineEnding::detect(&content),
      original: content,
      range,
      header,
      skip_lines: rule.skip_lines.clone(),
    },
  };

  Ok(vec![violation])
}

struct Mismatch {
  index: usize,
  actual: String,
  expected: String,
}

/// Finds the first non-skipped index where `actual` and `expected` differ,
/// comparing only as many lines as both have.
///
/// With nothing to compare at all, a non-empty expected header is reported
/// as missing at index 0.
fn first_mismatch(actual: &[&str], expected: &[String], rule: &EffectiveRule) -> Option<Mismatch> {
  if actual.is_empty() {
    return expected.first().map(|first| Mismatch {
      index: 0,
      actual: String::new(),
      expected: first.clone(),
    });
  }

  actual
    .iter()
    .zip(expected)
    .enumerate()
    .filter(|(i, _)| !rule.skip_lines.contains(*i))
    .find(|(_, (actual, expected))| **actual != expected.as_str())
    .map(|(index, (actual, expected))| Mismatch {
      index,
      actual: (*actual).to_string(),
      expected: expected.clone(),
    })
}

/// Returns the header range the checker would see for a file, for
/// diagnostics.
pub fn detect_header_range(candidate: &str, content: &str, rule: &EffectiveRule) -> HeaderRange {
  let lines: Vec<&str> = content.split_inclusive('\n').map(strip_line_end).collect();
  Language::classify(Path::new(candidate), rule.language)
    .dialect(&rule.dialect_options())
    .find_header_range(&lines)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use tempfile::TempDir;

  use super::*;
  use crate::config::GlobalSection;
  use crate::pathglob::PathPattern;
  use crate::rules::{GlobalRule, PatternRule, parse_lines, resolve};
  use crate::templates::LicenseTemplate;

  fn rule_with(template: &str, configure: impl FnOnce(&mut PatternRule)) -> EffectiveRule {
    let section = GlobalSection {
      entity: Some("Acme".to_string()),
      year: Some("2024".to_string()),
      ..GlobalSection::default()
    };
    let global = GlobalRule::verify(&section, 2024).expect("valid global section");

    let mut pattern = PatternRule::new(PathPattern::compile("**").expect("pattern"));
    pattern.license_header = Some(Arc::new(LicenseTemplate::from_text(template)));
    configure(&mut pattern);

    resolve(&global, [&pattern])
  }

  fn acme_rule() -> EffectiveRule {
    rule_with("Copyright {year} {entity}", |_| {})
  }

  fn check(display: &str, content: &str, rule: &EffectiveRule) -> Vec<Violation> {
    evaluate_content(Path::new(display), display, content.to_string(), rule).expect("evaluation should succeed")
  }

  #[test]
  fn test_outdated_year_is_reported_at_line_zero() {
    let violations = check("/a.py", "# Copyright 2023 Acme\nimport os\n", &acme_rule());

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 0);
    assert_eq!(
      violations[0].message,
      "\"# Copyright 2023 Acme\" != \"# Copyright 2024 Acme\""
    );
    assert_eq!(violations[0].fix_description(), "Replace Header");
  }

  #[test]
  fn test_matching_header_is_compliant() {
    assert!(check("/a.py", "# Copyright 2024 Acme\nimport os\n", &acme_rule()).is_empty());
  }

  #[test]
  fn test_missing_header_compares_first_line() {
    let violations = check("/a.py", "import os\n", &acme_rule());

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 0);
    assert_eq!(violations[0].message, "\"import os\" != \"# Copyright 2024 Acme\"");
    assert_eq!(violations[0].fix_description(), "Prepend Header");
  }

  #[test]
  fn test_empty_file_reports_empty_actual() {
    let violations = check("/a.py", "", &acme_rule());

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "\"\" != \"# Copyright 2024 Acme\"");
  }

  #[test]
  fn test_shebang_only_file_reports_after_shebang() {
    let violations = check("/run.sh", "#!/bin/sh\n", &acme_rule());

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 1);
    assert_eq!(violations[0].message, "\"\" != \"# Copyright 2024 Acme\"");
  }

  #[test]
  fn test_shorter_header_only_compares_overlap() {
    let rule = rule_with("Copyright {year} {entity}\n\nAll rights reserved.", |_| {});
    assert!(check("/a.py", "# Copyright 2024 Acme\nimport os\n", &rule).is_empty());
  }

  #[test]
  fn test_mismatch_line_is_absolute() {
    let rule = rule_with("Copyright {year} {entity}\nAll rights reserved.", |_| {});
    let violations = check("/run.sh", "#!/bin/sh\n# Copyright 2024 Acme\n# Some rights\necho\n", &rule);

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 2);
  }

  #[test]
  fn test_skip_lines_exempt_indices() {
    let rule = rule_with("Copyright {year} {entity}\nAll rights reserved.", |pattern| {
      pattern.skip_lines = Some(parse_lines("0").expect("valid expression"));
    });

    assert!(check("/a.py", "# Copyright 1999 Other\n# All rights reserved.\n", &rule).is_empty());
    assert_eq!(check("/a.py", "# Copyright 1999 Other\n# Nope\n", &rule).len(), 1);
  }

  #[test]
  fn test_stanza_exempts_file() {
    let rule = rule_with("Copyright {year} {entity}", |pattern| {
      pattern.skip_on_stanza = Some("@generated".to_string());
    });

    assert!(check("/a.py", "# @generated by protoc\nimport os\n", &rule).is_empty());
    assert_eq!(check("/a.py", "import os  # @generated\n", &rule).len(), 1);
  }

  #[test]
  fn test_block_dialect_header() {
    let rule = rule_with("Copyright {year} {entity}", |_| {});

    assert!(check("/Main.java", "/**\n * Copyright 2024 Acme\n **/\nclass Main {}\n", &rule).is_empty());

    let violations = check("/Main.java", "/**\n * Copyright 2020 Acme\n **/\nclass Main {}\n", &rule);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 1);
  }

  #[test]
  fn test_block_dialect_fix_keeps_code_after_doc_comment() {
    let rule = rule_with("Copyright {year} {entity}", |_| {});
    let content = "/**\n * Class docs\n */\npublic class A {\n  /** field **/\n  int x;\n}\n";

    let violations = check("/A.java", content, &rule);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].fix_description(), "Prepend Header");
    assert_eq!(
      violations[0].fix.fixed_content(),
      format!("/**\n * Copyright 2024 Acme\n **/\n{content}")
    );
  }

  #[test]
  fn test_language_override() {
    let rule = rule_with("Copyright {year} {entity}", |pattern| {
      pattern.language = Some(Language::Hash);
    });

    assert!(check("/Makefile", "# Copyright 2024 Acme\nall:\n", &rule).is_empty());
  }

  #[test]
  fn test_generic_file_compares_whole_file() {
    let rule = acme_rule();

    assert!(check("/LICENSE.txt", "Copyright 2024 Acme\nMore text\n", &rule).is_empty());
    assert_eq!(check("/NOTICE", "Something else\n", &rule).len(), 1);
  }

  #[test]
  fn test_crlf_file_is_compared_without_terminators() {
    assert!(check("/a.py", "# Copyright 2024 Acme\r\nimport os\r\n", &acme_rule()).is_empty());
  }

  #[test]
  fn test_evaluate_is_pure() {
    let rule = acme_rule();
    let content = "# Copyright 2023 Acme\nimport os\n";

    assert_eq!(check("/a.py", content, &rule), check("/a.py", content, &rule));
  }

  #[test]
  fn test_fix_then_recheck_is_clean() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("a.py");
    std::fs::write(&path, "# Copyright 2023 Acme\nimport os\nprint(os.name)\n").expect("write file");

    let rule = acme_rule();
    let violations = evaluate(&path, "/a.py", &rule).expect("evaluate");
    assert_eq!(violations.len(), 1);

    violations[0].fix.apply().expect("fix should apply");
    assert_eq!(
      std::fs::read_to_string(&path).expect("read"),
      "# Copyright 2024 Acme\nimport os\nprint(os.name)\n"
    );
    assert!(evaluate(&path, "/a.py", &rule).expect("evaluate").is_empty());
  }

  #[test]
  fn test_unchecked_rule_does_not_read_file() {
    let section = GlobalSection {
      entity: Some("Acme".to_string()),
      year: Some("2024".to_string()),
      ..GlobalSection::default()
    };
    let global = GlobalRule::verify(&section, 2024).expect("valid global section");
    let rule = resolve(&global, Vec::<&PatternRule>::new());

    let violations = evaluate(Path::new("/nonexistent/a.py"), "/a.py", &rule).expect("nothing to check");
    assert!(violations.is_empty());
  }

  #[test]
  fn test_unreadable_file_is_an_io_error() {
    let err = evaluate(Path::new("/nonexistent/a.py"), "/a.py", &acme_rule()).expect_err("should fail");
    assert!(matches!(err, EngineError::Io { .. }));
  }

  #[test]
  fn test_detect_header_range() {
    let range = detect_header_range("/a.py", "#!/usr/bin/env python\n# one\n# two\ncode\n", &acme_rule());
    assert_eq!(range, HeaderRange::new(1, 3));
  }
}
