//! Interactive confirmation before a fix is applied.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Asks `question` and reads one answer line.
///
/// Only `y` or `yes` (case-insensitive) confirm. End of input counts as no.
///
/// # Errors
///
/// Returns an error if writing the question or reading the answer fails.
pub fn confirm(question: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
  write!(output, "{question} [y/N] ").context("Failed to write prompt")?;
  output.flush().context("Failed to flush prompt")?;

  let mut answer = String::new();
  let read = input.read_line(&mut answer).context("Failed to read answer")?;
  if read == 0 {
    writeln!(output).context("Failed to write prompt")?;
    return Ok(false);
  }

  Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
