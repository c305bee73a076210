//! # headercheck
//!
//! A tool that verifies source files start with the expected license header.

use std::process::ExitCode;

use anyhow::Result;
use headercheck::cli::{Cli, run_check};

fn main() -> Result<ExitCode> {
  let cli = Cli::parse_args();

  run_check(cli.check_args)
}
