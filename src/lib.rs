//! # headercheck
//!
//! A tool that verifies every source file in a project starts with the license header its policy expects.
//!
//! The expected header is rendered from a license template in the comment syntax of each file, compared line by line
//! against the header actually present, and every mismatch is reported as a violation carrying a fix that rewrites the
//! header.
//!
//! ## Features
//!
//! * Layered TOML configuration with policy presets
//! * Per-path rules selected by path patterns, folded in declaration order
//! * Hash (`#`), block (`/* */`) and plain comment dialects chosen by file type
//! * Skip lines and stanza markers for headers that are partly generated
//! * Unified diffs of every fix, and atomic rewrites that refuse to touch files changed since the check
//! * Ignore patterns and a gitignore-style `.licenseignore`
//! * JSON and CSV reports
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use headercheck::config::load_config;
//! use headercheck::processor::{Processor, ProcessorConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = Path::new(".");
//!     let config = load_config(None, root, false)?;
//!     let processor = Processor::new(ProcessorConfig::from_config(&config, root)?);
//!
//!     let run = processor.check()?;
//!     for violation in &run.violations {
//!         println!("{violation}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`checker`] - Compares a file's header with the expected one
//! * [`rules`] - Resolves the effective rule of a file
//! * [`processor`] - Walks a project and checks every file
//! * [`fixer`] - Renders and applies header fixes
//! * [`logging`] - Logging utilities for verbose output
//!
//! [`checker`]: crate::checker
//! [`rules`]: crate::rules
//! [`processor`]: crate::processor
//! [`fixer`]: crate::fixer
//! [`logging`]: crate::logging

pub mod checker;
pub mod cli;
pub mod config;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod fixer;
pub mod ignore;
pub mod licenses;
pub mod logging;
pub mod output;
pub mod pathglob;
pub mod policies;
pub mod processor;
pub mod report;
pub mod rules;
pub mod templates;
pub mod violation;
