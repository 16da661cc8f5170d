//! CLI support for match-jsonpath
//!
//! The functions here back the `jsonpath` binary and can be called directly
//! by tools that want the same behavior without spawning a process.

mod canonical;
mod check;

pub use canonical::execute_canonical;
pub use check::{CheckOptions, CheckResult, execute_check};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Evaluation error: {}", crate::query::bounded_message(.0))]
    Eval(#[from] crate::EvalError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
