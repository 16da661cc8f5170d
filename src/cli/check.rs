//! Run a query against JSON input

use super::CliError;
use crate::{
    Evaluator, ExecResult, Query,
    convert::from_json_str,
    output::JsonPrinter,
};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to execute
    pub query: String,
    /// JSON input string
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
    /// Report evaluation errors as "not found"
    pub silent: bool,
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Selected nodes, rendered as a JSON array
    Success(String),
    /// The query selected nothing
    NotFound,
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let query = Query::parse(&options.query)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let document = from_json_str(json_str)?;

    let evaluator = Evaluator::new().throw_errors(!options.silent);
    match query.evaluate_with(&evaluator, &document) {
        ExecResult::Ok(nodes) => Ok(CheckResult::Success(
            JsonPrinter::new(options.pretty).print_nodes(&nodes),
        )),
        ExecResult::NotFound => Ok(CheckResult::NotFound),
        ExecResult::Error(e) => Err(CliError::Eval(e)),
    }
}
