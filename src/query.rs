//! Parsed queries ready to run.
//!
//! A [`Query`] owns its source text and its finalized [`Ast`]. It is
//! immutable after parsing, so one query can be shared across threads and
//! evaluated against many documents.

use std::fmt;

use crate::{
    ast::Ast,
    evaluator::{Evaluator, ExecResult},
    parser::{ParseError, parse_query},
    value::Value,
};

/// Upper bound, in bytes, on error messages handed to callers.
pub const ERROR_MSG_SIZE: usize = 246;

/// `Display` text of `err`, cut to at most [`ERROR_MSG_SIZE`] bytes on a
/// character boundary.
///
/// ```
/// use match_jsonpath::query::{ERROR_MSG_SIZE, bounded_message};
///
/// let long = "é".repeat(200);
/// let msg = bounded_message(&long);
/// assert!(msg.len() <= ERROR_MSG_SIZE);
/// assert!(msg.chars().all(|c| c == 'é'));
/// ```
pub fn bounded_message(err: &impl fmt::Display) -> String {
    let mut msg = err.to_string();
    if msg.len() > ERROR_MSG_SIZE {
        let mut cut = ERROR_MSG_SIZE;
        while !msg.is_char_boundary(cut) {
            cut -= 1;
        }
        msg.truncate(cut);
    }
    msg
}

#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    ast: Ast,
}

impl Query {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(Query {
            text: text.to_string(),
            ast: parse_query(text)?,
        })
    }

    /// The text the query was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_ast(&self) -> &Ast {
        &self.ast
    }

    /// Evaluates with default options (errors reported).
    pub fn evaluate(&self, document: &Value) -> ExecResult {
        Evaluator::new().evaluate(&self.ast, document)
    }

    pub fn evaluate_with(&self, evaluator: &Evaluator, document: &Value) -> ExecResult {
        evaluator.evaluate(&self.ast, document)
    }
}

/// Prints the canonical form, not the original text.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ast.fmt(f)
    }
}

impl std::str::FromStr for Query {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::parse(s)
    }
}
