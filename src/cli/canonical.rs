//! Print a query in canonical form

use super::CliError;
use crate::Query;

/// Parses `query` and returns its canonical text.
pub fn execute_canonical(query: &str) -> Result<String, CliError> {
    Ok(Query::parse(query)?.to_string())
}
