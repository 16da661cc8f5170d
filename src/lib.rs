//! JSONPath queries for turning JSON payloads into metrics.
//!
//! Query text is parsed into an arena [`Ast`], which the [`Evaluator`] runs
//! against a [`Value`] tree. Filters use three-valued logic so that a
//! missing field or a type mismatch quietly drops an item instead of
//! failing the whole query.
//!
//! ```
//! use match_jsonpath::{ExecResult, Query, convert::from_json_str};
//!
//! let query = Query::parse("$.disks[?@.used > 80].name").unwrap();
//! let doc = from_json_str(r#"{"disks":[{"name":"sda","used":91},{"name":"sdb","used":12}]}"#).unwrap();
//!
//! let ExecResult::Ok(nodes) = query.evaluate(&doc) else { panic!() };
//! assert_eq!(nodes.scalar_text().as_deref(), Some("sda"));
//! ```

pub mod ast;
pub mod convert;
pub mod evaluator;
pub mod lexer;
pub mod list;
pub mod node_list;
pub mod output;
pub mod parser;
pub mod printer;
pub mod query;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Ast, NodeId, NodeKind, Token};
pub use evaluator::{EvalContext, EvalError, EvalOptions, Evaluator, ExecResult, Truth};
pub use lexer::{LexError, Lexer};
pub use list::{AllocError, RefList};
pub use node_list::NodeList;
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser, parse_query};
pub use query::{ERROR_MSG_SIZE, Query};
pub use value::Value;
