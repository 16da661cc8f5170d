//! # JSONPath Abstract Syntax Tree
//!
//! A parsed query is an arena of [`PathNode`]s addressed by [`NodeId`].
//! Each node holds one [`NodeKind`] payload plus two continuation links:
//!
//! - `next` - the step applied to whatever this step yields
//! - `shadow` - on the last node of a union branch, the continuation that
//!   all branches of that union rejoin
//!
//! ## Layout
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Binary, unary and regex operators, function names
//! - **[node]** - Node kinds and links
//! - **[arena]** - The [`Ast`] arena, finalization and ownership walk
//!
//! ## Example
//!
//! ```text
//! $.services[0,2].latency
//! ```
//!
//! parses to
//!
//! ```text
//! Root -> Key("services") -> Union[Index(0), Index(2)] -> Key("latency")
//! ```
//!
//! where `Index(0)` and `Index(2)` carry `shadow = Key("latency")` and the
//! union alone owns `Key("latency")` through `next`.
//!
//! ## Ownership
//!
//! Every reachable node has exactly one owner: its parent's payload or its
//! predecessor's `next`. `shadow` never owns. [`Ast::finalize`] checks this
//! once after parsing; after that the tree is read-only and can be shared
//! between threads.
pub mod arena;
pub mod node;
pub mod operators;
pub mod tokens;

pub use arena::{Ast, OwnershipError};
pub use node::{NodeId, NodeKind, PathNode};
pub use operators::{BinaryOp, Function, RegexOp, UnaryOp};
pub use tokens::Token;
