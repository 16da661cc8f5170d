use regex::Regex;
use smallvec::{SmallVec, smallvec};

use crate::{
    ast::{BinaryOp, Function, RegexOp, UnaryOp},
    list::RefList,
};

/// Stable index of a node inside its [`Ast`](crate::ast::Ast) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One step of a query.
///
/// `next` is the step applied to whatever this one yields. `shadow` is set
/// only on the tail of a union branch and points at the continuation all
/// branches of that union rejoin; the union itself owns that continuation
/// through its own `next`.
#[derive(Debug, Clone)]
pub struct PathNode {
    pub kind: NodeKind,
    pub next: Option<NodeId>,
    pub shadow: Option<NodeId>,
}

impl PathNode {
    pub fn new(kind: NodeKind) -> Self {
        PathNode {
            kind,
            next: None,
            shadow: None,
        }
    }
}

/// What a step does. Each variant carries only its own payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    // Literals
    /// `null`
    Null,

    /// String literal
    ///
    /// # Example
    /// ```text
    /// "up"
    /// ```
    String(String),

    /// Integer literal, sign folded in
    ///
    /// # Example
    /// ```text
    /// 42
    /// -1
    /// ```
    Integer(i64),

    /// Float literal
    ///
    /// # Example
    /// ```text
    /// 0.5
    /// -1.2e3
    /// ```
    Float(f64),

    /// `true` or `false`
    Bool(bool),

    // Structural steps
    /// Document root (`$`)
    Root,

    /// Item under test in the nearest enclosing filter (`@`)
    Current,

    /// Object member by name
    ///
    /// # Example
    /// ```text
    /// $.services
    /// $['service name']
    /// ```
    Key(String),

    /// Every direct child (`.*`, `[*]`)
    Wildcard,

    /// Array element, negative counts from the end
    ///
    /// # Example
    /// ```text
    /// $[0]
    /// $[-1]
    /// ```
    Index(i64),

    /// Array slice; absent bounds default by step direction, absent step is 1
    ///
    /// # Example
    /// ```text
    /// $[1:3]
    /// $[::-1]
    /// ```
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: Option<i64>,
    },

    /// Several selectors over the same input (`[a,b]`)
    Union(RefList<NodeId>),

    /// Selectors applied to the input and all its descendants (`..`)
    DescendantUnion(RefList<NodeId>),

    // Operators
    /// Logical, comparison and arithmetic operators
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },

    /// Logical NOT (`!x`)
    Not(NodeId),

    /// Unary plus or minus on a non-literal
    Unary { op: UnaryOp, arg: NodeId },

    /// `match(arg, "re")` / `search(arg, "re")` / `arg =~ "re"`
    Regex {
        op: RegexOp,
        arg: NodeId,
        pattern: String,
        regex: Regex,
    },

    /// Filter selector (`[?pred]`)
    Filter(NodeId),

    /// Function call (`length(@.items)`)
    Call { func: Function, arg: NodeId },
}

impl NodeKind {
    /// Printing precedence: binary operators by operator, unary plus/minus 5,
    /// everything else 6.
    pub fn precedence(&self) -> u8 {
        match self {
            NodeKind::Binary { op, .. } => op.precedence(),
            NodeKind::Unary { .. } => 5,
            NodeKind::Integer(n) if *n < 0 => 5,
            NodeKind::Float(n) if n.is_sign_negative() => 5,
            _ => 6,
        }
    }

    /// Nodes produce a three-valued result rather than document values.
    pub fn is_boolean(&self) -> bool {
        match self {
            NodeKind::Binary { op, .. } => !op.is_arithmetic(),
            NodeKind::Not(_) | NodeKind::Regex { .. } => true,
            _ => false,
        }
    }

    /// Links this node owns through its payload, in evaluation order.
    pub fn owned_links(&self) -> SmallVec<[NodeId; 2]> {
        match self {
            NodeKind::Union(branches) | NodeKind::DescendantUnion(branches) => {
                branches.iter().copied().collect()
            }
            NodeKind::Binary { left, right, .. } => smallvec![*left, *right],
            NodeKind::Not(arg)
            | NodeKind::Unary { arg, .. }
            | NodeKind::Regex { arg, .. }
            | NodeKind::Filter(arg)
            | NodeKind::Call { arg, .. } => smallvec![*arg],
            _ => SmallVec::new(),
        }
    }
}
