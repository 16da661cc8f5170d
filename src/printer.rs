//! Canonical query text.
//!
//! [`Ast`] implements `Display` by printing the query back in a form this
//! crate's parser accepts. Surface details are normalized (quotes, spacing,
//! redundant parentheses) but the meaning is kept: parsing the printed text
//! yields a query that selects the same nodes.
//!
//! Operands are parenthesized when their precedence is not higher than the
//! operator they sit under:
//!
//! | precedence | operators |
//! |---|---|
//! | 0 | `\|\|` |
//! | 1 | `&&` |
//! | 2 | `==` `!=` `<` `<=` `>` `>=` |
//! | 3 | `+` `-` |
//! | 4 | `*` `/` `%` |
//! | 5 | unary `+` `-` |
//! | 6 | everything else |

use std::fmt::{self, Write};

use crate::{
    ast::{Ast, NodeId, NodeKind},
    lexer::Lexer,
    output::escape_json_string,
};

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => Printer { ast: self, out: f }.expr(root, None),
            None => Ok(()),
        }
    }
}

struct Printer<'a, 'f> {
    ast: &'a Ast,
    out: &'a mut fmt::Formatter<'f>,
}

impl Printer<'_, '_> {
    /// Prints `id` and its `next` chain, in parentheses if it binds no
    /// tighter than `parent`.
    fn expr(&mut self, id: NodeId, parent: Option<u8>) -> fmt::Result {
        let wrap = parent.is_some_and(|p| self.ast.kind(id).precedence() <= p);
        if wrap {
            self.out.write_char('(')?;
        }
        self.head(id)?;
        self.steps(self.ast.next(id))?;
        if wrap {
            self.out.write_char(')')?;
        }
        Ok(())
    }

    fn steps(&mut self, mut cur: Option<NodeId>) -> fmt::Result {
        while let Some(id) = cur {
            self.step(id)?;
            cur = self.ast.next(id);
        }
        Ok(())
    }

    /// The first node of an expression.
    fn head(&mut self, id: NodeId) -> fmt::Result {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Null => self.out.write_str("null"),
            NodeKind::Bool(b) => write!(self.out, "{b}"),
            NodeKind::Integer(n) => write!(self.out, "{n}"),
            // Debug keeps a fraction or exponent, so the text lexes as a float again
            NodeKind::Float(n) => write!(self.out, "{n:?}"),
            NodeKind::String(s) => self.quoted(s),
            NodeKind::Root => self.out.write_char('$'),
            NodeKind::Current => self.out.write_char('@'),
            NodeKind::Binary { op, left, right } => {
                let prec = op.precedence();
                self.expr(*left, Some(prec))?;
                write!(self.out, " {} ", op.symbol())?;
                self.expr(*right, Some(prec))
            }
            NodeKind::Unary { op, arg } => {
                self.out.write_str(op.symbol())?;
                self.expr(*arg, Some(5))
            }
            NodeKind::Not(arg) => {
                self.out.write_char('!')?;
                self.expr(*arg, Some(6))
            }
            NodeKind::Regex {
                op, arg, pattern, ..
            } => {
                write!(self.out, "{}(", op.name())?;
                self.expr(*arg, None)?;
                self.out.write_str(", ")?;
                self.quoted(pattern)?;
                self.out.write_char(')')
            }
            NodeKind::Call { func, arg } => {
                write!(self.out, "{}(", func.name())?;
                self.expr(*arg, None)?;
                self.out.write_char(')')
            }
            // Selector kinds only start a chain inside a union branch
            _ => self.selector(id),
        }
    }

    /// A segment following a path head.
    fn step(&mut self, id: NodeId) -> fmt::Result {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Key(name) if Lexer::is_plain_name(name) => write!(self.out, ".{name}"),
            NodeKind::Wildcard => self.out.write_str(".*"),
            NodeKind::Union(branches) => {
                self.out.write_char('[')?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        self.out.write_char(',')?;
                    }
                    self.branch(*branch)?;
                }
                self.out.write_char(']')
            }
            NodeKind::DescendantUnion(branches) => {
                self.out.write_str("..")?;
                let only = (branches.len() == 1).then(|| branches[0]);
                match only.map(|b| (ast.kind(b), ast.next(b))) {
                    Some((NodeKind::Key(name), None)) if Lexer::is_plain_name(name) => {
                        self.out.write_str(name)
                    }
                    Some((NodeKind::Wildcard, None)) => self.out.write_char('*'),
                    _ => {
                        self.out.write_char('[')?;
                        for (i, branch) in branches.iter().enumerate() {
                            if i > 0 {
                                self.out.write_char(',')?;
                            }
                            self.branch(*branch)?;
                        }
                        self.out.write_char(']')
                    }
                }
            }
            _ => {
                self.out.write_char('[')?;
                self.selector(id)?;
                self.out.write_char(']')
            }
        }
    }

    fn branch(&mut self, id: NodeId) -> fmt::Result {
        self.selector(id)?;
        self.steps(self.ast.next(id))
    }

    /// The text of one selector between brackets.
    fn selector(&mut self, id: NodeId) -> fmt::Result {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Key(name) => self.quoted(name),
            NodeKind::Wildcard => self.out.write_char('*'),
            NodeKind::Index(i) => write!(self.out, "{i}"),
            NodeKind::Slice { start, end, step } => {
                if let Some(start) = start {
                    write!(self.out, "{start}")?;
                }
                self.out.write_char(':')?;
                if let Some(end) = end {
                    write!(self.out, "{end}")?;
                }
                if let Some(step) = step {
                    write!(self.out, ":{step}")?;
                }
                Ok(())
            }
            NodeKind::Filter(predicate) => {
                self.out.write_char('?')?;
                self.expr(*predicate, None)
            }
            // Never a direct union branch when built by the parser
            NodeKind::Union(_) | NodeKind::DescendantUnion(_) => self.step(id),
            _ => self.head(id),
        }
    }

    fn quoted(&mut self, s: &str) -> fmt::Result {
        write!(self.out, "\"{}\"", escape_json_string(s))
    }
}
