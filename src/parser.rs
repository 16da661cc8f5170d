use std::mem;

use regex::Regex;
use thiserror::Error;

use crate::{
    ast::{Ast, BinaryOp, Function, NodeId, NodeKind, OwnershipError, RegexOp, Token, UnaryOp},
    lexer::{LexError, Lexer},
    list::{AllocError, RefList},
};

/// Errors raised while turning query text into an [`Ast`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found:?} at position {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: Token,
        position: usize,
    },

    #[error("'@' is only valid inside a filter")]
    CurrentOutsideFilter,

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("unicode character classes are not supported in pattern \"{0}\"")]
    UnsupportedRegexClass(String),

    #[error("invalid regular expression \"{pattern}\": {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error(transparent)]
    Allocation(#[from] AllocError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),
}

/// Parses a complete query.
///
/// # Examples
///
/// ```
/// use match_jsonpath::parser::parse_query;
///
/// assert!(parse_query("$.services[?@.up == true].name").is_ok());
/// assert!(parse_query("$[?@.a==00]").is_err());
/// ```
pub fn parse_query(text: &str) -> Result<Ast, ParseError> {
    let result = Parser::new(Lexer::new(text)).and_then(Parser::parse);
    if let Err(e) = &result {
        log::debug!("failed to parse {text:?}: {e}");
    }
    result
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    token_position: usize,
    ast: Ast,
    filter_depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            token_position: lexer.token_start(),
            lexer,
            current_token,
            ast: Ast::new(),
            filter_depth: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.token_position = self.lexer.token_start();
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn unexpected<T>(&self, expected: &'static str) -> Result<T, ParseError> {
        Err(ParseError::UnexpectedToken {
            expected,
            found: self.current_token.clone(),
            position: self.token_position,
        })
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return self.unexpected(what);
        }
        self.advance()
    }

    fn expect_string(&mut self, what: &'static str) -> Result<String, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(s) => {
                self.advance()?;
                Ok(s)
            }
            other => {
                self.current_token = other;
                self.unexpected(what)
            }
        }
    }

    fn node(&mut self, kind: NodeKind) -> NodeId {
        self.ast.push(kind)
    }

    fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.node(NodeKind::Binary { op, left, right })
    }

    /// Parses the whole input as one expression and finalizes the tree.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        let root = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return self.unexpected("end of query");
        }
        self.ast.finalize(root)?;
        Ok(self.ast)
    }

    pub fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::OrOr) {
            self.advance()?;
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_comparison()?;

        while self.check(&Token::AndAnd) {
            self.advance()?;
            let right = self.parse_comparison()?;
            left = self.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<NodeId, ParseError> {
        let left = self.parse_additive()?;

        let op = match &self.current_token {
            Token::EqEq => BinaryOp::Equal,
            Token::NotEq => BinaryOp::NotEqual,
            Token::Lt => BinaryOp::LessThan,
            Token::Gt => BinaryOp::GreaterThan,
            Token::LtEq => BinaryOp::LessEqual,
            Token::GtEq => BinaryOp::GreaterEqual,
            Token::RegexMatch => {
                self.advance()?;
                let pattern = self.expect_string("regex pattern string after '=~'")?;
                return self.regex(RegexOp::Search, left, pattern);
            }
            _ => return Ok(left),
        };

        self.advance()?;
        let right = self.parse_additive()?;
        Ok(self.binary(op, left, right))
    }

    fn parse_additive(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current_token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Subtract,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current_token {
                Token::Star => BinaryOp::Multiply,
                Token::Slash => BinaryOp::Divide,
                Token::Percent => BinaryOp::Modulo,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        match &self.current_token {
            Token::Minus => {
                self.advance()?;
                let operand = self.parse_unary()?;

                // A minus in front of a numeric literal is part of the literal
                let folded = match self.ast.kind(operand) {
                    NodeKind::Integer(n) => n.checked_neg().map(NodeKind::Integer),
                    NodeKind::Float(n) => Some(NodeKind::Float(-n)),
                    _ => None,
                };
                match folded {
                    Some(kind) => {
                        self.ast.replace_kind(operand, kind);
                        Ok(operand)
                    }
                    None => Ok(self.node(NodeKind::Unary {
                        op: UnaryOp::Minus,
                        arg: operand,
                    })),
                }
            }
            Token::Plus => {
                self.advance()?;
                let arg = self.parse_unary()?;
                Ok(self.node(NodeKind::Unary {
                    op: UnaryOp::Plus,
                    arg,
                }))
            }
            Token::Exclamation => {
                self.advance()?;
                let arg = self.parse_unary()?;
                Ok(self.node(NodeKind::Not(arg)))
            }
            _ => self.parse_primary(),
        }
    }

    /// Literals, paths, function calls and parenthesized expressions.
    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Integer(n) => {
                self.advance()?;
                Ok(self.node(NodeKind::Integer(n)))
            }
            Token::Float(n) => {
                self.advance()?;
                Ok(self.node(NodeKind::Float(n)))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(self.node(NodeKind::String(s)))
            }
            Token::Dollar => {
                self.advance()?;
                let root = self.node(NodeKind::Root);
                self.parse_segments(root)?;
                Ok(root)
            }
            Token::At => {
                if self.filter_depth == 0 {
                    return Err(ParseError::CurrentOutsideFilter);
                }
                self.advance()?;
                let current = self.node(NodeKind::Current);
                self.parse_segments(current)?;
                Ok(current)
            }
            Token::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen, "')'")?;
                Ok(expr)
            }
            Token::Identifier(name) => {
                let literal = match name.as_str() {
                    "true" => Some(NodeKind::Bool(true)),
                    "false" => Some(NodeKind::Bool(false)),
                    "null" => Some(NodeKind::Null),
                    _ => None,
                };
                if let Some(kind) = literal {
                    self.advance()?;
                    return Ok(self.node(kind));
                }

                let position = self.token_position;
                self.advance()?;
                if !self.check(&Token::LParen) {
                    self.current_token = Token::Identifier(name);
                    self.token_position = position;
                    return self.unexpected("expression (bare names are not values)");
                }
                self.advance()?;
                self.parse_call(&name)
            }
            token => {
                self.current_token = token;
                self.unexpected("expression")
            }
        }
    }

    /// Arguments of `name(`...`)`; the opening parenthesis is already consumed.
    fn parse_call(&mut self, name: &str) -> Result<NodeId, ParseError> {
        let regex_op = match name {
            "match" => Some(RegexOp::Match),
            "search" => Some(RegexOp::Search),
            _ => None,
        };

        if let Some(op) = regex_op {
            let arg = self.parse_expression()?;
            self.expect(Token::Comma, "',' between regex argument and pattern")?;
            let pattern = self.expect_string("regex pattern string")?;
            self.expect(Token::RParen, "')'")?;
            return self.regex(op, arg, pattern);
        }

        let func =
            Function::from_name(name).ok_or_else(|| ParseError::UnknownFunction(name.to_string()))?;
        let arg = self.parse_expression()?;
        self.expect(Token::RParen, "')'")?;
        Ok(self.node(NodeKind::Call { func, arg }))
    }

    fn regex(&mut self, op: RegexOp, arg: NodeId, pattern: String) -> Result<NodeId, ParseError> {
        let regex = compile_regex(op, &pattern)?;
        Ok(self.node(NodeKind::Regex {
            op,
            arg,
            pattern,
            regex,
        }))
    }

    /// Child and descendant segments following `$` or `@`.
    fn parse_segments(&mut self, head: NodeId) -> Result<(), ParseError> {
        let mut tail = head;

        loop {
            let step = match &self.current_token {
                Token::Dot => {
                    self.advance()?;
                    match mem::replace(&mut self.current_token, Token::Eof) {
                        Token::Identifier(name) => {
                            self.advance()?;
                            self.node(NodeKind::Key(name))
                        }
                        Token::Star => {
                            self.advance()?;
                            self.node(NodeKind::Wildcard)
                        }
                        token => {
                            self.current_token = token;
                            return self.unexpected("member name or '*' after '.'");
                        }
                    }
                }
                Token::DotDot => {
                    self.advance()?;
                    let branches = match mem::replace(&mut self.current_token, Token::Eof) {
                        Token::Identifier(name) => {
                            self.advance()?;
                            let key = self.node(NodeKind::Key(name));
                            single(key)?
                        }
                        Token::Star => {
                            self.advance()?;
                            let wildcard = self.node(NodeKind::Wildcard);
                            single(wildcard)?
                        }
                        Token::LBracket => {
                            self.advance()?;
                            self.parse_selectors()?
                        }
                        token => {
                            self.current_token = token;
                            return self.unexpected("member name, '*' or '[' after '..'");
                        }
                    };
                    self.node(NodeKind::DescendantUnion(branches))
                }
                Token::LBracket => {
                    self.advance()?;
                    let selectors = self.parse_selectors()?;
                    // A lone selector needs no union around it
                    if selectors.len() == 1
                        && let Some(&only) = selectors.first()
                    {
                        only
                    } else {
                        self.node(NodeKind::Union(selectors))
                    }
                }
                _ => break,
            };

            self.ast.set_next(tail, step);
            tail = step;
        }
        Ok(())
    }

    /// Comma-separated selectors up to and including the closing `]`.
    fn parse_selectors(&mut self) -> Result<RefList<NodeId>, ParseError> {
        let mut selectors = RefList::new();

        loop {
            let selector = self.parse_selector()?;
            selectors.push(selector)?;

            if self.check(&Token::Comma) {
                self.advance()?;
            } else {
                self.expect(Token::RBracket, "',' or ']'")?;
                return Ok(selectors);
            }
        }
    }

    fn parse_selector(&mut self) -> Result<NodeId, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(name) => {
                self.advance()?;
                Ok(self.node(NodeKind::Key(name)))
            }
            Token::Star => {
                self.advance()?;
                Ok(self.node(NodeKind::Wildcard))
            }
            Token::Question => {
                self.advance()?;
                self.filter_depth += 1;
                let predicate = self.parse_expression();
                self.filter_depth -= 1;
                let predicate = predicate?;
                Ok(self.node(NodeKind::Filter(predicate)))
            }
            token @ (Token::Integer(_) | Token::Minus | Token::Colon) => {
                self.current_token = token;
                self.parse_index_or_slice()
            }
            token => {
                self.current_token = token;
                self.unexpected("selector")
            }
        }
    }

    fn parse_signed_integer(&mut self) -> Result<Option<i64>, ParseError> {
        let negative = self.check(&Token::Minus);
        if negative {
            self.advance()?;
        }

        match self.current_token {
            Token::Integer(n) => {
                self.advance()?;
                Ok(Some(if negative { -n } else { n }))
            }
            _ if negative => self.unexpected("integer after '-'"),
            _ => Ok(None),
        }
    }

    fn parse_index_or_slice(&mut self) -> Result<NodeId, ParseError> {
        let start = self.parse_signed_integer()?;

        if !self.check(&Token::Colon) {
            return match start {
                Some(index) => Ok(self.node(NodeKind::Index(index))),
                None => self.unexpected("index or slice"),
            };
        }
        self.advance()?;
        let end = self.parse_signed_integer()?;

        let step = if self.check(&Token::Colon) {
            self.advance()?;
            self.parse_signed_integer()?
        } else {
            None
        };

        Ok(self.node(NodeKind::Slice { start, end, step }))
    }
}

fn single(id: NodeId) -> Result<RefList<NodeId>, AllocError> {
    let mut list = RefList::with_capacity(1);
    list.push(id)?;
    Ok(list)
}

/// Compiles a `match` pattern anchored at both ends, a `search` pattern as is.
fn compile_regex(op: RegexOp, pattern: &str) -> Result<Regex, ParseError> {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '\\' && matches!(chars.next(), Some('p' | 'P')) {
            return Err(ParseError::UnsupportedRegexClass(pattern.to_string()));
        }
    }

    let source = match op {
        RegexOp::Match => format!(r"\A(?:{pattern})\z"),
        RegexOp::Search => pattern.to_string(),
    };
    Regex::new(&source).map_err(|e| ParseError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
