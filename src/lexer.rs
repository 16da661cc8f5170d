use thiserror::Error;

use crate::ast::Token;

/// Errors raised while splitting query text into tokens.
///
/// Positions are character offsets into the query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unexpected '{ch}' at position {position} (did you mean '{expected}'?)")]
    IncompleteOperator {
        ch: char,
        position: usize,
        expected: &'static str,
    },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid escape sequence '\\{ch}' at position {position}")]
    InvalidEscape { ch: char, position: usize },

    #[error("invalid unicode escape at position {position}")]
    InvalidUnicodeEscape { position: usize },

    #[error("leading zero in number at position {position}")]
    LeadingZero { position: usize },

    #[error("malformed number '{text}' at position {position}")]
    MalformedNumber { text: String, position: usize },

    #[error("number '{text}' at position {position} is out of range")]
    NumberOutOfRange { text: String, position: usize },
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Character offset of the next unread character.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Character offset where the most recent token began.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_name_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii()
    }

    fn is_name_char(ch: char) -> bool {
        Self::is_name_start(ch) || ch.is_ascii_digit()
    }

    /// True if `name` lexes back as a single identifier.
    pub(crate) fn is_plain_name(name: &str) -> bool {
        let mut chars = name.chars();
        chars
            .next()
            .is_some_and(|c| Self::is_name_start(c) && !c.is_whitespace())
            && chars.all(|c| Self::is_name_char(c) && !c.is_whitespace())
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_name_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_hex4(&mut self) -> Result<u32, LexError> {
        let start = self.position;
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .current_char()
                .and_then(|c| c.to_digit(16))
                .ok_or(LexError::InvalidUnicodeEscape { position: start })?;
            code = code * 16 + digit;
            self.advance();
        }
        Ok(code)
    }

    /// Decodes `\uXXXX`, pairing a high surrogate with the low surrogate that
    /// must follow it. The cursor is just past the `u`.
    fn read_unicode_escape(&mut self) -> Result<char, LexError> {
        let start = self.position;
        let high = self.read_hex4()?;

        let code = if (0xD800..0xDC00).contains(&high) {
            if self.current_char() != Some('\\') || self.peek_char(1) != Some('u') {
                return Err(LexError::InvalidUnicodeEscape { position: start });
            }
            self.advance();
            self.advance();
            let low = self.read_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(LexError::InvalidUnicodeEscape { position: start });
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };

        char::from_u32(code).ok_or(LexError::InvalidUnicodeEscape { position: start })
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    let escaped = match self.current_char() {
                        Some('b') => '\u{08}',
                        Some('f') => '\u{0c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('/') => '/',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some('u') => {
                            self.advance();
                            result.push(self.read_unicode_escape()?);
                            continue;
                        }
                        Some(ch) => {
                            return Err(LexError::InvalidEscape {
                                ch,
                                position: self.position,
                            });
                        }
                        None => break,
                    };
                    result.push(escaped);
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_digits(&mut self, number: &mut String) -> usize {
        let mut count = 0;
        while let Some(ch) = self.current_char().filter(char::is_ascii_digit) {
            number.push(ch);
            self.advance();
            count += 1;
        }
        count
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();

        if self.current_char() == Some('0') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            return Err(LexError::LeadingZero { position: start });
        }
        self.read_digits(&mut number);

        let mut is_float = false;
        if self.current_char() == Some('.') && self.peek_char(1) != Some('.') {
            is_float = true;
            number.push('.');
            self.advance();
            if self.read_digits(&mut number) == 0 {
                return Err(LexError::MalformedNumber {
                    text: number,
                    position: start,
                });
            }
        }

        if let Some(e @ ('e' | 'E')) = self.current_char() {
            is_float = true;
            number.push(e);
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current_char() {
                number.push(sign);
                self.advance();
            }
            if self.read_digits(&mut number) == 0 {
                return Err(LexError::MalformedNumber {
                    text: number,
                    position: start,
                });
            }
        }

        // "1a", "2abc": a name glued to a number is never valid
        if self.current_char().is_some_and(Self::is_name_start) {
            let rest = self.read_identifier();
            number.push_str(&rest);
            return Err(LexError::MalformedNumber {
                text: number,
                position: start,
            });
        }

        if is_float {
            match number.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Token::Float(n)),
                _ => Err(LexError::NumberOutOfRange {
                    text: number,
                    position: start,
                }),
            }
        } else {
            number
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| LexError::NumberOutOfRange {
                    text: number,
                    position: start,
                })
        }
    }

    /// Consumes `first`, and `second` too if it follows; picks the token accordingly.
    fn one_or_two(&mut self, second: char, single: Token, double: Token) -> Token {
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Consumes a two-character operator whose first character is not a token on its own.
    fn pair(&mut self, second: char, token: Token, expected: &'static str) -> Result<Token, LexError> {
        let ch = self.current_char().unwrap_or(second);
        let position = self.position;
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            Ok(token)
        } else {
            Err(LexError::IncompleteOperator {
                ch,
                position,
                expected,
            })
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('$') => {
                self.advance();
                Token::Dollar
            }
            Some('@') => {
                self.advance();
                Token::At
            }
            Some('.') => self.one_or_two('.', Token::Dot, Token::DotDot),
            Some('*') => {
                self.advance();
                Token::Star
            }
            Some('[') => {
                self.advance();
                Token::LBracket
            }
            Some(']') => {
                self.advance();
                Token::RBracket
            }
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some(':') => {
                self.advance();
                Token::Colon
            }
            Some('?') => {
                self.advance();
                Token::Question
            }
            Some('+') => {
                self.advance();
                Token::Plus
            }
            Some('-') => {
                self.advance();
                Token::Minus
            }
            Some('/') => {
                self.advance();
                Token::Slash
            }
            Some('%') => {
                self.advance();
                Token::Percent
            }
            Some('=') => match self.peek_char(1) {
                Some('~') => {
                    self.advance();
                    self.advance();
                    Token::RegexMatch
                }
                _ => self.pair('=', Token::EqEq, "==")?,
            },
            Some('!') => self.one_or_two('=', Token::Exclamation, Token::NotEq),
            Some('<') => self.one_or_two('=', Token::Lt, Token::LtEq),
            Some('>') => self.one_or_two('=', Token::Gt, Token::GtEq),
            Some('&') => self.pair('&', Token::AndAnd, "&&")?,
            Some('|') => self.pair('|', Token::OrOr, "||")?,
            Some(q @ ('"' | '\'')) => Token::String(self.read_string(q)?),
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if Self::is_name_start(ch) => Token::Identifier(self.read_identifier()),
            Some(ch) => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    position: self.position,
                });
            }
        };

        Ok(token)
    }
}
