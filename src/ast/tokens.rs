#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Number with a fraction and/or an exponent
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 1e3
    /// 0.5E-2
    /// ```
    Float(f64),

    /// Integer without fraction or exponent
    ///
    /// Leading zeros are rejected by the lexer; a negative number is a
    /// [`Token::Minus`] followed by the integer.
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 42
    /// ```
    Integer(i64),

    /// String literal, single- or double-quoted, escapes already decoded
    ///
    /// # Examples
    /// ```text
    /// 'key'
    /// "hello world"
    /// ```
    String(String),

    /// Member name or keyword
    ///
    /// `true`, `false`, `null` and function names are identifiers at the
    /// lexical level; the parser decides what they mean from position.
    ///
    /// # Examples
    /// ```text
    /// services
    /// _internal
    /// 屬性
    /// ```
    Identifier(String),

    // References
    /// Root node (`$`)
    Dollar,

    /// Current node inside a filter (`@`)
    At,

    // Segments
    /// Child segment (`.`)
    Dot,

    /// Descendant segment (`..`)
    DotDot,

    /// Wildcard (`*`), also multiplication
    Star,

    /// Opening bracket (`[`)
    LBracket,

    /// Closing bracket (`]`)
    RBracket,

    /// Opening parenthesis (`(`)
    LParen,

    /// Closing parenthesis (`)`)
    RParen,

    /// Selector or argument separator (`,`)
    Comma,

    /// Slice bound separator (`:`)
    Colon,

    /// Filter selector marker (`?`)
    Question,

    // Comparison
    /// Equal (`==`)
    EqEq,

    /// Not equal (`!=`)
    NotEq,

    /// Less than (`<`)
    Lt,

    /// Less than or equal (`<=`)
    LtEq,

    /// Greater than (`>`)
    Gt,

    /// Greater than or equal (`>=`)
    GtEq,

    /// Regex substring match (`=~`)
    RegexMatch,

    // Logical
    /// Logical AND (`&&`)
    AndAnd,

    /// Logical OR (`||`)
    OrOr,

    /// Logical NOT (`!`)
    Exclamation,

    // Arithmetic
    /// Addition or unary plus (`+`)
    Plus,

    /// Subtraction or unary minus (`-`)
    Minus,

    /// Division (`/`)
    Slash,

    /// Modulo (`%`)
    Percent,

    /// End of input
    Eof,
}
