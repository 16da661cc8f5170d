/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Logical
    /// Logical OR (`||`)
    Or,
    /// Logical AND (`&&`)
    And,

    // Comparison
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Modulo (`%`)
    Modulo,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        }
    }

    /// Binding strength for printing: or 0, and 1, comparisons 2,
    /// additive 3, multiplicative 4.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 0,
            BinaryOp::And => 1,
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::LessThan
            | BinaryOp::GreaterThan
            | BinaryOp::LessEqual
            | BinaryOp::GreaterEqual => 2,
            BinaryOp::Add | BinaryOp::Subtract => 3,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 4,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 2
    }

    pub fn is_arithmetic(self) -> bool {
        self.precedence() >= 3
    }
}

/// Unary arithmetic operators. Logical NOT has its own node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Unary plus (`+x`)
    Plus,
    /// Unary minus (`-x`)
    Minus,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        }
    }
}

/// Regex predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexOp {
    /// The whole string must match (`match(x, "re")`)
    Match,
    /// Some substring must match (`search(x, "re")`, `x =~ "re"`)
    Search,
}

impl RegexOp {
    pub fn name(self) -> &'static str {
        match self {
            RegexOp::Match => "match",
            RegexOp::Search => "search",
        }
    }
}

/// Single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// String byte length, array length or object size of a single node
    Length,
    /// Number of nodes
    Count,
    /// Mean of the numeric members
    Avg,
    /// Smallest numeric member
    Min,
    /// Largest numeric member
    Max,
    /// Absolute value
    Abs,
    /// Round towards negative infinity
    Floor,
    /// Round towards positive infinity
    Ceiling,
    /// Number, or string parsed as a number
    Double,
    /// The node itself, if there is exactly one
    Value,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Length => "length",
            Function::Count => "count",
            Function::Avg => "avg",
            Function::Min => "min",
            Function::Max => "max",
            Function::Abs => "abs",
            Function::Floor => "floor",
            Function::Ceiling => "ceiling",
            Function::Double => "double",
            Function::Value => "value",
        }
    }

    pub fn from_name(name: &str) -> Option<Function> {
        Some(match name {
            "length" => Function::Length,
            "count" => Function::Count,
            "avg" => Function::Avg,
            "min" => Function::Min,
            "max" => Function::Max,
            "abs" => Function::Abs,
            "floor" => Function::Floor,
            "ceiling" | "ceil" => Function::Ceiling,
            "double" => Function::Double,
            "value" => Function::Value,
            _ => return None,
        })
    }
}
