// tests/lexer_tests.rs

use match_jsonpath::ast::Token;
use match_jsonpath::lexer::{LexError, Lexer};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            return out;
        }
        out.push(token);
    }
}

fn lex_error(input: &str) -> LexError {
    let mut lexer = Lexer::new(input);
    loop {
        match lexer.next_token() {
            Ok(Token::Eof) => panic!("{input:?} lexed without error"),
            Ok(_) => {}
            Err(e) => return e,
        }
    }
}

// ============================================================================
// Punctuation and operators
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("$", Token::Dollar),
        ("@", Token::At),
        (".", Token::Dot),
        ("*", Token::Star),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("(", Token::LParen),
        (")", Token::RParen),
        (",", Token::Comma),
        (":", Token::Colon),
        ("?", Token::Question),
        ("!", Token::Exclamation),
        ("+", Token::Plus),
        ("-", Token::Minus),
        ("/", Token::Slash),
        ("%", Token::Percent),
        ("<", Token::Lt),
        (">", Token::Gt),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tokens(input), vec![expected], "input: {input}");
    }
}

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("..", Token::DotDot),
        ("==", Token::EqEq),
        ("!=", Token::NotEq),
        ("<=", Token::LtEq),
        (">=", Token::GtEq),
        ("=~", Token::RegexMatch),
        ("&&", Token::AndAnd),
        ("||", Token::OrOr),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tokens(input), vec![expected], "input: {input}");
    }
}

#[test]
fn test_path_tokens() {
    assert_eq!(
        tokens("$..book[?@.price < 10]"),
        vec![
            Token::Dollar,
            Token::DotDot,
            Token::Identifier("book".to_string()),
            Token::LBracket,
            Token::Question,
            Token::At,
            Token::Dot,
            Token::Identifier("price".to_string()),
            Token::Lt,
            Token::Integer(10),
            Token::RBracket,
        ]
    );
}

#[test]
fn test_lone_operator_chars_are_errors() {
    for input in ["=", "&", "|", "a = b"] {
        assert!(
            matches!(lex_error(input), LexError::IncompleteOperator { .. }),
            "input: {input}"
        );
    }
}

#[test]
fn test_triple_equals_is_rejected() {
    assert!(matches!(lex_error("==="), LexError::IncompleteOperator { .. }));
}

#[test]
fn test_unknown_characters() {
    for input in ["{", "^", "#", "~"] {
        assert!(
            matches!(lex_error(input), LexError::UnexpectedChar { .. }),
            "input: {input}"
        );
    }
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_integers_and_floats() {
    assert_eq!(tokens("0"), vec![Token::Integer(0)]);
    assert_eq!(tokens("42"), vec![Token::Integer(42)]);
    assert_eq!(tokens("3.25"), vec![Token::Float(3.25)]);
    assert_eq!(tokens("1e3"), vec![Token::Float(1000.0)]);
    assert_eq!(tokens("2.5E-1"), vec![Token::Float(0.25)]);
    assert_eq!(tokens("0.5"), vec![Token::Float(0.5)]);
}

#[test]
fn test_negative_number_is_two_tokens() {
    assert_eq!(tokens("-7"), vec![Token::Minus, Token::Integer(7)]);
}

#[test]
fn test_leading_zero() {
    assert!(matches!(lex_error("00"), LexError::LeadingZero { position: 0 }));
    assert!(matches!(lex_error("010"), LexError::LeadingZero { .. }));
}

#[test]
fn test_malformed_numbers() {
    for input in ["1.", "1e", "1e+", "2abc"] {
        assert!(
            matches!(lex_error(input), LexError::MalformedNumber { .. }),
            "input: {input}"
        );
    }
}

#[test]
fn test_number_out_of_range() {
    assert!(matches!(
        lex_error("99999999999999999999"),
        LexError::NumberOutOfRange { .. }
    ));
}

#[test]
fn test_slice_dots_are_not_fractions() {
    assert_eq!(tokens("1..a"), vec![
        Token::Integer(1),
        Token::DotDot,
        Token::Identifier("a".to_string()),
    ]);
}

// ============================================================================
// Strings and identifiers
// ============================================================================

#[test]
fn test_quoted_strings() {
    assert_eq!(tokens(r#""key""#), vec![Token::String("key".to_string())]);
    assert_eq!(tokens("'key'"), vec![Token::String("key".to_string())]);
    assert_eq!(tokens(r#"'it"s'"#), vec![Token::String("it\"s".to_string())]);
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        tokens(r#""a\nb\t\/\\\"\'""#),
        vec![Token::String("a\nb\t/\\\"'".to_string())]
    );
    assert_eq!(tokens(r#""\u00e9""#), vec![Token::String("é".to_string())]);
    assert_eq!(
        tokens(r#""\ud83d\ude00""#),
        vec![Token::String("\u{1F600}".to_string())]
    );
}

#[test]
fn test_bad_escapes() {
    assert!(matches!(lex_error(r#""\x""#), LexError::InvalidEscape { ch: 'x', .. }));
    assert!(matches!(lex_error(r#""\u12""#), LexError::InvalidUnicodeEscape { .. }));
    assert!(matches!(
        lex_error(r#""\ud83d""#),
        LexError::InvalidUnicodeEscape { .. }
    ));
}

#[test]
fn test_unterminated_string() {
    assert!(matches!(
        lex_error("'abc"),
        LexError::UnterminatedString { position: 0 }
    ));
}

#[test]
fn test_identifiers() {
    assert_eq!(
        tokens("_id name2 größe"),
        vec![
            Token::Identifier("_id".to_string()),
            Token::Identifier("name2".to_string()),
            Token::Identifier("größe".to_string()),
        ]
    );
}

#[test]
fn test_positions_count_characters() {
    let err = lex_error("'é' ^");
    assert!(matches!(err, LexError::UnexpectedChar { ch: '^', position: 4 }));
}
