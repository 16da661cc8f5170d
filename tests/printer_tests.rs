// tests/printer_tests.rs

use match_jsonpath::convert::from_json_str;
use match_jsonpath::{Evaluator, Query, parse_query};

fn canonical(input: &str) -> String {
    parse_query(input)
        .unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
        .to_string()
}

fn assert_canonical(cases: &[(&str, &str)]) {
    for (input, expected) in cases {
        assert_eq!(canonical(input), *expected, "input: {input}");
    }
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_member_names() {
    assert_canonical(&[
        ("$", "$"),
        ("$.a.b", "$.a.b"),
        ("$['a']", "$.a"),
        ("$['b c']", r#"$["b c"]"#),
        (r#"$["it's"]"#, r#"$["it's"]"#),
        (r#"$['a\"b']"#, r#"$["a\"b"]"#),
        ("$.true.null", "$.true.null"),
        ("$['']", r#"$[""]"#),
    ]);
}

#[test]
fn test_selectors() {
    assert_canonical(&[
        ("$[0][-1]", "$[0][-1]"),
        ("$[*].x", "$.*.x"),
        ("$.*", "$.*"),
        ("$[1:3]", "$[1:3]"),
        ("$[:2]", "$[:2]"),
        ("$[1:]", "$[1:]"),
        ("$[::-1]", "$[::-1]"),
        ("$[ 1 : 8 : 2 ]", "$[1:8:2]"),
    ]);
}

#[test]
fn test_unions() {
    assert_canonical(&[
        ("$[0,'a',1:2]", r#"$[0,"a",1:2]"#),
        ("$[0,1].x", "$[0,1].x"),
        ("$[*, ?@.a]", "$[*,?@.a]"),
    ]);
}

#[test]
fn test_descendants() {
    assert_canonical(&[
        ("$..book", "$..book"),
        ("$..*", "$..*"),
        ("$..[*]", "$..*"),
        ("$..['a']", "$..a"),
        ("$..[0,1]", "$..[0,1]"),
        ("$..['a b']", r#"$..["a b"]"#),
        ("$..book[2].author", "$..book[2].author"),
    ]);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_filters() {
    assert_canonical(&[
        ("$[?(@.price < 10)]", "$[?@.price < 10]"),
        ("$[?(@)]", "$[?@]"),
        ("$[?@.a==1&&(@.b||@.c)]", "$[?@.a == 1 && (@.b || @.c)]"),
        ("$[?(@.a || @.b) && @.c]", "$[?(@.a || @.b) && @.c]"),
        ("$[?!(@.a > 1)]", "$[?!(@.a > 1)]"),
        ("$.items[?@.key == $.value]", "$.items[?@.key == $.value]"),
    ]);
}

#[test]
fn test_arithmetic_parentheses() {
    assert_canonical(&[
        ("1 + 2 * 3", "1 + 2 * 3"),
        ("(1 + 2) * 3", "(1 + 2) * 3"),
        ("1 * (2 + 3)", "1 * (2 + 3)"),
        ("10 - 2 - 3", "(10 - 2) - 3"),
        ("10 - (2 - 3)", "10 - (2 - 3)"),
        ("-$.a", "-$.a"),
        ("-5", "-5"),
        ("1 - -5", "1 - -5"),
        ("$.x == -1", "$.x == -1"),
    ]);
}

#[test]
fn test_literals() {
    assert_canonical(&[
        ("null", "null"),
        ("true", "true"),
        ("2.5", "2.5"),
        ("1e3", "1000.0"),
        ("'x'", r#""x""#),
        (r#""a\nb""#, r#""a\nb""#),
    ]);
}

#[test]
fn test_functions_and_regex() {
    assert_canonical(&[
        ("count($.a[*])", "count($.a.*)"),
        ("ceil($.a)", "ceiling($.a)"),
        ("$[?@.name =~ 'db']", r#"$[?search(@.name, "db")]"#),
        ("$[?match(@.name, 'db.*')]", r#"$[?match(@.name, "db.*")]"#),
        ("$[?length(@.tags) > 1]", "$[?length(@.tags) > 1]"),
    ]);
}

#[test]
fn test_query_display_is_canonical() {
    let query = Query::parse("$['a'][?(@.b==1)]").unwrap();
    assert_eq!(query.text(), "$['a'][?(@.b==1)]");
    assert_eq!(query.to_string(), "$.a[?@.b == 1]");
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_round_trip_selects_the_same_nodes() {
    let document = from_json_str(
        r#"{
            "store": {
                "book": [
                    {"title": "a", "price": 8.95, "tags": ["x"]},
                    {"title": "b", "price": 12, "isbn": "1", "tags": ["x", "y"]},
                    {"title": "c", "price": -3, "tags": []}
                ],
                "bicycle": {"price": 399, "color": "red"}
            },
            "limit": 10,
            "it's": "quoted"
        }"#,
    )
    .unwrap();

    let queries = [
        "$.store.book[*].title",
        "$..price",
        "$.store..price",
        "$..book[0,2].title",
        "$..['title','color']",
        "$.store.book[::-1].title",
        "$.store.book[?@.price < $.limit].title",
        "$.store.book[?@.isbn || @.price > 10 && @.price < 20]",
        "$.store.book[?!(@.price > 0)].title",
        "$.store.book[?length(@.tags) >= 1 && @.title =~ '^[ab]$']",
        "$.store.book[?match(@.title, 'a|c')].price",
        "$.store.book[*].price * 2 - 1",
        "-$.store.bicycle.price",
        "count($..price)",
        "avg($.store.book[*].price)",
        "abs($.store.book[2].price)",
        "$[\"it's\"]",
        "$.store.book[0].price == 8.95",
        "$.store.book[1].price * (2 + 3)",
    ];

    for text in queries {
        let first = parse_query(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        let printed = first.to_string();
        let second = parse_query(&printed).unwrap_or_else(|e| panic!("{printed}: {e}"));

        let evaluator = Evaluator::new().throw_errors(false);
        assert_eq!(
            evaluator.evaluate(&first, &document),
            evaluator.evaluate(&second, &document),
            "{text} printed as {printed}"
        );
        assert_eq!(second.to_string(), printed, "printing is not stable for {text}");
    }
}
