//! Canonical JSON text for values and node-lists.
//!
//! Object members are written in document order. Integers and floats keep
//! their distinction (`5` vs `5.0`); non-finite floats, which JSON cannot
//! express, are written as `null`.
//!
//! # Examples
//!
//! ```
//! use match_jsonpath::Value;
//! use match_jsonpath::output::{to_json, to_json_pretty};
//!
//! let value = Value::Array(vec![Value::Integer(1), Value::Float(2.5), Value::Float(3.0)]);
//!
//! assert_eq!(to_json(&value), "[1,2.5,3.0]");
//! assert_eq!(to_json_pretty(&value), "[\n  1,\n  2.5,\n  3.0\n]");
//! ```

use indexmap::IndexMap;

use crate::{node_list::NodeList, value::Value};

pub struct JsonPrinter {
    pretty: bool,
}

impl JsonPrinter {
    pub fn new(pretty: bool) -> Self {
        JsonPrinter { pretty }
    }

    pub fn print(&self, value: &Value) -> String {
        let mut out = String::new();
        self.print_value(&mut out, value, 0);
        out
    }

    /// A node-list renders as a JSON array of its nodes.
    pub fn print_nodes(&self, nodes: &NodeList) -> String {
        let mut out = String::new();
        let items: Vec<&Value> = nodes.iter().collect();
        self.print_sequence(&mut out, '[', ']', &items, 0, |p, out, v, indent| {
            p.print_value(out, v, indent)
        });
        out
    }

    fn print_value(&self, out: &mut String, value: &Value, indent: usize) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Integer(n) => out.push_str(&n.to_string()),
            // Debug keeps the fraction on integral floats (`2.0`, not `2`)
            Value::Float(n) if n.is_finite() => out.push_str(&format!("{n:?}")),
            Value::Float(_) => out.push_str("null"),
            Value::String(s) => {
                out.push('"');
                out.push_str(&escape_json_string(s));
                out.push('"');
            }
            Value::Array(arr) => {
                let items: Vec<&Value> = arr.iter().collect();
                self.print_sequence(out, '[', ']', &items, indent, |p, out, v, indent| {
                    p.print_value(out, v, indent)
                });
            }
            Value::Object(obj) => self.print_object(out, obj, indent),
        }
    }

    fn print_object(&self, out: &mut String, obj: &IndexMap<String, Value>, indent: usize) {
        let members: Vec<(&String, &Value)> = obj.iter().collect();
        let colon = if self.pretty { ": " } else { ":" };
        self.print_sequence(out, '{', '}', &members, indent, |p, out, (k, v), indent| {
            out.push('"');
            out.push_str(&escape_json_string(k));
            out.push('"');
            out.push_str(colon);
            p.print_value(out, v, indent);
        });
    }

    fn print_sequence<T: Copy>(
        &self,
        out: &mut String,
        open: char,
        close: char,
        items: &[T],
        indent: usize,
        mut item: impl FnMut(&Self, &mut String, T, usize),
    ) {
        out.push(open);
        if items.is_empty() {
            out.push(close);
            return;
        }

        for (i, v) in items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if self.pretty {
                out.push('\n');
                out.push_str(&"  ".repeat(indent + 1));
            }
            item(self, out, *v, indent + 1);
        }

        if self.pretty {
            out.push('\n');
            out.push_str(&"  ".repeat(indent));
        }
        out.push(close);
    }
}

/// Escapes a string for use between double quotes in JSON (and in query text).
pub fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Converts a Value to compact JSON text.
pub fn to_json(value: &Value) -> String {
    JsonPrinter::new(false).print(value)
}

/// Converts a Value to JSON text with 2-space indentation.
pub fn to_json_pretty(value: &Value) -> String {
    JsonPrinter::new(true).print(value)
}
