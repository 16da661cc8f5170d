use std::cmp::Ordering;

use super::Truth;
use crate::{ast::BinaryOp, node_list::NodeList, value::Value};

/// Compares every left node with every right node.
///
/// True if any pair is True, otherwise Unknown if any pair is Unknown,
/// otherwise False. An empty side acts as a value of a type nothing else has;
/// two empty sides are equal.
pub fn compare_lists(op: BinaryOp, left: &NodeList, right: &NodeList) -> Truth {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return apply(op, Some(Ordering::Equal)),
        (true, false) | (false, true) => return apply(op, None),
        (false, false) => {}
    }

    let mut unknown = false;
    for a in left {
        for b in right {
            match compare_values(op, a, b) {
                Truth::True => return Truth::True,
                Truth::Unknown => unknown = true,
                Truth::False => {}
            }
        }
    }

    if unknown { Truth::Unknown } else { Truth::False }
}

/// Applies one comparison operator to a pair of values.
///
/// Only values of the same JSON type are ordered; integers and floats are
/// the same type. Arrays and objects are either deep-equal or unordered.
pub fn compare_values(op: BinaryOp, left: &Value, right: &Value) -> Truth {
    apply(op, order(left, right))
}

fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (a, b) if a.is_number() && b.is_number() => {
            a.as_float()?.partial_cmp(&b.as_float()?)
        }
        (Value::String(a), Value::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        (a, b) if a.is_container() && a.json_type() == b.json_type() => {
            a.deep_equals(b).then_some(Ordering::Equal)
        }
        _ => None,
    }
}

/// `None` is an unordered pair: unequal, and neither less nor greater.
fn apply(op: BinaryOp, ord: Option<Ordering>) -> Truth {
    let Some(ord) = ord else {
        return match op {
            BinaryOp::Equal => Truth::False,
            BinaryOp::NotEqual => Truth::True,
            _ => Truth::Unknown,
        };
    };

    Truth::from_bool(match op {
        BinaryOp::Equal => ord == Ordering::Equal,
        BinaryOp::NotEqual => ord != Ordering::Equal,
        BinaryOp::LessThan => ord == Ordering::Less,
        BinaryOp::GreaterThan => ord == Ordering::Greater,
        BinaryOp::LessEqual => ord != Ordering::Greater,
        BinaryOp::GreaterEqual => ord != Ordering::Less,
        _ => return Truth::Unknown,
    })
}
