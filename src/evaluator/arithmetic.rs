use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};

use super::{EvalError, Side};
use crate::{
    ast::{BinaryOp, UnaryOp},
    value::Value,
};

/// Applies an arithmetic operator to two numeric values.
///
/// Integer results stay integers until they overflow; mixed operands go
/// through `Decimal` so that `0.1 + 2` does not pick up binary noise.
pub(super) fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let symbol = op.symbol();
    if matches!(op, BinaryOp::Divide | BinaryOp::Modulo) && is_zero(right) {
        return Err(EvalError::DivisionByZero { op: symbol });
    }

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(integers(op, *a, *b)),
        (Value::Integer(a), Value::Float(b)) => Ok(
            mixed(op, Decimal::from_i64(*a), Decimal::from_f64(*b))
                .unwrap_or_else(|| Value::Float(floats(op, *a as f64, *b))),
        ),
        (Value::Float(a), Value::Integer(b)) => Ok(
            mixed(op, Decimal::from_f64(*a), Decimal::from_i64(*b))
                .unwrap_or_else(|| Value::Float(floats(op, *a, *b as f64))),
        ),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(floats(op, *a, *b))),
        (a, _) => Err(EvalError::NotSingleNumber {
            side: if a.is_number() { Side::Right } else { Side::Left },
            op: symbol,
        }),
    }
}

/// Applies a unary sign to a numeric value. Negating `i64::MIN` yields a float.
pub(super) fn unary(op: UnaryOp, value: &Value) -> Value {
    match (op, value) {
        (UnaryOp::Plus, v) => v.clone(),
        (UnaryOp::Minus, Value::Integer(n)) => n
            .checked_neg()
            .map_or(Value::Float(-(*n as f64)), Value::Integer),
        (UnaryOp::Minus, Value::Float(n)) => Value::Float(-n),
        (UnaryOp::Minus, v) => v.clone(),
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Integer(n) => *n == 0,
        Value::Float(n) => *n == 0.0,
        _ => false,
    }
}

fn integers(op: BinaryOp, a: i64, b: i64) -> Value {
    let exact = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Subtract => a.checked_sub(b),
        BinaryOp::Multiply => a.checked_mul(b),
        // Inexact division leaves the integers
        BinaryOp::Divide => match a.checked_rem(b) {
            Some(0) => a.checked_div(b),
            _ => None,
        },
        BinaryOp::Modulo => a.checked_rem(b),
        _ => None,
    };
    exact.map_or_else(|| Value::Float(floats(op, a as f64, b as f64)), Value::Integer)
}

fn floats(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide => a / b,
        BinaryOp::Modulo => a % b,
        _ => f64::NAN,
    }
}

fn mixed(op: BinaryOp, a: Option<Decimal>, b: Option<Decimal>) -> Option<Value> {
    let (a, b) = (a?, b?);
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Subtract => a.checked_sub(b),
        BinaryOp::Multiply => a.checked_mul(b),
        BinaryOp::Divide => a.checked_div(b),
        BinaryOp::Modulo => a.checked_rem(b),
        _ => None,
    }?;

    if result.is_integer()
        && let Some(n) = result.to_i64()
    {
        Some(Value::Integer(n))
    } else {
        result.to_f64().map(Value::Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_overflow_falls_back_to_float() {
        let v = binary(BinaryOp::Add, &Value::Integer(i64::MAX), &Value::Integer(1)).unwrap();
        assert!(matches!(v, Value::Float(_)));
    }

    #[test]
    fn test_inexact_integer_division() {
        assert_eq!(
            binary(BinaryOp::Divide, &Value::Integer(7), &Value::Integer(2)).unwrap(),
            Value::Float(3.5)
        );
        assert_eq!(
            binary(BinaryOp::Divide, &Value::Integer(8), &Value::Integer(2)).unwrap(),
            Value::Integer(4)
        );
    }

    #[test]
    fn test_mixed_operands_are_exact() {
        assert_eq!(
            binary(BinaryOp::Add, &Value::Float(0.1), &Value::Integer(2)).unwrap(),
            Value::Float(2.1)
        );
        assert_eq!(
            binary(BinaryOp::Multiply, &Value::Float(1.5), &Value::Integer(2)).unwrap(),
            Value::Integer(3)
        );
    }

    #[test]
    fn test_zero_divisor() {
        for op in [BinaryOp::Divide, BinaryOp::Modulo] {
            assert_eq!(
                binary(op, &Value::Integer(1), &Value::Float(0.0)),
                Err(EvalError::DivisionByZero { op: op.symbol() })
            );
        }
    }

    #[test]
    fn test_negate_min() {
        assert_eq!(
            unary(UnaryOp::Minus, &Value::Integer(i64::MIN)),
            Value::Float(9.223372036854776e18)
        );
    }
}
