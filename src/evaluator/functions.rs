use super::{Engine, EvalContext, EvalError, Exec, Status};
use crate::{
    ast::{Function, NodeId},
    node_list::NodeList,
    value::Value,
};

impl Engine<'_> {
    /// Evaluates `func(arg)` and hands each result to the continuation of `id`.
    ///
    /// The argument never raises: a failing argument reads as no nodes.
    pub(super) fn call(
        &self,
        ctx: &EvalContext<'_>,
        id: NodeId,
        func: Function,
        arg: NodeId,
        input: &Value,
        found: Option<&mut NodeList>,
    ) -> Exec {
        let args = self.quiet_nodes(ctx, arg, input)?.unwrap_or_default();

        match func {
            Function::Length => {
                let len = args.single().map_or(0, |v| match v {
                    Value::String(s) => s.len(),
                    Value::Array(_) | Value::Object(_) => v.len(),
                    _ => 0,
                });
                self.next(ctx, id, &Value::Integer(len as i64), found)
            }
            Function::Count => self.next(ctx, id, &Value::Integer(args.len() as i64), found),
            Function::Avg => {
                let members = numeric_members(&args);
                let sum: f64 = members.iter().filter_map(|v| v.as_float()).sum();
                // 0/0 is NaN
                let avg = sum / members.len() as f64;
                self.next(ctx, id, &Value::Float(avg), found)
            }
            Function::Min => match extreme(&args, |a, b| a < b) {
                Some(v) => self.next(ctx, id, v, found),
                None => Ok(Status::NotFound),
            },
            Function::Max => match extreme(&args, |a, b| a > b) {
                Some(v) => self.next(ctx, id, v, found),
                None => self.next(ctx, id, &Value::Float(f64::INFINITY), found),
            },
            Function::Abs | Function::Floor | Function::Ceiling | Function::Double => {
                let mut results = Vec::new();
                for node in &args {
                    match node {
                        Value::Array(items) => {
                            for item in items {
                                results.push(coerce(func, item).map_err(|e| ctx.raise(e))?);
                            }
                        }
                        v => results.push(coerce(func, v).map_err(|e| ctx.raise(e))?),
                    }
                }
                self.each(ctx, id, results.iter(), found)
            }
            Function::Value => match args.single() {
                Some(v) => self.next(ctx, id, v, found),
                None => Ok(Status::NotFound),
            },
        }
    }
}

/// The numbers a set function works on: the numeric elements of a lone
/// array argument, or else the numeric nodes themselves.
fn numeric_members(args: &NodeList) -> Vec<&Value> {
    match args.single() {
        Some(Value::Array(items)) => items.iter().filter(|v| v.is_number()).collect(),
        _ => args.iter().filter(|v| v.is_number()).collect(),
    }
}

/// First numeric member that `wins` over every other one.
fn extreme(args: &NodeList, wins: impl Fn(f64, f64) -> bool) -> Option<&Value> {
    let mut best: Option<(&Value, f64)> = None;
    for v in numeric_members(args) {
        let Some(n) = v.as_float() else { continue };
        match best {
            Some((_, b)) if !wins(n, b) => {}
            _ => best = Some((v, n)),
        }
    }
    best.map(|(v, _)| v)
}

fn coerce(func: Function, value: &Value) -> Result<Value, EvalError> {
    let not_numeric = || EvalError::NotNumeric {
        func: func.name(),
        found: value.type_name(),
    };

    Ok(match (func, value) {
        (Function::Abs, Value::Integer(n)) => n
            .checked_abs()
            .map_or(Value::Float((*n as f64).abs()), Value::Integer),
        (Function::Abs, Value::Float(n)) => Value::Float(n.abs()),
        (Function::Floor | Function::Ceiling, Value::Integer(n)) => Value::Integer(*n),
        (Function::Floor, Value::Float(n)) => Value::Float(n.floor()),
        (Function::Ceiling, Value::Float(n)) => Value::Float(n.ceil()),
        (Function::Double, Value::Integer(n)) => Value::Float(*n as f64),
        (Function::Double, Value::Float(n)) => Value::Float(*n),
        (Function::Double, Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Float(n),
            _ => return Err(not_numeric()),
        },
        _ => return Err(not_numeric()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_members_unwraps_single_array() {
        let args = NodeList::One(Value::Array(vec![
            Value::Integer(1),
            Value::String("x".to_string()),
            Value::Float(2.5),
        ]));
        assert_eq!(numeric_members(&args).len(), 2);
    }

    #[test]
    fn test_extreme_keeps_original_value() {
        let mut args = NodeList::new();
        args.push(Value::Float(1.5)).unwrap();
        args.push(Value::Integer(7)).unwrap();
        args.push(Value::Integer(-3)).unwrap();
        assert_eq!(extreme(&args, |a, b| a > b), Some(&Value::Integer(7)));
        assert_eq!(extreme(&args, |a, b| a < b), Some(&Value::Integer(-3)));
        assert_eq!(extreme(&NodeList::Empty, |a, b| a < b), None);
    }

    #[test]
    fn test_double_parses_strings() {
        assert_eq!(
            coerce(Function::Double, &Value::String(" 2.5 ".to_string())),
            Ok(Value::Float(2.5))
        );
        assert!(coerce(Function::Double, &Value::String("abc".to_string())).is_err());
        assert!(coerce(Function::Abs, &Value::String("1".to_string())).is_err());
    }
}
