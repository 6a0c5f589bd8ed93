use crate::{
    lang::tokenizing::{Comparison, Operator},
    runtime::{
        data_structures::value::Value,
        error::{self, ErrorKind, detached_error},
        interpreter::Interpreter,
    },
};
use std::cmp::Ordering;

/// Shift an integer, the count must not be negative.  Shifting by the full width or more shifts
/// every bit out.
fn shift(op: Operator, value: i64, count: i64) -> error::Result<i64> {
    if count < 0 {
        return detached_error(
            ErrorKind::Numeric,
            format!("Negative shift count {} for {}.", count, op),
        );
    }

    let count = u32::try_from(count).unwrap_or(u32::MAX);

    let result = match op {
        Operator::ShiftLeft => value.checked_shl(count).unwrap_or(0),
        _ => value
            .checked_shr(count)
            .unwrap_or(if value < 0 { -1 } else { 0 }),
    };

    Ok(result)
}

/// Apply one step of an operator fold.  `+ - *` wrap around on overflow, `/` truncates toward zero.
pub fn apply_operator(op: Operator, a: i64, b: i64) -> error::Result<i64> {
    match op {
        Operator::Add => Ok(a.wrapping_add(b)),
        Operator::Subtract => Ok(a.wrapping_sub(b)),
        Operator::Multiply => Ok(a.wrapping_mul(b)),
        Operator::Divide => {
            if b == 0 {
                return detached_error(ErrorKind::Numeric, "Division by zero.".to_string());
            }

            Ok(a.wrapping_div(b))
        }
        Operator::Or => Ok(a | b),
        Operator::And => Ok(a & b),
        Operator::Xor => Ok(a ^ b),
        Operator::ShiftLeft | Operator::ShiftRight => shift(op, a, b),
    }
}

/// Compare two values.  Any two values can be tested for equality, but only values of the same kind
/// can be ordered.  Booleans order `false` before `true`.
pub fn compare_values(cmp: Comparison, left: &Value, right: &Value) -> error::Result<bool> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    };

    let ordered = || match ordering {
        Some(ordering) => Ok(ordering),
        None => detached_error(
            ErrorKind::Type,
            format!(
                "Can not order a {} against a {} with {}.",
                left.type_name(),
                right.type_name(),
                cmp
            ),
        ),
    };

    let result = match cmp {
        Comparison::Equal => left == right,
        Comparison::NotEqual => left != right,
        Comparison::Less => ordered()? == Ordering::Less,
        Comparison::Greater => ordered()? == Ordering::Greater,
        Comparison::LessOrEqual => ordered()? != Ordering::Greater,
        Comparison::GreaterOrEqual => ordered()? != Ordering::Less,
    };

    Ok(result)
}

/// Reduce the entire stack with the operator, leaving only the result.
///
/// Signature: `a b ... n -- result`
pub fn word_operator(interpreter: &mut dyn Interpreter, op: Operator) -> error::Result<()> {
    let result = interpreter.stack().make_operation(op)?;

    interpreter.stack_mut().clear();
    interpreter.push(result)
}

/// Compare the top two values.
///
/// Signature: `a b -- bool`
pub fn word_compare(interpreter: &mut dyn Interpreter, cmp: Comparison) -> error::Result<()> {
    let result = interpreter.stack_mut().make_compare(cmp)?;

    interpreter.push(result)
}
