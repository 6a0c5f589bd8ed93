use crate::runtime::{data_structures::value::ToValue, error, interpreter::Interpreter};

/// Duplicate the top value on the stack.
///
/// Signature: `value -- value value`
pub fn word_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.stack_mut().duplicate()
}

/// Drop the top value on the stack.
///
/// Signature: `value -- `
pub fn word_drop(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let _ = interpreter.pop()?;

    Ok(())
}

/// Swap the top 2 values on the stack.
///
/// Signature: `a b -- b a`
pub fn word_swap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.stack_mut().swap();
    Ok(())
}

/// Make a copy of the second value and push it over the first.
///
/// Signature: `a b -- a b a`
pub fn word_over(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.stack_mut().over()
}

/// Exchange the top and third values on the stack.
///
/// Signature: `a b c -- c b a`
pub fn word_rot(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.stack_mut().rotate();
    Ok(())
}

/// Push the number of live values on the stack.
///
/// Signature: ` -- size`
pub fn word_size(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let size = interpreter.stack().size();

    interpreter.push(size.to_value())
}
