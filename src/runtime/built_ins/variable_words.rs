use crate::runtime::{
    error::{self, ErrorKind, script_error},
    interpreter::Interpreter,
};
use tracing::{trace, warn};

/// Pop the top value into the named variable.  Binding from an empty stack is an underflow, in the
/// default mode that is absorbed and the variable is left as it was.  A strict stack has already
/// reported it by the time the pop returns.
///
/// Signature: `value -- `
pub fn word_bind(interpreter: &mut dyn Interpreter, name: &str) -> error::Result<()> {
    let Some(value) = interpreter.pop()? else {
        warn!(name, "nothing on the stack to bind, binding skipped");
        return Ok(());
    };

    trace!(name, %value, "bind");
    interpreter.variables_mut().bind(name, value);

    Ok(())
}

/// Forget the named variable.
///
/// Signature: ` -- `
pub fn word_unbind(interpreter: &mut dyn Interpreter, name: &str) -> error::Result<()> {
    if interpreter.variables_mut().unbind(name).is_none() {
        return script_error(
            interpreter,
            ErrorKind::Semantic,
            format!("Can not unbind {}, it is not a bound variable.", name),
        );
    }

    Ok(())
}
