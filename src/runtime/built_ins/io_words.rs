use crate::runtime::{error, interpreter::Interpreter};
use std::io::Write;

/// Pop the top value and print it on its own line.  Does nothing when the stack reports no live
/// values.
///
/// Signature: `value -- `
pub fn word_stdout(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    if interpreter.stack().size() == 0 {
        return Ok(());
    }

    if let Some(value) = interpreter.pop()? {
        writeln!(interpreter.output(), "{}", value)?;
    }

    Ok(())
}
