/// Words that shuffle and inspect the stack.
pub mod stack_words;

/// The arithmetic, bitwise and comparison operators.
pub mod math_words;

/// Words that write output.
pub mod io_words;

/// Binding and unbinding of variables.
pub mod variable_words;
