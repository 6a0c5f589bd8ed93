/// Module contains the Value enumeration and it's implementation.  Values are what live on the
/// stack and in variables.
pub mod value;

/// The fixed capacity operand stack.
pub mod value_stack;

/// The variable and procedure tables of a running interpreter.
pub mod dictionary;
