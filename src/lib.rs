/// Module for managing source code and turning it into tokens.
pub mod lang;

/// Module for the runtime and the data structures used by the interpreter.  As well as the
/// interpreter itself.
pub mod runtime;
