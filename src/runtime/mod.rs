/// All of the core data structures used by the interpreter, the value, the stack and the name
/// tables.
pub mod data_structures;

/// Module for defining the built-in words of the language.
pub mod built_ins;

/// Module for defining the error reporting of the interpreter.
pub mod error;

/// Interpreter configuration, from defaults, the environment and the command line.
pub mod config;

/// Module for defining the core functionality of the interpreter.  This includes tools for
/// managing and examining the interpreter's state.
pub mod interpreter;
