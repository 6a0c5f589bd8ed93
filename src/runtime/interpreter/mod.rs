use crate::{
    lang::{source_buffer::SourceLocation, tokenizing::Token},
    runtime::{
        config::InterpreterConfig,
        data_structures::{
            dictionary::{ProcedureTable, VariableTable},
            value::Value,
            value_stack::ValueStack,
        },
        error,
    },
};
use std::{
    fmt::{self, Display, Formatter},
    io::Write,
};

pub mod stak_interpreter;

/// A call stack item is a record of the called procedure's name and the location within the
/// original source code it was called from.  These items are read-only and the fields are accessed
/// by member functions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallItem {
    location: SourceLocation,
    word: String,
}

impl CallItem {
    /// Create a new call stack item.
    pub fn new(word: String, location: SourceLocation) -> CallItem {
        CallItem { location, word }
    }

    /// Where in the source code was the procedure called from?
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    // The name of the procedure being executed.
    pub fn word(&self) -> &String {
        &self.word
    }
}

/// Make sure that this call can be nicely displayed to the user in event of an error.
impl Display for CallItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.word)
    }
}

/// Type to represent a call stack.  This is a stack of the procedures currently being executed by
/// the interpreter, used to give the user a trace when a script fails.
pub type CallStack = Vec<CallItem>;

/// Trait for managing the interpreter's operand stack.  Intended to be called by the built-in
/// words.
pub trait InterpreterStack {
    /// Use to examine the full stack when required.
    fn stack(&self) -> &ValueStack;

    fn stack_mut(&mut self) -> &mut ValueStack;

    /// Push a value onto the stack.  A full stack loses its top value unless running strict.
    fn push(&mut self, value: Value) -> error::Result<()>;

    /// Pop a value from the stack.  An empty stack gives `None` unless running strict.
    fn pop(&mut self) -> error::Result<Option<Value>>;

    /// Pop the top value, which must be a boolean.  Used for `if` and `while` conditions.
    fn pop_as_bool(&mut self) -> error::Result<bool>;
}

/// Trait for managing the names known to the interpreter, its variables and procedures, as well as
/// the call stack used for error reporting.
pub trait WordManagement {
    /// If currently set, the location of the token being executed.
    fn current_location(&self) -> &Option<SourceLocation>;

    fn variables(&self) -> &VariableTable;

    fn variables_mut(&mut self) -> &mut VariableTable;

    fn procedures(&self) -> &ProcedureTable;

    fn procedures_mut(&mut self) -> &mut ProcedureTable;

    /// The current procedure call stack.
    fn call_stack(&self) -> &CallStack;

    /// Push a new name and location onto the call stack.
    fn call_stack_push(&mut self, name: String, location: SourceLocation);

    /// Pop the last name and location from the call stack.
    fn call_stack_pop(&mut self) -> error::Result<()>;
}

/// Trait for tokenizing and executing code.
pub trait CodeManagement {
    /// Tokenize and run a script held in memory.  The path is used to label locations in error
    /// reports, for example "\<test\>".
    fn process_source(&mut self, path: &str, source: &str) -> error::Result<()>;

    /// Read, tokenize and run a script file.
    fn process_source_file(&mut self, path: &str) -> error::Result<()>;

    /// Execute a token list from start to end.  Blocks and procedure bodies are run by calling
    /// this recursively.
    fn execute_tokens(&mut self, tokens: &[Token]) -> error::Result<()>;

    /// Run a defined procedure by name, recording the call on the call stack.
    fn execute_procedure(&mut self, location: &SourceLocation, name: &str) -> error::Result<()>;
}

/// Core interpreter trait.
///
/// Brings together the stack, the name tables and code execution.  One instance is one complete
/// execution context, nothing is shared between instances.
pub trait Interpreter: InterpreterStack + WordManagement + CodeManagement {
    fn config(&self) -> &InterpreterConfig;

    /// Where the `stdout` word writes to.
    fn output(&mut self) -> &mut dyn Write;

    /// Reset the interpreter to an empty state, clearing the stack and forgetting all variables
    /// and procedures.
    fn reset(&mut self);
}

/// Minimum stack space to keep available before recursing into a block.
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Blocks and procedure calls recurse on the host stack, grow it when it runs low so deeply nested
/// scripts don't overflow it.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
