use std::{ error::Error,
           process::Termination,
           fmt::{ self, Debug, Display, Formatter }, process::ExitCode };
use crate::{ runtime::interpreter::CallStack,
             lang::source_buffer::SourceLocation };

use super::interpreter::Interpreter;



pub type Result<T> = std::result::Result<T, ScriptError>;



/// The broad category of a script error.  Every error is fatal to the run, the kind only tells the
/// user, and the tests, which part of the language rejected the script.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind
{
    /// No lexer rule matched the source text, or a literal could not be decoded.
    Lexical,

    /// A block was malformed, missing its `begin`, empty, unterminated or a stray closer.
    Structural,

    /// A name could not be resolved, or a definition was missing its name.
    Semantic,

    /// A value of the wrong kind was found on the stack.
    Type,

    /// Integer arithmetic failed, for example a division by zero.
    Numeric,

    /// The stack overflowed or underflowed while running in strict mode.
    Stack,

    /// Reading the script or writing output failed.
    Io,

    /// The interpreter settings or command line were invalid.
    Config
}


impl Display for ErrorKind
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        let name = match self
            {
                ErrorKind::Lexical => "lexical",
                ErrorKind::Structural => "structural",
                ErrorKind::Semantic => "semantic",
                ErrorKind::Type => "type",
                ErrorKind::Numeric => "numeric",
                ErrorKind::Stack => "stack",
                ErrorKind::Io => "I/O",
                ErrorKind::Config => "configuration"
            };

        write!(f, "{}", name)
    }
}



/// Any error that occurs during the tokenizing or execution of a script.
#[derive(Clone)]
pub struct ScriptError
{
    /// The location in the source code the error occurred, if available.
    location: Option<SourceLocation>,

    /// Which part of the language raised the error.
    kind: ErrorKind,

    /// The description of the error.
    error: String,

    /// The procedure call stack at the time of the error, if available.
    call_stack: Option<CallStack>
}


impl Error for ScriptError
{
}


/// When returned from main, convert the error result to an operating system exit code.
impl Termination for ScriptError
{
    /// Because this type represents an error, the exit code is always FAILURE.
    fn report(self) -> ExitCode
    {
        eprintln!("Error: {}", self);
        ExitCode::FAILURE
    }
}


/// Pretty print the ScriptError so the user can find the offending token.
impl Display for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match &self.location
        {
            Some(location) => write!(f, "{}: {}", location, self.error)?,
            None => write!(f, "{}", self.error)?
        }

        if let Some(call_stack) = &self.call_stack
            && !call_stack.is_empty()
        {
            write!(f, "\n\nCall stack\n")?;

            for item in call_stack.iter().rev()
            {
                writeln!(f, "  {}", item)?;
            }
        }

        Ok(())
    }
}


impl Debug for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{} error: {}", self.kind, self)
    }
}


impl ScriptError
{
    /// Create a new ScriptError.
    pub fn new(location: Option<SourceLocation>,
               kind: ErrorKind,
               error: String,
               call_stack: Option<CallStack>) -> ScriptError
    {
        ScriptError
            {
                location,
                kind,
                error,
                call_stack
            }
    }

    /// Create a new Script Error and wrap it in a Result::Err.
    pub fn new_as_result<T>(location: Option<SourceLocation>,
                            kind: ErrorKind,
                            error: String,
                            call_stack: Option<CallStack>) -> Result<T>
    {
        Err(ScriptError::new(location, kind, error, call_stack))
    }

    /// Errors raised below the interpreter, by the stack for example, don't know where in the
    /// script they happened.  Fill in the missing location and call stack, keeping anything that
    /// was already recorded closer to the fault.
    pub fn with_context(mut self,
                        location: &Option<SourceLocation>,
                        call_stack: &CallStack) -> ScriptError
    {
        if self.location.is_none()
        {
            self.location = location.clone();
        }

        if self.call_stack.is_none()
        {
            self.call_stack = Some(call_stack.clone());
        }

        self
    }

    /// If available, the location in the source code the error occurred.
    pub fn location(&self) -> &Option<SourceLocation>
    {
        &self.location
    }

    /// The category of the error.
    pub fn kind(&self) -> ErrorKind
    {
        self.kind
    }

    /// The description of the error.
    pub fn error(&self) -> &String
    {
        &self.error
    }

    /// If available, the procedure call stack at the time of the error.
    pub fn call_stack(&self) -> &Option<CallStack>
    {
        &self.call_stack
    }
}


/// Allow for the conversion of a std::io::Error into a ScriptError.
impl From<std::io::Error> for ScriptError
{
    fn from(error: std::io::Error) -> ScriptError
    {
        ScriptError::new(None, ErrorKind::Io, format!("I/O error: {}", error), None)
    }
}



/// A convenience function for creating a ScriptError and wrapping in in a Result::Err using the
/// interpreter's current location and call stack.
pub fn script_error<T>(interpreter: &dyn Interpreter, kind: ErrorKind, message: String) -> Result<T>
{
    let location = interpreter.current_location().clone();
    let call_stack = interpreter.call_stack().clone();

    ScriptError::new_as_result(location, kind, message, Some(call_stack))
}



pub fn script_error_str<T>(interpreter: &dyn Interpreter, kind: ErrorKind, message: &str) -> Result<T>
{
    script_error(interpreter, kind, message.to_string())
}



/// Create an error that has no location yet.  Used by the data structures, the interpreter fills
/// in the location when the error passes back through it.
pub fn detached_error<T>(kind: ErrorKind, message: String) -> Result<T>
{
    ScriptError::new_as_result(None, kind, message, None)
}
