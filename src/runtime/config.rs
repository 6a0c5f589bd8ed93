use crate::runtime::{
    data_structures::value_stack::DEFAULT_STACK_CAPACITY,
    error::{self, ErrorKind, ScriptError},
};
use std::env::var;

/// Largest stack capacity accepted from the environment or the command line.
pub const MAX_STACK_CAPACITY: usize = 1 << 20;

/// Environment variable overriding the stack capacity.
pub const STACK_SIZE_VAR: &str = "STAK_STACK_SIZE";

/// Environment variable turning strict mode on or off.
pub const STRICT_VAR: &str = "STAK_STRICT";

/// How an interpreter instance is set up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Number of slots on the operand stack.
    pub stack_capacity: usize,

    /// Report stack overflow, underflow and unterminated blocks as errors, and have `size` report
    /// the real depth of the stack.
    pub strict: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            strict: false,
        }
    }
}

fn config_error<T>(message: String) -> error::Result<T> {
    ScriptError::new_as_result(None, ErrorKind::Config, message, None)
}

fn parse_capacity(source: &str, text: &str) -> error::Result<usize> {
    match text.trim().parse::<usize>() {
        Ok(capacity) if (1..=MAX_STACK_CAPACITY).contains(&capacity) => Ok(capacity),
        _ => config_error(format!(
            "{}: stack size must be an integer from 1 to {}, found '{}'.",
            source, MAX_STACK_CAPACITY, text
        )),
    }
}

fn parse_flag(source: &str, text: &str) -> error::Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => config_error(format!("{}: expected a boolean, found '{}'.", source, text)),
    }
}

impl InterpreterConfig {
    pub fn with_stack_capacity(mut self, stack_capacity: usize) -> Self {
        self.stack_capacity = stack_capacity.clamp(1, MAX_STACK_CAPACITY);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The defaults overridden by the process environment.
    pub fn from_env() -> error::Result<Self> {
        InterpreterConfig::default().apply_env(|name| var(name).ok())
    }

    /// Override settings from an environment lookup.  Unset variables leave the setting alone.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> error::Result<Self> {
        if let Some(text) = lookup(STACK_SIZE_VAR) {
            self.stack_capacity = parse_capacity(STACK_SIZE_VAR, &text)?;
        }

        if let Some(text) = lookup(STRICT_VAR) {
            self.strict = parse_flag(STRICT_VAR, &text)?;
        }

        Ok(self)
    }
}

/// The parsed command line of the `stak` binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    /// The interpreter settings after applying the command line flags.
    pub config: InterpreterConfig,

    /// Path of the script to run.
    pub script: String,

    /// Print the final state of the stack to stderr once the script finishes.
    pub dump_stack: bool,
}

pub const USAGE: &str = "usage: stak [--strict] [--stack-size N] [--dump-stack] <script>";

impl CommandLine {
    /// Parse the arguments that follow the program name, layering the flags over the given
    /// configuration.
    pub fn parse(args: &[String], config: InterpreterConfig) -> error::Result<CommandLine> {
        let mut config = config;
        let mut script = None;
        let mut dump_stack = false;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--strict" => config.strict = true,
                "--dump-stack" => dump_stack = true,
                "--stack-size" => {
                    let Some(text) = iter.next() else {
                        return config_error(format!("--stack-size needs a value.\n{}", USAGE));
                    };

                    config.stack_capacity = parse_capacity("--stack-size", text)?;
                }
                flag if flag.starts_with("--") => {
                    return config_error(format!("Unknown option {}.\n{}", flag, USAGE));
                }
                path => {
                    if script.is_some() {
                        return config_error(format!("Only one script can be run.\n{}", USAGE));
                    }

                    script = Some(path.to_string());
                }
            }
        }

        match script {
            Some(script) => Ok(CommandLine {
                config,
                script,
                dump_stack,
            }),
            None => config_error(USAGE.to_string()),
        }
    }
}
