use stak::runtime::{
    config::{CommandLine, InterpreterConfig},
    error,
    interpreter::{CodeManagement, InterpreterStack, stak_interpreter::StakInterpreter},
};
use std::{
    env::{args, var},
    process::{ExitCode, Termination},
};
use tracing::debug;

/// Send the interpreter's logs to stderr, but only when asked for through `RUST_LOG`.  The script's
/// own output goes to stdout and is never mixed with the logs.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run() -> error::Result<()> {
    // Settings come from the defaults, then the environment, then the command line.
    let args: Vec<String> = args().skip(1).collect();
    let command_line = CommandLine::parse(&args, InterpreterConfig::from_env()?)?;

    debug!(config = ?command_line.config, script = %command_line.script, "starting");

    let mut interpreter = StakInterpreter::new(command_line.config.clone());
    let result = interpreter.process_source_file(&command_line.script);

    // Dump the stack even when the script failed, it's the most useful thing to look at then.
    if command_line.dump_stack {
        eprintln!("Stack: {}", interpreter.stack());
    }

    result
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => error.report(),
    }
}
