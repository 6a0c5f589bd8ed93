use stak::runtime::{
    config::InterpreterConfig,
    error::Result,
    interpreter::{CodeManagement, stak_interpreter::StakInterpreter},
};
use std::{
    cell::RefCell,
    io::{self, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

/// A writer whose contents can still be read after it has been handed to an interpreter.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).to_string()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Create an interpreter that prints into a buffer the test can read back.
#[allow(dead_code)]
pub fn interpreter_with_output(config: InterpreterConfig) -> (StakInterpreter, SharedOutput) {
    let output = SharedOutput::default();
    let interpreter = StakInterpreter::with_output(config, Box::new(output.clone()));

    (interpreter, output)
}

/// Run the source with the given settings, returning the result and everything printed.
#[allow(dead_code)]
pub fn run_with(config: InterpreterConfig, source: &str) -> (Result<()>, String) {
    let (mut interpreter, output) = interpreter_with_output(config);
    let result = interpreter.process_source("<test>", source);

    (result, output.text())
}

/// Run the source with the default settings.
#[allow(dead_code)]
pub fn run(source: &str) -> (Result<()>, String) {
    run_with(InterpreterConfig::default(), source)
}

#[allow(dead_code)]
pub fn manifest_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(rel)
}
