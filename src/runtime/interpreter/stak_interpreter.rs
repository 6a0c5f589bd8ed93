use crate::{
    lang::{
        block::{Block, extract_block},
        source_buffer::SourceLocation,
        tokenizing::{
            Binding, ReservedWord, Token, TokenKind, tokenize_from_file, tokenize_from_source,
        },
    },
    runtime::{
        built_ins::{
            io_words::word_stdout,
            math_words::{word_compare, word_operator},
            stack_words::{word_drop, word_dup, word_over, word_rot, word_size, word_swap},
            variable_words::{word_bind, word_unbind},
        },
        config::InterpreterConfig,
        data_structures::{
            dictionary::{ProcedureTable, VariableTable},
            value::Value,
            value_stack::ValueStack,
        },
        error::{self, ErrorKind, script_error, script_error_str},
        interpreter::{
            CallItem, CallStack, CodeManagement, Interpreter, InterpreterStack, WordManagement,
            ensure_sufficient_stack,
        },
    },
};
use std::io::{self, Write};
use tracing::{debug, trace, warn};

/// The core interpreter implementation.  Walks a token list directly, recursing into itself for
/// block bodies and procedure calls.
///
/// An instance holds the whole execution context of a run: the stack, the variable and procedure
/// tables, and the output.  Independent instances never share state.
pub struct StakInterpreter {
    /// The settings the interpreter was created with.
    config: InterpreterConfig,

    /// The operand stack.
    stack: ValueStack,

    /// The variables bound by the script.
    variables: VariableTable,

    /// The procedures defined by the script.
    procedures: ProcedureTable,

    /// The location of the token being executed.
    current_location: Option<SourceLocation>,

    /// The procedures currently being executed.
    call_stack: CallStack,

    /// Where `stdout` writes to.
    output: Box<dyn Write>,
}

impl InterpreterStack for StakInterpreter {
    fn stack(&self) -> &ValueStack {
        &self.stack
    }

    fn stack_mut(&mut self) -> &mut ValueStack {
        &mut self.stack
    }

    fn push(&mut self, value: Value) -> error::Result<()> {
        self.stack.push(value)
    }

    fn pop(&mut self) -> error::Result<Option<Value>> {
        self.stack.pop()
    }

    fn pop_as_bool(&mut self) -> error::Result<bool> {
        match self.pop()? {
            Some(Value::Bool(value)) => Ok(value),
            Some(value) => script_error(
                self,
                ErrorKind::Type,
                format!(
                    "Expected a boolean condition, found the {} {}.",
                    value.type_name(),
                    value
                ),
            ),
            None => script_error_str(
                self,
                ErrorKind::Type,
                "Expected a boolean condition, the stack is empty.",
            ),
        }
    }
}

impl WordManagement for StakInterpreter {
    fn current_location(&self) -> &Option<SourceLocation> {
        &self.current_location
    }

    fn variables(&self) -> &VariableTable {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut VariableTable {
        &mut self.variables
    }

    fn procedures(&self) -> &ProcedureTable {
        &self.procedures
    }

    fn procedures_mut(&mut self) -> &mut ProcedureTable {
        &mut self.procedures
    }

    fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    fn call_stack_push(&mut self, name: String, location: SourceLocation) {
        self.call_stack.push(CallItem::new(name, location));
    }

    fn call_stack_pop(&mut self) -> error::Result<()> {
        if self.call_stack.pop().is_none() {
            script_error_str(self, ErrorKind::Semantic, "Call stack underflow.")?;
        }

        Ok(())
    }
}

impl CodeManagement for StakInterpreter {
    fn process_source(&mut self, path: &str, source: &str) -> error::Result<()> {
        let tokens = tokenize_from_source(path, source)?;

        debug!(path, tokens = tokens.len(), "running script");

        let result = self.execute_tokens(&tokens);
        self.output.flush()?;

        debug!(path, ok = result.is_ok(), "script finished");
        result
    }

    fn process_source_file(&mut self, path: &str) -> error::Result<()> {
        let tokens = tokenize_from_file(path)?;

        debug!(path, tokens = tokens.len(), "running script file");

        let result = self.execute_tokens(&tokens);
        self.output.flush()?;

        result
    }

    fn execute_tokens(&mut self, tokens: &[Token]) -> error::Result<()> {
        ensure_sufficient_stack(|| self.run_tokens(tokens))
    }

    fn execute_procedure(&mut self, location: &SourceLocation, name: &str) -> error::Result<()> {
        let Some(procedure) = self.procedures.find(name) else {
            return script_error(
                self,
                ErrorKind::Semantic,
                format!("Procedure {} is not defined.", name),
            );
        };

        let body = procedure.body.clone();

        debug!(name, "calling procedure");
        self.call_stack_push(name.to_string(), location.clone());

        let result = self.execute_tokens(&body);

        self.call_stack_pop()?;
        result
    }
}

impl Interpreter for StakInterpreter {
    fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    fn output(&mut self) -> &mut dyn Write {
        self.output.as_mut()
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.variables.clear();
        self.procedures.clear();
        self.call_stack.clear();
        self.current_location = None;
    }
}

impl StakInterpreter {
    /// Create an interpreter that prints to the process's standard output.
    pub fn new(config: InterpreterConfig) -> StakInterpreter {
        StakInterpreter::with_output(config, Box::new(io::stdout()))
    }

    /// Create an interpreter that prints to the given writer.
    pub fn with_output(config: InterpreterConfig, output: Box<dyn Write>) -> StakInterpreter {
        let stack = ValueStack::with_policy(config.stack_capacity, config.strict);

        StakInterpreter {
            config,
            stack,
            variables: VariableTable::new(),
            procedures: ProcedureTable::new(),
            current_location: None,
            call_stack: CallStack::new(),
            output,
        }
    }

    /// Walk the tokens by index, block constructs move the index past the blocks they consume.
    fn run_tokens(&mut self, tokens: &[Token]) -> error::Result<()> {
        let mut last_identifier = None;
        let mut index = 0;

        while index < tokens.len() {
            let token = &tokens[index];

            self.current_location = Some(token.location().clone());
            trace!(token = %token, "execute");

            index = self
                .execute_token(tokens, index, &mut last_identifier)
                .map_err(|error| {
                    error.with_context(&Some(token.location().clone()), &self.call_stack)
                })?;
        }

        Ok(())
    }

    /// Execute the token at the index and return the index of the next token to execute.
    fn execute_token<'a>(
        &mut self,
        tokens: &'a [Token],
        index: usize,
        last_identifier: &mut Option<&'a str>,
    ) -> error::Result<usize> {
        let token = &tokens[index];

        match token.kind() {
            TokenKind::Int(value) => self.push(Value::Int(*value))?,
            TokenKind::Bool(value) => self.push(Value::Bool(*value))?,
            TokenKind::MathOp(op) | TokenKind::BitwiseOp(op) => word_operator(self, *op)?,
            TokenKind::CompareOp(cmp) => word_compare(self, *cmp)?,
            TokenKind::SpecialIdentifier(Binding::Bind) => word_bind(self, token.name())?,
            TokenKind::SpecialIdentifier(Binding::Unbind) => word_unbind(self, token.name())?,
            TokenKind::Reserved(word) => {
                return self.execute_reserved(tokens, index, *word, *last_identifier);
            }
            TokenKind::Identifier => {
                *last_identifier = Some(token.text());

                // A name followed by `proc` is being defined, not called.
                let is_definition = tokens
                    .get(index + 1)
                    .is_some_and(|next| next.is_reserved(ReservedWord::Proc));

                if !is_definition {
                    self.execute_identifier(token)?;
                }
            }
        }

        Ok(index + 1)
    }

    /// A bare identifier reads a variable, or failing that calls a procedure.
    fn execute_identifier(&mut self, token: &Token) -> error::Result<()> {
        let name = token.text();

        if let Some(value) = self.variables.get(name) {
            return self.push(value);
        }

        if self.procedures.contains(name) {
            return self.execute_procedure(token.location(), name);
        }

        script_error(
            self,
            ErrorKind::Semantic,
            format!(
                "Unknown word {}, it is neither a bound variable nor a defined procedure.",
                name
            ),
        )
    }

    /// Execute a reserved word.  The control words consume their block and return the index just
    /// past its closing `end`.
    fn execute_reserved(
        &mut self,
        tokens: &[Token],
        index: usize,
        word: ReservedWord,
        last_identifier: Option<&str>,
    ) -> error::Result<usize> {
        match word {
            ReservedWord::Stdout | ReservedWord::Print => word_stdout(self)?,
            ReservedWord::Size => word_size(self)?,
            ReservedWord::Dup => word_dup(self)?,
            ReservedWord::Drop => word_drop(self)?,
            ReservedWord::Swap => word_swap(self)?,
            ReservedWord::Over => word_over(self)?,
            ReservedWord::Rot => word_rot(self)?,

            ReservedWord::If => {
                let condition = self.pop_as_bool()?;
                let block = self.block_after(tokens, index)?;

                if condition {
                    self.execute_tokens(block.body)?;
                }

                return Ok(block.closer + 1);
            }

            ReservedWord::While => {
                let mut condition = self.pop_as_bool()?;
                let block = self.block_after(tokens, index)?;

                // The body has to leave the next condition on the stack.
                while condition {
                    self.execute_tokens(block.body)?;

                    self.current_location = Some(tokens[index].location().clone());
                    condition = self.pop_as_bool()?;
                }

                return Ok(block.closer + 1);
            }

            ReservedWord::Proc => {
                let Some(name) = last_identifier else {
                    return script_error_str(
                        self,
                        ErrorKind::Semantic,
                        "Word proc must follow the name of the procedure being defined.",
                    );
                };

                let block = self.block_after(tokens, index)?;

                debug!(name, tokens = block.body.len(), "defining procedure");
                self.procedures.define(
                    name,
                    tokens[index].location().clone(),
                    block.body.to_vec(),
                );

                return Ok(block.closer + 1);
            }

            ReservedWord::Begin | ReservedWord::End => {
                if self.config.strict {
                    return script_error(
                        self,
                        ErrorKind::Structural,
                        format!("Unexpected {} outside of an if, while or proc block.", word),
                    );
                }

                warn!(location = %tokens[index].location(), "ignoring stray {}", word);
            }
        }

        Ok(index + 1)
    }

    /// Find the block following the `if`, `while` or `proc` at the index.  The word must be
    /// followed directly by `begin`.
    fn block_after<'a>(&self, tokens: &'a [Token], index: usize) -> error::Result<Block<'a>> {
        let word = &tokens[index];

        if !tokens
            .get(index + 1)
            .is_some_and(|next| next.is_reserved(ReservedWord::Begin))
        {
            return script_error(
                self,
                ErrorKind::Structural,
                format!("Expected begin after {}.", word),
            );
        }

        let block = extract_block(tokens, index + 2)?;

        if !block.is_terminated(tokens) {
            if self.config.strict {
                return script_error(
                    self,
                    ErrorKind::Structural,
                    format!("The block of {} is missing its end.", word),
                );
            }

            warn!(location = %word.location(), "block of {} is never closed", word);
        }

        Ok(block)
    }
}
