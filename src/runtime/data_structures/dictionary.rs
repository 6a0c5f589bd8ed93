impl Default for VariableTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ProcedureTable {
    fn default() -> Self {
        Self::new()
    }
}

use crate::{
    lang::{source_buffer::SourceLocation, tokenizing::TokenList},
    runtime::data_structures::value::Value,
};
use std::{collections::HashMap, rc::Rc};

/// The variables bound by a script.  Bound with `!name`, forgotten with `?name`.
pub struct VariableTable {
    variables: HashMap<String, Value>,
}

impl VariableTable {
    pub fn new() -> VariableTable {
        VariableTable {
            variables: HashMap::new(),
        }
    }

    /// Bind the value to the name, replacing any previous value.
    pub fn bind(&mut self, name: &str, value: Value) {
        let _ = self.variables.insert(name.to_string(), value);
    }

    /// Forget the variable, returning the value it held if it was bound.
    pub fn unbind(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.variables.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }
}

/// A procedure defined with `name proc begin … end`.  The body is extracted once at definition time
/// and shared, so a running procedure can be redefined without pulling its tokens out from under
/// it.
#[derive(Clone)]
pub struct Procedure {
    /// Where the procedure was defined.
    pub location: SourceLocation,

    /// The name of the procedure.
    pub name: String,

    /// The tokens of the procedure's body.
    pub body: Rc<TokenList>,
}

/// The procedures known to the interpreter.
pub struct ProcedureTable {
    procedures: HashMap<String, Procedure>,
}

impl ProcedureTable {
    pub fn new() -> ProcedureTable {
        ProcedureTable {
            procedures: HashMap::new(),
        }
    }

    /// Define, or redefine, a procedure.
    pub fn define(&mut self, name: &str, location: SourceLocation, body: TokenList) {
        let procedure = Procedure {
            location,
            name: name.to_string(),
            body: Rc::new(body),
        };

        let _ = self.procedures.insert(name.to_string(), procedure);
    }

    pub fn find(&self, name: &str) -> Option<&Procedure> {
        self.procedures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    pub fn clear(&mut self) {
        self.procedures.clear();
    }
}
