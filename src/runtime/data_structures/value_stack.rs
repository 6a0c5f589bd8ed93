use crate::{
    lang::tokenizing::{Comparison, Operator},
    runtime::{
        built_ins::math_words::{apply_operator, compare_values},
        data_structures::value::Value,
        error::{self, ErrorKind, detached_error},
    },
};
use std::fmt::{self, Display, Formatter};
use tracing::warn;

/// Number of slots a stack has unless configured otherwise.
pub const DEFAULT_STACK_CAPACITY: usize = 16;

/// The operand stack.  A fixed number of slots with a stack pointer; the slots below the pointer
/// hold the live values in push order and every slot at or above it is empty.
///
/// By default the stack never fails.  A push onto a full stack replaces the top value and a pop
/// from an empty stack gives back `None`.  In strict mode both of those are reported as errors
/// instead.
///
/// The live value count reported by `size` is found by scanning the slots, and an integer zero is
/// counted as an empty slot.  The stack words that are gated on the size inherit this.  Strict mode
/// reports the real depth.
pub struct ValueStack {
    slots: Vec<Option<Value>>,
    pointer: usize,
    strict: bool,
}

impl Default for ValueStack {
    fn default() -> Self {
        Self::new(DEFAULT_STACK_CAPACITY)
    }
}

/// Show every slot and the pointer, `_` marks an empty slot.
impl Display for ValueStack {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[")?;

        for (index, slot) in self.slots.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }

            match slot {
                Some(value) => write!(f, "{}", value)?,
                None => write!(f, "_")?,
            }
        }

        write!(f, "] {}", self.pointer)
    }
}

impl ValueStack {
    /// Create a stack with the lenient overflow and underflow policy.
    pub fn new(capacity: usize) -> ValueStack {
        ValueStack::with_policy(capacity, false)
    }

    pub fn with_policy(capacity: usize, strict: bool) -> ValueStack {
        let capacity = capacity.max(1);

        ValueStack {
            slots: vec![None; capacity],
            pointer: 0,
            strict,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The actual number of values held, regardless of the size policy.
    pub fn depth(&self) -> usize {
        self.pointer
    }

    pub fn is_empty(&self) -> bool {
        self.pointer == 0
    }

    /// The live values from the bottom of the stack to the top.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.slots[..self.pointer].iter().flatten()
    }

    /// The top value, if there is one.
    pub fn top(&self) -> Option<&Value> {
        self.pointer
            .checked_sub(1)
            .and_then(|index| self.slots[index].as_ref())
    }

    /// Push a value.  When the stack is full the top value is replaced.
    pub fn push(&mut self, value: Value) -> error::Result<()> {
        if self.pointer == self.capacity() {
            if self.strict {
                return detached_error(
                    ErrorKind::Stack,
                    format!("Stack overflow, capacity is {}.", self.capacity()),
                );
            }

            warn!(capacity = self.capacity(), %value, "stack full, replacing the top value");
            self.slots[self.pointer - 1] = Some(value);
        } else {
            self.slots[self.pointer] = Some(value);
            self.pointer += 1;
        }

        Ok(())
    }

    /// Pop the top value, clearing its slot.  Popping an empty stack gives `None`.
    pub fn pop(&mut self) -> error::Result<Option<Value>> {
        if self.pointer == 0 {
            if self.strict {
                return detached_error(ErrorKind::Stack, "Stack underflow.".to_string());
            }

            warn!("pop from an empty stack");
            return Ok(None);
        }

        self.pointer -= 1;
        Ok(self.slots[self.pointer].take())
    }

    /// The number of live values.  See the type's documentation for how zero is counted.
    pub fn size(&self) -> usize {
        if self.strict {
            return self.pointer;
        }

        self.slots
            .iter()
            .flatten()
            .filter(|value| !value.is_zero())
            .count()
    }

    /// The value `offset` places below the top.  Only called after checking the size, which never
    /// exceeds the pointer.
    fn peek(&self, offset: usize) -> Option<Value> {
        self.slots[self.pointer - 1 - offset]
    }

    /// `a -- a a`
    pub fn duplicate(&mut self) -> error::Result<()> {
        if self.size() >= 1
            && let Some(value) = self.peek(0)
        {
            self.push(value)?;
        }

        Ok(())
    }

    /// `a b -- b a`
    pub fn swap(&mut self) {
        if self.size() >= 2 {
            self.slots.swap(self.pointer - 1, self.pointer - 2);
        }
    }

    /// `a b -- a b a`
    pub fn over(&mut self) -> error::Result<()> {
        if self.size() >= 2
            && let Some(value) = self.peek(1)
        {
            self.push(value)?;
        }

        Ok(())
    }

    /// Exchange the top and third values, `a b c -- c b a`.
    pub fn rotate(&mut self) {
        if self.size() >= 3 {
            self.slots.swap(self.pointer - 1, self.pointer - 3);
        }
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.pointer = 0;
    }

    /// Left fold the operator over every integer on the stack, bottom to top.  Booleans are
    /// skipped.  The stack itself is left untouched, clearing it is up to the caller.
    pub fn make_operation(&self, op: Operator) -> error::Result<Value> {
        let mut operands = self.iter().filter_map(|value| value.as_int());

        let Some(first) = operands.next() else {
            return detached_error(
                ErrorKind::Type,
                format!("Operator {} found no integers on the stack.", op),
            );
        };

        operands
            .try_fold(first, |accumulator, next| apply_operator(op, accumulator, next))
            .map(Value::Int)
    }

    /// Pop two values and compare them.  The first value popped is the right hand operand.
    pub fn make_compare(&mut self, cmp: Comparison) -> error::Result<Value> {
        let right = self.pop()?;
        let left = self.pop()?;

        match (left, right) {
            (Some(left), Some(right)) => compare_values(cmp, &left, &right).map(Value::Bool),
            _ => detached_error(
                ErrorKind::Type,
                format!("Comparison {} needs two values on the stack.", cmp),
            ),
        }
    }
}
