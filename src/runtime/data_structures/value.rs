use std::fmt::{ self,
                Debug,
                Display,
                Formatter };



/// Core value enumeration used by the interpreter.  The language only knows about two kinds of
/// data, integers and booleans.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value
{
    /// We have an integer value.  Represented as an i64.
    Int(i64),

    /// A boolean value, written as `true` or `false` in scripts.
    Bool(bool)
}


/// Convert an arbitrary data type to a Value.
pub trait ToValue
{
    /// Implement to handle the actual conversion.
    fn to_value(&self) -> Value;
}


impl ToValue for i64
{
    fn to_value(&self) -> Value
    {
        Value::Int(*self)
    }
}


impl ToValue for usize
{
    fn to_value(&self) -> Value
    {
        Value::Int(*self as i64)
    }
}


impl ToValue for bool
{
    fn to_value(&self) -> Value
    {
        Value::Bool(*self)
    }
}


/// Print the scalar the way the `stdout` word does.
impl Display for Value
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            Value::Int(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value)
        }
    }
}


/// Print the value as well as an indicator of which variant we're holding.
impl Debug for Value
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            Value::Int(value) => write!(f, "{} i", value),
            Value::Bool(value) => write!(f, "{} b", value)
        }
    }
}


impl Value
{
    pub fn as_int(&self) -> Option<i64>
    {
        match self
        {
            Value::Int(value) => Some(*value),
            Value::Bool(_) => None
        }
    }

    /// An integer zero can not be told apart from an empty stack slot when the stack counts its
    /// live values.
    pub fn is_zero(&self) -> bool
    {
        matches!(self, Value::Int(0))
    }

    /// Name of the value's kind for error messages.
    pub fn type_name(&self) -> &'static str
    {
        match self
        {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean"
        }
    }
}
