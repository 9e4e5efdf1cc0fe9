//! Stack values for the quote machine
//!
//! - [`Value::Number`]: signed 64-bit integer
//! - [`Value::Str`]: a quoted string literal
//! - [`Value::Lambda`]: the verbatim body of a bracketed quote, stored but never run

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Number(i64),
    Str(String),
    Lambda(String),
}

impl Value {
    /// Numeric view used by arithmetic; non-numbers coerce to zero
    pub fn as_number(&self) -> i64 {
        match self {
            Value::Number(n) => *n,
            _ => 0,
        }
    }

    /// Text written by the print-top operator, `None` for values that print nothing
    pub fn printable(&self) -> Option<String> {
        match self {
            Value::Number(n) => Some(n.to_string()),
            Value::Str(s) => Some(s.clone()),
            Value::Lambda(_) => None,
        }
    }
}
