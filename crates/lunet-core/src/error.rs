//! Runtime error types.

use crate::value::{format_number, Value};
use thiserror::Error;

/// Result alias used by every fallible runtime operation.
pub type LuaResult<T> = Result<T, LuaError>;

/// A runtime error.
///
/// Only [`LuaError::Runtime`] is recoverable: it is the error raised by
/// `error`, by a failed `assert`, and by every checked argument or dispatch
/// failure, and it is the only kind a `pcall` boundary catches. The other
/// variants signal a defect in the runtime or a host failure and always
/// propagate to the caller.
#[derive(Debug, Error)]
pub enum LuaError {
    /// Recoverable error carrying an arbitrary value as payload.
    #[error("{}", describe_payload(.0))]
    Runtime(Value),
    /// A broken runtime invariant.
    #[error("internal error: {0}")]
    Internal(String),
    /// The host output sink failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl LuaError {
    /// Recoverable error with a string payload.
    pub fn runtime(message: impl Into<String>) -> Self {
        LuaError::Runtime(Value::from(message.into()))
    }

    /// Recoverable error with an arbitrary payload (`error(v)`).
    pub fn value(payload: Value) -> Self {
        LuaError::Runtime(payload)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        LuaError::Internal(message.into())
    }

    /// True for the error kind a protected call may catch.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LuaError::Runtime(_))
    }

    /// The payload of a recoverable error.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            LuaError::Runtime(v) => Some(v),
            _ => None,
        }
    }
}

fn describe_payload(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.as_str().to_string(),
        Value::Number(n) => format_number(*n),
        other => format!("(error object is a {} value)", other.type_name()),
    }
}
