//! Tagged Lua value representation.
//!
//! A [`Value`] is a closed variant over the six runtime types. Dispatch
//! always matches on the tag; strings compare by content, numbers and
//! booleans by value, and tables and functions by reference identity.

use crate::function::Function;
use crate::string::LuaStr;
use crate::table::TableRef;
use std::fmt;

/// A dynamically-typed Lua value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value; also the deletion sentinel for table stores.
    #[default]
    Nil,
    Boolean(bool),
    /// The single numeric kind. Integer-ness is checked on demand.
    Number(f64),
    String(LuaStr),
    Table(TableRef),
    Function(Function),
}

impl Value {
    /// Create a value holding a fresh, empty table.
    pub fn new_table() -> Self {
        Value::Table(TableRef::new())
    }

    // ---- Type checks ----

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[inline]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// The canonical Lua type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Table(_) => "table",
            Value::Function(_) => "function",
        }
    }

    // ---- Extractors ----

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&LuaStr> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_table(&self) -> Option<&TableRef> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Integer view of a number value with no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        self.as_number().and_then(float_to_integer)
    }

    // ---- Lua semantics ----

    /// Lua falsy: only nil and false are falsy.
    #[inline]
    pub fn is_falsy(&self) -> bool {
        matches!(self, Value::Nil | Value::Boolean(false))
    }

    /// Lua truthy: everything except nil and false.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !self.is_falsy()
    }
}

/// Truthiness of a value as a Rust bool.
pub fn toboolean(v: &Value) -> bool {
    v.is_truthy()
}

/// Convert a float to integer if it is finite and has no fractional part.
pub fn float_to_integer(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Render a number the way `tostring` does.
///
/// Integral values below 1e15 in magnitude print without a fraction. Other
/// finite values use the shortest round-trip form, switching to an exponent
/// outside `[1e-6, 1e21)`.
pub fn format_number(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    if f.fract() == 0.0 && f.abs() < 1e15 {
        return format!("{}", f as i64);
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        format!("{f}")
    } else {
        let s = format!("{f:e}");
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{:?}", s.as_str()),
            Value::Table(t) => write!(f, "table({:#x})", t.addr()),
            Value::Function(func) => write!(f, "function({})", func.name()),
        }
    }
}

/// Raw equality: no metamethods are consulted.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(LuaStr::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(LuaStr::from(s))
    }
}

impl From<LuaStr> for Value {
    fn from(s: LuaStr) -> Self {
        Value::String(s)
    }
}

impl From<TableRef> for Value {
    fn from(t: TableRef) -> Self {
        Value::Table(t)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
