//! Metamethod-aware table access, length, and string conversion.
//!
//! `__index`/`__newindex` chains are walked iteratively. A table-valued
//! handler continues the walk on that table; a function-valued handler is
//! called and ends it. Walks longer than the configured bound fail instead
//! of spinning on a cycle.

use crate::call::{call0, call1};
use crate::coerce::checktable;
use crate::config::config;
use crate::metamethod::{get_metafield, MetaEvent};
use lunet_core::string::string_buffer;
use lunet_core::value::format_number;
use lunet_core::{LuaError, LuaResult, LuaStr, Value};
use tracing::{trace, warn};

fn index_error(v: &Value) -> LuaError {
    LuaError::runtime(format!("attempt to index a {} value", v.type_name()))
}

/// `receiver[key]` with `__index` fallback.
pub fn gettable(receiver: &Value, key: &Value) -> LuaResult<Value> {
    let limit = config().limits.max_meta_chain;
    let mut current = receiver.clone();
    for _ in 0..limit {
        if let Value::Table(t) = &current {
            let raw = t.raw_get(key);
            if !raw.is_nil() {
                return Ok(raw);
            }
        }
        let handler = get_metafield(&current, MetaEvent::Index);
        match handler {
            Value::Nil if current.is_table() => return Ok(Value::Nil),
            Value::Nil => return Err(index_error(&current)),
            Value::Function(_) => {
                trace!(target: "lunet::dispatch", key = ?key, "calling __index");
                return call1(&handler, vec![current, key.clone()]);
            }
            next => current = next,
        }
    }
    warn!(target: "lunet::dispatch", limit, "__index chain exceeded limit");
    Err(LuaError::runtime("'__index' chain too long; possible loop"))
}

/// `receiver[key] = value` with `__newindex` fallback.
///
/// Existing keys are always written raw; the handler is consulted only when
/// the key is absent from the table being written.
pub fn settable(receiver: &Value, key: &Value, value: Value) -> LuaResult<()> {
    let limit = config().limits.max_meta_chain;
    let mut current = receiver.clone();
    for _ in 0..limit {
        let Value::Table(t) = &current else {
            return Err(index_error(&current));
        };
        if !t.raw_get(key).is_nil() {
            return t.raw_set(key.clone(), value);
        }
        let handler = get_metafield(&current, MetaEvent::NewIndex);
        match handler {
            Value::Nil => return t.raw_set(key.clone(), value),
            Value::Function(_) => {
                trace!(target: "lunet::dispatch", key = ?key, "calling __newindex");
                return call0(&handler, vec![current, key.clone(), value]);
            }
            next => current = next,
        }
    }
    warn!(target: "lunet::dispatch", limit, "__newindex chain exceeded limit");
    Err(LuaError::runtime("'__newindex' chain too long; possible loop"))
}

/// Store `values` at consecutive integer keys starting at `start`, bypassing
/// metamethods. Used for table constructors.
pub fn setlist(table: &Value, start: i64, values: impl IntoIterator<Item = Value>) -> LuaResult<()> {
    let t = checktable(table)?;
    for (key, value) in (start..).zip(values) {
        t.raw_set(key, value)?;
    }
    Ok(())
}

/// The length operator.
///
/// Strings report their encoded byte length. Tables use `__len` when
/// present; otherwise indices `1, 2, ...` are probed through [`gettable`]
/// until the first nil, so an `__index` handler takes part in the count.
pub fn len(v: &Value) -> LuaResult<Value> {
    match v {
        Value::String(s) => Ok(Value::from(string_buffer(s).len())),
        Value::Table(_) => {
            let handler = get_metafield(v, MetaEvent::Len);
            if !handler.is_nil() {
                return call1(&handler, vec![v.clone()]);
            }
            let mut n: i64 = 0;
            while !gettable(v, &Value::from(n + 1))?.is_nil() {
                n += 1;
            }
            Ok(Value::from(n))
        }
        _ => Err(LuaError::runtime(format!(
            "attempt to get length of a {} value",
            v.type_name()
        ))),
    }
}

/// Convert any value to its string form, honoring `__tostring` on tables.
pub fn tostring(v: &Value) -> LuaResult<LuaStr> {
    match v {
        Value::Nil => Ok(LuaStr::from("nil")),
        Value::Boolean(b) => Ok(LuaStr::from(if *b { "true" } else { "false" })),
        Value::Number(n) => Ok(LuaStr::from(format_number(*n))),
        Value::String(s) => Ok(s.clone()),
        Value::Table(_) => {
            let handler = get_metafield(v, MetaEvent::ToString);
            if handler.is_nil() {
                return Ok(LuaStr::from("table"));
            }
            match call1(&handler, vec![v.clone()])? {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(LuaStr::from(format_number(n))),
                _ => Err(LuaError::runtime("'__tostring' must return a string")),
            }
        }
        Value::Function(_) => Ok(LuaStr::from("function")),
    }
}
