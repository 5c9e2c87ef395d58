//! Equality and ordering with metamethod fallback.

use crate::call::call1;
use crate::metamethod::{get_metafield, MetaEvent};
use lunet_core::value::toboolean;
use lunet_core::{LuaError, LuaResult, Value};

/// The first operand's handler for `event`, else the second's.
fn binary_handler(a: &Value, b: &Value, event: MetaEvent) -> Value {
    let handler = get_metafield(a, event);
    if handler.is_nil() {
        get_metafield(b, event)
    } else {
        handler
    }
}

fn compare_error(a: &Value, b: &Value) -> LuaError {
    let (ta, tb) = (a.type_name(), b.type_name());
    if ta == tb {
        LuaError::runtime(format!("attempt to compare two {ta} values"))
    } else {
        LuaError::runtime(format!("attempt to compare {ta} with {tb}"))
    }
}

/// `a == b`. Only two distinct tables consult `__eq`.
pub fn eq(a: &Value, b: &Value) -> LuaResult<bool> {
    if a == b {
        return Ok(true);
    }
    if a.is_table() && b.is_table() {
        let handler = binary_handler(a, b, MetaEvent::Eq);
        if !handler.is_nil() {
            return Ok(toboolean(&call1(&handler, vec![a.clone(), b.clone()])?));
        }
    }
    Ok(false)
}

/// `a < b`.
pub fn lt(a: &Value, b: &Value) -> LuaResult<bool> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Ok(x < y),
        (Value::String(x), Value::String(y)) => Ok(x < y),
        _ => {
            let handler = binary_handler(a, b, MetaEvent::Lt);
            if handler.is_nil() {
                return Err(compare_error(a, b));
            }
            Ok(toboolean(&call1(&handler, vec![a.clone(), b.clone()])?))
        }
    }
}

/// `a <= b`. Without `__le`, falls back to `not (b < a)` through `__lt`.
pub fn le(a: &Value, b: &Value) -> LuaResult<bool> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Ok(x <= y),
        (Value::String(x), Value::String(y)) => Ok(x <= y),
        _ => {
            let handler = binary_handler(a, b, MetaEvent::Le);
            if !handler.is_nil() {
                return Ok(toboolean(&call1(&handler, vec![a.clone(), b.clone()])?));
            }
            let handler = binary_handler(b, a, MetaEvent::Lt);
            if !handler.is_nil() {
                return Ok(!toboolean(&call1(&handler, vec![b.clone(), a.clone()])?));
            }
            Err(compare_error(a, b))
        }
    }
}
