//! String library. Indices are 1-based byte positions into the UTF-8
//! encoding; negative indices count back from the end.

use crate::{register_fn, ArgCheck};
use lunet_core::function::arg;
use lunet_core::string::{decode_utf8, string_buffer, string_metatable};
use lunet_core::{LuaError, LuaResult, Ret, TableRef, Value};
use lunet_runtime::coerce::{checkinteger, checkstring, optinteger};
use tracing::debug;

/// Register the string library into `env` and route string method lookups
/// to it.
pub fn register(env: &TableRef) -> LuaResult<()> {
    let string_table = TableRef::with_capacity(0, 4);
    register_fn(&string_table, "byte", native_string_byte)?;
    register_fn(&string_table, "char", native_string_char)?;
    register_fn(&string_table, "len", native_string_len)?;
    register_fn(&string_table, "sub", native_string_sub)?;

    env.raw_set("string", string_table.clone())?;
    string_metatable().raw_set("__index", string_table)?;
    debug!(target: "lunet::stdlib", "string library registered");
    Ok(())
}

/// Clamp a start index to a 0-based offset.
fn start_offset(i: i64, len: usize) -> usize {
    let size = i64::try_from(len).unwrap_or(i64::MAX);
    let offset = match i {
        i if i < 0 => i.saturating_add(size).max(0),
        0 => 0,
        i => (i - 1).min(size),
    };
    usize::try_from(offset).unwrap_or(len)
}

/// Clamp an inclusive end index to an exclusive 0-based offset.
fn end_offset(j: i64, len: usize) -> usize {
    let size = i64::try_from(len).unwrap_or(i64::MAX);
    let offset = if j < 0 {
        j.saturating_add(size + 1).max(0)
    } else {
        j.min(size)
    };
    usize::try_from(offset).unwrap_or(len)
}

fn native_string_byte(args: Vec<Value>) -> LuaResult<Ret> {
    let s = checkstring(&arg(&args, 0)).arg(1, "byte")?;
    let i = optinteger(&arg(&args, 1), 1).arg(2, "byte")?;
    let j = optinteger(&arg(&args, 2), i).arg(3, "byte")?;
    let bytes = string_buffer(&s);
    let start = start_offset(i, bytes.len());
    let end = end_offset(j, bytes.len());
    if start >= end {
        return Ok(Ret::none());
    }
    Ok(Ret::Many(bytes[start..end].iter().map(|&b| Value::from(b)).collect()))
}

fn native_string_char(args: Vec<Value>) -> LuaResult<Ret> {
    let mut bytes = Vec::with_capacity(args.len());
    for (pos, v) in args.iter().enumerate() {
        let code = checkinteger(v).arg(pos + 1, "char")?;
        let byte = u8::try_from(code).map_err(|_| {
            LuaError::runtime(format!("bad argument #{} to 'char' (value out of range)", pos + 1))
        })?;
        bytes.push(byte);
    }
    Ok(Ret::Single(Value::String(decode_utf8(&bytes))))
}

fn native_string_len(args: Vec<Value>) -> LuaResult<Ret> {
    let s = checkstring(&arg(&args, 0)).arg(1, "len")?;
    Ok(Ret::Single(Value::from(string_buffer(&s).len())))
}

fn native_string_sub(args: Vec<Value>) -> LuaResult<Ret> {
    let s = checkstring(&arg(&args, 0)).arg(1, "sub")?;
    let bytes = string_buffer(&s);
    let i = optinteger(&arg(&args, 1), 1).arg(2, "sub")?;
    let j = optinteger(&arg(&args, 2), -1).arg(3, "sub")?;
    let start = start_offset(i, bytes.len());
    let end = end_offset(j, bytes.len());
    if start >= end {
        return Ok(Ret::Single(Value::from("")));
    }
    Ok(Ret::Single(Value::String(decode_utf8(&bytes[start..end]))))
}
