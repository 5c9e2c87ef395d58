//! Base library: assert, error, pcall, ipairs, select, type conversion,
//! metatable access, raw access and print.

use crate::{register_fn, value_expected, ArgCheck, Sink};
use lunet_core::function::arg;
use lunet_core::string::string_buffer;
use lunet_core::{Function, LuaError, LuaResult, Ret, TableRef, Value};
use lunet_runtime::{call, coerce, dispatch, metamethod};

/// Register the base functions into `env`.
pub fn register(env: &TableRef, sink: Sink) -> LuaResult<()> {
    register_fn(env, "assert", native_assert)?;
    register_fn(env, "error", native_error)?;
    register_fn(env, "pcall", native_pcall)?;
    register_fn(env, "select", native_select)?;
    register_fn(env, "type", native_type)?;
    register_fn(env, "tostring", native_tostring)?;
    register_fn(env, "tonumber", native_tonumber)?;
    register_fn(env, "setmetatable", native_setmetatable)?;
    register_fn(env, "getmetatable", native_getmetatable)?;
    register_fn(env, "rawget", native_rawget)?;
    register_fn(env, "rawset", native_rawset)?;
    register_fn(env, "rawequal", native_rawequal)?;
    register_fn(env, "rawlen", native_rawlen)?;

    // Every ipairs call hands out the same iterator.
    let iter = Value::Function(Function::new("ipairs_iter", native_ipairs_iter));
    register_fn(env, "ipairs", move |args| native_ipairs(&iter, args))?;

    register_fn(env, "print", move |args| native_print(&sink, args))?;
    Ok(())
}

fn native_assert(args: Vec<Value>) -> LuaResult<Ret> {
    if arg(&args, 0).is_truthy() {
        return Ok(Ret::Many(args));
    }
    match args.get(1) {
        Some(message) => Err(LuaError::value(message.clone())),
        None => Err(LuaError::runtime("assertion failed!")),
    }
}

fn native_error(args: Vec<Value>) -> LuaResult<Ret> {
    Err(LuaError::value(arg(&args, 0)))
}

fn native_pcall(mut args: Vec<Value>) -> LuaResult<Ret> {
    if args.is_empty() {
        return Err(value_expected(1, "pcall"));
    }
    let rest = args.split_off(1);
    call::pcall(&args[0], rest).map(Ret::Many)
}

fn native_ipairs(iter: &Value, args: Vec<Value>) -> LuaResult<Ret> {
    let table = coerce::checktable(&arg(&args, 0)).arg(1, "ipairs")?;
    Ok(Ret::Many(vec![iter.clone(), Value::Table(table), Value::from(0)]))
}

fn native_ipairs_iter(args: Vec<Value>) -> LuaResult<Ret> {
    let index = coerce::checkinteger(&arg(&args, 1)).arg(2, "ipairs_iter")? + 1;
    let key = Value::from(index);
    let value = dispatch::gettable(&arg(&args, 0), &key)?;
    if value.is_nil() {
        Ok(Ret::none())
    } else {
        Ok(Ret::Many(vec![key, value]))
    }
}

fn native_select(mut args: Vec<Value>) -> LuaResult<Ret> {
    if args.is_empty() {
        return Err(value_expected(1, "select"));
    }
    let rest = args.split_off(1);
    if matches!(&args[0], Value::String(s) if s.as_str() == "#") {
        return Ok(Ret::Single(Value::from(rest.len())));
    }
    let n = coerce::checkinteger(&args[0]).arg(1, "select")?;
    let start = relative_start(n, rest.len());
    Ok(Ret::Many(rest.into_iter().skip(start).collect()))
}

/// 0-based start of the suffix named by a 1-based, possibly negative index.
/// Zero and negative indices reaching past the first argument select all.
fn relative_start(n: i64, count: usize) -> usize {
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let start = match n {
        n if n < 0 => n.saturating_add(count).max(0),
        0 => 0,
        n => n - 1,
    };
    usize::try_from(start).unwrap_or(usize::MAX)
}

fn native_type(args: Vec<Value>) -> LuaResult<Ret> {
    match args.first() {
        Some(v) => Ok(Ret::Single(Value::from(v.type_name()))),
        None => Err(value_expected(1, "type")),
    }
}

fn native_tostring(args: Vec<Value>) -> LuaResult<Ret> {
    match args.first() {
        Some(v) => Ok(Ret::Single(Value::String(dispatch::tostring(v)?))),
        None => Err(value_expected(1, "tostring")),
    }
}

fn native_tonumber(args: Vec<Value>) -> LuaResult<Ret> {
    match args.first() {
        Some(v) => Ok(Ret::Single(Value::from(coerce::tonumber(v)))),
        None => Err(value_expected(1, "tonumber")),
    }
}

fn native_setmetatable(args: Vec<Value>) -> LuaResult<Ret> {
    let target = arg(&args, 0);
    let mt = arg(&args, 1);
    if !(mt.is_nil() || mt.is_table()) {
        return Err(LuaError::runtime(
            "bad argument #2 to 'setmetatable' (nil or table expected)",
        ));
    }
    coerce::checktable(&target).arg(1, "setmetatable")?;
    metamethod::setmetatable(&target, &mt).map(Ret::Single)
}

fn native_getmetatable(args: Vec<Value>) -> LuaResult<Ret> {
    Ok(Ret::Single(metamethod::getmetatable(&arg(&args, 0))))
}

fn native_rawget(args: Vec<Value>) -> LuaResult<Ret> {
    let table = coerce::checktable(&arg(&args, 0)).arg(1, "rawget")?;
    Ok(Ret::Single(table.raw_get(&arg(&args, 1))))
}

fn native_rawset(args: Vec<Value>) -> LuaResult<Ret> {
    let table = coerce::checktable(&arg(&args, 0)).arg(1, "rawset")?;
    table.raw_set(arg(&args, 1), arg(&args, 2))?;
    Ok(Ret::Single(Value::Table(table)))
}

fn native_rawequal(args: Vec<Value>) -> LuaResult<Ret> {
    Ok(Ret::Single(Value::from(arg(&args, 0) == arg(&args, 1))))
}

fn native_rawlen(args: Vec<Value>) -> LuaResult<Ret> {
    match arg(&args, 0) {
        Value::Table(t) => Ok(Ret::Single(Value::from(t.length()))),
        Value::String(s) => Ok(Ret::Single(Value::from(string_buffer(&s).len()))),
        _ => Err(LuaError::runtime(
            "bad argument #1 to 'rawlen' (table or string expected)",
        )),
    }
}

fn native_print(sink: &Sink, args: Vec<Value>) -> LuaResult<Ret> {
    let parts = args
        .iter()
        .map(|v| dispatch::tostring(v).map(|s| s.as_str().to_string()))
        .collect::<LuaResult<Vec<_>>>()?;
    let mut line = parts.join("\t");
    line.push('\n');
    let mut out = sink
        .try_borrow_mut()
        .map_err(|_| LuaError::internal("print sink is already borrowed"))?;
    out.write_all(line.as_bytes())?;
    out.flush()?;
    Ok(Ret::none())
}
