//! The calling convention: single-value, multi-value and statement calls.
//!
//! A non-function callee is resolved through its `__call` metafield, with
//! the callee itself prepended to the arguments. Native results are then
//! normalized to the shape the call site asked for.

use crate::config::config;
use crate::metamethod::{get_metafield, MetaEvent};
use lunet_core::{LuaError, LuaResult, Ret, Value};
use std::cell::Cell;
use tracing::{debug, trace, warn};

thread_local! {
    static CALL_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Tracks one level of call nesting for as long as it is alive.
struct DepthGuard;

impl DepthGuard {
    fn enter() -> LuaResult<Self> {
        let limit = config().limits.max_call_depth;
        CALL_DEPTH.with(|depth| {
            let current = depth.get();
            if current >= limit {
                warn!(target: "lunet::call", depth = current, "call depth limit reached");
                return Err(LuaError::runtime("stack overflow"));
            }
            depth.set(current + 1);
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        CALL_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Current call nesting on this thread.
pub fn call_depth() -> usize {
    CALL_DEPTH.with(Cell::get)
}

fn invoke(callee: &Value, args: Vec<Value>) -> LuaResult<Ret> {
    let _guard = DepthGuard::enter()?;
    if let Some(f) = callee.as_function() {
        return f.invoke(args);
    }
    match get_metafield(callee, MetaEvent::Call) {
        Value::Function(handler) => {
            trace!(target: "lunet::call", callee = callee.type_name(), "dispatching __call");
            let mut full = Vec::with_capacity(args.len() + 1);
            full.push(callee.clone());
            full.extend(args);
            handler.invoke(full)
        }
        _ => Err(LuaError::runtime(format!(
            "attempt to call a {} value",
            callee.type_name()
        ))),
    }
}

/// Multi-value call: the full result sequence.
pub fn call(callee: &Value, args: Vec<Value>) -> LuaResult<Vec<Value>> {
    invoke(callee, args).map(Ret::into_vec)
}

/// Single-value call: the first result, or nil.
pub fn call1(callee: &Value, args: Vec<Value>) -> LuaResult<Value> {
    invoke(callee, args).map(Ret::first)
}

/// Statement call: results are discarded.
pub fn call0(callee: &Value, args: Vec<Value>) -> LuaResult<()> {
    invoke(callee, args).map(drop)
}

/// Protected call.
///
/// On success yields `true` followed by every result. A recoverable error is
/// turned into `false` followed by its payload; any other error propagates.
pub fn pcall(callee: &Value, args: Vec<Value>) -> LuaResult<Vec<Value>> {
    match call(callee, args) {
        Ok(results) => {
            let mut out = Vec::with_capacity(results.len() + 1);
            out.push(Value::Boolean(true));
            out.extend(results);
            Ok(out)
        }
        Err(LuaError::Runtime(payload)) => {
            debug!(target: "lunet::call", payload = ?payload, "pcall caught error");
            Ok(vec![Value::Boolean(false), payload])
        }
        Err(err) => Err(err),
    }
}
