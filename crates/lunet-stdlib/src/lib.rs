//! lunet standard library: the base and string libraries, and construction
//! of the global environment they are installed into.

pub mod base_lib;
pub mod string_lib;

use lunet_core::{Function, LuaError, LuaResult, Ret, TableRef, Value};
use lunet_runtime::config::config;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use tracing::debug;

/// Destination of `print` output.
pub type Sink = Rc<RefCell<dyn Write>>;

/// Build a global environment whose `print` writes to stdout.
pub fn open() -> LuaResult<TableRef> {
    let sink: Sink = Rc::new(RefCell::new(std::io::stdout()));
    open_with_sink(sink)
}

/// Build a global environment whose `print` writes to `sink`.
///
/// The environment holds `_G` (itself), `_VERSION`, the base functions, and
/// the `string` table. The string table also becomes the `__index` of the
/// shared string metatable, so `("x"):len()` style access works.
pub fn open_with_sink(sink: Sink) -> LuaResult<TableRef> {
    let env = TableRef::new();
    env.raw_set("_G", env.clone())?;
    env.raw_set("_VERSION", config().version.as_str())?;
    base_lib::register(&env, sink)?;
    string_lib::register(&env)?;
    debug!(target: "lunet::stdlib", version = %config().version, "environment opened");
    Ok(env)
}

/// Install a native function under `name`.
pub(crate) fn register_fn<F>(table: &TableRef, name: &'static str, func: F) -> LuaResult<()>
where
    F: Fn(Vec<Value>) -> LuaResult<Ret> + 'static,
{
    table.raw_set(name, Function::new(name, func))
}

/// Attach argument position and function name to a checked failure.
pub(crate) trait ArgCheck<T> {
    fn arg(self, pos: usize, fname: &str) -> LuaResult<T>;
}

impl<T> ArgCheck<T> for LuaResult<T> {
    fn arg(self, pos: usize, fname: &str) -> LuaResult<T> {
        self.map_err(|err| match err {
            LuaError::Runtime(Value::String(reason)) => {
                LuaError::runtime(format!("bad argument #{pos} to '{fname}' ({reason})"))
            }
            other => other,
        })
    }
}

/// Error for a required argument that was not passed at all.
pub(crate) fn value_expected(pos: usize, fname: &str) -> LuaError {
    LuaError::runtime(format!("bad argument #{pos} to '{fname}' (value expected)"))
}
