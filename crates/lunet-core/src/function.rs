//! Native callables and the one-or-many return convention.

use crate::error::LuaResult;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Signature of a native function: variadic arguments in, one or many values out.
pub type NativeFn = dyn Fn(Vec<Value>) -> LuaResult<Ret>;

/// What a native function returns.
///
/// Call sites normalize this according to their context: a single-value
/// context takes the first element of `Many`, a multi-value context wraps
/// `Single` into a one-element sequence.
#[derive(Clone, Debug)]
pub enum Ret {
    Single(Value),
    Many(Vec<Value>),
}

impl Ret {
    /// An empty result sequence.
    pub fn none() -> Self {
        Ret::Many(Vec::new())
    }

    /// Single-value view: the scalar, or the first element (nil if empty).
    pub fn first(self) -> Value {
        match self {
            Ret::Single(v) => v,
            Ret::Many(vs) => vs.into_iter().next().unwrap_or_default(),
        }
    }

    /// Multi-value view: always a sequence.
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Ret::Single(v) => vec![v],
            Ret::Many(vs) => vs,
        }
    }
}

impl From<Value> for Ret {
    fn from(v: Value) -> Self {
        Ret::Single(v)
    }
}

impl From<Vec<Value>> for Ret {
    fn from(vs: Vec<Value>) -> Self {
        Ret::Many(vs)
    }
}

/// A native (Rust) function callable from generated code.
pub struct NativeFunction {
    pub name: &'static str,
    func: Box<NativeFn>,
}

/// Shared handle to a native function. Equality is reference identity.
#[derive(Clone)]
pub struct Function(Rc<NativeFunction>);

impl Function {
    pub fn new<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> LuaResult<Ret> + 'static,
    {
        Function(Rc::new(NativeFunction {
            name,
            func: Box::new(func),
        }))
    }

    pub fn name(&self) -> &'static str {
        self.0.name
    }

    /// Invoke the function directly, without call-depth accounting.
    /// Generated code goes through the runtime's `call` adapters instead.
    pub fn invoke(&self, args: Vec<Value>) -> LuaResult<Ret> {
        (self.0.func)(args)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared function object, used as its identity.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function: builtin: {}", self.0.name)
    }
}

/// Fetch argument `idx` (0-based), or nil when absent.
#[inline]
pub fn arg(args: &[Value], idx: usize) -> Value {
    args.get(idx).cloned().unwrap_or_default()
}
