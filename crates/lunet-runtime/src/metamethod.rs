//! Metatable lookup and the metatable-manipulation primitives.

use lunet_core::string::string_metatable;
use lunet_core::{LuaError, LuaResult, LuaStr, TableRef, Value};

/// Events the runtime dispatches through metatables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaEvent {
    Index,
    NewIndex,
    Call,
    Eq,
    Lt,
    Le,
    Len,
    ToString,
    Metatable,
}

impl MetaEvent {
    pub fn name(self) -> &'static str {
        match self {
            MetaEvent::Index => "__index",
            MetaEvent::NewIndex => "__newindex",
            MetaEvent::Call => "__call",
            MetaEvent::Eq => "__eq",
            MetaEvent::Lt => "__lt",
            MetaEvent::Le => "__le",
            MetaEvent::Len => "__len",
            MetaEvent::ToString => "__tostring",
            MetaEvent::Metatable => "__metatable",
        }
    }
}

/// Pre-built metafield keys, so lookups never allocate.
pub struct MetamethodNames {
    pub index: LuaStr,
    pub newindex: LuaStr,
    pub call: LuaStr,
    pub eq: LuaStr,
    pub lt: LuaStr,
    pub le: LuaStr,
    pub len: LuaStr,
    pub tostring: LuaStr,
    pub metatable: LuaStr,
}

impl MetamethodNames {
    pub fn init() -> Self {
        MetamethodNames {
            index: LuaStr::from(MetaEvent::Index.name()),
            newindex: LuaStr::from(MetaEvent::NewIndex.name()),
            call: LuaStr::from(MetaEvent::Call.name()),
            eq: LuaStr::from(MetaEvent::Eq.name()),
            lt: LuaStr::from(MetaEvent::Lt.name()),
            le: LuaStr::from(MetaEvent::Le.name()),
            len: LuaStr::from(MetaEvent::Len.name()),
            tostring: LuaStr::from(MetaEvent::ToString.name()),
            metatable: LuaStr::from(MetaEvent::Metatable.name()),
        }
    }

    pub fn get(&self, event: MetaEvent) -> &LuaStr {
        match event {
            MetaEvent::Index => &self.index,
            MetaEvent::NewIndex => &self.newindex,
            MetaEvent::Call => &self.call,
            MetaEvent::Eq => &self.eq,
            MetaEvent::Lt => &self.lt,
            MetaEvent::Le => &self.le,
            MetaEvent::Len => &self.len,
            MetaEvent::ToString => &self.tostring,
            MetaEvent::Metatable => &self.metatable,
        }
    }
}

thread_local! {
    static NAMES: MetamethodNames = MetamethodNames::init();
}

/// The metatable of a value: a table's own, or the shared string metatable.
pub fn metatable_of(v: &Value) -> Option<TableRef> {
    match v {
        Value::Table(t) => t.metatable(),
        Value::String(_) => Some(string_metatable()),
        _ => None,
    }
}

/// Raw lookup of `event` in the metatable of `v`; nil when absent.
pub fn get_metafield(v: &Value, event: MetaEvent) -> Value {
    match metatable_of(v) {
        Some(mt) => NAMES.with(|names| mt.raw_get_str(names.get(event))),
        None => Value::Nil,
    }
}

/// `getmetatable` semantics: a `__metatable` field masks the real metatable.
pub fn getmetatable(v: &Value) -> Value {
    let Some(mt) = metatable_of(v) else {
        return Value::Nil;
    };
    let guard = NAMES.with(|names| mt.raw_get_str(&names.metatable));
    if guard.is_nil() {
        Value::Table(mt)
    } else {
        guard
    }
}

/// `setmetatable` semantics. Returns the table.
///
/// The metatable argument is validated before the target, and a target whose
/// current metatable carries `__metatable` cannot be changed.
pub fn setmetatable(table: &Value, metatable: &Value) -> LuaResult<Value> {
    let new_mt = match metatable {
        Value::Nil => None,
        Value::Table(mt) => Some(mt.clone()),
        _ => return Err(LuaError::runtime("nil or table expected")),
    };
    if !get_metafield(table, MetaEvent::Metatable).is_nil() {
        return Err(LuaError::runtime("cannot change a protected metatable"));
    }
    let Value::Table(t) = table else {
        return Err(LuaError::runtime(format!(
            "table expected, got {}",
            table.type_name()
        )));
    };
    t.set_metatable(new_mt);
    Ok(table.clone())
}
