//! Hybrid array+hash table for Lua.

use crate::error::{LuaError, LuaResult};
use crate::function::Function;
use crate::string::LuaStr;
use crate::value::{float_to_integer, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A key in the hash part of a table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TableKey {
    /// Number key, stored as raw bits with `-0.0` folded into `0.0`.
    Number(u64),
    Boolean(bool),
    String(LuaStr),
    /// Table key, hashed by identity.
    Table(TableRef),
    /// Function key, hashed by identity.
    Function(FunctionKey),
}

/// Identity wrapper so functions can be used as hash keys.
#[derive(Clone, Debug)]
pub struct FunctionKey(Function);

impl PartialEq for FunctionKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl Eq for FunctionKey {}

impl Hash for FunctionKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.addr().hash(state);
    }
}

impl TableKey {
    /// Convert a value to a hash key. Nil and NaN have no key form.
    pub fn from_value(v: &Value) -> Option<TableKey> {
        match v {
            Value::Nil => None,
            Value::Number(n) if n.is_nan() => None,
            Value::Number(n) => {
                let n = if *n == 0.0 { 0.0 } else { *n };
                Some(TableKey::Number(n.to_bits()))
            }
            Value::Boolean(b) => Some(TableKey::Boolean(*b)),
            Value::String(s) => Some(TableKey::String(s.clone())),
            Value::Table(t) => Some(TableKey::Table(t.clone())),
            Value::Function(f) => Some(TableKey::Function(FunctionKey(f.clone()))),
        }
    }
}

/// A Lua table: hybrid array + hash map, plus an optional metatable.
pub struct Table {
    /// Array part (1-indexed: array[0] corresponds to key 1).
    array: Vec<Value>,
    /// Hash part for non-sequential keys.
    hash: IndexMap<TableKey, Value>,
    metatable: Option<TableRef>,
}

impl Table {
    /// Create a new empty table with size hints.
    pub fn new(array_hint: usize, hash_hint: usize) -> Self {
        Table {
            array: Vec::with_capacity(array_hint),
            hash: IndexMap::with_capacity(hash_hint),
            metatable: None,
        }
    }

    /// Raw get by value key. Absent keys (including nil and NaN) read as nil.
    pub fn raw_get(&self, key: &Value) -> Value {
        if let Some(idx) = array_slot(key) {
            if idx < self.array.len() {
                return self.array[idx].clone();
            }
        }
        match TableKey::from_value(key) {
            Some(tk) => self.hash.get(&tk).cloned().unwrap_or_default(),
            None => Value::Nil,
        }
    }

    /// Raw set by value key. A nil value deletes the entry.
    pub fn raw_set(&mut self, key: Value, value: Value) -> LuaResult<()> {
        let tk = TableKey::from_value(&key).ok_or_else(|| {
            if key.is_nil() {
                LuaError::runtime("table index is nil")
            } else {
                LuaError::runtime("table index is NaN")
            }
        })?;

        if let Some(idx) = array_slot(&key) {
            if idx < self.array.len() {
                self.array[idx] = value;
                self.trim_array();
                return Ok(());
            }
            // Extend array if appending
            if idx == self.array.len() && !value.is_nil() {
                self.hash.swap_remove(&tk);
                self.array.push(value);
                // Move hash entries that are now in array range
                self.rehash_from_hash_to_array();
                return Ok(());
            }
        }

        if value.is_nil() {
            self.hash.swap_remove(&tk);
        } else {
            self.hash.insert(tk, value);
        }
        Ok(())
    }

    /// Fast integer get (1-indexed).
    pub fn raw_geti(&self, key: i64) -> Value {
        self.raw_get(&Value::from(key))
    }

    /// Fast integer set (1-indexed).
    pub fn raw_seti(&mut self, key: i64, value: Value) {
        // An integer key is never nil or NaN.
        let _ = self.raw_set(Value::from(key), value);
    }

    /// Fast string key get.
    pub fn raw_get_str(&self, key: &LuaStr) -> Value {
        self.hash
            .get(&TableKey::String(key.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Get the "length" of a table (boundary for array part).
    /// Returns the largest n such that t[n] is non-nil and t[n+1] is nil.
    pub fn length(&self) -> i64 {
        if self.array.is_empty() {
            return 0;
        }
        // If last element is non-nil, length = array.len()
        if self.array.last().is_some_and(|v| !v.is_nil()) {
            return self.array.len() as i64;
        }
        // Binary search for boundary
        let mut lo = 0usize;
        let mut hi = self.array.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.array[mid].is_nil() {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo as i64
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.array.iter().filter(|v| !v.is_nil()).count() + self.hash.len()
    }

    pub fn metatable(&self) -> Option<&TableRef> {
        self.metatable.as_ref()
    }

    pub fn set_metatable(&mut self, metatable: Option<TableRef>) {
        self.metatable = metatable;
    }

    /// Move consecutive integer entries from hash into array.
    fn rehash_from_hash_to_array(&mut self) {
        loop {
            let next_key = TableKey::Number(((self.array.len() + 1) as f64).to_bits());
            match self.hash.swap_remove(&next_key) {
                Some(v) => self.array.push(v),
                None => break,
            }
        }
    }

    /// Trim trailing nil values from the array part.
    fn trim_array(&mut self) {
        while self.array.last().is_some_and(|v| v.is_nil()) {
            self.array.pop();
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::new(0, 0)
    }
}

/// 0-based array slot for a positive integral number key.
fn array_slot(key: &Value) -> Option<usize> {
    let i = key.as_number().and_then(float_to_integer)?;
    if i >= 1 {
        usize::try_from(i - 1).ok()
    } else {
        None
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "table(array={}, hash={})",
            self.array.len(),
            self.hash.len()
        )
    }
}

/// Shared, mutable handle to a table. Equality and hashing use identity.
///
/// Borrows of the underlying table never outlive a single raw operation, so
/// metamethods may freely re-enter the same table.
#[derive(Clone, Default)]
pub struct TableRef(Rc<RefCell<Table>>);

impl TableRef {
    pub fn new() -> Self {
        TableRef::default()
    }

    pub fn with_capacity(array_hint: usize, hash_hint: usize) -> Self {
        TableRef(Rc::new(RefCell::new(Table::new(array_hint, hash_hint))))
    }

    pub fn raw_get(&self, key: &Value) -> Value {
        self.0.borrow().raw_get(key)
    }

    pub fn raw_set(&self, key: impl Into<Value>, value: impl Into<Value>) -> LuaResult<()> {
        let mut table = self
            .0
            .try_borrow_mut()
            .map_err(|_| LuaError::internal("table is already borrowed"))?;
        table.raw_set(key.into(), value.into())
    }

    pub fn raw_geti(&self, key: i64) -> Value {
        self.0.borrow().raw_geti(key)
    }

    pub fn raw_get_str(&self, key: &LuaStr) -> Value {
        self.0.borrow().raw_get_str(key)
    }

    pub fn length(&self) -> i64 {
        self.0.borrow().length()
    }

    pub fn count(&self) -> usize {
        self.0.borrow().count()
    }

    /// The attached metatable, without `__metatable` substitution.
    pub fn metatable(&self) -> Option<TableRef> {
        self.0.borrow().metatable().cloned()
    }

    pub fn set_metatable(&self, metatable: Option<TableRef>) {
        self.0.borrow_mut().set_metatable(metatable);
    }

    #[inline]
    pub fn ptr_eq(&self, other: &TableRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared table, used as its identity.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for TableRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for TableRef {}

impl Hash for TableRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl std::fmt::Debug for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{:#x}", self.0.borrow(), self.addr())
    }
}
