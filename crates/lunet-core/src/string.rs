//! Lua strings, the shared string metatable, and the byte-buffer cache.
//!
//! String values hold immutable UTF-8 text. Byte-indexed operations
//! (`len`, `string.byte`, `string.sub`) work on the encoded byte view of a
//! string, obtained through [`string_buffer`]. Recently used views are kept
//! in a small cache bounded to [`BYTE_CACHE_CAPACITY`] entries and evicted in
//! first-seen order; touching a cached string moves it to the back.
//!
//! Both the cache and the string metatable are per-thread state. The runtime
//! is single-threaded, so each thread that calls into it sees one of each.

use crate::table::TableRef;
use indexmap::IndexMap;
use std::borrow::Borrow;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;
use tracing::trace;

/// Maximum number of byte views kept by the cache.
pub const BYTE_CACHE_CAPACITY: usize = 16;

/// An immutable, cheaply cloneable Lua string. Compares by content.
#[derive(Clone)]
pub struct LuaStr(Rc<str>);

impl LuaStr {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for LuaStr {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LuaStr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq for LuaStr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for LuaStr {}

impl PartialOrd for LuaStr {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Byte-wise ordering, which is what string comparison uses.
impl Ord for LuaStr {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.as_bytes().cmp(other.0.as_bytes())
    }
}

impl Hash for LuaStr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for LuaStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for LuaStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LuaStr {
    fn from(s: &str) -> Self {
        LuaStr(Rc::from(s))
    }
}

impl From<String> for LuaStr {
    fn from(s: String) -> Self {
        LuaStr(Rc::from(s))
    }
}

/// Decode a byte sequence as UTF-8, replacing invalid sequences with U+FFFD.
pub fn decode_utf8(bytes: &[u8]) -> LuaStr {
    LuaStr::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Bounded cache of encoded byte views, evicted in first-seen order.
pub struct ByteCache {
    entries: IndexMap<LuaStr, Rc<[u8]>>,
    capacity: usize,
}

impl ByteCache {
    pub fn new(capacity: usize) -> Self {
        ByteCache {
            entries: IndexMap::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Get the byte view of `s`, encoding it on a miss. A hit refreshes the
    /// entry's position so it is evicted last.
    pub fn get(&mut self, s: &LuaStr) -> Rc<[u8]> {
        let buffer = self
            .entries
            .shift_remove(s.as_str())
            .unwrap_or_else(|| Rc::from(s.as_bytes()));
        self.entries.insert(s.clone(), Rc::clone(&buffer));
        if self.entries.len() > self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                trace!(target: "lunet::strings", len = evicted.len(), "evicted byte buffer");
            }
        }
        buffer
    }

    pub fn contains(&self, s: &str) -> bool {
        self.entries.contains_key(s)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached strings, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &LuaStr> {
        self.entries.keys()
    }
}

thread_local! {
    static STRING_BUFFERS: RefCell<ByteCache> = RefCell::new(ByteCache::new(BYTE_CACHE_CAPACITY));
    static STRING_METATABLE: TableRef = TableRef::new();
}

/// The UTF-8 byte view of a string, served from the shared cache.
pub fn string_buffer(s: &LuaStr) -> Rc<[u8]> {
    STRING_BUFFERS.with(|cache| cache.borrow_mut().get(s))
}

/// Run `f` against the shared byte-buffer cache.
pub fn with_byte_cache<R>(f: impl FnOnce(&ByteCache) -> R) -> R {
    STRING_BUFFERS.with(|cache| f(&cache.borrow()))
}

/// The metatable shared by every string value.
pub fn string_metatable() -> TableRef {
    STRING_METATABLE.with(TableRef::clone)
}
