//! lunet runtime: the dynamic-dispatch layer generated code calls into.
//!
//! Table access goes through [`gettable`]/[`settable`], calls through
//! [`call`]/[`call1`]/[`call0`], and comparisons through [`eq`]/[`lt`]/[`le`].
//! Every operation consults the metatable chain the way the scripting
//! language prescribes.

pub mod call;
pub mod coerce;
pub mod compare;
pub mod config;
pub mod dispatch;
pub mod metamethod;

pub use call::{call, call0, call1, pcall};
pub use coerce::{checkinteger, checknumber, checkstring, checktable, optinteger, tonumber};
pub use compare::{eq, le, lt};
pub use dispatch::{gettable, len, setlist, settable, tostring};
pub use metamethod::{get_metafield, getmetatable, setmetatable, MetaEvent};
