//! lunet core types: values, tables, strings, and fundamental data structures.

pub mod error;
pub mod function;
pub mod string;
pub mod table;
pub mod value;

pub use error::{LuaError, LuaResult};
pub use function::{Function, Ret};
pub use string::LuaStr;
pub use table::{Table, TableRef};
pub use value::Value;
