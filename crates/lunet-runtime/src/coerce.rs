//! String-to-number conversion and the argument checkers.

use lunet_core::value::{float_to_integer, format_number};
use lunet_core::{LuaError, LuaResult, LuaStr, TableRef, Value};

/// Whitespace accepted around a numeric literal: the ASCII `isspace` set.
/// Unicode spaces such as U+00A0 and U+FEFF are not trimmed.
const LUA_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0b', '\x0c'];

/// `tonumber` semantics: numbers pass through, strings are parsed, and
/// everything else yields `None`.
pub fn tonumber(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => Some(*n),
        Value::String(s) => str_to_number(s),
        _ => None,
    }
}

/// Parse a numeric literal with optional surrounding whitespace.
///
/// Accepted forms, each with an optional sign: decimal integers, hex
/// integers (`0x1A`), and decimal floats with optional fraction and
/// exponent. Anything else, including hex floats and `inf`/`nan`, is
/// rejected.
pub fn str_to_number(s: &str) -> Option<f64> {
    let s = s.trim_matches(LUA_WHITESPACE);
    if s.is_empty() {
        return None;
    }
    if is_decimal_integer(s) {
        return s.parse::<f64>().ok();
    }
    if let Some(n) = parse_hex_integer(s) {
        return Some(n);
    }
    if is_decimal_float(s) {
        return s.parse::<f64>().ok();
    }
    None
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

fn is_decimal_integer(s: &str) -> bool {
    let (_, digits) = split_sign(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_hex_integer(s: &str) -> Option<f64> {
    let (negative, rest) = split_sign(s);
    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    let mut acc = 0.0f64;
    for c in digits.chars() {
        acc = acc * 16.0 + f64::from(c.to_digit(16)?);
    }
    Some(if negative { -acc } else { acc })
}

fn is_decimal_float(s: &str) -> bool {
    let (_, rest) = split_sign(s);
    let bytes = rest.as_bytes();
    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut i = 0;
    let int_digits = count_digits(i);
    i += int_digits;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        frac_digits = count_digits(i);
        i += frac_digits;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_digits = count_digits(i);
        if exp_digits == 0 {
            return false;
        }
        i += exp_digits;
    }
    i == bytes.len()
}

/// The value as a number, coercing numeric strings.
pub fn checknumber(v: &Value) -> LuaResult<f64> {
    tonumber(v).ok_or_else(|| {
        LuaError::runtime(format!("number expected, got {}", v.type_name()))
    })
}

/// The value as an integer; numbers with a fractional part are rejected.
pub fn checkinteger(v: &Value) -> LuaResult<i64> {
    let n = checknumber(v)?;
    float_to_integer(n)
        .ok_or_else(|| LuaError::runtime("number has no integer representation"))
}

/// The value as a string. Numbers are converted to their text form.
pub fn checkstring(v: &Value) -> LuaResult<LuaStr> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(LuaStr::from(format_number(*n))),
        _ => Err(LuaError::runtime(format!(
            "string expected, got {}",
            v.type_name()
        ))),
    }
}

pub fn checktable(v: &Value) -> LuaResult<TableRef> {
    match v {
        Value::Table(t) => Ok(t.clone()),
        _ => Err(LuaError::runtime(format!(
            "table expected, got {}",
            v.type_name()
        ))),
    }
}

/// `default` when the value is nil, otherwise [`checkinteger`].
pub fn optinteger(v: &Value, default: i64) -> LuaResult<i64> {
    if v.is_nil() {
        Ok(default)
    } else {
        checkinteger(v)
    }
}
