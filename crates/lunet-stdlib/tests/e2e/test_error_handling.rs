use super::helpers::*;
use lunet_core::{LuaError, Ret, Value};

// ---- pcall ----

#[test]
fn test_pcall_success_results() {
    let env = TestEnv::new();
    let f = native(|args| Ok(Ret::Many(args)));
    let out = env.call("pcall", vec![f, Value::from(1), Value::from("two")]);
    assert_eq!(out, vec![Value::from(true), Value::from(1), Value::from("two")]);
}

#[test]
fn test_pcall_catches_error_string() {
    let env = TestEnv::new();
    let out = env.call("pcall", vec![env.global("error"), Value::from("boom")]);
    assert_eq!(out, vec![Value::from(false), Value::from("boom")]);
}

#[test]
fn test_pcall_preserves_table_payload() {
    let env = TestEnv::new();
    let payload = Value::new_table();
    let out = env.call("pcall", vec![raising(payload.clone())]);
    assert_bool(&out, 0, false);
    assert_eq!(out[1], payload);
}

#[test]
fn test_pcall_catches_dispatch_errors() {
    let env = TestEnv::new();
    let out = env.call("pcall", vec![Value::from(1)]);
    assert_bool(&out, 0, false);
    assert_str(&out, 1, "attempt to call a number value");
}

#[test]
fn test_pcall_does_not_catch_internal() {
    let env = TestEnv::new();
    let fatal = native(|_| Err(LuaError::internal("corrupted")));
    let err = env.try_call("pcall", vec![fatal]).unwrap_err();
    assert!(!err.is_recoverable());
    assert_eq!(err.to_string(), "internal error: corrupted");
}

#[test]
fn test_nested_pcall() {
    let env = TestEnv::new();
    let pcall = env.global("pcall");
    let inner = raising(Value::from("inner"));
    let out = env.call("pcall", vec![pcall, inner]);
    assert_eq!(
        out,
        vec![Value::from(true), Value::from(false), Value::from("inner")]
    );
}

#[test]
fn test_pcall_without_function() {
    let env = TestEnv::new();
    let msg = env.call_err("pcall", vec![]);
    assert_eq!(msg, "bad argument #1 to 'pcall' (value expected)");
}

// ---- error / assert ----

#[test]
fn test_error_payload_verbatim() {
    let env = TestEnv::new();
    let err = env.try_call("error", vec![Value::from(42)]).unwrap_err();
    assert_eq!(err.payload(), Some(&Value::from(42)));
    assert_eq!(err.to_string(), "42");
}

#[test]
fn test_error_non_string_display() {
    let env = TestEnv::new();
    let msg = env.call_err("error", vec![Value::new_table()]);
    assert_eq!(msg, "(error object is a table value)");
}

#[test]
fn test_assert_returns_all_args() {
    let env = TestEnv::new();
    let out = env.call("assert", vec![Value::from(1), Value::from(2), Value::from(3)]);
    assert_eq!(out, vec![Value::from(1), Value::from(2), Value::from(3)]);
}

#[test]
fn test_assert_failure_messages() {
    let env = TestEnv::new();
    assert_eq!(env.call_err("assert", vec![Value::from(false)]), "assertion failed!");
    assert_eq!(env.call_err("assert", vec![Value::Nil, Value::from("custom")]), "custom");
}

#[test]
fn test_assert_under_pcall() {
    let env = TestEnv::new();
    let payload = Value::new_table();
    let out = env.call(
        "pcall",
        vec![env.global("assert"), Value::from(false), payload.clone()],
    );
    assert_eq!(out, vec![Value::from(false), payload]);
}

#[test]
fn test_zero_is_truthy_for_assert() {
    let env = TestEnv::new();
    let out = env.call("assert", vec![Value::from(0)]);
    assert_num(&out, 0, 0.0);
}
