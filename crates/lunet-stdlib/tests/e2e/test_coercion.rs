use super::helpers::*;
use lunet_core::Value;

fn tonumber(env: &TestEnv, v: Value) -> Value {
    env.call("tonumber", vec![v]).remove(0)
}

#[test]
fn test_tonumber_hex() {
    let env = TestEnv::new();
    assert_eq!(tonumber(&env, Value::from("0x1A")), Value::from(26));
    assert_eq!(tonumber(&env, Value::from("-0Xff")), Value::from(-255));
}

#[test]
fn test_tonumber_whitespace() {
    let env = TestEnv::new();
    assert_eq!(tonumber(&env, Value::from("  42 ")), Value::from(42));
    assert_eq!(tonumber(&env, Value::from("\t7\n")), Value::from(7));
}

#[test]
fn test_tonumber_float_forms() {
    let env = TestEnv::new();
    assert_eq!(tonumber(&env, Value::from("3.5e2")), Value::from(350));
    assert_eq!(tonumber(&env, Value::from(".25")), Value::from(0.25));
    assert_eq!(tonumber(&env, Value::from("1e-3")), Value::from(0.001));
}

#[test]
fn test_tonumber_absent() {
    let env = TestEnv::new();
    for s in ["abc", "", "0x", "1e", "12abc", "1..2"] {
        assert!(tonumber(&env, Value::from(s)).is_nil(), "accepted {s:?}");
    }
    assert!(tonumber(&env, Value::from(true)).is_nil());
    assert!(tonumber(&env, Value::new_table()).is_nil());
}

#[test]
fn test_tonumber_number_passthrough() {
    let env = TestEnv::new();
    assert_eq!(tonumber(&env, Value::from(1.5)), Value::from(1.5));
}

#[test]
fn test_numeric_string_arguments() {
    let env = TestEnv::new();
    let out = env.call("select", vec![Value::from(" 2 "), Value::from("a"), Value::from("b")]);
    assert_eq!(out, vec![Value::from("b")]);
    let out = env.call("tostring", vec![Value::from(1e21)]);
    assert_str(&out, 0, "1e+21");
}

#[test]
fn test_integer_representation_required() {
    let env = TestEnv::new();
    let msg = env.call_err("select", vec![Value::from(1.5), Value::from("a")]);
    assert_eq!(msg, "bad argument #1 to 'select' (number has no integer representation)");
}
