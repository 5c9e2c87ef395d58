use super::helpers::*;
use lunet_core::Value;
use lunet_runtime::{call, gettable};

// ---- environment ----

#[test]
fn test_env_self_reference() {
    let env = TestEnv::new();
    assert_eq!(env.global("_G"), env.env);
    assert_eq!(env.global("_VERSION"), Value::from("Lua 5.3"));
}

// ---- select ----

#[test]
fn test_select_count() {
    let env = TestEnv::new();
    let out = env.call("select", vec![Value::from("#"), Value::from("a"), Value::from("b"), Value::from("c")]);
    assert_eq!(out.len(), 1);
    assert_num(&out, 0, 3.0);
}

#[test]
fn test_select_count_nils() {
    let env = TestEnv::new();
    let out = env.call("select", vec![Value::from("#"), Value::Nil, Value::Nil]);
    assert_num(&out, 0, 2.0);
}

#[test]
fn test_select_negative() {
    let env = TestEnv::new();
    let out = env.call("select", vec![Value::from(-1), Value::from("a"), Value::from("b"), Value::from("c")]);
    assert_eq!(out, vec![Value::from("c")]);
}

#[test]
fn test_select_suffix() {
    let env = TestEnv::new();
    let out = env.call("select", vec![Value::from(2), Value::from("a"), Value::from("b"), Value::from("c")]);
    assert_eq!(out, vec![Value::from("b"), Value::from("c")]);
}

#[test]
fn test_select_past_end() {
    let env = TestEnv::new();
    let out = env.call("select", vec![Value::from(5), Value::from("a")]);
    assert!(out.is_empty());
}

#[test]
fn test_select_numeric_string() {
    let env = TestEnv::new();
    let out = env.call("select", vec![Value::from("2"), Value::from("a"), Value::from("b")]);
    assert_eq!(out, vec![Value::from("b")]);
}

#[test]
fn test_select_bad_selector() {
    let env = TestEnv::new();
    let msg = env.call_err("select", vec![Value::from("x"), Value::from(1)]);
    assert_eq!(msg, "bad argument #1 to 'select' (number expected, got string)");
}

// ---- ipairs ----

#[test]
fn test_ipairs_stops_at_first_nil() {
    let env = TestEnv::new();
    let t = list(vec![Value::from("x"), Value::from("y"), Value::from("z")]);
    let triple = env.call("ipairs", vec![t.clone()]);
    assert_eq!(triple.len(), 3);
    assert_eq!(triple[1], t);
    assert_num(&triple, 2, 0.0);

    let iter = triple[0].clone();
    let mut control = triple[2].clone();
    let mut seen = Vec::new();
    loop {
        let step = call(&iter, vec![t.clone(), control.clone()]).unwrap();
        if step.is_empty() {
            break;
        }
        seen.push((step[0].clone(), step[1].clone()));
        control = step[0].clone();
    }
    assert_eq!(
        seen,
        vec![
            (Value::from(1), Value::from("x")),
            (Value::from(2), Value::from("y")),
            (Value::from(3), Value::from("z")),
        ]
    );
}

#[test]
fn test_ipairs_shared_iterator() {
    let env = TestEnv::new();
    let a = env.call("ipairs", vec![Value::new_table()]);
    let b = env.call("ipairs", vec![Value::new_table()]);
    assert_eq!(a[0], b[0]);
}

#[test]
fn test_ipairs_respects_index() {
    let env = TestEnv::new();
    let backing = list(vec![Value::from(10), Value::from(20)]);
    let proxy = with_meta(vec![("__index", backing)]);
    let triple = env.call("ipairs", vec![proxy.clone()]);
    let step = call(&triple[0], vec![proxy.clone(), Value::from(1)]).unwrap();
    assert_eq!(step, vec![Value::from(2), Value::from(20)]);
    let step = call(&triple[0], vec![proxy, Value::from(2)]).unwrap();
    assert!(step.is_empty());
}

#[test]
fn test_ipairs_requires_table() {
    let env = TestEnv::new();
    let msg = env.call_err("ipairs", vec![Value::Nil]);
    assert_eq!(msg, "bad argument #1 to 'ipairs' (table expected, got nil)");
}

// ---- type / tostring ----

#[test]
fn test_type_names() {
    let env = TestEnv::new();
    let cases = [
        (Value::Nil, "nil"),
        (Value::from(true), "boolean"),
        (Value::from(1), "number"),
        (Value::from("s"), "string"),
        (Value::new_table(), "table"),
        (env.global("print"), "function"),
    ];
    for (value, name) in cases {
        let out = env.call("type", vec![value]);
        assert_str(&out, 0, name);
    }
    let msg = env.call_err("type", vec![]);
    assert_eq!(msg, "bad argument #1 to 'type' (value expected)");
}

#[test]
fn test_tostring_forms() {
    let env = TestEnv::new();
    assert_str(&env.call("tostring", vec![Value::from(10)]), 0, "10");
    assert_str(&env.call("tostring", vec![Value::from(0.5)]), 0, "0.5");
    assert_str(&env.call("tostring", vec![Value::Nil]), 0, "nil");
    assert_str(&env.call("tostring", vec![Value::from(false)]), 0, "false");
    assert_str(&env.call("tostring", vec![Value::new_table()]), 0, "table");
    assert_str(&env.call("tostring", vec![env.global("type")]), 0, "function");
}

// ---- print ----

#[test]
fn test_print_joins_with_tabs() {
    let env = TestEnv::new();
    env.call("print", vec![Value::from("a"), Value::from(1), Value::Nil, Value::from(true)]);
    env.call("print", vec![]);
    assert_eq!(env.output(), "a\t1\tnil\ttrue\n\n");
}

#[test]
fn test_print_uses_tostring_metamethod() {
    let env = TestEnv::new();
    let obj = with_meta(vec![("__tostring", native(|_| Ok(Value::from("<obj>").into())))]);
    env.call("print", vec![obj]);
    assert_eq!(env.output(), "<obj>\n");
}

// ---- raw access ----

#[test]
fn test_rawget_rawset_bypass_metamethods() {
    let env = TestEnv::new();
    let trap = native(|_| Ok(Value::from("trapped").into()));
    let t = with_meta(vec![("__index", trap.clone()), ("__newindex", trap)]);

    let out = env.call("rawset", vec![t.clone(), Value::from("k"), Value::from(1)]);
    assert_eq!(out[0], t);
    let out = env.call("rawget", vec![t.clone(), Value::from("k")]);
    assert_num(&out, 0, 1.0);
    let out = env.call("rawget", vec![t.clone(), Value::from("missing")]);
    assert_nil(&out, 0);
    assert_eq!(gettable(&t, &Value::from("missing")).unwrap(), Value::from("trapped"));
}

#[test]
fn test_rawequal_ignores_eq() {
    let env = TestEnv::new();
    let always = native(|_| Ok(Value::from(true).into()));
    let a = with_meta(vec![("__eq", always)]);
    let b = Value::new_table();
    assert_bool(&env.call("rawequal", vec![a.clone(), b]), 0, false);
    assert_bool(&env.call("rawequal", vec![a.clone(), a]), 0, true);
}

#[test]
fn test_rawlen() {
    let env = TestEnv::new();
    let t = list(vec![Value::from(1), Value::from(2), Value::from(3)]);
    assert_num(&env.call("rawlen", vec![t]), 0, 3.0);
    assert_num(&env.call("rawlen", vec![Value::from("héllo")]), 0, 6.0);
}
