//! Argument matching, constraints and callable kinds

mod common;

use common::{errors, global_type, paths_of, run};
use rune_binder::{AstBuilder, BinaryOperator, BindError, Param, TypeExpr};

/// `func f(a, b = <default>) { return b }`
fn declare_with_default(b: &mut AstBuilder, default: rune_types::ExprId) {
    let root = b.root_block();
    let f = b.function(root, "f", vec![Param::new("a"), Param::new("b").with_default(default)]);
    let body = b.body(f);
    let value = b.ident("b");
    b.ret(body, Some(value));
}

#[test]
fn test_default_argument() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    let five = b.uint_lit("5", 32);
    declare_with_default(&mut b, five);

    let text = b.string("a");
    let call = b.call_named("f", vec![text]);
    b.assign_to(root, "r", call);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", errors(&output));
    assert_eq!(paths_of(&output, "f"), vec!["f(string, u32)"]);
    assert_eq!(global_type(&output, "r").as_deref(), Some("u32"));
}

#[test]
fn test_non_constant_default() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    let y = b.ident("y");
    declare_with_default(&mut b, y);

    let one = b.uint_lit("1", 32);
    let call = b.call_named("f", vec![one]);
    b.expr_stmt(root, call);

    let output = run(b);
    let errors = errors(&output);
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], BindError::NonConstantDefault { param, .. } if param == "b"));
}

#[test]
fn test_arity_mismatch() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    let f = b.function(root, "f", vec![Param::new("a"), Param::new("b")]);
    let body = b.body(f);
    let a = b.ident("a");
    b.ret(body, Some(a));

    let call = b.call_named("f", vec![]);
    b.expr_stmt(root, call);
    let args = vec![b.uint_lit("1", 32), b.uint_lit("2", 32), b.uint_lit("3", 32)];
    let call = b.call_named("f", args);
    b.expr_stmt(root, call);

    let output = run(b);
    let errors = errors(&output);
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        &errors[0],
        BindError::ArityMismatch { function, expected: 2, actual: 0, .. } if function == "f"
    ));
    assert!(matches!(&errors[1], BindError::ArityMismatch { expected: 2, actual: 3, .. }));
    assert!(output.signatures_of("f").is_empty());
}

#[test]
fn test_variadic_arguments_become_tuple() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    let h = b.function(root, "h", vec![Param::new("first"), Param::new("rest").variadic()]);
    let body = b.body(h);
    let rest = b.ident("rest");
    b.ret(body, Some(rest));

    let args = vec![b.uint_lit("1", 32), b.string("a"), b.boolean(true)];
    let call = b.call_named("h", args);
    b.assign_to(root, "r", call);
    let one = b.uint_lit("1", 32);
    let call = b.call_named("h", vec![one]);
    b.assign_to(root, "e", call);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", errors(&output));
    assert_eq!(paths_of(&output, "h"), vec!["h(u32, (string, bool))", "h(u32, ())"]);
    assert_eq!(global_type(&output, "r").as_deref(), Some("(string, bool)"));
}

/// `func g(x: u32) { return x }`
fn declare_constrained(b: &mut AstBuilder) {
    let root = b.root_block();
    let g = b.function(root, "g", vec![Param::new("x").typed(TypeExpr::Uint(32))]);
    let body = b.body(g);
    let x = b.ident("x");
    b.ret(body, Some(x));
}

#[test]
fn test_constraint_refines_literal() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_constrained(&mut b);

    let seven = b.int("7");
    let call = b.call_named("g", vec![seven]);
    b.assign_to(root, "r", call);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", errors(&output));
    assert_eq!(paths_of(&output, "g"), vec!["g(u32)"]);
    assert_eq!(output.type_string(output.expr_type(seven).unwrap()), "u32");
}

#[test]
fn test_constraint_violation() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_constrained(&mut b);

    let text = b.string("s");
    let call = b.call_named("g", vec![text]);
    b.assign_to(root, "r", call);

    let output = run(b);
    let errors = errors(&output);
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        BindError::ConstraintViolation { param, constraint, actual, .. } => {
            assert_eq!(param, "x");
            assert_eq!(constraint, "u32");
            assert_eq!(actual, "string");
        }
        other => panic!("expected a constraint violation, got {:?}", other),
    }
}

#[test]
fn test_template_constraint_accepts_class() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    let point = b.constructor(root, "Point", vec![Param::new("self")]);
    let body = b.body(point);
    let this = b.ident("self");
    let x = b.member(this, "x");
    let one = b.uint_lit("1", 32);
    b.assign(body, x, one);

    let point_type = b.named_type("Point");
    let getx = b.function(root, "getx", vec![Param::new("p").typed(point_type)]);
    let body = b.body(getx);
    let p = b.ident("p");
    let x = b.member(p, "x");
    b.ret(body, Some(x));

    let ctor = b.call_named("Point", vec![]);
    b.assign_to(root, "p", ctor);
    let p = b.ident("p");
    let call = b.call_named("getx", vec![p]);
    b.assign_to(root, "x", call);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", errors(&output));
    assert_eq!(global_type(&output, "x").as_deref(), Some("u32"));
}

#[test]
fn test_struct_construction_and_fields() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    b.struct_decl(
        root,
        "Pair",
        vec![Param::new("first").typed(TypeExpr::Uint(32)), Param::new("second")],
    );

    let args = vec![b.int("1"), b.string("x")];
    let pair = b.call_named("Pair", args);
    b.assign_to(root, "p", pair);
    let p = b.ident("p");
    let second = b.member(p, "second");
    b.assign_to(root, "s", second);
    let p = b.ident("p");
    let zero = b.int("0");
    let first = b.index(p, zero);
    b.assign_to(root, "f", first);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", errors(&output));
    assert_eq!(global_type(&output, "p").as_deref(), Some("Pair"));
    assert_eq!(global_type(&output, "s").as_deref(), Some("string"));
    assert_eq!(global_type(&output, "f").as_deref(), Some("u32"));
}

#[test]
fn test_enum_entries() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    b.enum_decl(root, "Color", &["Red", "Green"]);

    let color = b.ident("Color");
    let green = b.member(color, "Green");
    b.assign_to(root, "c", green);
    let color = b.ident("Color");
    let blue = b.member(color, "Blue");
    b.assign_to(root, "d", blue);
    let call = b.call_named("Color", vec![]);
    b.expr_stmt(root, call);

    let output = run(b);
    assert_eq!(global_type(&output, "c").as_deref(), Some("Color"));

    let errors = errors(&output);
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        &errors[0],
        BindError::MemberNotFound { member, datatype, .. } if member == "Blue" && datatype == "enum Color"
    ));
    assert!(matches!(&errors[1], BindError::NotCallable { datatype, .. } if datatype == "enum Color"));
}

#[test]
fn test_module_members() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    let util = b.module(root, "util");
    let util_block = b.body(util);
    let twice = b.function(util_block, "twice", vec![Param::new("x")]);
    let body = b.body(twice);
    let x = b.ident("x");
    let x2 = b.ident("x");
    let sum = b.binary(BinaryOperator::Add, x, x2);
    b.ret(body, Some(sum));
    let three = b.uint_lit("3", 32);
    b.assign_to(util_block, "scale", three);

    let module = b.ident("util");
    let two = b.uint_lit("2", 32);
    let call = b.method_call(module, "twice", vec![two]);
    b.assign_to(root, "r", call);
    let module = b.ident("util");
    let scale = b.member(module, "scale");
    b.assign_to(root, "s", scale);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", errors(&output));
    assert_eq!(output.root_signatures().len(), 2);
    assert_eq!(paths_of(&output, "twice"), vec!["twice(u32)"]);
    assert_eq!(global_type(&output, "r").as_deref(), Some("u32"));
    assert_eq!(global_type(&output, "s").as_deref(), Some("u32"));
}

#[test]
fn test_function_pointer_values() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    b.constructor(root, "Point", vec![Param::new("self")]);

    let ctor = b.call_named("Point", vec![]);
    b.assign_to(root, "p", ctor);
    let p = b.ident("p");
    let method = b.member(p, "toString");
    b.assign_to(root, "f", method);
    let call = b.call_named("f", vec![]);
    b.assign_to(root, "r", call);

    let n = b.uint_lit("1", 32);
    b.assign_to(root, "n", n);
    let call = b.call_named("n", vec![]);
    b.expr_stmt(root, call);

    let p = b.ident("p");
    let one = b.uint_lit("1", 32);
    let call = b.method_call(p, "toString", vec![one]);
    b.expr_stmt(root, call);

    let output = run(b);
    assert_eq!(global_type(&output, "f").as_deref(), Some("funcptr() -> string"));
    assert_eq!(global_type(&output, "r").as_deref(), Some("string"));

    let errors = errors(&output);
    assert_eq!(errors.len(), 2);
    assert!(matches!(&errors[0], BindError::NotCallable { datatype, .. } if datatype == "u32"));
    assert!(matches!(
        &errors[1],
        BindError::ArityMismatch { function, expected: 0, actual: 1, .. } if function == "toString"
    ));
}

#[test]
fn test_nested_function_does_not_capture_locals() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    let outer = b.function(root, "outer", vec![Param::new("a")]);
    let outer_body = b.body(outer);
    let inner = b.function(outer_body, "inner", vec![]);
    let inner_body = b.body(inner);
    let a = b.ident("a");
    b.ret(inner_body, Some(a));
    let call = b.call_named("inner", vec![]);
    b.ret(outer_body, Some(call));

    let one = b.uint_lit("1", 32);
    let call = b.call_named("outer", vec![one]);
    b.expr_stmt(root, call);

    let output = run(b);
    let errors = errors(&output);
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert!(matches!(&errors[0], BindError::UndefinedIdentifier { name, .. } if name == "a"));
}
