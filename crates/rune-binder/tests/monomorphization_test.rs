//! Signature memoization, class instantiation and promotion

mod common;

use common::{global_type, paths_of, return_type_of, run, run_with};
use rune_binder::{AstBuilder, BinaryOperator, BindConfig, BindError, Param, SignatureState};

/// `func id(x) { return x }`
fn declare_id(b: &mut AstBuilder) {
    let root = b.root_block();
    let id = b.function(root, "id", vec![Param::new("x")]);
    let body = b.body(id);
    let x = b.ident("x");
    b.ret(body, Some(x));
}

#[test]
fn test_one_signature_per_argument_datatype() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_id(&mut b);

    let one = b.uint_lit("1", 32);
    let first = b.call_named("id", vec![one]);
    b.assign_to(root, "a", first);
    let text = b.string("a");
    let second = b.call_named("id", vec![text]);
    b.assign_to(root, "s", second);
    let two = b.uint_lit("2", 32);
    let third = b.call_named("id", vec![two]);
    b.assign_to(root, "c", third);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", common::errors(&output));
    assert_eq!(paths_of(&output, "id"), vec!["id(u32)", "id(string)"]);
    assert_eq!(global_type(&output, "a").as_deref(), Some("u32"));
    assert_eq!(global_type(&output, "s").as_deref(), Some("string"));
    assert_eq!(global_type(&output, "c").as_deref(), Some("u32"));
}

#[test]
fn test_each_signature_binds_its_own_body() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_id(&mut b);

    let one = b.uint_lit("1", 32);
    let first = b.call_named("id", vec![one]);
    b.expr_stmt(root, first);
    let yes = b.boolean(true);
    let second = b.call_named("id", vec![yes]);
    b.expr_stmt(root, second);

    let output = run(b);
    let signatures = output.signatures_of("id");
    assert_eq!(signatures.len(), 2);
    assert_ne!(signatures[0].block, signatures[1].block);
    assert_ne!(signatures[0].params, signatures[1].params);
    for sig in signatures {
        assert_eq!(sig.state, SignatureState::Bound);
        assert_eq!(sig.return_type, Some(sig.paramspecs[0].datatype));
    }
}

#[test]
fn test_mutual_recursion_resolves() {
    let mut b = AstBuilder::new();
    let root = b.root_block();

    for (name, other, base) in [("isEven", "isOdd", true), ("isOdd", "isEven", false)] {
        let f = b.function(root, name, vec![Param::new("n")]);
        let body = b.body(f);
        let n = b.ident("n");
        let zero = b.int("0");
        let cond = b.binary(BinaryOperator::Equal, n, zero);
        let then = b.if_stmt(body, cond);
        let value = b.boolean(base);
        b.ret(then, Some(value));
        let n = b.ident("n");
        let one = b.int("1");
        let pred = b.binary(BinaryOperator::Subtract, n, one);
        let call = b.call_named(other, vec![pred]);
        b.ret(body, Some(call));
    }

    let ten = b.uint_lit("10", 32);
    let call = b.call_named("isEven", vec![ten]);
    b.assign_to(root, "even", call);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", common::errors(&output));
    assert_eq!(return_type_of(&output, "isEven").as_deref(), Some("bool"));
    assert_eq!(return_type_of(&output, "isOdd").as_deref(), Some("bool"));
    assert_eq!(paths_of(&output, "isOdd"), vec!["isOdd(u32)"]);
    assert_eq!(global_type(&output, "even").as_deref(), Some("bool"));
    for sig in output.signatures().iter() {
        assert_eq!(sig.state, SignatureState::Bound);
    }
}

/// `func name(n) { if n > 0 { other(n - 1) } }`
fn declare_countdown(b: &mut AstBuilder, name: &str, other: &str) {
    let root = b.root_block();
    let f = b.function(root, name, vec![Param::new("n")]);
    let body = b.body(f);
    let n = b.ident("n");
    let zero = b.int("0");
    let cond = b.binary(BinaryOperator::GreaterThan, n, zero);
    let then = b.if_stmt(body, cond);
    let n = b.ident("n");
    let one = b.int("1");
    let pred = b.binary(BinaryOperator::Subtract, n, one);
    let call = b.call_named(other, vec![pred]);
    b.expr_stmt(then, call);
}

#[test]
fn test_mutually_recursive_procedures_resolve() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_countdown(&mut b, "ping", "pong");
    declare_countdown(&mut b, "pong", "ping");
    let three = b.uint_lit("3", 32);
    let call = b.call_named("ping", vec![three]);
    b.expr_stmt(root, call);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", common::errors(&output));
    assert_eq!(paths_of(&output, "ping"), vec!["ping(u32)"]);
    assert_eq!(paths_of(&output, "pong"), vec!["pong(u32)"]);
    assert_eq!(return_type_of(&output, "ping").as_deref(), Some("none"));
    for sig in output.signatures().iter() {
        assert_eq!(sig.state, SignatureState::Bound);
    }
}

#[test]
fn test_self_recursive_procedure_resolves() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_countdown(&mut b, "count", "count");
    let ten = b.uint_lit("10", 32);
    let call = b.call_named("count", vec![ten]);
    b.expr_stmt(root, call);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", common::errors(&output));
    assert_eq!(output.signatures_of("count")[0].state, SignatureState::Bound);
}

/// `func f(a) { t = a + "s" }`
fn declare_ill_typed(b: &mut AstBuilder) {
    let root = b.root_block();
    let f = b.function(root, "f", vec![Param::new("a")]);
    let body = b.body(f);
    let a = b.ident("a");
    let text = b.string("s");
    let sum = b.binary(BinaryOperator::Add, a, text);
    b.assign_to(body, "t", sum);
}

#[test]
fn test_promotion_does_not_repeat_diagnostics() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_ill_typed(&mut b);

    let no = b.boolean(false);
    let branch = b.if_stmt(root, no);
    let one = b.uint_lit("1", 32);
    let call = b.call_named("f", vec![one]);
    b.expr_stmt(branch, call);
    let two = b.uint_lit("2", 32);
    let call = b.call_named("f", vec![two]);
    b.expr_stmt(root, call);

    let output = run(b);
    let errors = common::errors(&output);
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert!(matches!(errors[0], BindError::TypeMismatch { .. }));
    let signatures = output.signatures_of("f");
    assert_eq!(signatures.len(), 1);
    assert!(signatures[0].instantiated);
    assert_eq!(signatures[0].state, SignatureState::Failed);
}

#[test]
fn test_promotion_after_failure_keeps_one_diagnostic() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_ill_typed(&mut b);
    // `func g(a) { f(a) }` binds after f's body has already failed
    let g = b.function(root, "g", vec![Param::new("a")]);
    let body = b.body(g);
    let a = b.ident("a");
    let call = b.call_named("f", vec![a]);
    b.expr_stmt(body, call);

    let no = b.boolean(false);
    let branch = b.if_stmt(root, no);
    let one = b.uint_lit("1", 32);
    let call = b.call_named("f", vec![one]);
    b.expr_stmt(branch, call);
    let two = b.uint_lit("2", 32);
    let call = b.call_named("g", vec![two]);
    b.expr_stmt(root, call);

    let output = run(b);
    let errors = common::errors(&output);
    assert_eq!(errors.len(), 1, "{:?}", errors);
    let f = output.signatures_of("f");
    assert!(f[0].instantiated);
    assert_eq!(f[0].state, SignatureState::Failed);
}

/// ```text
/// class Stack(self, <value>) {
///     self.items = [value]
///     func push(self, v) { self.items = self.items + [v] }
///     func top(self) { return self.items[0] }
/// }
/// ```
fn declare_stack(b: &mut AstBuilder) {
    let root = b.root_block();
    let stack = b.constructor(root, "Stack", vec![Param::new("self"), Param::new("value").template()]);
    let body = b.body(stack);
    let this = b.ident("self");
    let items = b.member(this, "items");
    let value = b.ident("value");
    let array = b.array(vec![value]);
    b.assign(body, items, array);

    let push = b.function(body, "push", vec![Param::new("self"), Param::new("v")]);
    let push_body = b.body(push);
    let this = b.ident("self");
    let target = b.member(this, "items");
    let this = b.ident("self");
    let current = b.member(this, "items");
    let v = b.ident("v");
    let array = b.array(vec![v]);
    let sum = b.binary(BinaryOperator::Add, current, array);
    b.assign(push_body, target, sum);

    let top = b.function(body, "top", vec![Param::new("self")]);
    let top_body = b.body(top);
    let this = b.ident("self");
    let items = b.member(this, "items");
    let zero = b.int("0");
    let first = b.index(items, zero);
    b.ret(top_body, Some(first));
}

#[test]
fn test_stack_classes_and_methods() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_stack(&mut b);

    let one = b.uint_lit("1", 32);
    let ctor = b.call_named("Stack", vec![one]);
    b.assign_to(root, "s1", ctor);
    let s1 = b.ident("s1");
    let two = b.uint_lit("2", 32);
    let call = b.method_call(s1, "push", vec![two]);
    b.expr_stmt(root, call);

    let text = b.string("a");
    let ctor = b.call_named("Stack", vec![text]);
    b.assign_to(root, "s2", ctor);
    let s2 = b.ident("s2");
    let text = b.string("b");
    let call = b.method_call(s2, "push", vec![text]);
    b.expr_stmt(root, call);

    let s1 = b.ident("s1");
    let call = b.method_call(s1, "top", vec![]);
    b.assign_to(root, "t", call);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", common::errors(&output));

    let classes = output.classes_of("Stack");
    assert_eq!(classes.len(), 2);
    let members: Vec<String> = classes
        .iter()
        .map(|c| output.type_string(output.member_type(c, "items").unwrap()))
        .collect();
    assert_eq!(members, vec!["[u32]", "[string]"]);
    assert_eq!(classes[0].constructors.len(), 1);

    assert_eq!(
        paths_of(&output, "push"),
        vec!["Stack.push(Stack(u32), u32)", "Stack.push(Stack(string), string)"]
    );
    assert_eq!(paths_of(&output, "Stack"), vec!["Stack(Stack(u32), u32)", "Stack(Stack(string), string)"]);
    assert_eq!(global_type(&output, "s1").as_deref(), Some("Stack(u32)"));
    assert_eq!(global_type(&output, "s2").as_deref(), Some("Stack(string)"));
    assert_eq!(global_type(&output, "t").as_deref(), Some("u32"));
    assert_eq!(return_type_of(&output, "top").as_deref(), Some("u32"));
}

#[test]
fn test_same_template_argument_reuses_class() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_stack(&mut b);

    for name in ["a", "b"] {
        let one = b.uint_lit("1", 32);
        let ctor = b.call_named("Stack", vec![one]);
        b.assign_to(root, name, ctor);
    }

    let output = run(b);
    assert!(output.is_ok());
    assert_eq!(output.classes_of("Stack").len(), 1);
    assert_eq!(output.signatures_of("Stack").len(), 1);
}

/// `class Point(self) { self.x = 1u32 }` with `p = Point()`
fn declare_point(b: &mut AstBuilder) {
    let root = b.root_block();
    let point = b.constructor(root, "Point", vec![Param::new("self")]);
    let body = b.body(point);
    let this = b.ident("self");
    let x = b.member(this, "x");
    let one = b.uint_lit("1", 32);
    b.assign(body, x, one);

    let ctor = b.call_named("Point", vec![]);
    b.assign_to(root, "p", ctor);
}

#[test]
fn test_template_without_parameters_has_one_class() {
    let mut b = AstBuilder::new();
    declare_point(&mut b);

    let output = run(b);
    assert!(output.is_ok());
    let classes = output.classes_of("Point");
    assert_eq!(classes.len(), 1);
    assert!(classes[0].constructed);
    assert_eq!(global_type(&output, "p").as_deref(), Some("Point"));
}

#[test]
fn test_default_class_binds_its_constructor() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    let config = b.constructor(root, "Config", vec![Param::new("self")]);
    let body = b.body(config);
    let this = b.ident("self");
    let size = b.member(this, "size");
    let four = b.uint_lit("4", 32);
    b.assign(body, size, four);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", common::errors(&output));
    let classes = output.classes_of("Config");
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].constructors.len(), 1);
    assert_eq!(output.type_string(output.member_type(classes[0], "size").unwrap()), "u32");

    let signatures = output.signatures_of("Config");
    assert_eq!(signatures.len(), 1);
    assert!(!signatures[0].instantiated);
    assert_eq!(signatures[0].state, SignatureState::Bound);
}

#[test]
fn test_generated_methods() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_point(&mut b);

    let p = b.ident("p");
    let call = b.method_call(p, "toString", vec![]);
    b.assign_to(root, "s", call);
    let p = b.ident("p");
    let call = b.method_call(p, "show", vec![]);
    b.expr_stmt(root, call);

    let output = run(b);
    assert!(output.is_ok(), "{:?}", common::errors(&output));
    assert_eq!(global_type(&output, "s").as_deref(), Some("string"));
}

#[test]
fn test_generated_methods_disabled() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_point(&mut b);

    let p = b.ident("p");
    let call = b.method_call(p, "toString", vec![]);
    b.assign_to(root, "s", call);

    let config = BindConfig {
        generate_default_methods: false,
        ..BindConfig::default()
    };
    let output = run_with(b, config);
    let errors = common::errors(&output);
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], BindError::MemberNotFound { member, .. } if member == "toString"));
    assert_eq!(global_type(&output, "s"), None);
}

#[test]
fn test_compile_time_branch_is_not_instantiated() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_id(&mut b);

    let no = b.boolean(false);
    let branch = b.if_stmt(root, no);
    let one = b.uint_lit("1", 32);
    let call = b.call_named("id", vec![one]);
    b.expr_stmt(branch, call);

    let output = run(b);
    assert!(output.is_ok());
    let signatures = output.signatures_of("id");
    assert_eq!(signatures.len(), 1);
    assert!(!signatures[0].instantiated);
    assert!(!signatures[0].paramspecs[0].instantiated);
    assert_eq!(signatures[0].state, SignatureState::Bound);
    assert_eq!(output.instantiated_signatures().len(), 1);
}

#[test]
fn test_runtime_call_promotes_signature() {
    let mut b = AstBuilder::new();
    let root = b.root_block();
    declare_id(&mut b);

    let no = b.boolean(false);
    let branch = b.if_stmt(root, no);
    let one = b.uint_lit("1", 32);
    let call = b.call_named("id", vec![one]);
    b.expr_stmt(branch, call);
    let two = b.uint_lit("2", 32);
    let call = b.call_named("id", vec![two]);
    b.expr_stmt(root, call);

    let output = run(b);
    assert!(output.is_ok());
    let signatures = output.signatures_of("id");
    assert_eq!(signatures.len(), 1);
    assert!(signatures[0].instantiated);
    assert!(signatures[0].paramspecs[0].instantiated);
    assert_eq!(signatures[0].state, SignatureState::Bound);
    assert_eq!(output.instantiated_signatures().len(), 2);
}

#[test]
fn test_dump_lists_signatures_and_classes() {
    let mut b = AstBuilder::new();
    declare_point(&mut b);

    let output = run(b);
    let dump = output.dump();
    assert!(dump.contains("main() -> none [Bound]"));
    assert!(dump.contains("Point(Point) -> none [Bound]"));
    assert!(dump.contains("class Point"));
    assert!(dump.contains("    x: u32"));
}
