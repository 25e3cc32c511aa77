//! Shared helpers for binder scenario tests

#![allow(dead_code)]

use rune_binder::{bind, AstBuilder, BindConfig, BindError, BindOutput};

/// Route binder logs through the test harness; `--nocapture` shows them
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Bind a program with the default configuration
pub fn run(builder: AstBuilder) -> BindOutput {
    run_with(builder, BindConfig::default())
}

pub fn run_with(builder: AstBuilder, config: BindConfig) -> BindOutput {
    init_logging();
    bind(builder.finish(), &config)
}

/// Errors in source order
pub fn errors(output: &BindOutput) -> Vec<BindError> {
    output.diagnostics().sorted().into_iter().cloned().collect()
}

/// User-facing datatype of a variable of the root module
pub fn global_type(output: &BindOutput, name: &str) -> Option<String> {
    let root = *output.root_signatures().first()?;
    let block = output.signatures().get(root).block;
    let ast = output.ast();
    ast.block(block)
        .variables
        .iter()
        .find(|v| output.interner().resolve(ast.variable(**v).name) == name)
        .and_then(|v| output.variable_type(*v))
        .map(|t| output.type_string(t))
}

/// Paths of every signature of a function, in creation order
pub fn paths_of(output: &BindOutput, name: &str) -> Vec<String> {
    output
        .signatures_of(name)
        .iter()
        .map(|s| output.signature_path(s.id))
        .collect()
}

/// Return datatype of the only signature of a function
pub fn return_type_of(output: &BindOutput, name: &str) -> Option<String> {
    let signatures = output.signatures_of(name);
    assert_eq!(signatures.len(), 1, "expected one signature of {}", name);
    signatures[0].return_type.map(|t| output.type_string(t))
}
