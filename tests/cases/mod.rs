//! Shared harness for the integration tests.
//!
//! Every formula is compiled against [`REGISTRY`] (built-ins, the math
//! extras and a variadic `Sum`) with both backends; `eval` cases also check
//! that the backends agree bit for bit.

#![allow(dead_code)]

use bumpalo::Bump;
use once_cell::sync::Lazy;
use statexpr::{
    Backend, CompilationOptions, Engine, EngineOptions, Error, FunctionDescriptor, Registry,
    register_math_extras, render_error_to_string_no_color,
};

pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::builtin();
    register_math_extras(&mut registry).unwrap();
    registry
        .register_function(FunctionDescriptor::variadic("Sum", |args| {
            // `Iterator::sum` starts from -0.0 for floats.
            args.iter().fold(0.0, |a, b| a + b)
        }))
        .unwrap();
    registry
});

/// Bitwise equality, with every NaN equal to every other.
pub fn same(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

/// Evaluate `source` at `input` with both backends.
pub fn eval(source: &str, input: f64) -> f64 {
    let arena = Bump::new();
    let engine = Engine::with_registry(&arena, &REGISTRY, EngineOptions::default()).unwrap();
    let compile = |backend| {
        engine
            .compile_with(&CompilationOptions { backend }, source)
            .unwrap_or_else(|e| panic!("{}", render_error_to_string_no_color(&e)))
    };

    let tree = compile(Backend::Tree).call(input);
    let bytecode = compile(Backend::Bytecode).call(input);
    assert!(
        same(tree, bytecode),
        "{source} at In = {input}: tree {tree}, bytecode {bytecode}"
    );
    tree
}

/// The fully parenthesised tree of `source`.
pub fn parse_tree(source: &str) -> String {
    let arena = Bump::new();
    let engine = Engine::with_registry(&arena, &REGISTRY, EngineOptions::default()).unwrap();
    match engine.parse(source) {
        Ok(parsed) => parsed.root.to_string(),
        Err(e) => panic!("{}", render_error_to_string_no_color(&e)),
    }
}

/// The error `source` is rejected with.
pub fn compile_error(source: &str) -> Error {
    let arena = Bump::new();
    let engine = Engine::with_registry(&arena, &REGISTRY, EngineOptions::default()).unwrap();
    match engine.compile(source) {
        Ok(formula) => panic!("expected {source:?} to be rejected, got {:?}", formula),
        Err(e) => e,
    }
}

/// Declare one integration test module per formula.
///
/// - `tree`: the fully parenthesised parse
/// - `eval`: `input => output` pairs, checked on both backends
/// - `error`: diagnostic code and message
/// - `rendered`: text the ariadne report must contain
macro_rules! test_case {
    {
        name: $name:ident,
        input: $input:expr,
        $( tree: $tree:expr, )?
        $( eval: { $( $arg:expr => $want:expr ),* $(,)? }, )?
        $( error: { $code:expr, $message:expr }, )?
        $( rendered: $rendered:expr, )?
    } => {
        mod $name {
            $(
                #[test]
                fn tree() {
                    pretty_assertions::assert_eq!(super::cases::parse_tree($input), $tree);
                }
            )?

            $(
                #[test]
                fn eval() {
                    for (input, want) in [$( ($arg as f64, $want as f64) ),*] {
                        let got = super::cases::eval($input, input);
                        assert!(
                            super::cases::same(got, want),
                            "{} at In = {}: expected {}, got {}",
                            $input, input, want, got
                        );
                    }
                }
            )?

            $(
                #[test]
                fn error() {
                    let err = super::cases::compile_error($input);
                    let diagnostics = err.diagnostics();
                    assert_eq!(diagnostics.len(), 1, "{:?}", err);
                    pretty_assertions::assert_eq!(diagnostics[0].code.as_deref(), Some($code));
                    pretty_assertions::assert_eq!(diagnostics[0].message, $message);
                }
            )?

            $(
                #[test]
                fn rendered() {
                    let err = super::cases::compile_error($input);
                    let output = statexpr::render_error_to_string_no_color(&err);
                    assert!(output.contains($rendered), "{}", output);
                }
            )?
        }
    };
}
