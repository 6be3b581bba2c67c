use bumpalo::Bump;
use pretty_assertions::assert_eq;

use crate::api::ParseOptions;
use crate::parser::{Node, ParseError, ParseErrorKind, Span, parse};
use crate::registry::{Fixity, FunctionDescriptor, OperatorDescriptor, Registry};
use crate::test_utils::init_test_logging;

fn parse_err(source: &str) -> ParseError {
    parse_err_with(&ParseOptions::default(), source)
}

fn parse_err_with(options: &ParseOptions, source: &str) -> ParseError {
    let arena = Bump::new();
    let source: &str = arena.alloc_str(source);
    match parse(&arena, Registry::global(), options, source) {
        Ok(parsed) => panic!("expected an error for {source:?}, got {}", parsed.root),
        Err(err) => err,
    }
}

fn render(source: &str) -> String {
    let arena = Bump::new();
    let source: &str = arena.alloc_str(source);
    parse(&arena, Registry::global(), &ParseOptions::default(), source)
        .unwrap_or_else(|e| panic!("Formula parsing failed: {}\n{}", source, e))
        .root
        .to_string()
}

#[test]
fn test_literals_and_input() {
    init_test_logging();
    assert_eq!(render("42"), "42");
    assert_eq!(render("  2.5 "), "2.5");
    assert_eq!(render("2,5"), "2.5");
    assert_eq!(render("In"), "In");
    assert_eq!(render("(In)"), "In");
    assert_eq!(render("TRUE"), "true");
    assert_eq!(render("false"), "false");
}

#[test]
fn test_dangling_operator_is_structural() {
    let err = parse_err("2 + ");
    assert_eq!(
        err.kind,
        ParseErrorKind::MissingOperand {
            symbol: "+".to_string()
        }
    );
    assert!(err.kind.is_structural());
    assert_eq!(err.span, Span::new(2, 3));
    assert_eq!(err.formula, "2 + ");

    assert!(matches!(parse_err("-").kind, ParseErrorKind::MissingOperand { .. }));
    assert!(matches!(parse_err("(2 -)").kind, ParseErrorKind::MissingOperand { .. }));
}

#[test]
fn test_adjacent_operands_are_structural() {
    let err = parse_err("2 3");
    assert_eq!(
        err.kind,
        ParseErrorKind::ExtraOperand {
            text: "3".to_string()
        }
    );
    assert_eq!(err.span, Span::new(2, 3));

    assert!(matches!(parse_err("In (1)").kind, ParseErrorKind::ExtraOperand { .. }));
    assert!(matches!(parse_err("Abs(1) 2").kind, ParseErrorKind::ExtraOperand { .. }));
}

#[test]
fn test_unbalanced_groups() {
    let err = parse_err("(2 + 3");
    assert_eq!(err.kind, ParseErrorKind::UnbalancedGroup);
    assert_eq!(err.span, Span::new(0, 6));

    let err = parse_err("2 + 3)");
    assert_eq!(err.kind, ParseErrorKind::UnbalancedGroup);
    assert_eq!(err.span, Span::new(5, 6));

    assert_eq!(parse_err("Max(1; 2").kind, ParseErrorKind::UnbalancedGroup);
}

#[test]
fn test_unknown_identifier() {
    let err = parse_err("Foo(1)");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnknownIdentifier {
            name: "Foo".to_string()
        }
    );
    assert_eq!(err.span, Span::new(0, 3));

    // The input name and function names are case-sensitive.
    assert!(matches!(parse_err("in * 2").kind, ParseErrorKind::UnknownIdentifier { .. }));
    assert!(matches!(parse_err("abs(1)").kind, ParseErrorKind::UnknownIdentifier { .. }));
}

#[test]
fn test_function_arity() {
    let err = parse_err("Max(1)");
    assert_eq!(
        err.kind,
        ParseErrorKind::FunctionArity {
            name: "Max".to_string(),
            expected: 2,
            found: 1,
        }
    );
    assert_eq!(err.span, Span::new(0, 6));

    assert_eq!(
        parse_err("Abs()").kind,
        ParseErrorKind::FunctionArity {
            name: "Abs".to_string(),
            expected: 1,
            found: 0,
        }
    );
    assert_eq!(
        parse_err("Abs(1; 2; 3)").kind,
        ParseErrorKind::FunctionArity {
            name: "Abs".to_string(),
            expected: 1,
            found: 3,
        }
    );
}

#[test]
fn test_function_requires_argument_list() {
    let err = parse_err("Abs + 1");
    assert_eq!(
        err.kind,
        ParseErrorKind::MissingArguments {
            name: "Abs".to_string()
        }
    );
    assert_eq!(err.span, Span::new(0, 3));
    assert!(matches!(parse_err("Abs").kind, ParseErrorKind::MissingArguments { .. }));
}

#[test]
fn test_whitespace_before_argument_list() {
    assert_eq!(render("Abs (-2)"), "Abs(-2)");
    assert_eq!(render("Max( 1 ;2 )"), "Max(1; 2)");
}

#[test]
fn test_empty_frames_default_to_zero() {
    assert_eq!(render("()"), "0");
    assert_eq!(render("Max(1;)"), "Max(1; 0)");
    assert_eq!(render("2 * ( )"), "(2 * 0)");
}

#[test]
fn test_empty_formula() {
    assert_eq!(parse_err("").kind, ParseErrorKind::EmptyFormula);
    let err = parse_err("   ");
    assert_eq!(err.kind, ParseErrorKind::EmptyFormula);
    assert_eq!(err.span, Span::new(0, 3));
}

#[test]
fn test_separator_outside_call() {
    let err = parse_err("1; 2");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedSeparator);
    assert_eq!(err.span, Span::new(1, 2));
    assert_eq!(parse_err("(1; 2)").kind, ParseErrorKind::UnexpectedSeparator);
}

#[test]
fn test_lexical_and_number_errors() {
    assert_eq!(parse_err("2 $ 3").kind, ParseErrorKind::Lexical { found: '$' });
    assert_eq!(
        parse_err("1.2.3 + 1").kind,
        ParseErrorKind::MalformedNumber {
            text: "1.2.3".to_string()
        }
    );
}

#[test]
fn test_operator_without_matching_form() {
    let err = parse_err("* 3");
    assert_eq!(
        err.kind,
        ParseErrorKind::AmbiguousOperator {
            symbol: "*".to_string(),
            wanted: Fixity::Unary,
        }
    );
    assert_eq!(err.span, Span::new(0, 1));
    assert!(matches!(parse_err("2 * / 3").kind, ParseErrorKind::AmbiguousOperator { .. }));
}

#[test]
fn test_booleans_are_not_operands() {
    let err = parse_err("true + 1");
    assert_eq!(
        err.kind,
        ParseErrorKind::TypeMismatch {
            text: "true".to_string()
        }
    );
    assert_eq!(err.span, Span::new(0, 4));

    assert!(matches!(parse_err("-FALSE").kind, ParseErrorKind::TypeMismatch { .. }));
    assert!(matches!(parse_err("Abs(true)").kind, ParseErrorKind::TypeMismatch { .. }));
    assert!(matches!(parse_err("2 * (false)").kind, ParseErrorKind::TypeMismatch { .. }));
}

#[test]
fn test_max_depth() {
    let options = ParseOptions {
        max_depth: 3,
        ..ParseOptions::default()
    };
    let err = parse_err_with(&options, "((((1))))");
    assert_eq!(err.kind, ParseErrorKind::MaxDepthExceeded { max_depth: 3 });
    let err = parse_err_with(&options, "Abs(Abs(Abs(In)))");
    assert_eq!(err.kind, ParseErrorKind::MaxDepthExceeded { max_depth: 3 });

    // Only nesting counts, not the height of the tree.
    let arena = Bump::new();
    assert!(parse(&arena, Registry::global(), &options, "((1))").is_ok());
    assert!(parse(&arena, Registry::global(), &options, "Abs(Abs(In))").is_ok());
    assert!(parse(&arena, Registry::global(), &options, "In + In + In + In").is_ok());
    assert!(parse(&arena, Registry::global(), &options, "---In").is_ok());
}

fn nested(open: &str, inner: &str, levels: usize) -> String {
    format!("{}{}{}", open.repeat(levels), inner, ")".repeat(levels))
}

/// Run `test` on a thread with a 2 MiB stack, the default for spawned
/// threads.
fn on_small_stack(test: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(test)
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn test_default_depth_fits_small_stack() {
    on_small_stack(|| {
        let max_depth = ParseOptions::default().max_depth;
        // The top level is the first frame.
        let levels = max_depth - 1;

        let arena = Bump::new();
        let groups = nested("(", "In + 1", levels);
        let parsed = parse(&arena, Registry::global(), &ParseOptions::default(), &groups).unwrap();
        assert_eq!(parsed.root.to_string(), "(In + 1)");

        let calls = nested("Abs(", "In", levels);
        let parsed = parse(&arena, Registry::global(), &ParseOptions::default(), &calls).unwrap();
        assert_eq!(parsed.root.post_order().count(), levels + 1);

        for source in [nested("(", "In", levels + 1), nested("Abs(", "In", levels + 1)] {
            assert_eq!(
                parse_err(&source).kind,
                ParseErrorKind::MaxDepthExceeded { max_depth }
            );
        }
    });
}

#[test]
fn test_very_deep_nesting_is_an_error() {
    on_small_stack(|| {
        for source in [nested("(", "1", 999), nested("Abs(", "In", 998)] {
            assert!(matches!(
                parse_err(&source).kind,
                ParseErrorKind::MaxDepthExceeded { .. }
            ));
        }
    });
}

#[test]
fn test_long_chains_are_not_nesting() {
    on_small_stack(|| {
        let arena = Bump::new();
        for terms in [1200, 10_000] {
            let source = vec!["In"; terms].join(" + ");
            let parsed =
                parse(&arena, Registry::global(), &ParseOptions::default(), &source).unwrap();
            assert_eq!(parsed.root.post_order().count(), 2 * terms - 1);
            assert!(parsed.root.depends_on_input());
        }

        let source = format!("{}In", "-".repeat(10_000));
        let parsed = parse(&arena, Registry::global(), &ParseOptions::default(), &source).unwrap();
        assert_eq!(parsed.root.post_order().count(), 10_001);
    });
}

#[test]
fn test_deep_trees_display_and_compare() {
    on_small_stack(|| {
        let arena = Bump::new();
        let source = format!("{}In", "-".repeat(10_000));
        let left = parse(&arena, Registry::global(), &ParseOptions::default(), &source).unwrap();
        let right = parse(&arena, Registry::global(), &ParseOptions::default(), &source).unwrap();
        assert!(left.root == right.root);

        let rendered = left.root.to_string();
        assert_eq!(rendered.len(), 2 * 10_000 + 2 + 10_000);
        assert!(rendered.starts_with("(-(-"));
        assert!(rendered.ends_with("In))"));

        let shorter = format!("{}In", "-".repeat(9_999));
        let shorter = parse(&arena, Registry::global(), &ParseOptions::default(), &shorter).unwrap();
        assert!(left.root != shorter.root);
    });
}

#[test]
fn test_custom_input_name_and_separator() {
    let options = ParseOptions {
        input_name: "x".to_string(),
        decimal_separator: '\'',
        ..ParseOptions::default()
    };
    let arena = Bump::new();
    let parsed = parse(&arena, Registry::global(), &options, "x * 1'5").unwrap();
    assert_eq!(parsed.root.to_string(), "(x * 1.5)");

    // ',' is no longer a separator.
    let err = parse_err_with(&options, "1,5");
    assert_eq!(err.kind, ParseErrorKind::Lexical { found: ',' });
    // "In" is not special anymore.
    assert!(matches!(parse_err_with(&options, "In").kind, ParseErrorKind::UnknownIdentifier { .. }));
}

#[test]
fn test_variadic_functions_accept_any_count() {
    let mut registry = Registry::builtin();
    registry
        .register_function(FunctionDescriptor::variadic("Sum", |args| {
            args.iter().fold(0.0, |a, b| a + b)
        }))
        .unwrap();
    let arena = Bump::new();
    let options = ParseOptions::default();
    for (source, count) in [("Sum()", 0), ("Sum(1)", 1), ("Sum(1; 2; In; 4)", 4)] {
        let parsed = parse(&arena, &registry, &options, source).unwrap();
        match parsed.root {
            Node::Call { func, args } => {
                assert_eq!(func.name(), "Sum");
                assert_eq!(args.len(), count, "{source}");
            }
            other => panic!("expected a call for {source}, got {other}"),
        }
    }
}

#[test]
fn test_multi_char_operator() {
    let mut registry = Registry::builtin();
    registry
        .register_operator(OperatorDescriptor::binary("**", 1, f64::powf))
        .unwrap();
    let arena = Bump::new();
    let parsed = parse(&arena, &registry, &ParseOptions::default(), "2 ** -In").unwrap();
    assert_eq!(parsed.root.to_string(), "(2 ** (-In))");
}

#[test]
fn test_post_order_visits_children_first() {
    let arena = Bump::new();
    let parsed =
        parse(&arena, Registry::global(), &ParseOptions::default(), "Max(2; In) * -In").unwrap();
    let visited: Vec<String> = parsed.root.post_order().map(|node| node.to_string()).collect();
    assert_eq!(
        visited,
        vec!["2", "In", "Max(2; In)", "In", "(-In)", "(Max(2; In) * (-In))"]
    );
}

fn tree<'a>(arena: &'a Bump, source: &'a str) -> &'a Node<'a> {
    parse(arena, Registry::global(), &ParseOptions::default(), source)
        .unwrap()
        .root
}

#[test]
fn test_structural_equality() {
    let first = Bump::new();
    let second = Bump::new();

    assert!(tree(&first, "Max(In; 1) - 2") == tree(&second, "(Max(In;1)) - 2"));
    assert!(tree(&first, "In - 1") != tree(&second, "1 - In"));
    assert!(tree(&first, "In - 1") != tree(&second, "In + 1"));
    assert!(tree(&first, "Max(In; 1)") != tree(&second, "Min(In; 1)"));
    assert!(tree(&first, "-In") != tree(&second, "In"));
}
