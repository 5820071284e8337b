//! Tests for formula validation and evaluation through the public API

use bandwork::prelude::*;
use bandwork::{Arity, FunctionCategory, FunctionDef};

fn fields() -> Vec<DataField> {
    vec![
        DataField::master("a"),
        DataField::master("b"),
        DataField::detail("amount"),
    ]
}

/// Declared fields validate, unknown ones are listed
#[test]
fn test_validate_formula() {
    let engine = FormulaEngine::new();

    let outcome = engine.validate_formula("{a} + {b} * SUM({amount})", &fields());
    assert!(outcome.valid);
    assert_eq!(outcome.message, "Formula is valid");

    let outcome = engine.validate_formula("{unknownField} + {a}", &fields());
    assert!(!outcome.valid);
    assert!(outcome.message.contains("unknownField"));
    assert!(matches!(
        outcome.error,
        Some(FormulaError::UnknownVariables(ref names)) if names == &["unknownField".to_string()]
    ));
}

/// Syntax problems are caught before evaluation
#[test]
fn test_validate_syntax_errors() {
    let engine = FormulaEngine::new();
    for formula in ["", "(1 + 2", "1 +* 2", "1 +", "SUM()", "MAX(1,,2)", "NOPE(1)", "ABS(1, 2)"] {
        let outcome = engine.validate_formula(formula, &fields());
        assert!(!outcome.valid, "{formula:?} should be rejected");
    }
    assert!(engine.validate_formula("COUNT(*)", &fields()).valid);
    assert!(!engine.validate_formula("SUM(*)", &fields()).valid);
}

/// Arithmetic over the master record
#[test]
fn test_evaluate_record() {
    let engine = FormulaEngine::new();
    let rec = record([("a", Scalar::from(2)), ("b", Scalar::from(3))]);
    let outcome = engine.evaluate_formula("{a} + {b}", &EvaluationContext::new(&rec));
    assert!(outcome.valid);
    assert_eq!(outcome.result, Scalar::Number(5.0));

    let outcome = engine.evaluate_formula("'Total: ' + {a}", &EvaluationContext::new(&rec));
    assert_eq!(outcome.result, Scalar::string("Total: 2"));

    let outcome = engine.evaluate_formula("'x' * {a}", &EvaluationContext::new(&rec));
    assert!(!outcome.valid);
    assert!(matches!(outcome.error, Some(FormulaError::TypeMismatch(_))));
}

/// Aggregates over the detail rows
#[test]
fn test_evaluate_aggregates() {
    let engine = FormulaEngine::new();
    let rows = vec![
        record([("amount", Scalar::from(10))]),
        record([("amount", Scalar::from("x"))]),
        record([("amount", Scalar::from(5))]),
    ];
    let ctx = EvaluationContext::simple().with_rows(&rows, &rows[..1]);

    assert_eq!(engine.evaluate_formula("SUM({amount})", &ctx).result, Scalar::Number(15.0));
    assert_eq!(engine.evaluate_formula("PAGESUM({amount})", &ctx).result, Scalar::Number(10.0));
    assert_eq!(engine.evaluate_formula("COUNT(*)", &ctx).result, Scalar::Number(3.0));

    let empty = EvaluationContext::simple();
    assert_eq!(engine.evaluate_formula("AVG({amount})", &empty).result, Scalar::Number(0.0));
}

/// Division by zero is reported, never printed
#[test]
fn test_divide_by_zero() {
    let engine = FormulaEngine::new();
    let outcome = engine.evaluate_formula("1 / (2 - 2)", &EvaluationContext::simple());
    assert!(!outcome.valid);
    assert_eq!(outcome.error, Some(FormulaError::DivideByZero));
    assert_eq!(outcome.result, Scalar::Null);
}

#[test]
fn test_round_half_away_from_zero() {
    let engine = FormulaEngine::new();
    let ctx = EvaluationContext::simple();
    assert_eq!(engine.evaluate_str("ROUND(2.345, 2)", &ctx).unwrap(), Scalar::Number(2.35));
    assert_eq!(engine.evaluate_str("ROUND(-2.5, 0)", &ctx).unwrap(), Scalar::Number(-3.0));
}

/// Out-of-range numeric arguments come back as errors
#[test]
fn test_extreme_arguments() {
    let engine = FormulaEngine::new();
    let ctx = EvaluationContext::simple();
    for formula in [
        "TOCHINESE(1000000000000000000000000000)",
        "MID('abc', -1000000000000000000000000, 1)",
        "PADLEFT('a', 100000000000000)",
    ] {
        let outcome = engine.evaluate_formula(formula, &ctx);
        assert!(
            matches!(outcome.error, Some(FormulaError::InvalidArgument { .. })),
            "{formula}: {:?}",
            outcome.error
        );
    }
    assert_eq!(
        engine.evaluate_str("ROUND(1, -100000000000000000000)", &ctx).unwrap(),
        Scalar::Number(0.0)
    );
}

/// Host-registered functions are listed and callable
#[test]
fn test_register_function() {
    let mut engine = FormulaEngine::new();
    engine.register_function(
        FunctionDef::custom("DOUBLE", Arity::exact(1), |args, _ctx| {
            Ok(Scalar::Number(args[0].as_number().unwrap_or(0.0) * 2.0))
        })
        .with_description("Twice the argument"),
    );

    let info = engine
        .registered_functions()
        .into_iter()
        .find(|f| f.name == "DOUBLE")
        .unwrap();
    assert_eq!(info.category, FunctionCategory::Custom);

    assert!(engine.validate_formula("DOUBLE({a})", &fields()).valid);
    let rec = record([("a", Scalar::from(21))]);
    assert_eq!(
        engine.evaluate_str("DOUBLE({a})", &EvaluationContext::new(&rec)).unwrap(),
        Scalar::Number(42.0)
    );
}
