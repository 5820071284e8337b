//! Property tests over generated formulas

use bandwork_core::{record, DataField, Record, Scalar};
use bandwork_formula::{parse_formula, EvaluationContext, FormulaEngine};
use proptest::prelude::*;

const FIELDS: [&str; 3] = ["price", "qty", "name"];

fn fields() -> Vec<DataField> {
    FIELDS.iter().map(|f| DataField::detail(*f)).collect()
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        (0u32..100, 1u32..100).prop_map(|(a, b)| format!("{}.{}", a, b)),
        prop::sample::select(FIELDS.to_vec()).prop_map(|f| format!("{{{}}}", f)),
        prop::sample::select(vec!["pageNumber", "rowIndex", "totalPages"])
            .prop_map(|v| format!("{{{}}}", v)),
        "[a-z]{0,6}".prop_map(|s| format!("'{}'", s)),
    ]
}

fn formula() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/"]), inner.clone())
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.clone().prop_map(|e| format!("-{}", e)),
            inner.clone().prop_map(|e| format!("SUM({})", e)),
            inner.clone().prop_map(|e| format!("PAGEAVG({})", e)),
            (inner.clone(), 0u32..4).prop_map(|(e, d)| format!("ROUND({}, {})", e, d)),
            (inner.clone(), inner.clone(), inner)
                .prop_map(|(c, a, b)| format!("IF({}, {}, {})", c, a, b)),
        ]
    })
}

const BOUNDARY_ARGS: [&str; 10] = [
    "0",
    "-0.5",
    "0.5",
    "1000000000000000000000000000",
    "-1000000000000000000000000000",
    "-100000000000000000000",
    "100000000000000",
    "79228162514264337593543950335",
    "'abc'",
    "{price}",
];

/// A call of a registered function with boundary arguments, within its arity
fn boundary_call() -> impl Strategy<Value = String> {
    let infos = FormulaEngine::new().registered_functions();
    prop::sample::select(infos).prop_flat_map(|info| {
        let max = info.arity.max.unwrap_or(info.arity.min + 2).min(info.arity.min + 3);
        prop::collection::vec(prop::sample::select(BOUNDARY_ARGS.to_vec()), info.arity.min..=max)
            .prop_map(move |args| format!("{}({})", info.name, args.join(", ")))
    })
}

fn rows() -> Vec<Record> {
    (1..=4)
        .map(|i| {
            record([
                ("price", Scalar::from(i as f64 * 2.5)),
                ("qty", Scalar::from(i)),
                ("name", Scalar::from(format!("item{}", i))),
            ])
        })
        .collect()
}

proptest! {
    #[test]
    fn generated_formulas_validate(text in formula()) {
        let engine = FormulaEngine::new();
        let outcome = engine.validate_formula(&text, &fields());
        prop_assert!(outcome.valid, "{} -> {}", text, outcome.message);
    }

    #[test]
    fn evaluation_is_repeatable(text in formula()) {
        let engine = FormulaEngine::new();
        let rows = rows();
        let ctx = EvaluationContext::new(&rows[0])
            .with_rows(&rows, &rows[..2])
            .with_position(0, 1, 2);
        let first = engine.evaluate_formula(&text, &ctx);
        let second = engine.evaluate_formula(&text, &ctx);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn display_reparses_to_same_tree(text in formula()) {
        let expr = parse_formula(&text).unwrap();
        let again = parse_formula(&expr.to_string()).unwrap();
        prop_assert_eq!(again, expr);
    }

    #[test]
    fn evaluation_never_yields_non_finite(text in formula()) {
        let engine = FormulaEngine::new();
        let rows = rows();
        let ctx = EvaluationContext::new(&rows[1]).with_rows(&rows, &rows);
        if let Ok(Scalar::Number(n)) = engine.evaluate_str(&text, &ctx) {
            prop_assert!(n.is_finite());
        }
    }

    #[test]
    fn builtins_survive_boundary_arguments(text in boundary_call()) {
        let engine = FormulaEngine::new();
        let rows = rows();
        let ctx = EvaluationContext::new(&rows[0])
            .with_rows(&rows, &rows[..2])
            .with_position(0, 1, 2);
        match engine.evaluate_str(&text, &ctx) {
            Ok(Scalar::Number(n)) => prop_assert!(n.is_finite(), "{} -> {}", text, n),
            Ok(Scalar::String(s)) => prop_assert!(s.len() <= 4096, "{} -> {} bytes", text, s.len()),
            Ok(_) | Err(_) => {}
        }
    }
}
