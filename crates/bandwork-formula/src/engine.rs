//! The formula engine facade used by the editor and the print pass

use crate::ast::Expr;
use crate::context::EvaluationContext;
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::Evaluator;
use crate::functions::{FunctionDef, FunctionInfo, FunctionRegistry};
use crate::parser::parse_formula;
use crate::validate::quick_check;
use crate::variables::KnownVariables;
use bandwork_core::{DataField, Scalar};

/// Result of [`FormulaEngine::validate_formula`]
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Human readable verdict, the error text when invalid
    pub message: String,
    pub error: Option<FormulaError>,
}

/// Result of [`FormulaEngine::evaluate_formula`]
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    pub valid: bool,
    /// Computed value, null when evaluation failed
    pub result: Scalar,
    pub message: Option<String>,
    pub error: Option<FormulaError>,
}

impl EvaluationOutcome {
    fn from_result(result: FormulaResult<Scalar>) -> Self {
        match result {
            Ok(value) => Self {
                valid: true,
                result: value,
                message: None,
                error: None,
            },
            Err(e) => Self {
                valid: false,
                result: Scalar::Null,
                message: Some(e.to_string()),
                error: Some(e),
            },
        }
    }
}

/// Parser, validator and evaluator over one function registry
///
/// # Example
///
/// ```rust
/// use bandwork_core::{record, DataField, Scalar};
/// use bandwork_formula::{EvaluationContext, FormulaEngine};
///
/// let engine = FormulaEngine::new();
/// let fields = [DataField::master("a"), DataField::master("b")];
/// assert!(engine.validate_formula("{a} + {b}", &fields).valid);
///
/// let rec = record([("a", Scalar::from(2)), ("b", Scalar::from(3))]);
/// let outcome = engine.evaluate_formula("{a} + {b}", &EvaluationContext::new(&rec));
/// assert_eq!(outcome.result, Scalar::Number(5.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormulaEngine {
    registry: FunctionRegistry,
}

impl FormulaEngine {
    /// Engine with every built-in function
    pub fn new() -> Self {
        Self::with_registry(FunctionRegistry::new())
    }

    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Add or replace a function
    pub fn register_function(&mut self, def: FunctionDef) {
        self.registry.register(def);
    }

    /// Every registered function, sorted by name
    pub fn registered_functions(&self) -> Vec<FunctionInfo> {
        self.registry.functions()
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.registry)
    }

    /// Parse without checking names
    pub fn parse(&self, formula: &str) -> FormulaResult<Expr> {
        parse_formula(formula)
    }

    /// Full design-time check, returning the parsed expression
    ///
    /// Runs the token-level checks, the full parse, then resolves every
    /// function call and checks its argument count.
    pub fn check_formula(&self, formula: &str, fields: &[DataField]) -> FormulaResult<Expr> {
        let known = KnownVariables::new(fields);
        quick_check(formula, &self.registry, &known)?;
        let expr = parse_formula(formula)?;
        self.check_calls(&expr)?;
        Ok(expr)
    }

    fn check_calls(&self, expr: &Expr) -> FormulaResult<()> {
        match expr {
            Expr::Function { name, args } => {
                let def = self
                    .registry
                    .get(name)
                    .ok_or_else(|| FormulaError::UnknownFunction(name.clone()))?;
                if !def.arity.accepts(args.len()) {
                    return Err(FormulaError::Arity {
                        function: name.clone(),
                        expected: def.arity.to_string(),
                        actual: args.len(),
                    });
                }
                args.iter().try_for_each(|arg| self.check_calls(arg))
            }
            Expr::Negate(inner) => self.check_calls(inner),
            Expr::BinaryOp { left, right, .. } => {
                self.check_calls(left)?;
                self.check_calls(right)
            }
            Expr::Literal(_) | Expr::Variable(_) | Expr::Wildcard => Ok(()),
        }
    }

    /// Validate a formula against the declared data fields
    pub fn validate_formula(&self, formula: &str, fields: &[DataField]) -> ValidationOutcome {
        match self.check_formula(formula, fields) {
            Ok(_) => ValidationOutcome {
                valid: true,
                message: "Formula is valid".to_string(),
                error: None,
            },
            Err(e) => {
                log::debug!("formula rejected: {:?}: {}", formula, e);
                ValidationOutcome {
                    valid: false,
                    message: e.to_string(),
                    error: Some(e),
                }
            }
        }
    }

    /// Evaluate a parsed expression
    pub fn evaluate(&self, expr: &Expr, ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
        self.evaluator().evaluate(expr, ctx)
    }

    /// Parse and evaluate formula text
    pub fn evaluate_str(&self, formula: &str, ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
        let expr = parse_formula(formula)?;
        self.evaluate(&expr, ctx)
    }

    /// Parse and evaluate, folding any failure into the outcome
    pub fn evaluate_formula(&self, formula: &str, ctx: &EvaluationContext<'_>) -> EvaluationOutcome {
        EvaluationOutcome::from_result(self.evaluate_str(formula, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Arity;
    use bandwork_core::record;
    use pretty_assertions::assert_eq;

    fn fields() -> Vec<DataField> {
        vec![
            DataField::master("customer"),
            DataField::detail("amount"),
            DataField::detail("price"),
            DataField::detail("qty"),
        ]
    }

    #[test]
    fn test_validate_ok() {
        let engine = FormulaEngine::new();
        for formula in [
            "{price} * {qty}",
            "SUM({amount})",
            "COUNT(*)",
            "TOCHINESE(SUM({amount}))",
            "IF({qty} - 1, 'many', 'one')",
            "CONCAT({customer}, ' - ', {pageNumber}, '/', {totalPages})",
            "NOW()",
        ] {
            let outcome = engine.validate_formula(formula, &fields());
            assert!(outcome.valid, "{}: {}", formula, outcome.message);
        }
    }

    #[test]
    fn test_validate_unknown_variable() {
        let engine = FormulaEngine::new();
        let outcome = engine.validate_formula("{unknownField}", &fields());
        assert!(!outcome.valid);
        assert!(outcome.message.contains("unknownField"));
        assert_eq!(
            outcome.error,
            Some(FormulaError::UnknownVariables(vec!["unknownField".into()]))
        );
    }

    #[test]
    fn test_validate_unknown_function_and_arity() {
        let engine = FormulaEngine::new();
        assert_eq!(
            engine.check_formula("FOO({qty})", &fields()),
            Err(FormulaError::UnknownFunction("FOO".into()))
        );
        assert_eq!(
            engine.check_formula("sum({qty})", &fields()),
            Err(FormulaError::UnknownFunction("sum".into()))
        );
        assert!(matches!(
            engine.check_formula("LEFT({customer})", &fields()),
            Err(FormulaError::Arity { .. })
        ));
        assert!(matches!(
            engine.check_formula("FOO()", &fields()),
            Err(FormulaError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_validate_syntax_first() {
        let engine = FormulaEngine::new();
        let err = engine.check_formula("SUM({nope}", &fields()).unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn test_evaluate_formula_outcome() {
        let engine = FormulaEngine::new();
        let rec = record([("a", Scalar::from(2)), ("b", Scalar::from(3))]);
        let ctx = EvaluationContext::new(&rec);

        let ok = engine.evaluate_formula("{a} + {b}", &ctx);
        assert!(ok.valid);
        assert_eq!(ok.result, Scalar::Number(5.0));
        assert_eq!(ok.message, None);

        let bad = engine.evaluate_formula("{a} / 0", &ctx);
        assert!(!bad.valid);
        assert_eq!(bad.result, Scalar::Null);
        assert_eq!(bad.error, Some(FormulaError::DivideByZero));
    }

    #[test]
    fn test_registered_custom_function_validates() {
        let mut engine = FormulaEngine::new();
        engine.register_function(FunctionDef::custom("VAT", Arity::exact(1), |args, _| {
            Ok(Scalar::Number(args[0].as_number().unwrap_or(0.0) * 0.2))
        }));
        assert!(engine.validate_formula("VAT({amount})", &fields()).valid);
        assert!(engine
            .registered_functions()
            .iter()
            .any(|f| f.name == "VAT"));
    }
}
