//! Formula evaluator
//!
//! Evaluates formula ASTs against an [`EvaluationContext`].

use crate::ast::{BinaryOperator, Expr};
use crate::context::EvaluationContext;
use crate::error::{FormulaError, FormulaResult};
use crate::functions::{FunctionBody, FunctionRegistry, RowScope};
use crate::variables::resolve_variable;
use bandwork_core::Scalar;

/// Walks an expression tree, resolving functions through a registry
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'r> {
    registry: &'r FunctionRegistry,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r FunctionRegistry {
        self.registry
    }

    /// Evaluate a formula expression
    pub fn evaluate(&self, expr: &Expr, ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),

            Expr::Variable(name) => resolve_variable(name, ctx),

            Expr::Wildcard => Err(FormulaError::Syntax(
                "'*' is only allowed as COUNT(*) or PAGECOUNT(*)".into(),
            )),

            Expr::Negate(inner) => {
                let value = self.evaluate(inner, ctx)?;
                let n = numeric_operand('-', &value)?;
                Ok(Scalar::Number(-n))
            }

            Expr::BinaryOp { op, left, right } => {
                let left = self.evaluate(left, ctx)?;
                let right = self.evaluate(right, ctx)?;
                evaluate_binary_op(*op, &left, &right)
            }

            Expr::Function { name, args } => self.evaluate_function(name, args, ctx),
        }
    }

    /// Evaluate a function call
    fn evaluate_function(
        &self,
        name: &str,
        args: &[Expr],
        ctx: &EvaluationContext<'_>,
    ) -> FormulaResult<Scalar> {
        let func = self
            .registry
            .get(name)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

        // Check argument count
        if !func.arity.accepts(args.len()) {
            return Err(FormulaError::Arity {
                function: name.to_string(),
                expected: func.arity.to_string(),
                actual: args.len(),
            });
        }

        let result = match &func.body {
            FunctionBody::Lazy(f) => f(args, ctx, self)?,
            FunctionBody::Aggregate { scope, reduce } => {
                let rows = match scope {
                    RowScope::All => ctx.all_detail_rows,
                    RowScope::Page => ctx.page_detail_rows,
                };
                let arg = args.first().unwrap_or(&Expr::Wildcard);
                let values = self.collect_rows(arg, rows, ctx)?;
                reduce(&values)
            }
            FunctionBody::Eager(f) => {
                if let Some(pos) = args.iter().position(|a| matches!(a, Expr::Wildcard)) {
                    return Err(FormulaError::Syntax(format!(
                        "'*' is not a valid argument {} of {}",
                        pos + 1,
                        name
                    )));
                }
                let mut evaluated_args = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated_args.push(self.evaluate(arg, ctx)?);
                }
                f(&evaluated_args, ctx)?
            }
        };

        finite(result)
    }

    /// Evaluate an aggregate argument once per row
    ///
    /// A row whose value cannot be computed (missing field, bad operand)
    /// contributes null instead of failing the whole aggregate.
    fn collect_rows(
        &self,
        arg: &Expr,
        rows: &[bandwork_core::Record],
        ctx: &EvaluationContext<'_>,
    ) -> FormulaResult<Vec<Scalar>> {
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let value = match arg {
                Expr::Wildcard => Scalar::Number(1.0),
                expr => match self.evaluate(expr, &ctx.for_row(row)) {
                    Ok(v) => v,
                    Err(
                        FormulaError::MissingField(_)
                        | FormulaError::TypeMismatch(_)
                        | FormulaError::DivideByZero,
                    ) => Scalar::Null,
                    Err(e) => return Err(e),
                },
            };
            values.push(value);
        }
        Ok(values)
    }
}

/// Numeric view of an arithmetic operand
///
/// Numbers, booleans and null take part in arithmetic; strings and dates
/// do not.
fn numeric_operand(op: char, value: &Scalar) -> FormulaResult<f64> {
    match value {
        Scalar::Number(n) => Ok(*n),
        Scalar::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Scalar::Null => Ok(0.0),
        Scalar::String(_) | Scalar::Date(_) => Err(FormulaError::TypeMismatch(format!(
            "cannot apply '{}' to {} value '{}'",
            op,
            value.type_name(),
            value
        ))),
    }
}

fn finite(value: Scalar) -> FormulaResult<Scalar> {
    match value {
        Scalar::Number(n) if !n.is_finite() => Err(FormulaError::DivideByZero),
        other => Ok(other),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(op: BinaryOperator, left: &Scalar, right: &Scalar) -> FormulaResult<Scalar> {
    // `+` with any string operand concatenates
    if op == BinaryOperator::Add
        && (matches!(left, Scalar::String(_)) || matches!(right, Scalar::String(_)))
    {
        return Ok(Scalar::String(format!("{}{}", left, right)));
    }

    let l = numeric_operand(op.symbol(), left)?;
    let r = numeric_operand(op.symbol(), right)?;

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return Err(FormulaError::DivideByZero);
            }
            l / r
        }
    };

    finite(Scalar::Number(result))
}
