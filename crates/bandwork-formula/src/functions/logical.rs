//! Logical functions
//!
//! IF, ISNULL, AND and OR only evaluate the arguments they need, so a
//! missing field in the branch not taken does not fail the formula.

use crate::ast::Expr;
use crate::context::EvaluationContext;
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::Evaluator;
use bandwork_core::Scalar;

/// IF(cond, then, else) / IIF
pub fn fn_if(
    args: &[Expr],
    ctx: &EvaluationContext<'_>,
    evaluator: &Evaluator<'_>,
) -> FormulaResult<Scalar> {
    let condition = evaluator.evaluate(&args[0], ctx)?;
    let branch = if condition.is_truthy() { &args[1] } else { &args[2] };
    evaluator.evaluate(branch, ctx)
}

/// ISNULL(value, default)
pub fn fn_isnull(
    args: &[Expr],
    ctx: &EvaluationContext<'_>,
    evaluator: &Evaluator<'_>,
) -> FormulaResult<Scalar> {
    match evaluator.evaluate(&args[0], ctx) {
        Ok(value) if !value.is_blank() => Ok(value),
        Ok(_) | Err(FormulaError::MissingField(_)) => evaluator.evaluate(&args[1], ctx),
        Err(e) => Err(e),
    }
}

/// AND function
pub fn fn_and(
    args: &[Expr],
    ctx: &EvaluationContext<'_>,
    evaluator: &Evaluator<'_>,
) -> FormulaResult<Scalar> {
    for arg in args {
        if !evaluator.evaluate(arg, ctx)?.is_truthy() {
            return Ok(Scalar::Boolean(false));
        }
    }
    Ok(Scalar::Boolean(true))
}

/// OR function
pub fn fn_or(
    args: &[Expr],
    ctx: &EvaluationContext<'_>,
    evaluator: &Evaluator<'_>,
) -> FormulaResult<Scalar> {
    for arg in args {
        if evaluator.evaluate(arg, ctx)?.is_truthy() {
            return Ok(Scalar::Boolean(true));
        }
    }
    Ok(Scalar::Boolean(false))
}

/// NOT function
pub fn fn_not(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::Boolean(!args[0].is_truthy()))
}
