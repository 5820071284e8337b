//! Finance functions
//!
//! Rates are percentages: `TAX(100, 13)` is 13% of 100.

use super::number_arg;
use crate::context::EvaluationContext;
use crate::error::FormulaResult;
use bandwork_core::Scalar;

fn amount_and_rate(function: &str, args: &[Scalar]) -> FormulaResult<(f64, f64)> {
    Ok((
        number_arg(function, args, 0)?,
        number_arg(function, args, 1)? / 100.0,
    ))
}

/// DISCOUNT(amount, rate): amount after the discount
pub fn fn_discount(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let (amount, rate) = amount_and_rate("DISCOUNT", args)?;
    Ok(Scalar::Number(amount * (1.0 - rate)))
}

/// TAX(amount, rate): tax owed on a net amount
pub fn fn_tax(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let (amount, rate) = amount_and_rate("TAX", args)?;
    Ok(Scalar::Number(amount * rate))
}

/// WITHTAX(amount, rate): net amount plus tax
pub fn fn_withtax(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let (amount, rate) = amount_and_rate("WITHTAX", args)?;
    Ok(Scalar::Number(amount * (1.0 + rate)))
}

/// EXTRACTTAX(gross, rate): tax contained in a gross amount
pub fn fn_extracttax(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let (gross, rate) = amount_and_rate("EXTRACTTAX", args)?;
    Ok(Scalar::Number(gross - gross / (1.0 + rate)))
}
