//! Math functions

use super::{integer_arg, number_arg, optional_number_arg};
use crate::context::EvaluationContext;
use crate::error::{FormulaError, FormulaResult};
use bandwork_core::Scalar;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Digit counts past this round every finite `f64` to itself or zero
const MAX_ROUND_DIGITS: i32 = 308;

/// Round half away from zero to `digits` decimals
///
/// Goes through the shortest decimal representation of `n` so that
/// `2.345` rounds to `2.35` even though its binary value is slightly below.
pub fn round_half_up(n: f64, digits: i32) -> f64 {
    if !n.is_finite() {
        return n;
    }
    let digits = digits.clamp(-MAX_ROUND_DIGITS, MAX_ROUND_DIGITS);
    if (0..=28).contains(&digits) {
        let rounded = Decimal::from_str(&n.to_string()).ok().and_then(|d| {
            d.round_dp_with_strategy(digits as u32, RoundingStrategy::MidpointAwayFromZero)
                .to_string()
                .parse::<f64>()
                .ok()
        });
        if let Some(r) = rounded {
            return r;
        }
    }
    if digits < 0 {
        let factor = 10f64.powi(-digits);
        let rounded = (n / factor).round() * factor;
        return if rounded.is_finite() { rounded } else { n };
    }
    let factor = 10f64.powi(digits);
    let scaled = n * factor;
    if !scaled.is_finite() {
        return n;
    }
    scaled.round() / factor
}

/// ROUND(value, [digits])
pub fn fn_round(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let n = number_arg("ROUND", args, 0)?;
    let limit = f64::from(MAX_ROUND_DIGITS);
    let digits = optional_number_arg("ROUND", args, 1, 0.0)?
        .trunc()
        .clamp(-limit, limit) as i32;
    Ok(Scalar::Number(round_half_up(n, digits)))
}

/// FLOOR function
pub fn fn_floor(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::Number(number_arg("FLOOR", args, 0)?.floor()))
}

/// CEIL function
pub fn fn_ceil(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::Number(number_arg("CEIL", args, 0)?.ceil()))
}

/// ABS function
pub fn fn_abs(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::Number(number_arg("ABS", args, 0)?.abs()))
}

/// MOD(a, b): truncating remainder, the sign follows `a`
pub fn fn_mod(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let a = number_arg("MOD", args, 0)?;
    let b = number_arg("MOD", args, 1)?;
    if b == 0.0 {
        return Err(FormulaError::DivideByZero);
    }
    Ok(Scalar::Number(a % b))
}

/// Digit count argument clamped to what formatting supports
pub(crate) fn decimals_arg(
    function: &str,
    args: &[Scalar],
    index: usize,
    default: i64,
) -> FormulaResult<usize> {
    let digits = match args.get(index) {
        Some(_) => integer_arg(function, args, index)?,
        None => default,
    };
    Ok(digits.clamp(0, 20) as usize)
}
