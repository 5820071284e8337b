//! String functions
//!
//! Lengths and offsets count characters, not bytes.

use super::{integer_arg, string_arg};
use crate::context::EvaluationContext;
use crate::error::FormulaResult;
use bandwork_core::Scalar;

fn clamp_count(n: i64, len: usize) -> usize {
    n.clamp(0, len as i64) as usize
}

/// CONCAT(value, ...)
pub fn fn_concat(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let joined: String = args.iter().map(Scalar::to_display_string).collect();
    Ok(Scalar::String(joined))
}

/// LEFT(text, n)
pub fn fn_left(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let text = string_arg(args, 0);
    let len = text.chars().count();
    let n = clamp_count(integer_arg("LEFT", args, 1)?, len);
    Ok(Scalar::String(text.chars().take(n).collect()))
}

/// RIGHT(text, n)
pub fn fn_right(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let text = string_arg(args, 0);
    let len = text.chars().count();
    let n = clamp_count(integer_arg("RIGHT", args, 1)?, len);
    Ok(Scalar::String(text.chars().skip(len - n).collect()))
}

/// MID(text, start, n), `start` is 1-based
pub fn fn_mid(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let text = string_arg(args, 0);
    let len = text.chars().count();
    let start = clamp_count(integer_arg("MID", args, 1)?.saturating_sub(1), len);
    let n = clamp_count(integer_arg("MID", args, 2)?, len - start);
    Ok(Scalar::String(text.chars().skip(start).take(n).collect()))
}

/// LEN function
pub fn fn_len(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::from(string_arg(args, 0).chars().count()))
}

/// TRIM function
pub fn fn_trim(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::String(string_arg(args, 0).trim().to_string()))
}

/// UPPER function
pub fn fn_upper(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::String(string_arg(args, 0).to_uppercase()))
}

/// LOWER function
pub fn fn_lower(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::String(string_arg(args, 0).to_lowercase()))
}

/// REPLACE(text, search, replacement): every occurrence
pub fn fn_replace(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let text = string_arg(args, 0);
    let search = string_arg(args, 1);
    if search.is_empty() {
        return Ok(Scalar::String(text));
    }
    Ok(Scalar::String(text.replace(&search, &string_arg(args, 2))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;
    use pretty_assertions::assert_eq;

    fn call(
        f: fn(&[Scalar], &EvaluationContext<'_>) -> FormulaResult<Scalar>,
        args: &[Scalar],
    ) -> Scalar {
        f(args, &EvaluationContext::simple()).unwrap()
    }

    fn s(v: &str) -> Scalar {
        Scalar::from(v)
    }

    #[test]
    fn test_concat_coerces() {
        assert_eq!(
            call(fn_concat, &[s("No."), Scalar::from(12), Scalar::Null, Scalar::from(true)]),
            s("No.12true")
        );
    }

    #[test]
    fn test_left_right_clamp() {
        assert_eq!(call(fn_left, &[s("Hello"), Scalar::from(2)]), s("He"));
        assert_eq!(call(fn_left, &[s("Hello"), Scalar::from(99)]), s("Hello"));
        assert_eq!(call(fn_left, &[s("Hello"), Scalar::from(-1)]), s(""));
        assert_eq!(call(fn_right, &[s("Hello"), Scalar::from(3)]), s("llo"));
        assert_eq!(call(fn_right, &[s("Hello"), Scalar::from(10)]), s("Hello"));
        assert_eq!(call(fn_right, &[s("发票编号"), Scalar::from(2)]), s("编号"));
    }

    #[test]
    fn test_mid() {
        assert_eq!(call(fn_mid, &[s("abcdef"), Scalar::from(2), Scalar::from(3)]), s("bcd"));
        assert_eq!(call(fn_mid, &[s("abcdef"), Scalar::from(0), Scalar::from(2)]), s("ab"));
        assert_eq!(call(fn_mid, &[s("abc"), Scalar::from(3), Scalar::from(9)]), s("c"));
        assert_eq!(call(fn_mid, &[s("abc"), Scalar::from(9), Scalar::from(1)]), s(""));
        assert_eq!(call(fn_mid, &[s("abc"), Scalar::from(-5), Scalar::from(2)]), s("ab"));
    }

    #[test]
    fn test_huge_offsets_are_rejected() {
        let ctx = EvaluationContext::simple();
        let start = Scalar::Number(-1e24);
        assert!(matches!(
            fn_mid(&[s("abc"), start, Scalar::from(1)], &ctx),
            Err(FormulaError::InvalidArgument { .. })
        ));
        assert!(matches!(
            fn_left(&[s("abc"), Scalar::Number(1e30)], &ctx),
            Err(FormulaError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_len_trim_case() {
        assert_eq!(call(fn_len, &[s("金额")]), Scalar::Number(2.0));
        assert_eq!(call(fn_len, &[Scalar::from(12.5)]), Scalar::Number(4.0));
        assert_eq!(call(fn_trim, &[s("  a b  ")]), s("a b"));
        assert_eq!(call(fn_upper, &[s("abc")]), s("ABC"));
        assert_eq!(call(fn_lower, &[s("ABC")]), s("abc"));
    }

    #[test]
    fn test_replace_all() {
        assert_eq!(call(fn_replace, &[s("a-b-c"), s("-"), s("/")]), s("a/b/c"));
        assert_eq!(call(fn_replace, &[s("abc"), s(""), s("x")]), s("abc"));
    }
}
