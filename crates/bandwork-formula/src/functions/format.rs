//! Formatting functions
//!
//! The helpers here are also used by the print pass to format field values.

use super::date::{as_date, format_date, is_date_pattern};
use super::math::{decimals_arg, round_half_up};
use super::{integer_arg, number_arg, string_arg};
use crate::context::EvaluationContext;
use crate::error::{FormulaError, FormulaResult};
use bandwork_core::Scalar;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const CN_DIGITS: [char; 10] = ['零', '壹', '贰', '叁', '肆', '伍', '陆', '柒', '捌', '玖'];
const CN_UNITS: [&str; 4] = ["", "拾", "佰", "仟"];
const CN_GROUPS: [&str; 4] = ["", "万", "亿", "万亿"];

/// Default currency symbol
pub const DEFAULT_CURRENCY_SYMBOL: &str = "¥";

/// Insert `,` every three digits of an unsigned integer string
pub fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed decimals, optional thousands separators
pub fn format_fixed(n: f64, decimals: usize, grouped: bool) -> String {
    let rounded = round_half_up(n, decimals as i32);
    let text = format!("{:.*}", decimals, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };
    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    if grouped {
        out.push_str(&group_thousands(&int_part));
    } else {
        out.push_str(&int_part);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Currency text: symbol, thousands separators, fixed decimals
pub fn format_currency(n: f64, symbol: &str, decimals: usize) -> String {
    let body = format_fixed(n.abs(), decimals, true);
    if round_half_up(n, decimals as i32) < 0.0 {
        format!("-{}{}", symbol, body)
    } else {
        format!("{}{}", symbol, body)
    }
}

/// Apply a number pattern such as `#,##0.00`, `0.0%`, `¥#,##0` or `0000`
///
/// Text before and after the `#0,.` core is copied; a `%` anywhere
/// outside the core scales the value by 100.
pub fn format_number_pattern(n: f64, pattern: &str) -> String {
    let is_core = |c: char| matches!(c, '#' | '0' | ',' | '.');
    let (Some(start), Some(end)) = (pattern.find(is_core), pattern.rfind(is_core)) else {
        return format!("{}{}", bandwork_core::format_number(n), pattern);
    };
    let prefix = &pattern[..start];
    let core = &pattern[start..=end];
    let suffix = &pattern[end + 1..];

    let value = if prefix.contains('%') || suffix.contains('%') {
        n * 100.0
    } else {
        n
    };

    let (int_pattern, frac_pattern) = core.split_once('.').unwrap_or((core, ""));
    let grouped = int_pattern.contains(',');
    let min_int = int_pattern.chars().filter(|&c| c == '0').count();
    let min_frac = frac_pattern.chars().filter(|&c| c == '0').count();
    let max_frac = frac_pattern.chars().filter(|&c| c == '0' || c == '#').count();

    let rounded = round_half_up(value, max_frac as i32);
    let text = format!("{:.*}", max_frac, rounded.abs());
    let (int_digits, frac_digits) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut frac = frac_digits.to_string();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }
    let mut int = int_digits.to_string();
    if int == "0" && min_int == 0 && !frac.is_empty() {
        int.clear();
    }
    while int.len() < min_int {
        int.insert(0, '0');
    }
    if grouped {
        int = group_thousands(&int);
    }

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(prefix);
    out.push_str(&int);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out.push_str(suffix);
    out
}

fn group_to_chinese(group: u64, out: &mut String) {
    let mut pending_zero = false;
    let mut started = false;
    for pos in (0..4).rev() {
        let digit = (group / 10u64.pow(pos as u32) % 10) as usize;
        if digit == 0 {
            pending_zero = started;
            continue;
        }
        if pending_zero {
            out.push(CN_DIGITS[0]);
        }
        out.push(CN_DIGITS[digit]);
        out.push_str(CN_UNITS[pos]);
        pending_zero = false;
        started = true;
    }
}

/// Amount in upper-case Chinese, e.g. `1234.56` → `壹仟贰佰叁拾肆元伍角陆分`
///
/// Rounds to the fen; `None` when the integer part exceeds sixteen digits.
pub fn to_chinese_upper(n: f64) -> Option<String> {
    let cents = Decimal::from_str(&n.abs().to_string())
        .ok()?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)?;
    let cents: u64 = cents.trunc().to_string().parse().ok()?;

    let integer = cents / 100;
    let jiao = (cents / 10 % 10) as usize;
    let fen = (cents % 10) as usize;
    if integer >= 10u64.pow(16) {
        return None;
    }
    if cents == 0 {
        return Some("零元整".to_string());
    }

    let mut out = String::new();
    if n < 0.0 {
        out.push('负');
    }

    if integer > 0 {
        let groups: Vec<u64> = (0..4)
            .map(|i| integer / 10_000u64.pow(i) % 10_000)
            .collect();
        let mut written = false;
        let mut need_zero = false;
        for idx in (0..4).rev() {
            let group = groups[idx];
            if group == 0 {
                need_zero = written;
                continue;
            }
            if written && (need_zero || group < 1000) {
                out.push(CN_DIGITS[0]);
            }
            group_to_chinese(group, &mut out);
            out.push_str(CN_GROUPS[idx]);
            written = true;
            need_zero = false;
        }
        out.push('元');
    }

    if jiao == 0 && fen == 0 {
        out.push('整');
        return Some(out);
    }
    if jiao > 0 {
        out.push(CN_DIGITS[jiao]);
        out.push('角');
    } else if integer > 0 {
        out.push(CN_DIGITS[0]);
    }
    if fen > 0 {
        out.push(CN_DIGITS[fen]);
        out.push('分');
    } else {
        out.push('整');
    }
    Some(out)
}

/// FORMAT(value, pattern)
pub fn fn_format(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let pattern = string_arg(args, 1);
    let value = &args[0];

    if is_date_pattern(&pattern) {
        if let Some(date) = as_date(value) {
            return Ok(Scalar::String(format_date(&date, &pattern)));
        }
    }
    let n = number_arg("FORMAT", args, 0)?;
    Ok(Scalar::String(format_number_pattern(n, &pattern)))
}

/// FIXED(number, [decimals = 2])
pub fn fn_fixed(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let n = number_arg("FIXED", args, 0)?;
    let decimals = decimals_arg("FIXED", args, 1, 2)?;
    Ok(Scalar::String(format_fixed(n, decimals, false)))
}

/// Widest result PADLEFT will build
pub const MAX_PAD_WIDTH: usize = 1024;

/// PADLEFT(value, width, [pad = "0"])
pub fn fn_padleft(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let text = string_arg(args, 0);
    let width = integer_arg("PADLEFT", args, 1)?.max(0) as usize;
    if width > MAX_PAD_WIDTH {
        return Err(FormulaError::invalid_argument(
            "PADLEFT",
            format!("width {} exceeds {}", width, MAX_PAD_WIDTH),
        ));
    }
    let pad = match args.get(2) {
        Some(_) => string_arg(args, 2).chars().next(),
        None => Some('0'),
    };
    let len = text.chars().count();
    match pad {
        Some(c) if len < width => {
            let mut out: String = std::iter::repeat(c).take(width - len).collect();
            out.push_str(&text);
            Ok(Scalar::String(out))
        }
        _ => Ok(Scalar::String(text)),
    }
}

/// TOCHINESE(amount)
pub fn fn_tochinese(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let n = number_arg("TOCHINESE", args, 0)?;
    to_chinese_upper(n)
        .map(Scalar::String)
        .ok_or_else(|| FormulaError::invalid_argument("TOCHINESE", format!("{} is out of range", n)))
}

/// CURRENCY(number, [symbol = "¥"], [decimals = 2])
pub fn fn_currency(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let n = number_arg("CURRENCY", args, 0)?;
    let symbol = match args.get(1) {
        Some(_) => string_arg(args, 1),
        None => DEFAULT_CURRENCY_SYMBOL.to_string(),
    };
    let decimals = decimals_arg("CURRENCY", args, 2, 2)?;
    Ok(Scalar::String(format_currency(n, &symbol, decimals)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(
        f: fn(&[Scalar], &EvaluationContext<'_>) -> FormulaResult<Scalar>,
        args: &[Scalar],
    ) -> String {
        f(args, &EvaluationContext::simple()).unwrap().to_string()
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1000"), "1,000");
    }

    #[test]
    fn test_number_patterns() {
        assert_eq!(format_number_pattern(1234.5, "#,##0.00"), "1,234.50");
        assert_eq!(format_number_pattern(0.256, "0.0%"), "25.6%");
        assert_eq!(format_number_pattern(-9876.543, "¥#,##0.0"), "-¥9,876.5");
        assert_eq!(format_number_pattern(42.0, "0000"), "0042");
        assert_eq!(format_number_pattern(3.10, "0.##"), "3.1");
        assert_eq!(format_number_pattern(7.0, "#.##"), "7");
    }

    #[test]
    fn test_format_dispatch() {
        assert_eq!(call(fn_format, &[Scalar::from(1234.5), Scalar::from("#,##0.00")]), "1,234.50");
        assert_eq!(
            call(fn_format, &[Scalar::from("2024-03-09 10:00"), Scalar::from("yyyy/MM/dd")]),
            "2024/03/09"
        );
    }

    #[test]
    fn test_fixed() {
        assert_eq!(call(fn_fixed, &[Scalar::from(1234.567)]), "1234.57");
        assert_eq!(call(fn_fixed, &[Scalar::from(2.5), Scalar::from(0)]), "3");
        assert_eq!(call(fn_fixed, &[Scalar::from(-0.125), Scalar::from(2)]), "-0.13");
    }

    #[test]
    fn test_padleft() {
        assert_eq!(call(fn_padleft, &[Scalar::from(42), Scalar::from(5)]), "00042");
        assert_eq!(
            call(fn_padleft, &[Scalar::from("ab"), Scalar::from(4), Scalar::from("*")]),
            "**ab"
        );
        assert_eq!(call(fn_padleft, &[Scalar::from("abcdef"), Scalar::from(3)]), "abcdef");
    }

    #[test]
    fn test_padleft_width_limit() {
        let ctx = EvaluationContext::simple();
        let padded = fn_padleft(&[Scalar::from("a"), Scalar::from(MAX_PAD_WIDTH)], &ctx).unwrap();
        assert_eq!(padded.to_string().chars().count(), MAX_PAD_WIDTH);
        assert!(matches!(
            fn_padleft(&[Scalar::from("a"), Scalar::Number(1e14)], &ctx),
            Err(FormulaError::InvalidArgument { .. })
        ));
        assert!(matches!(
            fn_padleft(&[Scalar::from("a"), Scalar::Number(1e20)], &ctx),
            Err(FormulaError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_currency() {
        assert_eq!(call(fn_currency, &[Scalar::from(1234567.891)]), "¥1,234,567.89");
        assert_eq!(
            call(fn_currency, &[Scalar::from(-50), Scalar::from("$"), Scalar::from(0)]),
            "-$50"
        );
    }

    #[test]
    fn test_chinese_upper() {
        assert_eq!(to_chinese_upper(1234.56).unwrap(), "壹仟贰佰叁拾肆元伍角陆分");
        assert_eq!(to_chinese_upper(100.0).unwrap(), "壹佰元整");
        assert_eq!(to_chinese_upper(10.05).unwrap(), "壹拾元零伍分");
        assert_eq!(to_chinese_upper(100_001.0).unwrap(), "壹拾万零壹元整");
        assert_eq!(to_chinese_upper(100_001_000.0).unwrap(), "壹亿零壹仟元整");
        assert_eq!(to_chinese_upper(1_010.0).unwrap(), "壹仟零壹拾元整");
        assert_eq!(to_chinese_upper(0.5).unwrap(), "伍角整");
        assert_eq!(to_chinese_upper(0.0).unwrap(), "零元整");
        assert_eq!(to_chinese_upper(-3.0).unwrap(), "负叁元整");
        assert!(to_chinese_upper(1e17).is_none());
    }

    #[test]
    fn test_chinese_upper_out_of_range() {
        assert!(to_chinese_upper(1e27).is_none());
        assert!(to_chinese_upper(-7.9e28).is_none());
        assert!(to_chinese_upper(1e300).is_none());
        let ctx = EvaluationContext::simple();
        assert!(matches!(
            fn_tochinese(&[Scalar::Number(1e27)], &ctx),
            Err(FormulaError::InvalidArgument { .. })
        ));
    }
}
