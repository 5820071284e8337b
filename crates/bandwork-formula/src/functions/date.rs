//! Date functions
//!
//! Date arguments may be [`Scalar::Date`] values or ISO-like strings such as
//! `2024-03-09`, `2024/3/9 08:30` or `2024-03-09T08:30:15`.

use super::string_arg;
use crate::context::EvaluationContext;
use crate::error::{FormulaError, FormulaResult};
use bandwork_core::Scalar;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use lazy_regex::regex_captures;

/// Default pattern of DATEFORMAT
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd";

/// Parse a date or date-time string
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let (_, y, m, d, hh, mm, ss) = regex_captures!(
        r"^\s*(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:[T\s]+(\d{1,2}):(\d{2})(?::(\d{2}))?)?",
        text
    )?;
    let date = NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)?;
    let time = if hh.is_empty() {
        NaiveTime::MIN
    } else {
        NaiveTime::from_hms_opt(
            hh.parse().ok()?,
            mm.parse().ok()?,
            if ss.is_empty() { 0 } else { ss.parse().ok()? },
        )?
    };
    Some(date.and_time(time))
}

/// Interpret a value as a date, if it is one
pub fn as_date(value: &Scalar) -> Option<NaiveDateTime> {
    match value {
        Scalar::Date(d) => Some(*d),
        Scalar::String(s) => parse_date(s),
        _ => None,
    }
}

fn date_arg(function: &str, args: &[Scalar], index: usize) -> FormulaResult<NaiveDateTime> {
    let value = args.get(index).unwrap_or(&Scalar::Null);
    as_date(value).ok_or_else(|| {
        FormulaError::invalid_argument(function, format!("'{}' is not a date", value))
    })
}

/// Render a date with `yyyy yy MM dd HH mm ss` tokens; other text is copied
pub fn format_date(date: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        let (len, text) = if rest.starts_with("yyyy") {
            (4, format!("{:04}", date.year()))
        } else if rest.starts_with("yy") {
            (2, format!("{:02}", date.year().rem_euclid(100)))
        } else if rest.starts_with("MM") {
            (2, format!("{:02}", date.month()))
        } else if rest.starts_with("dd") {
            (2, format!("{:02}", date.day()))
        } else if rest.starts_with("HH") {
            (2, format!("{:02}", date.hour()))
        } else if rest.starts_with("mm") {
            (2, format!("{:02}", date.minute()))
        } else if rest.starts_with("ss") {
            (2, format!("{:02}", date.second()))
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
            continue;
        };
        out.push_str(&text);
        rest = &rest[len..];
    }

    out
}

/// Does the pattern contain any date token?
pub fn is_date_pattern(pattern: &str) -> bool {
    ["yy", "MM", "dd", "HH", "mm", "ss"]
        .iter()
        .any(|t| pattern.contains(t))
}

/// NOW function
pub fn fn_now(_args: &[Scalar], ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let now = ctx.now();
    Ok(Scalar::Date(now.with_nanosecond(0).unwrap_or(now)))
}

/// TODAY function
pub fn fn_today(_args: &[Scalar], ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::Date(ctx.now().date().and_time(NaiveTime::MIN)))
}

/// YEAR function
pub fn fn_year(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::from(date_arg("YEAR", args, 0)?.year()))
}

/// MONTH function
pub fn fn_month(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::Number(date_arg("MONTH", args, 0)?.month() as f64))
}

/// DAY function
pub fn fn_day(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    Ok(Scalar::Number(date_arg("DAY", args, 0)?.day() as f64))
}

/// DATEFORMAT(date, [pattern])
pub fn fn_dateformat(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let date = date_arg("DATEFORMAT", args, 0)?;
    let pattern = match args.get(1) {
        Some(_) => string_arg(args, 1),
        None => DEFAULT_DATE_PATTERN.to_string(),
    };
    Ok(Scalar::String(format_date(&date, &pattern)))
}

/// DATEDIFF(from, to): calendar days from `from` to `to`
pub fn fn_datediff(args: &[Scalar], _ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    let from = date_arg("DATEDIFF", args, 0)?;
    let to = date_arg("DATEDIFF", args, 1)?;
    Ok(Scalar::Number((to.date() - from.date()).num_days() as f64))
}
