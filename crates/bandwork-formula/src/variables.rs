//! Variable resolution
//!
//! `{name}` resolves, in order, to a system variable, a field of the current
//! detail row, then a field of the master record.

use crate::context::EvaluationContext;
use crate::error::{FormulaError, FormulaResult};
use ahash::AHashSet;
use bandwork_core::{DataField, Scalar};
use chrono::Timelike;

/// Names always available to formulas
pub const SYSTEM_VARIABLES: [&str; 9] = [
    "currentDate",
    "currentTime",
    "currentDateTime",
    "pageNumber",
    "totalPages",
    "rowIndex",
    "rowNumber",
    "rowCount",
    "pageRowCount",
];

/// Is `name` a system variable?
pub fn is_system_variable(name: &str) -> bool {
    SYSTEM_VARIABLES.contains(&name)
}

/// Value of a system variable, `None` for any other name
pub fn system_variable(name: &str, ctx: &EvaluationContext<'_>) -> Option<Scalar> {
    let value = match name {
        "currentDate" => {
            let now = ctx.now();
            Scalar::Date(now.date().and_time(chrono::NaiveTime::MIN))
        }
        "currentTime" => {
            let now = ctx.now();
            Scalar::String(format!(
                "{:02}:{:02}:{:02}",
                now.hour(),
                now.minute(),
                now.second()
            ))
        }
        "currentDateTime" => {
            let now = ctx.now();
            Scalar::Date(now.with_nanosecond(0).unwrap_or(now))
        }
        "pageNumber" => Scalar::from(ctx.page_number),
        "totalPages" => Scalar::from(ctx.total_pages),
        "rowIndex" => Scalar::from(ctx.row_index),
        "rowNumber" => Scalar::from(ctx.row_index + 1),
        "rowCount" => Scalar::from(ctx.all_detail_rows.len()),
        "pageRowCount" => Scalar::from(ctx.page_detail_rows.len()),
        _ => return None,
    };
    Some(value)
}

/// Resolve a variable against live data
pub fn resolve_variable(name: &str, ctx: &EvaluationContext<'_>) -> FormulaResult<Scalar> {
    if let Some(value) = system_variable(name, ctx) {
        return Ok(value);
    }
    if let Some(value) = ctx.detail_row.and_then(|row| row.get(name)) {
        return Ok(value.clone());
    }
    ctx.record
        .get(name)
        .cloned()
        .ok_or_else(|| FormulaError::MissingField(name.to_string()))
}

/// Names a formula may reference at design time
#[derive(Debug, Clone, Default)]
pub struct KnownVariables {
    fields: AHashSet<String>,
}

impl KnownVariables {
    /// System variables plus the declared data fields
    pub fn new(fields: &[DataField]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.name.clone()).collect(),
        }
    }

    /// Add a declared field name
    pub fn insert<S: Into<String>>(&mut self, name: S) {
        self.fields.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        is_system_variable(name) || self.fields.contains(name)
    }
}
