//! Scalar values and data records
//!
//! A [`Scalar`] is what a data field holds and what a formula produces.
//! A [`Record`] is one row of data (a master record or a detail row).

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One row of data, keyed by field name
pub type Record = BTreeMap<String, Scalar>;

/// A single data value
///
/// JSON maps onto the first four variants directly. Dates serialize as ISO
/// strings and come back as [`Scalar::String`]; date functions accept either.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Absent / null value
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// Numeric value (always f64)
    Number(f64),
    /// Text value
    String(String),
    /// Date or date-time value
    #[serde(skip_deserializing)]
    Date(NaiveDateTime),
}

impl Scalar {
    /// Create a string scalar
    pub fn string<S: Into<String>>(s: S) -> Self {
        Scalar::String(s.into())
    }

    /// Numeric view of the value
    ///
    /// Null counts as 0, booleans as 1/0 and strings are parsed after
    /// trimming. Dates and strings such as `"inf"` or `"NaN"` have no
    /// numeric view.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Null => Some(0.0),
            Scalar::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Scalar::Number(n) => Some(*n),
            Scalar::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Scalar::Date(_) => None,
        }
    }

    /// Truthiness: `0`, `""`, null and `false` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Boolean(b) => *b,
            Scalar::Number(n) => *n != 0.0 && !n.is_nan(),
            Scalar::String(s) => !s.is_empty(),
            Scalar::Date(_) => true,
        }
    }

    /// Null or the empty string
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Boolean(_) => "boolean",
            Scalar::Number(_) => "number",
            Scalar::String(_) => "string",
            Scalar::Date(_) => "date",
        }
    }

    /// Text shown when the value is printed
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

/// Format a number the way the designer prints it: integral values
/// without a fraction, everything else with the shortest round-trip form.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Number(n) => f.write_str(&format_number(*n)),
            Scalar::String(s) => f.write_str(s),
            Scalar::Date(d) => {
                if d.time().num_seconds_from_midnight() == 0 {
                    write!(f, "{}", d.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<usize> for Scalar {
    fn from(n: usize) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(d: NaiveDateTime) -> Self {
        Scalar::Date(d)
    }
}

/// Build a [`Record`] from `(name, value)` pairs
///
/// ```rust
/// use bandwork_core::{record, Scalar};
///
/// let row = record([("amount", Scalar::from(10.0)), ("name", "Pen".into())]);
/// assert_eq!(row["amount"], Scalar::Number(10.0));
/// ```
pub fn record<K, I>(pairs: I) -> Record
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Scalar)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
