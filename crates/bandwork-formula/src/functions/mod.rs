//! Built-in formula functions and the function registry

pub mod aggregate;
pub mod date;
pub mod finance;
pub mod format;
pub mod logical;
pub mod math;
pub mod text;

use crate::ast::Expr;
use crate::context::EvaluationContext;
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::Evaluator;
use ahash::AHashMap;
use bandwork_core::Scalar;
use std::fmt;
use std::sync::Arc;

/// Implementation of an ordinary function: receives evaluated arguments
pub type FunctionImpl =
    Arc<dyn Fn(&[Scalar], &EvaluationContext<'_>) -> FormulaResult<Scalar> + Send + Sync>;

/// Implementation of a function that decides which arguments to evaluate
pub type LazyImpl =
    fn(&[Expr], &EvaluationContext<'_>, &Evaluator<'_>) -> FormulaResult<Scalar>;

/// Folds the per-row values of an aggregate into one result
pub type ReduceImpl = fn(&[Scalar]) -> Scalar;

/// Which detail rows an aggregate walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    /// Every detail row of the dataset
    All,
    /// Rows of the current page
    Page,
}

/// How a function is evaluated
#[derive(Clone)]
pub enum FunctionBody {
    Eager(FunctionImpl),
    Lazy(LazyImpl),
    /// Argument evaluated once per row in `scope`, results folded by `reduce`
    Aggregate { scope: RowScope, reduce: ReduceImpl },
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionBody::Eager(_) => f.write_str("Eager"),
            FunctionBody::Lazy(_) => f.write_str("Lazy"),
            FunctionBody::Aggregate { scope, .. } => write!(f, "Aggregate({:?})", scope),
        }
    }
}

/// Accepted argument counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    /// `None` = unlimited
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exact(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) => write!(f, "{} to {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Grouping used by the function picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionCategory {
    Aggregate,
    Math,
    String,
    Date,
    Logic,
    Format,
    Finance,
    /// Registered by the host application
    Custom,
}

impl fmt::Display for FunctionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FunctionCategory::Aggregate => "aggregate",
            FunctionCategory::Math => "math",
            FunctionCategory::String => "string",
            FunctionCategory::Date => "date",
            FunctionCategory::Logic => "logic",
            FunctionCategory::Format => "format",
            FunctionCategory::Finance => "finance",
            FunctionCategory::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Function name, case-sensitive
    pub name: String,
    pub arity: Arity,
    pub category: FunctionCategory,
    /// One-line description for the function picker
    pub description: String,
    pub body: FunctionBody,
}

impl FunctionDef {
    /// A host-defined function over evaluated arguments
    ///
    /// ```rust
    /// use bandwork_core::Scalar;
    /// use bandwork_formula::{Arity, FunctionDef};
    ///
    /// let double = FunctionDef::custom("DOUBLE", Arity::exact(1), |args, _ctx| {
    ///     Ok(Scalar::Number(args[0].as_number().unwrap_or(0.0) * 2.0))
    /// });
    /// assert_eq!(double.name, "DOUBLE");
    /// ```
    pub fn custom<N, F>(name: N, arity: Arity, f: F) -> Self
    where
        N: Into<String>,
        F: Fn(&[Scalar], &EvaluationContext<'_>) -> FormulaResult<Scalar> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            category: FunctionCategory::Custom,
            description: String::new(),
            body: FunctionBody::Eager(Arc::new(f)),
        }
    }

    fn builtin(
        name: &str,
        arity: Arity,
        category: FunctionCategory,
        description: &str,
        body: FunctionBody,
    ) -> Self {
        Self {
            name: name.to_string(),
            arity,
            category,
            description: description.to_string(),
            body,
        }
    }

    fn eager(
        name: &str,
        arity: Arity,
        category: FunctionCategory,
        description: &str,
        f: fn(&[Scalar], &EvaluationContext<'_>) -> FormulaResult<Scalar>,
    ) -> Self {
        Self::builtin(name, arity, category, description, FunctionBody::Eager(Arc::new(f)))
    }

    /// Set the category (builder style)
    pub fn with_category(mut self, category: FunctionCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the description (builder style)
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Summary without the implementation
    pub fn info(&self) -> FunctionInfo {
        FunctionInfo {
            name: self.name.clone(),
            arity: self.arity,
            category: self.category,
            description: self.description.clone(),
        }
    }
}

/// Public description of a registered function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    pub arity: Arity,
    pub category: FunctionCategory,
    pub description: String,
}

/// Function registry
///
/// An explicit value handed to the evaluator; hosts add their own functions
/// with [`FunctionRegistry::register`]. Registering an existing name replaces it.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register_aggregate_functions();
        registry.register_math_functions();
        registry.register_string_functions();
        registry.register_date_functions();
        registry.register_logic_functions();
        registry.register_format_functions();
        registry.register_finance_functions();

        registry
    }

    /// Create a registry with no functions at all
    pub fn empty() -> Self {
        Self {
            functions: AHashMap::new(),
        }
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Register a function, returning the definition it replaced
    pub fn register(&mut self, def: FunctionDef) -> Option<FunctionDef> {
        let previous = self.functions.insert(def.name.clone(), def);
        if let Some(prev) = &previous {
            log::debug!("function {} re-registered, previous definition replaced", prev.name);
        }
        previous
    }

    /// Remove a function
    pub fn unregister(&mut self, name: &str) -> Option<FunctionDef> {
        self.functions.remove(name)
    }

    /// Every registered function, sorted by name
    pub fn functions(&self) -> Vec<FunctionInfo> {
        let mut infos: Vec<FunctionInfo> = self.functions.values().map(FunctionDef::info).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn register_aggregate_functions(&mut self) {
        use aggregate::*;

        // (all rows, current page, reducer, description)
        let table: [(&str, &str, ReduceImpl, &str); 5] = [
            ("COUNT", "PAGECOUNT", reduce_count, "Number of rows with a value; (*) counts every row"),
            ("SUM", "PAGESUM", reduce_sum, "Sum over rows, non-numeric values count as 0"),
            ("AVG", "PAGEAVG", reduce_avg, "Average over rows, 0 when there are none"),
            ("MAX", "PAGEMAX", reduce_max, "Largest numeric value, 0 when there is none"),
            ("MIN", "PAGEMIN", reduce_min, "Smallest numeric value, 0 when there is none"),
        ];

        for (all, page, reduce, description) in table {
            for (name, scope) in [(all, RowScope::All), (page, RowScope::Page)] {
                let description = match scope {
                    RowScope::All => format!("{} (all rows)", description),
                    RowScope::Page => format!("{} (current page)", description),
                };
                self.register(FunctionDef::builtin(
                    name,
                    Arity::exact(1),
                    FunctionCategory::Aggregate,
                    &description,
                    FunctionBody::Aggregate { scope, reduce },
                ));
            }
        }
    }

    fn register_math_functions(&mut self) {
        use FunctionCategory::Math;

        self.register(FunctionDef::eager(
            "ROUND",
            Arity::range(1, 2),
            Math,
            "Round half away from zero to n decimals",
            math::fn_round,
        ));
        self.register(FunctionDef::eager(
            "FLOOR",
            Arity::exact(1),
            Math,
            "Largest integer not above the value",
            math::fn_floor,
        ));
        self.register(FunctionDef::eager(
            "CEIL",
            Arity::exact(1),
            Math,
            "Smallest integer not below the value",
            math::fn_ceil,
        ));
        self.register(FunctionDef::eager(
            "ABS",
            Arity::exact(1),
            Math,
            "Absolute value",
            math::fn_abs,
        ));
        self.register(FunctionDef::eager(
            "MOD",
            Arity::exact(2),
            Math,
            "Remainder of a / b, sign follows a",
            math::fn_mod,
        ));
    }

    fn register_string_functions(&mut self) {
        self.register(FunctionDef::eager(
            "CONCAT",
            Arity::at_least(1),
            FunctionCategory::String,
            "Join all arguments as text",
            text::fn_concat,
        ));
        self.register(FunctionDef::eager(
            "LEFT",
            Arity::exact(2),
            FunctionCategory::String,
            "First n characters",
            text::fn_left,
        ));
        self.register(FunctionDef::eager(
            "RIGHT",
            Arity::exact(2),
            FunctionCategory::String,
            "Last n characters",
            text::fn_right,
        ));
        self.register(FunctionDef::eager(
            "MID",
            Arity::exact(3),
            FunctionCategory::String,
            "Substring from a 1-based start",
            text::fn_mid,
        ));
        self.register(FunctionDef::eager(
            "LEN",
            Arity::exact(1),
            FunctionCategory::String,
            "Number of characters",
            text::fn_len,
        ));
        self.register(FunctionDef::eager(
            "TRIM",
            Arity::exact(1),
            FunctionCategory::String,
            "Strip surrounding whitespace",
            text::fn_trim,
        ));
        self.register(FunctionDef::eager(
            "UPPER",
            Arity::exact(1),
            FunctionCategory::String,
            "Convert to upper case",
            text::fn_upper,
        ));
        self.register(FunctionDef::eager(
            "LOWER",
            Arity::exact(1),
            FunctionCategory::String,
            "Convert to lower case",
            text::fn_lower,
        ));
        self.register(FunctionDef::eager(
            "REPLACE",
            Arity::exact(3),
            FunctionCategory::String,
            "Replace every occurrence of a substring",
            text::fn_replace,
        ));
    }

    fn register_date_functions(&mut self) {
        use FunctionCategory::Date;

        self.register(FunctionDef::eager(
            "NOW",
            Arity::exact(0),
            Date,
            "Current date and time",
            date::fn_now,
        ));
        self.register(FunctionDef::eager(
            "TODAY",
            Arity::exact(0),
            Date,
            "Current date",
            date::fn_today,
        ));
        self.register(FunctionDef::eager(
            "YEAR",
            Arity::exact(1),
            Date,
            "Year of a date",
            date::fn_year,
        ));
        self.register(FunctionDef::eager(
            "MONTH",
            Arity::exact(1),
            Date,
            "Month of a date (1-12)",
            date::fn_month,
        ));
        self.register(FunctionDef::eager(
            "DAY",
            Arity::exact(1),
            Date,
            "Day of the month",
            date::fn_day,
        ));
        self.register(FunctionDef::eager(
            "DATEFORMAT",
            Arity::range(1, 2),
            Date,
            "Format a date with yyyy MM dd HH mm ss",
            date::fn_dateformat,
        ));
        self.register(FunctionDef::eager(
            "DATEDIFF",
            Arity::exact(2),
            Date,
            "Whole days from the first date to the second",
            date::fn_datediff,
        ));
    }

    fn register_logic_functions(&mut self) {
        use FunctionCategory::Logic;

        for name in ["IF", "IIF"] {
            self.register(FunctionDef::builtin(
                name,
                Arity::exact(3),
                Logic,
                "Second argument when the condition is truthy, else the third",
                FunctionBody::Lazy(logical::fn_if),
            ));
        }
        self.register(FunctionDef::builtin(
            "ISNULL",
            Arity::exact(2),
            Logic,
            "Default when the value is missing, null or empty",
            FunctionBody::Lazy(logical::fn_isnull),
        ));
        self.register(FunctionDef::builtin(
            "AND",
            Arity::at_least(1),
            Logic,
            "True when every argument is truthy",
            FunctionBody::Lazy(logical::fn_and),
        ));
        self.register(FunctionDef::builtin(
            "OR",
            Arity::at_least(1),
            Logic,
            "True when any argument is truthy",
            FunctionBody::Lazy(logical::fn_or),
        ));
        self.register(FunctionDef::eager(
            "NOT",
            Arity::exact(1),
            Logic,
            "Logical negation",
            logical::fn_not,
        ));
    }

    fn register_format_functions(&mut self) {
        use FunctionCategory::Format;

        self.register(FunctionDef::eager(
            "FORMAT",
            Arity::exact(2),
            Format,
            "Format a number (#,##0.00, 0%) or a date (yyyy-MM-dd)",
            format::fn_format,
        ));
        self.register(FunctionDef::eager(
            "FIXED",
            Arity::range(1, 2),
            Format,
            "Fixed number of decimals, no separators",
            format::fn_fixed,
        ));
        self.register(FunctionDef::eager(
            "PADLEFT",
            Arity::range(2, 3),
            Format,
            "Left-pad to a width (default pad 0)",
            format::fn_padleft,
        ));
        self.register(FunctionDef::eager(
            "TOCHINESE",
            Arity::exact(1),
            Format,
            "Amount in upper-case Chinese (RMB)",
            format::fn_tochinese,
        ));
        self.register(FunctionDef::eager(
            "CURRENCY",
            Arity::range(1, 3),
            Format,
            "Currency symbol with thousands separators",
            format::fn_currency,
        ));
    }

    fn register_finance_functions(&mut self) {
        use FunctionCategory::Finance;

        self.register(FunctionDef::eager(
            "DISCOUNT",
            Arity::exact(2),
            Finance,
            "Amount after a percentage discount",
            finance::fn_discount,
        ));
        self.register(FunctionDef::eager(
            "TAX",
            Arity::exact(2),
            Finance,
            "Tax on an amount at a percentage rate",
            finance::fn_tax,
        ));
        self.register(FunctionDef::eager(
            "WITHTAX",
            Arity::exact(2),
            Finance,
            "Amount including tax",
            finance::fn_withtax,
        ));
        self.register(FunctionDef::eager(
            "EXTRACTTAX",
            Arity::exact(2),
            Finance,
            "Tax contained in a tax-inclusive amount",
            finance::fn_extracttax,
        ));
    }
}

// === Argument helpers ===

/// Numeric argument `index`, a `TypeMismatch` if it has no numeric view
pub(crate) fn number_arg(function: &str, args: &[Scalar], index: usize) -> FormulaResult<f64> {
    let value = args.get(index).unwrap_or(&Scalar::Null);
    value.as_number().ok_or_else(|| {
        FormulaError::TypeMismatch(format!(
            "{} expects a number for argument {}, got {} '{}'",
            function,
            index + 1,
            value.type_name(),
            value
        ))
    })
}

/// Optional numeric argument with a default
pub(crate) fn optional_number_arg(
    function: &str,
    args: &[Scalar],
    index: usize,
    default: f64,
) -> FormulaResult<f64> {
    match args.get(index) {
        Some(_) => number_arg(function, args, index),
        None => Ok(default),
    }
}

/// Largest magnitude accepted where an argument must be an integer
pub const MAX_INTEGER_ARG: f64 = 9_007_199_254_740_992.0;

/// Integer argument, truncated toward zero
///
/// Values beyond [`MAX_INTEGER_ARG`] are rejected rather than saturated.
pub(crate) fn integer_arg(function: &str, args: &[Scalar], index: usize) -> FormulaResult<i64> {
    let n = number_arg(function, args, index)?.trunc();
    if !n.is_finite() || n.abs() > MAX_INTEGER_ARG {
        return Err(FormulaError::invalid_argument(
            function,
            format!("argument {} is out of range: {}", index + 1, n),
        ));
    }
    Ok(n as i64)
}

/// Text view of argument `index`
pub(crate) fn string_arg(args: &[Scalar], index: usize) -> String {
    args.get(index).map(Scalar::to_display_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arity() {
        assert!(Arity::exact(2).accepts(2));
        assert!(!Arity::exact(2).accepts(1));
        assert!(Arity::at_least(1).accepts(9));
        assert!(!Arity::range(1, 2).accepts(3));
        assert_eq!(Arity::exact(1).to_string(), "1");
        assert_eq!(Arity::range(1, 3).to_string(), "1 to 3");
        assert_eq!(Arity::at_least(1).to_string(), "at least 1");
    }

    #[test]
    fn test_builtins_registered() {
        let registry = FunctionRegistry::new();
        for name in [
            "COUNT", "PAGECOUNT", "SUM", "PAGESUM", "AVG", "PAGEAVG", "MAX", "PAGEMAX", "MIN",
            "PAGEMIN", "ROUND", "FLOOR", "CEIL", "ABS", "MOD", "CONCAT", "LEFT", "RIGHT", "LEN",
            "TRIM", "NOW", "TODAY", "YEAR", "MONTH", "DAY", "IF", "IIF", "ISNULL", "FORMAT",
            "FIXED", "PADLEFT", "TOCHINESE", "CURRENCY", "DISCOUNT", "TAX", "WITHTAX",
            "EXTRACTTAX",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
        // Names are case-sensitive
        assert!(registry.get("sum").is_none());
    }

    #[test]
    fn test_functions_sorted() {
        let infos = FunctionRegistry::new().functions();
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(infos.iter().all(|i| !i.description.is_empty()));
    }

    #[test]
    fn test_integer_arg_range() {
        let args = [Scalar::from(-2.7), Scalar::from(-1e24), Scalar::from(f64::INFINITY)];
        assert_eq!(integer_arg("F", &args, 0).unwrap(), -2);
        assert!(matches!(
            integer_arg("F", &args, 1),
            Err(FormulaError::InvalidArgument { .. })
        ));
        assert!(matches!(
            integer_arg("F", &args, 2),
            Err(FormulaError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = FunctionRegistry::new();
        let before = registry.len();
        let previous = registry.register(FunctionDef::custom("SUM", Arity::exact(1), |_, _| {
            Ok(Scalar::Number(0.0))
        }));
        assert!(previous.is_some());
        assert_eq!(registry.len(), before);
        assert_eq!(
            registry.get("SUM").map(|d| d.category),
            Some(FunctionCategory::Custom)
        );
    }

    #[test]
    fn test_number_arg_errors() {
        let args = [Scalar::from("abc")];
        assert!(matches!(
            number_arg("ABS", &args, 0),
            Err(FormulaError::TypeMismatch(_))
        ));
        assert_eq!(optional_number_arg("ROUND", &args, 1, 0.0), Ok(0.0));
    }
}
