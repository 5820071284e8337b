//! # bandwork-formula
//!
//! Formula language for bandwork report designs.
//!
//! This crate provides:
//! - Formula parsing (text → AST) and fast token-level validation
//! - Variable resolution (system variables, detail row, master record)
//! - A function registry with the built-in aggregate, math, string, date,
//!   logic, format and finance functions
//! - Formula evaluation (AST → value) against an [`EvaluationContext`]
//!
//! ## Example
//!
//! ```rust
//! use bandwork_core::{record, Scalar};
//! use bandwork_formula::{EvaluationContext, FormulaEngine};
//!
//! let engine = FormulaEngine::new();
//! let rows = vec![
//!     record([("amount", Scalar::from(10))]),
//!     record([("amount", Scalar::from("x"))]),
//!     record([("amount", Scalar::from(5))]),
//! ];
//! let ctx = EvaluationContext::simple().with_rows(&rows, &rows);
//! let outcome = engine.evaluate_formula("SUM({amount})", &ctx);
//! assert_eq!(outcome.result, Scalar::Number(15.0));
//! ```

pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod references;
pub mod validate;
pub mod variables;

pub use ast::{BinaryOperator, Expr};
pub use context::{Clock, EvaluationContext, FixedClock, SystemClock};
pub use engine::{EvaluationOutcome, FormulaEngine, ValidationOutcome};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::Evaluator;
pub use functions::{
    Arity, FunctionBody, FunctionCategory, FunctionDef, FunctionInfo, FunctionRegistry, RowScope,
};
pub use parser::parse_formula;
pub use references::{called_functions, references, FormulaDependencies};
pub use validate::quick_check;
pub use variables::{is_system_variable, resolve_variable, KnownVariables, SYSTEM_VARIABLES};
