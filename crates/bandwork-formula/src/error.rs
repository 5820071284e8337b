//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula validation, parsing or evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Blank formula text
    #[error("Formula is empty")]
    EmptyFormula,

    /// Unmatched `(`, `)`, `{` or `}`
    #[error("Unbalanced '{delimiter}' at position {position}")]
    UnbalancedDelimiter { delimiter: char, position: usize },

    /// `NAME()` for a function that needs arguments, or an empty slot like `f(1,,2)`
    #[error("Empty argument in {function} at position {position}")]
    EmptyArgument { function: String, position: usize },

    /// Two binary operators in a row, e.g. `1+*2`
    #[error("Consecutive operators '{operators}' at position {position}")]
    ConsecutiveOperators { operators: String, position: usize },

    /// Operator with nothing after it, e.g. `1+`
    #[error("Operator at position {position} is missing its right operand")]
    TrailingOperator { position: usize },

    /// Any other malformed input
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// `{name}` references that are neither system variables nor declared fields
    #[error("Unknown variables: {}", .0.join(", "))]
    UnknownVariables(Vec<String>),

    /// Function name not in the registry
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Operand types the operator cannot combine
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Division by zero or any other non-finite arithmetic result
    #[error("Division by zero")]
    DivideByZero,

    /// Variable absent from the system variables, the detail row and the record
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Invalid argument value
    #[error("Invalid argument to {function}: {message}")]
    InvalidArgument { function: String, message: String },
}

impl FormulaError {
    /// Errors caused by malformed formula text
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            FormulaError::EmptyFormula
                | FormulaError::UnbalancedDelimiter { .. }
                | FormulaError::EmptyArgument { .. }
                | FormulaError::ConsecutiveOperators { .. }
                | FormulaError::TrailingOperator { .. }
                | FormulaError::Syntax(_)
        )
    }

    /// Errors that only surface while evaluating against data
    pub fn is_evaluation(&self) -> bool {
        matches!(
            self,
            FormulaError::Arity { .. }
                | FormulaError::TypeMismatch(_)
                | FormulaError::DivideByZero
                | FormulaError::MissingField(_)
                | FormulaError::InvalidArgument { .. }
        )
    }

    pub(crate) fn invalid_argument<F: Into<String>, M: Into<String>>(function: F, message: M) -> Self {
        FormulaError::InvalidArgument {
            function: function.into(),
            message: message.into(),
        }
    }
}
