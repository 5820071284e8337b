//! Formula Abstract Syntax Tree types

use bandwork_core::Scalar;
use std::fmt;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number or string literal
    Literal(Scalar),
    /// `{name}` reference to a system variable or data field
    Variable(String),
    /// The `*` placeholder of `COUNT(*)` / `PAGECOUNT(*)`
    Wildcard,
    /// Unary minus
    Negate(Box<Expr>),
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Function call
    Function { name: String, args: Vec<Expr> },
}

impl Expr {
    /// Numeric literal
    pub fn number(n: f64) -> Self {
        Expr::Literal(Scalar::Number(n))
    }

    /// String literal
    pub fn string<S: Into<String>>(s: S) -> Self {
        Expr::Literal(Scalar::String(s.into()))
    }

    /// Variable reference
    pub fn variable<S: Into<String>>(name: S) -> Self {
        Expr::Variable(name.into())
    }

    /// Binary operation
    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Function call
    pub fn call<S: Into<String>>(name: S, args: Vec<Expr>) -> Self {
        Expr::Function {
            name: name.into(),
            args,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    /// Operator symbol
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(Scalar::String(s)) => write_string_literal(f, s),
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::Variable(name) => write!(f, "{{{}}}", name),
            Expr::Wildcard => f.write_str("*"),
            Expr::Negate(inner) => match inner.as_ref() {
                Expr::BinaryOp { .. } => write!(f, "-({})", inner),
                _ => write!(f, "-{}", inner),
            },
            Expr::BinaryOp { op, left, right } => {
                write_operand(f, left, op.precedence(), false)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right, op.precedence(), true)
            }
            Expr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Quote with whichever delimiter the text lacks
///
/// Text holding both kinds has no literal form; it is written as a
/// parenthesized `+` chain that evaluates to the same string.
fn write_string_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    if !s.contains('"') {
        return write!(f, "\"{}\"", s);
    }
    if !s.contains('\'') {
        return write!(f, "'{}'", s);
    }
    f.write_str("(")?;
    for (i, part) in s.split('"').enumerate() {
        if i > 0 {
            f.write_str(" + '\"' + ")?;
        }
        write!(f, "\"{}\"", part)?;
    }
    f.write_str(")")
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parent: u8, right: bool) -> fmt::Result {
    match expr {
        // Left-associative: an equal-precedence right operand keeps its parens
        Expr::BinaryOp { op, .. }
            if op.precedence() < parent || (right && op.precedence() == parent) =>
        {
            write!(f, "({})", expr)
        }
        _ => write!(f, "{}", expr),
    }
}
