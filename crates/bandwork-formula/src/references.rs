//! What a parsed formula depends on
//!
//! The print pass uses this to tell formulas that need page rows apart from
//! those that only read the current record.

use crate::ast::Expr;
use crate::functions::{FunctionBody, FunctionRegistry, RowScope};

/// Dependencies of one expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaDependencies {
    /// Referenced variables, first appearance order, no duplicates
    pub variables: Vec<String>,
    /// Called functions, first appearance order, no duplicates
    pub functions: Vec<String>,
    /// Calls an all-rows aggregate or reads `rowCount`
    pub uses_all_rows: bool,
    /// Calls a page aggregate or reads `pageRowCount`
    pub uses_page_rows: bool,
    /// Calls `NOW()`/`TODAY()` or reads a clock variable
    pub uses_clock: bool,
}

impl FormulaDependencies {
    /// Collect the dependencies of `expr`
    pub fn collect(expr: &Expr, registry: &FunctionRegistry) -> Self {
        let mut deps = Self::default();
        deps.visit(expr, registry);
        deps
    }

    fn visit(&mut self, expr: &Expr, registry: &FunctionRegistry) {
        match expr {
            Expr::Literal(_) | Expr::Wildcard => {}
            Expr::Variable(name) => {
                match name.as_str() {
                    "rowCount" => self.uses_all_rows = true,
                    "pageRowCount" => self.uses_page_rows = true,
                    "currentDate" | "currentTime" | "currentDateTime" => self.uses_clock = true,
                    _ => {}
                }
                push_unique(&mut self.variables, name);
            }
            Expr::Negate(inner) => self.visit(inner, registry),
            Expr::BinaryOp { left, right, .. } => {
                self.visit(left, registry);
                self.visit(right, registry);
            }
            Expr::Function { name, args } => {
                push_unique(&mut self.functions, name);
                if let Some(def) = registry.get(name) {
                    match def.body {
                        FunctionBody::Aggregate {
                            scope: RowScope::All,
                            ..
                        } => self.uses_all_rows = true,
                        FunctionBody::Aggregate {
                            scope: RowScope::Page,
                            ..
                        } => self.uses_page_rows = true,
                        _ => {}
                    }
                }
                if matches!(name.as_str(), "NOW" | "TODAY") {
                    self.uses_clock = true;
                }
                for arg in args {
                    self.visit(arg, registry);
                }
            }
        }
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

/// Variable names referenced by `expr`, in first-appearance order
pub fn references(expr: &Expr) -> Vec<String> {
    let mut names = Vec::new();
    collect_variables(expr, &mut names);
    names
}

fn collect_variables(expr: &Expr, names: &mut Vec<String>) {
    match expr {
        Expr::Variable(name) => push_unique(names, name),
        Expr::Negate(inner) => collect_variables(inner, names),
        Expr::BinaryOp { left, right, .. } => {
            collect_variables(left, names);
            collect_variables(right, names);
        }
        Expr::Function { args, .. } => {
            for arg in args {
                collect_variables(arg, names);
            }
        }
        Expr::Literal(_) | Expr::Wildcard => {}
    }
}

/// Function names called by `expr`, in first-appearance order
pub fn called_functions(expr: &Expr) -> Vec<String> {
    fn walk(expr: &Expr, out: &mut Vec<String>) {
        match expr {
            Expr::Function { name, args } => {
                push_unique(out, name);
                for arg in args {
                    walk(arg, out);
                }
            }
            Expr::Negate(inner) => walk(inner, out),
            Expr::BinaryOp { left, right, .. } => {
                walk(left, out);
                walk(right, out);
            }
            Expr::Literal(_) | Expr::Variable(_) | Expr::Wildcard => {}
        }
    }

    let mut out = Vec::new();
    walk(expr, &mut out);
    out
}
