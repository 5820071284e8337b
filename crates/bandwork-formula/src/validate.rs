//! Fast structural checks run before a full parse
//!
//! These work on the token stream alone so the editor can reject a formula
//! with a precise position before anything is evaluated.

use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use crate::lexer::{tokenize, Spanned, Token};
use crate::variables::KnownVariables;

/// Functions that accept `*` as their only argument
pub const WILDCARD_FUNCTIONS: [&str; 2] = ["COUNT", "PAGECOUNT"];

/// Run every token-level check in order, stopping at the first failure
///
/// Order: empty input, tokenizing, delimiter balance, argument slots,
/// operator placement, then variable names (all unknown names together).
pub fn quick_check(
    formula: &str,
    registry: &FunctionRegistry,
    known: &KnownVariables,
) -> FormulaResult<()> {
    let formula = formula.trim();
    if formula.is_empty() {
        return Err(FormulaError::EmptyFormula);
    }

    let tokens = tokenize(formula)?;
    check_delimiters(&tokens)?;
    check_arguments(&tokens, registry)?;
    check_operators(&tokens)?;
    check_variables(&tokens, known)
}

/// Parens and braces must pair up and nest
pub(crate) fn check_delimiters(tokens: &[Spanned]) -> FormulaResult<()> {
    let mut stack: Vec<(char, usize)> = Vec::new();

    for spanned in tokens {
        match spanned.token {
            Token::LeftParen => stack.push(('(', spanned.position)),
            Token::LeftBrace => stack.push(('{', spanned.position)),
            Token::RightParen | Token::RightBrace => {
                let (close, open) = if spanned.token == Token::RightParen {
                    (')', '(')
                } else {
                    ('}', '{')
                };
                match stack.pop() {
                    Some((c, _)) if c == open => {}
                    _ => {
                        return Err(FormulaError::UnbalancedDelimiter {
                            delimiter: close,
                            position: spanned.position,
                        })
                    }
                }
            }
            _ => {}
        }
    }

    match stack.pop() {
        Some((delimiter, position)) => Err(FormulaError::UnbalancedDelimiter {
            delimiter,
            position,
        }),
        None => Ok(()),
    }
}

fn is_wildcard(tokens: &[Spanned], i: usize) -> bool {
    tokens[i].token == Token::Star
        && i > 0
        && matches!(tokens[i - 1].token, Token::LeftParen | Token::Comma)
        && matches!(
            tokens.get(i + 1).map(|s| &s.token),
            Some(Token::RightParen | Token::Comma)
        )
}

/// Empty argument slots, zero-argument calls and misplaced `*`
fn check_arguments(tokens: &[Spanned], registry: &FunctionRegistry) -> FormulaResult<()> {
    // One entry per open paren: the function it belongs to, if any
    let mut calls: Vec<Option<&str>> = Vec::new();

    for (i, spanned) in tokens.iter().enumerate() {
        let next = tokens.get(i + 1).map(|s| &s.token);
        match &spanned.token {
            Token::LeftParen => {
                let function = match i.checked_sub(1).map(|p| &tokens[p].token) {
                    Some(Token::Identifier(name)) => Some(name.as_str()),
                    _ => None,
                };
                calls.push(function);

                match (function, next) {
                    (Some(name), Some(Token::RightParen)) => {
                        // Unknown names are reported once the formula parses
                        let requires_args = registry
                            .get(name)
                            .map_or(false, |def| def.arity.min > 0);
                        if requires_args {
                            return Err(FormulaError::EmptyArgument {
                                function: name.to_string(),
                                position: spanned.position,
                            });
                        }
                    }
                    (None, Some(Token::RightParen)) => {
                        return Err(FormulaError::Syntax(format!(
                            "Empty parentheses at position {}",
                            spanned.position
                        )))
                    }
                    (Some(name), Some(Token::Comma)) => {
                        return Err(FormulaError::EmptyArgument {
                            function: name.to_string(),
                            position: spanned.position + 1,
                        })
                    }
                    _ => {}
                }
            }
            Token::RightParen => {
                calls.pop();
            }
            Token::Comma => {
                let Some(Some(function)) = calls.last() else {
                    return Err(FormulaError::Syntax(format!(
                        "Unexpected ',' at position {}",
                        spanned.position
                    )));
                };
                if matches!(next, None | Some(Token::Comma | Token::RightParen)) {
                    return Err(FormulaError::EmptyArgument {
                        function: function.to_string(),
                        position: spanned.position + 1,
                    });
                }
            }
            Token::Star if is_wildcard(tokens, i) => {
                let sole_argument = tokens[i - 1].token == Token::LeftParen
                    && next == Some(&Token::RightParen);
                let allowed = matches!(calls.last(), Some(Some(name)) if WILDCARD_FUNCTIONS.contains(name));
                if !(sole_argument && allowed) {
                    return Err(FormulaError::Syntax(format!(
                        "'*' at position {} is only allowed as COUNT(*) or PAGECOUNT(*)",
                        spanned.position
                    )));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Binary operators need an operand on both sides; `-` may also be unary
fn check_operators(tokens: &[Spanned]) -> FormulaResult<()> {
    for (i, spanned) in tokens.iter().enumerate() {
        if !spanned.token.is_operator() || is_wildcard(tokens, i) {
            continue;
        }
        let unary_allowed = spanned.token == Token::Minus;
        let prev = i.checked_sub(1).map(|p| &tokens[p]);

        match prev {
            Some(p) if p.token.is_operator() && !is_wildcard(tokens, i - 1) => {
                if !unary_allowed {
                    return Err(FormulaError::ConsecutiveOperators {
                        operators: format!("{}{}", op_char(&p.token), op_char(&spanned.token)),
                        position: p.position,
                    });
                }
            }
            None
            | Some(Spanned {
                token: Token::LeftParen | Token::Comma,
                ..
            }) => {
                if !unary_allowed {
                    return Err(FormulaError::Syntax(format!(
                        "Operator '{}' at position {} has no left operand",
                        op_char(&spanned.token),
                        spanned.position
                    )));
                }
            }
            _ => {}
        }

        if matches!(
            tokens.get(i + 1).map(|s| &s.token),
            None | Some(Token::RightParen | Token::Comma)
        ) {
            return Err(FormulaError::TrailingOperator {
                position: spanned.position,
            });
        }
    }

    Ok(())
}

fn op_char(token: &Token) -> char {
    token.symbol().unwrap_or('?')
}

/// Every `{name}` must be known; all unknown names are reported together
fn check_variables(tokens: &[Spanned], known: &KnownVariables) -> FormulaResult<()> {
    let mut unknown: Vec<String> = Vec::new();

    for window in tokens.windows(2) {
        if window[0].token != Token::LeftBrace {
            continue;
        }
        match &window[1].token {
            Token::VariableName(name) => {
                if !known.contains(name) && !unknown.iter().any(|u| u == name) {
                    unknown.push(name.clone());
                }
            }
            _ => {
                return Err(FormulaError::Syntax(format!(
                    "Empty variable reference at position {}",
                    window[0].position
                )))
            }
        }
    }

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(FormulaError::UnknownVariables(unknown))
    }
}
