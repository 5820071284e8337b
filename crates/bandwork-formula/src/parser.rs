//! Formula parser
//!
//! A recursive descent parser over the token stream with standard
//! arithmetic precedence:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := NUMBER | STRING | '{' NAME '}' | IDENT '(' args? ')' | '(' expr ')' | '-' factor
//! ```

use crate::ast::{BinaryOperator, Expr};
use crate::error::{FormulaError, FormulaResult};
use crate::lexer::{tokenize, Spanned, Token};
use crate::validate::check_delimiters;

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use bandwork_formula::parse_formula;
///
/// let ast = parse_formula("{price} * {qty}").unwrap();
/// let ast = parse_formula("SUM({amount}) + 1").unwrap();
/// let ast = parse_formula("IF({paid}, 'Yes', 'No')").unwrap();
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Expr> {
    let formula = formula.trim();
    if formula.is_empty() {
        return Err(FormulaError::EmptyFormula);
    }

    let tokens = tokenize(formula)?;
    check_delimiters(&tokens)?;

    let mut parser = FormulaParser::new(&tokens);
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if let Some(extra) = parser.peek_spanned() {
        return Err(FormulaError::Syntax(format!(
            "Unexpected {} at position {}",
            describe(&extra.token),
            extra.position
        )));
    }

    Ok(expr)
}

struct FormulaParser<'t> {
    tokens: &'t [Spanned],
    pos: usize,
}

impl<'t> FormulaParser<'t> {
    fn new(tokens: &'t [Spanned]) -> Self {
        Self { tokens, pos: 0 }
    }

    // === Token access ===

    fn peek_spanned(&self) -> Option<&'t Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek(&self) -> Option<&'t Token> {
        self.peek_spanned().map(|s| &s.token)
    }

    fn peek_next(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos + 1).map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<&'t Spanned> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> FormulaResult<()> {
        match self.advance() {
            Some(s) if s.token == expected => Ok(()),
            Some(s) => Err(FormulaError::Syntax(format!(
                "Expected {} but found {} at position {}",
                describe(&expected),
                describe(&s.token),
                s.position
            ))),
            None => Err(FormulaError::Syntax(format!(
                "Expected {} but reached end of formula",
                describe(&expected)
            ))),
        }
    }

    // === Grammar ===

    fn parse_expression(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOperator::Add,
                Some(Token::Minus) => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOperator::Multiply,
                Some(Token::Slash) => BinaryOperator::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> FormulaResult<Expr> {
        let Some(spanned) = self.advance() else {
            return Err(FormulaError::Syntax("Unexpected end of formula".into()));
        };

        match &spanned.token {
            Token::Number(n) => Ok(Expr::number(*n)),
            Token::String(s) => Ok(Expr::string(s.clone())),
            Token::Minus => {
                let inner = self.parse_factor()?;
                Ok(Expr::Negate(Box::new(inner)))
            }
            Token::LeftParen => {
                let expr = self.parse_expression()?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }
            Token::LeftBrace => match self.advance() {
                Some(Spanned {
                    token: Token::VariableName(name),
                    ..
                }) => {
                    let name = name.clone();
                    self.expect(Token::RightBrace)?;
                    Ok(Expr::Variable(name))
                }
                _ => Err(FormulaError::Syntax(format!(
                    "Empty variable reference at position {}",
                    spanned.position
                ))),
            },
            Token::Identifier(name) => {
                if self.peek() != Some(&Token::LeftParen) {
                    return Err(FormulaError::Syntax(format!(
                        "Expected '(' after '{}' at position {}",
                        name, spanned.position
                    )));
                }
                self.advance();
                let args = self.parse_arguments()?;
                Ok(Expr::call(name.clone(), args))
            }
            other => Err(FormulaError::Syntax(format!(
                "Unexpected {} at position {}",
                describe(other),
                spanned.position
            ))),
        }
    }

    /// Arguments after the opening paren, consuming the closing one
    fn parse_arguments(&mut self) -> FormulaResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.peek() == Some(&Token::RightParen) {
            self.advance();
            return Ok(args);
        }

        loop {
            let is_wildcard = self.peek() == Some(&Token::Star)
                && matches!(self.peek_next(), Some(Token::RightParen | Token::Comma));
            if is_wildcard {
                self.advance();
                args.push(Expr::Wildcard);
            } else {
                args.push(self.parse_expression()?);
            }

            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                Some(Token::RightParen) => {
                    self.advance();
                    return Ok(args);
                }
                _ => {
                    return match self.peek_spanned() {
                        Some(s) => Err(FormulaError::Syntax(format!(
                            "Expected ',' or ')' but found {} at position {}",
                            describe(&s.token),
                            s.position
                        ))),
                        None => Err(FormulaError::Syntax(
                            "Unclosed function call at end of formula".into(),
                        )),
                    }
                }
            }
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number {}", n),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Identifier(name) => format!("name '{}'", name),
        Token::VariableName(name) => format!("variable '{}'", name),
        other => match other.symbol() {
            Some(c) => format!("'{}'", c),
            None => "token".to_string(),
        },
    }
}
