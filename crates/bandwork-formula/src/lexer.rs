//! Formula tokenizer
//!
//! Positions are character offsets into the trimmed formula text so error
//! messages line up with what the user typed.

use crate::error::{FormulaError, FormulaResult};

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    String(String),
    /// Function name
    Identifier(String),
    /// Raw text between `{` and `}`
    VariableName(String),
    Plus,
    Minus,
    Star,
    Slash,
    Comma,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
}

impl Token {
    /// `+ - * /`
    pub fn is_operator(&self) -> bool {
        matches!(self, Token::Plus | Token::Minus | Token::Star | Token::Slash)
    }

    /// Source character of single-character tokens
    pub fn symbol(&self) -> Option<char> {
        match self {
            Token::Plus => Some('+'),
            Token::Minus => Some('-'),
            Token::Star => Some('*'),
            Token::Slash => Some('/'),
            Token::Comma => Some(','),
            Token::LeftParen => Some('('),
            Token::RightParen => Some(')'),
            Token::LeftBrace => Some('{'),
            Token::RightBrace => Some('}'),
            _ => None,
        }
    }
}

/// A token and the character offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Split formula text into tokens
pub fn tokenize(formula: &str) -> FormulaResult<Vec<Spanned>> {
    Lexer::new(formula).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Spanned>,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> FormulaResult<Vec<Spanned>> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
                continue;
            }

            let start = self.pos;
            let token = match c {
                '+' => self.single(Token::Plus),
                '-' => self.single(Token::Minus),
                '*' => self.single(Token::Star),
                '/' => self.single(Token::Slash),
                ',' => self.single(Token::Comma),
                '(' => self.single(Token::LeftParen),
                ')' => self.single(Token::RightParen),
                '}' => self.single(Token::RightBrace),
                '{' => {
                    self.pos += 1;
                    self.push(Token::LeftBrace, start);
                    self.scan_variable_name();
                    continue;
                }
                '"' | '\'' => self.scan_string(c)?,
                c if c.is_ascii_digit() => self.scan_number()?,
                '.' if self.peek_at(1).map_or(false, |d| d.is_ascii_digit()) => {
                    self.scan_number()?
                }
                c if c.is_alphabetic() || c == '_' => self.scan_identifier(),
                other => {
                    return Err(FormulaError::Syntax(format!(
                        "Unexpected character '{}' at position {}",
                        other, start
                    )))
                }
            };
            self.push(token, start);
        }
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, token: Token, position: usize) {
        self.tokens.push(Spanned { token, position });
    }

    fn single(&mut self, token: Token) -> Token {
        self.pos += 1;
        token
    }

    /// Everything up to the next brace is the name; the braces themselves
    /// stay separate tokens so delimiter checks can see them.
    fn scan_variable_name(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '}' || c == '{' {
                break;
            }
            self.pos += 1;
        }
        if self.pos > start {
            let name: String = self.chars[start..self.pos].iter().collect();
            self.push(Token::VariableName(name.trim().to_string()), start);
        }
    }

    fn scan_string(&mut self, quote: char) -> FormulaResult<Token> {
        let start = self.pos;
        self.pos += 1;
        let mut s = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == quote {
                return Ok(Token::String(s));
            }
            s.push(c);
        }
        Err(FormulaError::Syntax(format!(
            "Unterminated string literal starting at position {}",
            start
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some('.') {
            self.pos += 1;
            while self.peek().map_or(false, |c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>().map(Token::Number).map_err(|_| {
            FormulaError::Syntax(format!("Invalid number '{}' at position {}", text, start))
        })
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            self.pos += 1;
        }
        Token::Identifier(self.chars[start..self.pos].iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(formula: &str) -> Vec<Token> {
        tokenize(formula)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_tokenize_expression() {
        assert_eq!(
            kinds("SUM({amount}) * 1.5"),
            vec![
                Token::Identifier("SUM".into()),
                Token::LeftParen,
                Token::LeftBrace,
                Token::VariableName("amount".into()),
                Token::RightBrace,
                Token::RightParen,
                Token::Star,
                Token::Number(1.5),
            ]
        );
    }

    #[test]
    fn test_both_quote_styles() {
        assert_eq!(
            kinds("'a' + \"b\""),
            vec![
                Token::String("a".into()),
                Token::Plus,
                Token::String("b".into())
            ]
        );
        assert_eq!(kinds("\"it's\""), vec![Token::String("it's".into())]);
    }

    #[test]
    fn test_positions_count_characters() {
        let tokens = tokenize("{金额} + 1").unwrap();
        assert_eq!(tokens[3].token, Token::Plus);
        assert_eq!(tokens[3].position, 5);
    }

    #[test]
    fn test_variable_name_with_spaces() {
        assert_eq!(
            kinds("{ unit price }"),
            vec![
                Token::LeftBrace,
                Token::VariableName("unit price".into()),
                Token::RightBrace
            ]
        );
    }

    #[test]
    fn test_lexer_errors() {
        assert!(matches!(tokenize("1 @ 2"), Err(FormulaError::Syntax(_))));
        assert!(matches!(tokenize("'open"), Err(FormulaError::Syntax(_))));
        assert_eq!(kinds(".5"), vec![Token::Number(0.5)]);
    }
}
