//! Tokenizer for scenario files.

use crate::error::{Error, Result};

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier: element types, names, block keywords.
    Ident(String),
    /// Numeric literal, possibly with an SI suffix (`4.7u`).
    Value(String),
    /// `=` in key=value pairs.
    Equals,
    LParen,
    RParen,
    /// End of a logical line.
    Eol,
    Eof,
}

/// A token plus its 1-based source line.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Tokenizer over scenario text.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            at_line_start: true,
        }
    }

    /// Tokenize the whole input.
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.token == Token::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<SpannedToken> {
        self.skip_spaces();

        let line = self.line;
        match self.peek() {
            None => Ok(SpannedToken {
                token: Token::Eof,
                line,
            }),
            Some('\n') => {
                self.advance();
                self.line += 1;
                self.at_line_start = true;
                self.skip_spaces();
                if self.peek() == Some('+') {
                    // Continuation: fold the next physical line into the
                    // current logical line, emitting no Eol.
                    self.advance();
                    self.at_line_start = false;
                    return self.next_token();
                }
                Ok(SpannedToken {
                    token: Token::Eol,
                    line,
                })
            }
            Some('*') | Some('#') if self.at_line_start => {
                // Comment lines vanish entirely, newline included, so a
                // leading comment does not produce a stray Eol.
                self.skip_to_eol();
                if self.peek() == Some('\n') {
                    self.advance();
                    self.line += 1;
                }
                self.next_token()
            }
            Some('=') => {
                self.advance();
                self.at_line_start = false;
                Ok(SpannedToken {
                    token: Token::Equals,
                    line,
                })
            }
            Some('(') => {
                self.advance();
                self.at_line_start = false;
                Ok(SpannedToken {
                    token: Token::LParen,
                    line,
                })
            }
            Some(')') => {
                self.advance();
                self.at_line_start = false;
                Ok(SpannedToken {
                    token: Token::RParen,
                    line,
                })
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let ident = self.read_ident();
                self.at_line_start = false;
                Ok(SpannedToken {
                    token: Token::Ident(ident),
                    line,
                })
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                let value = self.read_value();
                self.at_line_start = false;
                Ok(SpannedToken {
                    token: Token::Value(value),
                    line,
                })
            }
            Some(c) => Err(Error::at(line, format!("unexpected character '{c}'"))),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn skip_spaces(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_to_eol(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    fn read_value(&mut self) -> String {
        let mut value = String::new();

        if let Some(c) = self.peek()
            && (c == '-' || c == '+')
        {
            value.push(c);
            self.advance();
        }

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // Exponent.
        if let Some(c) = self.peek()
            && (c == 'e' || c == 'E')
        {
            value.push(c);
            self.advance();
            if let Some(c) = self.peek()
                && (c == '-' || c == '+')
            {
                value.push(c);
                self.advance();
            }
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    value.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        // SI suffix.
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }

        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_element_line() {
        let toks = tokens("res r1 in out r=10k");
        assert_eq!(
            toks,
            vec![
                Token::Ident("res".into()),
                Token::Ident("r1".into()),
                Token::Ident("in".into()),
                Token::Ident("out".into()),
                Token::Ident("r".into()),
                Token::Equals,
                Token::Value("10k".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_numeric_nodes_lex_as_values() {
        let toks = tokens("res r1 1 0 r=100");
        assert_eq!(toks[2], Token::Value("1".into()));
        assert_eq!(toks[3], Token::Value("0".into()));
    }

    #[test]
    fn test_comments_skipped() {
        let toks = tokens("* header\n# another\nres r1 1 0 r=1");
        assert_eq!(toks[0], Token::Ident("res".into()));
        // Comment lines leave no Eol behind.
        assert_eq!(toks.iter().filter(|t| **t == Token::Eol).count(), 0);
    }

    #[test]
    fn test_comment_lines_keep_line_numbers() {
        let spanned = Lexer::new("* header\nres r1 1 0 r=1").tokenize().unwrap();
        assert_eq!(spanned[0].token, Token::Ident("res".into()));
        assert_eq!(spanned[0].line, 2);
    }

    #[test]
    fn test_explicit_positive_sign() {
        let toks = tokens("cap c1 1 0 c=1u v0=+5");
        assert!(toks.contains(&Token::Value("+5".into())));
    }

    #[test]
    fn test_continuation_folds_line() {
        let toks = tokens("vsrc vin 1 0\n+ dc=5");
        assert!(toks.contains(&Token::Ident("dc".into())));
        // No Eol between "0" and "dc": one logical line.
        assert_eq!(toks.iter().filter(|t| **t == Token::Eol).count(), 0);
    }

    #[test]
    fn test_output_ref() {
        let toks = tokens("v(out)");
        assert_eq!(
            toks,
            vec![
                Token::Ident("v".into()),
                Token::LParen,
                Token::Ident("out".into()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_scientific_and_negative() {
        let toks = tokens("cap c1 1 0 c=2.2e-6 v0=-5");
        assert!(toks.contains(&Token::Value("2.2e-6".into())));
        assert!(toks.contains(&Token::Value("-5".into())));
    }

    #[test]
    fn test_line_numbers() {
        let spanned = Lexer::new("a\nb\nc").tokenize().unwrap();
        let lines: Vec<usize> = spanned
            .iter()
            .filter(|t| matches!(t.token, Token::Ident(_)))
            .map(|t| t.line)
            .collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }
}
