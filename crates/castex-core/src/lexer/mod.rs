//! Tokenizer (spec.md §4.1).
//!
//! Turns a LaTeX source string into a flat [`Token`] stream with byte
//! positions, then inserts [`TokenKind::ImplicitMul`] wherever two adjacent
//! atoms have no explicit operator between them (`2x`, `x(y+1)`, `2\pi`).
//! Unlike the teacher's zero-copy `Token<'input>` (borrowed `&str` slices),
//! tokens here own their text: command and number spans sometimes need
//! light rewriting (stripping digit-group spaces is not needed here, but
//! owned strings make the implicit-multiplication insertion pass, which
//! rebuilds the stream, straightforward without a second lifetime to thread
//! through the parser). See DESIGN.md.

mod commands;
mod token;

pub use token::{Token, TokenKind};

use crate::error::AnalysisError;

pub fn tokenize(source: &str) -> Result<Vec<Token>, AnalysisError> {
    let mut lexer = Lexer::new(source);
    let raw = lexer.run()?;
    Ok(insert_implicit_mul(raw))
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, bytes: source.as_bytes(), pos: 0 }
    }

    fn run(&mut self) -> Result<Vec<Token>, AnalysisError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(c) = self.peek() else {
                tokens.push(Token { kind: TokenKind::Eof, position: start });
                break;
            };
            let kind = match c {
                '0'..='9' | '.' => self.lex_number(),
                '+' => { self.pos += 1; TokenKind::Plus }
                '-' => { self.pos += 1; TokenKind::Minus }
                '*' => { self.pos += 1; TokenKind::Star }
                '/' => { self.pos += 1; TokenKind::Slash }
                '^' => { self.pos += 1; TokenKind::Caret }
                '=' => { self.pos += 1; TokenKind::Equals }
                '<' => self.lex_angle(false),
                '>' => self.lex_angle(true),
                '(' => { self.pos += 1; TokenKind::LParen }
                ')' => { self.pos += 1; TokenKind::RParen }
                '{' => { self.pos += 1; TokenKind::LBrace }
                '}' => { self.pos += 1; TokenKind::RBrace }
                '[' => { self.pos += 1; TokenKind::LBracket }
                ']' => { self.pos += 1; TokenKind::RBracket }
                '_' => { self.pos += 1; TokenKind::Underscore }
                ',' => { self.pos += 1; TokenKind::Comma }
                '\\' => self.lex_command(start)?,
                c if c.is_ascii_alphabetic() => self.lex_identifier(),
                other => {
                    return Err(AnalysisError::lexical(
                        format!("unexpected character '{other}'"),
                        Some(start),
                    ))
                }
            };
            tokens.push(Token { kind, position: start });
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn lex_angle(&mut self, is_greater: bool) -> TokenKind {
        self.pos += 1;
        if self.peek() == Some('=') {
            self.pos += 1;
            if is_greater { TokenKind::GreaterEqual } else { TokenKind::LessEqual }
        } else if is_greater {
            TokenKind::Greater
        } else {
            TokenKind::Less
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.pos;
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.pos += 1;
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        TokenKind::Number(self.source[start..self.pos].to_string())
    }

    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1;
        TokenKind::Identifier(self.source[start..self.pos].to_string())
    }

    /// Consumes `\name` and classifies it as a command word (structural,
    /// e.g. `frac`, `sqrt`, `sin`, `int`) or an identifier-shaped word
    /// (Greek letters and reserved constants, e.g. `pi`, `alpha`).
    fn lex_command(&mut self, start: usize) -> Result<TokenKind, AnalysisError> {
        self.pos += 1; // consume '\'
        let word_start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if self.pos == word_start {
            return Err(AnalysisError::lexical("stray backslash", Some(start)));
        }
        let word = self.source[word_start..self.pos].to_string();
        if word == "cdot" || word == "times" {
            return Ok(TokenKind::Star);
        }
        if word == "div" {
            return Ok(TokenKind::Slash);
        }
        if word == "le" {
            return Ok(TokenKind::LessEqual);
        }
        if word == "ge" {
            return Ok(TokenKind::GreaterEqual);
        }
        if commands::is_structural_command(&word) {
            Ok(TokenKind::Command(word))
        } else {
            Ok(TokenKind::Identifier(word))
        }
    }
}

/// Inserts an `ImplicitMul` token between any two adjacent tokens where the
/// first can end an atom and the second can start one, e.g. `2`, `x` in
/// `2x`, or `)`, `(` in `(a+b)(c+d)`.
fn insert_implicit_mul(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    for window in tokens.windows(2) {
        let (a, b) = (&window[0], &window[1]);
        out.push(a.clone());
        if a.kind.ends_atom() && b.kind.starts_atom() {
            out.push(Token { kind: TokenKind::ImplicitMul, position: b.position });
        }
    }
    if let Some(last) = tokens.last() {
        out.push(last.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_simple_polynomial() {
        assert_eq!(
            kinds("x^2 + 3x"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Caret,
                TokenKind::Number("2".into()),
                TokenKind::Plus,
                TokenKind::Number("3".into()),
                TokenKind::ImplicitMul,
                TokenKind::Identifier("x".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_frac_command() {
        assert_eq!(
            kinds("\\frac{1}{2}"),
            vec![
                TokenKind::Command("frac".into()),
                TokenKind::LBrace,
                TokenKind::Number("1".into()),
                TokenKind::RBrace,
                TokenKind::LBrace,
                TokenKind::Number("2".into()),
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn cdot_becomes_star() {
        assert_eq!(
            kinds("2 \\cdot 3"),
            vec![
                TokenKind::Number("2".into()),
                TokenKind::Star,
                TokenKind::Number("3".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn greek_letter_is_identifier() {
        assert_eq!(
            kinds("\\alpha + 1"),
            vec![
                TokenKind::Identifier("alpha".into()),
                TokenKind::Plus,
                TokenKind::Number("1".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn implicit_mul_between_parenthesized_factors() {
        assert_eq!(
            kinds("(x+1)(x+2)"),
            vec![
                TokenKind::LParen,
                TokenKind::Identifier("x".into()),
                TokenKind::Plus,
                TokenKind::Number("1".into()),
                TokenKind::RParen,
                TokenKind::ImplicitMul,
                TokenKind::LParen,
                TokenKind::Identifier("x".into()),
                TokenKind::Plus,
                TokenKind::Number("2".into()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn stray_backslash_is_lexical_error() {
        let err = tokenize("\\ ").unwrap_err();
        assert!(matches!(err, AnalysisError::Lexical { .. }));
    }
}
