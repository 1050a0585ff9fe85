//! Recursive-descent, operator-precedence parser (spec.md §4.2).
//!
//! Precedence, loosest to tightest: relational, additive, multiplicative
//! (including the implicit-multiplication marker), unary, exponentiation
//! (right-associative), then atoms (literals, identifiers, grouping,
//! function application, `\frac`, `\sqrt`, `\int`/`\sum`/`\prod`).

mod reserved;

use crate::ast::{Arity, BinaryOp, Expr, UnaryOp};
use crate::error::AnalysisError;
use crate::lexer::{Token, TokenKind};
use num_bigint::BigInt;

pub fn parse_tokens(tokens: Vec<Token>) -> Result<Expr, AnalysisError> {
    let mut parser = Parser { tokens, pos: 0, limit: None };
    let expr = parser.parse_relational()?;
    parser.expect_eof()?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// When set, the parser behaves as if the token stream ended at this
    /// index — used to stop an `\int` integrand exactly at its `d<var>`
    /// marker without the generic implicit-multiplication machinery
    /// swallowing it (spec.md §4.2).
    limit: Option<usize>,
}

impl Parser {
    fn current(&self) -> &TokenKind {
        if self.limit == Some(self.pos) {
            &TokenKind::Eof
        } else {
            &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
        }
    }

    fn position(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].position
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn expect_eof(&self) -> Result<(), AnalysisError> {
        if matches!(self.current(), TokenKind::Eof) {
            Ok(())
        } else {
            Err(AnalysisError::syntactic(
                format!("unexpected trailing token {:?}", self.current()),
                Some(self.position()),
            ))
        }
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<(), AnalysisError> {
        if self.current() == expected {
            self.advance();
            Ok(())
        } else {
            Err(AnalysisError::syntactic(
                format!("expected {expected:?}, found {:?}", self.current()),
                Some(self.position()),
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<(String, usize), AnalysisError> {
        let pos = self.position();
        match self.current().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok((name, pos))
            }
            other => Err(AnalysisError::syntactic(
                format!("expected an identifier, found {other:?}"),
                Some(pos),
            )),
        }
    }

    fn check_not_reserved(&self, name: &str, pos: usize) -> Result<(), AnalysisError> {
        if reserved::is_reserved_name(name) {
            Err(AnalysisError::semantic_parse(
                format!("'{name}' is a reserved name and cannot be used as an identifier"),
                Some(pos),
            ))
        } else {
            Ok(())
        }
    }

    // --- precedence levels, loosest to tightest -----------------------

    fn parse_relational(&mut self) -> Result<Expr, AnalysisError> {
        let left = self.parse_additive()?;
        let op = match self.current() {
            TokenKind::Equals => BinaryOp::Eq,
            TokenKind::Less => BinaryOp::Lt,
            TokenKind::Greater => BinaryOp::Gt,
            TokenKind::LessEqual => BinaryOp::Le,
            TokenKind::GreaterEqual => BinaryOp::Ge,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_additive()?;
        Ok(Expr::binary(op, left, right))
    }

    fn parse_additive(&mut self) -> Result<Expr, AnalysisError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, AnalysisError> {
        let mut left = self.parse_unary()?;
        loop {
            match self.current() {
                TokenKind::Star | TokenKind::ImplicitMul => {
                    self.advance();
                    let right = self.parse_unary()?;
                    left = Expr::binary(BinaryOp::Mul, left, right);
                }
                TokenKind::Slash => {
                    self.advance();
                    let right = self.parse_unary()?;
                    left = Expr::Fraction { numerator: Box::new(left), denominator: Box::new(right) };
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, AnalysisError> {
        match self.current() {
            TokenKind::Plus => {
                self.advance();
                Ok(Expr::Unary { op: UnaryOp::Plus, operand: Box::new(self.parse_unary()?) })
            }
            TokenKind::Minus => {
                self.advance();
                Ok(Expr::neg(self.parse_unary()?))
            }
            _ => self.parse_exponent(),
        }
    }

    fn parse_exponent(&mut self) -> Result<Expr, AnalysisError> {
        let base = self.parse_atom()?;
        if matches!(self.current(), TokenKind::Caret) {
            self.advance();
            let exponent = if matches!(self.current(), TokenKind::LBrace) {
                self.advance();
                let e = self.parse_relational()?;
                self.expect(&TokenKind::RBrace)?;
                e
            } else {
                self.parse_unary()?
            };
            Ok(Expr::pow(base, exponent))
        } else {
            Ok(base)
        }
    }

    // --- atoms ----------------------------------------------------------

    fn parse_atom(&mut self) -> Result<Expr, AnalysisError> {
        let pos = self.position();
        match self.current().clone() {
            TokenKind::Number(text) => {
                self.advance();
                parse_number_literal(&text, pos)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                self.check_not_reserved(&name, pos)?;
                Ok(Expr::symbol(name))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_relational()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Command(word) => self.parse_command(&word, pos),
            other => Err(AnalysisError::syntactic(format!("unexpected token {other:?}"), Some(pos))),
        }
    }

    fn parse_command(&mut self, word: &str, pos: usize) -> Result<Expr, AnalysisError> {
        self.advance();
        match word {
            "left" => {
                // \left( ... \right) — transparent grouping.
                self.expect(&TokenKind::LParen)?;
                let inner = self.parse_relational()?;
                if matches!(self.current(), TokenKind::Command(w) if w == "right") {
                    self.advance();
                }
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            "frac" => {
                self.expect(&TokenKind::LBrace)?;
                let numerator = self.parse_relational()?;
                self.expect(&TokenKind::RBrace)?;
                self.expect(&TokenKind::LBrace)?;
                let denominator = self.parse_relational()?;
                self.expect(&TokenKind::RBrace)?;
                Ok(Expr::Fraction { numerator: Box::new(numerator), denominator: Box::new(denominator) })
            }
            "sqrt" => {
                if matches!(self.current(), TokenKind::LBracket) {
                    self.advance();
                    let index = self.parse_relational()?;
                    self.expect(&TokenKind::RBracket)?;
                    self.expect(&TokenKind::LBrace)?;
                    let radicand = self.parse_relational()?;
                    self.expect(&TokenKind::RBrace)?;
                    Ok(Expr::call("root", vec![radicand, index], Arity::exact(2)))
                } else {
                    self.expect(&TokenKind::LBrace)?;
                    let radicand = self.parse_relational()?;
                    self.expect(&TokenKind::RBrace)?;
                    Ok(Expr::call("sqrt", vec![radicand], Arity::exact(1)))
                }
            }
            "log" => {
                let base = if matches!(self.current(), TokenKind::Underscore) {
                    self.advance();
                    self.expect(&TokenKind::LBrace)?;
                    let b = self.parse_relational()?;
                    self.expect(&TokenKind::RBrace)?;
                    Some(b)
                } else {
                    None
                };
                let arg = self.parse_delimited_arg()?;
                let args = match base {
                    Some(b) => vec![arg, b],
                    None => vec![arg],
                };
                Ok(Expr::call("log", args, reserved::function_arity("log").unwrap()))
            }
            "int" => self.parse_integral(),
            "sum" => self.parse_sum_or_product(true),
            "prod" => self.parse_sum_or_product(false),
            _ => {
                let arity = reserved::function_arity(word).ok_or_else(|| {
                    AnalysisError::syntactic(format!("unknown command '\\{word}'"), Some(pos))
                })?;
                let args = self.parse_call_args()?;
                if !arity.contains(args.len()) {
                    return Err(AnalysisError::semantic_parse(
                        format!(
                            "'\\{word}' expects {}..{} argument(s), found {}",
                            arity.min,
                            arity.max,
                            args.len()
                        ),
                        Some(pos),
                    ));
                }
                Ok(Expr::call(word, args, arity))
            }
        }
    }

    /// A single function argument wrapped in `(...)`, with optional
    /// `\left`/`\right` delimiter decoration.
    fn parse_delimited_arg(&mut self) -> Result<Expr, AnalysisError> {
        if matches!(self.current(), TokenKind::Command(w) if w == "left") {
            self.advance();
        }
        self.expect(&TokenKind::LParen)?;
        let arg = self.parse_relational()?;
        if matches!(self.current(), TokenKind::Command(w) if w == "right") {
            self.advance();
        }
        self.expect(&TokenKind::RParen)?;
        Ok(arg)
    }

    /// A comma-separated argument list wrapped in `(...)`, used by the
    /// generic named-function call path so an arity mismatch (spec.md
    /// §4.2) can be reported against an actual count rather than surfacing
    /// as a generic "expected `)`" syntax error.
    fn parse_call_args(&mut self) -> Result<Vec<Expr>, AnalysisError> {
        if matches!(self.current(), TokenKind::Command(w) if w == "left") {
            self.advance();
        }
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !matches!(self.current(), TokenKind::RParen) {
            args.push(self.parse_relational()?);
            while matches!(self.current(), TokenKind::Comma) {
                self.advance();
                args.push(self.parse_relational()?);
            }
        }
        if matches!(self.current(), TokenKind::Command(w) if w == "right") {
            self.advance();
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    /// `_{lower}` or `^{upper}` (or a single bare atom-level token without
    /// braces, e.g. `\sum_{i=1}^n`).
    fn parse_bracketed_bound(&mut self) -> Result<Expr, AnalysisError> {
        if matches!(self.current(), TokenKind::LBrace) {
            self.advance();
            let e = self.parse_relational()?;
            self.expect(&TokenKind::RBrace)?;
            Ok(e)
        } else {
            self.parse_unary()
        }
    }

    fn parse_sum_or_product(&mut self, is_sum: bool) -> Result<Expr, AnalysisError> {
        self.expect(&TokenKind::Underscore)?;
        self.expect(&TokenKind::LBrace)?;
        let (name, name_pos) = self.expect_identifier()?;
        self.check_not_reserved(&name, name_pos)?;
        self.expect(&TokenKind::Equals)?;
        let lower = self.parse_additive()?;
        self.expect(&TokenKind::RBrace)?;
        self.expect(&TokenKind::Caret)?;
        let upper = self.parse_bracketed_bound()?;
        let body = self.parse_additive()?;
        if is_sum {
            Ok(Expr::Sum { body: Box::new(body), variable: name, lower: Box::new(lower), upper: Box::new(upper) })
        } else {
            Ok(Expr::Product { body: Box::new(body), variable: name, lower: Box::new(lower), upper: Box::new(upper) })
        }
    }

    fn parse_integral(&mut self) -> Result<Expr, AnalysisError> {
        let mut lower = None;
        let mut upper = None;
        loop {
            match self.current() {
                TokenKind::Underscore => {
                    self.advance();
                    lower = Some(Box::new(self.parse_bracketed_bound()?));
                }
                TokenKind::Caret => {
                    self.advance();
                    upper = Some(Box::new(self.parse_bracketed_bound()?));
                }
                _ => break,
            }
        }
        let (boundary, variable) = self.scan_differential(self.pos).ok_or_else(|| {
            AnalysisError::syntactic("integral is missing its 'd<variable>' differential", Some(self.position()))
        })?;
        self.check_not_reserved(&variable, self.tokens[boundary].position)?;

        let previous_limit = self.limit;
        self.limit = Some(boundary);
        let integrand = self.parse_additive()?;
        self.limit = previous_limit;

        self.pos = boundary;
        self.advance(); // the 'd' identifier
        if matches!(self.current(), TokenKind::ImplicitMul) {
            self.advance();
        }
        self.advance(); // the bound-variable identifier

        Ok(Expr::Integral {
            integrand: Box::new(integrand),
            variable,
            lower,
            upper,
        })
    }

    /// Finds the earliest `d<var>` marker at the current bracket depth,
    /// starting from `start`. Returns the index of the `d` token and the
    /// variable name.
    fn scan_differential(&self, start: usize) -> Option<(usize, String)> {
        let mut depth: i32 = 0;
        let mut i = start;
        while i < self.tokens.len() {
            match &self.tokens[i].kind {
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                    if depth == 0 {
                        return None;
                    }
                    depth -= 1;
                }
                TokenKind::Identifier(name) if depth == 0 && name == "d" => {
                    let mut j = i + 1;
                    if matches!(self.tokens.get(j).map(|t| &t.kind), Some(TokenKind::ImplicitMul)) {
                        j += 1;
                    }
                    if let Some(Token { kind: TokenKind::Identifier(var), .. }) = self.tokens.get(j) {
                        return Some((i, var.clone()));
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
            i += 1;
        }
        None
    }
}

/// Parses a decimal-literal lexeme (`"3"`, `"3.14"`) into an exact
/// [`Expr::Number`].
fn parse_number_literal(text: &str, pos: usize) -> Result<Expr, AnalysisError> {
    match text.split_once('.') {
        None => {
            let value: BigInt = text
                .parse()
                .map_err(|_| AnalysisError::lexical(format!("malformed integer literal '{text}'"), Some(pos)))?;
            Ok(Expr::Number(crate::number::Number::from_bigint(value)))
        }
        Some((whole, frac)) => {
            let digits = format!("{whole}{frac}");
            let numerator: BigInt = digits
                .parse()
                .map_err(|_| AnalysisError::lexical(format!("malformed decimal literal '{text}'"), Some(pos)))?;
            let denominator = BigInt::from(10u32).pow(frac.len() as u32);
            Ok(Expr::Number(crate::number::Number::new(numerator, denominator)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(source: &str) -> Expr {
        parse_tokens(tokenize(source).unwrap()).unwrap()
    }

    #[test]
    fn parses_polynomial_with_implicit_multiplication() {
        let expr = parse("x^2 + 3x + 2");
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn frac_and_slash_both_produce_fraction_nodes() {
        assert!(matches!(parse("\\frac{1}{2}"), Expr::Fraction { .. }));
        assert!(matches!(parse("1/2"), Expr::Fraction { .. }));
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        // -x^2 should be -(x^2), i.e. Neg(Pow(x, 2)), not (-x)^2.
        let expr = parse("-x^2");
        match expr {
            Expr::Unary { op: UnaryOp::Neg, operand } => {
                assert!(matches!(*operand, Expr::Binary { op: BinaryOp::Pow, .. }));
            }
            other => panic!("expected unary negation, got {other:?}"),
        }
    }

    #[test]
    fn exponentiation_is_right_associative() {
        // x^y^2 == x^(y^2)
        let expr = parse("x^y^2");
        match expr {
            Expr::Binary { op: BinaryOp::Pow, right, .. } => {
                assert!(matches!(*right, Expr::Binary { op: BinaryOp::Pow, .. }));
            }
            other => panic!("expected power, got {other:?}"),
        }
    }

    #[test]
    fn integral_stops_at_differential() {
        let expr = parse("\\int_{0}^{1} x^2 + 1 \\, dx");
        match expr {
            Expr::Integral { variable, lower, upper, .. } => {
                assert_eq!(variable, "x");
                assert!(lower.is_some());
                assert!(upper.is_some());
            }
            other => panic!("expected integral, got {other:?}"),
        }
    }

    #[test]
    fn sum_requires_bound_variable_assignment() {
        let expr = parse("\\sum_{i=1}^{n} i");
        assert!(matches!(expr, Expr::Sum { .. }));
    }

    #[test]
    fn reserved_name_rejected_as_bound_variable() {
        let err = parse_tokens(tokenize("\\sum_{pi=1}^{n} pi").unwrap()).unwrap_err();
        assert!(matches!(err, AnalysisError::SemanticParse { .. }));
    }

    #[test]
    fn function_arity_mismatch_is_rejected() {
        let err = parse_tokens(tokenize("\\sin(x, y)").unwrap()).unwrap_err();
        assert!(matches!(err, AnalysisError::SemanticParse { .. }));
    }
}
