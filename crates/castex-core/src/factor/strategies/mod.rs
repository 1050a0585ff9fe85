//! Individual factoring patterns (spec.md §4.8), tried in priority order by
//! the engine in [`crate::factor`]. Each module is one named strategy.

pub mod berlekamp_zassenhaus;
pub mod common;
pub mod cyclotomic;
pub mod diff_squares;
pub mod grouping;
pub mod lll_fallback;
pub mod perfect_power;
pub mod power_substitution;
pub mod quadratic;

use crate::ast::{BinaryOp, Expr};
use crate::number::Number;

/// A single additive leaf with its accumulated sign, as produced by walking
/// a tree of `Add`/`Sub`/unary negation nodes. Mirrors the pattern used by
/// the commutative combiner and `poly::Poly::from_expr`.
pub(super) fn collect_signed_terms(expr: &Expr) -> Vec<(Expr, i8)> {
    fn walk(expr: &Expr, sign: i8, out: &mut Vec<(Expr, i8)>) {
        match expr {
            Expr::Binary { op: BinaryOp::Add, left, right } => {
                walk(left, sign, out);
                walk(right, sign, out);
            }
            Expr::Binary { op: BinaryOp::Sub, left, right } => {
                walk(left, sign, out);
                walk(right, -sign, out);
            }
            Expr::Unary { op: crate::ast::UnaryOp::Neg, operand } => {
                walk(operand, -sign, out);
            }
            other => out.push((other.clone(), sign)),
        }
    }
    let mut out = Vec::new();
    walk(expr, 1, &mut out);
    out
}

/// Rebuilds a signed-term list into an `Add`/`Sub` chain, applying a unary
/// negation for a negative leaf that isn't itself already a product with a
/// negative coefficient.
pub(super) fn rebuild_signed_terms(terms: Vec<(Expr, i8)>) -> Expr {
    let signed: Vec<Expr> = terms
        .into_iter()
        .map(|(term, sign)| if sign < 0 { Expr::neg(term) } else { term })
        .collect();
    Expr::fold(BinaryOp::Add, signed)
}

/// Splits a product node into its multiplicative factors via [`Expr::flatten`],
/// or returns the single-element list `[expr]` if it isn't a product.
pub(super) fn multiplicative_factors(expr: &Expr) -> Vec<Expr> {
    expr.flatten(BinaryOp::Mul).into_iter().cloned().collect()
}

/// Decomposes a single multiplicative term into its leading numeric
/// coefficient and the list of `(base, integer exponent)` pairs for every
/// non-numeric factor, e.g. `3 x^2 y` -> `(3, [(x, 2), (y, 1)])`. Only
/// non-negative integer exponents are tracked; anything else (fractional
/// or symbolic exponents) is kept as an opaque base with exponent 1, which
/// is still correct for GCD purposes -- it just won't be pulled out unless
/// it occurs identically in every term.
pub(super) fn decompose_term(expr: &Expr) -> (Number, Vec<(Expr, u32)>) {
    let mut coefficient = Number::one();
    let mut bases: Vec<(Expr, u32)> = Vec::new();
    for factor in multiplicative_factors(expr) {
        match &factor {
            Expr::Number(n) => coefficient = coefficient.checked_mul(n),
            Expr::Unary { op: crate::ast::UnaryOp::Neg, operand } => {
                coefficient = coefficient.neg();
                merge_base(&mut bases, base_and_exponent(operand));
            }
            _ => merge_base(&mut bases, base_and_exponent(&factor)),
        }
    }
    (coefficient, bases)
}

fn base_and_exponent(expr: &Expr) -> (Expr, u32) {
    if let Expr::Binary { op: BinaryOp::Pow, left, right } = expr {
        if let Expr::Number(n) = right.as_ref() {
            if let Some(exp) = n.to_u32() {
                return (left.as_ref().clone(), exp);
            }
        }
    }
    (expr.clone(), 1)
}

fn merge_base(bases: &mut Vec<(Expr, u32)>, (base, exponent): (Expr, u32)) {
    for (existing, count) in bases.iter_mut() {
        if existing.structural_eq(&base) {
            *count += exponent;
            return;
        }
    }
    bases.push((base, exponent));
}

/// Rebuilds `(coefficient, bases)` back into a single multiplicative `Expr`.
pub(super) fn rebuild_term(coefficient: Number, bases: Vec<(Expr, u32)>) -> Expr {
    let mut factors = Vec::new();
    if !coefficient.is_one() || bases.is_empty() {
        factors.push(Expr::Number(coefficient));
    }
    for (base, exponent) in bases {
        if exponent == 0 {
            continue;
        } else if exponent == 1 {
            factors.push(base);
        } else {
            factors.push(Expr::pow(base, Expr::integer(exponent as i64)));
        }
    }
    Expr::fold(BinaryOp::Mul, factors)
}

/// The single free variable of a polynomial-shaped expression, if there is
/// exactly one. Strategies that go through [`crate::poly::Poly`] need this
/// to decide whether they apply at all.
pub(super) fn sole_variable(expr: &Expr) -> Option<String> {
    let mut found: Option<String> = None;
    fn walk(expr: &Expr, found: &mut Option<String>, ok: &mut bool) {
        match expr {
            Expr::Identifier(id) => match found {
                Some(name) if name != &id.name => *ok = false,
                Some(_) => {}
                None => *found = Some(id.name.clone()),
            },
            Expr::Number(_) => {}
            Expr::Binary { left, right, .. } => {
                walk(left, found, ok);
                walk(right, found, ok);
            }
            Expr::Unary { operand, .. } => walk(operand, found, ok),
            _ => *ok = false,
        }
    }
    let mut ok = true;
    walk(expr, &mut found, &mut ok);
    if ok {
        found
    } else {
        None
    }
}
