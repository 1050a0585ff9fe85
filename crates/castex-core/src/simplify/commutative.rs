//! Commutative combiner (spec.md §4.5): canonicalizes multiplicative terms
//! and combines like additive terms.
//!
//! A term is decomposed into a coefficient and a list of `(base,
//! exponent)` pairs — the spec's "variable multiset" and "residual-constant
//! subtree list" unified into one structure, since both are handled
//! identically by multiplication (merge on structurally-equal base, sum
//! exponents) and by the like-term key (compare base lists after sorting
//! by printed form).

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::number::Number;
use crate::steps::StepLog;

#[derive(Clone)]
struct TermRecord {
    coefficient: Number,
    bases: Vec<(Expr, Number)>,
}

pub fn simplify_commutative(expr: &Expr, log: &mut StepLog) -> Expr {
    let expr = simplify_children(expr, log);
    let rebuilt = match &expr {
        Expr::Binary { op: BinaryOp::Add, .. } | Expr::Binary { op: BinaryOp::Sub, .. } => {
            combine_additive(&expr)
        }
        Expr::Binary { op: BinaryOp::Mul, .. } => build_term_expr(&analyze_term(&expr)),
        _ => return expr,
    };
    if !rebuilt.structural_eq(&expr) {
        log.push(format!("{} -> {}", crate::render::to_latex(&expr), crate::render::to_latex(&rebuilt)));
    }
    rebuilt
}

fn simplify_children(expr: &Expr, log: &mut StepLog) -> Expr {
    match expr {
        Expr::Number(_) | Expr::Identifier(_) => expr.clone(),
        Expr::Binary { op, left, right } => {
            Expr::binary(*op, simplify_commutative(left, log), simplify_commutative(right, log))
        }
        Expr::Unary { op, operand } => {
            Expr::Unary { op: *op, operand: Box::new(simplify_commutative(operand, log)) }
        }
        Expr::Call { name, args, expected_arity } => Expr::Call {
            name: name.clone(),
            args: args.iter().map(|a| simplify_commutative(a, log)).collect(),
            expected_arity: *expected_arity,
        },
        Expr::Fraction { numerator, denominator } => Expr::Fraction {
            numerator: Box::new(simplify_commutative(numerator, log)),
            denominator: Box::new(simplify_commutative(denominator, log)),
        },
        Expr::Integral { integrand, variable, lower, upper } => Expr::Integral {
            integrand: Box::new(simplify_commutative(integrand, log)),
            variable: variable.clone(),
            lower: lower.as_ref().map(|b| Box::new(simplify_commutative(b, log))),
            upper: upper.as_ref().map(|b| Box::new(simplify_commutative(b, log))),
        },
        Expr::Sum { body, variable, lower, upper } => Expr::Sum {
            body: Box::new(simplify_commutative(body, log)),
            variable: variable.clone(),
            lower: Box::new(simplify_commutative(lower, log)),
            upper: Box::new(simplify_commutative(upper, log)),
        },
        Expr::Product { body, variable, lower, upper } => Expr::Product {
            body: Box::new(simplify_commutative(body, log)),
            variable: variable.clone(),
            lower: Box::new(simplify_commutative(lower, log)),
            upper: Box::new(simplify_commutative(upper, log)),
        },
    }
}

fn analyze_term(expr: &Expr) -> TermRecord {
    match expr {
        Expr::Number(n) => TermRecord { coefficient: n.clone(), bases: Vec::new() },
        Expr::Unary { op: UnaryOp::Neg, operand } => {
            let mut term = analyze_term(operand);
            term.coefficient = term.coefficient.neg();
            term
        }
        Expr::Binary { op: BinaryOp::Mul, left, right } => merge(analyze_term(left), analyze_term(right)),
        Expr::Binary { op: BinaryOp::Pow, left, right } => {
            if let Expr::Number(exponent) = right.as_ref() {
                TermRecord { coefficient: Number::one(), bases: vec![((**left).clone(), exponent.clone())] }
            } else {
                TermRecord { coefficient: Number::one(), bases: vec![(expr.clone(), Number::one())] }
            }
        }
        _ => TermRecord { coefficient: Number::one(), bases: vec![(expr.clone(), Number::one())] },
    }
}

fn merge(a: TermRecord, b: TermRecord) -> TermRecord {
    let coefficient = a.coefficient.checked_mul(&b.coefficient);
    let mut bases = a.bases;
    'outer: for (base, exponent) in b.bases {
        for (existing_base, existing_exponent) in bases.iter_mut() {
            if existing_base.structural_eq(&base) {
                *existing_exponent = existing_exponent.checked_add(&exponent);
                continue 'outer;
            }
        }
        bases.push((base, exponent));
    }
    TermRecord { coefficient, bases }
}

fn term_key(term: &TermRecord) -> String {
    let mut parts: Vec<String> =
        term.bases.iter().map(|(b, e)| format!("{}^{}", crate::render::to_latex(b), e)).collect();
    parts.sort();
    parts.join("*")
}

fn build_term_expr(term: &TermRecord) -> Expr {
    let mut bases_sorted = term.bases.clone();
    bases_sorted.sort_by_key(|(b, _)| crate::render::to_latex(b));
    let mut factors: Vec<Expr> = bases_sorted
        .into_iter()
        .map(|(base, exponent)| if exponent.is_one() { base } else { Expr::pow(base, Expr::Number(exponent)) })
        .collect();

    if term.coefficient.is_zero() {
        return Expr::integer(0);
    }
    if term.coefficient == Number::integer(-1) && !factors.is_empty() {
        return Expr::neg(Expr::fold(BinaryOp::Mul, factors));
    }
    if !term.coefficient.is_one() || factors.is_empty() {
        factors.insert(0, Expr::Number(term.coefficient.clone()));
    }
    Expr::fold(BinaryOp::Mul, factors)
}

fn collect_signed_terms(expr: &Expr, sign: i8, out: &mut Vec<(Expr, i8)>) {
    match expr {
        Expr::Binary { op: BinaryOp::Add, left, right } => {
            collect_signed_terms(left, sign, out);
            collect_signed_terms(right, sign, out);
        }
        Expr::Binary { op: BinaryOp::Sub, left, right } => {
            collect_signed_terms(left, sign, out);
            collect_signed_terms(right, -sign, out);
        }
        Expr::Unary { op: UnaryOp::Neg, operand } => collect_signed_terms(operand, -sign, out),
        other => out.push((other.clone(), sign)),
    }
}

fn combine_additive(expr: &Expr) -> Expr {
    let mut leaves = Vec::new();
    collect_signed_terms(expr, 1, &mut leaves);

    let mut buckets: Vec<(String, TermRecord)> = Vec::new();
    for (leaf, sign) in leaves {
        let mut term = analyze_term(&leaf);
        if sign < 0 {
            term.coefficient = term.coefficient.neg();
        }
        let key = term_key(&term);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.coefficient = existing.coefficient.checked_add(&term.coefficient),
            None => buckets.push((key, term)),
        }
    }

    let mut terms: Vec<Expr> = buckets
        .into_iter()
        .filter(|(_, t)| !t.coefficient.is_zero())
        .map(|(_, t)| build_term_expr(&t))
        .collect();
    if terms.is_empty() {
        return Expr::integer(0);
    }
    terms.sort_by_key(|e| e.complexity());
    Expr::fold(BinaryOp::Add, terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepLog;

    fn simplify(expr: Expr) -> Expr {
        let mut log = StepLog::new();
        simplify_commutative(&expr, &mut log)
    }

    #[test]
    fn like_terms_combine() {
        // 3x + 2x -> 5x
        let x = Expr::symbol("x");
        let expr = Expr::add(Expr::mul(Expr::integer(3), x.clone()), Expr::mul(Expr::integer(2), x.clone()));
        let result = simplify(expr);
        assert!(result.structural_eq(&Expr::mul(Expr::integer(5), x)));
    }

    #[test]
    fn opposite_terms_cancel_to_zero() {
        let x = Expr::symbol("x");
        let expr = Expr::add(x.clone(), Expr::neg(x));
        assert_eq!(simplify(expr), Expr::integer(0));
    }

    #[test]
    fn multiplication_merges_repeated_base_into_power() {
        let x = Expr::symbol("x");
        let expr = Expr::mul(x.clone(), x);
        let result = simplify(expr);
        assert!(matches!(result, Expr::Binary { op: BinaryOp::Pow, .. }));
    }

    #[test]
    fn multiplicative_factors_are_sorted_for_canonical_form() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let a = simplify(Expr::mul(y.clone(), x.clone()));
        let b = simplify(Expr::mul(x, y));
        assert!(a.structural_eq(&b));
    }
}
