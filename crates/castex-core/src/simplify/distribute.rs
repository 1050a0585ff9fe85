//! Distribution / expansion (spec.md §4.7, the `expand` toggle): multiplies
//! products over sums and expands small non-negative integer powers of
//! sums by repeated multiplication.

use crate::ast::{BinaryOp, Expr};
use crate::steps::StepLog;

/// Caps how large an integer power of a sum this will expand by repeated
/// multiplication; degree grows combinatorially (binomial coefficients),
/// so this keeps `(x+1)^40` from blowing up the AST.
const MAX_EXPAND_POWER: u32 = 12;

pub fn distribute(expr: &Expr, log: &mut StepLog) -> Expr {
    let with_children = simplify_children(expr, log);
    let mut current = with_children;
    while let Some(next) = rewrite_once(&current) {
        log.push(format!("{} -> {}", crate::render::to_latex(&current), crate::render::to_latex(&next)));
        current = next;
    }
    current
}

fn simplify_children(expr: &Expr, log: &mut StepLog) -> Expr {
    match expr {
        Expr::Number(_) | Expr::Identifier(_) => expr.clone(),
        Expr::Binary { op, left, right } => Expr::binary(*op, distribute(left, log), distribute(right, log)),
        Expr::Unary { op, operand } => Expr::Unary { op: *op, operand: Box::new(distribute(operand, log)) },
        Expr::Call { name, args, expected_arity } => Expr::Call {
            name: name.clone(),
            args: args.iter().map(|a| distribute(a, log)).collect(),
            expected_arity: *expected_arity,
        },
        Expr::Fraction { numerator, denominator } => Expr::Fraction {
            numerator: Box::new(distribute(numerator, log)),
            denominator: Box::new(distribute(denominator, log)),
        },
        Expr::Integral { integrand, variable, lower, upper } => Expr::Integral {
            integrand: Box::new(distribute(integrand, log)),
            variable: variable.clone(),
            lower: lower.as_ref().map(|b| Box::new(distribute(b, log))),
            upper: upper.as_ref().map(|b| Box::new(distribute(b, log))),
        },
        Expr::Sum { body, variable, lower, upper } => Expr::Sum {
            body: Box::new(distribute(body, log)),
            variable: variable.clone(),
            lower: Box::new(distribute(lower, log)),
            upper: Box::new(distribute(upper, log)),
        },
        Expr::Product { body, variable, lower, upper } => Expr::Product {
            body: Box::new(distribute(body, log)),
            variable: variable.clone(),
            lower: Box::new(distribute(lower, log)),
            upper: Box::new(distribute(upper, log)),
        },
    }
}

fn rewrite_once(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Binary { op: BinaryOp::Mul, left, right } => distribute_mul(left, right),
        Expr::Binary { op: BinaryOp::Pow, left, right } => distribute_power(left, right),
        _ => None,
    }
}

/// `(a+b) * c -> a*c + b*c`, and symmetrically `c * (a+b)`.
fn distribute_mul(left: &Expr, right: &Expr) -> Option<Expr> {
    if let Expr::Binary { op: BinaryOp::Add, left: a, right: b } = left {
        return Some(Expr::add(Expr::mul((**a).clone(), right.clone()), Expr::mul((**b).clone(), right.clone())));
    }
    if let Expr::Binary { op: BinaryOp::Sub, left: a, right: b } = left {
        return Some(Expr::sub(Expr::mul((**a).clone(), right.clone()), Expr::mul((**b).clone(), right.clone())));
    }
    if let Expr::Binary { op: BinaryOp::Add, left: a, right: b } = right {
        return Some(Expr::add(Expr::mul(left.clone(), (**a).clone()), Expr::mul(left.clone(), (**b).clone())));
    }
    if let Expr::Binary { op: BinaryOp::Sub, left: a, right: b } = right {
        return Some(Expr::sub(Expr::mul(left.clone(), (**a).clone()), Expr::mul(left.clone(), (**b).clone())));
    }
    None
}

/// `(sum)^n -> sum * sum * ... * sum` (n times), for small non-negative
/// integer `n`. The product is built left-nested and left for a later
/// `distribute_mul` pass (plus the commutative combiner) to fully expand.
fn distribute_power(base: &Expr, exponent: &Expr) -> Option<Expr> {
    let is_additive = matches!(base, Expr::Binary { op: BinaryOp::Add, .. } | Expr::Binary { op: BinaryOp::Sub, .. });
    if !is_additive {
        return None;
    }
    let Expr::Number(n) = exponent else { return None };
    let degree = n.to_u32()?;
    if degree < 2 || degree > MAX_EXPAND_POWER {
        return None;
    }
    let mut product = base.clone();
    for _ in 1..degree {
        product = Expr::mul(product, base.clone());
    }
    Some(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify::simplify_to_fixed_point;

    #[test]
    fn distributes_product_of_sums() {
        let x = Expr::symbol("x");
        let expr = Expr::mul(
            Expr::add(x.clone(), Expr::integer(1)),
            Expr::add(x.clone(), Expr::integer(2)),
        );
        let (result, _) = simplify_to_fixed_point(&expr, true, false).unwrap();
        // x^2 + 3x + 2
        let expected = Expr::add(
            Expr::add(Expr::pow(x.clone(), Expr::integer(2)), Expr::mul(Expr::integer(3), x)),
            Expr::integer(2),
        );
        assert!(result.structural_eq(&expected));
    }

    #[test]
    fn expands_integer_power_of_binomial() {
        let x = Expr::symbol("x");
        let expr = Expr::pow(Expr::add(x.clone(), Expr::integer(1)), Expr::integer(2));
        let (result, _) = simplify_to_fixed_point(&expr, true, false).unwrap();
        let expected = Expr::add(
            Expr::add(Expr::pow(x.clone(), Expr::integer(2)), Expr::mul(Expr::integer(2), x)),
            Expr::integer(1),
        );
        assert!(result.structural_eq(&expected));
    }
}
