//! Basic simplifier (spec.md §4.4): identity rules, numeric folding, sign
//! normalization, fraction normalization. Pure and terminating: children
//! are simplified first, then the current node is rewritten to a local
//! fixed point before returning to the parent, so the well-founded
//! complexity measure in [`crate::ast::Complexity`] strictly decreases at
//! every step.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::number::Number;
use crate::steps::StepLog;

pub fn simplify_basic(expr: &Expr, log: &mut StepLog) -> Expr {
    let with_simplified_children = simplify_children(expr, log);
    let mut current = with_simplified_children;
    while let Some(next) = rewrite_once(&current) {
        log.push(format!("{} -> {}", crate::render::to_latex(&current), crate::render::to_latex(&next)));
        current = next;
    }
    current
}

fn simplify_children(expr: &Expr, log: &mut StepLog) -> Expr {
    match expr {
        Expr::Number(_) | Expr::Identifier(_) => expr.clone(),
        Expr::Binary { op, left, right } => {
            Expr::binary(*op, simplify_basic(left, log), simplify_basic(right, log))
        }
        Expr::Unary { op, operand } => Expr::Unary { op: *op, operand: Box::new(simplify_basic(operand, log)) },
        Expr::Call { name, args, expected_arity } => Expr::Call {
            name: name.clone(),
            args: args.iter().map(|a| simplify_basic(a, log)).collect(),
            expected_arity: *expected_arity,
        },
        Expr::Fraction { numerator, denominator } => Expr::Fraction {
            numerator: Box::new(simplify_basic(numerator, log)),
            denominator: Box::new(simplify_basic(denominator, log)),
        },
        Expr::Integral { integrand, variable, lower, upper } => Expr::Integral {
            integrand: Box::new(simplify_basic(integrand, log)),
            variable: variable.clone(),
            lower: lower.as_ref().map(|b| Box::new(simplify_basic(b, log))),
            upper: upper.as_ref().map(|b| Box::new(simplify_basic(b, log))),
        },
        Expr::Sum { body, variable, lower, upper } => Expr::Sum {
            body: Box::new(simplify_basic(body, log)),
            variable: variable.clone(),
            lower: Box::new(simplify_basic(lower, log)),
            upper: Box::new(simplify_basic(upper, log)),
        },
        Expr::Product { body, variable, lower, upper } => Expr::Product {
            body: Box::new(simplify_basic(body, log)),
            variable: variable.clone(),
            lower: Box::new(simplify_basic(lower, log)),
            upper: Box::new(simplify_basic(upper, log)),
        },
    }
}

/// Tries every basic-simplifier rule against the top node only (children
/// are assumed already simplified). Returns `None` at a fixed point.
fn rewrite_once(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Unary { op: UnaryOp::Plus, operand } => Some((**operand).clone()),
        Expr::Unary { op: UnaryOp::Neg, operand } => match operand.as_ref() {
            Expr::Unary { op: UnaryOp::Neg, operand: inner } => Some((**inner).clone()),
            Expr::Number(n) => Some(Expr::Number(n.neg())),
            _ => None,
        },
        Expr::Binary { op, left, right } => rewrite_binary(*op, left, right),
        Expr::Fraction { numerator, denominator } => rewrite_fraction(numerator, denominator),
        _ => None,
    }
}

fn rewrite_binary(op: BinaryOp, left: &Expr, right: &Expr) -> Option<Expr> {
    if let (Expr::Number(a), Expr::Number(b)) = (left, right) {
        if let Some(folded) = fold_numeric(op, a, b) {
            return Some(folded);
        }
    }

    match op {
        BinaryOp::Add => {
            if left.is_zero() {
                return Some(right.clone());
            }
            if right.is_zero() {
                return Some(left.clone());
            }
            if let Expr::Unary { op: UnaryOp::Neg, operand } = right {
                return Some(Expr::binary(BinaryOp::Sub, left.clone(), (**operand).clone()));
            }
        }
        BinaryOp::Sub => {
            if right.is_zero() {
                return Some(left.clone());
            }
            if left.is_zero() {
                return Some(Expr::neg(right.clone()));
            }
            if let Expr::Unary { op: UnaryOp::Neg, operand } = right {
                return Some(Expr::binary(BinaryOp::Add, left.clone(), (**operand).clone()));
            }
        }
        BinaryOp::Mul => {
            if left.is_zero() || right.is_zero() {
                return Some(Expr::integer(0));
            }
            if left.is_one() {
                return Some(right.clone());
            }
            if right.is_one() {
                return Some(left.clone());
            }
            match (left, right) {
                (Expr::Unary { op: UnaryOp::Neg, operand: l }, Expr::Unary { op: UnaryOp::Neg, operand: r }) => {
                    return Some(Expr::binary(BinaryOp::Mul, (**l).clone(), (**r).clone()));
                }
                (Expr::Unary { op: UnaryOp::Neg, operand: l }, _) => {
                    return Some(Expr::neg(Expr::binary(BinaryOp::Mul, (**l).clone(), right.clone())));
                }
                (_, Expr::Unary { op: UnaryOp::Neg, operand: r }) => {
                    return Some(Expr::neg(Expr::binary(BinaryOp::Mul, left.clone(), (**r).clone())));
                }
                _ => {}
            }
        }
        BinaryOp::Div => {
            if right.is_one() {
                return Some(left.clone());
            }
            if left.is_zero() && !right.is_zero() {
                return Some(Expr::integer(0));
            }
        }
        BinaryOp::Pow => {
            if let Expr::Number(e) = right {
                if e.is_zero() {
                    return Some(Expr::integer(1));
                }
                if e.is_one() {
                    return Some(left.clone());
                }
            }
        }
        _ => {}
    }
    None
}

fn rewrite_fraction(numerator: &Expr, denominator: &Expr) -> Option<Expr> {
    if let (Expr::Number(a), Expr::Number(b)) = (numerator, denominator) {
        if let Some(folded) = a.checked_div(b) {
            return Some(Expr::Number(folded));
        }
    }
    if denominator.is_one() {
        return Some(numerator.clone());
    }
    if numerator.is_zero() && !denominator.is_zero() {
        return Some(Expr::integer(0));
    }

    let nested_numerator = if let Expr::Fraction { numerator: n1, denominator: d1 } = numerator {
        Some((n1.as_ref().clone(), d1.as_ref().clone()))
    } else {
        None
    };
    let nested_denominator = if let Expr::Fraction { numerator: n2, denominator: d2 } = denominator {
        Some((n2.as_ref().clone(), d2.as_ref().clone()))
    } else {
        None
    };
    match (nested_numerator, nested_denominator) {
        (Some((n1, d1)), Some((n2, d2))) => Some(Expr::Fraction {
            numerator: Box::new(Expr::mul(n1, d2)),
            denominator: Box::new(Expr::mul(d1, n2)),
        }),
        (Some((n1, d1)), None) => Some(Expr::Fraction {
            numerator: Box::new(n1),
            denominator: Box::new(Expr::mul(d1, denominator.clone())),
        }),
        (None, Some((n2, d2))) => Some(Expr::Fraction {
            numerator: Box::new(Expr::mul(numerator.clone(), d2)),
            denominator: Box::new(n2),
        }),
        (None, None) => None,
    }
}

fn fold_numeric(op: BinaryOp, a: &Number, b: &Number) -> Option<Expr> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => a.checked_div(b)?,
        BinaryOp::Pow => {
            let exponent = b.to_u32()?;
            a.pow_int(exponent)
        }
        _ => return None,
    };
    Some(Expr::Number(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepLog;

    fn simplify(expr: Expr) -> Expr {
        let mut log = StepLog::new();
        simplify_basic(&expr, &mut log)
    }

    #[test]
    fn folds_numeric_addition() {
        let expr = Expr::add(Expr::integer(2), Expr::integer(3));
        assert_eq!(simplify(expr), Expr::integer(5));
    }

    #[test]
    fn identity_rules_remove_zero_and_one() {
        let x = Expr::symbol("x");
        assert_eq!(simplify(Expr::add(x.clone(), Expr::integer(0))), x);
        assert_eq!(simplify(Expr::mul(x.clone(), Expr::integer(1))), x);
        assert_eq!(simplify(Expr::mul(x.clone(), Expr::integer(0))), Expr::integer(0));
    }

    #[test]
    fn double_negation_cancels() {
        let x = Expr::symbol("x");
        assert_eq!(simplify(Expr::neg(Expr::neg(x.clone()))), x);
    }

    #[test]
    fn negative_times_negative_is_positive() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let expr = Expr::mul(Expr::neg(x.clone()), Expr::neg(y.clone()));
        assert_eq!(simplify(expr), Expr::mul(x, y));
    }

    #[test]
    fn fraction_of_two_numbers_folds_to_a_number() {
        let expr = Expr::Fraction { numerator: Box::new(Expr::integer(6)), denominator: Box::new(Expr::integer(4)) };
        assert_eq!(simplify(expr), Expr::Number(Number::new(3.into(), 2.into())));
    }

    #[test]
    fn nested_fraction_cross_multiplies() {
        let inner_num = Expr::Fraction { numerator: Box::new(Expr::symbol("a")), denominator: Box::new(Expr::symbol("b")) };
        let inner_den = Expr::Fraction { numerator: Box::new(Expr::symbol("c")), denominator: Box::new(Expr::symbol("d")) };
        let expr = Expr::Fraction { numerator: Box::new(inner_num), denominator: Box::new(inner_den) };
        let simplified = simplify(expr);
        // (a/b)/(c/d) -> (a*d)/(b*c)
        assert!(matches!(simplified, Expr::Fraction { .. }));
    }

    #[test]
    fn power_of_zero_is_one() {
        let x = Expr::symbol("x");
        assert_eq!(simplify(Expr::pow(x, Expr::integer(0))), Expr::integer(1));
    }
}
