//! Difference of squares: `a^2 - b^2 -> (a - b)(a + b)`.

use crate::ast::{BinaryOp, Expr};
use crate::factor::{FactorOutcome, Strategy};
use crate::number::Number;

pub struct DifferenceOfSquaresStrategy;

impl Strategy for DifferenceOfSquaresStrategy {
    fn name(&self) -> &'static str {
        "difference of squares"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn can_apply(&self, expr: &Expr) -> bool {
        matches!(expr, Expr::Binary { op: BinaryOp::Sub, .. })
    }

    fn apply(&self, expr: &Expr) -> Option<FactorOutcome> {
        let Expr::Binary { op: BinaryOp::Sub, left, right } = expr else { return None };
        let a = square_root_of(left)?;
        let b = square_root_of(right)?;
        Some(FactorOutcome {
            factors: vec![Expr::sub(a.clone(), b.clone()), Expr::add(a, b)],
            description: "a^2 - b^2 = (a - b)(a + b)".to_string(),
        })
    }
}

/// Returns `sqrt(expr)` when `expr` is exactly a perfect square: a perfect
/// square integer literal, or `base^2` for an arbitrary base.
fn square_root_of(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Number(n) => {
            let value = n.as_bigint()?;
            integer_sqrt(value).map(|root| Expr::Number(Number::from_bigint(root)))
        }
        Expr::Binary { op: BinaryOp::Pow, left, right } => {
            if let Expr::Number(n) = right.as_ref() {
                if n.to_u32() == Some(2) {
                    return Some(left.as_ref().clone());
                }
            }
            None
        }
        _ => None,
    }
}

fn integer_sqrt(value: &num_bigint::BigInt) -> Option<num_bigint::BigInt> {
    use num_integer::Roots;
    use num_traits::Signed;
    if value.is_negative() {
        return None;
    }
    let root = value.sqrt();
    if &root * &root == *value {
        Some(root)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_x_squared_minus_nine() {
        let x = Expr::symbol("x");
        let expr = Expr::sub(Expr::pow(x, Expr::integer(2)), Expr::integer(9));
        let outcome = DifferenceOfSquaresStrategy.apply(&expr).unwrap();
        assert_eq!(outcome.factors.len(), 2);
    }

    #[test]
    fn rejects_a_non_square_subtrahend() {
        let x = Expr::symbol("x");
        let expr = Expr::sub(Expr::pow(x, Expr::integer(2)), Expr::integer(7));
        assert!(DifferenceOfSquaresStrategy.apply(&expr).is_none());
    }
}
