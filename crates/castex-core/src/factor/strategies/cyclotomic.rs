//! Sum/difference of like powers: `x^n - a^n = (x - a)(x^{n-1} + ... +
//! a^{n-1})`, and for odd `n`, `x^n + a^n = (x + a)(x^{n-1} - ... +
//! a^{n-1})`. Named for the cyclotomic-style telescoping pattern, though
//! this only handles the classic two-term monic binomial, not general
//! cyclotomic polynomials.

use super::sole_variable;
use crate::ast::Expr;
use crate::factor::{FactorOutcome, Strategy};
use crate::poly::Poly;
use num_bigint::BigInt;
use num_integer::Roots;
use num_traits::{Signed, Zero};

pub struct CyclotomicStrategy;

impl Strategy for CyclotomicStrategy {
    fn name(&self) -> &'static str {
        "sum/difference of like powers"
    }

    fn priority(&self) -> i32 {
        75
    }

    fn can_apply(&self, expr: &Expr) -> bool {
        sole_variable(expr).is_some()
    }

    fn apply(&self, expr: &Expr) -> Option<FactorOutcome> {
        let variable = sole_variable(expr)?;
        let poly = Poly::from_expr(expr, &variable)?;
        let degree = poly.degree();
        if degree < 2 {
            return None;
        }
        let coeffs = poly.coeffs();
        if coeffs[1..degree].iter().any(|c| !c.is_zero()) {
            return None; // must be a pure binomial a*x^n + c
        }
        let leading = coeffs[degree].clone();
        let constant = coeffs[0].clone();
        if constant.is_zero() || leading != BigInt::from(1) {
            // A non-unit leading coefficient is left to Berlekamp-Zassenhaus.
            return None;
        }

        let is_sum = constant.is_positive();
        if is_sum && degree % 2 == 0 {
            return None; // x^n + a^n has no real linear factor when n is even
        }
        let magnitude = nth_root_exact(&constant.abs(), degree as u32)?;
        let a = if is_sum { magnitude } else { -magnitude };

        // x^n - a^n = (x - a) * sum_{k=0}^{n-1} x^k a^{n-1-k}
        let mut cofactor_coeffs = vec![BigInt::zero(); degree];
        let mut power = BigInt::from(1);
        for k in 0..degree {
            cofactor_coeffs[degree - 1 - k] = power.clone();
            power *= &a;
        }
        let linear = Poly::new(vec![-a, BigInt::from(1)]);
        let cofactor = Poly::new(cofactor_coeffs);
        poly.exact_div(&linear)?;

        Some(FactorOutcome {
            factors: vec![linear.to_expr(&variable), cofactor.to_expr(&variable)],
            description: format!("x^{degree} {} a^{degree} pattern", if is_sum { "+" } else { "-" }),
        })
    }
}

fn nth_root_exact(value: &BigInt, n: u32) -> Option<BigInt> {
    let root = value.nth_root(n);
    if num_traits::Pow::pow(root.clone(), n) == *value {
        Some(root)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_x_cubed_minus_eight() {
        let x = Expr::symbol("x");
        let expr = Expr::sub(Expr::pow(x, Expr::integer(3)), Expr::integer(8));
        let outcome = CyclotomicStrategy.apply(&expr).expect("x^3-8=(x-2)(x^2+2x+4)");
        assert_eq!(outcome.factors.len(), 2);
    }

    #[test]
    fn factors_x_cubed_plus_one() {
        let x = Expr::symbol("x");
        let expr = Expr::add(Expr::pow(x, Expr::integer(3)), Expr::integer(1));
        let outcome = CyclotomicStrategy.apply(&expr).expect("x^3+1=(x+1)(x^2-x+1)");
        assert_eq!(outcome.factors.len(), 2);
    }
}
