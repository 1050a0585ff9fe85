//! Perfect powers: `(r x + s)^n -> a degree-n polynomial whose coefficients
//! are the binomial expansion of that single binomial raised to n`. Detected
//! by reading candidate `r` off the leading coefficient and `s` off the
//! constant term as exact n-th roots, then checking every coefficient in
//! between against its binomial-coefficient ratio — a direct generalization
//! of the degree-2 perfect-square-trinomial case to any degree.

use super::sole_variable;
use crate::ast::Expr;
use crate::factor::{FactorOutcome, Strategy};
use crate::number::Number;
use crate::poly::Poly;
use num_bigint::BigInt;
use num_integer::Roots;
use num_traits::{One, Signed, Zero};

pub struct PerfectPowerStrategy;

impl Strategy for PerfectPowerStrategy {
    fn name(&self) -> &'static str {
        "perfect power"
    }

    fn priority(&self) -> i32 {
        85
    }

    fn can_apply(&self, expr: &Expr) -> bool {
        sole_variable(expr).is_some()
    }

    fn apply(&self, expr: &Expr) -> Option<FactorOutcome> {
        let variable = sole_variable(expr)?;
        let poly = Poly::from_expr(expr, &variable)?;
        let n = poly.degree();
        if n < 2 {
            return None;
        }
        let coeffs = poly.coeffs();
        let (r, s) = find_binomial_base(coeffs, n)?;

        let r_term = Expr::Number(Number::from_bigint(r)).mul_var(&variable);
        let binomial = if s.is_zero() { r_term } else { Expr::add(r_term, Expr::Number(Number::from_bigint(s))) };

        Some(FactorOutcome {
            factors: std::iter::repeat(binomial).take(n).collect(),
            description: format!("perfect {} power", ordinal(n)),
        })
    }
}

/// Finds `r, s` such that `coeffs[k] == C(n,k) * r^k * s^(n-k)` for every `k`,
/// i.e. that `coeffs` is exactly the binomial expansion of `(r x + s)^n`.
fn find_binomial_base(coeffs: &[BigInt], n: usize) -> Option<(BigInt, BigInt)> {
    let c_n = coeffs[n].clone();
    let c_0 = coeffs[0].clone();
    let r_candidates = nth_root_candidates(&c_n, n as u32)?;
    let s_candidates = nth_root_candidates(&c_0, n as u32)?;

    for r in &r_candidates {
        for s in &s_candidates {
            if matches_binomial_expansion(coeffs, n, r, s) {
                return Some((r.clone(), s.clone()));
            }
        }
    }
    None
}

fn matches_binomial_expansion(coeffs: &[BigInt], n: usize, r: &BigInt, s: &BigInt) -> bool {
    for (k, coeff) in coeffs.iter().enumerate() {
        let expected =
            binomial(n, k) * num_traits::Pow::pow(r.clone(), k as u32) * num_traits::Pow::pow(s.clone(), (n - k) as u32);
        if *coeff != expected {
            return false;
        }
    }
    true
}

/// The exact n-th roots of `value` that could appear as a real coefficient:
/// the unique signed root when `n` is odd, or both signs of the magnitude
/// when `n` is even (since `(-r)^n == r^n` for even `n`).
fn nth_root_candidates(value: &BigInt, n: u32) -> Option<Vec<BigInt>> {
    if n % 2 == 0 {
        if value.is_negative() {
            return None;
        }
        let root = nth_root_exact(value, n)?;
        if root.is_zero() {
            Some(vec![root])
        } else {
            Some(vec![root.clone(), -root])
        }
    } else {
        nth_root_exact(value, n).map(|root| vec![root])
    }
}

fn nth_root_exact(value: &BigInt, n: u32) -> Option<BigInt> {
    let magnitude = value.abs();
    let root = if n == 2 { magnitude.sqrt() } else { magnitude.nth_root(n) };
    if num_traits::Pow::pow(root.clone(), n) != magnitude {
        return None;
    }
    Some(if value.is_negative() { -root } else { root })
}

fn ordinal(n: usize) -> String {
    match n % 10 {
        1 if n % 100 != 11 => format!("{n}st"),
        2 if n % 100 != 12 => format!("{n}nd"),
        3 if n % 100 != 13 => format!("{n}rd"),
        _ => format!("{n}th"),
    }
}

fn binomial(n: usize, k: usize) -> BigInt {
    let k = k.min(n - k);
    let mut result = BigInt::one();
    for i in 0..k {
        result = result * BigInt::from(n - i) / BigInt::from(i + 1);
    }
    result
}

trait MulVar {
    fn mul_var(self, variable: &str) -> Expr;
}

impl MulVar for Expr {
    fn mul_var(self, variable: &str) -> Expr {
        match &self {
            Expr::Number(n) if n.is_one() => Expr::symbol(variable),
            _ => Expr::mul(self, Expr::symbol(variable)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_x_squared_plus_6x_plus_9() {
        let x = Expr::symbol("x");
        let expr = Expr::add(
            Expr::add(Expr::pow(x.clone(), Expr::integer(2)), Expr::mul(Expr::integer(6), x)),
            Expr::integer(9),
        );
        let outcome = PerfectPowerStrategy.apply(&expr).expect("x^2+6x+9 is (x+3)^2");
        assert_eq!(outcome.factors.len(), 2);
        assert!(outcome.factors[0].structural_eq(&outcome.factors[1]));
    }

    #[test]
    fn rejects_a_non_perfect_square_trinomial() {
        let x = Expr::symbol("x");
        let expr = Expr::add(Expr::add(Expr::pow(x.clone(), Expr::integer(2)), Expr::mul(Expr::integer(5), x)), Expr::integer(9));
        assert!(PerfectPowerStrategy.apply(&expr).is_none());
    }

    #[test]
    fn factors_x_cubed_plus_3x_squared_plus_3x_plus_1_as_x_plus_1_cubed() {
        let x = Expr::symbol("x");
        // x^3 + 3x^2 + 3x + 1 = (x+1)^3
        let expr = Expr::add(
            Expr::add(
                Expr::add(Expr::pow(x.clone(), Expr::integer(3)), Expr::mul(Expr::integer(3), Expr::pow(x.clone(), Expr::integer(2)))),
                Expr::mul(Expr::integer(3), x.clone()),
            ),
            Expr::integer(1),
        );
        let outcome = PerfectPowerStrategy.apply(&expr).expect("x^3+3x^2+3x+1 is (x+1)^3");
        assert_eq!(outcome.factors.len(), 3);
        assert!(outcome.factors.iter().all(|f| f.structural_eq(&outcome.factors[0])));
    }

    #[test]
    fn rejects_a_cubic_that_is_not_a_perfect_cube() {
        let x = Expr::symbol("x");
        let expr = Expr::add(
            Expr::add(Expr::pow(x.clone(), Expr::integer(3)), Expr::mul(Expr::integer(3), Expr::pow(x.clone(), Expr::integer(2)))),
            Expr::integer(1),
        );
        assert!(PerfectPowerStrategy.apply(&expr).is_none());
    }
}
