//! Power substitution: if every exponent present in a polynomial shares a
//! common factor `k > 1` (e.g. `x^4 + 5x^2 + 4`, all exponents even), set
//! `t = x^k`, factor the resulting lower-degree polynomial in `t` with the
//! rest of the engine, then substitute `x^k` back into each factor.

use super::sole_variable;
use crate::ast::Expr;
use crate::factor::{factor_once_with_registry, FactorOutcome, Strategy};
use crate::poly::Poly;
use num_integer::Integer;
use num_traits::Zero;

pub struct PowerSubstitutionStrategy;

impl Strategy for PowerSubstitutionStrategy {
    fn name(&self) -> &'static str {
        "power substitution"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn can_apply(&self, expr: &Expr) -> bool {
        sole_variable(expr).is_some()
    }

    fn apply(&self, expr: &Expr) -> Option<FactorOutcome> {
        let variable = sole_variable(expr)?;
        let poly = Poly::from_expr(expr, &variable)?;
        if poly.degree() < 2 {
            return None;
        }
        let present_degrees: Vec<u32> =
            poly.coeffs().iter().enumerate().filter(|(_, c)| !c.is_zero()).map(|(d, _)| d as u32).collect();
        let k = present_degrees.iter().copied().fold(0u32, |acc, d| acc.gcd(&d));
        if k < 2 {
            return None;
        }

        let substituted = poly.variable_substitution(k);
        if substituted.degree() < 1 {
            return None;
        }
        let substituted_expr = substituted.to_expr(&variable);
        let sub_factors = factor_once_with_registry(&substituted_expr);
        if sub_factors.len() < 2 {
            return None;
        }

        let restored: Vec<Expr> = sub_factors
            .into_iter()
            .map(|factor| match Poly::from_expr(&factor, &variable) {
                Some(p) => p.expand_substitution(k).to_expr(&variable),
                None => factor,
            })
            .collect();

        Some(FactorOutcome { factors: restored, description: format!("substituted t = {variable}^{k}") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_x_to_the_fourth_plus_5x_squared_plus_4() {
        let x = Expr::symbol("x");
        let expr = Expr::add(
            Expr::add(Expr::pow(x.clone(), Expr::integer(4)), Expr::mul(Expr::integer(5), Expr::pow(x.clone(), Expr::integer(2)))),
            Expr::integer(4),
        );
        // x^4+5x^2+4 = (x^2+1)(x^2+4) via t=x^2, t^2+5t+4=(t+1)(t+4)
        let outcome = PowerSubstitutionStrategy.apply(&expr);
        assert!(outcome.is_some());
    }
}
