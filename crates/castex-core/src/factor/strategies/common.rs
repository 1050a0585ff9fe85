//! Greatest-common-factor extraction: `2x^2 + 4x -> 2x(x + 2)`. Always
//! tried first since every other strategy works better on the reduced
//! remainder.

use super::{collect_signed_terms, decompose_term, rebuild_signed_terms, rebuild_term};
use crate::ast::{BinaryOp, Expr};
use crate::factor::{FactorOutcome, Strategy};
use crate::number::Number;

pub struct CommonFactorStrategy;

impl Strategy for CommonFactorStrategy {
    fn name(&self) -> &'static str {
        "common factor"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn can_apply(&self, expr: &Expr) -> bool {
        matches!(expr, Expr::Binary { op: BinaryOp::Add | BinaryOp::Sub, .. })
    }

    fn apply(&self, expr: &Expr) -> Option<FactorOutcome> {
        let terms = collect_signed_terms(expr);
        if terms.len() < 2 {
            return None;
        }
        let (common_factor, residual) = common_factor_of(&terms)?;
        Some(FactorOutcome {
            factors: vec![common_factor, residual],
            description: "extracted the greatest common factor".to_string(),
        })
    }
}

/// Finds the greatest common factor (numeric coefficient and shared
/// variable bases) across a signed-term list, returning
/// `(common_factor, residual_sum)` with `common_factor * residual_sum ==
/// sum(terms)`. Returns `None` if the only common factor is `1`. Shared by
/// [`CommonFactorStrategy`] and the grouping strategy, which needs to
/// compare the residuals of two separately-factored term pairs.
pub(crate) fn common_factor_of(terms: &[(Expr, i8)]) -> Option<(Expr, Expr)> {
    let decomposed: Vec<(Number, Vec<(Expr, u32)>, i8)> =
        terms.iter().map(|(term, sign)| { let (c, b) = decompose_term(term); (c, b, *sign) }).collect();

    let mut coefficient_gcd: Option<Number> = None;
    for (coeff, _, _) in &decomposed {
        coefficient_gcd = Some(match coefficient_gcd {
            None => coeff.abs(),
            Some(acc) => acc.gcd(coeff)?,
        });
    }
    let coefficient_gcd = coefficient_gcd?;

    // Common variable bases: present (with some positive exponent) in
    // every term, at the minimum exponent seen.
    let mut common_bases: Option<Vec<(Expr, u32)>> = None;
    for (_, bases, _) in &decomposed {
        common_bases = Some(match common_bases {
            None => bases.clone(),
            Some(acc) => intersect_bases(&acc, bases),
        });
    }
    let common_bases = common_bases.unwrap_or_default();

    if coefficient_gcd.is_one() && common_bases.is_empty() {
        return None;
    }

    let mut residual_terms = Vec::with_capacity(decomposed.len());
    for (coeff, bases, sign) in decomposed {
        let reduced_coeff = (&coeff / &coefficient_gcd)?;
        let reduced_bases = subtract_bases(bases, &common_bases);
        residual_terms.push((rebuild_term(reduced_coeff, reduced_bases), sign));
    }
    let residual = rebuild_signed_terms(residual_terms);
    let common_factor = rebuild_term(coefficient_gcd, common_bases);
    Some((common_factor, residual))
}

fn intersect_bases(a: &[(Expr, u32)], b: &[(Expr, u32)]) -> Vec<(Expr, u32)> {
    let mut out = Vec::new();
    for (base, exp_a) in a {
        if let Some((_, exp_b)) = b.iter().find(|(other, _)| other.structural_eq(base)) {
            out.push((base.clone(), (*exp_a).min(*exp_b)));
        }
    }
    out
}

fn subtract_bases(bases: Vec<(Expr, u32)>, common: &[(Expr, u32)]) -> Vec<(Expr, u32)> {
    bases
        .into_iter()
        .map(|(base, exponent)| {
            let taken = common.iter().find(|(other, _)| other.structural_eq(&base)).map(|(_, e)| *e).unwrap_or(0);
            (base, exponent - taken)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_a_numeric_and_variable_common_factor() {
        let x = Expr::symbol("x");
        let expr =
            Expr::add(Expr::mul(Expr::integer(2), Expr::pow(x.clone(), Expr::integer(2))), Expr::mul(Expr::integer(4), x));
        let strategy = CommonFactorStrategy;
        let outcome = strategy.apply(&expr).expect("common factor should be found");
        assert_eq!(outcome.factors.len(), 2);
    }

    #[test]
    fn does_nothing_when_there_is_no_common_factor() {
        let x = Expr::symbol("x");
        let expr = Expr::add(x, Expr::integer(1));
        let strategy = CommonFactorStrategy;
        assert!(strategy.apply(&expr).is_none());
    }
}
