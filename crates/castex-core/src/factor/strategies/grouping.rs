//! Factoring by grouping: split a sum of at least four terms into two
//! groups so each group shares a common factor, then check whether the two
//! group factors share a second common factor across the whole expression,
//! e.g. `x^3 + 3x^2 + 2x + 6 = x^2(x+3) + 2(x+3) = (x^2+2)(x+3)`. Every
//! 2-grouping of the term list is tried, not just adjacent pairs, so a
//! 6-term (or larger) sum with no single global common factor still gets a
//! chance at a grouped factorization.

use super::{collect_signed_terms, decompose_term, rebuild_signed_terms, rebuild_term};
use crate::ast::{BinaryOp, Expr};
use crate::factor::strategies::common::common_factor_of;
use crate::factor::{FactorOutcome, Strategy};

pub struct GroupingStrategy;

impl Strategy for GroupingStrategy {
    fn name(&self) -> &'static str {
        "grouping"
    }

    fn priority(&self) -> i32 {
        60
    }

    fn can_apply(&self, expr: &Expr) -> bool {
        matches!(expr, Expr::Binary { op: BinaryOp::Add | BinaryOp::Sub, .. })
    }

    fn apply(&self, expr: &Expr) -> Option<FactorOutcome> {
        let terms = collect_signed_terms(expr);
        let n = terms.len();
        if n < 4 || n > MAX_GROUPED_TERMS {
            return None;
        }
        // Enumerate every way to split the terms into two non-empty groups.
        // Term 0 always anchors the first group; bit (i-1) of `mask` decides
        // which group each remaining term joins, so every partition is
        // tried exactly once (never its mirrored group order).
        for mask in 0..(1usize << (n - 1)) {
            let group_a: Vec<_> = std::iter::once(0)
                .chain((1..n).filter(|&i| mask & (1 << (i - 1)) != 0))
                .map(|i| terms[i].clone())
                .collect();
            let group_b: Vec<_> = (1..n).filter(|&i| mask & (1 << (i - 1)) == 0).map(|i| terms[i].clone()).collect();
            if group_b.is_empty() {
                continue;
            }
            if let Some(result) = try_grouping(group_a, group_b) {
                return Some(result);
            }
        }
        None
    }
}

/// Caps the subset enumeration below: `2^(n-1)` partitions at this bound is
/// still a handful of thousand candidate groupings, not an exponential blowup.
const MAX_GROUPED_TERMS: usize = 12;

fn try_grouping(group_a: Vec<(Expr, i8)>, group_b: Vec<(Expr, i8)>) -> Option<FactorOutcome> {
    let (common_a, residual_a) = common_factor_of(&group_a)?;
    let (common_b, residual_b) = common_factor_of(&group_b)?;
    if !residual_a.structural_eq(&residual_b) {
        return None;
    }
    let combined = rebuild_signed_terms(vec![(common_a, 1), (common_b, 1)]);
    Some(FactorOutcome {
        factors: vec![residual_a, combined],
        description: "grouped terms sharing a common binomial factor".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_x_cubed_plus_3x_squared_plus_2x_plus_6() {
        let x = Expr::symbol("x");
        let expr = Expr::add(
            Expr::add(
                Expr::add(Expr::pow(x.clone(), Expr::integer(3)), Expr::mul(Expr::integer(3), Expr::pow(x.clone(), Expr::integer(2)))),
                Expr::mul(Expr::integer(2), x),
            ),
            Expr::integer(6),
        );
        let outcome = GroupingStrategy.apply(&expr).expect("(x^2+2)(x+3)");
        assert_eq!(outcome.factors.len(), 2);
    }

    #[test]
    fn groups_six_terms_whose_matching_pair_is_not_contiguous() {
        let x = Expr::symbol("x");
        // x^3 + 2x + x^2 + 4 + 2x^2 + 2, interleaved so the two groups that
        // actually share a common factor (x^3, x^2, 2x^2) and (2x, 4, 2)
        // are not split by any prefix/suffix cut, still sums to
        // x^3 + 3x^2 + 2x + 6 = (x^2+2)(x+3).
        let expr = Expr::add(
            Expr::add(
                Expr::add(
                    Expr::add(
                        Expr::add(Expr::pow(x.clone(), Expr::integer(3)), Expr::mul(Expr::integer(2), x.clone())),
                        Expr::pow(x.clone(), Expr::integer(2)),
                    ),
                    Expr::integer(4),
                ),
                Expr::mul(Expr::integer(2), Expr::pow(x.clone(), Expr::integer(2))),
            ),
            Expr::integer(2),
        );
        let outcome = GroupingStrategy.apply(&expr).expect("(x^2+2)(x+3) split across non-adjacent terms");
        assert_eq!(outcome.factors.len(), 2);
    }
}
