//! The unified simplification driver (spec.md §4.7): runs the basic,
//! exponential, and commutative passes every round; `expand` additionally
//! runs distribution, `factor` additionally runs the factorization engine.
//! Repeats until the pretty-printed LaTeX form stops changing or a maximum
//! number of passes is hit, accumulating one grouped step per round.

pub mod basic;
pub mod commutative;
pub mod distribute;
pub mod exponential;

use crate::ast::Expr;
use crate::error::AnalysisError;
use crate::steps::{Step, StepLog};

/// Default cap on simplification rounds (spec.md §4.7).
pub const DEFAULT_MAX_PASSES: u32 = 15;

pub fn simplify_to_fixed_point(expr: &Expr, expand: bool, factor: bool) -> Result<(Expr, Step), AnalysisError> {
    simplify_with_limit(expr, expand, factor, DEFAULT_MAX_PASSES)
}

pub fn simplify_with_limit(
    expr: &Expr,
    expand: bool,
    factor: bool,
    max_passes: u32,
) -> Result<(Expr, Step), AnalysisError> {
    let mut current = expr.clone();
    let mut previous_latex = crate::render::to_latex(&current);
    let mut log = StepLog::new();

    for pass in 0..max_passes {
        let mut pass_log = StepLog::new();

        current = basic::simplify_basic(&current, &mut pass_log);
        current = exponential::simplify_exponential(&current, &mut pass_log)?;
        current = commutative::simplify_commutative(&current, &mut pass_log);

        if expand {
            current = distribute::distribute(&current, &mut pass_log);
            current = basic::simplify_basic(&current, &mut pass_log);
            current = commutative::simplify_commutative(&current, &mut pass_log);
        }

        if factor {
            current = crate::factor::factor_expr(&current, &mut pass_log)?;
        }

        log.push_group(format!("pass {}", pass + 1), pass_log.into_steps());

        let latex = crate::render::to_latex(&current);
        if latex == previous_latex {
            break;
        }
        previous_latex = latex;
    }

    Ok((current, log.into_step()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn reaches_a_fixed_point_without_expand_or_factor() {
        let x = Expr::symbol("x");
        let expr = Expr::add(Expr::mul(Expr::integer(2), x.clone()), Expr::mul(Expr::integer(3), x));
        let (result, _) = simplify_to_fixed_point(&expr, false, false).unwrap();
        assert!(result.structural_eq(&Expr::mul(Expr::integer(5), Expr::symbol("x"))));
    }

    #[test]
    fn a_single_pass_suffices_for_simple_input() {
        let expr = Expr::add(Expr::integer(2), Expr::integer(3));
        let (result, step) = simplify_to_fixed_point(&expr, false, false).unwrap();
        assert_eq!(result, Expr::integer(5));
        assert!(!step.is_empty());
    }
}
