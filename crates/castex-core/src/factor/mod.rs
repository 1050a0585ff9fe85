//! Polynomial factorization engine (spec.md §4.8–§4.10): a priority-ordered
//! registry of strategies, applied to an additive expression and, on a
//! match, recursively re-applied to each resulting factor until nothing
//! further splits or a default 10-iteration-per-call budget is spent.

pub mod strategies;

use crate::ast::{BinaryOp, Expr};
use crate::error::AnalysisError;
use crate::steps::StepLog;

/// A successful split: the original node becomes the product of `factors`.
pub struct FactorOutcome {
    pub factors: Vec<Expr>,
    pub description: String,
}

/// One factoring pattern. `can_apply` is a cheap shape check the engine
/// uses to skip strategies that plainly don't fit before paying for the
/// real (possibly expensive, e.g. Berlekamp–Zassenhaus) `apply` attempt.
pub trait Strategy {
    fn name(&self) -> &'static str;
    fn priority(&self) -> i32;
    fn can_apply(&self, expr: &Expr) -> bool;
    fn apply(&self, expr: &Expr) -> Option<FactorOutcome>;
}

const DEFAULT_MAX_ITERATIONS: usize = 10;

fn registry() -> Vec<Box<dyn Strategy>> {
    let mut list: Vec<Box<dyn Strategy>> = vec![
        Box::new(strategies::common::CommonFactorStrategy),
        Box::new(strategies::diff_squares::DifferenceOfSquaresStrategy),
        Box::new(strategies::perfect_power::PerfectPowerStrategy),
        Box::new(strategies::quadratic::QuadraticStrategy),
        Box::new(strategies::cyclotomic::CyclotomicStrategy),
        Box::new(strategies::grouping::GroupingStrategy),
        Box::new(strategies::power_substitution::PowerSubstitutionStrategy),
        Box::new(strategies::berlekamp_zassenhaus::BerlekampZassenhausStrategy),
        Box::new(strategies::lll_fallback::LllFallbackStrategy),
    ];
    list.sort_by_key(|s| std::cmp::Reverse(s.priority()));
    list
}

/// Recursively factors every additive subexpression of `expr`. Non-additive
/// nodes (and their children) are factored children-first, bottom-up, the
/// same traversal shape as the other simplification passes.
pub fn factor_expr(expr: &Expr, log: &mut StepLog) -> Result<Expr, AnalysisError> {
    let with_children = factor_children(expr, log)?;
    Ok(factor_node(&with_children, log))
}

fn factor_children(expr: &Expr, log: &mut StepLog) -> Result<Expr, AnalysisError> {
    Ok(match expr {
        Expr::Number(_) | Expr::Identifier(_) => expr.clone(),
        Expr::Binary { op, left, right } => {
            Expr::binary(*op, factor_expr(left, log)?, factor_expr(right, log)?)
        }
        Expr::Unary { op, operand } => Expr::Unary { op: *op, operand: Box::new(factor_expr(operand, log)?) },
        Expr::Call { name, args, expected_arity } => {
            let mut factored_args = Vec::with_capacity(args.len());
            for a in args {
                factored_args.push(factor_expr(a, log)?);
            }
            Expr::Call { name: name.clone(), args: factored_args, expected_arity: *expected_arity }
        }
        Expr::Fraction { numerator, denominator } => Expr::Fraction {
            numerator: Box::new(factor_expr(numerator, log)?),
            denominator: Box::new(factor_expr(denominator, log)?),
        },
        Expr::Integral { integrand, variable, lower, upper } => Expr::Integral {
            integrand: Box::new(factor_expr(integrand, log)?),
            variable: variable.clone(),
            lower: lower.as_ref().map(|b| factor_expr(b, log)).transpose()?.map(Box::new),
            upper: upper.as_ref().map(|b| factor_expr(b, log)).transpose()?.map(Box::new),
        },
        Expr::Sum { body, variable, lower, upper } => Expr::Sum {
            body: Box::new(factor_expr(body, log)?),
            variable: variable.clone(),
            lower: Box::new(factor_expr(lower, log)?),
            upper: Box::new(factor_expr(upper, log)?),
        },
        Expr::Product { body, variable, lower, upper } => Expr::Product {
            body: Box::new(factor_expr(body, log)?),
            variable: variable.clone(),
            lower: Box::new(factor_expr(lower, log)?),
            upper: Box::new(factor_expr(upper, log)?),
        },
    })
}

fn factor_node(expr: &Expr, log: &mut StepLog) -> Expr {
    if !matches!(expr, Expr::Binary { op: BinaryOp::Add, .. } | Expr::Binary { op: BinaryOp::Sub, .. }) {
        return expr.clone();
    }
    let mut finished = factor_fully(expr, Some(log));
    if finished.len() <= 1 {
        return finished.pop().unwrap_or_else(|| expr.clone());
    }
    finished.sort_by_key(|e| e.complexity());
    Expr::fold(BinaryOp::Mul, finished)
}

/// Runs the full priority-ordered registry against `expr` to exhaustion
/// (bounded by [`DEFAULT_MAX_ITERATIONS`]), returning the resulting list of
/// factors (a single-element list if nothing applied). `log`, when given,
/// receives one line per successful strategy application.
fn factor_fully(expr: &Expr, mut log: Option<&mut StepLog>) -> Vec<Expr> {
    let strategies = registry();
    let mut pending = vec![expr.clone()];
    let mut finished: Vec<Expr> = Vec::new();
    let mut iterations = 0usize;

    while let Some(current) = pending.pop() {
        iterations += 1;
        if iterations > DEFAULT_MAX_ITERATIONS {
            finished.push(current);
            continue;
        }
        let mut applied = false;
        for strategy in &strategies {
            if !strategy.can_apply(&current) {
                continue;
            }
            if let Some(outcome) = strategy.apply(&current) {
                if outcome.factors.len() < 2 {
                    continue;
                }
                if let Some(log) = log.as_mut() {
                    log.push(format!(
                        "{} ({}): {} -> {}",
                        strategy.name(),
                        outcome.description,
                        crate::render::to_latex(&current),
                        outcome.factors.iter().map(crate::render::to_latex).collect::<Vec<_>>().join(" \\cdot "),
                    ));
                }
                pending.extend(outcome.factors);
                applied = true;
                break;
            }
        }
        if !applied {
            finished.push(current);
        }
    }
    finished
}

/// A single pass over the registry (no recursive re-splitting of the
/// results), used by strategies like power substitution that want to
/// factor a transformed sub-problem without looping the whole engine on
/// intermediate results that still need back-substitution.
pub(crate) fn factor_once_with_registry(expr: &Expr) -> Vec<Expr> {
    factor_fully(expr, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn factors_a_common_numeric_and_variable_factor() {
        let x = Expr::symbol("x");
        // 2x^2 + 4x -> 2x(x+2)
        let expr =
            Expr::add(Expr::mul(Expr::integer(2), Expr::pow(x.clone(), Expr::integer(2))), Expr::mul(Expr::integer(4), x));
        let mut log = StepLog::new();
        let result = factor_expr(&expr, &mut log).unwrap();
        assert!(matches!(result, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn leaves_an_irreducible_sum_unfactored() {
        let x = Expr::symbol("x");
        let expr = Expr::add(x, Expr::integer(1));
        let mut log = StepLog::new();
        let result = factor_expr(&expr, &mut log).unwrap();
        assert!(result.structural_eq(&Expr::add(Expr::symbol("x"), Expr::integer(1))));
    }
}
