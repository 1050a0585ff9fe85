//! Property-based tests for the universal invariants in spec.md §8: these
//! hold for every input, not just the handful of worked examples the unit
//! tests cover, so they're checked with `proptest`-generated inputs rather
//! than hand-picked ones.

use castex_core::ast::{BinaryOp, Expr};
use castex_core::number::Number;
use castex_core::render::to_latex;
use castex_core::{analyze, parse, AnalysisTask, AnalyzeOptions};
use proptest::prelude::*;

/// Generates a small polynomial in `x` with integer coefficients, as a
/// sum/difference of monomials, which is what every invariant below needs:
/// something that parses, simplifies, and (mostly) factors cleanly.
fn polynomial_in_x() -> impl Strategy<Value = Expr> {
    prop::collection::vec((-9i64..=9, 0u32..=4), 1..=5).prop_map(|terms| {
        let monomials: Vec<Expr> = terms
            .into_iter()
            .filter(|(coeff, _)| *coeff != 0)
            .map(|(coeff, degree)| {
                let x_to_degree = match degree {
                    0 => Expr::integer(1),
                    1 => Expr::symbol("x"),
                    d => Expr::pow(Expr::symbol("x"), Expr::integer(d as i64)),
                };
                Expr::mul(Expr::integer(coeff), x_to_degree)
            })
            .collect();
        if monomials.is_empty() {
            Expr::integer(0)
        } else {
            Expr::fold(BinaryOp::Add, monomials)
        }
    })
}

fn distribute_result(ast: &Expr) -> Expr {
    analyze(ast, &AnalyzeOptions { task: Some(AnalysisTask::Distribute), ..Default::default() })
        .ast
        .expect("distribute never fails on a well-formed polynomial")
}

fn factor_result(ast: &Expr) -> Expr {
    analyze(ast, &AnalyzeOptions { task: Some(AnalysisTask::Factor), ..Default::default() })
        .ast
        .expect("factor never fails on a well-formed polynomial")
}

proptest! {
    /// Testable property 1: parse-then-render round-trips to a structurally
    /// equal AST, modulo commutative reordering (which `structural_eq`
    /// already treats as equal).
    #[test]
    fn parse_then_render_round_trips(poly in polynomial_in_x()) {
        let latex = to_latex(&poly);
        let reparsed = parse(&latex).expect("rendered LaTeX re-parses");
        let resimplified = distribute_result(&reparsed);
        let original_simplified = distribute_result(&poly);
        prop_assert!(resimplified.structural_eq(&original_simplified));
    }

    /// Testable property 2: simplification is idempotent.
    #[test]
    fn distribute_is_idempotent(poly in polynomial_in_x()) {
        let once = distribute_result(&poly);
        let twice = distribute_result(&once);
        prop_assert!(once.structural_eq(&twice));
    }

    /// Testable property 3 & 4: factoring a polynomial and distributing the
    /// result gives back the distributed original (the factors really do
    /// multiply out to the input).
    #[test]
    fn factor_then_distribute_matches_distributed_input(poly in polynomial_in_x()) {
        let factored = factor_result(&poly);
        let redistributed = distribute_result(&factored);
        let original_distributed = distribute_result(&poly);
        prop_assert!(redistributed.structural_eq(&original_distributed));
    }
}

#[test]
fn zero_polynomial_factors_and_distributes_to_zero() {
    let zero = Expr::integer(0);
    assert_eq!(factor_result(&zero), Expr::integer(0));
    assert_eq!(distribute_result(&zero), Expr::integer(0));
}

#[test]
fn constant_input_is_unchanged_by_factor_and_distribute() {
    let constant = Expr::Number(Number::integer(7));
    assert_eq!(factor_result(&constant), Expr::integer(7));
    assert_eq!(distribute_result(&constant), Expr::integer(7));
}
