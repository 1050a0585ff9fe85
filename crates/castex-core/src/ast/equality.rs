//! Structural equality "modulo canonical reordering of commutative
//! operands" (spec.md §8, invariant 1). Two identifiers compare equal when
//! their names and scopes match, regardless of the unique id the scope
//! resolver assigned them — ids are only stable within a single resolved
//! tree, never across independently parsed ones.

use super::Expr;

pub fn structural_eq(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::Number(x), Expr::Number(y)) => x == y,
        (Expr::Identifier(x), Expr::Identifier(y)) => x.name == y.name && x.scope == y.scope,
        (
            Expr::Binary { op: op_a, left: l_a, right: r_a },
            Expr::Binary { op: op_b, left: l_b, right: r_b },
        ) => {
            if op_a != op_b {
                return false;
            }
            if op_a.is_commutative() {
                multiset_eq(&a.flatten(*op_a), &b.flatten(*op_b))
            } else {
                structural_eq(l_a, l_b) && structural_eq(r_a, r_b)
            }
        }
        (Expr::Unary { op: op_a, operand: x }, Expr::Unary { op: op_b, operand: y }) => {
            op_a == op_b && structural_eq(x, y)
        }
        (
            Expr::Call { name: n_a, args: a_a, .. },
            Expr::Call { name: n_b, args: a_b, .. },
        ) => n_a == n_b && a_a.len() == a_b.len() && a_a.iter().zip(a_b).all(|(x, y)| structural_eq(x, y)),
        (
            Expr::Fraction { numerator: n_a, denominator: d_a },
            Expr::Fraction { numerator: n_b, denominator: d_b },
        ) => structural_eq(n_a, n_b) && structural_eq(d_a, d_b),
        (
            Expr::Integral { integrand: i_a, variable: v_a, lower: lo_a, upper: up_a },
            Expr::Integral { integrand: i_b, variable: v_b, lower: lo_b, upper: up_b },
        ) => {
            v_a == v_b
                && structural_eq(i_a, i_b)
                && option_eq(lo_a, lo_b)
                && option_eq(up_a, up_b)
        }
        (
            Expr::Sum { body: b_a, variable: v_a, lower: lo_a, upper: up_a },
            Expr::Sum { body: b_b, variable: v_b, lower: lo_b, upper: up_b },
        )
        | (
            Expr::Product { body: b_a, variable: v_a, lower: lo_a, upper: up_a },
            Expr::Product { body: b_b, variable: v_b, lower: lo_b, upper: up_b },
        ) => v_a == v_b && structural_eq(b_a, b_b) && structural_eq(lo_a, lo_b) && structural_eq(up_a, up_b),
        _ => false,
    }
}

fn option_eq(a: &Option<Box<Expr>>, b: &Option<Box<Expr>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => structural_eq(x, y),
        _ => false,
    }
}

/// Equality of two flattened commutative-operand lists, ignoring order.
/// Quadratic, but operand lists in practice stay small (term counts in the
/// tens, not thousands).
fn multiset_eq(a: &[&Expr], b: &[&Expr]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'outer: for x in a {
        for (i, y) in b.iter().enumerate() {
            if !used[i] && structural_eq(x, y) {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    #[test]
    fn commutative_reordering_is_equal() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let left = Expr::binary(BinaryOp::Add, x.clone(), y.clone());
        let right = Expr::binary(BinaryOp::Add, y, x);
        assert!(structural_eq(&left, &right));
    }

    #[test]
    fn non_commutative_order_matters() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let left = Expr::binary(BinaryOp::Sub, x.clone(), y.clone());
        let right = Expr::binary(BinaryOp::Sub, y, x);
        assert!(!structural_eq(&left, &right));
    }

    #[test]
    fn identifiers_with_different_ids_are_equal() {
        use crate::ast::{Identifier, IdentifierScope};
        let a = Expr::Identifier(Identifier {
            name: "x".into(),
            scope: IdentifierScope::Free,
            unique_id: "x#1".into(),
            depth: 0,
            context: crate::ast::BindingContext::None,
        });
        let b = Expr::Identifier(Identifier {
            name: "x".into(),
            scope: IdentifierScope::Free,
            unique_id: "x#2".into(),
            depth: 0,
            context: crate::ast::BindingContext::None,
        });
        assert!(structural_eq(&a, &b));
    }
}
