//! Scope resolution (spec.md §4.3).
//!
//! A post-parse walk that turns the parser's unresolved identifiers into
//! free or bound ones, assigning each a stable `unique_id`. Bound ids are
//! derived from the binder's depth so that two binders with the same name
//! at different depths (legal shadowing) never collide; free ids are
//! derived from the name plus a collision counter, since the same free
//! variable referenced twice should still share one id (spec.md §8
//! invariant 5: "every bound identifier's unique id identifies exactly one
//! enclosing binder" — free identifiers sharing an id across occurrences is
//! not itself an invariant, but is the natural reading of "the same free
//! variable").

use crate::ast::{BindingContext, Expr, Identifier, IdentifierScope};
use std::collections::HashMap;

struct Frame {
    name: String,
    context: BindingContext,
    depth: u32,
    unique_id: String,
}

struct Resolver {
    frames: Vec<Frame>,
    free_ids: HashMap<String, String>,
    next_binder_id: u32,
}

pub fn resolve(expr: Expr) -> Expr {
    let mut resolver = Resolver { frames: Vec::new(), free_ids: HashMap::new(), next_binder_id: 0 };
    resolver.walk(expr)
}

impl Resolver {
    fn walk(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::Number(_) => expr,
            Expr::Identifier(id) => Expr::Identifier(self.resolve_identifier(id)),
            Expr::Binary { op, left, right } => {
                Expr::Binary { op, left: Box::new(self.walk(*left)), right: Box::new(self.walk(*right)) }
            }
            Expr::Unary { op, operand } => Expr::Unary { op, operand: Box::new(self.walk(*operand)) },
            Expr::Call { name, args, expected_arity } => {
                Expr::Call { name, args: args.into_iter().map(|a| self.walk(a)).collect(), expected_arity }
            }
            Expr::Fraction { numerator, denominator } => Expr::Fraction {
                numerator: Box::new(self.walk(*numerator)),
                denominator: Box::new(self.walk(*denominator)),
            },
            Expr::Integral { integrand, variable, lower, upper } => {
                let lower = lower.map(|b| Box::new(self.walk(*b)));
                let upper = upper.map(|b| Box::new(self.walk(*b)));
                self.push_frame(&variable, BindingContext::Integral);
                let integrand = Box::new(self.walk(*integrand));
                self.pop_frame();
                Expr::Integral { integrand, variable, lower, upper }
            }
            Expr::Sum { body, variable, lower, upper } => {
                let lower = Box::new(self.walk(*lower));
                let upper = Box::new(self.walk(*upper));
                self.push_frame(&variable, BindingContext::Sum);
                let body = Box::new(self.walk(*body));
                self.pop_frame();
                Expr::Sum { body, variable, lower, upper }
            }
            Expr::Product { body, variable, lower, upper } => {
                let lower = Box::new(self.walk(*lower));
                let upper = Box::new(self.walk(*upper));
                self.push_frame(&variable, BindingContext::Product);
                let body = Box::new(self.walk(*body));
                self.pop_frame();
                Expr::Product { body, variable, lower, upper }
            }
        }
    }

    fn push_frame(&mut self, name: &str, context: BindingContext) {
        self.next_binder_id += 1;
        let depth = self.frames.len() as u32 + 1;
        let unique_id = format!("{name}#binder{}", self.next_binder_id);
        self.frames.push(Frame { name: name.to_string(), context, depth, unique_id });
    }

    fn pop_frame(&mut self) {
        self.frames.pop();
    }

    fn resolve_identifier(&mut self, id: Identifier) -> Identifier {
        if let Some(frame) = self.frames.iter().rev().find(|f| f.name == id.name) {
            Identifier {
                name: id.name,
                scope: IdentifierScope::Bound,
                unique_id: frame.unique_id.clone(),
                depth: frame.depth,
                context: frame.context,
            }
        } else {
            let unique_id = self
                .free_ids
                .entry(id.name.clone())
                .or_insert_with(|| format!("{}#free", id.name))
                .clone();
            Identifier {
                name: id.name,
                scope: IdentifierScope::Free,
                unique_id,
                depth: 0,
                context: BindingContext::None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse_tokens;

    fn resolve_source(source: &str) -> Expr {
        resolve(parse_tokens(tokenize(source).unwrap()).unwrap())
    }

    #[test]
    fn free_variable_occurrences_share_an_id() {
        let expr = resolve_source("x + x");
        if let Expr::Binary { left, right, .. } = expr {
            let (Expr::Identifier(l), Expr::Identifier(r)) = (*left, *right) else { panic!() };
            assert_eq!(l.scope, IdentifierScope::Free);
            assert_eq!(l.unique_id, r.unique_id);
        } else {
            panic!("expected binary");
        }
    }

    #[test]
    fn sum_bound_variable_is_marked_bound() {
        let expr = resolve_source("\\sum_{i=1}^{n} i");
        if let Expr::Sum { body, .. } = expr {
            let Expr::Identifier(i) = *body else { panic!() };
            assert_eq!(i.scope, IdentifierScope::Bound);
            assert_eq!(i.context, BindingContext::Sum);
        } else {
            panic!("expected sum");
        }
    }

    #[test]
    fn shadowed_binders_at_different_depths_get_distinct_ids() {
        // \sum_{i=1}^{n} \sum_{i=1}^{m} i  -- inner `i` binds to the inner frame.
        let expr = resolve_source("\\sum_{i=1}^{n} \\sum_{i=1}^{m} i");
        if let Expr::Sum { body: outer_body, .. } = expr {
            if let Expr::Sum { body: inner_body, .. } = *outer_body {
                let Expr::Identifier(i) = *inner_body else { panic!() };
                assert_eq!(i.depth, 2);
            } else {
                panic!("expected inner sum");
            }
        } else {
            panic!("expected outer sum");
        }
    }
}
