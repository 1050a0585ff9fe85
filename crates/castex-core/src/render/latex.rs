//! The LaTeX pretty-printer. Grounded on the teacher's depth-aware
//! `LaTeXFormatter` trait: rather than a single monolithic `match`, render
//! works outward from a precedence number attached to every subexpression
//! so that parentheses are inserted only where dropping them would change
//! meaning on re-parse (spec.md §8 invariant 1).

use crate::ast::{BinaryOp, Expr, UnaryOp};

const PREC_RELATIONAL: u8 = 1;
const PREC_ADDITIVE: u8 = 2;
const PREC_MULTIPLICATIVE: u8 = 3;
const PREC_UNARY: u8 = 4;
const PREC_POWER: u8 = 5;
const PREC_ATOM: u8 = 6;

const GREEK_OR_SYMBOL_NAMES: &[&str] = &[
    "pi", "alpha", "beta", "gamma", "delta", "theta", "lambda", "mu", "sigma", "omega", "phi",
    "infty", "infinity", "emptyset",
];

pub fn to_latex(expr: &Expr) -> String {
    render(expr).0
}

/// Renders `expr`, returning its LaTeX text alongside the precedence level
/// an enclosing operator should compare against to decide on parentheses.
fn render(expr: &Expr) -> (String, u8) {
    match expr {
        Expr::Number(n) => (render_number(n), PREC_ATOM),
        Expr::Identifier(id) => (render_identifier(&id.name), PREC_ATOM),
        Expr::Binary { op, left, right } => render_binary(*op, left, right),
        Expr::Unary { op, operand } => render_unary(*op, operand),
        Expr::Call { name, args, .. } => (render_call(name, args), PREC_ATOM),
        Expr::Fraction { numerator, denominator } => {
            (format!("\\frac{{{}}}{{{}}}", render(numerator).0, render(denominator).0), PREC_ATOM)
        }
        Expr::Integral { integrand, variable, lower, upper } => {
            let mut out = String::from("\\int");
            if let Some(lo) = lower {
                out.push_str(&format!("_{{{}}}", render(lo).0));
            }
            if let Some(hi) = upper {
                out.push_str(&format!("^{{{}}}", render(hi).0));
            }
            out.push(' ');
            out.push_str(&render(integrand).0);
            out.push_str(&format!(" \\, d{variable}"));
            (out, PREC_ATOM)
        }
        Expr::Sum { body, variable, lower, upper } => {
            (render_big_operator("sum", body, variable, lower, upper), PREC_ATOM)
        }
        Expr::Product { body, variable, lower, upper } => {
            (render_big_operator("prod", body, variable, lower, upper), PREC_ATOM)
        }
    }
}

fn render_big_operator(command: &str, body: &Expr, variable: &str, lower: &Expr, upper: &Expr) -> String {
    format!(
        "\\{command}_{{{variable}={}}}^{{{}}} {}",
        render(lower).0,
        render(upper).0,
        render(body).0
    )
}

fn render_number(n: &crate::number::Number) -> String {
    if n.is_integer() {
        return n.numer().to_string();
    }
    let negative = n.is_negative();
    let abs = n.abs();
    if negative {
        format!("-\\frac{{{}}}{{{}}}", abs.numer(), abs.denom())
    } else {
        format!("\\frac{{{}}}{{{}}}", abs.numer(), abs.denom())
    }
}

fn render_identifier(name: &str) -> String {
    if GREEK_OR_SYMBOL_NAMES.contains(&name) {
        format!("\\{name}")
    } else {
        name.to_string()
    }
}

fn render_call(name: &str, args: &[Expr]) -> String {
    match name {
        "sqrt" => format!("\\sqrt{{{}}}", render(&args[0]).0),
        "root" => format!("\\sqrt[{}]{{{}}}", render(&args[1]).0, render(&args[0]).0),
        "log" if args.len() == 2 => format!("\\log_{{{}}}({})", render(&args[1]).0, render(&args[0]).0),
        _ => {
            let rendered: Vec<String> = args.iter().map(|a| render(a).0).collect();
            format!("\\{name}({})", rendered.join(", "))
        }
    }
}

fn wrap(rendered: (String, u8), min_prec: u8) -> String {
    if rendered.1 < min_prec {
        format!("({})", rendered.0)
    } else {
        rendered.0
    }
}

fn render_binary(op: BinaryOp, left: &Expr, right: &Expr) -> (String, u8) {
    if op == BinaryOp::Pow {
        let base = wrap(render(left), PREC_ATOM);
        let exponent = render(right).0;
        return (format!("{base}^{{{exponent}}}"), PREC_POWER);
    }

    let own = precedence(op);
    let left_s = wrap(render(left), own);
    let right_min = if op.is_commutative() { own } else { own + 1 };
    let right_s = wrap(render(right), right_min);

    let text = match op {
        BinaryOp::Add => format!("{left_s} + {right_s}"),
        BinaryOp::Sub => format!("{left_s} - {right_s}"),
        BinaryOp::Mul => format!("{left_s}{}{right_s}", mul_separator(left, right)),
        BinaryOp::Div => format!("{left_s} / {right_s}"),
        BinaryOp::Eq => format!("{left_s} = {right_s}"),
        BinaryOp::Lt => format!("{left_s} < {right_s}"),
        BinaryOp::Gt => format!("{left_s} > {right_s}"),
        BinaryOp::Le => format!("{left_s} \\le {right_s}"),
        BinaryOp::Ge => format!("{left_s} \\ge {right_s}"),
        BinaryOp::Pow => unreachable!("handled above"),
    };
    (text, own)
}

/// `2x` juxtaposes a numeric coefficient against a following symbol, but
/// any other pairing uses `\cdot` to stay unambiguous on re-parse.
fn mul_separator(_left: &Expr, right: &Expr) -> &'static str {
    if matches!(right, Expr::Number(_)) {
        " \\cdot "
    } else {
        match _left {
            Expr::Number(_) => "",
            _ => " \\cdot ",
        }
    }
}

fn render_unary(op: UnaryOp, operand: &Expr) -> (String, u8) {
    let symbol = match op {
        UnaryOp::Plus => "+",
        UnaryOp::Neg => "-",
    };
    let operand_s = wrap(render(operand), PREC_UNARY);
    (format!("{symbol}{operand_s}"), PREC_UNARY)
}

fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Eq | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => PREC_RELATIONAL,
        BinaryOp::Add | BinaryOp::Sub => PREC_ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div => PREC_MULTIPLICATIVE,
        BinaryOp::Pow => PREC_POWER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse_tokens;

    fn roundtrip(source: &str) -> Expr {
        let parsed = parse_tokens(tokenize(source).unwrap()).unwrap();
        let rendered = to_latex(&parsed);
        parse_tokens(tokenize(&rendered).unwrap()).unwrap()
    }

    #[test]
    fn constant_pi_renders_with_backslash() {
        let expr = Expr::symbol("pi");
        assert_eq!(to_latex(&expr), "\\pi");
    }

    #[test]
    fn power_of_sum_is_parenthesized() {
        let expr = parse_tokens(tokenize("(x+1)^2").unwrap()).unwrap();
        assert_eq!(to_latex(&expr), "(x + 1)^{2}");
    }

    #[test]
    fn negative_power_base_round_trips() {
        let original = parse_tokens(tokenize("-x^2").unwrap()).unwrap();
        let rendered = to_latex(&original);
        let reparsed = parse_tokens(tokenize(&rendered).unwrap()).unwrap();
        assert!(original.structural_eq(&reparsed));
    }

    #[test]
    fn subtraction_nested_on_the_right_keeps_parens() {
        let original = Expr::sub(Expr::symbol("a"), Expr::sub(Expr::symbol("b"), Expr::symbol("c")));
        let rendered = to_latex(&original);
        let reparsed = parse_tokens(tokenize(&rendered).unwrap()).unwrap();
        assert!(original.structural_eq(&reparsed));
    }

    #[test]
    fn integral_round_trips() {
        let expr = roundtrip("\\int_{0}^{1} x^2 + 1 \\, dx");
        assert!(matches!(expr, Expr::Integral { .. }));
    }
}
