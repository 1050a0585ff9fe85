//! Castex: a LaTeX symbolic-mathematics engine (spec.md §1).
//!
//! `parse` turns a LaTeX string into a scoped [`ast::Expr`]; `analyze` runs
//! one of the tasks in [`AnalysisTask`] against that tree. Everything in
//! between — lexing, parsing, scope resolution, simplification, and
//! factorization — is pure: no I/O, no shared mutable state, one call one
//! answer. See DESIGN.md for how each module is grounded.

pub mod ast;
pub mod error;
pub mod factor;
mod lexer;
pub mod number;
mod parser;
pub mod poly;
pub mod render;
mod scope;
pub mod simplify;
pub mod steps;

use ast::Expr;
use error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use steps::Step;

/// Engine-wide iteration and degree caps (spec.md §5, §4.7, §4.9). Exposed
/// on `AnalyzeOptions` rather than as module-level constants so tests can
/// tighten them without touching global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineLimits {
    pub max_simplify_passes: u32,
    pub max_factor_iterations: usize,
    pub max_bz_degree: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_simplify_passes: simplify::DEFAULT_MAX_PASSES,
            max_factor_iterations: 10,
            max_bz_degree: 20,
        }
    }
}

/// The small set of algebraic tasks `analyze` dispatches on (spec.md §6).
/// Only the first three are implemented in this engine; the rest are named
/// here to satisfy the boundary contract and report `Algorithmic` "not
/// implemented" errors rather than being silently absent from the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisTask {
    Distribute,
    Factor,
    AnalyzePolynomial,
    Evaluate,
    Approx,
    Differentiate,
    Integrate,
    Solve,
    Min,
    Max,
    Functional,
}

impl AnalysisTask {
    fn is_in_core(self) -> bool {
        matches!(self, AnalysisTask::Distribute | AnalysisTask::Factor | AnalysisTask::AnalyzePolynomial)
    }

    fn label(self) -> &'static str {
        match self {
            AnalysisTask::Distribute => "distribute",
            AnalysisTask::Factor => "factor",
            AnalysisTask::AnalyzePolynomial => "analyze-polynomial",
            AnalysisTask::Evaluate => "evaluate",
            AnalysisTask::Approx => "approx",
            AnalysisTask::Differentiate => "differentiate",
            AnalysisTask::Integrate => "integrate",
            AnalysisTask::Solve => "solve",
            AnalysisTask::Min => "min",
            AnalysisTask::Max => "max",
            AnalysisTask::Functional => "functional",
        }
    }
}

/// A closed interval domain restriction, per spec.md §6's `{min, max,
/// inclusive}` / `[lo, hi]` option shape. Out-of-core tasks are the only
/// consumers today; kept here so the boundary contract is complete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub inclusive: bool,
}

/// Per-call options for [`analyze`] (spec.md §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    pub task: Option<AnalysisTask>,
    /// The variable to analyze/factor/differentiate with respect to. When
    /// `None`, inferred by [`infer_variable`].
    pub variable: Option<String>,
    pub domain: Option<Domain>,
    /// Free-variable name -> rational value bindings, as decimal strings to
    /// keep this type free of a `Number` parsing dependency at the option
    /// layer; out-of-core tasks are the only consumers today.
    pub values: std::collections::BTreeMap<String, String>,
    pub precision: Option<u32>,
    #[serde(default)]
    pub limits: EngineLimits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Exact,
    Approximate,
    Symbolic,
}

/// The result record `analyze` returns (spec.md §6): always populated
/// regardless of success, with `error` set and `ast`/`value` left `None` on
/// failure so a caller can inspect however many steps were recorded before
/// the failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub steps: Step,
    pub value: Option<String>,
    pub value_type: Option<ValueType>,
    pub precision: Option<u32>,
    pub ast: Option<Expr>,
    pub error: Option<String>,
}

impl std::fmt::Display for AnalyzeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.value, &self.error) {
            (Some(value), _) => write!(f, "{value}"),
            (None, Some(error)) => write!(f, "error: {error}"),
            (None, None) => write!(f, "(no result)"),
        }
    }
}

impl AnalyzeResult {
    fn failure(error: AnalysisError, steps: Step) -> Self {
        Self { steps, value: None, value_type: None, precision: None, ast: None, error: Some(error.to_string()) }
    }

    fn success(ast: Expr, value_type: ValueType, precision: Option<u32>, steps: Step) -> Self {
        let value = render::to_latex(&ast);
        Self { steps, value: Some(value), value_type: Some(value_type), precision, ast: Some(ast), error: None }
    }
}

/// Parses a LaTeX string into a scoped AST (spec.md §6 "Parse"). Strips a
/// single pair of `$...$` or `$$...$$` delimiters if present, since callers
/// may pass either a bare expression or a display-math fragment.
pub fn parse(source: &str) -> AnalysisResult<Expr> {
    let trimmed = strip_math_delimiters(source);
    let tokens = lexer::tokenize(trimmed)?;
    let raw = parser::parse_tokens(tokens)?;
    Ok(scope::resolve(raw))
}

fn strip_math_delimiters(source: &str) -> &str {
    let trimmed = source.trim();
    for delimiter in ["$$", "$"] {
        if let Some(inner) = trimmed.strip_prefix(delimiter).and_then(|s| s.strip_suffix(delimiter)) {
            return inner.trim();
        }
    }
    trimmed
}

/// Runs one [`AnalysisTask`] against `ast` (spec.md §6 "Analyze").
pub fn analyze(ast: &Expr, options: &AnalyzeOptions) -> AnalyzeResult {
    let Some(task) = options.task else {
        return AnalyzeResult::failure(AnalysisError::semantic_parse("no task specified", None), Step::Group(vec![]));
    };
    if !task.is_in_core() {
        return AnalyzeResult::failure(
            AnalysisError::algorithmic(format!("task '{}' is not implemented", task.label())),
            Step::Group(vec![]),
        );
    }
    match run_in_core_task(task, ast, options) {
        Ok(result) => result,
        Err(error) => AnalyzeResult::failure(error, Step::Group(vec![])),
    }
}

fn run_in_core_task(task: AnalysisTask, ast: &Expr, options: &AnalyzeOptions) -> AnalysisResult<AnalyzeResult> {
    match task {
        AnalysisTask::Distribute => {
            let (result, steps) = simplify::simplify_with_limit(ast, true, false, options.limits.max_simplify_passes)?;
            Ok(AnalyzeResult::success(result, ValueType::Exact, options.precision, steps))
        }
        AnalysisTask::Factor => {
            let (result, steps) = simplify::simplify_with_limit(ast, false, true, options.limits.max_simplify_passes)?;
            Ok(AnalyzeResult::success(result, ValueType::Exact, options.precision, steps))
        }
        AnalysisTask::AnalyzePolynomial => analyze_polynomial(ast, options),
        _ => unreachable!("out-of-core tasks are filtered out in `analyze`"),
    }
}

/// Classifies `ast`'s degree and leading coefficient with respect to a
/// variable (spec.md §6's `analyze-polynomial` task), reported as a
/// symbolic LaTeX description rather than a numeric value since there is no
/// single rational "value" for a polynomial classification.
fn analyze_polynomial(ast: &Expr, options: &AnalyzeOptions) -> AnalysisResult<AnalyzeResult> {
    let mut steps = steps::StepLog::new();
    let variable = resolve_variable(ast, options)?;
    let (simplified, simplify_steps) = simplify::simplify_to_fixed_point(ast, true, false)?;
    steps.push_group("simplify", vec![simplify_steps]);

    let Some(poly) = poly::Poly::from_expr(&simplified, &variable) else {
        return Err(AnalysisError::algorithmic(format!("expression is not a polynomial in '{variable}'")));
    };
    steps.push(format!("polynomial in {variable}: degree {}, leading coefficient {}", poly.degree(), poly.leading()));

    let description = format!(
        "\\text{{degree}} = {},\\ \\text{{leading coefficient}} = {}",
        poly.degree(),
        poly.leading()
    );
    Ok(AnalyzeResult {
        steps: steps.into_step(),
        value: Some(description),
        value_type: Some(ValueType::Symbolic),
        precision: options.precision,
        ast: Some(simplified),
        error: None,
    })
}

fn resolve_variable(ast: &Expr, options: &AnalyzeOptions) -> AnalysisResult<String> {
    if let Some(variable) = &options.variable {
        return Ok(variable.clone());
    }
    infer_variable(ast).ok_or_else(|| AnalysisError::scope("no free variable found to infer"))
}

/// Picks the variable an option-less task should operate on (spec.md §6):
/// `x > y > z > t > u > v > w`, falling back to the first free variable in
/// alphabetical order.
pub fn infer_variable(ast: &Expr) -> Option<String> {
    let free = free_variable_names(ast);
    const PRIORITY: &[&str] = &["x", "y", "z", "t", "u", "v", "w"];
    for candidate in PRIORITY {
        if free.contains(*candidate) {
            return Some((*candidate).to_string());
        }
    }
    free.into_iter().min()
}

fn free_variable_names(ast: &Expr) -> std::collections::BTreeSet<String> {
    let mut names = std::collections::BTreeSet::new();
    fn walk(expr: &Expr, names: &mut std::collections::BTreeSet<String>) {
        match expr {
            Expr::Number(_) => {}
            Expr::Identifier(id) => {
                if id.scope == ast::IdentifierScope::Free {
                    names.insert(id.name.clone());
                }
            }
            Expr::Binary { left, right, .. } => {
                walk(left, names);
                walk(right, names);
            }
            Expr::Unary { operand, .. } => walk(operand, names),
            Expr::Call { args, .. } => args.iter().for_each(|a| walk(a, names)),
            Expr::Fraction { numerator, denominator } => {
                walk(numerator, names);
                walk(denominator, names);
            }
            Expr::Integral { integrand, lower, upper, .. } => {
                walk(integrand, names);
                lower.as_deref().into_iter().for_each(|b| walk(b, names));
                upper.as_deref().into_iter().for_each(|b| walk(b, names));
            }
            Expr::Sum { body, lower, upper, .. } | Expr::Product { body, lower, upper, .. } => {
                walk(body, names);
                walk(lower, names);
                walk(upper, names);
            }
        }
    }
    walk(ast, &mut names);
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_a_simple_quadratic() {
        let ast = parse("x^2 + 3x + 2").unwrap();
        let result = analyze(&ast, &AnalyzeOptions { task: Some(AnalysisTask::Factor), ..Default::default() });
        assert!(result.error.is_none());
        let value = result.value.unwrap();
        assert!(value.contains("x + 1") || value.contains("1 + x"));
        assert!(value.contains("x + 2") || value.contains("2 + x"));
    }

    #[test]
    fn distributes_a_product_of_binomials() {
        let ast = parse("(x+1)(x+2)").unwrap();
        let result = analyze(&ast, &AnalyzeOptions { task: Some(AnalysisTask::Distribute), ..Default::default() });
        assert_eq!(result.value.unwrap(), "x^{2} + 3x + 2");
    }

    #[test]
    fn analyzes_polynomial_degree_and_leading_coefficient() {
        let ast = parse("2x^3 + x").unwrap();
        let result = analyze(&ast, &AnalyzeOptions { task: Some(AnalysisTask::AnalyzePolynomial), ..Default::default() });
        assert!(result.error.is_none());
        assert_eq!(result.value_type, Some(ValueType::Symbolic));
    }

    #[test]
    fn out_of_core_task_reports_not_implemented() {
        let ast = parse("x + 1").unwrap();
        let result = analyze(&ast, &AnalyzeOptions { task: Some(AnalysisTask::Integrate), ..Default::default() });
        assert!(result.error.unwrap().contains("not implemented"));
    }

    #[test]
    fn missing_task_is_a_semantic_error() {
        let ast = parse("x + 1").unwrap();
        let result = analyze(&ast, &AnalyzeOptions::default());
        assert!(result.error.is_some());
    }

    #[test]
    fn infers_x_over_other_free_variables() {
        let ast = parse("y + x + z").unwrap();
        assert_eq!(infer_variable(&ast), Some("x".to_string()));
    }

    #[test]
    fn infers_the_alphabetically_first_free_variable_when_no_priority_name_occurs() {
        let ast = parse("m + a").unwrap();
        assert_eq!(infer_variable(&ast), Some("a".to_string()));
    }

    #[test]
    fn reserved_function_name_without_call_parens_is_a_parse_error() {
        assert!(parse("\\sin + 1").is_err());
    }

    #[test]
    fn reserved_constant_as_a_bare_identifier_is_a_parse_error() {
        assert!(parse("e + 1").is_err());
    }

    #[test]
    fn strips_display_math_delimiters() {
        let a = parse("$$x + 1$$").unwrap();
        let b = parse("x + 1").unwrap();
        assert!(a.structural_eq(&b));
    }
}
