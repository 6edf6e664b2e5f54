//! Deterministic math specialist
//!
//! No model call: strip the "solve ..." phrasing, normalize the expression
//! text, and hand the equation to the polynomial solver. Output includes a
//! back-substitution check per real root.

pub mod solver;

use regex::Regex;
use solver::{eval, solve_equation, Roots};
use std::sync::OnceLock;

/// Leading phrases stripped before parsing, longest first
const SOLVE_PREFIXES: [&str; 5] = [
    "solve the quadratic equation",
    "solve quadratic equation",
    "solve the equation",
    "solve equation",
    "solve",
];

fn digit_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d)([a-zA-Z])").unwrap())
}

fn letter_digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-zA-Z])(\d)").unwrap())
}

fn letter_paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-zA-Z])\(").unwrap())
}

fn paren_operand_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\)([a-zA-Z0-9(])").unwrap())
}

/// Make implicit multiplication explicit and unify operators:
/// `5x` -> `5*x`, `x2` -> `x*2`, `x(` -> `x*(`, `)x` -> `)*x`,
/// Unicode minus -> ASCII minus, `**` -> `^`.
pub fn normalize_expression(expr: &str) -> String {
    let expr = expr.replace('\u{2212}', "-").replace("**", "^");
    let expr = digit_letter_re().replace_all(&expr, "${1}*${2}");
    let expr = letter_digit_re().replace_all(&expr, "${1}*${2}");
    let expr = letter_paren_re().replace_all(&expr, "${1}*(");
    let expr = paren_operand_re().replace_all(&expr, ")*${1}");
    expr.into_owned()
}

fn fmt_num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{:.4}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Answer a free-text math query. Never fails: parse problems produce a
/// graceful message naming the accepted input formats.
pub fn math_assistant(query: &str) -> String {
    let mut q = query.to_lowercase().trim().to_string();

    for prefix in SOLVE_PREFIXES {
        if let Some(rest) = q.strip_prefix(prefix) {
            q = rest.trim().to_string();
            break;
        }
    }

    let (lhs, rhs) = match q.split_once('=') {
        Some((l, r)) => (l.trim().to_string(), r.trim().to_string()),
        None => (q.clone(), "0".to_string()),
    };

    let lhs = normalize_expression(&lhs);
    let rhs = normalize_expression(&rhs);

    match solve_equation(&lhs, &rhs) {
        Ok(solved) => match solved.roots {
            Roots::All => format!(
                "Every value of {} satisfies the equation.",
                solved.var
            ),
            Roots::None => "No solutions found.".to_string(),
            Roots::Real(roots) => {
                let sol_str = roots
                    .iter()
                    .map(|r| fmt_num(*r))
                    .collect::<Vec<_>>()
                    .join(", ");
                let checks = roots
                    .iter()
                    .map(|r| {
                        let mut residual = eval(&solved.poly, *r);
                        if residual.abs() < 1e-6 {
                            residual = 0.0;
                        }
                        format!("Check at {}={}: {}", solved.var, fmt_num(*r), fmt_num(residual))
                    })
                    .collect::<Vec<_>>();
                format!(
                    "Solutions: {} = {}\n\nVerification:\n- {}",
                    solved.var,
                    sol_str,
                    checks.join("\n- ")
                )
            }
            Roots::ComplexPair { re, im } => format!(
                "Solutions: {var} = {re} + {im}*i, {var} = {re} - {im}*i",
                var = solved.var,
                re = fmt_num(re),
                im = fmt_num(im)
            ),
        },
        Err(e) => format!(
            "I can solve algebraic equations, but couldn't parse this one.\n\n\
             Error: {}\n\n\
             Try formats like:\n\
             - x^2 + 5x + 6 = 0\n\
             - x**2 + 5*x + 6 = 0",
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_cases() {
        assert_eq!(normalize_expression("5x"), "5*x");
        assert_eq!(normalize_expression("x2"), "x*2");
        assert_eq!(normalize_expression("2(x+1)"), "2*(x+1)");
        assert_eq!(normalize_expression("x(x+1)"), "x*(x+1)");
        assert_eq!(normalize_expression("(x+1)(x+2)"), "(x+1)*(x+2)");
        assert_eq!(normalize_expression("x**2 + 5*x"), "x^2 + 5*x");
        assert_eq!(normalize_expression("\u{2212}3x"), "-3*x");
    }

    #[test]
    fn solves_the_workshop_quadratic() {
        let answer = math_assistant("solve x^2 + 5x + 6 = 0");
        assert!(answer.starts_with("Solutions: x = -2, -3"), "{}", answer);
        assert!(answer.contains("Check at x=-2: 0"), "{}", answer);
        assert!(answer.contains("Check at x=-3: 0"), "{}", answer);
    }

    #[test]
    fn accepts_double_star_powers() {
        let answer = math_assistant("x**2 + 5*x + 6 = 0");
        assert!(answer.starts_with("Solutions: x = -2, -3"), "{}", answer);
    }

    #[test]
    fn solves_linear_without_equals_sign() {
        // Implicit "= 0"
        let answer = math_assistant("solve 2x + 4");
        assert!(answer.starts_with("Solutions: x = -2"), "{}", answer);
    }

    #[test]
    fn strips_longest_prefix_first() {
        let answer = math_assistant("solve the quadratic equation x^2 - 1 = 0");
        assert!(answer.starts_with("Solutions: x = 1, -1"), "{}", answer);
    }

    #[test]
    fn unparseable_input_names_accepted_formats() {
        let answer = math_assistant("what is the meaning of life?");
        assert!(answer.contains("couldn't parse"), "{}", answer);
        assert!(answer.contains("x^2 + 5x + 6 = 0"), "{}", answer);
        assert!(answer.contains("x**2 + 5*x + 6 = 0"), "{}", answer);
    }

    #[test]
    fn same_query_gives_same_answer() {
        let a = math_assistant("solve x^2 - 4 = 0");
        let b = math_assistant("solve x^2 - 4 = 0");
        assert_eq!(a, b);
    }
}
