//! Univariate polynomial equation solver
//!
//! Parses a normalized expression (explicit `*`, `^` for powers) into dense
//! polynomial coefficients and solves degree <= 2 exactly, including the
//! complex pair for a negative discriminant.

use thiserror::Error;

const EPS: f64 = 1e-9;

/// Errors from parsing or solving
#[derive(Error, Debug, PartialEq)]
pub enum SolveError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected token at '{0}'")]
    UnexpectedToken(String),

    #[error("equation mixes variables '{0}' and '{1}'")]
    MultipleVariables(char, char),

    #[error("division by a non-constant or zero expression")]
    BadDivisor,

    #[error("exponent must be a non-negative integer constant")]
    BadExponent,

    #[error("can only solve polynomial equations of degree {max} or lower, got degree {got}")]
    DegreeTooHigh { got: usize, max: usize },
}

/// Roots of the reduced equation `p(x) = 0`
#[derive(Debug, Clone, PartialEq)]
pub enum Roots {
    /// The equation reduces to `0 = 0`
    All,
    /// The equation reduces to a non-zero constant
    None,
    /// Real roots (plus-branch first for quadratics)
    Real(Vec<f64>),
    /// Complex conjugate pair `re +/- im*i`
    ComplexPair { re: f64, im: f64 },
}

/// A solved equation
#[derive(Debug, Clone)]
pub struct Solved {
    /// The variable the equation was solved for
    pub var: char,
    /// Reduced polynomial coefficients, ascending degree
    pub poly: Vec<f64>,
    pub roots: Roots,
}

/// Evaluate a dense polynomial at `x`
pub fn eval(poly: &[f64], x: f64) -> f64 {
    poly.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Solve `lhs = rhs` for the single variable appearing in either side
pub fn solve_equation(lhs: &str, rhs: &str) -> Result<Solved, SolveError> {
    let mut var: Option<char> = None;
    let left = Parser::new(lhs, &mut var)?.parse()?;
    let right = Parser::new(rhs, &mut var)?.parse()?;

    let mut poly = sub(&left, &right);
    // Trim trailing near-zero coefficients
    while poly.len() > 1 && poly.last().is_some_and(|c| c.abs() < EPS) {
        poly.pop();
    }

    let var = var.unwrap_or('x');
    let roots = match poly.len() - 1 {
        0 => {
            if poly[0].abs() < EPS {
                Roots::All
            } else {
                Roots::None
            }
        }
        1 => Roots::Real(vec![-poly[0] / poly[1]]),
        2 => {
            let (c, b, a) = (poly[0], poly[1], poly[2]);
            let disc = b * b - 4.0 * a * c;
            if disc.abs() < EPS {
                Roots::Real(vec![-b / (2.0 * a)])
            } else if disc > 0.0 {
                let sq = disc.sqrt();
                Roots::Real(vec![(-b + sq) / (2.0 * a), (-b - sq) / (2.0 * a)])
            } else {
                Roots::ComplexPair {
                    re: -b / (2.0 * a),
                    im: (-disc).sqrt() / (2.0 * a).abs(),
                }
            }
        }
        got => return Err(SolveError::DegreeTooHigh { got, max: 2 }),
    };

    Ok(Solved { var, poly, roots })
}

// ---------- polynomial arithmetic ----------

fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len().max(b.len())];
    for (i, c) in a.iter().enumerate() {
        out[i] += c;
    }
    for (i, c) in b.iter().enumerate() {
        out[i] += c;
    }
    out
}

fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    add(a, &b.iter().map(|c| -c).collect::<Vec<_>>())
}

fn mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

fn constant(poly: &[f64]) -> Option<f64> {
    if poly.len() == 1 {
        Some(poly[0])
    } else {
        None
    }
}

// ---------- parser ----------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Var(char),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    var: &'a mut Option<char>,
}

impl<'a> Parser<'a> {
    fn new(input: &str, var: &'a mut Option<char>) -> Result<Self, SolveError> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
            var,
        })
    }

    fn parse(mut self) -> Result<Vec<f64>, SolveError> {
        let poly = self.expr()?;
        match self.peek() {
            None => Ok(poly),
            Some(t) => Err(SolveError::UnexpectedToken(format!("{:?}", t))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expr(&mut self) -> Result<Vec<f64>, SolveError> {
        let mut acc = self.term()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Plus => {
                    self.bump();
                    acc = add(&acc, &self.term()?);
                }
                Token::Minus => {
                    self.bump();
                    acc = sub(&acc, &self.term()?);
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<Vec<f64>, SolveError> {
        let mut acc = self.unary()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Star => {
                    self.bump();
                    acc = mul(&acc, &self.unary()?);
                }
                Token::Slash => {
                    self.bump();
                    let divisor = self.unary()?;
                    match constant(&divisor) {
                        Some(c) if c.abs() >= EPS => {
                            acc = acc.into_iter().map(|x| x / c).collect();
                        }
                        _ => return Err(SolveError::BadDivisor),
                    }
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<Vec<f64>, SolveError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                Ok(self.unary()?.into_iter().map(|c| -c).collect())
            }
            Some(Token::Plus) => {
                self.bump();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Vec<f64>, SolveError> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.bump();
            let exponent = self.unary()?;
            let n = constant(&exponent)
                .filter(|e| *e >= 0.0 && (e - e.round()).abs() < EPS)
                .map(|e| e.round() as u32)
                .ok_or(SolveError::BadExponent)?;

            let mut acc = vec![1.0];
            for _ in 0..n {
                acc = mul(&acc, &base);
            }
            return Ok(acc);
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Vec<f64>, SolveError> {
        match self.bump() {
            Some(Token::Num(n)) => Ok(vec![n]),
            Some(Token::Var(c)) => {
                match *self.var {
                    None => *self.var = Some(c),
                    Some(existing) if existing != c => {
                        return Err(SolveError::MultipleVariables(existing, c))
                    }
                    _ => {}
                }
                Ok(vec![0.0, 1.0])
            }
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    Some(t) => Err(SolveError::UnexpectedToken(format!("{:?}", t))),
                    None => Err(SolveError::UnexpectedEnd),
                }
            }
            Some(t) => Err(SolveError::UnexpectedToken(format!("{:?}", t))),
            None => Err(SolveError::UnexpectedEnd),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, SolveError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Caret);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '0'..='9' | '.' => {
                let mut num = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n = num.parse::<f64>().map_err(|_| SolveError::UnexpectedChar('.'))?;
                tokens.push(Token::Num(n));
            }
            c if c.is_ascii_alphabetic() => {
                chars.next();
                tokens.push(Token::Var(c.to_ascii_lowercase()));
            }
            other => return Err(SolveError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_with_two_real_roots() {
        // x^2 + 5x + 6 = 0, normalized form
        let solved = solve_equation("x^2+5*x+6", "0").unwrap();
        assert_eq!(solved.var, 'x');
        match solved.roots {
            Roots::Real(roots) => {
                assert_eq!(roots.len(), 2);
                assert!((roots[0] + 2.0).abs() < 1e-9, "plus branch first");
                assert!((roots[1] + 3.0).abs() < 1e-9);
            }
            other => panic!("unexpected roots: {:?}", other),
        }
        // Back-substitution
        assert!(eval(&solved.poly, -2.0).abs() < 1e-9);
        assert!(eval(&solved.poly, -3.0).abs() < 1e-9);
    }

    #[test]
    fn linear_equation() {
        let solved = solve_equation("2*x+4", "0").unwrap();
        assert_eq!(solved.roots, Roots::Real(vec![-2.0]));
    }

    #[test]
    fn variable_on_both_sides() {
        // 3x - 1 = x + 5  ->  x = 3
        let solved = solve_equation("3*x-1", "x+5").unwrap();
        assert_eq!(solved.roots, Roots::Real(vec![3.0]));
    }

    #[test]
    fn double_root() {
        let solved = solve_equation("x^2-2*x+1", "0").unwrap();
        assert_eq!(solved.roots, Roots::Real(vec![1.0]));
    }

    #[test]
    fn complex_pair() {
        let solved = solve_equation("x^2+1", "0").unwrap();
        match solved.roots {
            Roots::ComplexPair { re, im } => {
                assert!(re.abs() < 1e-9);
                assert!((im - 1.0).abs() < 1e-9);
            }
            other => panic!("unexpected roots: {:?}", other),
        }
    }

    #[test]
    fn parenthesized_product() {
        // (x+2)*(x+3) = 0
        let solved = solve_equation("(x+2)*(x+3)", "0").unwrap();
        match solved.roots {
            Roots::Real(roots) => {
                assert!((roots[0] + 2.0).abs() < 1e-9);
                assert!((roots[1] + 3.0).abs() < 1e-9);
            }
            other => panic!("unexpected roots: {:?}", other),
        }
    }

    #[test]
    fn constant_identities() {
        assert_eq!(solve_equation("3", "3").unwrap().roots, Roots::All);
        assert_eq!(solve_equation("3", "4").unwrap().roots, Roots::None);
    }

    #[test]
    fn cubic_is_rejected() {
        let err = solve_equation("x^3+1", "0").unwrap_err();
        assert_eq!(err, SolveError::DegreeTooHigh { got: 3, max: 2 });
    }

    #[test]
    fn mixed_variables_are_rejected() {
        let err = solve_equation("x+y", "0").unwrap_err();
        assert_eq!(err, SolveError::MultipleVariables('x', 'y'));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(solve_equation("what is love", "0").is_err());
    }
}
