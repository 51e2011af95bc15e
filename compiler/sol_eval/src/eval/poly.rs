//! Polynomials in the free variable.
//!
//! A tree is polynomial when it is built from constant expressions and
//! the free variable with `+`, `-`, `*`, division by a constant, negation
//! and non-negative integer powers. Coefficients are constant
//! expressions, kept exact where folding allows.

use sol_ir::{BinaryOp, Thing, UnaryFn};

use super::simplify::{fold_binary, fold_unary, simplify_safe};
use crate::stack::ensure_sufficient_stack;

/// Degrees beyond this are not expanded.
pub const MAX_EXPANDED_DEGREE: usize = 10_000;

fn zero() -> Thing {
    Thing::integer(0)
}

fn is_zero(t: &Thing) -> bool {
    t.as_constant().is_some_and(|c| c.is_zero())
}

fn is_one(t: &Thing) -> bool {
    t.as_constant().is_some_and(|c| *c == 1)
}

fn trim(mut coeffs: Vec<Thing>) -> Vec<Thing> {
    while coeffs.len() > 1 && coeffs.last().is_some_and(is_zero) {
        coeffs.pop();
    }
    if coeffs.is_empty() {
        coeffs.push(zero());
    }
    coeffs
}

fn combine(a: &[Thing], b: &[Thing], op: BinaryOp) -> Vec<Thing> {
    (0..a.len().max(b.len()))
        .map(|i| match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => fold_binary(op, x.clone(), y.clone()),
            (Some(x), None) => x.clone(),
            (None, Some(y)) if op == BinaryOp::Sub => fold_unary(UnaryFn::Neg, y.clone()),
            (None, Some(y)) => y.clone(),
            (None, None) => zero(),
        })
        .collect()
}

fn multiply(a: &[Thing], b: &[Thing]) -> Option<Vec<Thing>> {
    let degree = (a.len() - 1) + (b.len() - 1);
    if degree > MAX_EXPANDED_DEGREE {
        return None;
    }
    let mut out = vec![zero(); degree + 1];
    for (i, x) in a.iter().enumerate().filter(|(_, x)| !is_zero(x)) {
        for (j, y) in b.iter().enumerate().filter(|(_, y)| !is_zero(y)) {
            let product = fold_binary(BinaryOp::Mul, x.clone(), y.clone());
            let slot = &mut out[i + j];
            *slot = fold_binary(BinaryOp::Add, std::mem::replace(slot, zero()), product);
        }
    }
    Some(out)
}

fn integer_exponent(t: &Thing) -> Option<usize> {
    let n = simplify_safe(t).as_integer()?;
    usize::try_from(n).ok()
}

/// Coefficients `c0, c1, ...` of a polynomial tree, or `None` if it is not one.
pub fn coefficients(tree: &Thing) -> Option<Vec<Thing>> {
    ensure_sufficient_stack(|| {
        if tree.is_constant_expression() {
            return Some(vec![tree.clone()]);
        }
        let coeffs = match tree {
            Thing::FreeVariable => vec![zero(), Thing::integer(1)],
            Thing::Binary { op, lhs, rhs } => match op {
                BinaryOp::Add | BinaryOp::Sub => {
                    combine(&coefficients(lhs)?, &coefficients(rhs)?, *op)
                }
                BinaryOp::Mul => multiply(&coefficients(lhs)?, &coefficients(rhs)?)?,
                BinaryOp::Div if rhs.is_constant_expression() && !is_zero(rhs) => coefficients(lhs)?
                    .into_iter()
                    .map(|c| fold_binary(BinaryOp::Div, c, (**rhs).clone()))
                    .collect(),
                BinaryOp::Pow => {
                    let n = integer_exponent(rhs)?;
                    let base = trim(coefficients(lhs)?);
                    if (base.len() - 1).saturating_mul(n) > MAX_EXPANDED_DEGREE {
                        return None;
                    }
                    let mut acc = vec![Thing::integer(1)];
                    for _ in 0..n {
                        acc = multiply(&acc, &base)?;
                    }
                    acc
                }
                BinaryOp::Div => return None,
            },
            Thing::Unary {
                func: UnaryFn::Neg,
                arg,
            } => coefficients(arg)?
                .into_iter()
                .map(|c| fold_unary(UnaryFn::Neg, c))
                .collect(),
            _ => return None,
        };
        Some(trim(coeffs))
    })
}

pub fn is_polynomial(tree: &Thing) -> bool {
    coefficients(tree).is_some()
}

pub fn degree(tree: &Thing) -> Option<usize> {
    coefficients(tree).map(|c| c.len() - 1)
}

/// Coefficient of `x^n`; zero beyond the degree.
pub fn coeff(tree: &Thing, n: usize) -> Option<Thing> {
    Some(coefficients(tree)?.get(n).cloned().unwrap_or_else(zero))
}

fn power(n: usize) -> Thing {
    match n {
        1 => Thing::FreeVariable,
        _ => Thing::binary(BinaryOp::Pow, Thing::FreeVariable, Thing::integer(i64::try_from(n).unwrap_or(i64::MAX))),
    }
}

fn monomial(c: Thing, n: usize) -> Thing {
    if n == 0 {
        c
    } else if is_one(&c) {
        power(n)
    } else {
        Thing::binary(BinaryOp::Mul, c, power(n))
    }
}

/// `c0 + c1 * x + c2 * x^2 + ...`, skipping zero terms.
pub fn canonical(coeffs: &[Thing]) -> Thing {
    let mut acc: Option<Thing> = None;
    for (i, c) in coeffs.iter().enumerate().filter(|(_, c)| !is_zero(c)) {
        let (negative, magnitude) = match c.as_constant() {
            Some(v) if acc.is_some() && v.is_sign_negative() => (true, Thing::Constant(-v.clone())),
            _ => (false, c.clone()),
        };
        let term = monomial(magnitude, i);
        acc = Some(match acc {
            None => term,
            Some(a) if negative => Thing::binary(BinaryOp::Sub, a, term),
            Some(a) => Thing::binary(BinaryOp::Add, a, term),
        });
    }
    acc.unwrap_or_else(zero)
}

/// `c0 + x * (c1 + x * (c2 + ...))`, with runs of zero coefficients
/// turned into powers.
pub fn horner(coeffs: &[Thing]) -> Thing {
    let Some((top, rest)) = coeffs.split_last() else {
        return zero();
    };
    let mut acc = top.clone();
    let mut pending = 0usize;
    for c in rest.iter().rev() {
        pending += 1;
        if is_zero(c) {
            continue;
        }
        let scaled = if is_one(&acc) {
            power(pending)
        } else {
            Thing::binary(BinaryOp::Mul, power(pending), acc)
        };
        acc = Thing::binary(BinaryOp::Add, c.clone(), scaled);
        pending = 0;
    }
    if pending > 0 {
        acc = if is_one(&acc) {
            power(pending)
        } else {
            Thing::binary(BinaryOp::Mul, power(pending), acc)
        };
    }
    acc
}

/// Expand every polynomial subtree into canonical form.
pub fn expand(tree: &Thing) -> Thing {
    ensure_sufficient_stack(|| {
        if let Some(coeffs) = coefficients(tree) {
            return canonical(&coeffs);
        }
        match tree {
            Thing::Binary { op, lhs, rhs } => Thing::binary(*op, expand(lhs), expand(rhs)),
            Thing::Unary { func, arg } => Thing::unary(*func, expand(arg)),
            other => other.clone(),
        }
    })
}

/// The polynomial keeping only the monomials whose degree satisfies `keep`.
pub fn subpoly(tree: &Thing, keep: impl Fn(usize) -> bool) -> Option<Thing> {
    let coeffs: Vec<Thing> = coefficients(tree)?
        .into_iter()
        .enumerate()
        .map(|(i, c)| if keep(i) { c } else { zero() })
        .collect();
    Some(canonical(&coeffs))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sol_ir::RenderOptions;

    use super::*;

    fn x() -> Thing {
        Thing::FreeVariable
    }

    fn show(t: &Thing) -> String {
        t.render(&RenderOptions {
            free_variable: Some("x"),
            ..RenderOptions::default()
        })
    }

    fn square_of_one_plus_x() -> Thing {
        Thing::binary(
            BinaryOp::Pow,
            Thing::binary(BinaryOp::Add, Thing::integer(1), x()),
            Thing::integer(2),
        )
    }

    #[test]
    fn binomial_expansion() {
        let coeffs = coefficients(&square_of_one_plus_x()).unwrap_or_else(|| panic!("polynomial"));
        let values: Vec<_> = coeffs.iter().filter_map(Thing::as_integer).collect();
        assert_eq!(values, vec![1, 2, 1]);
        assert_eq!(show(&expand(&square_of_one_plus_x())), "1 + 2 * x + x ^ 2");
    }

    #[test]
    fn horner_form() {
        let coeffs = vec![Thing::integer(1), Thing::integer(2), Thing::integer(3)];
        assert_eq!(show(&horner(&coeffs)), "1 + x * (2 + x * 3)");
        let sparse = vec![zero(), zero(), zero(), Thing::integer(1)];
        assert_eq!(show(&horner(&sparse)), "x ^ 3");
    }

    #[test]
    fn negative_coefficients_subtract() {
        let coeffs = vec![Thing::integer(1), Thing::integer(-2)];
        assert_eq!(show(&canonical(&coeffs)), "1 - 2 * x");
    }

    #[test]
    fn non_polynomials() {
        assert!(!is_polynomial(&Thing::unary(UnaryFn::Sin, x())));
        assert!(!is_polynomial(&Thing::binary(BinaryOp::Div, Thing::integer(1), x())));
        assert!(is_polynomial(&Thing::unary(UnaryFn::Sin, Thing::integer(1))));
    }

    #[test]
    fn degree_and_coeff() {
        assert_eq!(degree(&square_of_one_plus_x()), Some(2));
        assert_eq!(degree(&Thing::integer(0)), Some(0));
        assert_eq!(coeff(&square_of_one_plus_x(), 1).and_then(|c| c.as_integer()), Some(2));
        assert_eq!(coeff(&square_of_one_plus_x(), 7).and_then(|c| c.as_integer()), Some(0));
    }

    #[test]
    fn subpoly_keeps_selected_degrees() {
        let p = subpoly(&square_of_one_plus_x(), |i| i != 1).unwrap_or_else(|| panic!("polynomial"));
        assert_eq!(show(&p), "1 + x ^ 2");
    }
}
