//! Exact reasoning about constant expressions.
//!
//! Interval methods cannot separate two values that are equal, so
//! comparisons and zero tests fall back to this module: evaluation over
//! the rationals where every node has a rational value, and a handful of
//! structural rules (same strictly monotone function on both sides,
//! polynomials in pi with vanishing coefficients) where it has not.

use std::cmp::Ordering;

use rug::ops::Pow;
use sol_ir::{BinaryOp, Thing, UnaryFn};
use sol_num::literal::{convert_binary, convert_dyadic};
use sol_num::{Float, Integer, Rational, Round, MAX_PRECISION, MIN_PRECISION};

use super::poly;
use crate::stack::ensure_sufficient_stack;

/// Largest exponent expanded by exact powering.
const EXACT_POW_LIMIT: u32 = 4096;

/// Largest power of ten built for a decimal literal.
const DECIMAL_SCALE_LIMIT: u32 = 100_000;

/// The float equal to `n`, unless it needs more than the largest precision.
pub fn integer_to_float(n: &Integer) -> Option<Float> {
    let bits = n.significant_bits().max(MIN_PRECISION);
    (bits <= MAX_PRECISION).then(|| Float::with_val(bits, n))
}

/// The float equal to `r`, when `r` is dyadic.
pub fn rational_to_float(r: &Rational) -> Option<Float> {
    let den = r.denom();
    if !den.is_power_of_two() {
        return None;
    }
    let shift = den.significant_bits() - 1;
    let bits = r.numer().significant_bits().max(MIN_PRECISION);
    if bits > MAX_PRECISION {
        return None;
    }
    let mut value = Float::with_val(bits, r.numer());
    value >>= shift;
    Some(value)
}

/// Exact value of a decimal literal.
pub fn decimal_rational(text: &str) -> Option<Rational> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], body[pos + 1..].parse::<i64>().ok()?),
        None => (body, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits: Integer = format!("{int_part}{frac_part}").parse().ok()?;
    let scale = exponent.checked_sub(i64::try_from(frac_part.len()).ok()?)?;
    let magnitude = u32::try_from(scale.unsigned_abs()).ok()?;
    if magnitude > DECIMAL_SCALE_LIMIT {
        return None;
    }
    let ten = Integer::from(10).pow(magnitude);
    let value = if scale >= 0 {
        Rational::from(digits * ten)
    } else {
        Rational::from((digits, ten))
    };
    Some(if negative { -value } else { value })
}

/// The rational value of a constant expression, when every node has one.
pub fn exact_value(tree: &Thing) -> Option<Rational> {
    ensure_sufficient_stack(|| exact_node(tree))
}

fn exact_node(tree: &Thing) -> Option<Rational> {
    match tree {
        Thing::Constant(c) => c.to_rational(),
        Thing::DecimalConstant(text) => decimal_rational(text),
        Thing::DyadicConstant(text) => convert_dyadic(text).ok()?.value.to_rational(),
        Thing::BinaryConstant(text) => convert_binary(text).ok()?.value.to_rational(),
        Thing::Binary { op, lhs, rhs } => {
            let a = exact_value(lhs)?;
            let b = exact_value(rhs)?;
            match op {
                BinaryOp::Add => Some(a + b),
                BinaryOp::Sub => Some(a - b),
                BinaryOp::Mul => Some(a * b),
                BinaryOp::Div => (b.cmp0() != Ordering::Equal).then(|| a / b),
                BinaryOp::Pow => exact_pow(a, &b),
            }
        }
        Thing::Unary { func, arg } => exact_unary(*func, exact_value(arg)?),
        Thing::RoundTo { format, arg } => {
            let value = rational_to_float(&exact_value(arg)?)?;
            format.round(&value, Round::Nearest).to_rational()
        }
        _ => None,
    }
}

fn exact_pow(base: Rational, exponent: &Rational) -> Option<Rational> {
    if *exponent.denom() != 1 {
        return None;
    }
    let n = exponent.numer().to_i64()?;
    let magnitude = u32::try_from(n.unsigned_abs()).ok()?;
    if magnitude > EXACT_POW_LIMIT {
        return None;
    }
    let size = u64::from(base.numer().significant_bits().max(base.denom().significant_bits()));
    if size.saturating_mul(u64::from(magnitude)) > u64::from(MAX_PRECISION) {
        return None;
    }
    if n >= 0 {
        Some(base.pow(magnitude))
    } else if base.cmp0() == Ordering::Equal {
        None
    } else {
        Some(base.recip().pow(magnitude))
    }
}

fn nearest_even(a: Rational) -> Rational {
    let floor = a.clone().floor();
    let frac = a - &floor;
    let half = Rational::from((1, 2));
    match frac.cmp(&half) {
        Ordering::Less => floor,
        Ordering::Greater => floor + 1u32,
        Ordering::Equal if floor.numer().is_even() => floor,
        Ordering::Equal => floor + 1u32,
    }
}

/// `k` when `r == base^k` for an integer `k`.
fn exact_log(r: &Rational, base: u32) -> Option<Rational> {
    if r.cmp0() != Ordering::Greater {
        return None;
    }
    let (num, den) = (r.numer(), r.denom());
    let (power, negate) = if *den == 1 {
        (num.clone(), false)
    } else if *num == 1 {
        (den.clone(), true)
    } else {
        return None;
    };
    let mut k = 0i64;
    let mut rest = power;
    while rest > 1 {
        if !rest.is_divisible_u(base) {
            return None;
        }
        rest /= base;
        k += 1;
    }
    Some(Rational::from(if negate { -k } else { k }))
}

fn exact_unary(func: UnaryFn, a: Rational) -> Option<Rational> {
    let zero = a.cmp0() == Ordering::Equal;
    let one = a == 1;
    match func {
        UnaryFn::Neg => Some(-a),
        UnaryFn::Abs => Some(a.abs()),
        UnaryFn::Ceil => Some(a.ceil()),
        UnaryFn::Floor => Some(a.floor()),
        UnaryFn::NearestInt => Some(nearest_even(a)),
        UnaryFn::Sqrt => {
            if a.cmp0() == Ordering::Less {
                return None;
            }
            let (num, den) = (a.numer(), a.denom());
            (num.is_perfect_square() && den.is_perfect_square())
                .then(|| Rational::from((num.clone().sqrt(), den.clone().sqrt())))
        }
        UnaryFn::Exp | UnaryFn::Cos | UnaryFn::Cosh | UnaryFn::Erfc if zero => {
            Some(Rational::from(1))
        }
        UnaryFn::Expm1
        | UnaryFn::Sin
        | UnaryFn::Tan
        | UnaryFn::Asin
        | UnaryFn::Atan
        | UnaryFn::Sinh
        | UnaryFn::Tanh
        | UnaryFn::Asinh
        | UnaryFn::Atanh
        | UnaryFn::Erf
        | UnaryFn::Log1p
            if zero =>
        {
            Some(Rational::new())
        }
        UnaryFn::Log | UnaryFn::Acos | UnaryFn::Acosh if one => Some(Rational::new()),
        UnaryFn::Log2 => exact_log(&a, 2),
        UnaryFn::Log10 => exact_log(&a, 10),
        _ => None,
    }
}

/// Strictly monotone functions, `Greater` for increasing.
fn monotonicity(func: UnaryFn) -> Option<Ordering> {
    match func {
        UnaryFn::Sqrt
        | UnaryFn::Exp
        | UnaryFn::Log
        | UnaryFn::Log2
        | UnaryFn::Log10
        | UnaryFn::Asin
        | UnaryFn::Atan
        | UnaryFn::Sinh
        | UnaryFn::Tanh
        | UnaryFn::Asinh
        | UnaryFn::Acosh
        | UnaryFn::Atanh
        | UnaryFn::Erf
        | UnaryFn::Log1p
        | UnaryFn::Expm1 => Some(Ordering::Greater),
        UnaryFn::Neg | UnaryFn::Acos | UnaryFn::Erfc => Some(Ordering::Less),
        _ => None,
    }
}

fn mul_sign(a: Ordering, b: Ordering) -> Ordering {
    match (a, b) {
        (Ordering::Equal, _) | (_, Ordering::Equal) => Ordering::Equal,
        _ if a == b => Ordering::Greater,
        _ => Ordering::Less,
    }
}

/// Replace pi by the free variable, failing if the free variable occurs.
fn pi_as_variable(tree: &Thing) -> Option<Thing> {
    Some(match tree {
        Thing::Pi => Thing::FreeVariable,
        Thing::FreeVariable => return None,
        Thing::Binary { op, lhs, rhs } => Thing::binary(*op, pi_as_variable(lhs)?, pi_as_variable(rhs)?),
        Thing::Unary { func, arg } => Thing::unary(*func, pi_as_variable(arg)?),
        other => other.clone(),
    })
}

/// `a - b` is a polynomial in pi whose coefficients are all exactly zero.
fn vanishes_as_pi_polynomial(a: &Thing, b: &Thing) -> bool {
    let Some(diff) = pi_as_variable(&Thing::binary(BinaryOp::Sub, a.clone(), b.clone())) else {
        return false;
    };
    poly::coefficients(&diff).is_some_and(|coeffs| {
        coeffs
            .iter()
            .all(|c| exact_value(c).is_some_and(|v| v.cmp0() == Ordering::Equal))
    })
}

/// Decide `a cmp b` exactly, or give up.
pub fn exact_compare(a: &Thing, b: &Thing) -> Option<Ordering> {
    ensure_sufficient_stack(|| {
        if let (Some(x), Some(y)) = (exact_value(a), exact_value(b)) {
            return Some(x.cmp(&y));
        }
        if a == b {
            return Some(Ordering::Equal);
        }
        if let Some(ord) = structural_compare(a, b) {
            return Some(ord);
        }
        if vanishes_as_pi_polynomial(a, b) {
            return Some(Ordering::Equal);
        }
        match (exact_sign(a)?, exact_sign(b)?) {
            (Ordering::Less, Ordering::Equal | Ordering::Greater)
            | (Ordering::Equal, Ordering::Greater) => Some(Ordering::Less),
            (Ordering::Greater, Ordering::Equal | Ordering::Less)
            | (Ordering::Equal, Ordering::Less) => Some(Ordering::Greater),
            (Ordering::Equal, Ordering::Equal) => Some(Ordering::Equal),
            _ => None,
        }
    })
}

fn structural_compare(a: &Thing, b: &Thing) -> Option<Ordering> {
    match (a, b) {
        (Thing::Unary { func: f, arg: x }, Thing::Unary { func: g, arg: y }) if f == g => {
            match monotonicity(*f)? {
                Ordering::Less => exact_compare(x, y).map(Ordering::reverse),
                _ => exact_compare(x, y),
            }
        }
        (
            Thing::Binary {
                op: BinaryOp::Add,
                lhs: l1,
                rhs: r1,
            },
            Thing::Binary {
                op: BinaryOp::Add,
                lhs: l2,
                rhs: r2,
            },
        ) => {
            if l1 == l2 {
                exact_compare(r1, r2)
            } else if r1 == r2 {
                exact_compare(l1, l2)
            } else {
                None
            }
        }
        (
            Thing::Binary {
                op: BinaryOp::Sub,
                lhs: l1,
                rhs: r1,
            },
            Thing::Binary {
                op: BinaryOp::Sub,
                lhs: l2,
                rhs: r2,
            },
        ) => {
            if l1 == l2 {
                exact_compare(r1, r2).map(Ordering::reverse)
            } else if r1 == r2 {
                exact_compare(l1, l2)
            } else {
                None
            }
        }
        (Thing::RoundTo { format: f, arg: x }, Thing::RoundTo { format: g, arg: y }) if f == g => {
            (exact_compare(x, y)? == Ordering::Equal).then_some(Ordering::Equal)
        }
        _ => None,
    }
}

/// The exact sign of a constant expression, or `None` when undecidable here.
pub fn exact_sign(tree: &Thing) -> Option<Ordering> {
    ensure_sufficient_stack(|| {
        if let Some(v) = exact_value(tree) {
            return Some(v.cmp0());
        }
        match tree {
            Thing::Binary {
                op: BinaryOp::Sub,
                lhs,
                rhs,
            } => exact_compare(lhs, rhs),
            Thing::Binary {
                op: BinaryOp::Mul,
                lhs,
                rhs,
            } => Some(mul_sign(exact_sign(lhs)?, exact_sign(rhs)?)),
            Thing::Binary {
                op: BinaryOp::Div,
                lhs,
                rhs,
            } => match exact_sign(rhs)? {
                Ordering::Equal => None,
                d => Some(mul_sign(exact_sign(lhs)?, d)),
            },
            Thing::Unary {
                func: UnaryFn::Neg,
                arg,
            } => exact_sign(arg).map(Ordering::reverse),
            Thing::Unary {
                func: UnaryFn::Exp | UnaryFn::Cosh | UnaryFn::Erfc,
                ..
            }
            | Thing::Pi => Some(Ordering::Greater),
            _ => vanishes_as_pi_polynomial(tree, &Thing::integer(0)).then_some(Ordering::Equal),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Thing {
        Thing::DecimalConstant(text.to_string())
    }

    #[test]
    fn decimal_literals_are_exact_rationals() {
        assert_eq!(decimal_rational("0.1"), Some(Rational::from((1, 10))));
        assert_eq!(decimal_rational("-2.5e1"), Some(Rational::from(-25)));
        assert_eq!(decimal_rational("3e-2"), Some(Rational::from((3, 100))));
    }

    #[test]
    fn tenths_add_up_exactly() {
        let sum = Thing::binary(BinaryOp::Add, dec("0.1"), dec("0.2"));
        assert_eq!(exact_compare(&sum, &dec("0.3")), Some(Ordering::Equal));
    }

    #[test]
    fn pi_polynomial_cancellation() {
        let two_pi = Thing::binary(BinaryOp::Mul, Thing::integer(2), Thing::Pi);
        let diff = Thing::binary(
            BinaryOp::Sub,
            Thing::binary(BinaryOp::Sub, two_pi, Thing::Pi),
            Thing::Pi,
        );
        assert_eq!(exact_sign(&diff), Some(Ordering::Equal));
    }

    #[test]
    fn monotone_functions_compare_by_argument() {
        let a = Thing::unary(UnaryFn::Exp, Thing::integer(1));
        let b = Thing::unary(UnaryFn::Exp, Thing::integer(2));
        assert_eq!(exact_compare(&a, &b), Some(Ordering::Less));
        let c = Thing::unary(UnaryFn::Erfc, Thing::integer(1));
        let d = Thing::unary(UnaryFn::Erfc, Thing::integer(2));
        assert_eq!(exact_compare(&c, &d), Some(Ordering::Greater));
    }

    #[test]
    fn special_values() {
        let log_one = Thing::unary(UnaryFn::Log, Thing::integer(1));
        assert_eq!(exact_sign(&log_one), Some(Ordering::Equal));
        let log2 = Thing::unary(UnaryFn::Log2, Thing::integer(8));
        assert_eq!(exact_value(&log2), Some(Rational::from(3)));
        let root = Thing::unary(UnaryFn::Sqrt, Thing::integer(9));
        assert_eq!(exact_value(&root), Some(Rational::from(3)));
    }

    #[test]
    fn nearestint_ties_to_even() {
        let half = Thing::unary(UnaryFn::NearestInt, dec("2.5"));
        assert_eq!(exact_value(&half), Some(Rational::from(2)));
        let three_half = Thing::unary(UnaryFn::NearestInt, dec("3.5"));
        assert_eq!(exact_value(&three_half), Some(Rational::from(4)));
    }

    #[test]
    fn undecidable_without_exact_information() {
        let a = Thing::unary(UnaryFn::Sin, Thing::integer(1));
        let b = Thing::unary(UnaryFn::Cos, Thing::integer(1));
        assert_eq!(exact_compare(&a, &b), None);
    }

    #[test]
    fn dyadic_round_trip() {
        let r = Rational::from((3, 4));
        let f = rational_to_float(&r).unwrap_or_else(|| panic!("3/4 is dyadic"));
        assert_eq!(f.to_rational(), Some(r));
        assert!(rational_to_float(&Rational::from((1, 3))).is_none());
    }
}
