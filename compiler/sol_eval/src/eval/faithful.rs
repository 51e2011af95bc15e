//! Faithful evaluation of constant expressions.
//!
//! A value `v` at precision `p` is faithful for the real `r` when it is
//! one of the two `p`-bit floats bracketing `r` (or `r` itself when
//! representable). It is found by enclosing the expression at growing
//! precision until both enclosure endpoints round to the same float.

use std::cmp::Ordering;

use sol_ir::Thing;
use rug::float::Special;
use sol_num::{clamp_precision, Float, Interval, Round, MAX_PRECISION};

use super::enclosure::{dummy_point, enclose, ProcedureFunctions};
use super::exact::exact_sign;
use crate::config::{FAITHFUL_GUARD_BITS, WIDENING_FACTOR};
use crate::errors::EvalResult;

/// Outcome of reducing a constant expression to a float.
#[derive(Clone, Debug, PartialEq)]
pub enum Approximation {
    /// The expression is already a literal constant.
    Exact(Float),
    /// A faithful rounding at the requested precision.
    Faithful(Float),
    /// Best effort when no faithful value could be proven.
    Unfaithful { value: Float, maybe_zero: bool },
    /// The expression is not a constant expression.
    Failure,
}

impl Approximation {
    /// The approximating value, if any.
    pub fn value(&self) -> Option<&Float> {
        match self {
            Approximation::Exact(v) | Approximation::Faithful(v) => Some(v),
            Approximation::Unfaithful { value, .. } => Some(value),
            Approximation::Failure => None,
        }
    }

    /// The expression has no real value, e.g. `log(-1)`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Approximation::Unfaithful { value, .. } if value.is_nan())
    }

    /// Exact or faithful.
    pub fn is_trustworthy(&self) -> bool {
        matches!(self, Approximation::Exact(_) | Approximation::Faithful(_))
    }
}

/// The common faithful value of an enclosure at `prec`, if any.
fn faithful_value(enclosure: &Interval, prec: u32) -> Option<Float> {
    if enclosure.is_undefined() {
        return None;
    }
    let lo = Float::with_val_round(prec, enclosure.lo(), Round::Down).0;
    let hi = Float::with_val_round(prec, enclosure.hi(), Round::Down).0;
    // Both endpoints lie in [lo, succ(lo)]: either neighbour is faithful.
    (lo == hi).then(|| Float::with_val(prec, enclosure.lo()))
}

/// Reduce a (normalized) constant expression to a float at `prec` bits.
pub fn approximate(
    tree: &Thing,
    prec: u32,
    procs: &mut dyn ProcedureFunctions,
) -> EvalResult<Approximation> {
    if let Thing::Constant(c) = tree {
        return Ok(Approximation::Exact(c.clone()));
    }
    if !tree.is_constant_expression() {
        return Ok(Approximation::Failure);
    }
    let prec = clamp_precision(prec);
    let widest = prec.saturating_mul(WIDENING_FACTOR).min(MAX_PRECISION);
    let x = dummy_point();
    let mut working = prec.saturating_add(FAITHFUL_GUARD_BITS).min(widest);
    let last = loop {
        let enclosure = enclose(tree, &x, working, procs)?;
        if let Some(value) = faithful_value(&enclosure, prec) {
            tracing::trace!(prec, working, "faithful approximation found");
            return Ok(Approximation::Faithful(value));
        }
        if working >= widest || enclosure.is_undefined() {
            break enclosure;
        }
        working = working.saturating_mul(2).min(widest);
    };
    if exact_sign(tree) == Some(Ordering::Equal) {
        return Ok(Approximation::Exact(Float::new(prec)));
    }
    if last.is_undefined() {
        return Ok(Approximation::Unfaithful {
            value: Float::with_val(prec, Special::Nan),
            maybe_zero: false,
        });
    }
    tracing::debug!(prec, widest, "no faithful approximation");
    Ok(Approximation::Unfaithful {
        value: last.midpoint(prec),
        maybe_zero: last.contains_zero(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sol_ir::{BinaryOp, UnaryFn};

    use super::super::enclosure::NoProcedures;
    use super::*;

    fn approx(tree: &Thing, prec: u32) -> Approximation {
        approximate(tree, prec, &mut NoProcedures).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn literals_are_exact() {
        assert_eq!(approx(&Thing::integer(5), 53), Approximation::Exact(Float::with_val(64, 5)));
    }

    #[test]
    fn sqrt_two_is_faithful() {
        let t = Thing::unary(UnaryFn::Sqrt, Thing::integer(2));
        let Approximation::Faithful(v) = approx(&t, 53) else {
            panic!("expected a faithful value");
        };
        assert!((v.to_f64() - 2f64.sqrt()).abs() <= f64::EPSILON * 2.0);
    }

    #[test]
    fn exact_cancellation_is_zero() {
        let t = Thing::binary(BinaryOp::Sub, Thing::Pi, Thing::Pi);
        assert_eq!(approx(&t, 53), Approximation::Exact(Float::new(53)));
    }

    #[test]
    fn sin_pi_is_unfaithful_but_small() {
        let t = Thing::unary(UnaryFn::Sin, Thing::Pi);
        match approx(&t, 20) {
            Approximation::Unfaithful { value, maybe_zero } => {
                assert!(maybe_zero);
                assert!(value.to_f64().abs() < 1e-100);
            }
            other => panic!("expected an unfaithful value, got {other:?}"),
        }
    }

    #[test]
    fn non_constants_fail() {
        assert_eq!(approx(&Thing::FreeVariable, 53), Approximation::Failure);
    }

    #[test]
    fn undefined_is_nan() {
        let t = Thing::unary(UnaryFn::Log, Thing::integer(-1));
        match approx(&t, 53) {
            a @ Approximation::Unfaithful { .. } => assert!(a.is_undefined()),
            other => panic!("expected NaN, got {other:?}"),
        }
    }
}
