//! Closed intervals with outward-rounded endpoints.
//!
//! Every operation takes an explicit target precision and rounds the
//! lower endpoint down and the upper endpoint up, so the result always
//! encloses every pointwise result of the operation on the inputs.
//!
//! Intervals whose endpoints are both NaN denote "undefined": the
//! operation left its domain somewhere on the input. Undefined intervals
//! propagate through every operation.

use std::cmp::Ordering;
use std::fmt;

use rug::float::{Constant, Round, Special};
use rug::ops::Pow;
use rug::{Float, Integer};

use crate::{clamp_precision, Format, NumError};

/// A closed interval `[lo, hi]` of arbitrary-precision floats.
#[derive(Clone, PartialEq)]
pub struct Interval {
    lo: Float,
    hi: Float,
}

/// Unary functions whose enclosure only needs the endpoint images.
#[derive(Clone, Copy)]
enum Monotone {
    Increasing,
    Decreasing,
}

impl Interval {
    /// Build an interval from its endpoints.
    pub fn new(lo: Float, hi: Float) -> Result<Self, NumError> {
        if lo.is_nan() || hi.is_nan() {
            return Ok(Interval::undefined(lo.prec().max(hi.prec())));
        }
        if lo > hi {
            return Err(NumError::EmptyInterval);
        }
        Ok(Interval { lo, hi })
    }

    /// The degenerate interval `[x, x]`.
    pub fn point(x: &Float) -> Self {
        if x.is_nan() {
            return Interval::undefined(x.prec());
        }
        Interval {
            lo: x.clone(),
            hi: x.clone(),
        }
    }

    /// Enclosure of `x` at precision `prec`, rounding outward.
    pub fn around(x: &Float, prec: u32) -> Self {
        let prec = clamp_precision(prec);
        Interval {
            lo: Float::with_val_round(prec, x, Round::Down).0,
            hi: Float::with_val_round(prec, x, Round::Up).0,
        }
    }

    /// The undefined interval `[NaN, NaN]`.
    pub fn undefined(prec: u32) -> Self {
        let prec = clamp_precision(prec);
        Interval {
            lo: Float::with_val(prec, Special::Nan),
            hi: Float::with_val(prec, Special::Nan),
        }
    }

    /// The whole extended real line.
    pub fn entire(prec: u32) -> Self {
        let prec = clamp_precision(prec);
        Interval {
            lo: Float::with_val(prec, Special::NegInfinity),
            hi: Float::with_val(prec, Special::Infinity),
        }
    }

    /// Enclosure of pi.
    pub fn pi(prec: u32) -> Self {
        let prec = clamp_precision(prec);
        Interval {
            lo: Float::with_val_round(prec, Constant::Pi, Round::Down).0,
            hi: Float::with_val_round(prec, Constant::Pi, Round::Up).0,
        }
    }

    pub fn lo(&self) -> &Float {
        &self.lo
    }

    pub fn hi(&self) -> &Float {
        &self.hi
    }

    /// Consume the interval, returning its endpoints.
    pub fn into_bounds(self) -> (Float, Float) {
        (self.lo, self.hi)
    }

    /// The larger of the endpoint precisions.
    pub fn prec(&self) -> u32 {
        self.lo.prec().max(self.hi.prec())
    }

    pub fn is_undefined(&self) -> bool {
        self.lo.is_nan() || self.hi.is_nan()
    }

    pub fn is_point(&self) -> bool {
        !self.is_undefined() && self.lo == self.hi
    }

    /// Both endpoints finite.
    pub fn is_bounded(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    pub fn contains(&self, x: &Float) -> bool {
        !self.is_undefined() && self.lo <= *x && *x <= self.hi
    }

    pub fn contains_zero(&self) -> bool {
        !self.is_undefined() && self.lo.cmp0() != Some(Ordering::Greater)
            && self.hi.cmp0() != Some(Ordering::Less)
    }

    /// Whether every point of `self` lies strictly below every point of `other`.
    pub fn strictly_below(&self, other: &Interval) -> bool {
        !self.is_undefined() && !other.is_undefined() && self.hi < other.lo
    }

    /// Sign of the interval when it does not straddle zero.
    pub fn sign(&self) -> Option<Ordering> {
        if self.is_undefined() {
            return None;
        }
        if self.lo.is_zero() && self.hi.is_zero() {
            return Some(Ordering::Equal);
        }
        if self.lo.cmp0() == Some(Ordering::Greater) {
            return Some(Ordering::Greater);
        }
        if self.hi.cmp0() == Some(Ordering::Less) {
            return Some(Ordering::Less);
        }
        None
    }

    /// Width `hi - lo`, rounded up.
    pub fn width(&self, prec: u32) -> Float {
        Float::with_val_round(clamp_precision(prec), &self.hi - &self.lo, Round::Up).0
    }

    /// Midpoint, rounded to nearest.
    pub fn midpoint(&self, prec: u32) -> Float {
        let prec = clamp_precision(prec);
        if self.lo.is_infinite() || self.hi.is_infinite() {
            return match (self.lo.is_infinite(), self.hi.is_infinite()) {
                (true, true) => Float::new(prec),
                (true, false) => Float::with_val(prec, &self.hi),
                _ => Float::with_val(prec, &self.lo),
            };
        }
        let mut sum = Float::with_val(prec.saturating_add(1), &self.lo + &self.hi);
        sum >>= 1u32;
        Float::with_val(prec, sum)
    }

    /// Smallest interval containing both.
    pub fn hull(&self, other: &Interval) -> Interval {
        if self.is_undefined() || other.is_undefined() {
            return Interval::undefined(self.prec().max(other.prec()));
        }
        Interval {
            lo: min_float(&self.lo, &other.lo),
            hi: max_float(&self.hi, &other.hi),
        }
    }

    /// Intersection, or `None` when disjoint.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        if self.is_undefined() || other.is_undefined() {
            return None;
        }
        let lo = max_float(&self.lo, &other.lo);
        let hi = min_float(&self.hi, &other.hi);
        (lo <= hi).then_some(Interval { lo, hi })
    }

    /// Round both endpoints outward to `prec` bits.
    #[must_use]
    pub fn with_prec(&self, prec: u32) -> Interval {
        let prec = clamp_precision(prec);
        Interval {
            lo: Float::with_val_round(prec, &self.lo, Round::Down).0,
            hi: Float::with_val_round(prec, &self.hi, Round::Up).0,
        }
    }

    // Arithmetic

    #[must_use]
    pub fn add(&self, other: &Interval, prec: u32) -> Interval {
        let prec = clamp_precision(prec);
        if self.is_undefined() || other.is_undefined() {
            return Interval::undefined(prec);
        }
        let lo = Float::with_val_round(prec, &self.lo + &other.lo, Round::Down).0;
        let hi = Float::with_val_round(prec, &self.hi + &other.hi, Round::Up).0;
        Interval::from_raw(lo, hi, prec)
    }

    #[must_use]
    pub fn sub(&self, other: &Interval, prec: u32) -> Interval {
        let prec = clamp_precision(prec);
        if self.is_undefined() || other.is_undefined() {
            return Interval::undefined(prec);
        }
        let lo = Float::with_val_round(prec, &self.lo - &other.hi, Round::Down).0;
        let hi = Float::with_val_round(prec, &self.hi - &other.lo, Round::Up).0;
        Interval::from_raw(lo, hi, prec)
    }

    #[must_use]
    pub fn mul(&self, other: &Interval, prec: u32) -> Interval {
        let prec = clamp_precision(prec);
        if self.is_undefined() || other.is_undefined() {
            return Interval::undefined(prec);
        }
        let corners = [
            (&self.lo, &other.lo),
            (&self.lo, &other.hi),
            (&self.hi, &other.lo),
            (&self.hi, &other.hi),
        ];
        let mut lo: Option<Float> = None;
        let mut hi: Option<Float> = None;
        for (a, b) in corners {
            // 0 * inf contributes 0 to the enclosure.
            let (down, up) = if (a.is_zero() && b.is_infinite()) || (a.is_infinite() && b.is_zero())
            {
                (Float::new(prec), Float::new(prec))
            } else {
                (
                    Float::with_val_round(prec, a * b, Round::Down).0,
                    Float::with_val_round(prec, a * b, Round::Up).0,
                )
            };
            lo = Some(match lo {
                Some(l) => min_float(&l, &down),
                None => down,
            });
            hi = Some(match hi {
                Some(h) => max_float(&h, &up),
                None => up,
            });
        }
        match (lo, hi) {
            (Some(lo), Some(hi)) => Interval::from_raw(lo, hi, prec),
            _ => Interval::undefined(prec),
        }
    }

    #[must_use]
    pub fn div(&self, other: &Interval, prec: u32) -> Interval {
        let prec = clamp_precision(prec);
        if self.is_undefined() || other.is_undefined() {
            return Interval::undefined(prec);
        }
        if other.lo.is_zero() && other.hi.is_zero() {
            return Interval::undefined(prec);
        }
        if other.contains_zero() {
            return Interval::entire(prec);
        }
        let recip = Interval::from_raw(
            Float::with_val_round(prec.saturating_add(2), 1u32 / &other.hi, Round::Down).0,
            Float::with_val_round(prec.saturating_add(2), 1u32 / &other.lo, Round::Up).0,
            prec,
        );
        // Exact quotients must stay exact, so divide endpoints directly
        // when the divisor is a point.
        if other.is_point() {
            let corners = [&self.lo, &self.hi];
            let mut bounds = corners.iter().map(|a| {
                (
                    Float::with_val_round(prec, *a / &other.lo, Round::Down).0,
                    Float::with_val_round(prec, *a / &other.lo, Round::Up).0,
                )
            });
            let (Some((a_lo, a_hi)), Some((b_lo, b_hi))) = (bounds.next(), bounds.next()) else {
                return Interval::undefined(prec);
            };
            return Interval::from_raw(min_float(&a_lo, &b_lo), max_float(&a_hi, &b_hi), prec);
        }
        self.mul(&recip, prec)
    }

    #[must_use]
    pub fn neg(&self) -> Interval {
        if self.is_undefined() {
            return self.clone();
        }
        Interval {
            lo: -self.hi.clone(),
            hi: -self.lo.clone(),
        }
    }

    #[must_use]
    pub fn abs(&self) -> Interval {
        if self.is_undefined() {
            return self.clone();
        }
        match self.sign() {
            Some(Ordering::Greater | Ordering::Equal) => self.clone(),
            Some(Ordering::Less) => self.neg(),
            None => Interval {
                lo: Float::new(self.prec()),
                hi: max_float(&(-self.lo.clone()), &self.hi),
            },
        }
    }

    /// `self ^ other`.
    ///
    /// Integer point exponents allow negative bases; any other exponent
    /// requires a non-negative base.
    #[must_use]
    pub fn pow(&self, other: &Interval, prec: u32) -> Interval {
        let prec = clamp_precision(prec);
        if self.is_undefined() || other.is_undefined() {
            return Interval::undefined(prec);
        }
        if other.is_point() {
            if let Some((n, Ordering::Equal)) = other.lo.to_integer_round(Round::Zero) {
                if let Some(n) = n.to_i64() {
                    return self.pow_integer(n, prec);
                }
            }
        }
        if self.lo.cmp0() == Some(Ordering::Less) {
            return Interval::undefined(prec);
        }
        // x^y is monotone in each argument on x >= 0, so the extremes are
        // attained at the corners.
        let corners = [
            (&self.lo, &other.lo),
            (&self.lo, &other.hi),
            (&self.hi, &other.lo),
            (&self.hi, &other.hi),
        ];
        let mut result: Option<Interval> = None;
        for (a, b) in corners {
            let lo = Float::with_val_round(prec, a.pow(b), Round::Down).0;
            let hi = Float::with_val_round(prec, a.pow(b), Round::Up).0;
            let corner = Interval::from_raw(lo, hi, prec);
            result = Some(match result {
                Some(r) => r.hull(&corner),
                None => corner,
            });
        }
        result.unwrap_or_else(|| Interval::undefined(prec))
    }

    fn pow_integer(&self, n: i64, prec: u32) -> Interval {
        if n == 0 {
            let one = Float::with_val(prec, 1u32);
            return Interval::point(&one);
        }
        if n < 0 {
            let positive = self.pow_integer(n.saturating_neg(), prec.saturating_add(10));
            let one = Interval::point(&Float::with_val(prec, 1u32));
            return one.div(&positive, prec);
        }
        let exp = Integer::from(n);
        let power = |x: &Float, round: Round| Float::with_val_round(prec, x.pow(&exp), round).0;
        if n % 2 == 1 {
            return Interval::from_raw(power(&self.lo, Round::Down), power(&self.hi, Round::Up), prec);
        }
        match self.sign() {
            Some(Ordering::Greater | Ordering::Equal) => {
                Interval::from_raw(power(&self.lo, Round::Down), power(&self.hi, Round::Up), prec)
            }
            Some(Ordering::Less) => {
                Interval::from_raw(power(&self.hi, Round::Down), power(&self.lo, Round::Up), prec)
            }
            None => {
                let a = power(&self.lo, Round::Up);
                let b = power(&self.hi, Round::Up);
                Interval::from_raw(Float::new(prec), max_float(&a, &b), prec)
            }
        }
    }

    // Elementary functions

    #[must_use]
    pub fn sqrt(&self, prec: u32) -> Interval {
        self.monotone(prec, Some(Float::new(2)), None, Monotone::Increasing, |x| x.sqrt_ref())
    }

    #[must_use]
    pub fn exp(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.exp_ref())
    }

    #[must_use]
    pub fn expm1(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.exp_m1_ref())
    }

    #[must_use]
    pub fn log(&self, prec: u32) -> Interval {
        self.monotone(prec, Some(Float::new(2)), None, Monotone::Increasing, |x| x.ln_ref())
    }

    #[must_use]
    pub fn log2(&self, prec: u32) -> Interval {
        self.monotone(prec, Some(Float::new(2)), None, Monotone::Increasing, |x| x.log2_ref())
    }

    #[must_use]
    pub fn log10(&self, prec: u32) -> Interval {
        self.monotone(prec, Some(Float::new(2)), None, Monotone::Increasing, |x| x.log10_ref())
    }

    #[must_use]
    pub fn log1p(&self, prec: u32) -> Interval {
        self.monotone(prec, Some(Float::with_val(2, -1)), None, Monotone::Increasing, |x| {
            x.ln_1p_ref()
        })
    }

    #[must_use]
    pub fn asin(&self, prec: u32) -> Interval {
        self.monotone(
            prec,
            Some(Float::with_val(2, -1)),
            Some(Float::with_val(2, 1)),
            Monotone::Increasing,
            |x| x.asin_ref(),
        )
    }

    #[must_use]
    pub fn acos(&self, prec: u32) -> Interval {
        self.monotone(
            prec,
            Some(Float::with_val(2, -1)),
            Some(Float::with_val(2, 1)),
            Monotone::Decreasing,
            |x| x.acos_ref(),
        )
    }

    #[must_use]
    pub fn atan(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.atan_ref())
    }

    #[must_use]
    pub fn sinh(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.sinh_ref())
    }

    #[must_use]
    pub fn tanh(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.tanh_ref())
    }

    #[must_use]
    pub fn asinh(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.asinh_ref())
    }

    #[must_use]
    pub fn acosh(&self, prec: u32) -> Interval {
        self.monotone(prec, Some(Float::with_val(2, 1)), None, Monotone::Increasing, |x| {
            x.acosh_ref()
        })
    }

    #[must_use]
    pub fn atanh(&self, prec: u32) -> Interval {
        self.monotone(
            prec,
            Some(Float::with_val(2, -1)),
            Some(Float::with_val(2, 1)),
            Monotone::Increasing,
            |x| x.atanh_ref(),
        )
    }

    #[must_use]
    pub fn erf(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.erf_ref())
    }

    #[must_use]
    pub fn erfc(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Decreasing, |x| x.erfc_ref())
    }

    #[must_use]
    pub fn ceil(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.ceil_ref())
    }

    #[must_use]
    pub fn floor(&self, prec: u32) -> Interval {
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.floor_ref())
    }

    /// Round to the nearest integer, ties to even.
    #[must_use]
    pub fn nearest_int(&self, prec: u32) -> Interval {
        let prec = clamp_precision(prec);
        if self.is_undefined() {
            return Interval::undefined(prec);
        }
        let round = |x: &Float, dir: Round| -> Float {
            if !x.is_finite() {
                return Float::with_val(prec, x);
            }
            match x.to_integer_round(Round::Nearest) {
                Some((n, _)) => Float::with_val_round(prec, n, dir).0,
                None => Float::with_val(prec, Special::Nan),
            }
        };
        Interval::from_raw(round(&self.lo, Round::Down), round(&self.hi, Round::Up), prec)
    }

    #[must_use]
    pub fn cosh(&self, prec: u32) -> Interval {
        let prec = clamp_precision(prec);
        match self.sign() {
            Some(Ordering::Greater | Ordering::Equal) => {
                self.monotone(prec, None, None, Monotone::Increasing, |x| x.cosh_ref())
            }
            Some(Ordering::Less) => {
                self.monotone(prec, None, None, Monotone::Decreasing, |x| x.cosh_ref())
            }
            None if self.is_undefined() => Interval::undefined(prec),
            None => {
                let a = Float::with_val_round(prec, self.lo.cosh_ref(), Round::Up).0;
                let b = Float::with_val_round(prec, self.hi.cosh_ref(), Round::Up).0;
                Interval::from_raw(Float::with_val(prec, 1u32), max_float(&a, &b), prec)
            }
        }
    }

    #[must_use]
    pub fn sin(&self, prec: u32) -> Interval {
        self.periodic(prec, true)
    }

    #[must_use]
    pub fn cos(&self, prec: u32) -> Interval {
        self.periodic(prec, false)
    }

    #[must_use]
    pub fn tan(&self, prec: u32) -> Interval {
        let prec = clamp_precision(prec);
        if self.is_undefined() || !self.is_bounded() {
            return Interval::undefined(prec);
        }
        // Poles at pi/2 + k*pi.
        let (first, last) = self.critical_range(prec, true);
        if first <= last {
            return Interval::entire(prec);
        }
        self.monotone(prec, None, None, Monotone::Increasing, |x| x.tan_ref())
    }

    /// Round both endpoints to a fixed format. Rounding is monotone, so
    /// this encloses the rounding of every point.
    #[must_use]
    pub fn round_format(&self, format: Format) -> Interval {
        if self.is_undefined() {
            return self.clone();
        }
        Interval {
            lo: format.round(&self.lo, Round::Down),
            hi: format.round(&self.hi, Round::Up),
        }
    }

    // Helpers

    fn from_raw(lo: Float, hi: Float, prec: u32) -> Interval {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Interval::undefined(prec);
        }
        Interval { lo, hi }
    }

    fn monotone<'a, F, I>(
        &'a self,
        prec: u32,
        domain_lo: Option<Float>,
        domain_hi: Option<Float>,
        direction: Monotone,
        f: F,
    ) -> Interval
    where
        F: Fn(&'a Float) -> I,
        Float: rug::ops::AssignRound<I, Round = Round, Ordering = Ordering>,
    {
        let prec = clamp_precision(prec);
        if self.is_undefined() {
            return Interval::undefined(prec);
        }
        if domain_lo.is_some_and(|d| self.lo < d) || domain_hi.is_some_and(|d| self.hi > d) {
            return Interval::undefined(prec);
        }
        match direction {
            Monotone::Increasing => Interval::from_raw(
                Float::with_val_round(prec, f(&self.lo), Round::Down).0,
                Float::with_val_round(prec, f(&self.hi), Round::Up).0,
                prec,
            ),
            Monotone::Decreasing => Interval::from_raw(
                Float::with_val_round(prec, f(&self.hi), Round::Down).0,
                Float::with_val_round(prec, f(&self.lo), Round::Up).0,
                prec,
            ),
        }
    }

    /// Integers `k` such that `offset + k*pi` may lie in the interval, where
    /// `offset` is `pi/2` when `half` is set and `0` otherwise.
    ///
    /// Returns an empty range (`first > last`) when no such point can lie
    /// inside.
    fn critical_range(&self, prec: u32, half: bool) -> (Integer, Integer) {
        let work = prec.saturating_add(20);
        let pi = Interval::pi(work);
        let half_shift = Interval::point(&Float::with_val(2, if half { 0.5 } else { 0.0 }));
        let lo_t = Interval::point(&self.lo).div(&pi, work).sub(&half_shift, work);
        let hi_t = Interval::point(&self.hi).div(&pi, work).sub(&half_shift, work);
        let first = lo_t.lo.to_integer_round(Round::Up).map(|(n, _)| n);
        let last = hi_t.hi.to_integer_round(Round::Down).map(|(n, _)| n);
        match (first, last) {
            (Some(first), Some(last)) => (first, last),
            _ => (Integer::from(1), Integer::from(0)),
        }
    }

    fn periodic(&self, prec: u32, sine: bool) -> Interval {
        let prec = clamp_precision(prec);
        if self.is_undefined() {
            return Interval::undefined(prec);
        }
        let unit = Interval::from_raw(Float::with_val(prec, -1), Float::with_val(prec, 1), prec);
        if !self.is_bounded() {
            return unit;
        }
        // Extrema of sin sit at pi/2 + k*pi, those of cos at k*pi; the
        // value there is (-1)^k.
        let (first, last) = self.critical_range(prec, sine);
        let span = Integer::from(&last - &first);
        if span >= 2 {
            return unit;
        }
        let eval = |x: &Float, dir: Round| {
            if sine {
                Float::with_val_round(prec, x.sin_ref(), dir).0
            } else {
                Float::with_val_round(prec, x.cos_ref(), dir).0
            }
        };
        let a = Interval::from_raw(eval(&self.lo, Round::Down), eval(&self.lo, Round::Up), prec);
        let b = Interval::from_raw(eval(&self.hi, Round::Down), eval(&self.hi, Round::Up), prec);
        let mut result = a.hull(&b);
        let mut k = first;
        while k <= last {
            let value = if k.is_even() { 1 } else { -1 };
            result = result.hull(&Interval::point(&Float::with_val(prec, value)));
            k += 1u32;
        }
        result
            .intersect(&unit)
            .unwrap_or_else(|| Interval::undefined(prec))
    }
}

fn min_float(a: &Float, b: &Float) -> Float {
    if a <= b {
        a.clone()
    } else {
        b.clone()
    }
}

fn max_float(a: &Float, b: &Float) -> Float {
    if a >= b {
        a.clone()
    } else {
        b.clone()
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{};{}]", self.lo, self.hi)
    }
}

#[cfg(test)]
mod tests;
