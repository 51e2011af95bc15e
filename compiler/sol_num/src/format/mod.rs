//! Rounding to fixed floating-point formats.
//!
//! IEEE formats are emulated at arbitrary precision: the value is first
//! rounded with an unbounded exponent, then overflow and subnormal
//! ranges are handled explicitly. Expansion formats (double-double,
//! triple-double) are built as unevaluated sums of doubles.

use std::cmp::Ordering;

use rug::float::Round;
use rug::Float;

use crate::NumError;

/// A floating-point format a value can be rounded to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// IEEE binary16.
    HalfPrecision,
    /// IEEE binary32.
    Single,
    /// IEEE binary64.
    Double,
    /// x87 80-bit extended.
    DoubleExtended,
    /// IEEE binary128.
    Quad,
    /// Unevaluated sum of two doubles.
    DoubleDouble,
    /// Unevaluated sum of three doubles.
    TripleDouble,
}

impl Format {
    /// Significand bits of the format.
    pub fn precision(self) -> u32 {
        match self {
            Format::HalfPrecision => 11,
            Format::Single => 24,
            Format::Double => 53,
            Format::DoubleExtended => 64,
            Format::Quad => 113,
            Format::DoubleDouble => 106,
            Format::TripleDouble => 159,
        }
    }

    /// Exponent field width for IEEE-like formats.
    fn exponent_width(self) -> Option<u32> {
        match self {
            Format::HalfPrecision => Some(5),
            Format::Single => Some(8),
            Format::Double => Some(11),
            Format::DoubleExtended | Format::Quad => Some(15),
            Format::DoubleDouble | Format::TripleDouble => None,
        }
    }

    /// Short keyword naming the format (`D`, `SG`, ...).
    pub fn keyword(self) -> &'static str {
        match self {
            Format::HalfPrecision => "HP",
            Format::Single => "SG",
            Format::Double => "D",
            Format::DoubleExtended => "DE",
            Format::Quad => "QD",
            Format::DoubleDouble => "DD",
            Format::TripleDouble => "TD",
        }
    }

    /// Function name of the rounding operator (`double`, `single`, ...).
    pub fn function_name(self) -> &'static str {
        match self {
            Format::HalfPrecision => "halfprecision",
            Format::Single => "single",
            Format::Double => "double",
            Format::DoubleExtended => "doubleextended",
            Format::Quad => "quad",
            Format::DoubleDouble => "doubledouble",
            Format::TripleDouble => "tripledouble",
        }
    }

    /// Round `x` to this format.
    ///
    /// The result carries at least the format's precision and is exactly
    /// representable in the format.
    pub fn round(self, x: &Float, mode: Round) -> Float {
        match self.exponent_width() {
            Some(width) => match round_to_ieee(x, self.precision(), width, mode) {
                Ok(r) => r,
                // Widths are fixed per variant and always in range.
                Err(_) => Float::with_val(self.precision(), x),
            },
            None => {
                let parts = if self == Format::DoubleDouble { 2 } else { 3 };
                round_to_expansion(x, parts, mode)
            }
        }
    }

    /// Whether `x` is exactly representable in this format.
    pub fn represents(self, x: &Float) -> bool {
        let r = self.round(x, Round::Nearest);
        r == *x || (r.is_nan() && x.is_nan())
    }
}

/// Round `x` to `prec` bits with an unbounded exponent range.
pub fn round_to_precision(x: &Float, prec: u32, mode: Round) -> (Float, Ordering) {
    Float::with_val_round(crate::clamp_precision(prec.max(2)), x, mode)
}

/// Emulate an IEEE binary format with `prec` significand bits and an
/// exponent field of `width` bits.
fn round_to_ieee(x: &Float, prec: u32, width: u32, mode: Round) -> Result<Float, NumError> {
    if !(3..=30).contains(&width) {
        return Err(NumError::UnsupportedFormat { width });
    }
    if x.is_zero() || !x.is_finite() {
        return Ok(Float::with_val(prec, x));
    }

    let (mut result, _) = Float::with_val_round(prec, x, mode);

    // Largest finite value: one ulp below 2^(2^(width-1)).
    let emax = 1u32 << (width - 1);
    let mut largest = Float::with_val(prec, 1u32);
    largest <<= emax;
    largest.next_down();

    if result.clone().abs() > largest {
        let negative = x.is_sign_negative();
        let inf = if negative {
            Float::with_val(prec, rug::float::Special::NegInfinity)
        } else {
            Float::with_val(prec, rug::float::Special::Infinity)
        };
        let max = if negative { -largest } else { largest };
        result = match mode {
            Round::Down if !negative => max,
            Round::Up if negative => max,
            Round::Zero => max,
            _ => inf,
        };
        return Ok(result);
    }

    // Smallest normal value: 2^(-2^(width-1)+2).
    let mut smallest = Float::with_val(prec, 1u32);
    smallest >>= emax - 2;
    if result.clone().abs() < smallest {
        // Subnormal: round to an integer multiple of the subnormal ulp.
        let shift = (emax - 3) + prec;
        let mut scaled = Float::with_val(x.prec(), x);
        scaled <<= shift;
        let Some((int, _)) = scaled.to_integer_round(mode) else {
            return Ok(result);
        };
        result = Float::with_val(prec, int);
        result >>= shift;
    }
    Ok(result)
}

/// Round `x` to the unevaluated sum of `parts` doubles.
fn round_to_expansion(x: &Float, parts: u32, mode: Round) -> Float {
    let work = x.prec().max(53 * parts);
    if x.is_zero() || !x.is_finite() {
        return Float::with_val(work, x);
    }
    let mut rest = Float::with_val(work, x);
    let mut acc = Float::with_val(work, 0u32);
    let mut last = Float::with_val(53, 0u32);
    for i in 0..parts {
        let component_mode = if i + 1 == parts { mode } else { Round::Nearest };
        last = Format::Double.round(&rest, component_mode);
        acc = Float::with_val_round(work, &acc + &last, Round::Nearest).0;
        rest = Float::with_val_round(work, x - &acc, Round::Nearest).0;
        if rest.is_zero() {
            break;
        }
    }

    // The last component was rounded in the requested direction, but the
    // earlier ones may still leave the sum on the wrong side.
    let misdirected = match mode {
        Round::Up => acc < *x,
        Round::Down => acc > *x,
        Round::Zero => acc.clone().abs() > x.clone().abs(),
        _ => false,
    };
    if misdirected {
        let mut adjusted = last.clone();
        let up = match mode {
            Round::Up => true,
            Round::Down => false,
            _ => x.is_sign_negative(),
        };
        if up {
            adjusted.next_up();
        } else {
            adjusted.next_down();
        }
        acc = Float::with_val_round(work, &acc - &last, Round::Nearest).0;
        acc = Float::with_val_round(work, &acc + &adjusted, Round::Nearest).0;
    }
    acc
}

#[cfg(test)]
mod tests;
