//! Conversion of numeric literals to floats.
//!
//! Decimal literals are first tried at a precision proportional to their
//! digit count: `max(DECIMAL_MIN_PRECISION, DECIMAL_DIGIT_FACTOR * digits)`.
//! If the value is representable there it is kept exactly; otherwise it is
//! rounded at the caller's working precision and reported as inexact.

use std::cmp::Ordering;

use rug::float::Round;
use rug::{Float, Integer};

use crate::{clamp_precision, NumError, MIN_PRECISION};

/// Bits tried per decimal digit.
pub const DECIMAL_DIGIT_FACTOR: u32 = 4;

/// Floor of the digit-based precision.
pub const DECIMAL_MIN_PRECISION: u32 = 53;

/// A literal converted to a float.
#[derive(Clone, Debug, PartialEq)]
pub struct Converted {
    pub value: Float,
    /// The value equals the literal exactly.
    pub exact: bool,
}

/// Number of significant digit characters in a decimal literal.
fn digit_count(text: &str) -> usize {
    let mantissa = text.split(['e', 'E']).next().unwrap_or(text);
    mantissa.chars().filter(char::is_ascii_digit).count()
}

fn validate_decimal(text: &str) -> Result<(), NumError> {
    let invalid = || NumError::InvalidLiteral {
        text: text.to_string(),
    };
    let body = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };
    let mut dots = 0;
    let mut digits = 0;
    for c in mantissa.chars() {
        match c {
            '.' => dots += 1,
            c if c.is_ascii_digit() => digits += 1,
            _ => return Err(invalid()),
        }
    }
    if digits == 0 || dots > 1 {
        return Err(invalid());
    }
    if let Some(exp) = exponent {
        let exp = exp.strip_prefix(['-', '+']).unwrap_or(exp);
        if exp.is_empty() || !exp.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
    }
    Ok(())
}

fn round_decimal(text: &str, prec: u32, mode: Round) -> Result<(Float, Ordering), NumError> {
    let parsed = Float::parse(text).map_err(|_| NumError::InvalidLiteral {
        text: text.to_string(),
    })?;
    Ok(Float::with_val_round(prec, parsed, mode))
}

/// Convert a decimal literal such as `0.1` or `-3.25e-7`.
///
/// `working_prec` is used only when the digit-based precision cannot hold
/// the value exactly.
pub fn convert_decimal(text: &str, working_prec: u32, mode: Round) -> Result<Converted, NumError> {
    validate_decimal(text)?;
    let digits = u32::try_from(digit_count(text)).unwrap_or(u32::MAX);
    let tentative = clamp_precision(
        digits
            .saturating_mul(DECIMAL_DIGIT_FACTOR)
            .max(DECIMAL_MIN_PRECISION),
    );
    let (value, dir) = round_decimal(text, tentative, mode)?;
    if dir == Ordering::Equal {
        return Ok(Converted { value, exact: true });
    }
    let (value, dir) = round_decimal(text, clamp_precision(working_prec), mode)?;
    Ok(Converted {
        value,
        exact: dir == Ordering::Equal,
    })
}

/// Convert a dyadic literal `m b e` denoting `m * 2^e`, e.g. `3b-2`.
///
/// Dyadic literals are always exact: the precision is the bit length of
/// the mantissa.
pub fn convert_dyadic(text: &str) -> Result<Converted, NumError> {
    let invalid = || NumError::InvalidLiteral {
        text: text.to_string(),
    };
    let (mantissa, exponent) = text.split_once(['b', 'B']).ok_or_else(invalid)?;
    let m: Integer = mantissa.parse().map_err(|_| invalid())?;
    let e: i32 = exponent.parse().map_err(|_| invalid())?;
    let bits = m.significant_bits().max(MIN_PRECISION);
    let mut value = Float::with_val(bits, &m);
    value <<= e;
    Ok(Converted { value, exact: true })
}

/// Convert a binary literal such as `101.01_2`.
pub fn convert_binary(text: &str) -> Result<Converted, NumError> {
    let invalid = || NumError::InvalidLiteral {
        text: text.to_string(),
    };
    let body = text.strip_suffix("_2").ok_or_else(invalid)?;
    let (negative, body) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    let all = format!("{int_part}{frac_part}");
    if all.is_empty() || !all.chars().all(|c| c == '0' || c == '1') {
        return Err(invalid());
    }
    let m = Integer::from_str_radix(&all, 2).map_err(|_| invalid())?;
    let bits = m.significant_bits().max(MIN_PRECISION);
    let mut value = Float::with_val(bits, &m);
    let shift = i32::try_from(frac_part.len()).map_err(|_| invalid())?;
    value >>= shift;
    if negative {
        value = -value;
    }
    Ok(Converted { value, exact: true })
}

#[cfg(test)]
mod tests;
