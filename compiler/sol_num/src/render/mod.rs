//! Textual rendering of constants and intervals.

use rug::float::Round;
use rug::Float;

use crate::Interval;

/// How constants are written out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Shortest decimal string that reads back to the same value.
    #[default]
    Decimal,
    /// `m b e`, meaning `m * 2^e` with `m` odd.
    Dyadic,
    /// `m * 2^(e)`.
    Powers,
    /// `1.0101_2 * 2^(e)`.
    Binary,
    /// C99 hexadecimal floating-point.
    Hexadecimal,
}

impl DisplayMode {
    pub fn keyword(self) -> &'static str {
        match self {
            DisplayMode::Decimal => "decimal",
            DisplayMode::Dyadic => "dyadic",
            DisplayMode::Powers => "powers",
            DisplayMode::Binary => "binary",
            DisplayMode::Hexadecimal => "hexadecimal",
        }
    }
}

/// Integers up to this many bits are printed in full in decimal mode.
const MAX_INTEGER_BITS: i32 = 64;

/// Positional notation is used while the decimal exponent stays in this range.
const POSITIONAL_EXP_MIN: i32 = -5;
const POSITIONAL_EXP_MAX: i32 = 21;

fn special(x: &Float) -> Option<String> {
    if x.is_nan() {
        return Some("NaN".to_string());
    }
    if x.is_infinite() {
        return Some(if x.is_sign_negative() { "-infty" } else { "infty" }.to_string());
    }
    if x.is_zero() {
        return Some("0".to_string());
    }
    None
}

/// Render a constant.
pub fn render(x: &Float, mode: DisplayMode) -> String {
    if let Some(s) = special(x) {
        return s;
    }
    match mode {
        DisplayMode::Decimal => decimal(x),
        DisplayMode::Dyadic => {
            let (m, e) = odd_mantissa(x);
            if e == 0 {
                m.to_string()
            } else {
                format!("{m}b{e}")
            }
        }
        DisplayMode::Powers => {
            let (m, e) = odd_mantissa(x);
            if e == 0 {
                m.to_string()
            } else {
                format!("{m} * 2^({e})")
            }
        }
        DisplayMode::Binary => {
            let (negative, rest, exp) = binary_digits(x);
            let sign = if negative { "-" } else { "" };
            let frac = if rest.is_empty() {
                String::new()
            } else {
                format!(".{rest}")
            };
            format!("{sign}1{frac}_2 * 2^({exp})")
        }
        DisplayMode::Hexadecimal => {
            let (negative, mut rest, exp) = binary_digits(x);
            while rest.len() % 4 != 0 {
                rest.push('0');
            }
            let hex: String = rest
                .as_bytes()
                .chunks(4)
                .map(|nibble| {
                    let v = nibble.iter().fold(0u32, |acc, b| acc * 2 + u32::from(*b == b'1'));
                    char::from_digit(v, 16).unwrap_or('0')
                })
                .collect();
            let sign = if negative { "-" } else { "" };
            let frac = if hex.is_empty() {
                String::new()
            } else {
                format!(".{hex}")
            };
            format!("{sign}0x1{frac}p{exp:+}")
        }
    }
}

/// `x = m * 2^e` with `m` odd.
fn odd_mantissa(x: &Float) -> (rug::Integer, i32) {
    let Some((mut m, mut e)) = x.to_integer_exp() else {
        return (rug::Integer::new(), 0);
    };
    if let Some(tz) = m.find_one(0) {
        m >>= tz;
        e = e.saturating_add(i32::try_from(tz).unwrap_or(i32::MAX));
    }
    (m, e)
}

/// Sign, fraction bits after the leading one, and binary exponent of `x`.
fn binary_digits(x: &Float) -> (bool, String, i32) {
    let (negative, digits, exp) = x.to_sign_string_exp(2, None);
    let trimmed = digits.trim_end_matches('0');
    let rest = trimmed.get(1..).unwrap_or("").to_string();
    (negative, rest, exp.unwrap_or(0).saturating_sub(1))
}

fn decimal(x: &Float) -> String {
    if x.is_integer() && x.get_exp().is_some_and(|e| e <= MAX_INTEGER_BITS) {
        if let Some(n) = x.to_integer() {
            return n.to_string();
        }
    }
    let (negative, digits, exp) = shortest_digits(x);
    let body = positional(&digits, exp);
    if negative {
        format!("-{body}")
    } else {
        body
    }
}

/// Shortest digit string `d` with `x == 0.d * 10^exp` at `x`'s precision.
fn shortest_digits(x: &Float) -> (bool, String, i32) {
    // ceil(prec * log10(2)) + 1 digits always suffice.
    let max_digits = decimal_digits(x.prec()) + 1;
    for n in 1..=max_digits {
        let (negative, digits, exp) = x.to_sign_string_exp(10, Some(n));
        let exp = exp.unwrap_or(0);
        let text = format!("{}0.{digits}e{exp}", if negative { "-" } else { "" });
        if let Ok(parsed) = Float::parse(&text) {
            let (back, _) = Float::with_val_round(x.prec(), parsed, Round::Nearest);
            if back == *x {
                return (negative, digits.trim_end_matches('0').to_string(), exp);
            }
        }
    }
    let (negative, digits, exp) = x.to_sign_string_exp(10, Some(max_digits));
    (negative, digits.trim_end_matches('0').to_string(), exp.unwrap_or(0))
}

/// `ceil(prec * log10(2))`, the decimal digits carried by `prec` bits.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // small positive value
fn decimal_digits(prec: u32) -> usize {
    (f64::from(prec) * std::f64::consts::LOG10_2).ceil() as usize
}

/// Write `0.digits * 10^exp` positionally or in scientific notation.
fn positional(digits: &str, exp: i32) -> String {
    let digits = if digits.is_empty() { "0" } else { digits };
    let len = digits.len();
    if let Ok(whole) = usize::try_from(exp) {
        if whole > 0 && exp <= POSITIONAL_EXP_MAX {
            if len <= whole {
                return format!("{digits}{}", "0".repeat(whole - len));
            }
            let (int, frac) = digits.split_at(whole);
            return format!("{int}.{frac}");
        }
    }
    if exp <= 0 && exp > POSITIONAL_EXP_MIN {
        let zeros = usize::try_from(exp.unsigned_abs()).unwrap_or(0);
        return format!("0.{}{digits}", "0".repeat(zeros));
    }
    let (first, rest) = digits.split_at(1);
    let sci = exp - 1;
    if rest.is_empty() {
        format!("{first}e{sci}")
    } else {
        format!("{first}.{rest}e{sci}")
    }
}

/// Render an interval as `[lo;hi]`, or in midpoint form `1.23~4/5~` when
/// requested and the endpoints share a decimal prefix.
pub fn render_interval(range: &Interval, mode: DisplayMode, midpoint: bool) -> String {
    if midpoint && mode == DisplayMode::Decimal {
        if let Some(s) = midpoint_form(range) {
            return s;
        }
    }
    format!("[{};{}]", render(range.lo(), mode), render(range.hi(), mode))
}

fn midpoint_form(range: &Interval) -> Option<String> {
    if range.is_undefined() || !range.is_bounded() {
        return None;
    }
    if range.is_point() {
        return Some(render(range.lo(), DisplayMode::Decimal));
    }
    let n = decimal_digits(range.prec());
    let (neg_lo, d_lo, e_lo) = range.lo().to_sign_string_exp(10, Some(n));
    let (neg_hi, d_hi, e_hi) = range.hi().to_sign_string_exp(10, Some(n));
    if neg_lo != neg_hi || e_lo != e_hi || range.contains_zero() {
        return None;
    }
    let exp = e_lo?;
    let common = d_lo
        .bytes()
        .zip(d_hi.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    let common_exp = i32::try_from(common).ok()?;
    // The differing digit must fall after the decimal point.
    if common == 0 || common_exp < exp || !(POSITIONAL_EXP_MIN + 1..=POSITIONAL_EXP_MAX).contains(&exp) {
        return None;
    }
    let a = d_lo.as_bytes().get(common).map(|b| char::from(*b))?;
    let b = d_hi.as_bytes().get(common).map(|b| char::from(*b))?;
    let prefix = positional(&d_lo[..common], exp);
    let joiner = if common_exp == exp { "." } else { "" };
    let sign = if neg_lo { "-" } else { "" };
    Some(format!("{sign}{prefix}{joiner}~{a}/{b}~"))
}

#[cfg(test)]
mod tests;
