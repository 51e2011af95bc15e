use super::*;

fn f(prec: u32, v: f64) -> Float {
    Float::with_val(prec, v)
}

#[test]
fn double_rounding_matches_hardware() {
    let third = Float::with_val(200, 1) / 3u32;
    let r = Format::Double.round(&third, Round::Nearest);
    assert_eq!(r.to_f64(), 1.0 / 3.0);
}

#[test]
fn directed_double_rounding_brackets_value() {
    let third = Float::with_val(200, 1) / 3u32;
    let down = Format::Double.round(&third, Round::Down);
    let up = Format::Double.round(&third, Round::Up);
    assert!(down < third);
    assert!(up > third);
    let mut next = down.clone();
    next.next_up();
    assert_eq!(Float::with_val(53, &next), Float::with_val(53, &up));
}

#[test]
fn single_overflow_goes_to_infinity_when_rounding_to_nearest() {
    let big = f(100, 1e39);
    let r = Format::Single.round(&big, Round::Nearest);
    assert!(r.is_infinite());
    let r = Format::Single.round(&big, Round::Zero);
    assert_eq!(r.to_f64(), f64::from(f32::MAX));
}

#[test]
fn half_precision_subnormals_are_quantized() {
    // Smallest half-precision subnormal is 2^-24.
    let mut tiny = Float::with_val(100, 1);
    tiny >>= 25u32;
    let r = Format::HalfPrecision.round(&tiny, Round::Up);
    let mut expected = Float::with_val(100, 1);
    expected >>= 24u32;
    assert_eq!(r, expected);
    let r = Format::HalfPrecision.round(&tiny, Round::Down);
    assert!(r.is_zero());
}

#[test]
fn double_double_keeps_more_bits_than_double() {
    let third = Float::with_val(300, 1) / 3u32;
    let dd = Format::DoubleDouble.round(&third, Round::Nearest);
    let d = Format::Double.round(&third, Round::Nearest);
    let err_dd = Float::with_val(300, &dd - &third).abs();
    let err_d = Float::with_val(300, &d - &third).abs();
    assert!(err_dd < err_d);
    assert!(Format::DoubleDouble.represents(&dd));
}

#[test]
fn directed_triple_double_is_on_the_requested_side() {
    let third = Float::with_val(400, 1) / 3u32;
    let up = Format::TripleDouble.round(&third, Round::Up);
    let down = Format::TripleDouble.round(&third, Round::Down);
    assert!(up >= third);
    assert!(down <= third);
}

#[test]
fn zero_and_infinities_pass_through() {
    let zero = f(53, 0.0);
    assert!(Format::Quad.round(&zero, Round::Up).is_zero());
    let inf = Float::with_val(53, rug::float::Special::Infinity);
    assert!(Format::Double.round(&inf, Round::Nearest).is_infinite());
}

#[test]
fn precision_rounding_reports_direction() {
    let third = Float::with_val(200, 1) / 3u32;
    let (_, dir) = round_to_precision(&third, 20, Round::Up);
    assert_eq!(dir, Ordering::Greater);
    let (exact, dir) = round_to_precision(&f(53, 0.5), 20, Round::Up);
    assert_eq!(dir, Ordering::Equal);
    assert_eq!(exact.to_f64(), 0.5);
}
