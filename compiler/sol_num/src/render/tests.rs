use pretty_assertions::assert_eq;

use super::*;

fn f(v: f64) -> Float {
    Float::with_val(53, v)
}

#[test]
fn integers_print_without_fraction() {
    assert_eq!(render(&f(3.0), DisplayMode::Decimal), "3");
    assert_eq!(render(&f(-42.0), DisplayMode::Decimal), "-42");
}

#[test]
fn decimal_is_shortest_round_trip() {
    assert_eq!(render(&f(0.1), DisplayMode::Decimal), "0.1");
    assert_eq!(render(&f(1.5), DisplayMode::Decimal), "1.5");
    assert_eq!(render(&f(-0.00125), DisplayMode::Decimal), "-0.00125");
}

#[test]
fn tiny_and_huge_values_use_scientific_notation() {
    assert_eq!(render(&f(1.5e-10), DisplayMode::Decimal), "1.5e-10");
    assert_eq!(render(&f(2.5e30), DisplayMode::Decimal), "2.5e30");
}

#[test]
fn specials() {
    let nan = Float::with_val(53, rug::float::Special::Nan);
    let inf = Float::with_val(53, rug::float::Special::NegInfinity);
    assert_eq!(render(&nan, DisplayMode::Decimal), "NaN");
    assert_eq!(render(&inf, DisplayMode::Dyadic), "-infty");
    assert_eq!(render(&f(0.0), DisplayMode::Binary), "0");
}

#[test]
fn dyadic_and_powers() {
    assert_eq!(render(&f(0.75), DisplayMode::Dyadic), "3b-2");
    assert_eq!(render(&f(0.75), DisplayMode::Powers), "3 * 2^(-2)");
    assert_eq!(render(&f(12.0), DisplayMode::Dyadic), "3b2");
    assert_eq!(render(&f(5.0), DisplayMode::Powers), "5");
}

#[test]
fn binary_and_hexadecimal() {
    assert_eq!(render(&f(5.0), DisplayMode::Binary), "1.01_2 * 2^(2)");
    assert_eq!(render(&f(3.0), DisplayMode::Hexadecimal), "0x1.8p+1");
    assert_eq!(render(&f(-0.5), DisplayMode::Hexadecimal), "-0x1p-1");
}

#[test]
fn intervals() {
    let r = Interval::new(f(1.0), f(2.0)).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(render_interval(&r, DisplayMode::Decimal, false), "[1;2]");
}

#[test]
fn midpoint_mode_factors_common_prefix() {
    let r = Interval::new(f(1.234), f(1.235)).unwrap_or_else(|e| panic!("{e}"));
    let s = render_interval(&r, DisplayMode::Decimal, true);
    assert!(s.starts_with("1.23~"), "{s}");
}
