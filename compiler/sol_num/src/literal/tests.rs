use super::*;

#[test]
fn short_exact_decimal_keeps_digit_precision() {
    let c = convert_decimal("0.5", 165, Round::Nearest).unwrap_or_else(|e| panic!("{e}"));
    assert!(c.exact);
    assert_eq!(c.value.prec(), 53);
    assert_eq!(c.value.to_f64(), 0.5);
}

#[test]
fn long_exact_decimal_gets_four_bits_per_digit() {
    // 2^-20, written with 21 digit characters.
    let text = "0.00000095367431640625";
    let c = convert_decimal(text, 165, Round::Nearest).unwrap_or_else(|e| panic!("{e}"));
    assert!(c.exact);
    assert_eq!(c.value.prec(), 4 * 21);
}

#[test]
fn inexact_decimal_uses_working_precision() {
    let c = convert_decimal("0.1", 165, Round::Nearest).unwrap_or_else(|e| panic!("{e}"));
    assert!(!c.exact);
    assert_eq!(c.value.prec(), 165);
}

#[test]
fn directed_rounding_brackets_the_literal() {
    let lo = convert_decimal("0.1", 60, Round::Down).unwrap_or_else(|e| panic!("{e}"));
    let hi = convert_decimal("0.1", 60, Round::Up).unwrap_or_else(|e| panic!("{e}"));
    assert!(lo.value < hi.value);
}

#[test]
fn malformed_decimals_are_rejected() {
    for text in ["", ".", "1.2.3", "1e", "abc", "1e+x"] {
        assert!(convert_decimal(text, 53, Round::Nearest).is_err(), "{text}");
    }
}

#[test]
fn dyadic_literals_are_exact() {
    let c = convert_dyadic("3b-2").unwrap_or_else(|e| panic!("{e}"));
    assert!(c.exact);
    assert_eq!(c.value.to_f64(), 0.75);
}

#[test]
fn binary_literals_are_exact() {
    let c = convert_binary("-101.01_2").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(c.value.to_f64(), -5.25);
    assert!(convert_binary("102_2").is_err());
}
