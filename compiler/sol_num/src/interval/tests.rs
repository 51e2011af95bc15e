use super::*;

fn iv(lo: f64, hi: f64) -> Interval {
    Interval::new(Float::with_val(53, lo), Float::with_val(53, hi)).unwrap_or_else(|e| panic!("{e}"))
}

fn bounds(i: &Interval) -> (f64, f64) {
    (i.lo().to_f64(), i.hi().to_f64())
}

#[test]
fn one_plus_unit_interval_is_exact() {
    let one = Interval::point(&Float::with_val(53, 1));
    let r = one.add(&iv(0.0, 1.0), 165);
    assert_eq!(bounds(&r), (1.0, 2.0));
}

#[test]
fn inverted_bounds_are_rejected() {
    let r = Interval::new(Float::with_val(53, 2), Float::with_val(53, 1));
    assert_eq!(r, Err(NumError::EmptyInterval));
}

#[test]
fn multiplication_takes_all_corners() {
    let r = iv(-2.0, 3.0).mul(&iv(-1.0, 4.0), 53);
    assert_eq!(bounds(&r), (-8.0, 12.0));
}

#[test]
fn division_by_interval_containing_zero_is_entire() {
    let r = iv(1.0, 2.0).div(&iv(-1.0, 1.0), 53);
    assert!(r.lo().is_infinite() && r.hi().is_infinite());
}

#[test]
fn division_by_exact_zero_is_undefined() {
    let r = iv(1.0, 2.0).div(&iv(0.0, 0.0), 53);
    assert!(r.is_undefined());
}

#[test]
fn division_rounds_outward() {
    let r = iv(1.0, 1.0).div(&iv(3.0, 3.0), 53);
    assert!(r.lo() < r.hi());
    let third = Float::with_val(200, 1) / 3u32;
    assert!(r.contains(&third));
}

#[test]
fn even_power_of_straddling_interval_starts_at_zero() {
    let r = iv(-2.0, 1.0).pow(&iv(2.0, 2.0), 53);
    assert_eq!(bounds(&r), (0.0, 4.0));
}

#[test]
fn odd_power_keeps_sign() {
    let r = iv(-2.0, 1.0).pow(&iv(3.0, 3.0), 53);
    assert_eq!(bounds(&r), (-8.0, 1.0));
}

#[test]
fn fractional_power_of_negative_base_is_undefined() {
    let r = iv(-2.0, 1.0).pow(&iv(0.5, 0.5), 53);
    assert!(r.is_undefined());
}

#[test]
fn log_outside_domain_is_undefined() {
    assert!(iv(-1.0, 1.0).log(53).is_undefined());
    let r = iv(1.0, 1.0).log(53);
    assert_eq!(bounds(&r), (0.0, 0.0));
}

#[test]
fn sine_over_a_peak_reaches_one() {
    let r = iv(1.0, 2.0).sin(53);
    assert_eq!(r.hi().to_f64(), 1.0);
    assert!(r.lo().to_f64() <= 1f64.sin());
}

#[test]
fn cosine_over_a_full_period_is_unit_interval() {
    let r = iv(0.0, 7.0).cos(53);
    assert_eq!(bounds(&r), (-1.0, 1.0));
}

#[test]
fn tangent_across_a_pole_is_entire() {
    let r = iv(1.0, 2.0).tan(53);
    assert!(r.lo().is_infinite());
}

#[test]
fn cosh_straddling_zero_has_minimum_one() {
    let r = iv(-1.0, 2.0).cosh(53);
    assert_eq!(r.lo().to_f64(), 1.0);
    assert!(r.hi().to_f64() >= 2f64.cosh());
}

#[test]
fn decreasing_functions_swap_endpoints() {
    let r = iv(0.0, 1.0).acos(53);
    assert_eq!(r.lo().to_f64(), 0.0);
    assert!(r.hi().to_f64() >= std::f64::consts::FRAC_PI_2);
}

#[test]
fn nearest_int_ties_to_even() {
    let r = iv(2.5, 3.5).nearest_int(53);
    assert_eq!(bounds(&r), (2.0, 4.0));
}

#[test]
fn undefined_propagates() {
    let u = Interval::undefined(53);
    assert!(u.add(&iv(0.0, 1.0), 53).is_undefined());
    assert!(u.sin(53).is_undefined());
    assert!(u.hull(&iv(0.0, 1.0)).is_undefined());
}

#[test]
fn sign_and_containment() {
    assert_eq!(iv(1.0, 2.0).sign(), Some(Ordering::Greater));
    assert_eq!(iv(-2.0, -1.0).sign(), Some(Ordering::Less));
    assert_eq!(iv(-1.0, 1.0).sign(), None);
    assert!(iv(-1.0, 1.0).contains_zero());
    assert!(iv(0.0, 1.0).strictly_below(&iv(2.0, 3.0)));
    assert!(!iv(0.0, 2.0).strictly_below(&iv(2.0, 3.0)));
}

#[test]
fn format_rounding_of_interval_is_outward() {
    let third = Float::with_val(200, 1) / 3u32;
    let r = Interval::point(&third).round_format(Format::Single);
    assert!(r.contains(&Float::with_val(53, 1.0f32 / 3.0)));
}

#[test]
fn midpoint_of_bounded_interval() {
    assert_eq!(iv(1.0, 2.0).midpoint(53).to_f64(), 1.5);
}
