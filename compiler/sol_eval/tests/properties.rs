//! Properties of range evaluation, comparison and faithful evaluation.

use proptest::prelude::*;
use rug::ops::Pow;
use sol_eval::eval::exact::exact_compare;
use sol_eval::eval::{approximate, fast_compare, Approximation, NoProcedures};
use sol_eval::{silent_handler, Interpreter};
use sol_ir::{BinaryOp, Thing, UnaryFn};
use sol_num::{Float, Interval, Round};

const POINT_PREC: u32 = 512;

fn positive_range(a: f64, b: f64) -> Interval {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    Interval::new(Float::with_val(53, lo), Float::with_val(53, hi))
        .unwrap_or_else(|e| panic!("{e}"))
}

fn sample(i: &Interval, t: f64) -> Float {
    let p = Float::with_val(POINT_PREC, i.lo() + Float::with_val(POINT_PREC, i.hi() - i.lo()) * t);
    if p > *i.hi() {
        i.hi().clone()
    } else {
        p
    }
}

/// Evaluate `thing`, which must reduce to a range.
fn evaluate_range(thing: &Thing) -> Interval {
    let mut interp = Interpreter::builder().print_handler(silent_handler()).build();
    match interp.evaluate(thing) {
        Ok(Thing::Range(r)) => r,
        other => panic!("expected a range, got {other:?}"),
    }
}

fn brackets(r: &Interval, down: &Float, up: &Float) -> bool {
    r.lo() <= down && up <= r.hi()
}

fn binary_op() -> impl Strategy<Value = BinaryOp> {
    prop_oneof![
        Just(BinaryOp::Add),
        Just(BinaryOp::Sub),
        Just(BinaryOp::Mul),
        Just(BinaryOp::Div),
        Just(BinaryOp::Pow),
    ]
}

/// Rational constant expressions `p / q`, exact by construction.
fn fraction() -> impl Strategy<Value = Thing> {
    (-1000i64..1000, 1i64..50).prop_map(|(p, q)| {
        Thing::binary(BinaryOp::Div, Thing::integer(p), Thing::integer(q))
    })
}

fn sum_of_fractions() -> impl Strategy<Value = Thing> {
    prop_oneof![
        fraction(),
        (fraction(), fraction()).prop_map(|(a, b)| Thing::binary(BinaryOp::Add, a, b)),
        (fraction(), fraction()).prop_map(|(a, b)| Thing::binary(BinaryOp::Mul, a, b)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn fast_comparison_agrees_with_exact_comparison(a in sum_of_fractions(), b in sum_of_fractions()) {
        let fast = fast_compare(&a, &b, &mut NoProcedures)
            .unwrap_or_else(|e| panic!("{e}"));
        let exact = exact_compare(&a, &b);
        if let (Some(fast), Some(exact)) = (fast, exact) {
            prop_assert_eq!(fast, exact);
        }
    }

    #[test]
    fn evaluated_range_operations_enclose_points(
        op in binary_op(),
        a in 0.01f64..20.0, b in 0.01f64..20.0,
        c in 0.01f64..4.0, d in 0.01f64..4.0,
        s in 0.0f64..=1.0, t in 0.0f64..=1.0,
    ) {
        let x = positive_range(a, b);
        let y = positive_range(c, d);
        let r = evaluate_range(&Thing::binary(op, Thing::Range(x.clone()), Thing::Range(y.clone())));
        let px = sample(&x, s);
        let py = sample(&y, t);
        let round = |dir| match op {
            BinaryOp::Add => Float::with_val_round(POINT_PREC, &px + &py, dir).0,
            BinaryOp::Sub => Float::with_val_round(POINT_PREC, &px - &py, dir).0,
            BinaryOp::Mul => Float::with_val_round(POINT_PREC, &px * &py, dir).0,
            BinaryOp::Div => Float::with_val_round(POINT_PREC, &px / &py, dir).0,
            BinaryOp::Pow => Float::with_val_round(POINT_PREC, (&px).pow(&py), dir).0,
        };
        let (down, up) = (round(Round::Down), round(Round::Up));
        prop_assert!(brackets(&r, &down, &up), "{:?} {:?} {:?} misses {}", x, op, y, down);
    }

    #[test]
    fn evaluated_range_functions_enclose_points(a in 0.01f64..20.0, b in 0.01f64..20.0, s in 0.0f64..=1.0) {
        let x = positive_range(a, b);
        let p = sample(&x, s);
        let log = evaluate_range(&Thing::unary(UnaryFn::Log, Thing::Range(x.clone())));
        let (down, up) = (
            Float::with_val_round(POINT_PREC, p.ln_ref(), Round::Down).0,
            Float::with_val_round(POINT_PREC, p.ln_ref(), Round::Up).0,
        );
        prop_assert!(brackets(&log, &down, &up));
        let sine = evaluate_range(&Thing::unary(UnaryFn::Sin, Thing::Range(x)));
        let (down, up) = (
            Float::with_val_round(POINT_PREC, p.sin_ref(), Round::Down).0,
            Float::with_val_round(POINT_PREC, p.sin_ref(), Round::Up).0,
        );
        prop_assert!(brackets(&sine, &down, &up));
    }

    #[test]
    fn literal_constants_are_exact(x in -1.0e12f64..1.0e12, prec in 12u32..400) {
        let value = Float::with_val(53, x);
        let approximation = approximate(&Thing::Constant(value.clone()), prec, &mut NoProcedures)
            .unwrap_or_else(|e| panic!("{e}"));
        prop_assert_eq!(approximation, Approximation::Exact(value));
    }
}
