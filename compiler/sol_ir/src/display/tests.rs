use pretty_assertions::assert_eq;

use super::*;
use crate::{Name, Structure};
use sol_num::{Float, Interval};

fn x() -> Thing {
    Thing::FreeVariable
}

#[test]
fn expression_parenthesization() {
    let f = Thing::binary(
        BinaryOp::Mul,
        Thing::binary(BinaryOp::Add, x(), Thing::integer(1)),
        Thing::unary(UnaryFn::Sin, x()),
    );
    let opts = RenderOptions {
        free_variable: Some("x"),
        ..RenderOptions::default()
    };
    assert_eq!(f.render(&opts), "(x + 1) * sin(x)");
}

#[test]
fn left_associative_subtraction_keeps_right_parentheses() {
    let f = Thing::binary(
        BinaryOp::Sub,
        Thing::integer(1),
        Thing::binary(BinaryOp::Sub, Thing::integer(2), Thing::integer(3)),
    );
    assert_eq!(f.to_string(), "1 - (2 - 3)");
}

#[test]
fn unbound_free_variable_renders_placeholder() {
    assert_eq!(x().to_string(), "_x_");
}

#[test]
fn lists_and_elliptic_lists() {
    let l = Thing::List(vec![Thing::integer(1), Thing::integer(2)]);
    assert_eq!(l.to_string(), "[|1, 2|]");
    let e = Thing::FinalEllipticList(vec![Thing::integer(1), Thing::integer(2)]);
    assert_eq!(e.to_string(), "[|1, 2...|]");
    assert_eq!(Thing::List(vec![]).to_string(), "[||]");
}

#[test]
fn structures_render_fields_in_order() {
    let mut s = Structure::new();
    s.set(Name::new("a"), Thing::integer(1));
    s.set(Name::new("b"), Thing::Str("hi".into()));
    assert_eq!(Thing::Structure(s).to_string(), "{ .a = 1, .b = hi }");
}

#[test]
fn ranges_follow_display_mode() {
    let r = Interval::new(Float::with_val(53, 0.75), Float::with_val(53, 1)).unwrap_or_else(|e| panic!("{e}"));
    let opts = RenderOptions {
        mode: DisplayMode::Dyadic,
        ..RenderOptions::default()
    };
    assert_eq!(Thing::Range(r).render(&opts), "[3b-2;1]");
}

#[test]
fn negative_base_is_parenthesized_under_power() {
    let f = Thing::binary(BinaryOp::Pow, Thing::integer(-2), Thing::integer(2));
    assert_eq!(f.to_string(), "(-2) ^ 2");
}
