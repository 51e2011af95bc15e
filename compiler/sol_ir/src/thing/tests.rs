use pretty_assertions::assert_eq;

use super::*;

fn x() -> Thing {
    Thing::FreeVariable
}

#[test]
fn pure_tree_classification() {
    let f = Thing::binary(BinaryOp::Add, Thing::unary(UnaryFn::Sin, x()), Thing::integer(1));
    assert!(f.is_pure_tree());
    assert!(!f.is_constant_expression());

    let c = Thing::binary(BinaryOp::Mul, Thing::Pi, Thing::integer(2));
    assert!(c.is_constant_expression());

    let mixed = Thing::binary(BinaryOp::Add, x(), Thing::Str("a".into()));
    assert!(!mixed.is_pure_tree());
    assert!(!mixed.is_correctly_typed());
}

#[test]
fn flags_summarize_the_tree() {
    let f = Thing::RoundTo {
        format: Format::Double,
        arg: Box::new(Thing::unary(UnaryFn::Floor, x())),
    };
    let flags = f.tree_flags();
    assert!(flags.contains(TreeFlags::FREE_VARIABLE | TreeFlags::ROUNDING | TreeFlags::STEP));
    assert!(!flags.contains(TreeFlags::LIBRARY));
}

#[test]
fn lists_are_correctly_typed_when_elements_are() {
    let good = Thing::List(vec![Thing::integer(1), Thing::Boolean(true)]);
    assert!(good.is_correctly_typed());
    let bad = Thing::List(vec![Thing::ident("a")]);
    assert!(!bad.is_correctly_typed());
}

#[test]
fn structure_rejects_duplicate_fields() {
    let fields = vec![
        (Name::new("a"), Thing::integer(1)),
        (Name::new("b"), Thing::integer(2)),
        (Name::new("a"), Thing::integer(3)),
    ];
    assert_eq!(Structure::from_fields(fields), Err(Name::new("a")));
}

#[test]
fn structure_set_replaces_or_appends() {
    let mut s = Structure::new();
    s.set(Name::new("a"), Thing::integer(1));
    s.set(Name::new("b"), Thing::integer(2));
    s.set(Name::new("a"), Thing::integer(3));
    assert_eq!(s.len(), 2);
    assert_eq!(s.get("a"), Some(&Thing::integer(3)));
}

#[test]
fn substitution_composes() {
    let f = Thing::unary(UnaryFn::Exp, x());
    let g = Thing::binary(BinaryOp::Add, x(), Thing::integer(1));
    let composed = f.substitute(&g);
    assert_eq!(composed, Thing::unary(UnaryFn::Exp, g));
}

#[test]
fn tree_size_counts_nodes() {
    let f = Thing::binary(BinaryOp::Add, Thing::unary(UnaryFn::Sin, x()), Thing::integer(1));
    assert_eq!(f.tree_size(), 4);
}

#[test]
fn clones_do_not_alias() {
    let original = Thing::List(vec![Thing::integer(1), Thing::Str("s".into())]);
    let mut copy = original.clone();
    if let Thing::List(items) = &mut copy {
        items.push(Thing::Unit);
    }
    assert_eq!(original, Thing::List(vec![Thing::integer(1), Thing::Str("s".into())]));
    assert_ne!(original, copy);
}

#[test]
fn integer_extraction() {
    assert_eq!(Thing::integer(-7).as_integer(), Some(-7));
    assert_eq!(Thing::Constant(Float::with_val(53, 0.5)).as_integer(), None);
}
