//! Tree simplification.
//!
//! [`simplify_safe`] only applies rewrites that keep the value exactly:
//! folding of operations on constants whose result is representable,
//! neutral elements, double negation. [`simplify`] additionally replaces
//! constant subexpressions by faithful approximations.

use std::sync::Arc;

use sol_ir::{BinaryOp, Thing, UnaryFn};
use sol_num::literal::{convert_binary, convert_dyadic};
use sol_num::{Float, Round};

use super::exact::{exact_value, rational_to_float};
use super::faithful::{approximate, Approximation};
use super::enclosure::NoProcedures;
use crate::stack::ensure_sufficient_stack;

fn is_zero(t: &Thing) -> bool {
    t.as_constant().is_some_and(Float::is_zero)
}

fn is_one(t: &Thing) -> bool {
    t.as_constant().is_some_and(|c| *c == 1)
}

/// Exact folding of `a op b` when the result is a float.
fn fold_constants(op: BinaryOp, a: &Float, b: &Float) -> Option<Float> {
    let expr = Thing::binary(op, Thing::Constant(a.clone()), Thing::Constant(b.clone()));
    let value = exact_value(&expr)?;
    rational_to_float(&value)
}

/// Rebuild `a op b`, folding where exact.
pub fn fold_binary(op: BinaryOp, a: Thing, b: Thing) -> Thing {
    if let (Some(x), Some(y)) = (a.as_constant(), b.as_constant()) {
        if let Some(folded) = fold_constants(op, x, y) {
            return Thing::Constant(folded);
        }
    }
    match op {
        BinaryOp::Add if is_zero(&a) => b,
        BinaryOp::Add | BinaryOp::Sub if is_zero(&b) => a,
        BinaryOp::Sub if is_zero(&a) => fold_unary(UnaryFn::Neg, b),
        BinaryOp::Mul if is_one(&a) => b,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow if is_one(&b) => a,
        _ => Thing::binary(op, a, b),
    }
}

/// Rebuild `func(a)`, folding where exact.
pub fn fold_unary(func: UnaryFn, a: Thing) -> Thing {
    if let Thing::Unary {
        func: UnaryFn::Neg,
        arg,
    } = &a
    {
        if func == UnaryFn::Neg {
            return (**arg).clone();
        }
    }
    if let Some(c) = a.as_constant() {
        let folded = match func {
            UnaryFn::Neg => Some(-c.clone()),
            UnaryFn::Abs => Some(c.clone().abs()),
            UnaryFn::Ceil => Some(c.clone().ceil()),
            UnaryFn::Floor => Some(c.clone().floor()),
            UnaryFn::NearestInt => Some(c.clone().round_even()),
            _ => exact_value(&Thing::unary(func, a.clone())).and_then(|v| rational_to_float(&v)),
        };
        if let Some(folded) = folded.filter(|f| !f.is_nan()) {
            return Thing::Constant(folded);
        }
    }
    Thing::unary(func, a)
}

fn literal_constant(converted: Result<sol_num::literal::Converted, sol_num::NumError>, original: &Thing) -> Thing {
    converted.map_or_else(|_| original.clone(), |c| Thing::Constant(c.value))
}

/// Simplify without changing the value.
pub fn simplify_safe(tree: &Thing) -> Thing {
    ensure_sufficient_stack(|| match tree {
        Thing::Binary { op, lhs, rhs } => fold_binary(*op, simplify_safe(lhs), simplify_safe(rhs)),
        Thing::Unary { func, arg } => fold_unary(*func, simplify_safe(arg)),
        Thing::RoundTo { format, arg } => {
            let arg = simplify_safe(arg);
            match arg.as_constant() {
                Some(c) => Thing::Constant(format.round(c, Round::Nearest)),
                None => Thing::RoundTo {
                    format: *format,
                    arg: Box::new(arg),
                },
            }
        }
        Thing::LibraryFunction {
            function,
            derivative,
            arg,
        } => Thing::LibraryFunction {
            function: Arc::clone(function),
            derivative: *derivative,
            arg: Box::new(simplify_safe(arg)),
        },
        Thing::ProcedureFunction {
            procedure,
            derivative,
            arg,
        } => Thing::ProcedureFunction {
            procedure: Arc::clone(procedure),
            derivative: *derivative,
            arg: Box::new(simplify_safe(arg)),
        },
        Thing::DyadicConstant(text) => literal_constant(convert_dyadic(text), tree),
        Thing::BinaryConstant(text) => literal_constant(convert_binary(text), tree),
        other => other.clone(),
    })
}

/// Simplify, rounding constant subexpressions to `prec` bits.
///
/// Subexpressions that cannot be approximated faithfully are kept.
pub fn simplify(tree: &Thing, prec: u32) -> Thing {
    round_constants(&simplify_safe(tree), prec)
}

fn round_constants(tree: &Thing, prec: u32) -> Thing {
    if tree.is_constant_expression() && !matches!(tree, Thing::Constant(_)) {
        return match approximate(tree, prec, &mut NoProcedures) {
            Ok(Approximation::Exact(c) | Approximation::Faithful(c)) => Thing::Constant(c),
            _ => tree.clone(),
        };
    }
    match tree {
        Thing::Binary { op, lhs, rhs } => {
            fold_binary(*op, round_constants(lhs, prec), round_constants(rhs, prec))
        }
        Thing::Unary { func, arg } => fold_unary(*func, round_constants(arg, prec)),
        Thing::RoundTo { format, arg } => Thing::RoundTo {
            format: *format,
            arg: Box::new(round_constants(arg, prec)),
        },
        Thing::LibraryFunction {
            function,
            derivative,
            arg,
        } => Thing::LibraryFunction {
            function: Arc::clone(function),
            derivative: *derivative,
            arg: Box::new(round_constants(arg, prec)),
        },
        Thing::ProcedureFunction {
            procedure,
            derivative,
            arg,
        } => Thing::ProcedureFunction {
            procedure: Arc::clone(procedure),
            derivative: *derivative,
            arg: Box::new(round_constants(arg, prec)),
        },
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn x() -> Thing {
        Thing::FreeVariable
    }

    #[test]
    fn exact_folding_of_integers() {
        let t = Thing::binary(BinaryOp::Add, Thing::integer(1), Thing::integer(2));
        assert_eq!(simplify_safe(&t), Thing::integer(3));
    }

    #[test]
    fn inexact_division_is_kept() {
        let t = Thing::binary(BinaryOp::Div, Thing::integer(1), Thing::integer(3));
        assert_eq!(simplify_safe(&t), t);
        let half = Thing::binary(BinaryOp::Div, Thing::integer(1), Thing::integer(2));
        assert_eq!(simplify_safe(&half), Thing::Constant(Float::with_val(53, 0.5)));
    }

    #[test]
    fn neutral_elements_disappear() {
        let t = Thing::binary(
            BinaryOp::Mul,
            Thing::integer(1),
            Thing::binary(BinaryOp::Add, x(), Thing::integer(0)),
        );
        assert_eq!(simplify_safe(&t), x());
    }

    #[test]
    fn multiplication_by_zero_is_not_collapsed() {
        let t = Thing::binary(BinaryOp::Mul, Thing::integer(0), Thing::unary(UnaryFn::Log, x()));
        assert_eq!(simplify_safe(&t), t);
    }

    #[test]
    fn double_negation() {
        let t = Thing::unary(UnaryFn::Neg, Thing::unary(UnaryFn::Neg, x()));
        assert_eq!(simplify_safe(&t), x());
    }

    #[test]
    fn special_values_fold() {
        let t = Thing::unary(UnaryFn::Exp, Thing::integer(0));
        assert_eq!(simplify_safe(&t).as_integer(), Some(1));
    }

    #[test]
    fn rounding_simplify_approximates_constants() {
        let t = Thing::binary(BinaryOp::Add, x(), Thing::unary(UnaryFn::Sqrt, Thing::integer(2)));
        let s = simplify(&t, 53);
        let Thing::Binary { rhs, .. } = s else {
            panic!("expected a sum, got {s:?}");
        };
        let c = rhs.as_constant().unwrap_or_else(|| panic!("constant expected"));
        assert_eq!(c.to_f64(), 2f64.sqrt());
    }
}
