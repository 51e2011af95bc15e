//! Symbolic differentiation with respect to the free variable.

use std::sync::Arc;

use sol_ir::{BinaryOp, Thing, UnaryFn};

use super::simplify::simplify_safe;
use crate::stack::ensure_sufficient_stack;

fn int(n: i64) -> Thing {
    Thing::integer(n)
}

// Zero literals built here are derivatives of constants, so terms they
// annihilate can be dropped.
fn is_zero(t: &Thing) -> bool {
    t.as_constant().is_some_and(|c| c.is_zero())
}

fn is_one(t: &Thing) -> bool {
    t.as_constant().is_some_and(|c| *c == 1)
}

fn add(a: Thing, b: Thing) -> Thing {
    match (is_zero(&a), is_zero(&b)) {
        (true, _) => b,
        (_, true) => a,
        _ => Thing::binary(BinaryOp::Add, a, b),
    }
}

fn sub(a: Thing, b: Thing) -> Thing {
    match (is_zero(&a), is_zero(&b)) {
        (_, true) => a,
        (true, _) => neg(b),
        _ => Thing::binary(BinaryOp::Sub, a, b),
    }
}

fn mul(a: Thing, b: Thing) -> Thing {
    if is_zero(&a) || is_zero(&b) {
        int(0)
    } else if is_one(&a) {
        b
    } else if is_one(&b) {
        a
    } else {
        Thing::binary(BinaryOp::Mul, a, b)
    }
}

fn div(a: Thing, b: Thing) -> Thing {
    Thing::binary(BinaryOp::Div, a, b)
}

fn pow(a: Thing, b: Thing) -> Thing {
    Thing::binary(BinaryOp::Pow, a, b)
}

fn neg(a: Thing) -> Thing {
    Thing::unary(UnaryFn::Neg, a)
}

fn un(func: UnaryFn, a: &Thing) -> Thing {
    Thing::unary(func, a.clone())
}

fn square(a: &Thing) -> Thing {
    pow(a.clone(), int(2))
}

/// Derivative of a pure tree, simplified; `None` for other values.
pub fn derivative(tree: &Thing) -> Option<Thing> {
    if !tree.is_pure_tree() {
        return None;
    }
    Some(simplify_safe(&differentiate(tree)))
}

fn differentiate(tree: &Thing) -> Thing {
    ensure_sufficient_stack(|| match tree {
        Thing::FreeVariable => int(1),
        Thing::Binary { op, lhs, rhs } => binary_rule(*op, lhs, rhs),
        Thing::Unary { func, arg } => {
            let du = differentiate(arg);
            match unary_rule(*func, arg) {
                Some(outer) => mul(outer, du),
                None => int(0),
            }
        }
        Thing::LibraryFunction {
            function,
            derivative,
            arg,
        } => mul(
            Thing::LibraryFunction {
                function: Arc::clone(function),
                derivative: derivative + 1,
                arg: arg.clone(),
            },
            differentiate(arg),
        ),
        Thing::ProcedureFunction {
            procedure,
            derivative,
            arg,
        } => mul(
            Thing::ProcedureFunction {
                procedure: Arc::clone(procedure),
                derivative: derivative + 1,
                arg: arg.clone(),
            },
            differentiate(arg),
        ),
        // Constants, and rounding operators, which are piecewise constant.
        _ => int(0),
    })
}

fn binary_rule(op: BinaryOp, u: &Thing, v: &Thing) -> Thing {
    let du = differentiate(u);
    let dv = differentiate(v);
    match op {
        BinaryOp::Add => add(du, dv),
        BinaryOp::Sub => sub(du, dv),
        BinaryOp::Mul => add(mul(du, v.clone()), mul(u.clone(), dv)),
        BinaryOp::Div => div(sub(mul(du, v.clone()), mul(u.clone(), dv)), square(v)),
        BinaryOp::Pow if v.is_constant_expression() => mul(
            mul(v.clone(), pow(u.clone(), sub(v.clone(), int(1)))),
            du,
        ),
        BinaryOp::Pow if u.is_constant_expression() => {
            mul(mul(pow(u.clone(), v.clone()), un(UnaryFn::Log, u)), dv)
        }
        BinaryOp::Pow => mul(
            pow(u.clone(), v.clone()),
            add(
                mul(dv, un(UnaryFn::Log, u)),
                div(mul(v.clone(), du), u.clone()),
            ),
        ),
    }
}

/// `f'(u)` for `f(u)`, or `None` when the derivative vanishes.
fn unary_rule(func: UnaryFn, u: &Thing) -> Option<Thing> {
    let one_minus_square = || sub(int(1), square(u));
    let one_plus_square = || add(int(1), square(u));
    Some(match func {
        UnaryFn::Neg => int(-1),
        UnaryFn::Sqrt => div(int(1), mul(int(2), un(UnaryFn::Sqrt, u))),
        UnaryFn::Exp | UnaryFn::Expm1 => un(UnaryFn::Exp, u),
        UnaryFn::Log => div(int(1), u.clone()),
        UnaryFn::Log2 => div(int(1), mul(u.clone(), un(UnaryFn::Log, &int(2)))),
        UnaryFn::Log10 => div(int(1), mul(u.clone(), un(UnaryFn::Log, &int(10)))),
        UnaryFn::Log1p => div(int(1), add(int(1), u.clone())),
        UnaryFn::Sin => un(UnaryFn::Cos, u),
        UnaryFn::Cos => neg(un(UnaryFn::Sin, u)),
        UnaryFn::Tan => add(int(1), square(&un(UnaryFn::Tan, u))),
        UnaryFn::Asin => div(int(1), Thing::unary(UnaryFn::Sqrt, one_minus_square())),
        UnaryFn::Acos => neg(div(int(1), Thing::unary(UnaryFn::Sqrt, one_minus_square()))),
        UnaryFn::Atan => div(int(1), one_plus_square()),
        UnaryFn::Sinh => un(UnaryFn::Cosh, u),
        UnaryFn::Cosh => un(UnaryFn::Sinh, u),
        UnaryFn::Tanh => sub(int(1), square(&un(UnaryFn::Tanh, u))),
        UnaryFn::Asinh => div(int(1), Thing::unary(UnaryFn::Sqrt, one_plus_square())),
        UnaryFn::Acosh => div(
            int(1),
            Thing::unary(UnaryFn::Sqrt, sub(square(u), int(1))),
        ),
        UnaryFn::Atanh => div(int(1), one_minus_square()),
        UnaryFn::Abs => div(un(UnaryFn::Abs, u), u.clone()),
        UnaryFn::Erf | UnaryFn::Erfc => {
            let d = mul(
                div(int(2), Thing::unary(UnaryFn::Sqrt, Thing::Pi)),
                Thing::unary(UnaryFn::Exp, neg(square(u))),
            );
            if func == UnaryFn::Erfc {
                neg(d)
            } else {
                d
            }
        }
        UnaryFn::Ceil | UnaryFn::Floor | UnaryFn::NearestInt => return None,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sol_ir::RenderOptions;

    use super::*;

    fn x() -> Thing {
        Thing::FreeVariable
    }

    fn show(t: &Thing) -> String {
        t.render(&RenderOptions {
            free_variable: Some("x"),
            ..RenderOptions::default()
        })
    }

    fn d(t: &Thing) -> String {
        show(&derivative(t).unwrap_or_else(|| panic!("pure tree expected")))
    }

    #[test]
    fn polynomial_rules() {
        assert_eq!(d(&x()), "1");
        assert_eq!(d(&Thing::integer(7)), "0");
        assert_eq!(d(&pow(x(), int(3))), "3 * x ^ 2");
    }

    #[test]
    fn chain_rule_through_exp() {
        assert_eq!(d(&un(UnaryFn::Exp, &mul(int(2), x()))), "exp(2 * x) * 2");
    }

    #[test]
    fn sine_and_cosine() {
        assert_eq!(d(&un(UnaryFn::Sin, &x())), "cos(x)");
        assert_eq!(d(&un(UnaryFn::Cos, &x())), "-sin(x)");
    }

    #[test]
    fn step_functions_have_zero_derivative() {
        assert_eq!(d(&un(UnaryFn::Floor, &x())), "0");
    }

    #[test]
    fn non_functions_are_rejected() {
        assert!(derivative(&Thing::string("x")).is_none());
    }
}
