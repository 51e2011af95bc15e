//! Range evaluation of numeric trees.
//!
//! `enclose(f, x, prec)` returns an interval containing `f(t)` for every
//! `t` in `x`. Procedure-defined functions need the interpreter to run,
//! so they are delegated through [`ProcedureFunctions`].

use std::sync::Arc;

use sol_ir::{Procedure, Thing};
use sol_num::literal::{convert_binary, convert_decimal, convert_dyadic};
use sol_num::{Float, Interval, Round, MIN_PRECISION};

use crate::errors::EvalResult;
use crate::stack::ensure_sufficient_stack;

/// Evaluates `function(p)` nodes over a range.
pub trait ProcedureFunctions {
    fn enclose_procedure(
        &mut self,
        procedure: &Arc<Procedure>,
        derivative: u32,
        x: &Interval,
        prec: u32,
    ) -> EvalResult<Interval>;
}

/// Used where no interpreter is available: procedure functions are
/// undefined.
pub struct NoProcedures;

impl ProcedureFunctions for NoProcedures {
    fn enclose_procedure(
        &mut self,
        _procedure: &Arc<Procedure>,
        _derivative: u32,
        _x: &Interval,
        prec: u32,
    ) -> EvalResult<Interval> {
        Ok(Interval::undefined(prec))
    }
}

/// Point at which constant expressions are enclosed; never read.
pub fn dummy_point() -> Interval {
    Interval::point(&Float::with_val(MIN_PRECISION, 1))
}

/// Outward enclosure of a decimal literal.
pub fn decimal_enclosure(text: &str, prec: u32) -> Interval {
    let lo = convert_decimal(text, prec, Round::Down);
    let hi = convert_decimal(text, prec, Round::Up);
    match (lo, hi) {
        (Ok(lo), Ok(hi)) => {
            Interval::new(lo.value, hi.value).unwrap_or_else(|_| Interval::undefined(prec))
        }
        _ => Interval::undefined(prec),
    }
}

pub fn enclose(
    tree: &Thing,
    x: &Interval,
    prec: u32,
    procs: &mut dyn ProcedureFunctions,
) -> EvalResult<Interval> {
    ensure_sufficient_stack(|| enclose_node(tree, x, prec, procs))
}

fn enclose_node(
    tree: &Thing,
    x: &Interval,
    prec: u32,
    procs: &mut dyn ProcedureFunctions,
) -> EvalResult<Interval> {
    let exact_literal = |converted: Result<sol_num::literal::Converted, sol_num::NumError>| {
        converted.map_or_else(|_| Interval::undefined(prec), |c| Interval::point(&c.value))
    };
    Ok(match tree {
        Thing::Constant(c) => Interval::point(c),
        Thing::DecimalConstant(text) => decimal_enclosure(text, prec),
        Thing::DyadicConstant(text) => exact_literal(convert_dyadic(text)),
        Thing::BinaryConstant(text) => exact_literal(convert_binary(text)),
        Thing::FreeVariable => x.clone(),
        Thing::Pi => Interval::pi(prec),
        Thing::Range(r) => r.clone(),
        Thing::Binary { op, lhs, rhs } => {
            let a = enclose(lhs, x, prec, procs)?;
            let b = enclose(rhs, x, prec, procs)?;
            op.apply(&a, &b, prec)
        }
        Thing::Unary { func, arg } => func.apply(&enclose(arg, x, prec, procs)?, prec),
        Thing::RoundTo { format, arg } => enclose(arg, x, prec, procs)?.round_format(*format),
        Thing::LibraryFunction {
            function,
            derivative,
            arg,
        } => {
            let a = enclose(arg, x, prec, procs)?;
            if a.is_undefined() {
                a
            } else {
                function
                    .evaluate(&a, *derivative, prec)
                    .unwrap_or_else(|| Interval::undefined(prec))
            }
        }
        Thing::LibraryConstant(constant) => constant.evaluate(prec),
        Thing::ProcedureFunction {
            procedure,
            derivative,
            arg,
        } => {
            let a = enclose(arg, x, prec, procs)?;
            procs.enclose_procedure(procedure, *derivative, &a, prec)?
        }
        _ => Interval::undefined(prec),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol_ir::{BinaryOp, UnaryFn};

    fn range(lo: f64, hi: f64) -> Interval {
        Interval::new(Float::with_val(53, lo), Float::with_val(53, hi))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    fn enclose_pure(tree: &Thing, x: &Interval, prec: u32) -> Interval {
        enclose(tree, x, prec, &mut NoProcedures).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn affine_function_over_unit_interval() {
        let f = Thing::binary(BinaryOp::Add, Thing::integer(1), Thing::FreeVariable);
        assert_eq!(enclose_pure(&f, &range(0.0, 1.0), 165), range(1.0, 2.0));
    }

    #[test]
    fn decimal_literals_are_enclosed_outward() {
        let r = decimal_enclosure("0.1", 53);
        assert!(r.lo() < r.hi());
        let tenth = rug::Rational::from((1, 10));
        assert!(*r.lo() <= tenth && *r.hi() >= tenth);
    }

    #[test]
    fn out_of_domain_is_undefined() {
        let f = Thing::unary(UnaryFn::Log, Thing::FreeVariable);
        assert!(enclose_pure(&f, &range(-2.0, -1.0), 53).is_undefined());
    }

    #[test]
    fn procedure_functions_without_interpreter_are_undefined() {
        let p = Arc::new(Procedure::new(vec![], vec![], Thing::Unit));
        let f = Thing::ProcedureFunction {
            procedure: p,
            derivative: 0,
            arg: Box::new(Thing::FreeVariable),
        };
        assert!(enclose_pure(&f, &range(0.0, 1.0), 53).is_undefined());
    }
}
