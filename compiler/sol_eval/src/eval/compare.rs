//! Comparison of constant expressions.
//!
//! Three tiers, cheapest first:
//!
//! 1. interval enclosures at [`FAST_COMPARE_PREC`] bits, decisive when
//!    they are disjoint;
//! 2. faithful approximations at the working precision, each nudged one
//!    ulp toward the other to absorb the faithful-rounding error (noted at
//!    verbosity 2);
//! 3. exact symbolic reasoning ([`exact_compare`]).
//!
//! When all three fail the comparison warns and answers with the
//! approximations.

use std::cmp::Ordering;

use sol_ir::{Builtin, CompareOp, Thing};
use sol_num::Float;

use super::enclosure::{dummy_point, enclose, ProcedureFunctions};
use super::exact::exact_compare;
use super::faithful::{approximate, Approximation};
use crate::config::FAST_COMPARE_PREC;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;

/// Decide `a cmp b` from low-precision enclosures, if they separate.
pub fn fast_compare(
    a: &Thing,
    b: &Thing,
    procs: &mut dyn ProcedureFunctions,
) -> EvalResult<Option<Ordering>> {
    let x = dummy_point();
    let ea = enclose(a, &x, FAST_COMPARE_PREC, procs)?;
    let eb = enclose(b, &x, FAST_COMPARE_PREC, procs)?;
    if ea.is_undefined() || eb.is_undefined() {
        return Ok(None);
    }
    Ok(if ea.strictly_below(&eb) {
        Some(Ordering::Less)
    } else if eb.strictly_below(&ea) {
        Some(Ordering::Greater)
    } else if ea.is_point() && eb.is_point() && ea.lo() == eb.lo() {
        Some(Ordering::Equal)
    } else {
        None
    })
}

/// Move a faithful value one ulp in `direction`; exact values stay.
fn nudge(approximation: &Approximation, direction: Ordering) -> Option<Float> {
    let mut value = approximation.value()?.clone();
    if let Approximation::Faithful(_) = approximation {
        match direction {
            Ordering::Greater => value.next_up(),
            Ordering::Less => value.next_down(),
            Ordering::Equal => {}
        }
    }
    Some(value)
}

impl Interpreter {
    /// Order two evaluated constant expressions. `None` when either side
    /// is undefined.
    pub(crate) fn compare_values(&mut self, a: &Thing, b: &Thing) -> EvalResult<Option<Ordering>> {
        if let (Some(x), Some(y)) = (a.as_constant(), b.as_constant()) {
            return Ok(x.partial_cmp(y));
        }
        if let Some(ordering) = fast_compare(a, b, self)? {
            return Ok(Some(ordering));
        }

        let prec = self.config.prec;
        let fa = approximate(a, prec, self)?;
        let fb = approximate(b, prec, self)?;
        if fa.is_undefined() || fb.is_undefined() {
            return Ok(None);
        }
        let estimate = match (fa.value(), fb.value()) {
            (Some(x), Some(y)) => x.partial_cmp(y),
            _ => None,
        };
        if fa.is_trustworthy() && fb.is_trustworthy() {
            if let Some(ordering) = estimate {
                if matches!(
                    (&fa, &fb),
                    (Approximation::Exact(_), Approximation::Exact(_))
                ) {
                    return Ok(Some(ordering));
                }
                if ordering != Ordering::Equal {
                    let pa = nudge(&fa, ordering.reverse());
                    let pb = nudge(&fb, ordering);
                    if let (Some(pa), Some(pb)) = (pa, pb) {
                        if pa.partial_cmp(&pb) == Some(ordering) {
                            self.inform(
                                2,
                                "the result of a comparison relies on a faithfully rounded value",
                            );
                            return Ok(Some(ordering));
                        }
                    }
                }
            }
        }

        if let Some(ordering) = exact_compare(a, b) {
            return Ok(Some(ordering));
        }
        let message = format!(
            "the comparison of \"{}\" and \"{}\" could not be decided safely; the result may be wrong",
            self.render(a),
            self.render(b)
        );
        self.warn(message);
        Ok(estimate)
    }

    /// Reduce an evaluated comparison.
    pub(crate) fn compare_things(&mut self, op: CompareOp, l: Thing, r: Thing) -> EvalResult {
        if l.is_error() || r.is_error() {
            return Ok(Thing::Error);
        }
        if l.is_constant_expression() && r.is_constant_expression() {
            let ordering = self.compare_values(&l, &r)?;
            return Ok(Thing::Boolean(match ordering {
                Some(o) => op.holds(o),
                None => op == CompareOp::NotEq,
            }));
        }
        match op {
            CompareOp::Eq | CompareOp::NotEq if l.is_correctly_typed() && r.is_correctly_typed() => {
                let equal = l == r;
                Ok(Thing::Boolean(equal == (op == CompareOp::Eq)))
            }
            _ => Ok(Thing::compare(op, l, r)),
        }
    }

    /// `min`/`max`: the extremal element, `want` being `Less` for `min`.
    pub(crate) fn extremum(&mut self, op: Builtin, args: Vec<Thing>, want: Ordering) -> EvalResult {
        let mut items = match <[Thing; 1]>::try_from(args) {
            Ok([Thing::List(items)]) => items,
            Ok([Thing::FinalEllipticList(_)]) => {
                self.warn(format!("{} cannot be applied to an end-elliptic list", op.name()));
                return Ok(Thing::Error);
            }
            Ok([single]) => vec![single],
            Err(args) => args,
        };
        if items.is_empty() {
            self.warn(format!("{} needs at least one element", op.name()));
            return Ok(Thing::Error);
        }
        if let Some(bad) = items.iter().find(|t| !t.is_constant_expression()) {
            let message = format!(
                "{} expects constants, not {} \"{}\"",
                op.name(),
                bad.type_name(),
                self.render(bad)
            );
            self.warn(message);
            return Ok(Thing::Error);
        }
        let mut best = 0;
        for i in 1..items.len() {
            if self.compare_values(&items[i], &items[best])? == Some(want) {
                best = i;
            }
        }
        Ok(items.swap_remove(best))
    }
}
