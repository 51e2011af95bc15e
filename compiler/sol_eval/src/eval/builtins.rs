//! Built-in functions reduced inside the core.

use std::cmp::Ordering;
use std::sync::Arc;

use sol_ir::{BinaryOp, Builtin, Keyword, Name, Thing};
use sol_num::{clamp_precision, round_to_precision, Float, Integer, MIN_PRECISION};

use super::enclosure::dummy_point;
use super::exact::{exact_value, rational_to_float};
use super::faithful::approximate;
use super::{diff, lists, poly, simplify};
use crate::config::{FAITHFUL_GUARD_BITS, WIDENING_FACTOR};
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;

fn integer_thing(n: &Integer) -> Thing {
    Thing::Constant(Float::with_val(n.significant_bits().max(MIN_PRECISION), n))
}

/// `x = m * 2^e` with `m` odd, or `(0, 0)` for zero.
fn decompose(x: &Float) -> Option<(Integer, i64)> {
    if x.is_zero() {
        return Some((Integer::new(), 0));
    }
    let (mut m, e) = x.to_integer_exp()?;
    let shift = m.find_one(0).unwrap_or(0);
    m >>= shift;
    Some((m, i64::from(e) + i64::from(shift)))
}

/// Degrees selected by a `subpoly` list: the listed ones, plus every
/// degree from the last one on for an end-elliptic list.
fn degree_selector(list: &Thing) -> Option<(Vec<usize>, Option<usize>)> {
    let (items, elliptic) = match list {
        Thing::List(items) => (items, false),
        Thing::FinalEllipticList(items) => (items, true),
        _ => return None,
    };
    let mut degrees = Vec::with_capacity(items.len());
    for item in items {
        degrees.push(usize::try_from(item.as_integer()?).ok()?);
    }
    let from = if elliptic { degrees.last().copied() } else { None };
    Some((degrees, from))
}

impl Interpreter {
    pub(crate) fn evaluate_builtin(&mut self, op: Builtin, raw: &[Thing]) -> EvalResult {
        let (min, max) = op.arity();
        if raw.len() < min || raw.len() > max {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("at least {min}")
            };
            self.warn(format!(
                "{} expects {expected} argument(s), {} given",
                op.name(),
                raw.len()
            ));
            return Ok(Thing::Error);
        }
        if op == Builtin::IsBound {
            return Ok(self.is_bound(&raw[0]));
        }

        let mut args = Vec::with_capacity(raw.len());
        for arg in raw {
            args.push(self.evaluate(arg)?);
        }
        if op != Builtin::IsEvaluable && args.iter().any(Thing::is_error) {
            return Ok(Thing::Error);
        }

        match op {
            Builtin::Length => Ok(self.length(args)),
            Builtin::Head | Builtin::Tail | Builtin::Revert => Ok(self.list_builtin(op, args)),
            Builtin::Sort => self.sort(args),
            Builtin::Inf | Builtin::Sup | Builtin::Mid => self.range_part(op, args),
            Builtin::Min => self.extremum(op, args, Ordering::Less),
            Builtin::Max => self.extremum(op, args, Ordering::Greater),
            Builtin::Diff => Ok(self.differentiate(args)),
            Builtin::Simplify
            | Builtin::SimplifySafe
            | Builtin::Horner
            | Builtin::Canonical
            | Builtin::Expand => Ok(self.rewrite(op, args)),
            Builtin::Degree => Ok(match args.as_slice() {
                [f] if f.is_pure_tree() => poly::degree(f)
                    .and_then(|d| i64::try_from(d).ok())
                    .map_or_else(|| Thing::integer(-1), Thing::integer),
                _ => Thing::builtin(op, args),
            }),
            Builtin::Coeff => Ok(self.coefficient(args)),
            Builtin::Subpoly => Ok(self.subpolynomial(args)),
            Builtin::Substitute => match <[Thing; 2]>::try_from(args) {
                Ok([f, g]) if f.is_pure_tree() => self.apply_function(&f, g),
                Ok(args) => Ok(Thing::builtin(op, args.into())),
                Err(args) => Ok(Thing::builtin(op, args)),
            },
            Builtin::Evaluate => self.evaluate_at(args),
            Builtin::Round => self.round(args),
            Builtin::Mantissa | Builtin::Exponent | Builtin::Precision => {
                self.float_part(op, args)
            }
            Builtin::Numerator | Builtin::Denominator => Ok(match args.as_slice() {
                [Thing::Binary {
                    op: BinaryOp::Div,
                    lhs,
                    rhs,
                }] => {
                    if op == Builtin::Numerator {
                        lhs.as_ref().clone()
                    } else {
                        rhs.as_ref().clone()
                    }
                }
                [f] if f.is_pure_tree() => {
                    if op == Builtin::Numerator {
                        f.clone()
                    } else {
                        Thing::integer(1)
                    }
                }
                _ => Thing::builtin(op, args),
            }),
            Builtin::IsBound => Ok(Thing::Boolean(false)),
            Builtin::IsEvaluable => self.is_evaluable(args),
            Builtin::Library | Builtin::LibraryConstant => Ok(self.native(op, args)),
            Builtin::Function => Ok(match <[Thing; 1]>::try_from(args) {
                Ok([Thing::Procedure(procedure)]) => Thing::ProcedureFunction {
                    procedure,
                    derivative: 0,
                    arg: Box::new(Thing::FreeVariable),
                },
                Ok([f]) if f.is_pure_tree() => f,
                Ok(args) => Thing::builtin(op, args.into()),
                Err(args) => Thing::builtin(op, args),
            }),
        }
    }

    fn is_bound(&self, arg: &Thing) -> Thing {
        match arg {
            Thing::Identifier(name) => Thing::Boolean(self.env.is_bound(name.as_str())),
            Thing::Str(name) => Thing::Boolean(self.env.is_bound(name)),
            _ => Thing::Boolean(false),
        }
    }

    // Lists

    fn length(&mut self, args: Vec<Thing>) -> Thing {
        match args.as_slice() {
            [Thing::List(items)] => Thing::integer(i64::try_from(items.len()).unwrap_or(i64::MAX)),
            [Thing::FinalEllipticList(_)] => {
                Thing::Constant(Float::with_val(MIN_PRECISION, rug::float::Special::Infinity))
            }
            [Thing::Str(s)] => {
                Thing::integer(i64::try_from(s.chars().count()).unwrap_or(i64::MAX))
            }
            _ => Thing::builtin(Builtin::Length, args),
        }
    }

    fn list_builtin(&mut self, op: Builtin, args: Vec<Thing>) -> Thing {
        let result = match (op, args.as_slice()) {
            (_, [Thing::List(items)]) if items.is_empty() && op != Builtin::Revert => {
                self.warn(format!("{} cannot be applied to an empty list", op.name()));
                return Thing::Error;
            }
            (Builtin::Head, [Thing::List(items) | Thing::FinalEllipticList(items)]) => {
                items.first().cloned()
            }
            (Builtin::Tail, [Thing::List(items)]) => Some(Thing::List(items[1..].to_vec())),
            (Builtin::Tail, [Thing::FinalEllipticList(items)]) => {
                Some(Thing::FinalEllipticList(lists::elliptic_tail(items)))
            }
            (Builtin::Revert, [Thing::List(items)]) => {
                Some(Thing::List(items.iter().rev().cloned().collect()))
            }
            (Builtin::Revert, [Thing::FinalEllipticList(_)]) => {
                self.warn("an end-elliptic list cannot be reverted");
                return Thing::Error;
            }
            _ => None,
        };
        result.unwrap_or_else(|| Thing::builtin(op, args))
    }

    fn sort(&mut self, args: Vec<Thing>) -> EvalResult {
        let items = match <[Thing; 1]>::try_from(args) {
            Ok([Thing::List(items)]) => items,
            Ok([Thing::FinalEllipticList(_)]) => {
                self.warn("an end-elliptic list cannot be sorted");
                return Ok(Thing::Error);
            }
            Ok(args) => return Ok(Thing::builtin(Builtin::Sort, args.into())),
            Err(args) => return Ok(Thing::builtin(Builtin::Sort, args)),
        };
        if items.iter().any(|t| !t.is_constant_expression()) {
            self.warn("sort expects a list of constants");
            return Ok(Thing::Error);
        }
        // Insertion sort: stable, and every comparison may need the interpreter.
        let mut sorted: Vec<Thing> = Vec::with_capacity(items.len());
        for item in items {
            let mut at = sorted.len();
            while at > 0 && self.compare_values(&item, &sorted[at - 1])? == Some(Ordering::Less) {
                at -= 1;
            }
            sorted.insert(at, item);
        }
        Ok(Thing::List(sorted))
    }

    // Ranges

    fn range_part(&mut self, op: Builtin, args: Vec<Thing>) -> EvalResult {
        let range = match args.as_slice() {
            [Thing::Constant(c)] => return Ok(Thing::Constant(c.clone())),
            [Thing::Range(r)] => r.clone(),
            [c] if c.is_constant_expression() => {
                let prec = self.config.prec;
                self.enclose_with(c, &dummy_point(), prec)?
            }
            _ => return Ok(Thing::builtin(op, args)),
        };
        Ok(Thing::Constant(match op {
            Builtin::Inf => range.lo().clone(),
            Builtin::Sup => range.hi().clone(),
            _ => range.midpoint(range.prec().max(self.config.prec) + 1),
        }))
    }

    // Functions

    fn differentiate(&mut self, args: Vec<Thing>) -> Thing {
        match args.as_slice() {
            [f] if f.is_pure_tree() => {
                self.start_timer("differentiation");
                let derivative = diff::derivative(f);
                self.stop_timer();
                derivative.unwrap_or(Thing::Error)
            }
            _ => Thing::builtin(Builtin::Diff, args),
        }
    }

    fn rewrite(&mut self, op: Builtin, args: Vec<Thing>) -> Thing {
        let [f] = args.as_slice() else {
            return Thing::builtin(op, args);
        };
        if !f.is_pure_tree() {
            return if f.is_correctly_typed() {
                f.clone()
            } else {
                Thing::builtin(op, args)
            };
        }
        match op {
            Builtin::Simplify => simplify::simplify(f, self.config.prec),
            Builtin::SimplifySafe => simplify::simplify_safe(f),
            Builtin::Horner => poly::coefficients(f).map_or_else(|| f.clone(), |c| poly::horner(&c)),
            Builtin::Canonical => {
                poly::coefficients(f).map_or_else(|| f.clone(), |c| poly::canonical(&c))
            }
            _ => poly::expand(f),
        }
    }

    fn coefficient(&mut self, args: Vec<Thing>) -> Thing {
        match args.as_slice() {
            [f, n] if f.is_pure_tree() => {
                let Some(n) = n.as_integer().and_then(|n| usize::try_from(n).ok()) else {
                    self.warn("coeff expects a non-negative integer degree");
                    return Thing::Error;
                };
                poly::coeff(f, n).unwrap_or_else(|| {
                    self.warn("coeff can only be applied to a polynomial");
                    Thing::Error
                })
            }
            _ => Thing::builtin(Builtin::Coeff, args),
        }
    }

    fn subpolynomial(&mut self, args: Vec<Thing>) -> Thing {
        match args.as_slice() {
            [f, list] if f.is_pure_tree() && list.is_list() => {
                let Some((degrees, from)) = degree_selector(list) else {
                    self.warn("subpoly expects a list of non-negative integers");
                    return Thing::Error;
                };
                let keep = |d: usize| degrees.contains(&d) || from.is_some_and(|f| d >= f);
                poly::subpoly(f, keep).unwrap_or_else(|| {
                    self.warn("subpoly can only be applied to a polynomial");
                    Thing::Error
                })
            }
            _ => Thing::builtin(Builtin::Subpoly, args),
        }
    }

    fn evaluate_at(&mut self, args: Vec<Thing>) -> EvalResult {
        let [f, x] = args.as_slice() else {
            return Ok(Thing::builtin(Builtin::Evaluate, args));
        };
        if !f.is_pure_tree() {
            return Ok(Thing::builtin(Builtin::Evaluate, args));
        }
        match x {
            Thing::Range(r) => {
                let prec = self.config.prec;
                Ok(Thing::Range(self.enclose_with(f, r, prec)?))
            }
            x if x.is_constant_expression() => {
                let point = f.substitute(x);
                let prec = self.config.prec;
                Ok(self
                    .approximate_value(&point, prec)?
                    .map_or(Thing::Error, Thing::Constant))
            }
            _ => Ok(Thing::builtin(Builtin::Evaluate, args)),
        }
    }

    // Floating-point numbers

    /// Correctly round a constant expression with `round`, which must be
    /// monotone. Falls back to rounding a faithful value, with a warning.
    fn round_constant(
        &mut self,
        value: &Thing,
        target_prec: u32,
        round: impl Fn(&Float) -> Float,
    ) -> EvalResult<Option<Float>> {
        if let Some(c) = value.as_constant() {
            return Ok(Some(round(c)));
        }
        if let Some(exact) = exact_value(value).as_ref().and_then(rational_to_float) {
            return Ok(Some(round(&exact)));
        }
        let base = self.config.prec.max(target_prec);
        let limit = clamp_precision(base.saturating_mul(WIDENING_FACTOR));
        let mut prec = clamp_precision(base + FAITHFUL_GUARD_BITS);
        loop {
            let enclosure = self.enclose_with(value, &dummy_point(), prec)?;
            if enclosure.is_undefined() {
                break;
            }
            let lo = round(enclosure.lo());
            if lo == round(enclosure.hi()) {
                return Ok(Some(lo));
            }
            if prec >= limit {
                break;
            }
            prec = clamp_precision(prec.saturating_mul(2));
        }
        let working = self.config.prec;
        let Some(approx) = self.approximate_value(value, working)? else {
            return Ok(None);
        };
        if !approx.is_nan() {
            let message = format!(
                "the rounding of \"{}\" could not be proven correct",
                self.render(value)
            );
            self.warn(message);
        }
        Ok(Some(round(&approx)))
    }

    fn round(&mut self, args: Vec<Thing>) -> EvalResult {
        let [value, target, Thing::Keyword(Keyword::Rounding(mode))] = args.as_slice() else {
            return Ok(Thing::builtin(Builtin::Round, args));
        };
        if !value.is_constant_expression() {
            return Ok(Thing::builtin(Builtin::Round, args));
        }
        let mode = mode.to_round();
        let rounded = match target {
            Thing::Keyword(Keyword::Format(format)) => {
                let format = *format;
                self.round_constant(value, format.precision(), |x| format.round(x, mode))?
            }
            t => match t.as_integer().and_then(|p| u32::try_from(p).ok()) {
                Some(p) if p >= 2 => {
                    self.round_constant(value, p, |x| round_to_precision(x, p, mode).0)?
                }
                _ => {
                    self.warn("round expects a precision of at least 2 bits or a format");
                    return Ok(Thing::Error);
                }
            },
        };
        Ok(rounded.map_or(Thing::Error, Thing::Constant))
    }

    fn float_part(&mut self, op: Builtin, args: Vec<Thing>) -> EvalResult {
        let value = match args.as_slice() {
            [Thing::Constant(c)] => c.clone(),
            [c] if c.is_constant_expression() => {
                let prec = self.config.prec;
                match self.approximate_value(c, prec)? {
                    Some(v) => v,
                    None => return Ok(Thing::Error),
                }
            }
            _ => return Ok(Thing::builtin(op, args)),
        };
        let Some((mantissa, exponent)) = decompose(&value) else {
            self.warn(format!("{} is not defined for infinities and NaN", op.name()));
            return Ok(Thing::Error);
        };
        Ok(match op {
            Builtin::Mantissa => integer_thing(&mantissa),
            Builtin::Exponent => Thing::integer(exponent),
            _ => Thing::integer(i64::from(mantissa.significant_bits())),
        })
    }

    fn is_evaluable(&mut self, args: Vec<Thing>) -> EvalResult {
        let [value] = args.as_slice() else {
            return Ok(Thing::Boolean(false));
        };
        if !value.is_constant_expression() {
            return Ok(Thing::Boolean(false));
        }
        let prec = self.config.prec;
        let approximation = approximate(value, prec, self)?;
        Ok(Thing::Boolean(
            approximation.value().is_some_and(|v| !v.is_nan()),
        ))
    }

    // Native bindings

    fn native(&mut self, op: Builtin, args: Vec<Thing>) -> Thing {
        let [Thing::Str(symbol)] = args.as_slice() else {
            return Thing::builtin(op, args);
        };
        let name = Name::new(symbol);
        let bound = if op == Builtin::Library {
            self.natives
                .function(name, symbol)
                .map(|function| Thing::LibraryFunction {
                    function: Arc::new(function),
                    derivative: 0,
                    arg: Box::new(Thing::FreeVariable),
                })
        } else {
            self.natives
                .constant(name, symbol)
                .map(|constant| Thing::LibraryConstant(Arc::new(constant)))
        };
        bound.unwrap_or_else(|| {
            self.warn(format!("no native code is registered under \"{symbol}\""));
            Thing::Error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposition_strips_trailing_zero_bits() {
        let x = Float::with_val(53, 12);
        let (m, e) = decompose(&x).unwrap_or_else(|| panic!("finite value"));
        assert_eq!(m, 3);
        assert_eq!(e, 2);
        assert_eq!(decompose(&Float::with_val(53, 0)), Some((Integer::new(), 0)));
    }

    #[test]
    fn degree_selector_extends_elliptic_lists() {
        let list = Thing::FinalEllipticList(vec![Thing::integer(0), Thing::integer(3)]);
        let (degrees, from) = degree_selector(&list).unwrap_or_else(|| panic!("integer list"));
        assert_eq!(degrees, vec![0, 3]);
        assert_eq!(from, Some(3));
        assert!(degree_selector(&Thing::List(vec![Thing::integer(-1)])).is_none());
    }
}
