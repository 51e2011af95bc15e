//! Expression reduction.
//!
//! [`Interpreter::evaluate`] reduces a [`Thing`] to normal form: literals
//! are converted, identifiers resolved, operations on ranges carried out
//! in interval arithmetic, built-ins and calls executed. Numeric
//! expressions in the free variable stay symbolic.
//!
//! `evaluate_inner` does the reduction and never complains about types.
//! `evaluate` wraps it: it checks the result is a correctly typed normal
//! form (warning once and yielding `error` otherwise) and applies safe
//! automatic simplification to small pure trees.

mod builtins;
mod compare;
pub mod diff;
pub mod enclosure;
pub mod exact;
pub mod faithful;
pub mod lists;
pub mod poly;
pub mod simplify;

pub use compare::fast_compare;
pub use enclosure::{enclose, NoProcedures, ProcedureFunctions};
pub use faithful::{approximate, Approximation};

use std::cmp::Ordering;
use std::sync::Arc;

use sol_ir::{Algorithm, BinaryOp, Name, Procedure, Structure, Thing, UnaryFn};
use sol_num::literal::{convert_binary, convert_decimal, convert_dyadic, Converted};
use sol_num::{Float, Interval, NumError, Rational, Round};

use crate::config::AUTOSIMPLIFY_SIZE_LIMIT;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::stack::ensure_sufficient_stack;

impl ProcedureFunctions for Interpreter {
    fn enclose_procedure(
        &mut self,
        procedure: &Arc<Procedure>,
        derivative: u32,
        x: &Interval,
        prec: u32,
    ) -> EvalResult<Interval> {
        let args = vec![
            Thing::Range(x.clone()),
            Thing::integer(i64::from(derivative)),
            Thing::integer(i64::from(prec)),
        ];
        match self.call_procedure(procedure, args)? {
            Thing::Range(r) => Ok(r),
            Thing::Constant(c) => Ok(Interval::point(&c)),
            Thing::Error => Ok(Interval::undefined(prec)),
            other => {
                let message = format!(
                    "a procedure used as a function must return a range, not {}",
                    other.type_name()
                );
                self.warn(message);
                Ok(Interval::undefined(prec))
            }
        }
    }
}

impl Interpreter {
    /// Reduce to a correctly typed normal form.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn evaluate(&mut self, thing: &Thing) -> EvalResult {
        let result = self.evaluate_inner(thing)?;
        if !result.is_correctly_typed() {
            let message = format!(
                "the expression \"{}\" is not correctly typed or its evaluation failed",
                self.render(&result)
            );
            self.warn(message);
            return Ok(Thing::Error);
        }
        if self.config.autosimplify
            && !matches!(result, Thing::Constant(_))
            && result.is_pure_tree()
            && result.tree_size() <= AUTOSIMPLIFY_SIZE_LIMIT
        {
            return Ok(simplify::simplify_safe(&result));
        }
        Ok(result)
    }

    /// Reduce without type checking.
    pub(crate) fn evaluate_inner(&mut self, thing: &Thing) -> EvalResult {
        ensure_sufficient_stack(|| self.reduce(thing))
    }

    fn reduce(&mut self, thing: &Thing) -> EvalResult {
        match thing {
            Thing::Constant(_)
            | Thing::Boolean(_)
            | Thing::Str(_)
            | Thing::Unit
            | Thing::Default
            | Thing::Error
            | Thing::Keyword(_)
            | Thing::FreeVariable
            | Thing::Pi
            | Thing::LibraryConstant(_)
            | Thing::Range(_)
            | Thing::Ellipsis
            | Thing::Structure(_)
            | Thing::Procedure(_)
            | Thing::ExternalProcedure(_) => Ok(thing.clone()),
            Thing::DecimalConstant(text) => Ok(self.convert_decimal_literal(text)),
            Thing::DyadicConstant(text) => Ok(self.convert_exact_literal(convert_dyadic(text))),
            Thing::BinaryConstant(text) => Ok(self.convert_exact_literal(convert_binary(text))),
            Thing::Binary { op, lhs, rhs } => {
                let l = self.evaluate_inner(lhs)?;
                let r = self.evaluate_inner(rhs)?;
                self.reduce_binary(*op, l, r)
            }
            Thing::Unary { func, arg } => {
                let a = self.evaluate_inner(arg)?;
                Ok(self.reduce_unary(*func, a))
            }
            Thing::RoundTo { format, arg } => Ok(match self.evaluate_inner(arg)? {
                Thing::Error => Thing::Error,
                Thing::Range(r) => Thing::Range(r.round_format(*format)),
                Thing::Constant(c) => Thing::Constant(format.round(&c, Round::Nearest)),
                other => Thing::RoundTo {
                    format: *format,
                    arg: Box::new(other),
                },
            }),
            Thing::LibraryFunction {
                function,
                derivative,
                arg,
            } => Ok(match self.evaluate_inner(arg)? {
                Thing::Error => Thing::Error,
                Thing::Range(r) => Thing::Range(
                    function
                        .evaluate(&r, *derivative, self.config.prec)
                        .unwrap_or_else(|| Interval::undefined(self.config.prec)),
                ),
                other => Thing::LibraryFunction {
                    function: Arc::clone(function),
                    derivative: *derivative,
                    arg: Box::new(other),
                },
            }),
            Thing::ProcedureFunction {
                procedure,
                derivative,
                arg,
            } => match self.evaluate_inner(arg)? {
                Thing::Error => Ok(Thing::Error),
                Thing::Range(r) => {
                    let prec = self.config.prec;
                    Ok(Thing::Range(self.enclose_procedure(procedure, *derivative, &r, prec)?))
                }
                other => Ok(Thing::ProcedureFunction {
                    procedure: Arc::clone(procedure),
                    derivative: *derivative,
                    arg: Box::new(other),
                }),
            },
            Thing::RangeOf { lo, hi } => self.build_range(lo, hi),
            Thing::List(items) => self.build_list(items, false),
            Thing::FinalEllipticList(items) => self.build_list(items, true),
            Thing::StructureOf(fields) => self.build_structure(fields),
            Thing::Identifier(name) => Ok(self.resolve_identifier(name)),
            Thing::Compare { op, lhs, rhs } => {
                let l = self.evaluate_inner(lhs)?;
                let r = self.evaluate_inner(rhs)?;
                self.compare_things(*op, l, r)
            }
            Thing::In { value, range } => {
                let v = self.evaluate_inner(value)?;
                let r = self.evaluate_inner(range)?;
                self.membership(v, r)
            }
            Thing::And(a, b) => self.logical(a, b, false),
            Thing::Or(a, b) => self.logical(a, b, true),
            Thing::Not(a) => Ok(match self.evaluate_inner(a)? {
                Thing::Boolean(v) => Thing::Boolean(!v),
                Thing::Error => Thing::Error,
                other => Thing::Not(Box::new(other)),
            }),
            Thing::Apply { callee, args } => self.apply(callee, args),
            Thing::Index { target, index } => {
                let t = self.evaluate_inner(target)?;
                let i = self.evaluate_inner(index)?;
                Ok(self.index(t, i))
            }
            Thing::Field { target, field } => {
                let t = self.evaluate_inner(target)?;
                Ok(self.field(t, field))
            }
            Thing::Concat(a, b) => {
                let x = self.evaluate_inner(a)?;
                let y = self.evaluate_inner(b)?;
                self.concat(x, y)
            }
            Thing::Prepend(a, b) => {
                let x = self.evaluate_inner(a)?;
                let y = self.evaluate_inner(b)?;
                Ok(self.prepend(x, y))
            }
            Thing::Append(a, b) => {
                let x = self.evaluate_inner(a)?;
                let y = self.evaluate_inner(b)?;
                Ok(self.append(x, y))
            }
            Thing::Builtin { op, args } => self.evaluate_builtin(*op, args),
            Thing::Algorithm { algorithm, args } => self.run_algorithm(*algorithm, args),
            Thing::SettingValue(setting) => Ok(self.config.value_of(*setting)),
            Thing::Approx(e) => self.approx(e),
            Thing::Match { subject, arms } => self.evaluate_match(subject, arms),
        }
    }

    // Literals

    fn convert_decimal_literal(&mut self, text: &str) -> Thing {
        let prec = self.config.prec;
        match convert_decimal(text, prec, Round::Nearest) {
            Ok(Converted { value, exact }) => {
                if !exact && self.config.rounding_warnings {
                    self.warn(format!(
                        "rounding has happened when converting the constant \"{text}\" to \
                         {prec} bits; if safe computation is needed, try to increase the precision"
                    ));
                }
                Thing::Constant(value)
            }
            Err(e) => {
                self.warn(e.to_string());
                Thing::Error
            }
        }
    }

    fn convert_exact_literal(&mut self, converted: Result<Converted, NumError>) -> Thing {
        match converted {
            Ok(c) => Thing::Constant(c.value),
            Err(e) => {
                self.warn(e.to_string());
                Thing::Error
            }
        }
    }

    // Identifiers

    fn resolve_identifier(&mut self, name: &Name) -> Thing {
        if let Some(value) = self.env.resolve(name.as_str()) {
            return value;
        }
        if self.env.free_variable().is_none() {
            return match self.env.bind_free_variable(name.clone()) {
                Ok(()) => {
                    self.inform(1, format!("the free variable has been named \"{name}\""));
                    Thing::FreeVariable
                }
                Err(e) => {
                    self.warn(e.to_string());
                    Thing::Error
                }
            };
        }
        self.warn(format!(
            "the identifier \"{name}\" is neither assigned to, nor bound to a library function, \
             library constant or external procedure, nor equal to the current free variable"
        ));
        Thing::Error
    }

    // Arithmetic

    fn reduce_binary(&mut self, op: BinaryOp, l: Thing, r: Thing) -> EvalResult {
        if l.is_error() || r.is_error() {
            return Ok(Thing::Error);
        }
        let prec = self.config.prec;
        match (&l, &r) {
            (Thing::Range(a), Thing::Range(b)) => Ok(Thing::Range(op.apply(a, b, prec))),
            (Thing::Range(a), c) if c.is_constant_expression() => {
                let g = Thing::binary(op, Thing::FreeVariable, c.clone());
                Ok(Thing::Range(self.enclose_with(&g, a, prec)?))
            }
            (c, Thing::Range(b)) if c.is_constant_expression() => {
                let g = Thing::binary(op, c.clone(), Thing::FreeVariable);
                Ok(Thing::Range(self.enclose_with(&g, b, prec)?))
            }
            _ => Ok(Thing::binary(op, l, r)),
        }
    }

    fn reduce_unary(&mut self, func: UnaryFn, a: Thing) -> Thing {
        match a {
            Thing::Error => Thing::Error,
            Thing::Range(r) => Thing::Range(func.apply(&r, self.config.prec)),
            other => Thing::unary(func, other),
        }
    }

    /// Enclose `f` over `x`, running procedure functions as needed.
    pub(crate) fn enclose_with(&mut self, f: &Thing, x: &Interval, prec: u32) -> EvalResult<Interval> {
        enclose(f, x, prec, self)
    }

    // Composite literals

    /// An endpoint of a range literal, rounded outward.
    fn range_bound(&mut self, bound: &Thing, direction: Round) -> EvalResult<Option<Float>> {
        let prec = self.config.prec;
        if let Thing::DecimalConstant(text) = bound {
            if let Ok(c) = convert_decimal(text, prec, direction) {
                return Ok(Some(c.value));
            }
        }
        let value = self.evaluate(bound)?;
        let pick = |r: &Interval| {
            if direction == Round::Down {
                r.lo().clone()
            } else {
                r.hi().clone()
            }
        };
        Ok(match value {
            Thing::Error => None,
            Thing::Constant(c) => Some(c),
            Thing::Range(r) => Some(pick(&r)),
            other if other.is_constant_expression() => {
                let enclosure = self.enclose_with(&other, &enclosure::dummy_point(), prec)?;
                if enclosure.is_undefined() {
                    self.warn("a bound of the range is undefined");
                    None
                } else {
                    Some(pick(&enclosure))
                }
            }
            other => {
                let message = format!(
                    "the bounds of a range must be constants, not {}",
                    other.type_name()
                );
                self.warn(message);
                None
            }
        })
    }

    fn build_range(&mut self, lo: &Thing, hi: &Thing) -> EvalResult {
        let a = self.range_bound(lo, Round::Down)?;
        let b = self.range_bound(hi, Round::Up)?;
        let (Some(a), Some(b)) = (a, b) else {
            return Ok(Thing::Error);
        };
        match Interval::new(a, b) {
            Ok(r) => Ok(Thing::Range(r)),
            Err(e) => {
                self.warn(e.to_string());
                Ok(Thing::Error)
            }
        }
    }

    fn build_list(&mut self, items: &[Thing], elliptic: bool) -> EvalResult {
        if elliptic && items.is_empty() {
            self.warn("an end-elliptic list must have at least one element");
            return Ok(Thing::Error);
        }
        let mut out = Vec::with_capacity(items.len());
        let mut i = 0;
        while i < items.len() {
            if matches!(items[i], Thing::Ellipsis) {
                let start = out.last().and_then(Thing::as_integer);
                let end = match items.get(i + 1) {
                    Some(t) => self.evaluate(t)?.as_integer(),
                    None => None,
                };
                match (start, end) {
                    (Some(s), Some(e)) if s <= e => {
                        out.extend((s + 1..=e).map(Thing::integer));
                        i += 2;
                        continue;
                    }
                    _ => {
                        self.warn("the bounds around \"...\" in a list must be integers in increasing order");
                        return Ok(Thing::Error);
                    }
                }
            }
            out.push(self.evaluate(&items[i])?);
            i += 1;
        }
        Ok(if elliptic {
            Thing::FinalEllipticList(out)
        } else {
            Thing::List(out)
        })
    }

    fn build_structure(&mut self, fields: &[(Name, Thing)]) -> EvalResult {
        let mut values = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            values.push((name.clone(), self.evaluate(value)?));
        }
        match Structure::from_fields(values) {
            Ok(s) => Ok(Thing::Structure(s)),
            Err(dup) => {
                self.warn(format!("the field \"{dup}\" appears more than once in the structure"));
                Ok(Thing::Error)
            }
        }
    }

    // Logic

    fn logical(&mut self, a: &Thing, b: &Thing, is_or: bool) -> EvalResult {
        let rebuild = |x: Thing, y: Thing| {
            if is_or {
                Thing::Or(Box::new(x), Box::new(y))
            } else {
                Thing::And(Box::new(x), Box::new(y))
            }
        };
        match self.evaluate_inner(a)? {
            Thing::Boolean(v) if v == is_or => Ok(Thing::Boolean(v)),
            Thing::Boolean(v) => match self.evaluate_inner(b)? {
                y @ (Thing::Boolean(_) | Thing::Error) => Ok(y),
                other => Ok(rebuild(Thing::Boolean(v), other)),
            },
            Thing::Error => Ok(Thing::Error),
            other => Ok(rebuild(other, b.clone())),
        }
    }

    fn membership(&mut self, value: Thing, range: Thing) -> EvalResult {
        if value.is_error() || range.is_error() {
            return Ok(Thing::Error);
        }
        let Thing::Range(r) = &range else {
            return Ok(Thing::In {
                value: Box::new(value),
                range: Box::new(range),
            });
        };
        match &value {
            Thing::Range(v) => Ok(Thing::Boolean(
                !v.is_undefined() && !r.is_undefined() && r.lo() <= v.lo() && v.hi() <= r.hi(),
            )),
            v if v.is_constant_expression() => {
                let lo = Thing::Constant(r.lo().clone());
                let hi = Thing::Constant(r.hi().clone());
                let above = self.compare_values(v, &lo)?;
                let below = self.compare_values(v, &hi)?;
                Ok(Thing::Boolean(
                    above.is_some_and(|o| o != Ordering::Less)
                        && below.is_some_and(|o| o != Ordering::Greater),
                ))
            }
            _ => Ok(Thing::In {
                value: Box::new(value),
                range: Box::new(range),
            }),
        }
    }

    // Application

    fn apply(&mut self, callee: &Thing, args: &[Thing]) -> EvalResult {
        let f = self.evaluate_inner(callee)?;
        let mut actuals = Vec::with_capacity(args.len());
        for arg in args {
            actuals.push(self.evaluate(arg)?);
        }
        match f {
            Thing::Error => Ok(Thing::Error),
            Thing::Procedure(p) => self.call_procedure(&p, actuals),
            Thing::ExternalProcedure(e) => self.call_external(&e, actuals),
            f if f.is_pure_tree() && actuals.len() == 1 => {
                let x = actuals.pop().unwrap_or(Thing::Error);
                self.apply_function(&f, x)
            }
            other => Ok(Thing::apply(other, actuals)),
        }
    }

    /// `f(x)`: range evaluation on ranges, composition otherwise.
    pub(crate) fn apply_function(&mut self, f: &Thing, x: Thing) -> EvalResult {
        match x {
            Thing::Error => Ok(Thing::Error),
            Thing::Range(r) => {
                let prec = self.config.prec;
                Ok(Thing::Range(self.enclose_with(f, &r, prec)?))
            }
            x if x.is_pure_tree() => Ok(f.substitute(&x)),
            other => Ok(Thing::apply(f.clone(), vec![other])),
        }
    }

    // Lists, strings and structures

    fn index(&mut self, target: Thing, index: Thing) -> Thing {
        if target.is_error() || index.is_error() {
            return Thing::Error;
        }
        let Some(i) = index.as_integer() else {
            return Thing::index(target, index);
        };
        let position = usize::try_from(i).ok();
        let found = match (&target, position) {
            (Thing::List(items), Some(n)) => items.get(n).cloned(),
            (Thing::FinalEllipticList(items), Some(n)) => lists::elliptic_element(items, n),
            (Thing::Str(s), Some(n)) => s.chars().nth(n).map(|c| Thing::Str(c.to_string())),
            (Thing::List(_) | Thing::FinalEllipticList(_) | Thing::Str(_), None) => None,
            _ => return Thing::index(target, index),
        };
        found.unwrap_or_else(|| {
            let message = format!(
                "the index {i} is out of range for the {} \"{}\"",
                target.type_name(),
                self.render(&target)
            );
            self.warn(message);
            Thing::Error
        })
    }

    fn field(&mut self, target: Thing, name: &Name) -> Thing {
        match &target {
            Thing::Error => Thing::Error,
            Thing::Structure(s) => s.get(name.as_str()).cloned().unwrap_or_else(|| {
                self.warn(format!("the structure has no field \"{name}\""));
                Thing::Error
            }),
            _ => Thing::Field {
                target: Box::new(target),
                field: name.clone(),
            },
        }
    }

    fn concat(&mut self, a: Thing, b: Thing) -> EvalResult {
        Ok(match (a, b) {
            (Thing::Error, _) | (_, Thing::Error) => Thing::Error,
            (Thing::Str(x), Thing::Str(y)) => Thing::Str(x + &y),
            (Thing::Str(x), other) if other.is_correctly_typed() => {
                let shown = self.display_value(&other)?;
                Thing::Str(x + &shown)
            }
            (other, Thing::Str(y)) if other.is_correctly_typed() => {
                let shown = self.display_value(&other)?;
                Thing::Str(shown + &y)
            }
            (Thing::List(mut x), Thing::List(y)) => {
                x.extend(y);
                Thing::List(x)
            }
            (Thing::List(mut x), Thing::FinalEllipticList(y)) => {
                x.extend(y);
                Thing::FinalEllipticList(x)
            }
            (Thing::FinalEllipticList(_), Thing::List(_) | Thing::FinalEllipticList(_)) => {
                self.warn("an end-elliptic list cannot be extended at its end");
                Thing::Error
            }
            (a, b) => Thing::Concat(Box::new(a), Box::new(b)),
        })
    }

    fn prepend(&mut self, element: Thing, list: Thing) -> Thing {
        match (element, list) {
            (Thing::Error, _) | (_, Thing::Error) => Thing::Error,
            (e, Thing::List(mut items)) if e.is_correctly_typed() => {
                items.insert(0, e);
                Thing::List(items)
            }
            (e, Thing::FinalEllipticList(mut items)) if e.is_correctly_typed() => {
                items.insert(0, e);
                Thing::FinalEllipticList(items)
            }
            (e, l) => Thing::Prepend(Box::new(e), Box::new(l)),
        }
    }

    fn append(&mut self, list: Thing, element: Thing) -> Thing {
        match (list, element) {
            (Thing::Error, _) | (_, Thing::Error) => Thing::Error,
            (Thing::List(mut items), e) if e.is_correctly_typed() => {
                items.push(e);
                Thing::List(items)
            }
            (Thing::FinalEllipticList(_), _) => {
                self.warn("an end-elliptic list cannot be extended at its end");
                Thing::Error
            }
            (l, e) => Thing::Append(Box::new(l), Box::new(e)),
        }
    }

    // Collaborators

    fn run_algorithm(&mut self, algorithm: Algorithm, args: &[Thing]) -> EvalResult {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg)?);
        }
        if values.iter().any(Thing::is_error) {
            return Ok(Thing::Error);
        }
        self.start_timer("algorithms");
        let result = match self.algorithms.as_mut() {
            Some(algorithms) => algorithms.run(algorithm, &values, &self.config),
            None => None,
        };
        self.stop_timer();
        Ok(result.unwrap_or_else(|| {
            self.warn(format!(
                "the algorithm \"{}\" is not available in this session",
                algorithm.name()
            ));
            Thing::Error
        }))
    }

    // Constants

    fn approx(&mut self, e: &Thing) -> EvalResult {
        match self.evaluate(e)? {
            Thing::Range(r) => Ok(Thing::Constant(r.midpoint(self.config.prec))),
            v if v.is_constant_expression() => {
                let prec = self.config.prec;
                Ok(self
                    .approximate_value(&v, prec)?
                    .map_or(Thing::Error, Thing::Constant))
            }
            other => Ok(other),
        }
    }

    /// Evaluate and reduce to a float at `prec` bits. Silent: callers
    /// decide how to report unfaithful results.
    pub fn evaluate_to_constant(&mut self, thing: &Thing, prec: u32) -> EvalResult<Approximation> {
        let value = self.evaluate(thing)?;
        approximate(&value, prec, self)
    }

    /// Approximate an evaluated constant expression, warning when the
    /// result is not faithful.
    pub(crate) fn approximate_value(&mut self, value: &Thing, prec: u32) -> EvalResult<Option<Float>> {
        self.start_timer("faithful evaluation");
        let approximation = approximate(value, prec, self);
        self.stop_timer();
        Ok(match approximation? {
            Approximation::Exact(c) | Approximation::Faithful(c) => Some(c),
            Approximation::Unfaithful { value: v, maybe_zero } => {
                let shown = self.render(value);
                if v.is_nan() {
                    self.warn(format!("the expression \"{shown}\" is undefined"));
                } else if maybe_zero {
                    self.warn(format!(
                        "the expression \"{shown}\" could not be evaluated faithfully and may be \
                         zero; the value shown may be meaningless"
                    ));
                } else {
                    self.warn(format!(
                        "the expression \"{shown}\" could not be evaluated faithfully with {prec} \
                         bits; a more precise approximation is shown"
                    ));
                }
                Some(v)
            }
            Approximation::Failure => None,
        })
    }

    // Printing

    /// Text shown for a value by auto-print and `print`.
    pub fn display_value(&mut self, value: &Thing) -> EvalResult<String> {
        let shown = self.printable(value)?;
        Ok(self.render(&shown))
    }

    fn printable(&mut self, value: &Thing) -> EvalResult {
        Ok(match value {
            Thing::Constant(_) => value.clone(),
            v if v.is_constant_expression() => {
                if self.config.rational_mode {
                    if let Some(shown) = exact::exact_value(v).as_ref().and_then(fraction) {
                        return Ok(shown);
                    }
                }
                let prec = self.config.prec;
                self.approximate_value(v, prec)?
                    .map_or_else(|| v.clone(), Thing::Constant)
            }
            v if v.is_pure_tree() => match poly::coefficients(v) {
                Some(coeffs) if self.config.canonical => poly::canonical(&coeffs),
                _ => v.clone(),
            },
            Thing::List(items) => Thing::List(self.printable_items(items)?),
            Thing::FinalEllipticList(items) => Thing::FinalEllipticList(self.printable_items(items)?),
            Thing::Structure(s) => {
                let mut shown = Structure::new();
                for (name, field) in s.iter() {
                    shown.set(name.clone(), self.printable(field)?);
                }
                Thing::Structure(shown)
            }
            other => other.clone(),
        })
    }

    fn printable_items(&mut self, items: &[Thing]) -> EvalResult<Vec<Thing>> {
        items.iter().map(|item| self.printable(item)).collect()
    }
}

/// `p / q` in lowest terms, or just `p` for an integer.
fn fraction(r: &Rational) -> Option<Thing> {
    let numer = Thing::Constant(exact::integer_to_float(r.numer())?);
    if *r.denom() == 1 {
        return Some(numer);
    }
    let denom = Thing::Constant(exact::integer_to_float(r.denom())?);
    Some(Thing::binary(BinaryOp::Div, numer, denom))
}
