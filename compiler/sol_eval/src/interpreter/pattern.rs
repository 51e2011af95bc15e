//! `match ... with` expressions.
//!
//! Patterns are unevaluated expressions. Identifiers in a pattern bind
//! the corresponding part of the value; bindings made by different
//! sub-patterns must agree. The first arm whose pattern matches runs in
//! a fresh frame holding its bindings.

use smallvec::SmallVec;

use sol_ir::{MatchArm, Name, Statement, Thing};

use super::Interpreter;
use crate::diagnostics::CallFrame;
use crate::errors::{procedure_failure, EvalResult};
use crate::eval::lists;
use crate::exec::Flow;

type Bindings = SmallVec<[(Name, Thing); 4]>;

/// Record `name = value`, failing on a conflicting earlier binding.
fn bind(bindings: &mut Bindings, name: &Name, value: &Thing) -> bool {
    match bindings.iter().find(|(n, _)| n == name) {
        Some((_, existing)) => existing == value,
        None => {
            bindings.push((name.clone(), value.clone()));
            true
        }
    }
}

/// Literal equality, with NaN matching NaN.
fn same_literal(value: &Thing, pattern: &Thing) -> bool {
    match (value, pattern) {
        (Thing::Constant(a), Thing::Constant(b)) => a == b || (a.is_nan() && b.is_nan()),
        _ => value == pattern,
    }
}

/// `f(_x_)` for a node with a single numeric child, and that child.
fn head_symbol(tree: &Thing) -> Option<(Thing, &Thing)> {
    let x = Box::new(Thing::FreeVariable);
    let (head, arg) = match tree {
        Thing::Unary { func, arg } => (Thing::Unary { func: *func, arg: x }, arg),
        Thing::RoundTo { format, arg } => (
            Thing::RoundTo {
                format: *format,
                arg: x,
            },
            arg,
        ),
        Thing::LibraryFunction {
            function,
            derivative,
            arg,
        } => (
            Thing::LibraryFunction {
                function: function.clone(),
                derivative: *derivative,
                arg: x,
            },
            arg,
        ),
        Thing::ProcedureFunction {
            procedure,
            derivative,
            arg,
        } => (
            Thing::ProcedureFunction {
                procedure: procedure.clone(),
                derivative: *derivative,
                arg: x,
            },
            arg,
        ),
        _ => return None,
    };
    Some((head, &**arg))
}

/// A pattern spelling out a fixed string, such as `"ab" @ "c"`.
fn literal_string(pattern: &Thing) -> Option<String> {
    match pattern {
        Thing::Str(s) => Some(s.clone()),
        Thing::Concat(a, b) => Some(literal_string(a)? + &literal_string(b)?),
        _ => None,
    }
}

/// Drop trailing elements an end-elliptic list would generate anyway.
fn normalize_elliptic(items: &[Thing]) -> &[Thing] {
    let mut len = items.len();
    while len >= 2 && items[len - 1] == lists::continue_sequence(&items[len - 2], 1) {
        len -= 1;
    }
    &items[..len]
}

impl Interpreter {
    pub(crate) fn evaluate_match(&mut self, subject: &Thing, arms: &[MatchArm]) -> EvalResult {
        let value = self.evaluate(subject)?;
        self.escape_point("match", |this| {
            this.call_stack.push(CallFrame {
                name: Name::new("match"),
            })?;
            let result = this.select_arm(&value, arms);
            this.call_stack.pop();
            result
        })
    }

    fn select_arm(&mut self, value: &Thing, arms: &[MatchArm]) -> EvalResult {
        for arm in arms {
            let mut bindings = Bindings::new();
            if self.matches(value, &arm.pattern, &mut bindings)? {
                tracing::trace!(bindings = bindings.len(), "match arm selected");
                return self.run_arm(arm, bindings);
            }
        }
        let message = format!("no pattern matches \"{}\"", self.render(value));
        self.warn(message);
        Ok(Thing::Error)
    }

    fn run_arm(&mut self, arm: &MatchArm, bindings: Bindings) -> EvalResult {
        if arm.body.iter().any(Statement::contains_quit_or_restart) {
            self.warn("quit and restart are not allowed inside a match arm");
            return Ok(Thing::Error);
        }
        self.with_frame(|scoped| {
            for (name, value) in bindings {
                if let Err(e) = scoped.env.declare(name, value) {
                    scoped.warn(e.to_string());
                    return Ok(Thing::Error);
                }
            }
            for statement in &arm.body {
                if let Flow::Exit(_) = scoped.execute(statement)? {
                    return Err(procedure_failure("quit or restart reached inside a match arm"));
                }
            }
            scoped.evaluate(&arm.result)
        })
    }

    fn is_free_variable_name(&self, name: &Name) -> bool {
        self.env.free_variable() == Some(name)
    }

    /// Try `pattern` against `value`, extending `bindings`. On `false`
    /// the bindings are garbage.
    fn matches(&mut self, value: &Thing, pattern: &Thing, bindings: &mut Bindings) -> EvalResult<bool> {
        match pattern {
            Thing::Default => Ok(true),
            Thing::Identifier(name) => Ok(if self.is_free_variable_name(name) {
                matches!(value, Thing::FreeVariable)
            } else {
                bind(bindings, name, value)
            }),
            Thing::Constant(_)
            | Thing::Boolean(_)
            | Thing::Str(_)
            | Thing::Unit
            | Thing::Keyword(_)
            | Thing::Range(_) => Ok(same_literal(value, pattern)),
            Thing::DecimalConstant(_) | Thing::DyadicConstant(_) | Thing::BinaryConstant(_) => {
                let literal = self.evaluate_inner(pattern)?;
                Ok(same_literal(value, &literal))
            }
            Thing::Apply { callee, args } => match (callee.as_ref(), args.as_slice()) {
                (Thing::Identifier(f), [inner]) => self.match_head(value, f, inner, bindings),
                _ => Ok(false),
            },
            Thing::FreeVariable | Thing::Pi => Ok(value == pattern),
            Thing::Binary { op, lhs, rhs } => match value {
                Thing::Binary {
                    op: vop,
                    lhs: vl,
                    rhs: vr,
                } if vop == op => {
                    Ok(self.matches(vl, lhs, bindings)? && self.matches(vr, rhs, bindings)?)
                }
                _ => Ok(false),
            },
            Thing::Unary { .. }
            | Thing::RoundTo { .. }
            | Thing::LibraryFunction { .. }
            | Thing::ProcedureFunction { .. } => {
                let (Some((pattern_head, pattern_arg)), Some((value_head, value_arg))) =
                    (head_symbol(pattern), head_symbol(value))
                else {
                    return Ok(false);
                };
                if pattern_head != value_head {
                    return Ok(false);
                }
                self.matches(value_arg, pattern_arg, bindings)
            }
            Thing::LibraryConstant(_) => Ok(value == pattern),
            Thing::RangeOf { lo, hi } => match value {
                Thing::Range(r) => Ok(self.match_bound(r.lo(), lo, bindings)?
                    && self.match_bound(r.hi(), hi, bindings)?),
                _ => Ok(false),
            },
            Thing::List(patterns) => match value {
                Thing::List(items) if items.len() == patterns.len() => {
                    self.match_all(items, patterns, bindings)
                }
                _ => Ok(false),
            },
            Thing::FinalEllipticList(patterns) => match value {
                Thing::FinalEllipticList(items) => {
                    let items = normalize_elliptic(items);
                    if items.len() > patterns.len() {
                        return Ok(false);
                    }
                    let expanded = lists::materialize(items, patterns.len());
                    self.match_all(&expanded, patterns, bindings)
                }
                _ => Ok(false),
            },
            Thing::Prepend(head, tail) => {
                let (first, rest) = match value {
                    Thing::List(items) if !items.is_empty() => {
                        (&items[0], Thing::List(items[1..].to_vec()))
                    }
                    Thing::FinalEllipticList(items) if !items.is_empty() => {
                        (&items[0], Thing::FinalEllipticList(lists::elliptic_tail(items)))
                    }
                    _ => return Ok(false),
                };
                Ok(self.matches(first, head, bindings)? && self.matches(&rest, tail, bindings)?)
            }
            Thing::Append(init, last) => match value {
                Thing::List(items) => match items.split_last() {
                    Some((end, front)) => Ok(self.matches(&Thing::List(front.to_vec()), init, bindings)?
                        && self.matches(end, last, bindings)?),
                    None => Ok(false),
                },
                _ => Ok(false),
            },
            Thing::Concat(a, b) => match value {
                Thing::Str(s) => self.match_string_concat(s, pattern, a, b, bindings),
                Thing::List(_) | Thing::FinalEllipticList(_) => {
                    self.match_list_concat(value, a, b, bindings)
                }
                _ => Ok(false),
            },
            Thing::StructureOf(fields) => match value {
                Thing::Structure(s) => {
                    for (name, field_pattern) in fields {
                        let Some(field) = s.get(name.as_str()) else {
                            return Ok(false);
                        };
                        if !self.matches(field, field_pattern, bindings)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                _ => Ok(false),
            },
            _ => Ok(false),
        }
    }

    fn match_all(&mut self, items: &[Thing], patterns: &[Thing], bindings: &mut Bindings) -> EvalResult<bool> {
        for (item, pattern) in items.iter().zip(patterns) {
            if !self.matches(item, pattern, bindings)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// A range endpoint against `_`, an identifier or a literal.
    fn match_bound(&mut self, bound: &sol_num::Float, pattern: &Thing, bindings: &mut Bindings) -> EvalResult<bool> {
        let value = Thing::Constant(bound.clone());
        match pattern {
            Thing::Default => Ok(true),
            Thing::Identifier(name) if !self.is_free_variable_name(name) => {
                Ok(bind(bindings, name, &value))
            }
            Thing::Constant(_)
            | Thing::DecimalConstant(_)
            | Thing::DyadicConstant(_)
            | Thing::BinaryConstant(_) => self.matches(&value, pattern, bindings),
            _ => Ok(false),
        }
    }

    /// `f(p)`: find the outermost chain of unary nodes `g` such that the
    /// value is `g(v)` with `v` matching `p`, and bind `f` to `g`.
    fn match_head(&mut self, value: &Thing, f: &Name, inner: &Thing, bindings: &mut Bindings) -> EvalResult<bool> {
        if self.is_free_variable_name(f) {
            self.inform(
                1,
                format!("\"{f}\" is the free variable; in a pattern it is read as the identity function"),
            );
            return self.matches(value, inner, bindings);
        }
        let Some((mut head, mut current)) = head_symbol(value) else {
            return Ok(false);
        };
        loop {
            let mut attempt = bindings.clone();
            if self.matches(current, inner, &mut attempt)? && bind(&mut attempt, f, &head) {
                *bindings = attempt;
                return Ok(true);
            }
            if matches!(inner, Thing::Apply { .. }) {
                return Ok(false);
            }
            let Some((next_head, next)) = head_symbol(current) else {
                return Ok(false);
            };
            head = head.substitute(&next_head);
            current = next;
        }
    }

    fn match_string_concat(
        &mut self,
        s: &str,
        pattern: &Thing,
        a: &Thing,
        b: &Thing,
        bindings: &mut Bindings,
    ) -> EvalResult<bool> {
        if let Some(whole) = literal_string(pattern) {
            return Ok(whole == s);
        }
        if let Some(prefix) = literal_string(a) {
            return match s.strip_prefix(prefix.as_str()) {
                Some(rest) => self.matches(&Thing::Str(rest.to_string()), b, bindings),
                None => Ok(false),
            };
        }
        if let Some(suffix) = literal_string(b) {
            return match s.strip_suffix(suffix.as_str()) {
                Some(rest) => self.matches(&Thing::Str(rest.to_string()), a, bindings),
                None => Ok(false),
            };
        }
        Ok(false)
    }

    /// `[|p1, ..., pk|] @ rest` or `rest @ [|p1, ..., pk|]` on lists.
    fn match_list_concat(&mut self, value: &Thing, a: &Thing, b: &Thing, bindings: &mut Bindings) -> EvalResult<bool> {
        let (items, elliptic) = match value {
            Thing::List(items) => (items, false),
            Thing::FinalEllipticList(items) => (items, true),
            _ => return Ok(false),
        };
        if let Thing::List(prefix) = a {
            let k = prefix.len();
            if !elliptic && items.len() < k {
                return Ok(false);
            }
            let expanded = if elliptic {
                lists::materialize(items, k + 1)
            } else {
                items.clone()
            };
            let rest = if elliptic {
                Thing::FinalEllipticList(expanded[k..].to_vec())
            } else {
                Thing::List(expanded[k..].to_vec())
            };
            return Ok(self.match_all(&expanded[..k], prefix, bindings)?
                && self.matches(&rest, b, bindings)?);
        }
        if let (Thing::List(suffix), false) = (b, elliptic) {
            let k = suffix.len();
            if items.len() < k {
                return Ok(false);
            }
            let split = items.len() - k;
            return Ok(self.match_all(&items[split..], suffix, bindings)?
                && self.matches(&Thing::List(items[..split].to_vec()), a, bindings)?);
        }
        Ok(false)
    }
}
