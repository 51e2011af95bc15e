//! Procedure calls and escape points.
//!
//! Procedures are called by value: every actual argument is an owned
//! copy declared in the callee's frame. External procedures marshal
//! their arguments into [`ExternalValue`]s and their result back.

use std::sync::Arc;

use sol_ir::{ExternalKind, ExternalProcedure, ExternalValue, Name, Procedure, Statement, Thing};

use super::Interpreter;
use crate::diagnostics::CallFrame;
use crate::errors::{external_failure, procedure_failure, EvalResult};
use crate::exec::Flow;

impl Interpreter {
    /// Run `f`, restoring the environment frames, call stack, timers and
    /// configuration to their state on entry if it fails. The failure is
    /// returned with `label` attached as context.
    pub(crate) fn unwinding<T>(
        &mut self,
        label: &str,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let config = self.config.clone();
        let env_depth = self.env.depth();
        let call_depth = self.call_stack.depth();
        let timer_depth = self.timers.depth();
        f(self).map_err(|e| {
            self.env.truncate(env_depth);
            self.call_stack.truncate(call_depth);
            self.timers.truncate(timer_depth);
            self.config = config;
            e.with_context(label)
        })
    }

    /// Escape point of a procedure or match call: an internal failure is
    /// reported and turned into `error`, unless die-on-error is set.
    pub(crate) fn escape_point(
        &mut self,
        label: &str,
        f: impl FnOnce(&mut Self) -> EvalResult,
    ) -> EvalResult {
        match self.unwinding(label, f) {
            Ok(value) => Ok(value),
            Err(e) if self.config.die_on_error => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "recovered at escape point");
                self.warn(e.to_string());
                Ok(Thing::Error)
            }
        }
    }

    /// Call a user procedure on evaluated arguments.
    #[tracing::instrument(level = "debug", skip_all, fields(params = procedure.params.len()))]
    pub(crate) fn call_procedure(&mut self, procedure: &Arc<Procedure>, args: Vec<Thing>) -> EvalResult {
        let label = format!("call of {}", self.render(&Thing::Procedure(Arc::clone(procedure))));
        self.escape_point(&label, |this| {
            this.call_stack.push(CallFrame {
                name: Name::new("proc"),
            })?;
            let result = this.run_procedure(procedure, args);
            this.call_stack.pop();
            result
        })
    }

    fn run_procedure(&mut self, procedure: &Procedure, mut args: Vec<Thing>) -> EvalResult {
        if procedure.params.is_empty() && args == [Thing::Unit] {
            args.clear();
        }
        let bindings: Vec<(Name, Thing)> = if procedure.variadic {
            let Some(param) = procedure.params.first() else {
                return Err(procedure_failure("a variadic procedure has no parameter to bind"));
            };
            let list = if args == [Thing::Unit] {
                Vec::new()
            } else {
                args
            };
            vec![(param.clone(), Thing::List(list))]
        } else if args.len() == procedure.params.len() {
            procedure.params.iter().cloned().zip(args).collect()
        } else {
            self.warn(format!(
                "the procedure expects {} argument(s), {} given",
                procedure.params.len(),
                args.len()
            ));
            return Ok(Thing::Error);
        };
        if procedure.body.iter().any(Statement::contains_quit_or_restart) {
            self.warn("a procedure containing quit or restart cannot be executed");
            return Ok(Thing::Error);
        }

        self.with_frame(|scoped| {
            for (name, value) in bindings {
                if let Err(e) = scoped.env.declare(name, value) {
                    scoped.warn(e.to_string());
                    return Ok(Thing::Error);
                }
            }
            for statement in &procedure.body {
                if let Flow::Exit(_) = scoped.execute(statement)? {
                    return Err(procedure_failure("quit or restart reached inside a procedure"));
                }
            }
            scoped.evaluate(&procedure.result)
        })
    }

    /// Call a natively bound procedure on evaluated arguments.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %procedure.name))]
    pub(crate) fn call_external(
        &mut self,
        procedure: &Arc<ExternalProcedure>,
        args: Vec<Thing>,
    ) -> EvalResult {
        let label = format!("external procedure {}", procedure.name);
        self.escape_point(&label, |this| {
            this.call_stack.push(CallFrame {
                name: procedure.name.clone(),
            })?;
            let result = this.run_external(procedure, args);
            this.call_stack.pop();
            result
        })
    }

    fn run_external(&mut self, procedure: &ExternalProcedure, args: Vec<Thing>) -> EvalResult {
        let nullary = procedure.is_nullary();
        let params = if nullary {
            &procedure.params[..0]
        } else {
            procedure.params.as_slice()
        };
        let args = if nullary && args == [Thing::Unit] {
            Vec::new()
        } else {
            args
        };
        if args.len() != params.len() {
            self.warn(format!(
                "{} expects {} argument(s), {} given",
                procedure.name,
                params.len(),
                args.len()
            ));
            return Ok(Thing::Error);
        }

        let mut marshalled = Vec::with_capacity(args.len());
        for (i, (kind, value)) in params.iter().zip(&args).enumerate() {
            match self.marshal(*kind, value)? {
                Some(v) => marshalled.push(v),
                None => {
                    let message = format!(
                        "argument {} of {} must be of type {}, not \"{}\"",
                        i + 1,
                        procedure.name,
                        kind.name(),
                        self.render(value)
                    );
                    self.warn(message);
                    return Ok(Thing::Error);
                }
            }
        }

        self.start_timer("external procedures");
        let outcome = procedure.call(&marshalled);
        self.stop_timer();
        let value = outcome.map_err(|message| external_failure(procedure.name.as_str(), message))?;
        unmarshal(procedure.result, value).ok_or_else(|| {
            external_failure(
                procedure.name.as_str(),
                format!("the result is not of type {}", procedure.result.name()),
            )
        })
    }

    fn marshal(&mut self, kind: ExternalKind, value: &Thing) -> EvalResult<Option<ExternalValue>> {
        if let Some(element) = kind.element() {
            let Thing::List(items) = value else {
                return Ok(None);
            };
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match self.marshal(element, item)? {
                    Some(v) => out.push(v),
                    None => return Ok(None),
                }
            }
            return Ok(Some(ExternalValue::List(out)));
        }
        Ok(match (kind, value) {
            (ExternalKind::Void, Thing::Unit) => Some(ExternalValue::Void),
            (ExternalKind::Constant, Thing::Constant(c)) => Some(ExternalValue::Constant(c.clone())),
            (ExternalKind::Constant, v) if v.is_constant_expression() => {
                let prec = self.config.prec;
                self.approximate_value(v, prec)?.map(ExternalValue::Constant)
            }
            (ExternalKind::Function, f) if f.is_pure_tree() => {
                Some(ExternalValue::Function(f.clone()))
            }
            (ExternalKind::Range, Thing::Range(r)) => Some(ExternalValue::Range(r.clone())),
            (ExternalKind::Range, Thing::Constant(c)) => {
                Some(ExternalValue::Range(sol_num::Interval::point(c)))
            }
            (ExternalKind::Integer, v) => v.as_integer().map(ExternalValue::Integer),
            (ExternalKind::String, Thing::Str(s)) => Some(ExternalValue::String(s.clone())),
            (ExternalKind::Boolean, Thing::Boolean(b)) => Some(ExternalValue::Boolean(*b)),
            _ => None,
        })
    }
}

fn unmarshal(kind: ExternalKind, value: ExternalValue) -> Option<Thing> {
    if let Some(element) = kind.element() {
        let ExternalValue::List(items) = value else {
            return None;
        };
        return items
            .into_iter()
            .map(|item| unmarshal(element, item))
            .collect::<Option<Vec<_>>>()
            .map(Thing::List);
    }
    match (kind, value) {
        (ExternalKind::Void, ExternalValue::Void) => Some(Thing::Unit),
        (ExternalKind::Constant, ExternalValue::Constant(c)) => Some(Thing::Constant(c)),
        (ExternalKind::Function, ExternalValue::Function(f)) if f.is_pure_tree() => Some(f),
        (ExternalKind::Range, ExternalValue::Range(r)) => Some(Thing::Range(r)),
        (ExternalKind::Integer, ExternalValue::Integer(n)) => Some(Thing::integer(n)),
        (ExternalKind::String, ExternalValue::String(s)) => Some(Thing::Str(s)),
        (ExternalKind::Boolean, ExternalValue::Boolean(b)) => Some(Thing::Boolean(b)),
        _ => None,
    }
}
