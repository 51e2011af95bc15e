//! Blocks, conditionals and loops.

use sol_ir::{Name, Statement, Thing};
use sol_num::{Float, MIN_PRECISION};

use super::Flow;
use crate::errors::{frame_corruption, EvalResult};
use crate::interpreter::Interpreter;

impl Interpreter {
    /// Run a block in its own frame, stopping at the first exit request.
    pub(super) fn execute_block(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        let depth = self.env.depth();
        let flow = self.with_frame(|scoped| -> EvalResult<Flow> {
            for statement in statements {
                let flow = scoped.execute(statement)?;
                if flow.is_exit() {
                    return Ok(flow);
                }
            }
            Ok(Flow::Continue)
        })?;
        if self.env.depth() != depth {
            return Err(frame_corruption(depth, self.env.depth()));
        }
        Ok(flow)
    }

    /// `var a, b;`: each name starts out as `error`.
    pub(super) fn declare_all(&mut self, names: &[Name]) {
        for name in names {
            if let Err(e) = self.env.declare(name.clone(), Thing::Error) {
                self.warn(e.to_string());
            }
        }
    }

    /// Evaluate a guard. `None` (after a warning) unless it is a boolean.
    fn guard(&mut self, condition: &Thing, construct: &str) -> EvalResult<Option<bool>> {
        match self.evaluate(condition)? {
            Thing::Boolean(b) => Ok(Some(b)),
            Thing::Error => Ok(None),
            other => {
                let message = format!(
                    "the condition of {construct} must be a boolean, not {} \"{}\"; the statement is skipped",
                    other.type_name(),
                    self.render(&other)
                );
                self.warn(message);
                Ok(None)
            }
        }
    }

    pub(super) fn execute_while(&mut self, condition: &Thing, body: &Statement) -> EvalResult<Flow> {
        while let Some(true) = self.guard(condition, "a while loop")? {
            let flow = self.execute(body)?;
            if flow.is_exit() {
                return Ok(flow);
            }
        }
        Ok(Flow::Continue)
    }

    pub(super) fn execute_if(
        &mut self,
        condition: &Thing,
        then_branch: &Statement,
        else_branch: Option<&Statement>,
    ) -> EvalResult<Flow> {
        match self.guard(condition, "an if statement")? {
            Some(true) => self.execute(then_branch),
            Some(false) => match else_branch {
                Some(branch) => self.execute(branch),
                None => Ok(Flow::Continue),
            },
            None => Ok(Flow::Continue),
        }
    }

    /// A bound of a `for` loop, reduced to a constant once.
    fn loop_bound(&mut self, thing: &Thing, what: &str) -> EvalResult<Option<Float>> {
        let value = self.evaluate(thing)?;
        match value {
            Thing::Constant(c) => Ok(Some(c)),
            Thing::Error => Ok(None),
            v if v.is_constant_expression() => {
                let prec = self.config.prec;
                self.approximate_value(&v, prec)
            }
            other => {
                let message = format!(
                    "the {what} of a for loop must be a constant, not {} \"{}\"",
                    other.type_name(),
                    self.render(&other)
                );
                self.warn(message);
                Ok(None)
            }
        }
    }

    /// Current value of the loop variable, re-read from the environment.
    fn loop_variable(&mut self, variable: &Name) -> Option<Float> {
        match self.env.resolve(variable.as_str()) {
            Some(Thing::Constant(c)) => Some(c),
            _ => {
                self.warn(format!(
                    "the loop variable \"{variable}\" no longer holds a constant; the loop is aborted"
                ));
                None
            }
        }
    }

    fn set_loop_variable(&mut self, variable: &Name, value: Float) -> bool {
        match self.env.assign(variable.clone(), Thing::Constant(value)) {
            Ok(()) => true,
            Err(e) => {
                self.warn(format!("{e}; the loop is aborted"));
                false
            }
        }
    }

    /// `for i from a to b by s do ...`. Bounds and step are evaluated
    /// once. On normal termination `i` holds the first value past `b`.
    pub(super) fn execute_for(
        &mut self,
        variable: &Name,
        start: &Thing,
        end: &Thing,
        step: Option<&Thing>,
        body: &Statement,
    ) -> EvalResult<Flow> {
        let Some(start) = self.loop_bound(start, "start")? else {
            return Ok(Flow::Continue);
        };
        let Some(end) = self.loop_bound(end, "end")? else {
            return Ok(Flow::Continue);
        };
        let step = match step {
            Some(step) => match self.loop_bound(step, "step")? {
                Some(step) => step,
                None => return Ok(Flow::Continue),
            },
            None => Float::with_val(MIN_PRECISION, 1),
        };
        if step.is_zero() || step.is_nan() {
            self.warn("the step of a for loop must be a non-zero number");
            return Ok(Flow::Continue);
        }
        let ascending = step.is_sign_positive();

        if !self.set_loop_variable(variable, start) {
            return Ok(Flow::Continue);
        }
        loop {
            let Some(current) = self.loop_variable(variable) else {
                return Ok(Flow::Continue);
            };
            let past_end = if ascending { current > end } else { current < end };
            if past_end {
                return Ok(Flow::Continue);
            }
            let flow = self.execute(body)?;
            if flow.is_exit() {
                return Ok(flow);
            }
            let Some(current) = self.loop_variable(variable) else {
                return Ok(Flow::Continue);
            };
            let prec = self.config.prec.max(current.prec()).max(step.prec());
            let next = Float::with_val(prec, &current + &step);
            if !self.set_loop_variable(variable, next) {
                return Ok(Flow::Continue);
            }
        }
    }

    /// `for x in list do ...` over the explicit elements of the list.
    pub(super) fn execute_for_in(
        &mut self,
        variable: &Name,
        list: &Thing,
        body: &Statement,
    ) -> EvalResult<Flow> {
        let items = match self.evaluate(list)? {
            Thing::List(items) | Thing::FinalEllipticList(items) => items,
            Thing::Error => return Ok(Flow::Continue),
            other => {
                let message = format!(
                    "a for .. in loop needs a list, not {} \"{}\"",
                    other.type_name(),
                    self.render(&other)
                );
                self.warn(message);
                return Ok(Flow::Continue);
            }
        };
        if items.is_empty() {
            self.inform(1, "the list is empty; the loop body is not executed");
            return Ok(Flow::Continue);
        }
        for item in items {
            if let Err(e) = self.env.assign(variable.clone(), item) {
                self.warn(format!("{e}; the loop is aborted"));
                return Ok(Flow::Continue);
            }
            let flow = self.execute(body)?;
            if flow.is_exit() {
                return Ok(flow);
            }
        }
        Ok(Flow::Continue)
    }

    /// `nop` or `nop(n)`: does nothing, but checks its argument.
    pub(super) fn execute_nop(&mut self, count: Option<&Thing>) -> EvalResult<()> {
        let Some(count) = count else {
            return Ok(());
        };
        let value = self.evaluate(count)?;
        if !value.is_error() && value.as_integer().map_or(true, |n| n < 0) {
            let message = format!(
                "nop expects a non-negative integer, not \"{}\"",
                self.render(&value)
            );
            self.warn(message);
        }
        Ok(())
    }
}
