//! Printing, meta-assignments, I/O delegation and native bindings.

use sol_ir::{ExternalKind, IoCommand, Name, Setting, Statement, Thing};

use super::Flow;
use crate::collab::IoOutcome;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;

impl Interpreter {
    /// Print the value of an expression statement. `void` prints nothing.
    pub(super) fn auto_print(&mut self, expr: &Thing) -> EvalResult<()> {
        let value = self.evaluate(expr)?;
        if value == Thing::Unit {
            return Ok(());
        }
        let text = self.display_value(&value)?;
        self.println(&text);
        Ok(())
    }

    pub(super) fn execute_print(&mut self, args: &[Thing]) -> EvalResult<()> {
        let mut parts = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.evaluate(arg)?;
            parts.push(self.display_value(&value)?);
        }
        self.println(&parts.join(" "));
        Ok(())
    }

    /// `prec = 200;` and friends. `echo` is the form that confirms the
    /// new value.
    pub(super) fn set_setting(&mut self, setting: Setting, value: &Thing, echo: bool) -> EvalResult<()> {
        let mut value = self.evaluate(value)?;
        if value.is_error() {
            return Ok(());
        }
        if value.is_constant_expression() && !matches!(value, Thing::Constant(_)) {
            let prec = self.config.prec;
            if let Some(c) = self.approximate_value(&value, prec)? {
                value = Thing::Constant(c);
            }
        }
        match self.config.apply(setting, &value) {
            Ok(()) => {
                tracing::debug!(setting = setting.name(), "setting changed");
                if setting == Setting::Timing {
                    self.timers.set_enabled(self.config.timing);
                }
                if echo {
                    let text = self.config.describe(setting);
                    self.println(&text);
                }
            }
            Err(e) => self.warn(e.to_string()),
        }
        Ok(())
    }

    /// Hand an I/O statement to the collaborator. Statements it asks to
    /// run (as read by `execute`) cannot quit or restart the session.
    pub(super) fn execute_io(&mut self, command: IoCommand, args: &[Thing]) -> EvalResult<Flow> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg)?);
        }
        let Some(io) = self.io.as_mut() else {
            self.warn(format!("{} is not available in this session", command.name()));
            return Ok(Flow::Continue);
        };
        let outcome = io.perform(command, &values, &self.config);
        match outcome {
            Ok(IoOutcome::Done) => Ok(Flow::Continue),
            Ok(IoOutcome::Run(statements)) => {
                self.run_read_statements(&statements)?;
                Ok(Flow::Continue)
            }
            Err(message) => {
                self.warn(format!("{} failed: {message}", command.name()));
                Ok(Flow::Continue)
            }
        }
    }

    fn run_read_statements(&mut self, statements: &[Statement]) -> EvalResult<()> {
        for statement in statements {
            if self.execute(statement)?.is_exit() {
                self.warn("quit or restart in a file read by execute is ignored");
                break;
            }
        }
        Ok(())
    }

    /// `rename(from, to)`: give the free variable a new name.
    pub(super) fn rename_free_variable(&mut self, from: &Name, to: &Name) {
        if let Some(current) = self.env.free_variable() {
            if current != from {
                let message = format!(
                    "the free variable is named \"{current}\", not \"{from}\"; nothing is renamed"
                );
                self.warn(message);
                return;
            }
        }
        if let Err(e) = self.env.bind_free_variable(to.clone()) {
            self.warn(e.to_string());
            return;
        }
        self.inform(1, format!("the free variable has been renamed to \"{to}\""));
    }

    pub(super) fn bind_library(&mut self, name: &Name, symbol: &str) {
        match self.natives.function(name.clone(), symbol) {
            Some(function) => {
                if let Err(e) = self.env.bind_library_function(function) {
                    self.warn(e.to_string());
                }
            }
            None => self.warn(format!("no native function is registered under \"{symbol}\"")),
        }
    }

    pub(super) fn bind_library_constant(&mut self, name: &Name, symbol: &str) {
        match self.natives.constant(name.clone(), symbol) {
            Some(constant) => {
                if let Err(e) = self.env.bind_library_constant(constant) {
                    self.warn(e.to_string());
                }
            }
            None => self.warn(format!("no native constant is registered under \"{symbol}\"")),
        }
    }

    pub(super) fn bind_external(
        &mut self,
        name: &Name,
        symbol: &str,
        params: &[ExternalKind],
        result: ExternalKind,
    ) {
        match self
            .natives
            .procedure(name.clone(), symbol, params.to_vec(), result)
        {
            Some(procedure) => {
                if let Err(e) = self.env.bind_external_procedure(procedure) {
                    self.warn(e.to_string());
                }
            }
            None => self.warn(format!("no native procedure is registered under \"{symbol}\"")),
        }
    }
}
