//! Top-level command driver.
//!
//! Each top-level command runs behind the outermost escape point: an
//! internal failure restores the interpreter state of before the command,
//! prints one warning and either lets the session continue or, with
//! die-on-error set, terminates it.

use sol_ir::Statement;

use crate::errors::internal;
use crate::exec::{ExitRequest, Flow};
use crate::interpreter::Interpreter;

/// How a top-level command ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command ran to its end.
    Completed,
    /// `quit` was executed.
    Quit,
    /// `restart` was executed; the interpreter has been reset.
    Restart,
    /// An internal failure aborted the command; the session goes on.
    Aborted,
    /// An internal failure with die-on-error set.
    Terminated,
}

impl CommandOutcome {
    /// Whether the session must stop after this command.
    pub fn ends_session(self) -> bool {
        matches!(self, CommandOutcome::Quit | CommandOutcome::Terminated)
    }
}

/// An interpreter fed one top-level command at a time.
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    /// Wrap a configured interpreter.
    pub fn new(interpreter: Interpreter) -> Self {
        Session { interpreter }
    }

    /// The interpreter, e.g. to inspect variables between commands.
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Mutable access to the interpreter, e.g. to change settings.
    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// End the session, keeping the interpreter.
    pub fn into_interpreter(self) -> Interpreter {
        self.interpreter
    }

    /// Execute one top-level command.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, statement: &Statement) -> CommandOutcome {
        self.interpreter.start_timer("command");
        let result = self.interpreter.unwinding("top-level command", |interp| {
            let env_depth = interp.env.depth();
            let call_depth = interp.call_depth();
            let flow = interp.execute(statement)?;
            if interp.env.depth() != env_depth || interp.call_depth() != call_depth {
                return Err(internal("unbalanced frames after a command"));
            }
            Ok(flow)
        });
        self.interpreter.stop_timer();
        self.report_timing();
        match result {
            Ok(Flow::Continue) => CommandOutcome::Completed,
            Ok(Flow::Exit(ExitRequest::Quit)) => CommandOutcome::Quit,
            Ok(Flow::Exit(ExitRequest::Restart)) => {
                self.interpreter.restart();
                CommandOutcome::Restart
            }
            Err(e) => {
                self.interpreter.warn(e.to_string());
                if self.interpreter.config.die_on_error {
                    tracing::error!(error = %e, "command failed; terminating");
                    CommandOutcome::Terminated
                } else {
                    tracing::warn!(error = %e, "command aborted");
                    CommandOutcome::Aborted
                }
            }
        }
    }

    /// Report the time spent per category during the last command.
    fn report_timing(&mut self) {
        if !self.interpreter.timers.is_enabled() {
            return;
        }
        for (category, total) in self.interpreter.timers.report() {
            self.interpreter
                .inform(2, format!("{category} took {} ms in total", total.as_millis()));
        }
    }

    /// Execute commands in order until one ends the session. Returns the
    /// outcome of the last command run.
    pub fn run_all(&mut self, statements: &[Statement]) -> CommandOutcome {
        let mut last = CommandOutcome::Completed;
        for statement in statements {
            last = self.run(statement);
            if last.ends_session() {
                break;
            }
        }
        last
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Interpreter::new())
    }
}
