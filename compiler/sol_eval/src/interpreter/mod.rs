//! Tree-walking interpreter for Sol.
//!
//! # Architecture
//!
//! [`Interpreter`] owns one session's mutable state: the symbol
//! environment, the configuration, the diagnostic log and the call stack.
//! Behavior is split across `impl Interpreter` blocks:
//!
//! - `crate::eval` - expression reduction, comparisons, built-ins
//! - `crate::exec` - statements, loops, assignment
//! - `procedure` - procedure and external procedure calls, escape points
//! - `pattern` - `match` expressions
//!
//! # Failures
//!
//! Two kinds of failure exist. Recoverable ones (type mismatches, bad
//! indices, undefined values) emit one warning through [`Interpreter::warn`]
//! and produce `Thing::Error`. Internal ones are `Err(EvalError)` and
//! unwind to the nearest escape point: a procedure call, a `match`, or the
//! top-level command in [`crate::Session`].

mod builder;
mod pattern;
mod procedure;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use sol_ir::{RenderOptions, Thing};

use crate::collab::{Algorithms, IoCollaborator};
use crate::config::Configuration;
use crate::diagnostics::{CallStack, Diagnostic, DiagnosticLog, Severity};
use crate::environment::Environment;
use crate::print_handler::SharedPrintHandler;
use crate::registry::NativeRegistry;
use crate::timing::Timers;

/// One session's evaluator.
pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) config: Configuration,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) diagnostics: DiagnosticLog,
    pub(crate) call_stack: CallStack,
    pub(crate) timers: Timers,
    pub(crate) natives: NativeRegistry,
    pub(crate) algorithms: Option<Box<dyn Algorithms>>,
    pub(crate) io: Option<Box<dyn IoCollaborator>>,
}

impl Interpreter {
    /// An interpreter printing to stdout with default settings.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn natives_mut(&mut self) -> &mut NativeRegistry {
        &mut self.natives
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Depth of active procedure and match calls.
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    // Diagnostics

    fn emit(&mut self, diagnostic: Diagnostic) {
        if self.config.verbosity >= diagnostic.severity.threshold() {
            self.print_handler.println(&diagnostic.to_string());
        }
        self.diagnostics.push(diagnostic);
    }

    /// Report a recovered failure.
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "warning");
        self.emit(Diagnostic {
            severity: Severity::Warning,
            message,
        });
    }

    /// Report an informational note shown from verbosity `level` on.
    pub(crate) fn inform(&mut self, level: u32, message: impl Into<String>) {
        self.emit(Diagnostic {
            severity: Severity::Information { level },
            message: message.into(),
        });
    }

    pub(crate) fn println(&self, text: &str) {
        self.print_handler.println(text);
    }

    // Rendering

    /// Render with the session's display settings and free variable name.
    pub fn render(&self, thing: &Thing) -> String {
        let opts = RenderOptions {
            mode: self.config.display,
            midpoint: self.config.midpoint_mode,
            full_parentheses: self.config.full_parentheses,
            free_variable: self.env.free_variable().map(|n| n.as_str()),
        };
        thing.render(&opts)
    }

    // Timing

    pub(crate) fn start_timer(&mut self, category: &'static str) {
        self.timers.push(category);
    }

    pub(crate) fn stop_timer(&mut self) {
        if let Some((category, elapsed)) = self.timers.pop() {
            tracing::trace!(category, ?elapsed, "timer");
            self.inform(2, format!("spent {} ms on {category}", elapsed.as_millis()));
        }
    }

    /// Forget all state, as `restart` does. Collaborators and natives stay.
    pub fn restart(&mut self) {
        tracing::debug!("restart");
        self.env.clear();
        self.config = Configuration::default();
        self.call_stack.truncate(0);
        self.timers = Timers::new();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
