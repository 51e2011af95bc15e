//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use super::Interpreter;
use crate::collab::{Algorithms, IoCollaborator};
use crate::config::{Configuration, MAX_RECURSION_DEPTH};
use crate::diagnostics::{CallStack, DiagnosticLog};
use crate::environment::Environment;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::registry::NativeRegistry;
use crate::timing::Timers;

/// Builder for creating Interpreter instances.
///
/// Defaults: empty environment, default configuration, stdout printing,
/// no native symbols and no collaborators.
#[derive(Default)]
pub struct InterpreterBuilder {
    env: Option<Environment>,
    config: Option<Configuration>,
    print_handler: Option<SharedPrintHandler>,
    natives: Option<NativeRegistry>,
    algorithms: Option<Box<dyn Algorithms>>,
    io: Option<Box<dyn IoCollaborator>>,
    max_recursion_depth: Option<usize>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder::default()
    }

    /// Set the initial environment.
    #[must_use]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    #[must_use]
    pub fn config(mut self, config: Configuration) -> Self {
        self.config = Some(config);
        self
    }

    /// Where `print`, auto-print and diagnostics go.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Native symbols available to the binding statements.
    #[must_use]
    pub fn natives(mut self, natives: NativeRegistry) -> Self {
        self.natives = Some(natives);
        self
    }

    #[must_use]
    pub fn algorithms(mut self, algorithms: Box<dyn Algorithms>) -> Self {
        self.algorithms = Some(algorithms);
        self
    }

    #[must_use]
    pub fn io(mut self, io: Box<dyn IoCollaborator>) -> Self {
        self.io = Some(io);
        self
    }

    /// Override the nesting limit for procedure and match calls.
    #[must_use]
    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = Some(depth);
        self
    }

    pub fn build(self) -> Interpreter {
        let config = self.config.unwrap_or_default();
        let mut timers = Timers::new();
        timers.set_enabled(config.timing);
        Interpreter {
            env: self.env.unwrap_or_default(),
            config,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            diagnostics: DiagnosticLog::new(),
            call_stack: CallStack::new(self.max_recursion_depth.unwrap_or(MAX_RECURSION_DEPTH)),
            timers,
            natives: self.natives.unwrap_or_default(),
            algorithms: self.algorithms,
            io: self.io,
        }
    }
}
