//! User-facing diagnostics and call tracking.
//!
//! - `Diagnostic` / `DiagnosticLog`: warnings and informational messages
//!   emitted while evaluating. Every recoverable failure produces exactly
//!   one of them.
//! - `CallStack` / `CallFrame`: nesting of procedure and match calls, with
//!   the recursion limit enforced on `push`.

use std::fmt;

use sol_ir::Name;

use crate::errors::{recursion_limit, EvalError};

/// How loudly a diagnostic speaks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note; shown when verbosity reaches its level.
    Information { level: u32 },
    /// Recovered failure; shown at verbosity 1 and above.
    Warning,
}

impl Severity {
    /// Minimum verbosity at which the diagnostic is printed.
    pub fn threshold(self) -> u32 {
        match self {
            Severity::Information { level } => level,
            Severity::Warning => 1,
        }
    }
}

/// One emitted message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "Warning: {}", self.message),
            Severity::Information { .. } => write!(f, "Information: {}", self.message),
        }
    }
}

/// Every diagnostic of a session, printed or not.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        DiagnosticLog::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Whether some message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries.iter().any(|d| d.message.contains(needle))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A procedure or match call in progress.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Display name: the external procedure's name, `proc` or `match`.
    pub name: Name,
}

/// Live nesting of calls.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: usize,
}

impl CallStack {
    pub fn new(max_depth: usize) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Enter a call. Fails without pushing when the limit is reached.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if self.frames.len() >= self.max_depth {
            return Err(recursion_limit(self.max_depth));
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on empty stack");
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drop frames above `depth`; used when unwinding to an escape point.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    /// Names of the active calls, innermost first.
    pub fn backtrace(&self) -> Vec<String> {
        self.frames
            .iter()
            .rev()
            .map(|f| f.name.as_str().to_string())
            .collect()
    }
}
