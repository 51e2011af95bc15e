//! Internal failures of the evaluator.
//!
//! Type mismatches, unfaithful evaluations and environment violations are
//! not errors in this sense: they are reported as diagnostics where they
//! are detected and evaluation continues with `Thing::Error` or a
//! best-effort value. [`EvalError`] is reserved for failures that abort
//! the current top-level command (or procedure call) at the nearest
//! escape point.

use std::fmt;

use sol_ir::Thing;

/// Result of evaluation.
pub type EvalResult<T = Thing> = Result<T, EvalError>;

/// Category of an internal failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("maximum recursion depth of {depth} nested calls exceeded")]
    RecursionLimit { depth: usize },

    #[error("frame stack corrupted: expected {expected} frames, found {found}")]
    FrameCorruption { expected: usize, found: usize },

    #[error("external procedure \"{name}\" failed: {message}")]
    ExternalFailure { name: String, message: String },

    #[error("procedure cannot be executed: {message}")]
    ProcedureFailure { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

/// An internal failure plus the chain of contexts it unwound through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Innermost first.
    pub context: Vec<String>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            context: Vec::new(),
        }
    }

    /// Record an enclosing context, e.g. the procedure being called.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for ctx in &self.context {
            write!(f, "\n  in {ctx}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::new(kind)
    }
}

#[cold]
pub fn recursion_limit(depth: usize) -> EvalError {
    EvalErrorKind::RecursionLimit { depth }.into()
}

#[cold]
pub fn frame_corruption(expected: usize, found: usize) -> EvalError {
    EvalErrorKind::FrameCorruption { expected, found }.into()
}

#[cold]
pub fn external_failure(name: &str, message: impl Into<String>) -> EvalError {
    EvalErrorKind::ExternalFailure {
        name: name.to_string(),
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn procedure_failure(message: impl Into<String>) -> EvalError {
    EvalErrorKind::ProcedureFailure {
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn internal(message: impl Into<String>) -> EvalError {
    EvalErrorKind::Internal {
        message: message.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_rendered_innermost_first() {
        let err = external_failure("f", "boom")
            .with_context("call of f")
            .with_context("procedure g");
        assert_eq!(
            err.to_string(),
            "external procedure \"f\" failed: boom\n  in call of f\n  in procedure g"
        );
    }

    #[test]
    fn kinds_are_matchable() {
        let err = recursion_limit(8);
        assert!(matches!(err.kind, EvalErrorKind::RecursionLimit { depth: 8 }));
    }
}
