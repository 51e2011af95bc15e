//! Sol Eval - evaluator and statement interpreter for Sol.
//!
//! # Architecture
//!
//! - [`Interpreter`]: one session's state and the tree-walking evaluator
//! - [`Environment`]: free variable, native bindings, frames and globals
//! - [`Configuration`]: precision, display and warning settings
//! - [`Session`]: runs top-level commands behind the outermost escape point
//! - [`PrintHandler`]: where auto-print, `print` and diagnostics go
//!
//! The numerical algorithms and the I/O statements are collaborators
//! ([`Algorithms`], [`IoCollaborator`]) installed by the embedding
//! application.
//!
//! # Failures
//!
//! Recoverable failures produce one [`Diagnostic`] and a `Thing::Error`
//! value. Internal failures are [`EvalError`]s and unwind to the nearest
//! escape point.

mod collab;
pub mod config;
mod diagnostics;
mod environment;
pub mod errors;
pub mod eval;
pub mod exec;
pub mod interpreter;
mod print_handler;
mod registry;
mod session;
mod stack;
mod timing;

pub use collab::{Algorithms, IoCollaborator, IoOutcome};
pub use config::{Configuration, SettingError};
pub use diagnostics::{CallFrame, CallStack, Diagnostic, DiagnosticLog, Severity};
pub use environment::{EnvError, Environment, Owner};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use eval::Approximation;
pub use exec::{ExitRequest, Flow};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandler,
    SharedPrintHandler,
};
pub use registry::NativeRegistry;
pub use session::{CommandOutcome, Session};
pub use stack::ensure_sufficient_stack;
pub use timing::Timers;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=sol_eval=debug`.
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .init();
        }
    });
}
