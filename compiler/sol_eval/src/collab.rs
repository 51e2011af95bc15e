//! Collaborators outside the evaluation core.
//!
//! The numerical algorithms and the I/O statements only meet the core at
//! these traits: the evaluator hands over evaluated arguments and takes
//! back a value.

use sol_ir::{Algorithm, IoCommand, Statement, Thing};

use crate::config::Configuration;

/// Implementation of `remez`, `taylor`, `infnorm`, `fpminimax`, ...
pub trait Algorithms {
    /// Run `algorithm` on evaluated arguments.
    ///
    /// `None` means the algorithm is not provided; the evaluator then
    /// warns and yields `error`. A provided algorithm that fails should
    /// return `Some(Thing::Error)`.
    fn run(&mut self, algorithm: Algorithm, args: &[Thing], config: &Configuration)
        -> Option<Thing>;
}

/// What an I/O command asks the interpreter to do next.
#[derive(Clone, Debug, PartialEq)]
pub enum IoOutcome {
    Done,
    /// Run these statements, as read by `execute`.
    Run(Vec<Statement>),
}

/// Printing to files, plotting, `execute`, `bashexecute`, ...
pub trait IoCollaborator {
    fn perform(
        &mut self,
        command: IoCommand,
        args: &[Thing],
        config: &Configuration,
    ) -> Result<IoOutcome, String>;
}
