//! RAII frame guard for the symbol environment.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`,
//! so everything the interpreter can do is available through it. Dropping
//! the guard pops the frame it pushed, on normal exit, on `?` and during
//! unwinding alike.
//!
//! ```text
//! interpreter.with_frame(|scoped| {
//!     scoped.env.declare(name, value)?;
//!     scoped.execute(body)
//! })
//! ```

use std::ops::{Deref, DerefMut};

use super::Interpreter;

/// Guard that pops one environment frame on drop.
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_frame();
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Push a frame and return the guard that pops it.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_> {
        self.env.push_frame();
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` inside a fresh frame.
    pub fn with_frame<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }
}

#[cfg(test)]
mod tests;
