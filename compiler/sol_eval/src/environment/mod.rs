//! Symbol environment: global table, stack of local frames, and the
//! names claimed by the free variable and native bindings.
//!
//! Resolution order for an identifier:
//! 1. the bound free variable,
//! 2. library functions, 3. library constants, 4. external procedures,
//! 5. local frames, innermost first,
//! 6. the global table.
//!
//! The frame stack is shared by the whole session: a procedure body sees
//! the frames of its callers. Values are moved in and cloned out, so no
//! binding ever aliases an interpreter temporary.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use sol_ir::{ExternalProcedure, LibraryConstant, LibraryFunction, Name, Thing};

/// What claims a reserved name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Owner {
    FreeVariable,
    LibraryFunction,
    LibraryConstant,
    ExternalProcedure,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Owner::FreeVariable => "the free variable",
            Owner::LibraryFunction => "a library function",
            Owner::LibraryConstant => "a library constant",
            Owner::ExternalProcedure => "an external procedure",
        })
    }
}

/// Rejected environment operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("the identifier \"{name}\" is already bound to {owner}")]
    Reserved { name: Name, owner: Owner },
    #[error("the identifier \"{name}\" is already declared in this block")]
    AlreadyDeclared { name: Name },
    #[error("the identifier \"{name}\" is already assigned to a value")]
    AlreadyAssigned { name: Name },
}

/// One frame of bindings.
#[derive(Clone, Debug, Default)]
struct Scope {
    bindings: FxHashMap<Name, Thing>,
}

impl Scope {
    #[inline]
    fn lookup(&self, name: &str) -> Option<&Thing> {
        self.bindings.get(name)
    }

    #[inline]
    fn lookup_mut(&mut self, name: &str) -> Option<&mut Thing> {
        self.bindings.get_mut(name)
    }

    #[inline]
    fn define(&mut self, name: Name, value: Thing) {
        self.bindings.insert(name, value);
    }

    #[inline]
    fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Environment {
    /// Local frames, innermost last.
    frames: Vec<Scope>,
    global: Scope,
    free_variable: Option<Name>,
    functions: FxHashMap<Name, Arc<LibraryFunction>>,
    constants: FxHashMap<Name, Arc<LibraryConstant>>,
    externals: FxHashMap<Name, Arc<ExternalProcedure>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    // Frames

    /// Number of local frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(Scope::default());
        tracing::trace!(depth = self.frames.len(), "push frame");
    }

    /// Pop the innermost frame, dropping its bindings.
    #[inline]
    pub fn pop_frame(&mut self) {
        self.frames.pop();
        tracing::trace!(depth = self.frames.len(), "pop frame");
    }

    /// Pop frames until at most `depth` remain.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    // Free variable

    pub fn free_variable(&self) -> Option<&Name> {
        self.free_variable.as_ref()
    }

    /// Name the free variable. The name must not be claimed by anything.
    pub fn bind_free_variable(&mut self, name: Name) -> Result<(), EnvError> {
        if let Some(owner) = self.native_owner(name.as_ref()) {
            return Err(EnvError::Reserved { name, owner });
        }
        if self.is_assigned(name.as_ref()) {
            return Err(EnvError::AlreadyAssigned { name });
        }
        tracing::trace!(name = %name, "free variable named");
        self.free_variable = Some(name);
        Ok(())
    }

    // Native bindings

    pub fn bind_library_function(&mut self, function: LibraryFunction) -> Result<(), EnvError> {
        let name = function.name.clone();
        self.check_unclaimed(&name)?;
        self.functions.insert(name, Arc::new(function));
        Ok(())
    }

    pub fn bind_library_constant(&mut self, constant: LibraryConstant) -> Result<(), EnvError> {
        let name = constant.name.clone();
        self.check_unclaimed(&name)?;
        self.constants.insert(name, Arc::new(constant));
        Ok(())
    }

    pub fn bind_external_procedure(
        &mut self,
        procedure: ExternalProcedure,
    ) -> Result<(), EnvError> {
        let name = procedure.name.clone();
        self.check_unclaimed(&name)?;
        self.externals.insert(name, Arc::new(procedure));
        Ok(())
    }

    fn check_unclaimed(&self, name: &Name) -> Result<(), EnvError> {
        if let Some(owner) = self.reserved_by(name.as_ref()) {
            return Err(EnvError::Reserved {
                name: name.clone(),
                owner,
            });
        }
        if self.is_assigned(name.as_ref()) {
            return Err(EnvError::AlreadyAssigned { name: name.clone() });
        }
        Ok(())
    }

    fn native_owner(&self, name: &str) -> Option<Owner> {
        if self.functions.contains_key(name) {
            Some(Owner::LibraryFunction)
        } else if self.constants.contains_key(name) {
            Some(Owner::LibraryConstant)
        } else if self.externals.contains_key(name) {
            Some(Owner::ExternalProcedure)
        } else {
            None
        }
    }

    /// What, if anything, reserves `name` against declaration and assignment.
    pub fn reserved_by(&self, name: &str) -> Option<Owner> {
        if self.free_variable.as_ref().is_some_and(|f| f.as_str() == name) {
            return Some(Owner::FreeVariable);
        }
        self.native_owner(name)
    }

    // Variables

    fn is_assigned(&self, name: &str) -> bool {
        self.frames.iter().any(|f| f.contains(name)) || self.global.contains(name)
    }

    /// Resolve an identifier. The returned value is a copy.
    pub fn resolve(&self, name: &str) -> Option<Thing> {
        if self.free_variable.as_ref().is_some_and(|f| f.as_str() == name) {
            return Some(Thing::FreeVariable);
        }
        if let Some(function) = self.functions.get(name) {
            return Some(Thing::LibraryFunction {
                function: Arc::clone(function),
                derivative: 0,
                arg: Box::new(Thing::FreeVariable),
            });
        }
        if let Some(constant) = self.constants.get(name) {
            return Some(Thing::LibraryConstant(Arc::clone(constant)));
        }
        if let Some(procedure) = self.externals.get(name) {
            return Some(Thing::ExternalProcedure(Arc::clone(procedure)));
        }
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.lookup(name))
            .or_else(|| self.global.lookup(name))
            .cloned()
    }

    /// Whether `name` resolves to anything.
    pub fn is_bound(&self, name: &str) -> bool {
        self.reserved_by(name).is_some() || self.is_assigned(name)
    }

    /// Declare `name` in the innermost frame, or globally outside any block.
    pub fn declare(&mut self, name: Name, value: Thing) -> Result<(), EnvError> {
        if let Some(owner) = self.reserved_by(name.as_ref()) {
            return Err(EnvError::Reserved { name, owner });
        }
        match self.frames.last_mut() {
            Some(frame) => {
                if frame.contains(name.as_ref()) {
                    return Err(EnvError::AlreadyDeclared { name });
                }
                tracing::trace!(name = %name, "declare");
                frame.define(name, value);
            }
            None => self.global.define(name, value),
        }
        Ok(())
    }

    /// Rewrite the nearest frame holding `name`, else the global table.
    pub fn assign(&mut self, name: Name, value: Thing) -> Result<(), EnvError> {
        if let Some(owner) = self.reserved_by(name.as_ref()) {
            return Err(EnvError::Reserved { name, owner });
        }
        tracing::trace!(name = %name, "assign");
        if let Some(slot) = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|f| f.lookup_mut(name.as_ref()))
        {
            *slot = value;
        } else {
            self.global.define(name, value);
        }
        Ok(())
    }

    /// Forget everything: variables, frames, free variable and bindings.
    pub fn clear(&mut self) {
        *self = Environment::default();
    }
}

#[cfg(test)]
mod tests;
