//! Native entry points available to `library`, `libraryconstant` and
//! `externalproc`.
//!
//! The embedding application registers native code under a symbol; the
//! binding statements look the symbol up and wrap it in a descriptor
//! named after the identifier it is bound to.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use sol_ir::{
    ConstantFn, ExternalKind, ExternalProcedure, ExternalValue, LibraryConstant,
    LibraryFunction, Name, ProcedureFn, RangeFn,
};
use sol_num::Interval;

#[derive(Default)]
pub struct NativeRegistry {
    functions: FxHashMap<String, Arc<RangeFn>>,
    constants: FxHashMap<String, Arc<ConstantFn>>,
    procedures: FxHashMap<String, Arc<ProcedureFn>>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        NativeRegistry::default()
    }

    /// Register a range function `(x, derivative, prec) -> enclosure`.
    pub fn register_function(
        &mut self,
        symbol: &str,
        eval: impl Fn(&Interval, u32, u32) -> Option<Interval> + Send + Sync + 'static,
    ) {
        self.functions.insert(symbol.to_string(), Arc::new(eval));
    }

    pub fn register_constant(
        &mut self,
        symbol: &str,
        eval: impl Fn(u32) -> Interval + Send + Sync + 'static,
    ) {
        self.constants.insert(symbol.to_string(), Arc::new(eval));
    }

    pub fn register_procedure(
        &mut self,
        symbol: &str,
        entry: impl Fn(&[ExternalValue]) -> Result<ExternalValue, String> + Send + Sync + 'static,
    ) {
        self.procedures.insert(symbol.to_string(), Arc::new(entry));
    }

    /// Descriptor for the function registered under `symbol`, named `name`.
    pub fn function(&self, name: Name, symbol: &str) -> Option<LibraryFunction> {
        let eval = Arc::clone(self.functions.get(symbol)?);
        Some(LibraryFunction::new(name, move |x: &Interval, n, prec| {
            eval(x, n, prec)
        }))
    }

    pub fn constant(&self, name: Name, symbol: &str) -> Option<LibraryConstant> {
        let eval = Arc::clone(self.constants.get(symbol)?);
        Some(LibraryConstant::new(name, move |prec| eval(prec)))
    }

    pub fn procedure(
        &self,
        name: Name,
        symbol: &str,
        params: Vec<ExternalKind>,
        result: ExternalKind,
    ) -> Option<ExternalProcedure> {
        let entry = Arc::clone(self.procedures.get(symbol)?);
        Some(ExternalProcedure::new(
            name,
            params,
            result,
            move |args: &[ExternalValue]| entry(args),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol_num::Float;

    #[test]
    fn bound_descriptor_takes_the_identifier_name() {
        let mut registry = NativeRegistry::new();
        registry.register_function("my_exp", |x: &Interval, _, prec| Some(x.exp(prec)));
        let f = registry
            .function(Name::new("e"), "my_exp")
            .unwrap_or_else(|| panic!("registered"));
        assert_eq!(f.name.as_str(), "e");
        let zero = Interval::point(&Float::with_val(53, 0));
        let one = f.evaluate(&zero, 0, 53);
        assert_eq!(one.map(|r| r.is_point()), Some(true));
    }

    #[test]
    fn unknown_symbol_is_none() {
        let registry = NativeRegistry::new();
        assert!(registry.constant(Name::new("c"), "nope").is_none());
    }
}
