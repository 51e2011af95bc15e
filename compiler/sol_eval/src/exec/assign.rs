//! Assignment statements.
//!
//! Indexed and field assignment are copy-on-write: the current value of
//! the identifier is re-read, rebuilt with the new element, and stored
//! back as a whole.

use sol_ir::{AssignMode, AssignTarget, Name, Structure, Thing};

use crate::errors::EvalResult;
use crate::eval::lists::{grow_to, materialize};
use crate::interpreter::Interpreter;

/// Store `value` at `path` inside `structure`, creating intermediate
/// structures. Fails when a step of the path is not a structure.
fn set_path(structure: &mut Structure, path: &[Name], value: Thing) -> bool {
    match path {
        [] => false,
        [last] => {
            structure.set(last.clone(), value);
            true
        }
        [first, rest @ ..] => match structure.get_mut(first.as_str()) {
            Some(Thing::Structure(inner)) => set_path(inner, rest, value),
            Some(_) => false,
            None => {
                let mut inner = Structure::new();
                let stored = set_path(&mut inner, rest, value);
                structure.set(first.clone(), Thing::Structure(inner));
                stored
            }
        },
    }
}

impl Interpreter {
    pub(super) fn execute_assign(
        &mut self,
        target: &AssignTarget,
        value: &Thing,
        mode: AssignMode,
    ) -> EvalResult<()> {
        let mut value = self.evaluate(value)?;
        if mode == AssignMode::Float
            && value.is_constant_expression()
            && !matches!(value, Thing::Constant(_))
        {
            let prec = self.config.prec;
            if let Some(c) = self.approximate_value(&value, prec)? {
                value = Thing::Constant(c);
            }
        }
        match target {
            AssignTarget::Identifier(name) => self.store(name, value),
            AssignTarget::Index { name, index } => self.assign_index(name, index, value)?,
            AssignTarget::Field { name, path } => self.assign_field(name, path, value),
        }
        Ok(())
    }

    fn store(&mut self, name: &Name, value: Thing) {
        if let Err(e) = self.env.assign(name.clone(), value) {
            self.warn(e.to_string());
        }
    }

    fn assign_index(&mut self, name: &Name, index: &Thing, value: Thing) -> EvalResult<()> {
        let index_value = self.evaluate(index)?;
        let Some(i) = index_value.as_integer().and_then(|n| usize::try_from(n).ok()) else {
            let message = format!(
                "the index of an assignment to \"{name}\" must be a non-negative integer, not \"{}\"",
                self.render(&index_value)
            );
            self.warn(message);
            return Ok(());
        };
        let Some(current) = self.env.resolve(name.as_str()) else {
            self.warn(format!("\"{name}\" is not assigned; it cannot be indexed"));
            return Ok(());
        };

        let updated = match current {
            Thing::List(mut items) => {
                if i < items.len() {
                    items[i] = value;
                } else if i == items.len() || grow_to(&mut items, i) {
                    items.push(value);
                } else {
                    self.warn(format!(
                        "the empty list \"{name}\" cannot be extended to index {i}"
                    ));
                    return Ok(());
                }
                Thing::List(items)
            }
            Thing::FinalEllipticList(items) => {
                let mut items = materialize(&items, i + 1);
                let Some(slot) = items.get_mut(i) else {
                    self.warn(format!("the end-elliptic list \"{name}\" has no elements"));
                    return Ok(());
                };
                *slot = value;
                Thing::FinalEllipticList(items)
            }
            Thing::Str(s) => match value {
                Thing::Str(c) if c.chars().count() == 1 => {
                    let mut chars: Vec<char> = s.chars().collect();
                    if i < chars.len() {
                        chars[i] = c.chars().next().unwrap_or_default();
                    } else if i == chars.len() {
                        chars.extend(c.chars());
                    } else {
                        self.warn(format!(
                            "index {i} lies beyond the end of the string \"{name}\""
                        ));
                        return Ok(());
                    }
                    Thing::Str(chars.into_iter().collect())
                }
                other => {
                    let message = format!(
                        "only a single character can be assigned into a string, not \"{}\"",
                        self.render(&other)
                    );
                    self.warn(message);
                    return Ok(());
                }
            },
            other => {
                self.warn(format!(
                    "\"{name}\" is {} and cannot be indexed",
                    other.type_name()
                ));
                return Ok(());
            }
        };
        self.store(name, updated);
        Ok(())
    }

    fn assign_field(&mut self, name: &Name, path: &[Name], value: Thing) {
        let mut structure = match self.env.resolve(name.as_str()) {
            Some(Thing::Structure(s)) => s,
            None | Some(Thing::Error) => Structure::new(),
            Some(other) => {
                self.warn(format!(
                    "\"{name}\" is {} and has no fields",
                    other.type_name()
                ));
                return;
            }
        };
        if !set_path(&mut structure, path, value) {
            let dotted: Vec<&str> = path.iter().map(Name::as_str).collect();
            self.warn(format!(
                "\"{name}.{}\" does not name a field of a structure",
                dotted.join(".")
            ));
            return;
        }
        self.store(name, Thing::Structure(structure));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths_create_intermediate_structures() {
        let mut s = Structure::new();
        assert!(set_path(&mut s, &[Name::new("a"), Name::new("b")], Thing::integer(1)));
        let Some(Thing::Structure(inner)) = s.get("a") else {
            panic!("expected a nested structure");
        };
        assert_eq!(inner.get("b").and_then(Thing::as_integer), Some(1));
    }

    #[test]
    fn paths_through_non_structures_fail() {
        let mut s = Structure::new();
        s.set(Name::new("a"), Thing::integer(3));
        assert!(!set_path(&mut s, &[Name::new("a"), Name::new("b")], Thing::Unit));
    }
}
