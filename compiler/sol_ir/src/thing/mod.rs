//! The universal value/expression type.
//!
//! A [`Thing`] is a number, a numeric expression in the free variable, a
//! composite value (range, list, structure, procedure), or an expression
//! form that still has to be reduced (identifier, application, comparison,
//! built-in call, ...).
//!
//! # Ownership
//!
//! Every `Thing` owns its children. Cloning is a deep copy except for the
//! immutable descriptors held in `Arc`: library functions and constants,
//! external procedures, and procedure bodies. Those are never mutated
//! after construction, so sharing them is indistinguishable from copying.

mod flags;

use std::sync::Arc;

use sol_num::{Float, Format, Interval};

use crate::builtin::{Algorithm, Builtin};
use crate::keyword::{Keyword, Setting};
use crate::library::{ExternalProcedure, LibraryConstant, LibraryFunction};
use crate::ops::{BinaryOp, CompareOp, UnaryFn};
use crate::statement::Statement;
use crate::Name;

pub use flags::TreeFlags;

/// A value or expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Thing {
    // Scalars
    /// A float; its precision is part of the value.
    Constant(Float),
    /// Unconverted decimal literal text.
    DecimalConstant(String),
    /// Unconverted dyadic literal text (`3b-2`).
    DyadicConstant(String),
    /// Unconverted binary literal text (`101.1_2`).
    BinaryConstant(String),
    Boolean(bool),
    Str(String),
    Unit,
    Default,
    /// Marker for a recovered evaluation failure.
    Error,
    Keyword(Keyword),

    // Numeric expression nodes
    FreeVariable,
    Pi,
    Binary {
        op: BinaryOp,
        lhs: Box<Thing>,
        rhs: Box<Thing>,
    },
    Unary {
        func: UnaryFn,
        arg: Box<Thing>,
    },
    RoundTo {
        format: Format,
        arg: Box<Thing>,
    },
    LibraryFunction {
        function: Arc<LibraryFunction>,
        derivative: u32,
        arg: Box<Thing>,
    },
    LibraryConstant(Arc<LibraryConstant>),
    ProcedureFunction {
        procedure: Arc<Procedure>,
        derivative: u32,
        arg: Box<Thing>,
    },

    // Composite data
    Range(Interval),
    /// Range literal with unevaluated endpoints.
    RangeOf {
        lo: Box<Thing>,
        hi: Box<Thing>,
    },
    List(Vec<Thing>),
    /// A list whose last element starts an implicit infinite continuation.
    FinalEllipticList(Vec<Thing>),
    /// `...` between two elements of a list literal.
    Ellipsis,
    Structure(Structure),
    /// Structure literal, not yet checked for duplicate fields.
    StructureOf(Vec<(Name, Thing)>),
    Procedure(Arc<Procedure>),
    ExternalProcedure(Arc<ExternalProcedure>),

    // Expression forms
    Identifier(Name),
    Compare {
        op: CompareOp,
        lhs: Box<Thing>,
        rhs: Box<Thing>,
    },
    In {
        value: Box<Thing>,
        range: Box<Thing>,
    },
    And(Box<Thing>, Box<Thing>),
    Or(Box<Thing>, Box<Thing>),
    Not(Box<Thing>),
    Apply {
        callee: Box<Thing>,
        args: Vec<Thing>,
    },
    Index {
        target: Box<Thing>,
        index: Box<Thing>,
    },
    Field {
        target: Box<Thing>,
        field: Name,
    },
    /// `a @ b`
    Concat(Box<Thing>, Box<Thing>),
    /// `e .: l`
    Prepend(Box<Thing>, Box<Thing>),
    /// `l :. e`
    Append(Box<Thing>, Box<Thing>),
    Builtin {
        op: Builtin,
        args: Vec<Thing>,
    },
    Algorithm {
        algorithm: Algorithm,
        args: Vec<Thing>,
    },
    /// `prec?` and friends.
    SettingValue(Setting),
    /// `~e`: faithful evaluation to a constant.
    Approx(Box<Thing>),
    Match {
        subject: Box<Thing>,
        arms: Vec<MatchArm>,
    },
}

/// A user procedure.
#[derive(Clone, Debug, PartialEq)]
pub struct Procedure {
    pub params: Vec<Name>,
    /// The single parameter collects all actual arguments as a list.
    pub variadic: bool,
    pub body: Vec<Statement>,
    pub result: Thing,
}

impl Procedure {
    /// A procedure taking exactly `params`.
    pub fn new(params: Vec<Name>, body: Vec<Statement>, result: Thing) -> Self {
        Procedure {
            params,
            variadic: false,
            body,
            result,
        }
    }

    /// A procedure binding all its arguments as a list to `param`.
    pub fn variadic(param: Name, body: Vec<Statement>, result: Thing) -> Self {
        Procedure {
            params: vec![param],
            variadic: true,
            body,
            result,
        }
    }
}

/// One arm of a `match` expression.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchArm {
    pub pattern: Thing,
    pub body: Vec<Statement>,
    pub result: Thing,
}

/// An ordered record with unique field names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Structure {
    fields: Vec<(Name, Thing)>,
}

impl Structure {
    /// A structure without fields.
    pub fn new() -> Self {
        Structure::default()
    }

    /// Build from literal fields; returns the first duplicated name on failure.
    pub fn from_fields(fields: Vec<(Name, Thing)>) -> Result<Self, Name> {
        for (i, (name, _)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(n, _)| n == name) {
                return Err(name.clone());
            }
        }
        Ok(Structure { fields })
    }

    /// The value of field `name`.
    pub fn get(&self, name: &str) -> Option<&Thing> {
        self.fields
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Thing> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Replace an existing field or append a new one.
    pub fn set(&mut self, name: Name, value: Thing) {
        match self.get_mut(name.as_str()) {
            Some(slot) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Thing)> {
        self.fields.iter().map(|(n, v)| (n, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Thing {
    // Construction

    /// A numeric constant.
    pub fn constant(value: Float) -> Thing {
        Thing::Constant(value)
    }

    /// An exact integer constant.
    pub fn integer(n: i64) -> Thing {
        Thing::Constant(Float::with_val(64, n))
    }

    /// A string literal.
    pub fn string(s: impl Into<String>) -> Thing {
        Thing::Str(s.into())
    }

    /// A reference to the variable or library object `name`.
    pub fn ident(name: &str) -> Thing {
        Thing::Identifier(Name::new(name))
    }

    /// `lhs op rhs`.
    pub fn binary(op: BinaryOp, lhs: Thing, rhs: Thing) -> Thing {
        Thing::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `func(arg)` for a built-in unary function.
    pub fn unary(func: UnaryFn, arg: Thing) -> Thing {
        Thing::Unary {
            func,
            arg: Box::new(arg),
        }
    }

    /// A comparison, evaluating to a boolean.
    pub fn compare(op: CompareOp, lhs: Thing, rhs: Thing) -> Thing {
        Thing::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// A call of a procedure, function or external procedure.
    pub fn apply(callee: Thing, args: Vec<Thing>) -> Thing {
        Thing::Apply {
            callee: Box::new(callee),
            args,
        }
    }

    /// A call of a built-in command.
    pub fn builtin(op: Builtin, args: Vec<Thing>) -> Thing {
        Thing::Builtin { op, args }
    }

    /// `[lo;hi]` with unevaluated bounds.
    pub fn range_of(lo: Thing, hi: Thing) -> Thing {
        Thing::RangeOf {
            lo: Box::new(lo),
            hi: Box::new(hi),
        }
    }

    /// `target[index]`.
    pub fn index(target: Thing, index: Thing) -> Thing {
        Thing::Index {
            target: Box::new(target),
            index: Box::new(index),
        }
    }

    /// `target.field`.
    pub fn field(target: Thing, field: &str) -> Thing {
        Thing::Field {
            target: Box::new(target),
            field: Name::new(field),
        }
    }

    // Inspection

    /// The value of a numeric constant.
    pub fn as_constant(&self) -> Option<&Float> {
        match self {
            Thing::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// The interval of an evaluated range.
    pub fn as_range(&self) -> Option<&Interval> {
        match self {
            Thing::Range(r) => Some(r),
            _ => None,
        }
    }

    /// The value of a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Thing::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The contents of a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Thing::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value of an integer constant that fits an `i64`.
    pub fn as_integer(&self) -> Option<i64> {
        let c = self.as_constant()?;
        if !c.is_integer() {
            return None;
        }
        c.to_integer()?.to_i64()
    }

    /// Whether this is the `error` value.
    pub fn is_error(&self) -> bool {
        matches!(self, Thing::Error)
    }

    /// Whether this is a list, elliptic or not.
    pub fn is_list(&self) -> bool {
        matches!(self, Thing::List(_) | Thing::FinalEllipticList(_))
    }

    /// Whether this node is one of the numeric expression kinds.
    pub fn is_numeric_node(&self) -> bool {
        matches!(
            self,
            Thing::Constant(_)
                | Thing::DecimalConstant(_)
                | Thing::DyadicConstant(_)
                | Thing::BinaryConstant(_)
                | Thing::FreeVariable
                | Thing::Pi
                | Thing::Binary { .. }
                | Thing::Unary { .. }
                | Thing::RoundTo { .. }
                | Thing::LibraryFunction { .. }
                | Thing::LibraryConstant(_)
                | Thing::ProcedureFunction { .. }
        )
    }

    /// A tree built only from numeric nodes.
    pub fn is_pure_tree(&self) -> bool {
        !self.tree_flags().intersects(TreeFlags::NON_NUMERIC)
    }

    /// A pure tree without the free variable.
    pub fn is_constant_expression(&self) -> bool {
        !self
            .tree_flags()
            .intersects(TreeFlags::NON_NUMERIC | TreeFlags::FREE_VARIABLE)
    }

    /// A normal form the evaluator is allowed to return.
    pub fn is_correctly_typed(&self) -> bool {
        match self {
            Thing::Constant(_)
            | Thing::Boolean(_)
            | Thing::Str(_)
            | Thing::Unit
            | Thing::Default
            | Thing::Error
            | Thing::Keyword(_)
            | Thing::Range(_)
            | Thing::Procedure(_)
            | Thing::ExternalProcedure(_) => true,
            Thing::List(items) | Thing::FinalEllipticList(items) => {
                items.iter().all(Thing::is_correctly_typed)
            }
            Thing::Structure(s) => s.iter().all(|(_, v)| v.is_correctly_typed()),
            other => other.is_pure_tree(),
        }
    }

    /// Number of nodes in the tree.
    pub fn tree_size(&self) -> usize {
        let mut size = 1usize;
        self.for_each_child(&mut |child| size = size.saturating_add(child.tree_size()));
        size
    }

    /// Short type description used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Thing::Constant(_) | Thing::DecimalConstant(_) | Thing::DyadicConstant(_)
            | Thing::BinaryConstant(_) => "constant",
            Thing::Boolean(_) => "boolean",
            Thing::Str(_) => "string",
            Thing::Unit => "void",
            Thing::Default => "default",
            Thing::Error => "error",
            Thing::Keyword(_) => "keyword",
            Thing::Range(_) | Thing::RangeOf { .. } => "range",
            Thing::List(_) | Thing::Ellipsis => "list",
            Thing::FinalEllipticList(_) => "end-elliptic list",
            Thing::Structure(_) | Thing::StructureOf(_) => "structure",
            Thing::Procedure(_) => "procedure",
            Thing::ExternalProcedure(_) => "external procedure",
            other if other.is_constant_expression() => "constant expression",
            other if other.is_pure_tree() => "function",
            _ => "expression",
        }
    }

    /// Visit the direct children of this node.
    pub fn for_each_child(&self, f: &mut dyn FnMut(&Thing)) {
        match self {
            Thing::Binary { lhs, rhs, .. }
            | Thing::Compare { lhs, rhs, .. }
            | Thing::And(lhs, rhs)
            | Thing::Or(lhs, rhs)
            | Thing::Concat(lhs, rhs)
            | Thing::Prepend(lhs, rhs)
            | Thing::Append(lhs, rhs)
            | Thing::RangeOf { lo: lhs, hi: rhs }
            | Thing::In {
                value: lhs,
                range: rhs,
            }
            | Thing::Index {
                target: lhs,
                index: rhs,
            } => {
                f(lhs);
                f(rhs);
            }
            Thing::Unary { arg, .. }
            | Thing::RoundTo { arg, .. }
            | Thing::LibraryFunction { arg, .. }
            | Thing::ProcedureFunction { arg, .. }
            | Thing::Not(arg)
            | Thing::Approx(arg)
            | Thing::Field { target: arg, .. } => f(arg),
            Thing::List(items)
            | Thing::FinalEllipticList(items)
            | Thing::Builtin { args: items, .. }
            | Thing::Algorithm { args: items, .. } => items.iter().for_each(f),
            Thing::Apply { callee, args } => {
                f(callee);
                args.iter().for_each(f);
            }
            Thing::Structure(s) => s.iter().for_each(|(_, v)| f(v)),
            Thing::StructureOf(fields) => fields.iter().for_each(|(_, v)| f(v)),
            Thing::Match { subject, arms } => {
                f(subject);
                for arm in arms {
                    f(&arm.pattern);
                    f(&arm.result);
                }
            }
            Thing::Constant(_)
            | Thing::DecimalConstant(_)
            | Thing::DyadicConstant(_)
            | Thing::BinaryConstant(_)
            | Thing::Boolean(_)
            | Thing::Str(_)
            | Thing::Unit
            | Thing::Default
            | Thing::Error
            | Thing::Keyword(_)
            | Thing::FreeVariable
            | Thing::Pi
            | Thing::LibraryConstant(_)
            | Thing::Range(_)
            | Thing::Ellipsis
            | Thing::Procedure(_)
            | Thing::ExternalProcedure(_)
            | Thing::Identifier(_)
            | Thing::SettingValue(_) => {}
        }
    }

    /// Replace every occurrence of the free variable by `replacement`.
    ///
    /// Used for composition `f(g)` and for `substitute`.
    #[must_use]
    pub fn substitute(&self, replacement: &Thing) -> Thing {
        match self {
            Thing::FreeVariable => replacement.clone(),
            Thing::Binary { op, lhs, rhs } => Thing::binary(
                *op,
                lhs.substitute(replacement),
                rhs.substitute(replacement),
            ),
            Thing::Unary { func, arg } => Thing::unary(*func, arg.substitute(replacement)),
            Thing::RoundTo { format, arg } => Thing::RoundTo {
                format: *format,
                arg: Box::new(arg.substitute(replacement)),
            },
            Thing::LibraryFunction {
                function,
                derivative,
                arg,
            } => Thing::LibraryFunction {
                function: Arc::clone(function),
                derivative: *derivative,
                arg: Box::new(arg.substitute(replacement)),
            },
            Thing::ProcedureFunction {
                procedure,
                derivative,
                arg,
            } => Thing::ProcedureFunction {
                procedure: Arc::clone(procedure),
                derivative: *derivative,
                arg: Box::new(arg.substitute(replacement)),
            },
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
