//! Descriptors for natively bound functions, constants and procedures.
//!
//! Descriptors are registered once, never mutated, and shared by every
//! value that refers to them.

use std::fmt;

use sol_num::{Float, Interval};

use crate::{Name, Thing};

/// Native range evaluation: `(x, derivative order, precision) -> f^(n)(x)`.
///
/// Returns `None` when the native code cannot evaluate at this point.
pub type RangeFn = dyn Fn(&Interval, u32, u32) -> Option<Interval> + Send + Sync;

/// Native constant evaluation at a precision.
pub type ConstantFn = dyn Fn(u32) -> Interval + Send + Sync;

/// Native procedure entry point.
pub type ProcedureFn = dyn Fn(&[ExternalValue]) -> Result<ExternalValue, String> + Send + Sync;

/// A function implemented natively, usable inside numeric expressions.
pub struct LibraryFunction {
    pub name: Name,
    eval: Box<RangeFn>,
}

impl LibraryFunction {
    pub fn new(
        name: impl Into<Name>,
        eval: impl Fn(&Interval, u32, u32) -> Option<Interval> + Send + Sync + 'static,
    ) -> Self {
        LibraryFunction {
            name: name.into(),
            eval: Box::new(eval),
        }
    }

    /// Enclose the `derivative`-th derivative over `x`.
    pub fn evaluate(&self, x: &Interval, derivative: u32, prec: u32) -> Option<Interval> {
        (self.eval)(x, derivative, prec)
    }
}

/// A constant implemented natively.
pub struct LibraryConstant {
    pub name: Name,
    eval: Box<ConstantFn>,
}

impl LibraryConstant {
    pub fn new(name: impl Into<Name>, eval: impl Fn(u32) -> Interval + Send + Sync + 'static) -> Self {
        LibraryConstant {
            name: name.into(),
            eval: Box::new(eval),
        }
    }

    pub fn evaluate(&self, prec: u32) -> Interval {
        (self.eval)(prec)
    }
}

/// Argument and result kinds of external procedures.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExternalKind {
    Void,
    Constant,
    Function,
    Range,
    Integer,
    String,
    Boolean,
    ConstantList,
    FunctionList,
    RangeList,
    IntegerList,
    StringList,
    BooleanList,
}

impl ExternalKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Constant => "constant",
            Self::Function => "function",
            Self::Range => "range",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::ConstantList => "list of constant",
            Self::FunctionList => "list of function",
            Self::RangeList => "list of range",
            Self::IntegerList => "list of integer",
            Self::StringList => "list of string",
            Self::BooleanList => "list of boolean",
        }
    }

    /// Element kind of a list kind.
    pub const fn element(self) -> Option<ExternalKind> {
        match self {
            Self::ConstantList => Some(Self::Constant),
            Self::FunctionList => Some(Self::Function),
            Self::RangeList => Some(Self::Range),
            Self::IntegerList => Some(Self::Integer),
            Self::StringList => Some(Self::String),
            Self::BooleanList => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// A marshalled argument or result of an external procedure.
#[derive(Clone, Debug, PartialEq)]
pub enum ExternalValue {
    Void,
    Constant(Float),
    Function(Thing),
    Range(Interval),
    Integer(i64),
    String(String),
    Boolean(bool),
    List(Vec<ExternalValue>),
}

/// A procedure implemented natively.
pub struct ExternalProcedure {
    pub name: Name,
    pub params: Vec<ExternalKind>,
    pub result: ExternalKind,
    entry: Box<ProcedureFn>,
}

impl ExternalProcedure {
    pub fn new(
        name: impl Into<Name>,
        params: Vec<ExternalKind>,
        result: ExternalKind,
        entry: impl Fn(&[ExternalValue]) -> Result<ExternalValue, String> + Send + Sync + 'static,
    ) -> Self {
        ExternalProcedure {
            name: name.into(),
            params,
            result,
            entry: Box::new(entry),
        }
    }

    /// Whether the procedure takes no argument (`(void)` signature).
    pub fn is_nullary(&self) -> bool {
        self.params.is_empty() || self.params == [ExternalKind::Void]
    }

    pub fn call(&self, args: &[ExternalValue]) -> Result<ExternalValue, String> {
        (self.entry)(args)
    }

    /// Signature rendering, e.g. `(integer, string) -> boolean`.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|k| k.name()).collect();
        format!("({}) -> {}", params.join(", "), self.result.name())
    }
}

macro_rules! descriptor_identity {
    ($ty:ty, $label:literal) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self, other) || self.name == other.name
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.name)
            }
        }
    };
}

descriptor_identity!(LibraryFunction, "LibraryFunction");
descriptor_identity!(LibraryConstant, "LibraryConstant");
descriptor_identity!(ExternalProcedure, "ExternalProcedure");
