//! Sol IR - the data model of the Sol evaluator.
//!
//! - [`Thing`]: values and expressions, one closed sum type
//! - [`Statement`]: what the interpreter executes
//! - operator, function, format, keyword and setting enums
//! - descriptors for natively bound functions, constants and procedures
//!
//! Things own their children; see [`thing`] for the sharing rules of the
//! few immutable descriptors.

mod builtin;
mod display;
mod keyword;
mod library;
mod name;
mod ops;
mod statement;
pub mod thing;

pub use builtin::{Algorithm, Builtin, IoCommand};
pub use display::RenderOptions;
pub use keyword::{Keyword, RoundingMode, Setting};
pub use library::{
    ConstantFn, ExternalKind, ExternalProcedure, ExternalValue, LibraryConstant,
    LibraryFunction, ProcedureFn, RangeFn,
};
pub use name::Name;
pub use ops::{BinaryOp, CompareOp, UnaryFn};
pub use statement::{AssignMode, AssignTarget, Statement};
pub use thing::{MatchArm, Procedure, Structure, Thing, TreeFlags};

pub use sol_num::{DisplayMode, Format};
