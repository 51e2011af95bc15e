//! Sol Num - arbitrary-precision primitives for the Sol evaluator.
//!
//! Everything numeric the evaluator needs and nothing more:
//!
//! - [`Interval`]: closed intervals with outward-rounded endpoints, closed
//!   under the arithmetic operators and the elementary functions
//! - [`Format`]: rounding to IEEE 754 binary formats and to expansion
//!   formats (double-double, triple-double)
//! - [`literal`]: decimal and dyadic literal conversion with the shared
//!   precision heuristic
//! - [`render`]: textual rendering of constants in every display mode
//!
//! Point values are plain `rug::Float`s; their precision travels with them.

mod error;
mod format;
mod interval;
pub mod literal;
pub mod render;

pub use error::NumError;
pub use format::{round_to_precision, Format};
pub use interval::Interval;
pub use render::DisplayMode;

pub use rug::float::Round;
pub use rug::{Float, Integer, Rational};

/// Smallest working precision accepted anywhere in the evaluator.
pub const MIN_PRECISION: u32 = 12;

/// Largest working precision, bounded by what MPFR can allocate.
pub const MAX_PRECISION: u32 = 1 << 24;

/// Clamp a requested precision into the supported range.
#[inline]
pub fn clamp_precision(prec: u32) -> u32 {
    prec.clamp(MIN_PRECISION, MAX_PRECISION)
}
