//! Errors raised by numeric primitives.

/// Failure of a numeric primitive.
///
/// These never abort evaluation: callers turn them into a diagnostic and
/// an `error` value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NumError {
    /// The literal text is not a well-formed number.
    #[error("`{text}` is not a valid numeric literal")]
    InvalidLiteral { text: String },

    /// An interval whose lower endpoint exceeds its upper endpoint.
    #[error("the lower bound of an interval must not exceed its upper bound")]
    EmptyInterval,

    /// An exponent width outside the range the IEEE emulation supports.
    #[error("an exponent width of {width} bits is not supported")]
    UnsupportedFormat { width: u32 },
}
