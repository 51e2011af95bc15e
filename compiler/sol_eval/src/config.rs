//! Session configuration.
//!
//! One plain record, threaded by reference through evaluation and mutated
//! only by meta-assignment statements. The escape boundary snapshots and
//! restores it around every top-level command and every call.

use sol_ir::{Keyword, Setting, Thing};
use sol_num::{DisplayMode, Float, MAX_PRECISION};

pub use sol_num::literal::{DECIMAL_DIGIT_FACTOR, DECIMAL_MIN_PRECISION};
pub use sol_num::MIN_PRECISION;

/// Extra bits used for the first faithful-evaluation attempt.
pub const FAITHFUL_GUARD_BITS: u32 = 10;

/// Precision multiplier of the widest enclosure tried before giving up
/// on faithful evaluation.
pub const WIDENING_FACTOR: u32 = 256;

/// Precision of the cheap disjointness check in comparisons.
pub const FAST_COMPARE_PREC: u32 = 12;

/// Results larger than this many nodes are not auto-simplified.
pub const AUTOSIMPLIFY_SIZE_LIMIT: usize = 1500;

/// Nesting limit for procedure and match calls.
pub const MAX_RECURSION_DEPTH: usize = 1024;

/// Mutable numeric, display and warning settings of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Working precision in bits.
    pub prec: u32,
    /// Number of sample points used by the numerical algorithms.
    pub points: u64,
    /// Relative width of the subintervals used by the numerical algorithms.
    pub diam: Float,
    pub display: DisplayMode,
    pub verbosity: u32,
    /// Print polynomials in canonical rather than Horner form.
    pub canonical: bool,
    pub autosimplify: bool,
    pub taylor_recursions: u32,
    pub hopital_recursions: u32,
    pub timing: bool,
    pub full_parentheses: bool,
    pub midpoint_mode: bool,
    pub rational_mode: bool,
    pub die_on_error: bool,
    pub rounding_warnings: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        let mut diam = Float::with_val(MIN_PRECISION, 1);
        diam >>= 100u32;
        Configuration {
            prec: 165,
            points: 501,
            diam,
            display: DisplayMode::Decimal,
            verbosity: 1,
            canonical: false,
            autosimplify: true,
            taylor_recursions: 1,
            hopital_recursions: 2,
            timing: false,
            full_parentheses: false,
            midpoint_mode: false,
            rational_mode: false,
            die_on_error: false,
            rounding_warnings: true,
        }
    }
}

/// Rejected meta-assignment.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SettingError {
    #[error("the value assigned to {setting} must be {expected}")]
    WrongType {
        setting: &'static str,
        expected: &'static str,
    },
    #[error("the value assigned to {setting} is out of range: {reason}")]
    OutOfRange {
        setting: &'static str,
        reason: String,
    },
}

fn on_off(flag: bool) -> Thing {
    Thing::Keyword(if flag { Keyword::On } else { Keyword::Off })
}

fn wrong(setting: Setting, expected: &'static str) -> SettingError {
    SettingError::WrongType {
        setting: setting.name(),
        expected,
    }
}

fn flag(setting: Setting, value: &Thing) -> Result<bool, SettingError> {
    match value {
        Thing::Keyword(Keyword::On) | Thing::Boolean(true) => Ok(true),
        Thing::Keyword(Keyword::Off) | Thing::Boolean(false) => Ok(false),
        _ => Err(wrong(setting, "on or off")),
    }
}

fn natural(setting: Setting, value: &Thing) -> Result<u64, SettingError> {
    value
        .as_integer()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| wrong(setting, "a non-negative integer"))
}

fn small_natural(setting: Setting, value: &Thing) -> Result<u32, SettingError> {
    let n = natural(setting, value)?;
    u32::try_from(n).map_err(|_| SettingError::OutOfRange {
        setting: setting.name(),
        reason: format!("{n} is too large"),
    })
}

impl Configuration {
    /// Current value of a setting, as returned by `name?`.
    pub fn value_of(&self, setting: Setting) -> Thing {
        match setting {
            Setting::Prec => Thing::integer(i64::from(self.prec)),
            Setting::Points => Thing::integer(i64::try_from(self.points).unwrap_or(i64::MAX)),
            Setting::Diam => Thing::Constant(self.diam.clone()),
            Setting::Display => Thing::Keyword(Keyword::Display(self.display)),
            Setting::Verbosity => Thing::integer(i64::from(self.verbosity)),
            Setting::Canonical => on_off(self.canonical),
            Setting::AutoSimplify => on_off(self.autosimplify),
            Setting::TaylorRecursions => Thing::integer(i64::from(self.taylor_recursions)),
            Setting::HopitalRecursions => Thing::integer(i64::from(self.hopital_recursions)),
            Setting::Timing => on_off(self.timing),
            Setting::FullParentheses => on_off(self.full_parentheses),
            Setting::MidpointMode => on_off(self.midpoint_mode),
            Setting::RationalMode => on_off(self.rational_mode),
            Setting::DieOnError => on_off(self.die_on_error),
            Setting::RoundingWarnings => on_off(self.rounding_warnings),
        }
    }

    /// Validate and store a new value. The value must already be evaluated
    /// to a literal.
    pub fn apply(&mut self, setting: Setting, value: &Thing) -> Result<(), SettingError> {
        match setting {
            Setting::Prec => {
                let prec = small_natural(setting, value)?;
                if !(MIN_PRECISION..=MAX_PRECISION).contains(&prec) {
                    return Err(SettingError::OutOfRange {
                        setting: setting.name(),
                        reason: format!(
                            "the precision must lie between {MIN_PRECISION} and {MAX_PRECISION} bits"
                        ),
                    });
                }
                self.prec = prec;
            }
            Setting::Points => {
                let points = natural(setting, value)?;
                if points == 0 {
                    return Err(SettingError::OutOfRange {
                        setting: setting.name(),
                        reason: "at least one point is needed".to_string(),
                    });
                }
                self.points = points;
            }
            Setting::Diam => {
                let diam = value
                    .as_constant()
                    .ok_or_else(|| wrong(setting, "a constant"))?;
                if !diam.is_finite() || diam.is_sign_negative() || diam.is_zero() {
                    return Err(SettingError::OutOfRange {
                        setting: setting.name(),
                        reason: "the diameter must be a positive number".to_string(),
                    });
                }
                self.diam = diam.clone();
            }
            Setting::Display => match value {
                Thing::Keyword(Keyword::Display(mode)) => self.display = *mode,
                _ => return Err(wrong(setting, "a display mode")),
            },
            Setting::Verbosity => self.verbosity = small_natural(setting, value)?,
            Setting::TaylorRecursions => self.taylor_recursions = small_natural(setting, value)?,
            Setting::HopitalRecursions => self.hopital_recursions = small_natural(setting, value)?,
            Setting::Canonical => self.canonical = flag(setting, value)?,
            Setting::AutoSimplify => self.autosimplify = flag(setting, value)?,
            Setting::Timing => self.timing = flag(setting, value)?,
            Setting::FullParentheses => self.full_parentheses = flag(setting, value)?,
            Setting::MidpointMode => self.midpoint_mode = flag(setting, value)?,
            Setting::RationalMode => self.rational_mode = flag(setting, value)?,
            Setting::DieOnError => self.die_on_error = flag(setting, value)?,
            Setting::RoundingWarnings => self.rounding_warnings = flag(setting, value)?,
        }
        Ok(())
    }

    /// Confirmation printed by the echoing form of a meta-assignment.
    pub fn describe(&self, setting: Setting) -> String {
        let toggled = |flag: bool| if flag { "activated" } else { "deactivated" };
        match setting {
            Setting::Prec => format!("The precision has been set to {} bits.", self.prec),
            Setting::Points => format!("The number of points has been set to {}.", self.points),
            Setting::Diam => format!(
                "The diameter has been set to {}.",
                sol_num::render::render(&self.diam, self.display)
            ),
            Setting::Display => format!("Display mode is {} numbers.", self.display.keyword()),
            Setting::Verbosity => {
                format!("The verbosity level has been set to {}.", self.verbosity)
            }
            Setting::Canonical => format!(
                "Canonical automatic printing output has been {}.",
                toggled(self.canonical)
            ),
            Setting::AutoSimplify => format!(
                "Automatic pure tree simplification has been {}.",
                toggled(self.autosimplify)
            ),
            Setting::TaylorRecursions => format!(
                "The number of recursions for Taylor evaluation has been set to {}.",
                self.taylor_recursions
            ),
            Setting::HopitalRecursions => format!(
                "The number of recursions for Hopital's rule has been set to {}.",
                self.hopital_recursions
            ),
            Setting::Timing => format!("Timing has been {}.", toggled(self.timing)),
            Setting::FullParentheses => format!(
                "Full parentheses mode has been {}.",
                toggled(self.full_parentheses)
            ),
            Setting::MidpointMode => {
                format!("Midpoint mode has been {}.", toggled(self.midpoint_mode))
            }
            Setting::RationalMode => {
                format!("Rational mode has been {}.", toggled(self.rational_mode))
            }
            Setting::DieOnError => {
                format!("Die-on-error mode has been {}.", toggled(self.die_on_error))
            }
            Setting::RoundingWarnings => format!(
                "Warnings about rounding have been {}.",
                toggled(self.rounding_warnings)
            ),
        }
    }
}

#[cfg(test)]
mod tests;
