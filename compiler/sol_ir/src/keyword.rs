//! Keyword values and configuration settings.

use sol_num::{DisplayMode, Format, Round};

/// Rounding direction as a language value (`RN`, `RD`, `RU`, `RZ`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RoundingMode {
    Nearest,
    Down,
    Up,
    Zero,
}

impl RoundingMode {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Nearest => "RN",
            Self::Down => "RD",
            Self::Up => "RU",
            Self::Zero => "RZ",
        }
    }

    pub const fn to_round(self) -> Round {
        match self {
            Self::Nearest => Round::Nearest,
            Self::Down => Round::Down,
            Self::Up => Round::Up,
            Self::Zero => Round::Zero,
        }
    }
}

/// Symbolic values that are neither numbers nor strings.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Keyword {
    On,
    Off,
    Display(DisplayMode),
    Absolute,
    Relative,
    Fixed,
    Floating,
    Rounding(RoundingMode),
    Format(Format),
    Perturb,
    HonorCoeffPrec,
    File,
    Postscript,
    PostscriptFile,
}

impl Keyword {
    pub fn name(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Display(mode) => mode.keyword(),
            Self::Absolute => "absolute",
            Self::Relative => "relative",
            Self::Fixed => "fixed",
            Self::Floating => "floating",
            Self::Rounding(mode) => mode.keyword(),
            Self::Format(format) => format.keyword(),
            Self::Perturb => "perturb",
            Self::HonorCoeffPrec => "honorcoeffprec",
            Self::File => "file",
            Self::Postscript => "postscript",
            Self::PostscriptFile => "postscriptfile",
        }
    }
}

/// Session settings readable as `name?` and writable by meta-assignment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Setting {
    Prec,
    Points,
    Diam,
    Display,
    Verbosity,
    Canonical,
    AutoSimplify,
    TaylorRecursions,
    HopitalRecursions,
    Timing,
    FullParentheses,
    MidpointMode,
    RationalMode,
    DieOnError,
    RoundingWarnings,
}

impl Setting {
    pub const ALL: [Setting; 15] = [
        Self::Prec,
        Self::Points,
        Self::Diam,
        Self::Display,
        Self::Verbosity,
        Self::Canonical,
        Self::AutoSimplify,
        Self::TaylorRecursions,
        Self::HopitalRecursions,
        Self::Timing,
        Self::FullParentheses,
        Self::MidpointMode,
        Self::RationalMode,
        Self::DieOnError,
        Self::RoundingWarnings,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Prec => "prec",
            Self::Points => "points",
            Self::Diam => "diam",
            Self::Display => "display",
            Self::Verbosity => "verbosity",
            Self::Canonical => "canonical",
            Self::AutoSimplify => "autosimplify",
            Self::TaylorRecursions => "taylorrecursions",
            Self::HopitalRecursions => "hopitalrecursions",
            Self::Timing => "timing",
            Self::FullParentheses => "fullparentheses",
            Self::MidpointMode => "midpointmode",
            Self::RationalMode => "rationalmode",
            Self::DieOnError => "dieonerrormode",
            Self::RoundingWarnings => "roundingwarnings",
        }
    }
}
