//! Named built-in operations.
//!
//! [`Builtin`]s are reduced by the evaluator itself. [`Algorithm`]s and
//! [`IoCommand`]s are only dispatched: the numerical algorithms and the
//! I/O surface live outside the core.

/// Built-in functions evaluated in the core.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    Length,
    Head,
    Tail,
    Revert,
    Sort,
    Inf,
    Sup,
    Mid,
    Min,
    Max,
    Diff,
    Simplify,
    SimplifySafe,
    Horner,
    Canonical,
    Expand,
    Degree,
    Coeff,
    Subpoly,
    Substitute,
    Evaluate,
    Round,
    Mantissa,
    Exponent,
    Precision,
    Numerator,
    Denominator,
    IsBound,
    IsEvaluable,
    Library,
    LibraryConstant,
    Function,
}

impl Builtin {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Head => "head",
            Self::Tail => "tail",
            Self::Revert => "revert",
            Self::Sort => "sort",
            Self::Inf => "inf",
            Self::Sup => "sup",
            Self::Mid => "mid",
            Self::Min => "min",
            Self::Max => "max",
            Self::Diff => "diff",
            Self::Simplify => "simplify",
            Self::SimplifySafe => "simplifysafe",
            Self::Horner => "horner",
            Self::Canonical => "canonical",
            Self::Expand => "expand",
            Self::Degree => "degree",
            Self::Coeff => "coeff",
            Self::Subpoly => "subpoly",
            Self::Substitute => "substitute",
            Self::Evaluate => "evaluate",
            Self::Round => "round",
            Self::Mantissa => "mantissa",
            Self::Exponent => "exponent",
            Self::Precision => "precision",
            Self::Numerator => "numerator",
            Self::Denominator => "denominator",
            Self::IsBound => "isbound",
            Self::IsEvaluable => "isevaluable",
            Self::Library => "library",
            Self::LibraryConstant => "libraryconstant",
            Self::Function => "function",
        }
    }

    /// Accepted argument counts, inclusive.
    pub const fn arity(self) -> (usize, usize) {
        match self {
            Self::Min | Self::Max => (1, usize::MAX),
            Self::Coeff | Self::Subpoly | Self::Substitute | Self::Evaluate => (2, 2),
            Self::Round => (3, 3),
            _ => (1, 1),
        }
    }
}

/// Numerical algorithms provided by an external collaborator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Algorithm {
    Remez,
    Taylor,
    TaylorForm,
    Autodiff,
    Infnorm,
    DirtyInfnorm,
    AccurateInfnorm,
    CheckInfnorm,
    SupNorm,
    FindZeros,
    DirtyFindZeros,
    FpFindZeros,
    NumberRoots,
    Integral,
    DirtyIntegral,
    FpMinimax,
    RoundCoefficients,
    RationalApprox,
    GuessDegree,
    ImplementPoly,
    ImplementConst,
    ZeroDenominators,
    SearchGal,
    Parse,
    ReadFile,
    ReadXml,
    BashEvaluate,
}

impl Algorithm {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Remez => "remez",
            Self::Taylor => "taylor",
            Self::TaylorForm => "taylorform",
            Self::Autodiff => "autodiff",
            Self::Infnorm => "infnorm",
            Self::DirtyInfnorm => "dirtyinfnorm",
            Self::AccurateInfnorm => "accurateinfnorm",
            Self::CheckInfnorm => "checkinfnorm",
            Self::SupNorm => "supnorm",
            Self::FindZeros => "findzeros",
            Self::DirtyFindZeros => "dirtyfindzeros",
            Self::FpFindZeros => "fpfindzeros",
            Self::NumberRoots => "numberroots",
            Self::Integral => "integral",
            Self::DirtyIntegral => "dirtyintegral",
            Self::FpMinimax => "fpminimax",
            Self::RoundCoefficients => "roundcoefficients",
            Self::RationalApprox => "rationalapprox",
            Self::GuessDegree => "guessdegree",
            Self::ImplementPoly => "implementpoly",
            Self::ImplementConst => "implementconst",
            Self::ZeroDenominators => "zerodenominators",
            Self::SearchGal => "searchgal",
            Self::Parse => "parse",
            Self::ReadFile => "readfile",
            Self::ReadXml => "readxml",
            Self::BashEvaluate => "bashevaluate",
        }
    }
}

/// Side-effecting statements delegated to the I/O collaborator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IoCommand {
    NewFilePrint,
    AppendFilePrint,
    Write,
    NewFileWrite,
    AppendFileWrite,
    Plot,
    AsciiPlot,
    ExternalPlot,
    PrintHexa,
    PrintBinary,
    PrintFloat,
    PrintExpansion,
    PrintXml,
    PrintXmlNewFile,
    PrintXmlAppendFile,
    BashExecute,
    Execute,
    WorstCase,
}

impl IoCommand {
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewFilePrint => "print > file",
            Self::AppendFilePrint => "print >> file",
            Self::Write => "write",
            Self::NewFileWrite => "write > file",
            Self::AppendFileWrite => "write >> file",
            Self::Plot => "plot",
            Self::AsciiPlot => "asciiplot",
            Self::ExternalPlot => "externalplot",
            Self::PrintHexa => "printdouble",
            Self::PrintBinary => "printbinary",
            Self::PrintFloat => "printsingle",
            Self::PrintExpansion => "printexpansion",
            Self::PrintXml => "printxml",
            Self::PrintXmlNewFile => "printxml > file",
            Self::PrintXmlAppendFile => "printxml >> file",
            Self::BashExecute => "bashexecute",
            Self::Execute => "execute",
            Self::WorstCase => "worstcase",
        }
    }
}
