//! Operators and elementary functions of numeric expressions.

use sol_num::Interval;

/// Binary arithmetic operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Source-level symbol.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }

    /// Binding strength, higher binds tighter.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }

    /// Outward-rounded interval evaluation.
    pub fn apply(self, lhs: &Interval, rhs: &Interval, prec: u32) -> Interval {
        match self {
            Self::Add => lhs.add(rhs, prec),
            Self::Sub => lhs.sub(rhs, prec),
            Self::Mul => lhs.mul(rhs, prec),
            Self::Div => lhs.div(rhs, prec),
            Self::Pow => lhs.pow(rhs, prec),
        }
    }
}

/// One-argument elementary functions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryFn {
    Neg,
    Sqrt,
    Exp,
    Log,
    Log2,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Abs,
    Erf,
    Erfc,
    Log1p,
    Expm1,
    Ceil,
    Floor,
    NearestInt,
}

impl UnaryFn {
    pub const ALL: [UnaryFn; 26] = [
        Self::Neg,
        Self::Sqrt,
        Self::Exp,
        Self::Log,
        Self::Log2,
        Self::Log10,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Asin,
        Self::Acos,
        Self::Atan,
        Self::Sinh,
        Self::Cosh,
        Self::Tanh,
        Self::Asinh,
        Self::Acosh,
        Self::Atanh,
        Self::Abs,
        Self::Erf,
        Self::Erfc,
        Self::Log1p,
        Self::Expm1,
        Self::Ceil,
        Self::Floor,
        Self::NearestInt,
    ];

    /// Function name as written in source (`-` for negation).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Log2 => "log2",
            Self::Log10 => "log10",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Asinh => "asinh",
            Self::Acosh => "acosh",
            Self::Atanh => "atanh",
            Self::Abs => "abs",
            Self::Erf => "erf",
            Self::Erfc => "erfc",
            Self::Log1p => "log1p",
            Self::Expm1 => "expm1",
            Self::Ceil => "ceil",
            Self::Floor => "floor",
            Self::NearestInt => "nearestint",
        }
    }

    /// Step functions: piecewise constant, derivative zero almost everywhere.
    pub const fn is_step(self) -> bool {
        matches!(self, Self::Ceil | Self::Floor | Self::NearestInt)
    }

    /// Outward-rounded interval evaluation.
    pub fn apply(self, x: &Interval, prec: u32) -> Interval {
        match self {
            Self::Neg => x.neg(),
            Self::Sqrt => x.sqrt(prec),
            Self::Exp => x.exp(prec),
            Self::Log => x.log(prec),
            Self::Log2 => x.log2(prec),
            Self::Log10 => x.log10(prec),
            Self::Sin => x.sin(prec),
            Self::Cos => x.cos(prec),
            Self::Tan => x.tan(prec),
            Self::Asin => x.asin(prec),
            Self::Acos => x.acos(prec),
            Self::Atan => x.atan(prec),
            Self::Sinh => x.sinh(prec),
            Self::Cosh => x.cosh(prec),
            Self::Tanh => x.tanh(prec),
            Self::Asinh => x.asinh(prec),
            Self::Acosh => x.acosh(prec),
            Self::Atanh => x.atanh(prec),
            Self::Abs => x.abs(),
            Self::Erf => x.erf(prec),
            Self::Erfc => x.erfc(prec),
            Self::Log1p => x.log1p(prec),
            Self::Expm1 => x.expm1(prec),
            Self::Ceil => x.ceil(prec),
            Self::Floor => x.floor(prec),
            Self::NearestInt => x.nearest_int(prec),
        }
    }
}

/// Comparison operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }

    /// Whether the ordering `lhs cmp rhs` satisfies this comparison.
    pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            Self::Eq => ordering == Equal,
            Self::NotEq => ordering != Equal,
            Self::Lt => ordering == Less,
            Self::LtEq => ordering != Greater,
            Self::Gt => ordering == Greater,
            Self::GtEq => ordering != Less,
        }
    }
}
