//! Structural summary of numeric trees.

use bitflags::bitflags;

use super::Thing;

bitflags! {
    /// What a tree contains, computed in one walk.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TreeFlags: u8 {
        /// The free variable occurs.
        const FREE_VARIABLE = 1 << 0;
        /// A library function or constant occurs.
        const LIBRARY = 1 << 1;
        /// A procedure-defined function occurs.
        const PROCEDURE_FUNCTION = 1 << 2;
        /// A node that is not a numeric expression node occurs.
        const NON_NUMERIC = 1 << 3;
        /// A rounding-to-format operator occurs.
        const ROUNDING = 1 << 4;
        /// A step function (`ceil`, `floor`, `nearestint`) occurs.
        const STEP = 1 << 5;
    }
}

impl Thing {
    /// Summarize the tree rooted here.
    pub fn tree_flags(&self) -> TreeFlags {
        let mut flags = match self {
            Thing::FreeVariable => TreeFlags::FREE_VARIABLE,
            Thing::LibraryFunction { .. } | Thing::LibraryConstant(_) => TreeFlags::LIBRARY,
            Thing::ProcedureFunction { .. } => TreeFlags::PROCEDURE_FUNCTION,
            Thing::RoundTo { .. } => TreeFlags::ROUNDING,
            Thing::Unary { func, .. } if func.is_step() => TreeFlags::STEP,
            other if other.is_numeric_node() => TreeFlags::empty(),
            _ => TreeFlags::NON_NUMERIC,
        };
        if flags.contains(TreeFlags::NON_NUMERIC) {
            return flags;
        }
        self.for_each_child(&mut |child| flags |= child.tree_flags());
        flags
    }
}
