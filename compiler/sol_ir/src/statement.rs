//! Statements executed by the interpreter.

use crate::builtin::IoCommand;
use crate::keyword::Setting;
use crate::library::ExternalKind;
use crate::{Name, Thing};

/// How an assignment treats its right-hand side.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignMode {
    /// `a = e`: store the evaluated value as is.
    Raw,
    /// `a := e`: constant expressions are collapsed to a faithful literal.
    Float,
}

/// Left-hand side of an assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum AssignTarget {
    Identifier(Name),
    /// `name[index] = ...`
    Index { name: Name, index: Thing },
    /// `name.a.b = ...`
    Field { name: Name, path: Vec<Name> },
}

impl AssignTarget {
    /// The identifier the assignment ultimately rewrites.
    pub fn root(&self) -> &Name {
        match self {
            AssignTarget::Identifier(name)
            | AssignTarget::Index { name, .. }
            | AssignTarget::Field { name, .. } => name,
        }
    }
}

/// A statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// A block: runs in its own frame.
    CommandList(Vec<Statement>),
    /// `var a, b;`
    Declare(Vec<Name>),
    /// An expression whose value is printed.
    Expression(Thing),
    Assign {
        target: AssignTarget,
        value: Thing,
        mode: AssignMode,
    },
    While {
        condition: Thing,
        body: Box<Statement>,
    },
    If {
        condition: Thing,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    For {
        variable: Name,
        start: Thing,
        end: Thing,
        step: Option<Thing>,
        body: Box<Statement>,
    },
    ForIn {
        variable: Name,
        list: Thing,
        body: Box<Statement>,
    },
    Quit,
    Restart,
    Nop(Option<Thing>),
    /// `rename(old, new)` of the free variable.
    Rename { from: Name, to: Name },
    /// Meta-assignment of a setting; `echo` prints a confirmation.
    SetSetting {
        setting: Setting,
        value: Thing,
        echo: bool,
    },
    Print(Vec<Thing>),
    Io {
        command: IoCommand,
        args: Vec<Thing>,
    },
    /// `name = library(symbol)`
    BindLibrary { name: Name, symbol: String },
    /// `name = libraryconstant(symbol)`
    BindLibraryConstant { name: Name, symbol: String },
    /// `externalproc(name, symbol, signature)`
    BindExternalProcedure {
        name: Name,
        symbol: String,
        params: Vec<ExternalKind>,
        result: ExternalKind,
    },
}

impl Statement {
    /// Whether `quit` or `restart` occurs anywhere inside.
    pub fn contains_quit_or_restart(&self) -> bool {
        match self {
            Statement::Quit | Statement::Restart => true,
            Statement::CommandList(stmts) => stmts.iter().any(Statement::contains_quit_or_restart),
            Statement::While { body, .. }
            | Statement::For { body, .. }
            | Statement::ForIn { body, .. } => body.contains_quit_or_restart(),
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                then_branch.contains_quit_or_restart()
                    || else_branch
                        .as_ref()
                        .is_some_and(|e| e.contains_quit_or_restart())
            }
            _ => false,
        }
    }

    /// Wrap statements in a block.
    pub fn block(stmts: Vec<Statement>) -> Statement {
        Statement::CommandList(stmts)
    }

    pub fn assign(name: &str, value: Thing) -> Statement {
        Statement::Assign {
            target: AssignTarget::Identifier(Name::new(name)),
            value,
            mode: AssignMode::Raw,
        }
    }

    pub fn float_assign(name: &str, value: Thing) -> Statement {
        Statement::Assign {
            target: AssignTarget::Identifier(Name::new(name)),
            value,
            mode: AssignMode::Float,
        }
    }
}
