//! Statement execution.
//!
//! - `control`: blocks, `while`, `if`, `for`, `for .. in`
//! - `assign`: plain, float, indexed and field assignment
//! - `commands`: meta-assignments, `print`, I/O, native bindings, `rename`
//!
//! Statements never throw to request an exit: `quit` and `restart` come
//! back as [`Flow::Exit`] and every enclosing construct hands it upward.

mod assign;
mod commands;
mod control;

use sol_ir::Statement;

use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::stack::ensure_sufficient_stack;

/// Which exit a statement asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitRequest {
    Quit,
    Restart,
}

/// Outcome of executing one statement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(ExitRequest),
}

impl Flow {
    #[inline]
    pub fn is_exit(self) -> bool {
        matches!(self, Flow::Exit(_))
    }
}

impl Interpreter {
    /// Execute one statement.
    pub fn execute(&mut self, statement: &Statement) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.execute_inner(statement))
    }

    fn execute_inner(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::CommandList(statements) => self.execute_block(statements),
            Statement::Declare(names) => {
                self.declare_all(names);
                Ok(Flow::Continue)
            }
            Statement::Expression(expr) => {
                self.auto_print(expr)?;
                Ok(Flow::Continue)
            }
            Statement::Assign {
                target,
                value,
                mode,
            } => {
                self.execute_assign(target, value, *mode)?;
                Ok(Flow::Continue)
            }
            Statement::While { condition, body } => self.execute_while(condition, body),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => self.execute_if(condition, then_branch, else_branch.as_deref()),
            Statement::For {
                variable,
                start,
                end,
                step,
                body,
            } => self.execute_for(variable, start, end, step.as_ref(), body),
            Statement::ForIn {
                variable,
                list,
                body,
            } => self.execute_for_in(variable, list, body),
            Statement::Quit => Ok(Flow::Exit(ExitRequest::Quit)),
            Statement::Restart => Ok(Flow::Exit(ExitRequest::Restart)),
            Statement::Nop(count) => {
                self.execute_nop(count.as_ref())?;
                Ok(Flow::Continue)
            }
            Statement::Rename { from, to } => {
                self.rename_free_variable(from, to);
                Ok(Flow::Continue)
            }
            Statement::SetSetting {
                setting,
                value,
                echo,
            } => {
                self.set_setting(*setting, value, *echo)?;
                Ok(Flow::Continue)
            }
            Statement::Print(args) => {
                self.execute_print(args)?;
                Ok(Flow::Continue)
            }
            Statement::Io { command, args } => self.execute_io(*command, args),
            Statement::BindLibrary { name, symbol } => {
                self.bind_library(name, symbol);
                Ok(Flow::Continue)
            }
            Statement::BindLibraryConstant { name, symbol } => {
                self.bind_library_constant(name, symbol);
                Ok(Flow::Continue)
            }
            Statement::BindExternalProcedure {
                name,
                symbol,
                params,
                result,
            } => {
                self.bind_external(name, symbol, params, *result);
                Ok(Flow::Continue)
            }
        }
    }
}

#[cfg(test)]
mod tests;
