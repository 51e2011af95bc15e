//! Textual rendering of values.
//!
//! Rendering depends on session state (display mode, free variable name,
//! parenthesization), so it goes through [`RenderOptions`] rather than
//! `Display` alone. The `Display` impl uses the defaults.

use std::fmt::{self, Write as _};

use sol_num::render::{render, render_interval};
use sol_num::DisplayMode;

use crate::{BinaryOp, Thing, UnaryFn};

/// Session-dependent rendering choices.
#[derive(Clone, Debug)]
pub struct RenderOptions<'a> {
    pub mode: DisplayMode,
    pub midpoint: bool,
    pub full_parentheses: bool,
    /// Name of the bound free variable; `_x_` when unbound.
    pub free_variable: Option<&'a str>,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        RenderOptions {
            mode: DisplayMode::Decimal,
            midpoint: false,
            full_parentheses: false,
            free_variable: None,
        }
    }
}

/// Precedence of the rendered node, for deciding parentheses.
fn precedence(thing: &Thing) -> u8 {
    match thing {
        Thing::Binary { op, .. } => op.precedence(),
        Thing::Unary {
            func: UnaryFn::Neg, ..
        } => 3,
        Thing::Constant(c) if c.is_sign_negative() && !c.is_zero() => 3,
        _ => 10,
    }
}

impl Thing {
    /// Render with explicit options.
    pub fn render(&self, opts: &RenderOptions<'_>) -> String {
        let mut out = String::new();
        write_thing(&mut out, self, opts);
        out
    }
}

fn write_operand(out: &mut String, child: &Thing, parent_prec: u8, tight: bool, opts: &RenderOptions<'_>) {
    let child_prec = precedence(child);
    let needs = (opts.full_parentheses && child_prec < 10)
        || child_prec < parent_prec
        || (tight && child_prec == parent_prec);
    if needs {
        out.push('(');
        write_thing(out, child, opts);
        out.push(')');
    } else {
        write_thing(out, child, opts);
    }
}

fn write_list(out: &mut String, items: &[Thing], elliptic: bool, opts: &RenderOptions<'_>) {
    if items.is_empty() {
        out.push_str("[||]");
        return;
    }
    out.push_str("[|");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_thing(out, item, opts);
    }
    if elliptic {
        out.push_str("...");
    }
    out.push_str("|]");
}

fn write_args(out: &mut String, args: &[Thing], opts: &RenderOptions<'_>) {
    out.push('(');
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_thing(out, a, opts);
    }
    out.push(')');
}

fn write_thing(out: &mut String, thing: &Thing, opts: &RenderOptions<'_>) {
    match thing {
        Thing::Constant(c) => out.push_str(&render(c, opts.mode)),
        Thing::DecimalConstant(s) | Thing::DyadicConstant(s) | Thing::BinaryConstant(s) => {
            out.push_str(s);
        }
        Thing::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Thing::Str(s) => out.push_str(s),
        Thing::Unit => out.push_str("void"),
        Thing::Default => out.push_str("default"),
        Thing::Error => out.push_str("error"),
        Thing::Keyword(k) => out.push_str(k.name()),
        Thing::FreeVariable => out.push_str(opts.free_variable.unwrap_or("_x_")),
        Thing::Pi => out.push_str("pi"),
        Thing::Binary { op, lhs, rhs } => {
            let p = op.precedence();
            // `^` is right-associative, the others left-associative.
            let (left_tight, right_tight) = match op {
                BinaryOp::Pow => (true, false),
                BinaryOp::Sub | BinaryOp::Div => (false, true),
                BinaryOp::Add | BinaryOp::Mul => (false, false),
            };
            write_operand(out, lhs, p, left_tight, opts);
            let _ = write!(out, " {} ", op.as_symbol());
            write_operand(out, rhs, p, right_tight, opts);
        }
        Thing::Unary {
            func: UnaryFn::Neg,
            arg,
        } => {
            out.push('-');
            write_operand(out, arg, 3, true, opts);
        }
        Thing::Unary { func, arg } => {
            out.push_str(func.name());
            out.push('(');
            write_thing(out, arg, opts);
            out.push(')');
        }
        Thing::RoundTo { format, arg } => {
            out.push_str(format.function_name());
            out.push('(');
            write_thing(out, arg, opts);
            out.push(')');
        }
        Thing::LibraryFunction {
            function,
            derivative,
            arg,
        } => {
            if *derivative == 0 {
                out.push_str(function.name.as_str());
            } else {
                let _ = write!(out, "(diff^{derivative}({}))", function.name);
            }
            out.push('(');
            write_thing(out, arg, opts);
            out.push(')');
        }
        Thing::LibraryConstant(c) => out.push_str(c.name.as_str()),
        Thing::ProcedureFunction {
            procedure,
            derivative,
            arg,
        } => {
            let params = procedure
                .params
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if *derivative == 0 {
                let _ = write!(out, "(function(proc({params})))");
            } else {
                let _ = write!(out, "(diff^{derivative}(function(proc({params}))))");
            }
            out.push('(');
            write_thing(out, arg, opts);
            out.push(')');
        }
        Thing::Range(r) => out.push_str(&render_interval(r, opts.mode, opts.midpoint)),
        Thing::RangeOf { lo, hi } => {
            out.push('[');
            write_thing(out, lo, opts);
            out.push(';');
            write_thing(out, hi, opts);
            out.push(']');
        }
        Thing::List(items) => write_list(out, items, false, opts),
        Thing::FinalEllipticList(items) => write_list(out, items, true, opts),
        Thing::Ellipsis => out.push_str("..."),
        Thing::Structure(s) => {
            out.push_str("{ ");
            for (i, (name, value)) in s.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, ".{name} = ");
                write_thing(out, value, opts);
            }
            out.push_str(" }");
        }
        Thing::StructureOf(fields) => {
            out.push_str("{ ");
            for (i, (name, value)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, ".{name} = ");
                write_thing(out, value, opts);
            }
            out.push_str(" }");
        }
        Thing::Procedure(p) => {
            let params = p.params.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(", ");
            if p.variadic {
                let _ = write!(out, "proc({params} = ...)");
            } else {
                let _ = write!(out, "proc({params})");
            }
        }
        Thing::ExternalProcedure(e) => {
            let _ = write!(out, "{}{}", e.name, e.signature());
        }
        Thing::Identifier(name) => out.push_str(name.as_str()),
        Thing::Compare { op, lhs, rhs } => {
            write_thing(out, lhs, opts);
            let _ = write!(out, " {} ", op.as_symbol());
            write_thing(out, rhs, opts);
        }
        Thing::In { value, range } => {
            write_thing(out, value, opts);
            out.push_str(" in ");
            write_thing(out, range, opts);
        }
        Thing::And(a, b) | Thing::Or(a, b) => {
            let symbol = if matches!(thing, Thing::And(..)) { "&&" } else { "||" };
            out.push('(');
            write_thing(out, a, opts);
            let _ = write!(out, ") {symbol} (");
            write_thing(out, b, opts);
            out.push(')');
        }
        Thing::Not(a) => {
            out.push_str("!(");
            write_thing(out, a, opts);
            out.push(')');
        }
        Thing::Apply { callee, args } => {
            write_operand(out, callee, 10, false, opts);
            write_args(out, args, opts);
        }
        Thing::Index { target, index } => {
            write_thing(out, target, opts);
            out.push('[');
            write_thing(out, index, opts);
            out.push(']');
        }
        Thing::Field { target, field } => {
            write_thing(out, target, opts);
            let _ = write!(out, ".{field}");
        }
        Thing::Concat(a, b) | Thing::Prepend(a, b) | Thing::Append(a, b) => {
            let symbol = match thing {
                Thing::Concat(..) => "@",
                Thing::Prepend(..) => ".:",
                _ => ":.",
            };
            write_thing(out, a, opts);
            let _ = write!(out, " {symbol} ");
            write_thing(out, b, opts);
        }
        Thing::Builtin { op, args } => {
            out.push_str(op.name());
            write_args(out, args, opts);
        }
        Thing::Algorithm { algorithm, args } => {
            out.push_str(algorithm.name());
            write_args(out, args, opts);
        }
        Thing::SettingValue(setting) => {
            let _ = write!(out, "{}?", setting.name());
        }
        Thing::Approx(a) => {
            out.push('~');
            write_operand(out, a, 10, false, opts);
        }
        Thing::Match { subject, arms } => {
            out.push_str("match ");
            write_thing(out, subject, opts);
            let _ = write!(out, " with ({} arms)", arms.len());
        }
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderOptions::default()))
    }
}

#[cfg(test)]
mod tests;
