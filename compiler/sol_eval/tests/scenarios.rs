//! End-to-end behavior of sessions fed statement trees.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use sol_eval::{buffer_handler, CommandOutcome, Configuration, Interpreter, Session};
use sol_ir::{BinaryOp, Keyword, Name, Procedure, Setting, Statement, Thing};
use sol_num::Float;

fn session() -> Session {
    Session::new(Interpreter::builder().print_handler(buffer_handler()).build())
}

fn output(session: &Session) -> String {
    session.interpreter().print_handler().take_output()
}

fn print(thing: Thing) -> Statement {
    Statement::Print(vec![thing])
}

#[test]
fn constant_plus_range() {
    let mut s = session();
    let sum = Thing::binary(
        BinaryOp::Add,
        Thing::integer(1),
        Thing::range_of(Thing::integer(0), Thing::integer(1)),
    );
    assert_eq!(s.run(&Statement::Expression(sum)), CommandOutcome::Completed);
    assert_eq!(output(&s), "[1;2]\n");
}

#[test]
fn for_loop_prints_and_leaves_only_the_loop_variable() {
    let mut s = session();
    s.run(&Statement::assign("k", Thing::integer(10)));
    let before = s.interpreter().environment().resolve("k");
    let stmt = Statement::For {
        variable: Name::new("i"),
        start: Thing::integer(1),
        end: Thing::integer(3),
        step: Some(Thing::integer(1)),
        body: Box::new(print(Thing::ident("i"))),
    };
    assert_eq!(s.run(&stmt), CommandOutcome::Completed);
    assert_eq!(output(&s), "1\n2\n3\n");
    assert_eq!(s.interpreter().environment().resolve("k"), before);
    assert_eq!(
        s.interpreter().environment().resolve("i").and_then(|t| t.as_integer()),
        Some(4)
    );
}

#[test]
fn float_assignment_stores_a_faithful_literal() {
    let mut s = session();
    let third = Thing::binary(BinaryOp::Div, Thing::integer(1), Thing::integer(3));
    s.run(&Statement::float_assign("a", third));
    let Some(Thing::Constant(stored)) = s.interpreter().environment().resolve("a") else {
        panic!("expected a literal constant");
    };
    let prec = s.interpreter().config().prec;
    let exact = Float::with_val(prec + 64, 1) / 3u32;
    let ulp_bound = Float::with_val(prec + 64, 1) >> prec;
    let error = Float::with_val(prec + 64, &stored - &exact).abs();
    assert!(error < ulp_bound, "{stored} is not a faithful rounding of 1/3");

    let reread = s
        .interpreter_mut()
        .evaluate(&Thing::ident("a"))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(reread, Thing::Constant(stored));
}

#[test]
fn raw_assignment_keeps_the_expression() {
    let mut s = session();
    let third = Thing::binary(BinaryOp::Div, Thing::integer(1), Thing::integer(3));
    s.run(&Statement::assign("a", third));
    assert!(matches!(
        s.interpreter().environment().resolve("a"),
        Some(Thing::Binary { .. })
    ));
}

#[test]
fn zero_parameter_procedure_accepts_unit() {
    let mut s = session();
    let answer = Procedure::new(Vec::new(), Vec::new(), Thing::integer(42));
    s.run(&Statement::assign("p", Thing::Procedure(Arc::new(answer))));
    s.run(&Statement::Expression(Thing::apply(Thing::ident("p"), vec![Thing::Unit])));
    s.run(&Statement::Expression(Thing::apply(Thing::ident("p"), Vec::new())));
    assert_eq!(output(&s), "42\n42\n");
}

fn variadic_without_parameters() -> Thing {
    Thing::Procedure(Arc::new(Procedure {
        params: Vec::new(),
        variadic: true,
        body: Vec::new(),
        result: Thing::integer(0),
    }))
}

#[test]
fn variadic_procedure_without_parameters_is_recovered() {
    let mut s = session();
    s.run(&Statement::assign("v", variadic_without_parameters()));
    let call = Statement::Expression(Thing::apply(Thing::ident("v"), vec![Thing::integer(1)]));
    assert_eq!(s.run(&call), CommandOutcome::Completed);
    let diagnostics = s.interpreter().diagnostics();
    assert_eq!(diagnostics.warning_count(), 1);
    assert!(diagnostics.mentions("procedure cannot be executed"));
    assert_eq!(s.interpreter().call_depth(), 0);
}

#[test]
fn variadic_procedure_without_parameters_terminates_with_die_on_error() {
    let mut s = session();
    s.interpreter_mut().config_mut().die_on_error = true;
    s.run(&Statement::assign("v", variadic_without_parameters()));
    let call = Statement::Expression(Thing::apply(Thing::ident("v"), vec![Thing::integer(1)]));
    assert_eq!(s.run(&call), CommandOutcome::Terminated);
    assert!(s.interpreter().diagnostics().mentions("variadic procedure has no parameter"));
}

#[test]
fn timing_reports_totals_after_each_command() {
    let config = Configuration {
        timing: true,
        verbosity: 2,
        ..Configuration::default()
    };
    let mut s = Session::new(
        Interpreter::builder()
            .print_handler(buffer_handler())
            .config(config)
            .build(),
    );
    let third = Thing::binary(BinaryOp::Div, Thing::integer(1), Thing::integer(3));
    s.run(&Statement::Expression(third));
    let diagnostics = s.interpreter().diagnostics();
    assert!(diagnostics.mentions("command took"));
    assert!(output(&s).contains("Information: command took"));
}

#[test]
fn no_timing_report_when_timing_is_off() {
    let mut s = session();
    s.interpreter_mut().config_mut().verbosity = 2;
    s.run(&Statement::Expression(Thing::integer(1)));
    assert!(!s.interpreter().diagnostics().mentions("took"));
}

#[test]
fn quit_ends_the_session() {
    let mut s = session();
    let outcome = s.run_all(&[
        print(Thing::string("before")),
        Statement::Quit,
        print(Thing::string("after")),
    ]);
    assert_eq!(outcome, CommandOutcome::Quit);
    assert_eq!(output(&s), "before\n");
}

#[test]
fn restart_forgets_variables_and_settings() {
    let mut s = session();
    s.run(&Statement::assign("a", Thing::integer(1)));
    s.run(&Statement::SetSetting {
        setting: Setting::Prec,
        value: Thing::integer(300),
        echo: false,
    });
    assert_eq!(s.run(&Statement::Restart), CommandOutcome::Restart);
    assert_eq!(s.interpreter().environment().resolve("a"), None);
    assert_eq!(s.interpreter().config().prec, 165);
}

#[test]
fn setting_dereference_reads_the_current_value() {
    let mut s = session();
    s.run(&Statement::SetSetting {
        setting: Setting::Prec,
        value: Thing::integer(80),
        echo: false,
    });
    s.run(&Statement::Expression(Thing::SettingValue(Setting::Prec)));
    assert_eq!(output(&s), "80\n");
}

fn set_rational_mode(session: &mut Session, on: bool) {
    let value = Thing::Keyword(if on { Keyword::On } else { Keyword::Off });
    session.run(&Statement::SetSetting {
        setting: Setting::RationalMode,
        value,
        echo: false,
    });
}

#[test]
fn rational_mode_shows_exact_fractions() {
    let mut s = session();
    let third = || Thing::binary(BinaryOp::Div, Thing::integer(1), Thing::integer(3));

    s.run(&Statement::Expression(third()));
    let decimal = output(&s);
    assert!(decimal.starts_with("0.333"), "{decimal}");

    set_rational_mode(&mut s, true);
    s.run(&Statement::Expression(third()));
    let six = Thing::binary(BinaryOp::Mul, Thing::integer(2), Thing::integer(3));
    s.run(&Statement::Expression(six));
    assert_eq!(output(&s), "1 / 3\n6\n");

    set_rational_mode(&mut s, false);
    s.run(&Statement::Expression(third()));
    assert!(output(&s).starts_with("0.333"));
}

#[test]
fn rational_mode_falls_back_to_faithful_values() {
    let mut s = session();
    set_rational_mode(&mut s, true);
    s.run(&Statement::Expression(Thing::Pi));
    assert!(output(&s).starts_with("3.14159"));
}

fn endless() -> Thing {
    Thing::Procedure(Arc::new(Procedure::new(
        vec![Name::new("n")],
        Vec::new(),
        Thing::apply(Thing::ident("f"), vec![Thing::ident("n")]),
    )))
}

#[test]
fn failures_inside_calls_are_recovered_and_the_session_goes_on() {
    let mut s = Session::new(
        Interpreter::builder()
            .print_handler(buffer_handler())
            .max_recursion_depth(32)
            .build(),
    );
    s.run(&Statement::assign("f", endless()));
    let outcome = s.run(&Statement::Expression(Thing::apply(
        Thing::ident("f"),
        vec![Thing::integer(0)],
    )));
    assert_eq!(outcome, CommandOutcome::Completed);
    assert_eq!(s.interpreter().call_depth(), 0);
    assert_eq!(s.run(&print(Thing::string("alive"))), CommandOutcome::Completed);
    assert!(output(&s).ends_with("alive\n"));
}

#[test]
fn die_on_error_terminates_and_restores_settings() {
    let mut s = Session::new(
        Interpreter::builder()
            .print_handler(buffer_handler())
            .max_recursion_depth(32)
            .build(),
    );
    s.interpreter_mut().config_mut().die_on_error = true;
    s.run(&Statement::assign("f", endless()));
    let command = Statement::block(vec![
        Statement::SetSetting {
            setting: Setting::Prec,
            value: Thing::integer(300),
            echo: false,
        },
        Statement::Expression(Thing::apply(Thing::ident("f"), vec![Thing::integer(0)])),
    ]);
    assert_eq!(s.run(&command), CommandOutcome::Terminated);
    assert_eq!(s.interpreter().config().prec, 165);
    assert_eq!(s.interpreter().environment().depth(), 0);
    assert_eq!(s.interpreter().diagnostics().warning_count(), 1);
}
