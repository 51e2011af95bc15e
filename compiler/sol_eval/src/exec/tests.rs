use pretty_assertions::assert_eq;

use sol_ir::{AssignMode, AssignTarget, IoCommand, Name, Setting, Statement, Thing};

use super::{ExitRequest, Flow};
use crate::collab::{IoCollaborator, IoOutcome};
use crate::config::Configuration;
use crate::interpreter::Interpreter;
use crate::print_handler::buffer_handler;

fn interpreter() -> Interpreter {
    Interpreter::builder().print_handler(buffer_handler()).build()
}

fn run(interp: &mut Interpreter, statement: &Statement) -> Flow {
    interp
        .execute(statement)
        .unwrap_or_else(|e| panic!("execution failed: {e}"))
}

fn print(thing: Thing) -> Statement {
    Statement::Print(vec![thing])
}

fn ints(values: &[i64]) -> Thing {
    Thing::List(values.iter().copied().map(Thing::integer).collect())
}

fn integers_of(thing: Option<Thing>) -> Vec<i64> {
    match thing {
        Some(Thing::List(items)) => items.iter().filter_map(Thing::as_integer).collect(),
        other => panic!("expected a list, got {other:?}"),
    }
}

#[test]
fn for_loop_prints_each_value_and_leaves_the_next_one() {
    let mut interp = interpreter();
    let stmt = Statement::For {
        variable: Name::new("i"),
        start: Thing::integer(1),
        end: Thing::integer(3),
        step: Some(Thing::integer(1)),
        body: Box::new(print(Thing::ident("i"))),
    };
    assert_eq!(run(&mut interp, &stmt), Flow::Continue);
    assert_eq!(interp.print_handler().take_output(), "1\n2\n3\n");
    assert_eq!(
        interp.environment().resolve("i").and_then(|t| t.as_integer()),
        Some(4)
    );
}

#[test]
fn descending_for_loop_uses_negative_step() {
    let mut interp = interpreter();
    let stmt = Statement::For {
        variable: Name::new("i"),
        start: Thing::integer(3),
        end: Thing::integer(1),
        step: Some(Thing::integer(-1)),
        body: Box::new(print(Thing::ident("i"))),
    };
    run(&mut interp, &stmt);
    assert_eq!(interp.print_handler().take_output(), "3\n2\n1\n");
}

#[test]
fn zero_step_is_rejected() {
    let mut interp = interpreter();
    let stmt = Statement::For {
        variable: Name::new("i"),
        start: Thing::integer(1),
        end: Thing::integer(3),
        step: Some(Thing::integer(0)),
        body: Box::new(Statement::Nop(None)),
    };
    run(&mut interp, &stmt);
    assert_eq!(interp.diagnostics().warning_count(), 1);
    assert_eq!(interp.environment().resolve("i"), None);
}

#[test]
fn quit_stops_the_block_and_propagates() {
    let mut interp = interpreter();
    let block = Statement::block(vec![
        print(Thing::string("a")),
        Statement::Quit,
        print(Thing::string("b")),
    ]);
    assert_eq!(run(&mut interp, &block), Flow::Exit(ExitRequest::Quit));
    assert_eq!(interp.print_handler().take_output(), "a\n");
    assert_eq!(interp.environment().depth(), 0);
}

#[test]
fn exit_requests_leave_loops() {
    let mut interp = interpreter();
    let stmt = Statement::While {
        condition: Thing::Boolean(true),
        body: Box::new(Statement::Restart),
    };
    assert_eq!(run(&mut interp, &stmt), Flow::Exit(ExitRequest::Restart));
}

#[test]
fn block_locals_vanish_after_the_block() {
    let mut interp = interpreter();
    let block = Statement::block(vec![
        Statement::Declare(vec![Name::new("x")]),
        Statement::assign("x", Thing::integer(1)),
        print(Thing::ident("x")),
    ]);
    run(&mut interp, &block);
    assert_eq!(interp.print_handler().take_output(), "1\n");
    assert_eq!(interp.environment().resolve("x"), None);
}

#[test]
fn top_level_declaration_is_global() {
    let mut interp = interpreter();
    run(&mut interp, &Statement::Declare(vec![Name::new("g")]));
    assert_eq!(interp.environment().resolve("g"), Some(Thing::Error));
}

#[test]
fn non_boolean_guards_warn_and_skip() {
    let mut interp = interpreter();
    let stmt = Statement::If {
        condition: Thing::integer(1),
        then_branch: Box::new(print(Thing::string("then"))),
        else_branch: Some(Box::new(print(Thing::string("else")))),
    };
    assert_eq!(run(&mut interp, &stmt), Flow::Continue);
    let output = interp.print_handler().take_output();
    assert!(!output.contains("then") && !output.contains("else"), "{output}");
    assert_eq!(interp.diagnostics().warning_count(), 1);
}

#[test]
fn for_in_over_an_empty_list_is_informational() {
    let mut interp = interpreter();
    let stmt = Statement::ForIn {
        variable: Name::new("x"),
        list: Thing::List(Vec::new()),
        body: Box::new(print(Thing::ident("x"))),
    };
    run(&mut interp, &stmt);
    assert_eq!(interp.diagnostics().warning_count(), 0);
    assert!(interp.diagnostics().mentions("empty"));
}

#[test]
fn for_in_binds_each_element() {
    let mut interp = interpreter();
    let stmt = Statement::ForIn {
        variable: Name::new("x"),
        list: ints(&[5, 6]),
        body: Box::new(print(Thing::ident("x"))),
    };
    run(&mut interp, &stmt);
    assert_eq!(interp.print_handler().take_output(), "5\n6\n");
}

#[test]
fn indexed_assignment_past_the_end_fills_by_increment() {
    let mut interp = interpreter();
    run(&mut interp, &Statement::assign("l", ints(&[1, 2])));
    let stmt = Statement::Assign {
        target: AssignTarget::Index {
            name: Name::new("l"),
            index: Thing::integer(4),
        },
        value: Thing::integer(9),
        mode: AssignMode::Raw,
    };
    run(&mut interp, &stmt);
    assert_eq!(
        integers_of(interp.environment().resolve("l")),
        vec![1, 2, 3, 4, 9]
    );
}

#[test]
fn indexed_assignment_into_empty_list_beyond_its_end_warns() {
    let mut interp = interpreter();
    run(&mut interp, &Statement::assign("l", Thing::List(Vec::new())));
    let stmt = Statement::Assign {
        target: AssignTarget::Index {
            name: Name::new("l"),
            index: Thing::integer(2),
        },
        value: Thing::integer(9),
        mode: AssignMode::Raw,
    };
    run(&mut interp, &stmt);
    assert_eq!(interp.diagnostics().warning_count(), 1);
    assert_eq!(interp.environment().resolve("l"), Some(Thing::List(Vec::new())));
}

#[test]
fn field_assignment_builds_structures() {
    let mut interp = interpreter();
    let stmt = Statement::Assign {
        target: AssignTarget::Field {
            name: Name::new("s"),
            path: vec![Name::new("a"), Name::new("b")],
        },
        value: Thing::integer(7),
        mode: AssignMode::Raw,
    };
    run(&mut interp, &stmt);
    let Some(Thing::Structure(s)) = interp.environment().resolve("s") else {
        panic!("expected a structure");
    };
    let Some(Thing::Structure(inner)) = s.get("a") else {
        panic!("expected a nested structure");
    };
    assert_eq!(inner.get("b").and_then(Thing::as_integer), Some(7));
}

#[test]
fn echoed_settings_are_confirmed() {
    let mut interp = interpreter();
    let stmt = Statement::SetSetting {
        setting: Setting::Prec,
        value: Thing::integer(200),
        echo: true,
    };
    run(&mut interp, &stmt);
    assert_eq!(interp.config().prec, 200);
    assert_eq!(
        interp.print_handler().take_output(),
        "The precision has been set to 200 bits.\n"
    );
}

#[test]
fn rejected_settings_keep_the_old_value() {
    let mut interp = interpreter();
    let stmt = Statement::SetSetting {
        setting: Setting::Prec,
        value: Thing::integer(3),
        echo: false,
    };
    run(&mut interp, &stmt);
    assert_eq!(interp.config().prec, Configuration::default().prec);
    assert_eq!(interp.diagnostics().warning_count(), 1);
}

#[test]
fn rename_binds_then_checks_the_old_name() {
    let mut interp = interpreter();
    let rename = |from: &str, to: &str| Statement::Rename {
        from: Name::new(from),
        to: Name::new(to),
    };
    run(&mut interp, &rename("x", "y"));
    assert_eq!(interp.environment().free_variable(), Some(&Name::new("y")));
    run(&mut interp, &rename("z", "w"));
    assert_eq!(interp.environment().free_variable(), Some(&Name::new("y")));
    assert_eq!(interp.diagnostics().warning_count(), 1);
}

#[test]
fn io_without_collaborator_warns() {
    let mut interp = interpreter();
    let stmt = Statement::Io {
        command: IoCommand::Plot,
        args: vec![Thing::FreeVariable],
    };
    assert_eq!(run(&mut interp, &stmt), Flow::Continue);
    assert!(interp.diagnostics().mentions("not available"));
}

struct ScriptedExecute;

impl IoCollaborator for ScriptedExecute {
    fn perform(
        &mut self,
        _command: IoCommand,
        _args: &[Thing],
        _config: &Configuration,
    ) -> Result<IoOutcome, String> {
        Ok(IoOutcome::Run(vec![
            print(Thing::string("from file")),
            Statement::Quit,
            print(Thing::string("never")),
        ]))
    }
}

#[test]
fn quit_inside_executed_statements_is_ignored() {
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .io(Box::new(ScriptedExecute))
        .build();
    let stmt = Statement::Io {
        command: IoCommand::Execute,
        args: vec![Thing::string("script.sol")],
    };
    assert_eq!(run(&mut interp, &stmt), Flow::Continue);
    let output = interp.print_handler().take_output();
    assert!(output.starts_with("from file\n"), "{output}");
    assert!(!output.contains("never"));
    assert!(interp.diagnostics().mentions("ignored"));
}
