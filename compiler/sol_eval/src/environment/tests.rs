use pretty_assertions::assert_eq;

use super::*;
use sol_num::Interval;

fn name(s: &str) -> Name {
    Name::new(s)
}

fn lib(s: &str) -> LibraryFunction {
    LibraryFunction::new(s, |x: &Interval, _, _| Some(x.clone()))
}

#[test]
fn global_assignment_and_lookup() {
    let mut env = Environment::new();
    assert_eq!(env.resolve("a"), None);
    assert_eq!(env.assign(name("a"), Thing::integer(1)), Ok(()));
    assert_eq!(env.resolve("a"), Some(Thing::integer(1)));
}

#[test]
fn declared_name_disappears_after_pop() {
    let mut env = Environment::new();
    env.push_frame();
    assert_eq!(env.declare(name("a"), Thing::integer(1)), Ok(()));
    assert_eq!(env.resolve("a"), Some(Thing::integer(1)));
    env.pop_frame();
    assert_eq!(env.resolve("a"), None);
}

#[test]
fn inner_frame_sees_outer_binding() {
    let mut env = Environment::new();
    assert_eq!(env.assign(name("a"), Thing::integer(1)), Ok(()));
    env.push_frame();
    env.push_frame();
    assert_eq!(env.resolve("a"), Some(Thing::integer(1)));
}

#[test]
fn assignment_rewrites_nearest_declaring_frame() {
    let mut env = Environment::new();
    assert_eq!(env.assign(name("a"), Thing::integer(0)), Ok(()));
    env.push_frame();
    assert_eq!(env.declare(name("a"), Thing::Error), Ok(()));
    env.push_frame();
    assert_eq!(env.assign(name("a"), Thing::integer(5)), Ok(()));
    env.pop_frame();
    assert_eq!(env.resolve("a"), Some(Thing::integer(5)));
    env.pop_frame();
    assert_eq!(env.resolve("a"), Some(Thing::integer(0)));
}

#[test]
fn assignment_inside_block_without_declaration_is_global() {
    let mut env = Environment::new();
    env.push_frame();
    assert_eq!(env.assign(name("g"), Thing::integer(3)), Ok(()));
    env.pop_frame();
    assert_eq!(env.resolve("g"), Some(Thing::integer(3)));
}

#[test]
fn redeclaration_in_same_frame_is_rejected() {
    let mut env = Environment::new();
    env.push_frame();
    assert_eq!(env.declare(name("a"), Thing::Error), Ok(()));
    assert_eq!(
        env.declare(name("a"), Thing::Error),
        Err(EnvError::AlreadyDeclared { name: name("a") })
    );
}

#[test]
fn free_variable_wins_resolution_and_is_reserved() {
    let mut env = Environment::new();
    assert_eq!(env.bind_free_variable(name("x")), Ok(()));
    assert_eq!(env.resolve("x"), Some(Thing::FreeVariable));
    assert_eq!(
        env.assign(name("x"), Thing::integer(1)),
        Err(EnvError::Reserved {
            name: name("x"),
            owner: Owner::FreeVariable
        })
    );
    env.push_frame();
    assert!(env.declare(name("x"), Thing::Error).is_err());
}

#[test]
fn library_names_shadow_variables_and_cannot_be_assigned() {
    let mut env = Environment::new();
    assert_eq!(env.bind_library_function(lib("f")), Ok(()));
    assert!(matches!(
        env.resolve("f"),
        Some(Thing::LibraryFunction { derivative: 0, .. })
    ));
    assert!(matches!(
        env.assign(name("f"), Thing::integer(1)),
        Err(EnvError::Reserved {
            owner: Owner::LibraryFunction,
            ..
        })
    ));
    assert!(env.bind_library_function(lib("f")).is_err());
}

#[test]
fn assigned_name_cannot_become_free_variable() {
    let mut env = Environment::new();
    assert_eq!(env.assign(name("a"), Thing::integer(1)), Ok(()));
    assert_eq!(
        env.bind_free_variable(name("a")),
        Err(EnvError::AlreadyAssigned { name: name("a") })
    );
}

#[test]
fn resolved_values_are_copies() {
    let mut env = Environment::new();
    assert_eq!(env.assign(name("l"), Thing::List(vec![Thing::integer(1)])), Ok(()));
    let mut copy = env.resolve("l");
    if let Some(Thing::List(items)) = &mut copy {
        items.push(Thing::integer(2));
    }
    assert_eq!(env.resolve("l"), Some(Thing::List(vec![Thing::integer(1)])));
}

#[test]
fn clear_forgets_everything() {
    let mut env = Environment::new();
    assert_eq!(env.bind_free_variable(name("x")), Ok(()));
    assert_eq!(env.assign(name("a"), Thing::integer(1)), Ok(()));
    env.push_frame();
    env.clear();
    assert_eq!(env.depth(), 0);
    assert!(!env.is_bound("x"));
    assert!(!env.is_bound("a"));
}
