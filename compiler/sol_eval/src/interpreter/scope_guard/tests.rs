use std::panic::{catch_unwind, AssertUnwindSafe};

use sol_ir::{Name, Thing};

use super::*;
use crate::print_handler::silent_handler;

fn interpreter() -> Interpreter {
    Interpreter::builder().print_handler(silent_handler()).build()
}

#[test]
fn frame_popped_on_normal_exit() {
    let mut interp = interpreter();
    assert_eq!(interp.env.depth(), 0);
    {
        let scoped = interp.scoped();
        assert_eq!(scoped.env.depth(), 1);
    }
    assert_eq!(interp.env.depth(), 0);
}

#[test]
fn frame_popped_on_panic() {
    let mut interp = interpreter();
    let result = catch_unwind(AssertUnwindSafe(|| {
        interp.with_frame(|scoped| {
            scoped.with_frame(|inner| {
                assert_eq!(inner.env.depth(), 2);
                panic!("deep panic");
            });
        });
    }));
    assert!(result.is_err());
    assert_eq!(interp.env.depth(), 0);
}

#[test]
fn frame_popped_on_early_return() {
    fn failing(interp: &mut Interpreter) -> Result<(), String> {
        interp.with_frame(|scoped| {
            scoped
                .env
                .declare(Name::new("a"), Thing::integer(1))
                .map_err(|e| e.to_string())?;
            Err("stop".to_string())
        })
    }

    let mut interp = interpreter();
    assert_eq!(failing(&mut interp), Err("stop".to_string()));
    assert_eq!(interp.env.depth(), 0);
    assert!(interp.env.resolve("a").is_none());
}

#[test]
fn declarations_are_local_to_the_frame() {
    let mut interp = interpreter();
    interp.with_frame(|scoped| {
        let declared = scoped.env.declare(Name::new("t"), Thing::integer(3));
        assert!(declared.is_ok());
        assert_eq!(scoped.env.resolve("t"), Some(Thing::integer(3)));
    });
    assert_eq!(interp.env.resolve("t"), None);
}
