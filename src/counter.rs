//! Stateful tiers: a counter whose state is a captured cell, a counter with a
//! private helper method, and a counter "subclass" built by delegation.

use crate::console::Console;
use crate::instance::{Instance, Method};
use crate::value::Value;
use anyhow::Result;
use std::cell::Cell;
use std::rc::Rc;

/// Line emitted by the overriding `increment` before it delegates.
pub const OVERRIDE_MARKER: &str = "overriding increment";

/// Move `state` by `delta` and return the new count. When the result would not
/// fit in an `i64` the count is left alone and `None` is returned.
fn step(state: &Cell<i64>, delta: i64) -> Option<i64> {
    let next = state.get().checked_add(delta)?;
    state.set(next);
    Some(next)
}

/// Counter with `increment`, `decrement` and `count`.
///
/// The count starts at 0 and lives in a cell that only these three closures
/// capture. Every call allocates a new cell.
pub fn make_counter() -> Instance {
    let shared_state = Rc::new(Cell::new(0i64));
    tracing::debug!("constructing counter");

    let increment = {
        let state = shared_state.clone();
        Method::thunk(move || Ok(step(&state, 1).map_or(Value::Missing, Value::Int)))
    };
    let decrement = {
        let state = shared_state.clone();
        Method::thunk(move || Ok(step(&state, -1).map_or(Value::Missing, Value::Int)))
    };
    let count = Method::thunk(move || Ok(Value::Int(shared_state.get())));

    Instance::new()
        .with_member("increment", increment)
        .with_member("decrement", decrement)
        .with_member("count", count)
}

/// Counter that announces every new count on `console`.
///
/// `shout` is a sibling closure over the same cell. It is called by both
/// members but never inserted into the returned instance.
pub fn make_shouty_counter(console: &Console) -> Instance {
    let shared_state = Rc::new(Cell::new(0i64));
    tracing::debug!("constructing shouty counter");

    let shout: Rc<dyn Fn() -> Result<()>> = {
        let state = shared_state.clone();
        let console = console.clone();
        Rc::new(move || console.emit(format!("{}!", state.get())))
    };

    let increment = {
        let state = shared_state.clone();
        let shout = shout.clone();
        Method::thunk(move || match step(&state, 1) {
            Some(n) => {
                shout()?;
                Ok(Value::Int(n))
            }
            None => Ok(Value::Missing),
        })
    };
    let decrement = Method::thunk(move || match step(&shared_state, -1) {
        Some(n) => {
            shout()?;
            Ok(Value::Int(n))
        }
        None => Ok(Value::Missing),
    });

    Instance::new()
        .with_member("increment", increment)
        .with_member("decrement", decrement)
}

/// Derive from `super_ref`: forward every member, override `increment` to emit
/// [`OVERRIDE_MARKER`] and then delegate to the base's `increment`.
///
/// Forwarded members keep operating on the base instance's state; the derived
/// instance has no state of its own.
pub fn inherit_counter(super_ref: Instance, console: &Console) -> Instance {
    let console = console.clone();
    Instance::extend(&super_ref).with_member(
        "increment",
        Method::new(move |args| {
            console.emit(OVERRIDE_MARKER)?;
            super_ref.call("increment", args)
        }),
    )
}

/// [`inherit_counter`] over a fresh [`make_shouty_counter`].
pub fn make_inherited_shouty_counter(console: &Console) -> Instance {
    tracing::debug!("constructing inherited shouty counter");
    inherit_counter(make_shouty_counter(console), console)
}

/// [`inherit_counter`] over a fresh [`make_counter`]; `count` is forwarded too.
pub fn make_inherited_counter(console: &Console) -> Instance {
    tracing::debug!("constructing inherited counter");
    inherit_counter(make_counter(), console)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: Result<Value>) -> i64 {
        v.unwrap().as_int().unwrap()
    }

    #[test]
    fn test_counter_sequence() {
        let counter = make_counter();
        assert_eq!(int(counter.call("increment", &[])), 1);
        assert_eq!(int(counter.call("increment", &[])), 2);
        assert_eq!(int(counter.call("decrement", &[])), 1);
        assert_eq!(int(counter.call("count", &[])), 1);
    }

    #[test]
    fn test_counters_do_not_share_state() {
        let a = make_counter();
        let b = make_counter();
        a.call("increment", &[]).unwrap();
        a.call("increment", &[]).unwrap();

        assert_eq!(int(a.call("count", &[])), 2);
        assert_eq!(int(b.call("count", &[])), 0);
        assert_eq!(int(b.call("decrement", &[])), -1);
        assert_eq!(int(a.call("count", &[])), 2);
    }

    #[test]
    fn test_count_is_idempotent() {
        let counter = make_counter();
        counter.call("decrement", &[]).unwrap();
        for _ in 0..5 {
            assert_eq!(int(counter.call("count", &[])), -1);
        }
    }

    #[test]
    fn test_step_stops_at_the_i64_bounds() {
        let state = Cell::new(i64::MAX - 1);
        assert_eq!(step(&state, 1), Some(i64::MAX));
        assert_eq!(step(&state, 1), None);
        assert_eq!(state.get(), i64::MAX);

        let state = Cell::new(i64::MIN);
        assert_eq!(step(&state, -1), None);
        assert_eq!(state.get(), i64::MIN);
        assert_eq!(step(&state, 1), Some(i64::MIN + 1));
    }

    #[test]
    fn test_counter_outlives_its_instance_through_a_method() {
        let increment = {
            let counter = make_counter();
            counter.member("increment").unwrap().clone()
        };
        assert_eq!(int(increment.call(&[])), 1);
        assert_eq!(int(increment.call(&[])), 2);
    }

    #[test]
    fn test_shouty_counter_emits_each_change() {
        let (console, captured) = Console::capture();
        let counter = make_shouty_counter(&console);

        assert_eq!(int(counter.call("increment", &[])), 1);
        assert_eq!(captured.lines(), vec!["1!"]);

        assert_eq!(int(counter.call("increment", &[])), 2);
        assert_eq!(int(counter.call("decrement", &[])), 1);
        assert_eq!(captured.lines(), vec!["1!", "2!", "1!"]);
    }

    #[test]
    fn test_shout_is_not_a_member() {
        let (console, _captured) = Console::capture();
        let counter = make_shouty_counter(&console);

        assert!(counter.member("shout").is_none());
        assert_eq!(counter.names().collect::<Vec<_>>(), vec!["decrement", "increment"]);
    }

    #[test]
    fn test_inherited_counter_overrides_and_forwards() {
        let (console, captured) = Console::capture();
        let base = make_shouty_counter(&console);
        let child = inherit_counter(base.clone(), &console);

        assert!(child.shares_member(&base, "decrement"));
        assert!(!child.shares_member(&base, "increment"));

        assert_eq!(int(child.call("increment", &[])), 1);
        assert_eq!(captured.lines(), vec![OVERRIDE_MARKER, "1!"]);

        assert_eq!(int(child.call("increment", &[])), 2);
        assert_eq!(int(child.call("decrement", &[])), 1);
        // the forwarded member mutated the base's state
        assert_eq!(int(base.call("increment", &[])), 2);
        assert_eq!(
            captured.lines(),
            vec![OVERRIDE_MARKER, "1!", OVERRIDE_MARKER, "2!", "1!", "2!"]
        );
    }

    #[test]
    fn test_inherited_over_plain_counter() {
        let (console, captured) = Console::capture();
        let child = make_inherited_counter(&console);

        assert_eq!(int(child.call("increment", &[])), 1);
        assert_eq!(int(child.call("increment", &[])), 2);
        assert_eq!(int(child.call("decrement", &[])), 1);
        assert_eq!(int(child.call("count", &[])), 1);
        assert_eq!(captured.lines(), vec![OVERRIDE_MARKER, OVERRIDE_MARKER]);
    }

    #[test]
    fn test_inherited_instances_are_independent() {
        let (console, _captured) = Console::capture();
        let a = make_inherited_shouty_counter(&console);
        let b = make_inherited_shouty_counter(&console);

        a.call("increment", &[]).unwrap();
        a.call("increment", &[]).unwrap();
        assert_eq!(int(b.call("increment", &[])), 1);
    }
}
