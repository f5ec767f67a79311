//! Closures standing in for objects.
//!
//! A constructor here is just a function that allocates some private state,
//! builds closures over it and returns them in a name-to-method mapping, an
//! [`Instance`]. Private data is whatever the closures capture; private methods
//! are closures that are captured but never put in the mapping; inheritance is
//! copying another instance's mapping and replacing some entries with closures
//! that delegate to the retained base instance.
//!
//! The tiers build up in order: [`identity`], [`deferred_identity`],
//! [`some_functions`], [`some_named_functions`], [`make_counter`],
//! [`make_shouty_counter`] and [`make_inherited_shouty_counter`]. The [`tour`]
//! module replays each as a documented listing, and [`Interpreter`] is an
//! interactive playground over the map-shaped ones.

mod builtin;
pub mod catalog;
pub mod command;
mod console;
mod counter;
pub mod env;
mod functions;
mod instance;
mod interpreter;
pub mod logging;
pub mod tour;
mod value;

pub use catalog::{Catalog, Constructor};
pub use console::{Captured, Console, MemWriter};
pub use counter::{
    OVERRIDE_MARKER, inherit_counter, make_counter, make_inherited_counter,
    make_inherited_shouty_counter, make_shouty_counter,
};
pub use env::Environment;
pub use functions::{deferred_identity, identity, some_functions, some_named_functions};
pub use instance::{Instance, Method};
/// Just a convenient re-export of the interactive playground.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
pub use value::Value;
