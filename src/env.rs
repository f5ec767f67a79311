use crate::catalog::Catalog;
use crate::console::Console;
use crate::instance::Instance;
use anyhow::Result;
use std::collections::BTreeMap;

/// A named instance together with the constructor that produced it.
#[derive(Debug, Clone)]
pub struct Binding {
    pub constructor: String,
    pub instance: Instance,
}

/// Mutable state of a playground session.
///
/// The environment contains:
/// - `bindings`: instances constructed so far, by the name the user gave them.
/// - `catalog`: constructors available to `new`.
/// - `console`: where instances emit (e.g. the shouty counter's announcements).
/// - `should_exit`: a flag the read loop checks to know when to terminate.
pub struct Environment {
    pub bindings: BTreeMap<String, Binding>,
    pub catalog: Catalog,
    pub console: Console,
    pub should_exit: bool,
}

impl Environment {
    /// Empty session emitting to standard output with the default catalog.
    pub fn new() -> Self {
        Self::with_console(Console::stdout())
    }

    pub fn with_console(console: Console) -> Self {
        Self {
            bindings: BTreeMap::new(),
            catalog: Catalog::default(),
            console,
            should_exit: false,
        }
    }

    pub fn binding(&self, name: &str) -> Result<&Binding> {
        self.bindings
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("unknown binding: {}", name))
    }

    /// Bind `instance` under `name`, replacing (and dropping) any previous one.
    pub fn bind(
        &mut self,
        name: impl Into<String>,
        constructor: impl Into<String>,
        instance: Instance,
    ) {
        self.bindings.insert(
            name.into(),
            Binding {
                constructor: constructor.into(),
                instance,
            },
        );
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
