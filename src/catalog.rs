use crate::console::Console;
use crate::counter;
use crate::functions;
use crate::instance::Instance;
use crate::value::Value;
use anyhow::{Result, bail};
use std::io::Write;

/// Something that builds fresh instances on demand.
///
/// Implementations must return an instance with newly allocated state on every
/// call to [`Constructor::construct`].
pub trait Constructor {
    /// Name the playground and `list` refer to, e.g. "counter".
    fn name(&self) -> &'static str;

    /// One-line description for listings.
    fn summary(&self) -> &'static str;

    /// Number of integer construction arguments expected.
    fn arity(&self) -> usize;

    /// Builds a new instance. `args` has already been checked against [`Constructor::arity`].
    fn construct(&self, console: &Console, args: &[i64]) -> Result<Instance>;
}

/// Constructor backed by a plain function pointer.
struct FnConstructor {
    name: &'static str,
    summary: &'static str,
    arity: usize,
    build: fn(&Console, &[i64]) -> Instance,
}

impl Constructor for FnConstructor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn summary(&self) -> &'static str {
        self.summary
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn construct(&self, console: &Console, args: &[i64]) -> Result<Instance> {
        Ok((self.build)(console, args))
    }
}

/// Named set of constructors.
pub struct Catalog {
    constructors: Vec<Box<dyn Constructor>>,
}

impl Catalog {
    pub fn new(constructors: Vec<Box<dyn Constructor>>) -> Self {
        Self { constructors }
    }

    pub fn find(&self, name: &str) -> Option<&dyn Constructor> {
        self.constructors
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Constructor> {
        self.constructors.iter().map(|c| c.as_ref())
    }

    /// Look up `name`, validate the arguments and construct.
    pub fn construct(&self, name: &str, console: &Console, args: &[Value]) -> Result<Instance> {
        let Some(ctor) = self.find(name) else {
            bail!("unknown constructor: {}", name);
        };
        if args.len() != ctor.arity() {
            bail!(
                "{} expects {} argument(s), got {}",
                name,
                ctor.arity(),
                args.len()
            );
        }
        let ints = args
            .iter()
            .map(|v| {
                v.as_int()
                    .ok_or_else(|| anyhow::anyhow!("{}: arguments must be integers", name))
            })
            .collect::<Result<Vec<i64>>>()?;
        tracing::debug!(constructor = name, ?ints, "construct");
        ctor.construct(console, &ints)
    }

    /// One line per constructor: name, argument placeholders, summary.
    pub fn describe(&self, out: &mut dyn Write) -> Result<()> {
        for ctor in self.iter() {
            let params = " <int>".repeat(ctor.arity());
            writeln!(out, "{}{}: {}", ctor.name(), params, ctor.summary())?;
        }
        Ok(())
    }
}

impl Default for Catalog {
    /// The map-shaped tiers:
    /// `named`, `counter`, `shouty`, `inherited`, `inherited-counter`.
    fn default() -> Self {
        Self::new(vec![
            Box::new(FnConstructor {
                name: "named",
                summary: "plusFive, just and minus closing over one integer",
                arity: 1,
                build: |_, args| functions::some_named_functions(args[0]),
            }),
            Box::new(FnConstructor {
                name: "counter",
                summary: "increment, decrement and count over a private count",
                arity: 0,
                build: |_, _| counter::make_counter(),
            }),
            Box::new(FnConstructor {
                name: "shouty",
                summary: "counter that prints every new count through a private helper",
                arity: 0,
                build: |console, _| counter::make_shouty_counter(console),
            }),
            Box::new(FnConstructor {
                name: "inherited",
                summary: "shouty counter with increment overridden by delegation",
                arity: 0,
                build: |console, _| counter::make_inherited_shouty_counter(console),
            }),
            Box::new(FnConstructor {
                name: "inherited-counter",
                summary: "plain counter with increment overridden by delegation",
                arity: 0,
                build: |console, _| counter::make_inherited_counter(console),
            }),
        ])
    }
}
