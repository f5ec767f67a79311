//! The walkthrough: one listing per tier, each with the lines it is documented
//! to print. Running a listing captures its console output and compares it,
//! line by line and in order, with the documentation.

use crate::console::Console;
use crate::counter::{make_counter, make_inherited_shouty_counter, make_shouty_counter};
use crate::functions::{deferred_identity, identity, some_functions, some_named_functions};
use crate::value::Value;
use anyhow::Result;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// The seven example tiers, simplest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Identity,
    Deferred,
    Positional,
    Named,
    Counter,
    Shouty,
    Inherited,
}

impl Tier {
    pub const ALL: [Tier; 7] = [
        Tier::Identity,
        Tier::Deferred,
        Tier::Positional,
        Tier::Named,
        Tier::Counter,
        Tier::Shouty,
        Tier::Inherited,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tier::Identity => "identity",
            Tier::Deferred => "deferred",
            Tier::Positional => "positional",
            Tier::Named => "named",
            Tier::Counter => "counter",
            Tier::Shouty => "shouty",
            Tier::Inherited => "inherited",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        Tier::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Tier::ALL.iter().map(|t| t.name()).collect();
                format!("unknown tier {}, expected one of: {}", s, names.join(", "))
            })
    }
}

/// One line of a listing and what it prints, if anything.
pub struct Step {
    pub code: &'static str,
    pub prints: &'static [&'static str],
}

pub struct Listing {
    pub tier: Tier,
    pub title: &'static str,
    pub steps: &'static [Step],
    run: fn(&Console) -> Result<()>,
}

impl Listing {
    /// Documented output of the whole listing, in order.
    pub fn expected(&self) -> Vec<&'static str> {
        self.steps.iter().flat_map(|s| s.prints.iter().copied()).collect()
    }
}

/// Result of running one listing against a capturing console.
pub struct Outcome<'a> {
    pub listing: &'a Listing,
    pub printed: Vec<String>,
}

impl Outcome<'_> {
    pub fn passed(&self) -> bool {
        self.printed.iter().map(String::as_str).eq(self.listing.expected())
    }
}

const fn step(code: &'static str, prints: &'static [&'static str]) -> Step {
    Step { code, prints }
}

pub static LISTINGS: &[Listing] = &[
    Listing {
        tier: Tier::Identity,
        title: "a function is a value",
        steps: &[
            step("identity(1)", &["1"]),
            step("identity(\"hello\")", &["hello"]),
        ],
        run: run_identity,
    },
    Listing {
        tier: Tier::Deferred,
        title: "returning a closure defers the value",
        steps: &[
            step("let later = deferred_identity(2);", &[]),
            step("later()", &["2"]),
            step("later()", &["2"]),
        ],
        run: run_deferred,
    },
    Listing {
        tier: Tier::Positional,
        title: "several closures over one argument, by position",
        steps: &[
            step("let fns = some_functions(10);", &[]),
            step("fns[0]()", &["15"]),
            step("fns[1]()", &["10"]),
            step("fns[2](5)", &["5"]),
        ],
        run: run_positional,
    },
    Listing {
        tier: Tier::Named,
        title: "the same closures by name",
        steps: &[
            step("let obj = some_named_functions(10);", &[]),
            step("obj.plusFive()", &["15"]),
            step("obj.just()", &["10"]),
            step("obj.minus(5)", &["5"]),
            step("obj.minus()", &["undefined"]),
        ],
        run: run_named,
    },
    Listing {
        tier: Tier::Counter,
        title: "private state behind a constructor",
        steps: &[
            step("let counter = make_counter();", &[]),
            step("counter.increment()", &["1"]),
            step("counter.increment()", &["2"]),
            step("counter.decrement()", &["1"]),
            step("counter.count()", &["1"]),
            step("make_counter().count()", &["0"]),
        ],
        run: run_counter,
    },
    Listing {
        tier: Tier::Shouty,
        title: "public methods calling a private one",
        steps: &[
            step("let counter = make_shouty_counter();", &[]),
            step("counter.increment()", &["1!", "1"]),
            step("counter.increment()", &["2!", "2"]),
            step("counter.decrement()", &["1!", "1"]),
        ],
        run: run_shouty,
    },
    Listing {
        tier: Tier::Inherited,
        title: "inheritance as forwarding plus delegation",
        steps: &[
            step("let counter = make_inherited_shouty_counter();", &[]),
            step("counter.increment()", &["overriding increment", "1!", "1"]),
            step("counter.increment()", &["overriding increment", "2!", "2"]),
            step("counter.decrement()", &["1!", "1"]),
        ],
        run: run_inherited,
    },
];

fn run_identity(console: &Console) -> Result<()> {
    console.emit(identity(1))?;
    console.emit(identity("hello"))?;
    Ok(())
}

fn run_deferred(console: &Console) -> Result<()> {
    let later = deferred_identity(2);
    console.emit(later())?;
    console.emit(later())?;
    Ok(())
}

fn run_positional(console: &Console) -> Result<()> {
    let fns = some_functions(10);
    console.emit(fns[0].call(&[])?)?;
    console.emit(fns[1].call(&[])?)?;
    console.emit(fns[2].call(&[Value::Int(5)])?)?;
    Ok(())
}

fn run_named(console: &Console) -> Result<()> {
    let obj = some_named_functions(10);
    console.emit(obj.call("plusFive", &[])?)?;
    console.emit(obj.call("just", &[])?)?;
    console.emit(obj.call("minus", &[Value::Int(5)])?)?;
    console.emit(obj.call("minus", &[])?)?;
    Ok(())
}

fn run_counter(console: &Console) -> Result<()> {
    let counter = make_counter();
    console.emit(counter.call("increment", &[])?)?;
    console.emit(counter.call("increment", &[])?)?;
    console.emit(counter.call("decrement", &[])?)?;
    console.emit(counter.call("count", &[])?)?;
    console.emit(make_counter().call("count", &[])?)?;
    Ok(())
}

fn run_shouty(console: &Console) -> Result<()> {
    let counter = make_shouty_counter(console);
    console.emit(counter.call("increment", &[])?)?;
    console.emit(counter.call("increment", &[])?)?;
    console.emit(counter.call("decrement", &[])?)?;
    Ok(())
}

fn run_inherited(console: &Console) -> Result<()> {
    let counter = make_inherited_shouty_counter(console);
    console.emit(counter.call("increment", &[])?)?;
    console.emit(counter.call("increment", &[])?)?;
    console.emit(counter.call("decrement", &[])?)?;
    Ok(())
}

/// Run `listing` on a fresh capturing console.
pub fn run_listing(listing: &Listing) -> Result<Outcome<'_>> {
    let (console, captured) = Console::capture();
    (listing.run)(&console)?;
    let outcome = Outcome {
        listing,
        printed: captured.lines(),
    };
    if !outcome.passed() {
        tracing::warn!(tier = %listing.tier, "listing output differs from its documentation");
    }
    Ok(outcome)
}

/// Run every listing, or only the one for `tier`.
pub fn run_tour(tier: Option<Tier>) -> Result<Vec<Outcome<'static>>> {
    LISTINGS
        .iter()
        .filter(|l| tier.is_none_or(|t| l.tier == t))
        .map(run_listing)
        .collect()
}

/// Write outcomes in walkthrough form. Returns true when every listing passed.
///
/// With `quiet`, only one status line per listing is written.
pub fn report(outcomes: &[Outcome<'_>], out: &mut dyn Write, quiet: bool) -> Result<bool> {
    let mut failures = 0;
    for outcome in outcomes {
        let listing = outcome.listing;
        let status = if outcome.passed() { "ok" } else { "MISMATCH" };
        if quiet {
            writeln!(out, "{} {}", status, listing.tier)?;
        } else {
            writeln!(out, "== {}: {}", listing.tier, listing.title)?;
            for step in listing.steps {
                if step.prints.is_empty() {
                    writeln!(out, "{}", step.code)?;
                } else {
                    writeln!(out, "{} // prints: {}", step.code, step.prints.join(", "))?;
                }
            }
            writeln!(out, "{}", status)?;
            if !outcome.passed() {
                writeln!(out, "  expected: {:?}", listing.expected())?;
                writeln!(out, "  printed:  {:?}", outcome.printed)?;
            }
            writeln!(out)?;
        }
        if !outcome.passed() {
            failures += 1;
        }
    }
    writeln!(
        out,
        "{} listing(s), {} mismatch(es)",
        outcomes.len(),
        failures
    )?;
    Ok(failures == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_listing_per_tier_in_order() {
        let tiers: Vec<_> = LISTINGS.iter().map(|l| l.tier).collect();
        assert_eq!(tiers, Tier::ALL.to_vec());
    }

    #[test]
    fn test_every_listing_prints_what_it_documents() {
        for outcome in run_tour(None).unwrap() {
            assert!(
                outcome.passed(),
                "{}: expected {:?}, printed {:?}",
                outcome.listing.tier,
                outcome.listing.expected(),
                outcome.printed
            );
        }
    }

    #[test]
    fn test_single_tier_filter() {
        let outcomes = run_tour(Some(Tier::Shouty)).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(
            outcomes[0].printed,
            vec!["1!", "1", "2!", "2", "1!", "1"]
        );
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!("inherited".parse::<Tier>(), Ok(Tier::Inherited));
        let err = "classes".parse::<Tier>().unwrap_err();
        assert!(err.starts_with("unknown tier classes"));
    }

    #[test]
    fn test_report_quiet() {
        let outcomes = run_tour(Some(Tier::Counter)).unwrap();
        let mut out = Vec::new();
        assert!(report(&outcomes, &mut out, true).unwrap());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ok counter\n1 listing(s), 0 mismatch(es)\n"
        );
    }

    #[test]
    fn test_report_flags_mismatch() {
        let listing = &LISTINGS[0];
        let outcomes = vec![Outcome {
            listing,
            printed: vec!["1".to_string()],
        }];
        let mut out = Vec::new();
        assert!(!report(&outcomes, &mut out, false).unwrap());

        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("== identity: a function is a value\nidentity(1) // prints: 1\n"));
        assert!(s.contains("MISMATCH\n  expected: [\"1\", \"hello\"]\n  printed:  [\"1\"]\n"));
        assert!(s.ends_with("1 listing(s), 1 mismatch(es)\n"));
    }
}
