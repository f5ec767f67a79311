use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::value::Value;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::io::Write;

/// Built-in commands known to the playground at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// against the session [`Environment`].
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "new" or "call".
    fn name() -> &'static str;

    /// Executes the command, writing results to `stdout`.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match T::execute(*self, stdout, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                tracing::warn!(command = T::name(), error = %e, "command failed");
                writeln!(stdout, "error: {:#}", e)?;
                Ok(1)
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> anyhow::Result<i32> {
        writeln!(stdout, "{}", self.output.trim_end())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            let args = keep_negative_numbers_positional(args);
            Some(match T::from_args(&[name], &args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

/// argh reads every word starting with `-` as a flag. A `--` goes in front of
/// the first negative integer so it and everything after stay positional.
fn keep_negative_numbers_positional<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut out = Vec::with_capacity(args.len() + 1);
    let mut options_ended = false;
    for &arg in args {
        if arg == "--" {
            options_ended = true;
        } else if !options_ended && arg.starts_with('-') && arg.parse::<i64>().is_ok() {
            out.push("--");
            options_ended = true;
        }
        out.push(arg);
    }
    out
}

#[derive(FromArgs)]
/// construct a fresh instance and bind it to a name.
pub struct New {
    #[argh(positional)]
    /// constructor to invoke; `list` shows the available ones.
    pub constructor: String,

    #[argh(positional)]
    /// name to bind the instance to. An existing binding of that name is replaced.
    pub binding: String,

    #[argh(positional, greedy)]
    /// integer construction arguments.
    pub args: Vec<Value>,
}

impl BuiltinCommand for New {
    fn name() -> &'static str {
        "new"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let instance = env
            .catalog
            .construct(&self.constructor, &env.console, &self.args)
            .with_context(|| format!("new: can't construct {}", self.binding))?;
        let members: Vec<&str> = instance.names().collect();
        writeln!(
            stdout,
            "{} = {} {{ {} }}",
            self.binding,
            self.constructor,
            members.join(", ")
        )?;
        env.bind(self.binding, self.constructor, instance);
        Ok(0)
    }
}

#[derive(FromArgs)]
/// call a member of a bound instance and print its result.
pub struct Call {
    #[argh(positional)]
    /// name of the instance.
    pub binding: String,

    #[argh(positional)]
    /// member to call, e.g. increment.
    pub member: String,

    #[argh(positional, greedy)]
    /// arguments passed to the member; `undefined` passes the missing value.
    pub args: Vec<Value>,
}

impl BuiltinCommand for Call {
    fn name() -> &'static str {
        "call"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let binding = env.binding(&self.binding)?;
        let value = binding
            .instance
            .call(&self.member, &self.args)
            .with_context(|| format!("call: {}.{}", self.binding, self.member))?;
        writeln!(stdout, "{}", value)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// print the member names of a bound instance.
pub struct Members {
    #[argh(positional)]
    /// name of the instance.
    pub binding: String,
}

impl BuiltinCommand for Members {
    fn name() -> &'static str {
        "members"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let binding = env.binding(&self.binding)?;
        let members: Vec<&str> = binding.instance.names().collect();
        writeln!(stdout, "{}", members.join(" "))?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// print every bound name with the constructor that produced it.
pub struct Bindings {}

impl BuiltinCommand for Bindings {
    fn name() -> &'static str {
        "bindings"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        for (name, binding) in &env.bindings {
            writeln!(stdout, "{} = {}", name, binding.constructor)?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// print the available constructors.
pub struct List {}

impl BuiltinCommand for List {
    fn name() -> &'static str {
        "list"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.catalog.describe(stdout)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// leave the playground.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}
