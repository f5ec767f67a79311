use crate::command::{CommandFactory, ExitCode};
use crate::env::Environment;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports the builtins defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Interactive playground for constructing instances and calling their members.
///
/// The interpreter maintains an [`Environment`] (the session's bindings) and a list
/// of [`CommandFactory`] objects that are queried to create commands by name.
///
/// Example
/// ```
/// use closure_objects::{Console, Environment, Interpreter};
/// let (console, _) = Console::capture();
/// let mut play = Interpreter::with_environment(Environment::with_console(console));
/// let mut out = Vec::new();
/// play.execute_line("new counter c", &mut out).unwrap();
/// play.execute_line("call c increment", &mut out).unwrap();
/// assert!(String::from_utf8(out).unwrap().ends_with("1\n"));
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(env: Environment, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self { env, commands }
    }

    /// The built-in commands over a caller-provided environment.
    pub fn with_environment(env: Environment) -> Self {
        Self::new(env, builtin_factories())
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run a single command invocation by name with arguments, writing its output to `out`.
    ///
    /// Returns the command's exit code, or an error if no factory knows `name`.
    pub fn run(&mut self, name: &str, args: &[&str], out: &mut dyn Write) -> anyhow::Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                tracing::debug!(command = name, ?args, "execute");
                return cmd.execute(out, &mut self.env);
            }
        }
        Err(anyhow::anyhow!("command not found: {}", name))
    }

    /// Split `line` on whitespace and run it. Blank lines succeed without doing anything.
    pub fn execute_line(&mut self, line: &str, out: &mut dyn Write) -> anyhow::Result<ExitCode> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.split_first() {
            Some((name, args)) => self.run(name, args, out),
            None => Ok(0),
        }
    }

    /// Read-Eval-Print Loop until `exit`, Ctrl-C or end of input.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = std::io::stdout();

        while !self.env.should_exit {
            match rl.readline("λ> ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    if let Err(err) = self.execute_line(&line, &mut stdout) {
                        println!("error: {:#}", err);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    break;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Playground printing to standard output with the default catalog.
    fn default() -> Self {
        Self::with_environment(Environment::new())
    }
}

/// `new`, `call`, `members`, `bindings`, `list`, `exit`.
fn builtin_factories() -> Vec<Box<dyn CommandFactory>> {
    use crate::builtin::*;
    vec![
        Box::new(Factory::<New>::default()),
        Box::new(Factory::<Call>::default()),
        Box::new(Factory::<Members>::default()),
        Box::new(Factory::<Bindings>::default()),
        Box::new(Factory::<List>::default()),
        Box::new(Factory::<Exit>::default()),
    ]
}
