use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Status of a playground command: 0 for success, non-zero for failure,
/// following the usual shell convention.
pub type ExitCode = i32;

/// Object-safe trait for any command the playground can execute.
///
/// Implemented by built-ins via a blanket impl.
pub trait ExecutableCommand {
    /// Executes the command, writing its results to `stdout`.
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment)
    -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
