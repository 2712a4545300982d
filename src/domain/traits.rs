use std::fmt::Debug;
use std::io;

/// Captured result of one external process invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to run the container runtime executable.
///
/// The adapter only ever passes arguments; which binary gets run is the
/// runner's business.
pub trait CommandRunner: Send + Sync + Debug {
    /// Run the executable with `args` and wait for it to exit.
    ///
    /// An `Err` means the process could not be spawned at all; a non-zero
    /// exit is reported through [`CommandOutput::code`].
    fn run(&self, args: &[String]) -> io::Result<CommandOutput>;
}
