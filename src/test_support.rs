use crate::domain::{CommandOutput, CommandRunner};
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::RwLock;

/// Exit code returned for invocations nobody scripted, matching podman's
/// generic failure status.
pub const UNSCRIPTED_EXIT: i32 = 125;

/// A [`CommandRunner`] that replays canned output.
///
/// Responses are keyed by the argument list joined with single spaces, e.g.
/// `"ps --format json --all"`.
#[derive(Debug, Default)]
pub struct FakeRunner {
    responses: RwLock<HashMap<String, CommandOutput>>,
    spawn_failures: RwLock<HashSet<String>>,
    commands: RwLock<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, command: &str, code: i32, stdout: &str, stderr: &str) {
        self.responses.write().unwrap().insert(
            command.to_string(),
            CommandOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
    }

    pub fn respond_ok(&self, command: &str, stdout: &str) {
        self.respond(command, 0, stdout, "");
    }

    /// Makes `command` exit without a status code, as when killed by a signal.
    pub fn respond_signal(&self, command: &str) {
        self.responses.write().unwrap().insert(
            command.to_string(),
            CommandOutput {
                code: None,
                stdout: String::new(),
                stderr: String::new(),
            },
        );
    }

    /// Makes `command` behave as if the executable could not be started.
    pub fn fail_spawn(&self, command: &str) {
        self.spawn_failures
            .write()
            .unwrap()
            .insert(command.to_string());
    }

    /// Every invocation seen so far, in order.
    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, args: &[String]) -> io::Result<CommandOutput> {
        let key = args.join(" ");
        self.record_command(&key);

        if self.spawn_failures.read().unwrap().contains(&key) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "fake: executable not found",
            ));
        }

        Ok(self
            .responses
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| CommandOutput {
                code: Some(UNSCRIPTED_EXIT),
                stdout: String::new(),
                stderr: format!("fake: no response scripted for '{key}'"),
            }))
    }
}
