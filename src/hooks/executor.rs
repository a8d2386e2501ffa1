use crate::error::{ReleaserError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

/// Runs descriptor commands.
///
/// Implementors must be `Send + Sync`; one runner is shared by every
/// per-project release task.
pub trait CommandRunner: Send + Sync {
    /// Run `command` through the platform shell in `dir`.
    ///
    /// The current environment is inherited and extended with `env`. A
    /// non-zero exit is an error carrying the captured output.
    fn run(&self, command: &str, dir: &Path, env: &HashMap<String, String>) -> Result<()>;
}

/// Executes commands with `sh -c` (`cmd /C` on Windows)
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    fn shell(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, dir: &Path, env: &HashMap<String, String>) -> Result<()> {
        tracing::debug!(command, dir = %dir.display(), "running command");

        let output = Self::shell(command)
            .current_dir(dir)
            .envs(env)
            .output()?;

        if !output.status.success() {
            return Err(ReleaserError::Command {
                command: command.to_string(),
                status: output.status.to_string(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

/// A command invocation seen by [RecordingRunner]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    pub command: String,
    pub dir: PathBuf,
    pub env: HashMap<String, String>,
}

/// Runner for testing that records commands instead of executing them.
///
/// Commands containing a configured fragment fail with a
/// [ReleaserError::Command] as if they exited with status 1.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<RecordedCommand>>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command containing `fragment`
    pub fn failing_on(fragment: impl Into<String>) -> Self {
        RecordingRunner {
            commands: Mutex::new(Vec::new()),
            fail_on: Some(fragment.into()),
        }
    }

    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, dir: &Path, env: &HashMap<String, String>) -> Result<()> {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(RecordedCommand {
                command: command.to_string(),
                dir: dir.to_path_buf(),
                env: env.clone(),
            });
        }

        match &self.fail_on {
            Some(fragment) if command.contains(fragment.as_str()) => Err(ReleaserError::Command {
                command: command.to_string(),
                status: "exit status: 1".to_string(),
                stdout: String::new(),
                stderr: format!("{}: failed", fragment),
            }),
            _ => Ok(()),
        }
    }
}
