//! Capability-scoped execution of external tools.
//!
//! Validators gather evidence from git, formatters, type-checkers, the
//! import linter and desktop notifiers. Each call names the capability it
//! needs; a binary outside that capability's allowlist is refused. Calls
//! block until the child exits or the capability's timeout elapses, in
//! which case the child is killed.

use crate::core::config::TimeoutConfig;
use crate::core::error::HookError;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalCapability {
    VcsRead,
    Format,
    Typecheck,
    ImportLint,
    Notify,
}

impl ExternalCapability {
    pub fn as_str(self) -> &'static str {
        match self {
            ExternalCapability::VcsRead => "vcs_read",
            ExternalCapability::Format => "format",
            ExternalCapability::Typecheck => "typecheck",
            ExternalCapability::ImportLint => "import_lint",
            ExternalCapability::Notify => "notify",
        }
    }

    pub fn allowed_bins(self) -> &'static [&'static str] {
        match self {
            ExternalCapability::VcsRead => &["git"],
            ExternalCapability::Format => &["ruff", "rustfmt", "npx"],
            ExternalCapability::Typecheck => &["mypy", "uv", "npx", "cargo"],
            ExternalCapability::ImportLint => &["lint-imports"],
            ExternalCapability::Notify => &["osascript", "notify-send"],
        }
    }

    pub fn timeout(self, timeouts: &TimeoutConfig) -> Duration {
        let secs = match self {
            ExternalCapability::VcsRead => timeouts.vcs,
            ExternalCapability::Format => timeouts.format,
            ExternalCapability::Typecheck => timeouts.typecheck,
            ExternalCapability::ImportLint => timeouts.import_lint,
            ExternalCapability::Notify => timeouts.notify,
        };
        TimeoutConfig::duration(secs)
    }

    pub fn allows(self, program: &str) -> bool {
        self.allowed_bins().contains(&command_bin(program))
    }
}

fn command_bin(program: &str) -> &str {
    Path::new(program)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(program)
}

/// Captured result of a finished external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Seam between validators and the operating system.
pub trait CommandRunner {
    /// Whether `program` can be launched at all.
    fn is_available(&self, program: &str) -> bool;

    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<CommandOutput, HookError>;
}

/// Runs real processes found on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<CommandOutput, HookError> {
        // Output goes to unnamed temp files so a chatty child can never
        // fill a pipe and stall while we wait on it.
        let stdout_file = tempfile::tempfile()?;
        let stderr_file = tempfile::tempfile()?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file.try_clone()?))
            .stderr(Stdio::from(stderr_file.try_clone()?));
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let mut child = command.spawn()?;
        let status = match child.wait_timeout(timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HookError::ExternalTimeout {
                    program: program.to_string(),
                    secs: timeout.as_secs(),
                });
            }
        };

        Ok(CommandOutput {
            code: status.code(),
            stdout: read_back(stdout_file)?,
            stderr: read_back(stderr_file)?,
        })
    }
}

fn read_back(mut file: File) -> Result<String, HookError> {
    file.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
