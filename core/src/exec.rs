//! External process execution.
//!
//! Everything the store does to the repository goes through git (and, for
//! key inspection, ssh-keygen) as a child process. [`ProcessRunner`] is the
//! seam that lets tests replace those processes with a scripted fake.

use std::fmt;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

use thiserror::Error;

/// A single external command: program, arguments, working directory and
/// extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git", args)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn envs<'a, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    /// The git subcommand (first argument), used by fakes to dispatch.
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr, lossily decoded.
    pub fn combined(&self) -> String {
        let mut combined = String::from_utf8_lossy(&self.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&self.stderr));
        combined
    }

    fn status_label(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {code}"),
            None => "termination by signal".to_string(),
        }
    }

    pub fn failure(&self, invocation: &Invocation) -> ProcessFailure {
        ProcessFailure {
            command: invocation.to_string(),
            status: self.status_label(),
            output: self.combined().trim().to_string(),
        }
    }
}

/// An external command that ran but exited unsuccessfully.
///
/// Carries the captured output so the top-level diagnostic shows what git
/// (or ssh-keygen) actually said.
#[derive(Debug, Clone, Error)]
#[error("`{command}` exited with {status}: {output}")]
pub struct ProcessFailure {
    pub command: String,
    pub status: String,
    pub output: String,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Failed(#[from] ProcessFailure),
}

/// Runs external commands to completion and captures their output.
pub trait ProcessRunner: Send + Sync {
    /// Run `invocation`, blocking until it exits.
    ///
    /// Only failure to start the process is an `Err`; a non-zero exit is
    /// reported through [`ProcessOutput::code`].
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput>;
}

/// Spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        tracing::debug!(command = %invocation, cwd = ?invocation.cwd, "running command");

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).stdin(Stdio::null());
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }
        command.envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let output = command.output()?;
        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Run `invocation` and treat any non-zero exit as an error.
pub fn run_checked(
    runner: &dyn ProcessRunner,
    invocation: &Invocation,
) -> Result<ProcessOutput, CommandError> {
    let output = runner
        .run(invocation)
        .map_err(|source| CommandError::Spawn {
            command: invocation.to_string(),
            source,
        })?;
    if !output.success() {
        return Err(output.failure(invocation).into());
    }
    Ok(output)
}
