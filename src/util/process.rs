//! Subprocess execution utilities.
//!
//! The engine never spawns processes directly: everything goes through a
//! [`ProcessRunner`], so tests can substitute scripted results for real tools.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Exit status of a process whose output went straight to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to look up and run external programs.
pub trait ProcessRunner {
    /// Resolve a program name on the search path.
    fn find_on_path(&self, program: &str) -> Option<PathBuf>;

    /// Run a program to completion and capture its output.
    fn run_capturing_output(&mut self, program: &Path, args: &[String]) -> Result<ProcessOutput>;

    /// Run a program with inherited stdio, optionally in `cwd`.
    fn run_in_directory(
        &mut self,
        program: &Path,
        args: &[String],
        cwd: Option<&Path>,
    ) -> Result<RunStatus>;
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command, capturing stdout and stderr.
    pub fn exec(&self) -> Result<ProcessOutput> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());

        let output = cmd
            .output()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Execute with inherited stdio and return the status only.
    pub fn status(&self) -> Result<RunStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))?;
        Ok(RunStatus {
            code: status.code(),
        })
    }

    /// Display the command for messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// [`ProcessRunner`] backed by the real system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn find_on_path(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run_capturing_output(&mut self, program: &Path, args: &[String]) -> Result<ProcessOutput> {
        let pb = ProcessBuilder::new(program).args(args);
        tracing::debug!("running `{}`", pb.display_command());
        pb.exec()
    }

    fn run_in_directory(
        &mut self,
        program: &Path,
        args: &[String],
        cwd: Option<&Path>,
    ) -> Result<RunStatus> {
        let mut pb = ProcessBuilder::new(program).args(args);
        if let Some(cwd) = cwd {
            pb = pb.cwd(cwd);
        }
        tracing::debug!("running `{}` in {:?}", pb.display_command(), cwd);
        pb.status()
    }
}

/// Render a program and its arguments as one line.
pub fn display_command(program: &Path, args: &[String]) -> String {
    ProcessBuilder::new(program).args(args).display_command()
}
