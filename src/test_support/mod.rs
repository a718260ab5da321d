//! Test utilities and mocks for modconf unit tests.
//!
//! The engine reaches the outside world through [`ProcessRunner`], so tests
//! script a [`MockRunner`] with the programs on the search path and the
//! output each command line should produce.
//!
//! # Example
//!
//! ```rust,ignore
//! use modconf::test_support::{MockProcessOutput, MockRunner};
//!
//! let mut runner = MockRunner::new();
//! runner.tool("gcc", "/usr/bin/gcc", "gcc (GCC) 4.7.2");
//! runner.expect("/bin/uname -s", MockProcessOutput::success("Linux\n"));
//! ```

pub mod fixtures;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::util::process::{display_command, ProcessOutput, ProcessRunner, RunStatus};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn to_output(&self) -> ProcessOutput {
        ProcessOutput {
            code: Some(self.status),
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

/// Pattern for matching command lines in [`MockRunner`].
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s.as_str()),
            CommandPattern::Contains(s) => cmd.contains(s.as_str()),
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    pub pattern: CommandPattern,
    pub output: MockProcessOutput,
}

/// A command run through [`ProcessRunner::run_in_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryCall {
    pub command: String,
    pub cwd: Option<PathBuf>,
}

/// Scripted [`ProcessRunner`].
///
/// Expectations are matched in the order they were added. A command with no
/// matching expectation fails to spawn unless a default output is set.
#[derive(Debug, Default)]
pub struct MockRunner {
    path: HashMap<String, PathBuf>,
    lookups: RefCell<Vec<String>>,
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    directory_calls: Vec<DirectoryCall>,
    default_output: Option<MockProcessOutput>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Put a program on the mock search path.
    pub fn on_path(&mut self, name: &str, path: impl Into<PathBuf>) -> &mut Self {
        self.path.insert(name.to_string(), path.into());
        self
    }

    /// Put a program on the path and script its `--version` output.
    pub fn tool(&mut self, name: &str, path: &str, version_stdout: &str) -> &mut Self {
        self.on_path(name, path);
        self.expect(
            &format!("{} --version", path),
            MockProcessOutput::success(version_stdout),
        )
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), output)
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&mut self, substring: &str, output: MockProcessOutput) -> &mut Self {
        self.push(CommandPattern::Contains(substring.to_string()), output)
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    /// Every command line run, in order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Commands run with inherited stdio, with their working directories.
    pub fn directory_calls(&self) -> &[DirectoryCall] {
        &self.directory_calls
    }

    /// Every program name looked up on the path, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }

    fn push(&mut self, pattern: CommandPattern, output: MockProcessOutput) -> &mut Self {
        self.expectations.push(CommandExpectation { pattern, output });
        self
    }

    fn respond(&mut self, program: &Path, args: &[String]) -> Result<MockProcessOutput> {
        let full_cmd = display_command(program, args);
        self.calls.push(full_cmd.clone());

        if let Some(exp) = self
            .expectations
            .iter()
            .find(|exp| exp.pattern.matches(&full_cmd))
        {
            return Ok(exp.output.clone());
        }

        if let Some(ref default) = self.default_output {
            return Ok(default.clone());
        }

        bail!("unexpected command: {}", full_cmd)
    }
}

impl ProcessRunner for MockRunner {
    fn find_on_path(&self, program: &str) -> Option<PathBuf> {
        self.lookups.borrow_mut().push(program.to_string());
        self.path.get(program).cloned()
    }

    fn run_capturing_output(&mut self, program: &Path, args: &[String]) -> Result<ProcessOutput> {
        Ok(self.respond(program, args)?.to_output())
    }

    fn run_in_directory(
        &mut self,
        program: &Path,
        args: &[String],
        cwd: Option<&Path>,
    ) -> Result<RunStatus> {
        self.directory_calls.push(DirectoryCall {
            command: display_command(program, args),
            cwd: cwd.map(Path::to_path_buf),
        });
        let output = self.respond(program, args)?;
        Ok(RunStatus {
            code: Some(output.status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_matches_in_order() {
        let mut runner = MockRunner::new();
        runner
            .expect("/bin/uname -s", MockProcessOutput::success("Linux\n"))
            .expect_prefix("/bin/uname", MockProcessOutput::success("x86_64\n"));

        let os = runner
            .run_capturing_output(Path::new("/bin/uname"), &["-s".to_string()])
            .unwrap();
        let cpu = runner
            .run_capturing_output(Path::new("/bin/uname"), &["-m".to_string()])
            .unwrap();

        assert_eq!(os.stdout, "Linux\n");
        assert_eq!(cpu.stdout, "x86_64\n");
        assert_eq!(runner.calls(), &["/bin/uname -s", "/bin/uname -m"]);
    }

    #[test]
    fn test_mock_runner_unexpected_command_fails() {
        let mut runner = MockRunner::new();
        let err = runner
            .run_in_directory(Path::new("make"), &[], None)
            .unwrap_err();
        assert!(err.to_string().contains("unexpected command: make"));
        assert_eq!(runner.directory_calls().len(), 1);
    }

    #[test]
    fn test_mock_runner_records_lookups() {
        let mut runner = MockRunner::new();
        runner.on_path("git", "/usr/bin/git");
        assert_eq!(runner.find_on_path("git"), Some(PathBuf::from("/usr/bin/git")));
        assert_eq!(runner.find_on_path("hg"), None);
        assert_eq!(runner.lookups(), vec!["git", "hg"]);
    }
}
