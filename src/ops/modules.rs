//! Per-module configuration.
//!
//! Every module in the set gets a build directory under the build root. If
//! the module ships a configure entry it is run from that directory with the
//! module's extra arguments; modules without one are plain dependencies and
//! are skipped.

use std::path::Path;

use anyhow::Result;

use crate::core::error::ConfigureError;
use crate::core::module::Module;
use crate::util::fs::{ensure_dir, is_executable};
use crate::util::process::{display_command, ProcessRunner};
use crate::util::Shell;

/// What to do when a module's configure exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Warn and carry on with the next module.
    #[default]
    Ignore,
    /// Abort the run.
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleOutcome {
    Configured,
    /// No executable configure entry.
    Skipped,
    /// Configure exited non-zero, or was killed by a signal (`None`).
    Failed(Option<i32>),
    /// Configure could not be started at all.
    NotStarted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReport {
    pub name: String,
    pub outcome: ModuleOutcome,
}

/// Walks the module set and runs each module's configure.
pub struct ModuleConfigurator<'a> {
    runner: &'a mut dyn ProcessRunner,
    shell: &'a Shell,
    src_dir: &'a Path,
    build_dir: &'a Path,
    policy: FailurePolicy,
}

impl<'a> ModuleConfigurator<'a> {
    pub fn new(
        runner: &'a mut dyn ProcessRunner,
        shell: &'a Shell,
        src_dir: &'a Path,
        build_dir: &'a Path,
    ) -> Self {
        ModuleConfigurator {
            runner,
            shell,
            src_dir,
            build_dir,
            policy: FailurePolicy::default(),
        }
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Configure every module in order, stopping only on a fatal failure.
    pub fn configure_all(&mut self, modules: &[Module]) -> Result<Vec<ModuleReport>> {
        modules.iter().map(|m| self.configure_module(m)).collect()
    }

    pub fn configure_module(&mut self, module: &Module) -> Result<ModuleReport> {
        let build_dir = module.build_dir(self.build_dir);
        if ensure_dir(&build_dir)? {
            tracing::debug!("created {}", build_dir.display());
        }

        let entry = module.configure_entry(self.src_dir);
        if !is_executable(&entry) {
            if entry.is_file() {
                self.shell.verbose(format!(
                    "{}: {} is not executable, skipping",
                    module.name,
                    entry.display()
                ));
            } else {
                tracing::debug!("{}: no configure at {}", module.name, entry.display());
            }
            return Ok(ModuleReport {
                name: module.name.clone(),
                outcome: ModuleOutcome::Skipped,
            });
        }

        self.shell.step(format!("configuring submodule {}", module.name));
        self.shell
            .verbose(format!("running {}", display_command(&entry, &module.extra_args)));

        let (error, outcome) = match self
            .runner
            .run_in_directory(&entry, &module.extra_args, Some(&build_dir))
        {
            Ok(status) if status.success() => {
                return Ok(ModuleReport {
                    name: module.name.clone(),
                    outcome: ModuleOutcome::Configured,
                });
            }
            Ok(status) => (
                ConfigureError::ModuleConfigureFailed {
                    module: module.name.clone(),
                    code: status.code,
                },
                ModuleOutcome::Failed(status.code),
            ),
            Err(e) => (
                ConfigureError::ModuleConfigureNotStarted {
                    module: module.name.clone(),
                    reason: format!("{:#}", e),
                },
                ModuleOutcome::NotStarted,
            ),
        };

        match self.policy {
            FailurePolicy::Fatal => Err(error.into()),
            FailurePolicy::Ignore => {
                self.shell.warn(error.to_string());
                Ok(ModuleReport {
                    name: module.name.clone(),
                    outcome,
                })
            }
        }
    }
}

/// Regenerate the configure script of every autoconf-flagged module.
///
/// Autoconf runs in the directory holding the module's configure entry. A
/// missing directory is skipped with a warning; a non-zero exit is fatal.
pub fn run_autoconf(
    runner: &mut dyn ProcessRunner,
    shell: &Shell,
    autoconf: &Path,
    src_dir: &Path,
    modules: &[Module],
) -> Result<()> {
    for module in modules.iter().filter(|m| m.autoconf) {
        let entry = module.configure_entry(src_dir);
        let dir = match entry.parent() {
            Some(dir) if dir.is_dir() => dir,
            _ => {
                shell.warn(format!(
                    "{}: no source directory, skipping autoconf",
                    module.name
                ));
                continue;
            }
        };

        shell.step(format!("running autoconf for {}", module.name));
        let status = runner.run_in_directory(autoconf, &[], Some(dir))?;
        if !status.success() {
            return Err(ConfigureError::StepFailed {
                step: format!("{} in {}", autoconf.display(), dir.display()),
                code: status.code,
            }
            .into());
        }
    }
    Ok(())
}
