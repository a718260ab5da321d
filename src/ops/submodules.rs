//! Version-control prerequisite steps.
//!
//! Modules are git submodules of the source tree. Before configuring, the
//! checkout is synced, updated and scrubbed so every module starts from a
//! pristine tree. Each step is fatal on a non-zero exit.

use std::path::Path;

use anyhow::Result;

use crate::core::error::ConfigureError;
use crate::util::process::{display_command, ProcessRunner};
use crate::util::Shell;

/// Submodule commands, in the order they run.
pub const SUBMODULE_STEPS: &[&[&str]] = &[
    &["submodule", "--quiet", "sync"],
    &["submodule", "--quiet", "init"],
    &["submodule", "--quiet", "update"],
    &["submodule", "--quiet", "foreach", "--recursive", "git", "clean", "-dxf"],
    &["submodule", "--quiet", "foreach", "--recursive", "git", "checkout", "."],
];

/// Run every submodule step with `git` in `src_dir`.
pub fn update_submodules(
    runner: &mut dyn ProcessRunner,
    shell: &Shell,
    git: &Path,
    src_dir: &Path,
) -> Result<()> {
    shell.step("updating submodules");

    for step in SUBMODULE_STEPS {
        let args: Vec<String> = step.iter().map(|s| s.to_string()).collect();
        let command = display_command(git, &args);
        shell.verbose(format!("running {}", command));

        let status = runner.run_in_directory(git, &args, Some(src_dir))?;
        if !status.success() {
            return Err(ConfigureError::StepFailed {
                step: command,
                code: status.code,
            }
            .into());
        }
    }
    Ok(())
}
