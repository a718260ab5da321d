//! Toolchain probing.
//!
//! A logical tool (say, autoconf 2.13) may be installed under several names.
//! Probing walks the candidate names in order and binds to the first one on
//! the search path; later candidates are never looked at, even when the
//! winner's version cannot be determined.

pub mod compiler;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::error::ConfigureError;
use crate::core::store::ConfigurationStore;
use crate::util::process::ProcessRunner;

pub use compiler::{check_local_rust, select_c_compiler, CCompiler};
pub use version::extract_version;

/// Utilities the engine itself shells out to.
pub const REQUIRED_COMMANDS: &[&str] = &["uname"];

/// A logical tool and the names it may be installed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    /// Variable the result is stored under.
    pub var: &'static str,
    pub candidates: &'static [&'static str],
    pub required: bool,
}

pub const GIT: ToolSpec = ToolSpec {
    var: "CFG_GIT",
    candidates: &["git"],
    required: true,
};

pub const RUSTC: ToolSpec = ToolSpec {
    var: "CFG_RUSTC",
    candidates: &["rustc"],
    required: true,
};

pub const CLANG: ToolSpec = ToolSpec {
    var: "CFG_CLANG",
    candidates: &["clang++", "clang"],
    required: false,
};

pub const GCC: ToolSpec = ToolSpec {
    var: "CFG_GCC",
    candidates: &["gcc"],
    required: false,
};

pub const AUTOCONF213: ToolSpec = ToolSpec {
    var: "CFG_AUTOCONF213",
    candidates: &["autoconf213", "autoconf2.13", "autoconf-2.13"],
    required: true,
};

/// Build programs in probing order.
pub const BUILD_PROGRAMS: &[ToolSpec] = &[GIT, RUSTC, CLANG, GCC, AUTOCONF213];

/// Outcome of probing one logical tool.
///
/// A version is only ever present together with a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    logical_name: String,
    path: Option<PathBuf>,
    version: Option<String>,
}

impl ProbeResult {
    pub fn found(logical_name: impl Into<String>, path: PathBuf, version: Option<String>) -> Self {
        ProbeResult {
            logical_name: logical_name.into(),
            path: Some(path),
            version,
        }
    }

    pub fn missing(logical_name: impl Into<String>) -> Self {
        ProbeResult {
            logical_name: logical_name.into(),
            path: None,
            version: None,
        }
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }

    /// The resolved path as stored in the configuration, empty if missing.
    pub fn path_or_empty(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    /// Append this result to the store, noting the version if known.
    pub fn record(&self, store: &mut ConfigurationStore) {
        store.put_with_note(&self.logical_name, self.path_or_empty(), self.version());
    }
}

/// Probes tools through a [`ProcessRunner`].
pub struct Prober<'a> {
    runner: &'a mut dyn ProcessRunner,
}

impl<'a> Prober<'a> {
    pub fn new(runner: &'a mut dyn ProcessRunner) -> Self {
        Prober { runner }
    }

    /// Find the first candidate on the search path and scrape its version.
    ///
    /// A required tool with no candidate on the path is fatal; an optional
    /// one yields an empty result.
    pub fn probe(
        &mut self,
        logical_name: &str,
        candidates: &[&str],
        required: bool,
    ) -> Result<ProbeResult, ConfigureError> {
        for candidate in candidates {
            let Some(path) = self.runner.find_on_path(candidate) else {
                tracing::debug!("{}: {} not on path", logical_name, candidate);
                continue;
            };
            tracing::debug!("{}: found {} at {}", logical_name, candidate, path.display());
            let version = self.scrape_version(&path);
            return Ok(ProbeResult::found(logical_name, path, version));
        }

        if required {
            return Err(ConfigureError::ToolNotFound {
                logical_name: logical_name.to_string(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            });
        }
        Ok(ProbeResult::missing(logical_name))
    }

    /// Probe a [`ToolSpec`].
    pub fn probe_spec(&mut self, spec: &ToolSpec) -> Result<ProbeResult, ConfigureError> {
        self.probe(spec.var, spec.candidates, spec.required)
    }

    fn scrape_version(&mut self, path: &Path) -> Option<String> {
        match self
            .runner
            .run_capturing_output(path, &["--version".to_string()])
        {
            Ok(output) => {
                extract_version(&output.stdout).or_else(|| extract_version(&output.stderr))
            }
            Err(e) => {
                tracing::debug!("could not query version of {}: {:#}", path.display(), e);
                None
            }
        }
    }
}

/// Results of probing every build program, in probing order.
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    probes: Vec<ProbeResult>,
}

impl Toolchain {
    /// Probe [`BUILD_PROGRAMS`], recording each result in the store.
    ///
    /// Stops at the first missing required tool; the store has already
    /// echoed every earlier result by then.
    pub fn probe_all(
        runner: &mut dyn ProcessRunner,
        store: &mut ConfigurationStore,
    ) -> Result<Toolchain, ConfigureError> {
        let mut prober = Prober::new(runner);
        let mut probes = Vec::with_capacity(BUILD_PROGRAMS.len());
        for spec in BUILD_PROGRAMS {
            let result = match prober.probe_spec(spec) {
                Ok(result) => result,
                Err(e) => {
                    ProbeResult::missing(spec.var).record(store);
                    return Err(e);
                }
            };
            result.record(store);
            probes.push(result);
        }
        Ok(Toolchain { probes })
    }

    /// Result for a probed variable such as `CFG_GCC`.
    pub fn get(&self, var: &str) -> Option<&ProbeResult> {
        self.probes.iter().find(|p| p.logical_name == var)
    }

    /// Result for a spec, or an empty result if it was never probed.
    pub fn result(&self, spec: &ToolSpec) -> ProbeResult {
        self.get(spec.var)
            .cloned()
            .unwrap_or_else(|| ProbeResult::missing(spec.var))
    }

    pub fn probes(&self) -> &[ProbeResult] {
        &self.probes
    }
}

/// Check that every utility in `commands` is on the search path.
pub fn need_commands(runner: &dyn ProcessRunner, commands: &[&str]) -> Result<()> {
    for cmd in commands {
        if runner.find_on_path(cmd).is_none() {
            return Err(ConfigureError::MissingCommand(cmd.to_string()).into());
        }
    }
    Ok(())
}
