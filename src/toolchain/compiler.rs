//! C compiler selection and the local Rust override.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::error::ConfigureError;
use crate::toolchain::version::{is_accepted_clang_version, ACCEPTED_CLANG_VERSIONS};
use crate::toolchain::ProbeResult;
use crate::util::process::ProcessRunner;

/// The C compiler family the build will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CCompiler {
    Gcc,
    Clang,
}

impl CCompiler {
    /// The value persisted as `CFG_C_COMPILER`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CCompiler::Gcc => "gcc",
            CCompiler::Clang => "clang",
        }
    }
}

impl fmt::Display for CCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the C compiler.
///
/// With `use_clang`, clang must have been found and its version must be one
/// of the accepted releases. Otherwise gcc is mandatory.
pub fn select_c_compiler(
    use_clang: bool,
    clang: &ProbeResult,
    gcc: &ProbeResult,
) -> Result<CCompiler, ConfigureError> {
    if use_clang {
        if !clang.is_found() {
            return Err(ConfigureError::CompilerNotFound("clang".to_string()));
        }
        let version = clang.version().unwrap_or_default();
        if !is_accepted_clang_version(version) {
            return Err(ConfigureError::UnsupportedCompilerVersion {
                compiler: "CLANG".to_string(),
                version: if version.is_empty() {
                    "unknown".to_string()
                } else {
                    version.to_string()
                },
                accepted: ACCEPTED_CLANG_VERSIONS
                    .iter()
                    .map(|v| v.to_string())
                    .collect(),
            });
        }
        return Ok(CCompiler::Clang);
    }

    if !gcc.is_found() {
        return Err(ConfigureError::NoCompiler);
    }
    Ok(CCompiler::Gcc)
}

/// A rustc found under `--local-rust-root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRust {
    pub rustc: PathBuf,
    /// First line of `rustc --version`, empty if it printed nothing.
    pub version: String,
}

/// Validate `--local-rust-root`. An empty root means "use the rustc on the path".
pub fn check_local_rust(root: &str, runner: &mut dyn ProcessRunner) -> Result<Option<LocalRust>> {
    if root.is_empty() {
        return Ok(None);
    }

    let rustc = Path::new(root).join("bin").join("rustc");
    if !rustc.is_file() {
        return Err(ConfigureError::LocalRustNotFound(rustc).into());
    }

    let output = runner.run_capturing_output(&rustc, &["--version".to_string()])?;
    let version = output.stdout.lines().next().unwrap_or("").trim().to_string();
    Ok(Some(LocalRust { rustc, version }))
}
