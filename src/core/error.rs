//! Fatal configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// A failure that aborts the whole configure run.
///
/// Every variant is fatal: the run stops before the artifact is committed
/// and the binary reports the message on a single `configure: error:` line.
#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error("unknown OS type: {0}")]
    UnknownPlatform(String),

    #[error("unknown CPU type: {0}")]
    UnknownCpuType(String),

    #[error("need {0}")]
    MissingCommand(String),

    #[error("needed, but unable to find any of: {}", candidates.join(" "))]
    ToolNotFound {
        logical_name: String,
        candidates: Vec<String>,
    },

    #[error("{0} requested but not found")]
    CompilerNotFound(String),

    #[error("bad {compiler} version: {version}, need one of: {}", accepted.join(" "))]
    UnsupportedCompilerVersion {
        compiler: String,
        version: String,
        accepted: Vec<String>,
    },

    #[error("either clang or gcc is required")]
    NoCompiler,

    #[error("no local rust to use: {} does not exist", .0.display())]
    LocalRustNotFound(PathBuf),

    #[error("{step} failed with exit code {}", display_code(*code))]
    StepFailed { step: String, code: Option<i32> },

    #[error("configure for module `{module}` failed with exit code {}", display_code(*code))]
    ModuleConfigureFailed { module: String, code: Option<i32> },

    #[error("could not run configure for module `{module}`: {reason}")]
    ModuleConfigureNotStarted { module: String, reason: String },

    #[error("setting `{0}` is declared more than once")]
    DuplicateSetting(String),

    #[error("invalid setting name `{0}`: expected lower-case letters, digits and `-`")]
    InvalidSettingName(String),
}

fn display_code(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<signal>".to_string(),
    }
}
