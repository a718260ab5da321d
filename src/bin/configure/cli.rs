//! CLI definitions using clap.
//!
//! Everything after the few driver flags is captured verbatim and handed to
//! the option model, including `--help`, so clap's own help flag is off.

use std::path::PathBuf;

use clap::Parser;

use modconf::util::shell::{ColorChoice, Verbosity};

/// Configure a multi-module source tree for building
#[derive(Parser)]
#[command(name = "configure")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Source root (defaults to the current directory)
    #[arg(long, env = "CFG_SRC_DIR", hide = true)]
    pub src_dir: Option<PathBuf>,

    /// Echo every subprocess invocation
    #[arg(long, hide = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(long, hide = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, env = "CONFIGURE_COLOR", default_value = "auto", hide = true)]
    pub color: ColorChoice,

    /// Configure options, e.g. `--enable-debug` or `--prefix=/opt`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}
