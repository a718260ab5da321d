//! Project configuration file support.
//!
//! A source tree may carry a `configure.toml` at its root to adjust the
//! module lists and the per-module special cases without touching code:
//!
//! ```toml
//! [modules]
//! linux = ["rust-freetype", "rust-fontconfig", "rust-xlib", "rust-egl"]
//!
//! [modules.overrides.mozjs]
//! configure = "js/src/configure"
//! args = ["--enable-threadsafe"]
//! autoconf = true
//! ```
//!
//! Lists given in the file replace the built-in ones; overrides are merged
//! per module on top of the built-in table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::module::{ModuleOverride, ModuleTable};
use crate::util::fs::read_to_string;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "configure.toml";

/// Project configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Module set settings
    pub modules: ModulesConfig,
}

/// `[modules]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Replacement for the base module list
    pub base: Option<Vec<String>>,

    /// Replacement for the Darwin prefix
    pub darwin: Option<Vec<String>>,

    /// Replacement for the Linux prefix
    pub linux: Option<Vec<String>>,

    /// Per-module special cases
    pub overrides: HashMap<String, OverrideConfig>,
}

/// `[modules.overrides.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OverrideConfig {
    /// Configure entry relative to the module directory
    pub configure: Option<PathBuf>,

    /// Extra configure arguments
    pub args: Option<Vec<String>>,

    /// Regenerate configure with autoconf 2.13
    pub autoconf: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration, falling back to defaults only if the file
    /// doesn't exist. A file that exists but cannot be read or parsed is an
    /// error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("no {}, using built-in module table", path.display());
            Ok(Self::default())
        }
    }

    /// Apply this configuration on top of `table`.
    pub fn apply(&self, table: &mut ModuleTable) {
        let modules = &self.modules;
        if let Some(base) = &modules.base {
            table.base = base.clone();
        }
        if let Some(darwin) = &modules.darwin {
            table.darwin = darwin.clone();
        }
        if let Some(linux) = &modules.linux {
            table.linux = linux.clone();
        }

        for (name, o) in &modules.overrides {
            let entry = table
                .overrides
                .entry(name.clone())
                .or_insert_with(ModuleOverride::default);
            if o.configure.is_some() {
                entry.configure_entry = o.configure.clone();
            }
            if let Some(args) = &o.args {
                entry.extra_args = args.clone();
            }
            if let Some(autoconf) = o.autoconf {
                entry.autoconf = autoconf;
            }
        }
    }

    /// Build the module table for this configuration.
    pub fn module_table(&self) -> ModuleTable {
        let mut table = ModuleTable::default();
        self.apply(&mut table);
        table
    }
}

/// Path of the project configuration file in a source tree.
pub fn config_path(src_dir: &Path) -> PathBuf {
    src_dir.join(CONFIG_FILE_NAME)
}

/// Load the module table for a source tree.
pub fn load_module_table(src_dir: &Path) -> Result<ModuleTable> {
    Ok(Config::load_or_default(&config_path(src_dir))?.module_table())
}
