//! Modules and the platform-dependent module set.
//!
//! Per-module special cases (a configure script in a nested directory, extra
//! arguments, autoconf regeneration) live in a declarative table rather than
//! in the configurator's control flow.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::platform::Platform;

/// Configure entry point used when a module has no override.
pub const DEFAULT_CONFIGURE_ENTRY: &str = "configure";

/// Modules configured on every platform.
pub const BASE_MODULES: &[&str] = &[
    "rust-azure",
    "rust-cairo",
    "rust-stb-image",
    "rust-geom",
    "rust-glut",
    "rust-layers",
    "rust-http-client",
    "libwapcaplet",
    "rust-wapcaplet",
    "libparserutils",
    "libhubbub",
    "rust-hubbub",
    "libcss",
    "rust-netsurfcss",
    "rust-css",
    "rust-opengles",
    "skia",
    "rust-harfbuzz",
    "mozjs",
    "rust-mozjs",
    "sharegl",
];

/// Modules prepended on Darwin.
pub const DARWIN_MODULES: &[&str] = &[
    "rust-core-foundation",
    "rust-core-graphics",
    "rust-core-text",
    "rust-io-surface",
    "rust-cocoa",
];

/// Modules prepended on Linux.
pub const LINUX_MODULES: &[&str] = &["rust-freetype", "rust-fontconfig", "rust-xlib"];

/// Special handling for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleOverride {
    /// Configure entry relative to the module's source directory.
    pub configure_entry: Option<PathBuf>,
    /// Arguments always passed to the module's configure.
    pub extra_args: Vec<String>,
    /// Regenerate the configure script with autoconf 2.13 first.
    pub autoconf: bool,
}

/// A module as scheduled for configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub configure_entry_override: Option<PathBuf>,
    pub extra_args: Vec<String>,
    pub autoconf: bool,
}

impl Module {
    /// A module with no special handling.
    pub fn plain(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            configure_entry_override: None,
            extra_args: Vec::new(),
            autoconf: false,
        }
    }

    /// Source directory of this module: `<src_dir>/src/<name>`.
    pub fn source_dir(&self, src_dir: &Path) -> PathBuf {
        src_dir.join("src").join(&self.name)
    }

    /// Build-output directory of this module: `<build_dir>/src/<name>`.
    pub fn build_dir(&self, build_dir: &Path) -> PathBuf {
        build_dir.join("src").join(&self.name)
    }

    /// Path of the configure entry point.
    pub fn configure_entry(&self, src_dir: &Path) -> PathBuf {
        let entry = self
            .configure_entry_override
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIGURE_ENTRY));
        self.source_dir(src_dir).join(entry)
    }
}

/// Module lists plus the per-module special-case table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTable {
    pub base: Vec<String>,
    pub darwin: Vec<String>,
    pub linux: Vec<String>,
    pub overrides: HashMap<String, ModuleOverride>,
}

impl Default for ModuleTable {
    fn default() -> Self {
        let mut overrides = HashMap::new();
        // The SpiderMonkey configure script lives in the js engine subtree.
        overrides.insert(
            "mozjs".to_string(),
            ModuleOverride {
                configure_entry: Some(PathBuf::from("js/src/configure")),
                extra_args: vec![
                    "--enable-threadsafe".to_string(),
                    "--enable-ctypes".to_string(),
                ],
                autoconf: true,
            },
        );
        overrides.insert(
            "skia".to_string(),
            ModuleOverride {
                configure_entry: Some(PathBuf::from("build/configure")),
                ..ModuleOverride::default()
            },
        );

        ModuleTable {
            base: to_owned(BASE_MODULES),
            darwin: to_owned(DARWIN_MODULES),
            linux: to_owned(LINUX_MODULES),
            overrides,
        }
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl ModuleTable {
    /// Modules prepended for `platform`.
    pub fn prefix(&self, platform: Platform) -> &[String] {
        match platform {
            Platform::Darwin => &self.darwin,
            Platform::Linux => &self.linux,
            Platform::FreeBsd | Platform::MinGw => &[],
        }
    }

    /// Look up the special handling for a module, if any.
    pub fn module(&self, name: &str) -> Module {
        match self.overrides.get(name) {
            Some(o) => Module {
                name: name.to_string(),
                configure_entry_override: o.configure_entry.clone(),
                extra_args: o.extra_args.clone(),
                autoconf: o.autoconf,
            },
            None => Module::plain(name),
        }
    }

    /// The ordered module set for `platform`: platform prefix, then the
    /// base list. A name listed twice is kept at its first position.
    pub fn module_set(&self, platform: Platform) -> Vec<Module> {
        let mut modules: Vec<Module> = Vec::new();
        for name in self.prefix(platform).iter().chain(self.base.iter()) {
            if modules.iter().any(|m| &m.name == name) {
                tracing::debug!("module {} listed twice, keeping first", name);
                continue;
            }
            modules.push(self.module(name));
        }
        modules
    }
}

/// The module set for `platform` using the built-in table.
pub fn build_module_set(platform: Platform) -> Vec<Module> {
    ModuleTable::default().module_set(platform)
}
