//! High-level operations.
//!
//! This module contains the configure pipeline and the steps it drives.

pub mod configure;
pub mod modules;
pub mod submodules;

pub use configure::{
    configure, declare_options, ConfigureOptions, ConfigureOutcome, ConfigureSummary,
};
pub use modules::{run_autoconf, FailurePolicy, ModuleConfigurator, ModuleOutcome, ModuleReport};
pub use submodules::update_submodules;
