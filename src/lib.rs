//! modconf - the configure step for a multi-module native project
//!
//! This crate resolves command-line settings, probes the build toolchain,
//! classifies the host, configures every module of the source tree and
//! persists the result as a change-detecting `config.mk`.

pub mod core;
pub mod ops;
pub mod toolchain;
pub mod util;

/// Test utilities and mocks for modconf unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted process runner and source-tree
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{ConfigurationStore, ConfigureError, Module, OptionModel, Platform};
pub use ops::{configure, ConfigureOptions, ConfigureOutcome};
pub use util::Shell;
