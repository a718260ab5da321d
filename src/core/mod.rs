//! Core data structures for modconf.
//!
//! This module contains the foundational types of a configure run:
//! - Settings and the option model that resolves them
//! - Platform and CPU classification
//! - Modules and the platform-dependent module set
//! - The configuration store and its persisted artifact

pub mod error;
pub mod module;
pub mod options;
pub mod platform;
pub mod setting;
pub mod store;

pub use error::ConfigureError;
pub use module::{build_module_set, Module, ModuleOverride, ModuleTable};
pub use options::{OptionModel, ResolvedSettings};
pub use platform::{CpuType, Platform};
pub use setting::{Setting, SettingKind, SettingName, SettingValue};
pub use store::ConfigurationStore;
