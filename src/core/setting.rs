//! Typed settings resolved from the command line.

use std::fmt;

use crate::core::error::ConfigureError;

/// A validated setting name such as `optimize-cxx`.
///
/// Names are case-normalized to lower case and may only contain ASCII
/// letters, digits and `-`, so the derived flag and variable names are
/// always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettingName(String);

impl SettingName {
    /// Validate and normalize a setting name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ConfigureError> {
        let name = name.as_ref().to_ascii_lowercase();
        let valid = !name.is_empty()
            && !name.starts_with('-')
            && !name.ends_with('-')
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(ConfigureError::InvalidSettingName(name));
        }
        Ok(SettingName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The upper-case, underscore-separated form used in variable names.
    ///
    /// `local-rust-root` becomes `LOCAL_RUST_ROOT`.
    pub fn upper(&self) -> String {
        self.0.to_ascii_uppercase().replace('-', "_")
    }
}

impl fmt::Display for SettingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a setting is a toggle or carries a string payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKind {
    /// An on/off toggle. Only the flag that flips the default is recognized.
    Boolean { default_enabled: bool },
    /// A `--name=value` setting.
    Valued { default_value: String },
}

/// A declared setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: SettingName,
    pub kind: SettingKind,
    pub description: String,
}

impl Setting {
    /// The command-line flag recognized for this setting, without the
    /// leading `--`.
    ///
    /// Booleans that default to off answer to `enable-<name>`, booleans that
    /// default to on answer to `disable-<name>`, valued settings use their
    /// bare name.
    pub fn flag(&self) -> String {
        match &self.kind {
            SettingKind::Boolean { default_enabled } => {
                format!("{}-{}", flag_polarity(*default_enabled), self.name)
            }
            SettingKind::Valued { .. } => self.name.to_string(),
        }
    }

    /// The configuration variable this setting is persisted under.
    ///
    /// `CFG_DISABLE_OPTIMIZE`, `CFG_ENABLE_CLANG`, `CFG_PREFIX`.
    pub fn var_name(&self) -> String {
        match &self.kind {
            SettingKind::Boolean { default_enabled } => format!(
                "CFG_{}_{}",
                flag_polarity(*default_enabled).to_ascii_uppercase(),
                self.name.upper()
            ),
            SettingKind::Valued { .. } => format!("CFG_{}", self.name.upper()),
        }
    }
}

fn flag_polarity(default_enabled: bool) -> &'static str {
    if default_enabled {
        "disable"
    } else {
        "enable"
    }
}

/// The resolved value of one setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    /// `overridden` is true when the flag flipping the default was given.
    Boolean { enabled: bool, overridden: bool },
    Valued(String),
}

impl SettingValue {
    /// The value written to the configuration store.
    ///
    /// Booleans store `1` when their flag was given and nothing otherwise.
    pub fn stored(&self) -> String {
        match self {
            SettingValue::Boolean { overridden, .. } => {
                if *overridden {
                    "1".to_string()
                } else {
                    String::new()
                }
            }
            SettingValue::Valued(value) => value.clone(),
        }
    }
}
