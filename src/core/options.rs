//! The option model: declared settings resolved against raw arguments.
//!
//! Settings are declared up front, then either resolved once against the
//! argument list or rendered as a help listing. Unrecognized arguments are
//! ignored so newer invocations keep working with older option sets.

use std::fmt::Write;

use crate::core::error::ConfigureError;
use crate::core::setting::{Setting, SettingKind, SettingName, SettingValue};
use crate::core::store::ConfigurationStore;

/// The argument that switches to help mode.
pub const HELP_FLAG: &str = "--help";

/// The set of recognized settings, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct OptionModel {
    settings: Vec<Setting>,
}

impl OptionModel {
    pub fn new() -> Self {
        OptionModel::default()
    }

    /// Declare an on/off toggle.
    pub fn declare_boolean(
        &mut self,
        name: &str,
        default_enabled: bool,
        description: &str,
    ) -> Result<&mut Self, ConfigureError> {
        self.declare(name, SettingKind::Boolean { default_enabled }, description)
    }

    /// Declare a `--name=value` setting.
    pub fn declare_valued(
        &mut self,
        name: &str,
        default_value: &str,
        description: &str,
    ) -> Result<&mut Self, ConfigureError> {
        self.declare(
            name,
            SettingKind::Valued {
                default_value: default_value.to_string(),
            },
            description,
        )
    }

    fn declare(
        &mut self,
        name: &str,
        kind: SettingKind,
        description: &str,
    ) -> Result<&mut Self, ConfigureError> {
        let name = SettingName::new(name)?;
        if self.settings.iter().any(|s| s.name == name) {
            return Err(ConfigureError::DuplicateSetting(name.to_string()));
        }
        self.settings.push(Setting {
            name,
            kind,
            description: description.to_string(),
        });
        Ok(self)
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// Whether the arguments ask for help instead of resolution.
    pub fn is_help_requested<S: AsRef<str>>(raw_args: &[S]) -> bool {
        raw_args.iter().any(|a| a.as_ref() == HELP_FLAG)
    }

    /// Resolve every declared setting against `raw_args`.
    ///
    /// Booleans only react to the exact flag that flips their default.
    /// Valued settings take the last `--name=value` occurrence.
    pub fn resolve<S: AsRef<str>>(&self, raw_args: &[S]) -> ResolvedSettings {
        let values = self
            .settings
            .iter()
            .map(|setting| {
                let value = match &setting.kind {
                    SettingKind::Boolean { default_enabled } => {
                        let flag = format!("--{}", setting.flag());
                        let overridden = raw_args.iter().any(|a| a.as_ref() == flag);
                        SettingValue::Boolean {
                            enabled: *default_enabled != overridden,
                            overridden,
                        }
                    }
                    SettingKind::Valued { default_value } => {
                        let prefix = format!("--{}=", setting.name);
                        let given = raw_args
                            .iter()
                            .filter_map(|a| a.as_ref().strip_prefix(prefix.as_str()))
                            .last();
                        SettingValue::Valued(given.unwrap_or(default_value.as_str()).to_string())
                    }
                };
                tracing::debug!("resolved setting {} = {:?}", setting.name, value);
                (setting.clone(), value)
            })
            .collect();

        ResolvedSettings { values }
    }

    /// Render the usage listing shown for `--help`.
    pub fn render_help(&self, program: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "Usage: {} [options]", program);
        let _ = writeln!(out);
        let _ = writeln!(out, "Options:");
        let _ = writeln!(out);
        for setting in &self.settings {
            let (flag, doc) = match &setting.kind {
                SettingKind::Boolean { default_enabled } => {
                    let doc = if *default_enabled {
                        format!("don't {}", setting.description)
                    } else {
                        setting.description.clone()
                    };
                    (setting.flag(), doc)
                }
                SettingKind::Valued { default_value } => (
                    format!("{}=<value>", setting.flag()),
                    format!("{} [{}]", setting.description, default_value),
                ),
            };
            let _ = writeln!(out, "    --{:<30} {}", flag, doc);
        }
        let _ = writeln!(out);
        out
    }
}

/// Settings after resolution. Immutable for the rest of the run.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    values: Vec<(Setting, SettingValue)>,
}

impl ResolvedSettings {
    fn find(&self, name: &str) -> Option<&SettingValue> {
        self.values
            .iter()
            .find(|(s, _)| s.name.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Effective state of a boolean setting. Unknown or valued names are off.
    pub fn enabled(&self, name: &str) -> bool {
        matches!(self.find(name), Some(SettingValue::Boolean { enabled: true, .. }))
    }

    /// Value of a valued setting. Unknown or boolean names are empty.
    pub fn value(&self, name: &str) -> &str {
        match self.find(name) {
            Some(SettingValue::Valued(v)) => v,
            _ => "",
        }
    }

    /// Append every setting to the store under its variable name.
    pub fn record(&self, store: &mut ConfigurationStore) {
        for (setting, value) in &self.values {
            store.put(setting.var_name(), value.stored());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::util::shell::{Shell, Verbosity};

    fn model() -> OptionModel {
        let mut model = OptionModel::new();
        model
            .declare_boolean("optimize", true, "build optimized rust code")
            .unwrap()
            .declare_boolean("clang", false, "use clang instead of gcc")
            .unwrap()
            .declare_valued("local-rust-root", "", "set prefix for local rust binary")
            .unwrap()
            .declare_valued("prefix", "/usr/local", "set installation prefix")
            .unwrap();
        model
    }

    #[test]
    fn test_defaults_without_arguments() {
        let resolved = model().resolve::<&str>(&[]);
        assert!(resolved.enabled("optimize"));
        assert!(!resolved.enabled("clang"));
        assert_eq!(resolved.value("local-rust-root"), "");
        assert_eq!(resolved.value("prefix"), "/usr/local");
    }

    #[test]
    fn test_boolean_flags_flip_defaults() {
        let resolved = model().resolve(&["--disable-optimize", "--enable-clang"]);
        assert!(!resolved.enabled("optimize"));
        assert!(resolved.enabled("clang"));
    }

    #[test]
    fn test_flag_of_wrong_polarity_is_ignored() {
        let resolved = model().resolve(&["--enable-optimize", "--disable-clang"]);
        assert!(resolved.enabled("optimize"));
        assert!(!resolved.enabled("clang"));
    }

    #[test]
    fn test_unrecognized_arguments_change_nothing() {
        let plain = model().resolve::<&str>(&[]);
        let noisy = model().resolve(&["--enable-frobnicate", "--bogus=1", "stray", "--prefix"]);
        assert_eq!(plain.values.len(), noisy.values.len());
        for ((_, a), (_, b)) in plain.values.iter().zip(&noisy.values) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_last_valued_occurrence_wins() {
        let resolved = model().resolve(&["--prefix=/opt/a", "--prefix=/opt/b"]);
        assert_eq!(resolved.value("prefix"), "/opt/b");
    }

    #[test]
    fn test_valued_keeps_embedded_equals() {
        let resolved = model().resolve(&["--local-rust-root=/opt/rust=nightly"]);
        assert_eq!(resolved.value("local-rust-root"), "/opt/rust=nightly");
    }

    #[test]
    fn test_duplicate_declaration_is_rejected() {
        let mut model = model();
        let err = model.declare_valued("Prefix", "", "again").unwrap_err();
        assert!(matches!(err, ConfigureError::DuplicateSetting(name) if name == "prefix"));
    }

    #[test]
    fn test_help_detection() {
        assert!(OptionModel::is_help_requested(&["--enable-clang", "--help"]));
        assert!(!OptionModel::is_help_requested(&["--helpful"]));
    }

    #[test]
    fn test_render_help_lists_flags_and_defaults() {
        let help = model().render_help("configure");
        assert!(help.contains("Usage: configure [options]"));
        assert!(help.contains("--disable-optimize"));
        assert!(help.contains("don't build optimized rust code"));
        assert!(help.contains("--enable-clang"));
        assert!(help.contains("--prefix=<value>"));
        assert!(help.contains("set installation prefix [/usr/local]"));
    }

    #[test]
    fn test_record_appends_every_setting_in_order() {
        let shell = Arc::new(Shell::buffered(Verbosity::Normal));
        let mut store = ConfigurationStore::new(shell);
        model()
            .resolve(&["--enable-clang", "--prefix=/opt"])
            .record(&mut store);

        assert_eq!(
            store.render(),
            "CFG_DISABLE_OPTIMIZE ?= \n\
             CFG_ENABLE_CLANG ?= 1\n\
             CFG_LOCAL_RUST_ROOT ?= \n\
             CFG_PREFIX ?= /opt\n\n"
        );
    }
}
