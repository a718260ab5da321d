//! The configuration store and its persisted artifact.
//!
//! The store is an insertion-ordered list of `NAME ?= VALUE` entries. Every
//! `put` echoes a status line right away; persisting renders the entries in
//! the same order, so identical inputs always produce identical bytes.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::util::fs::{move_if_changed, remove_file_if_exists, write_if_changed};
use crate::util::Shell;

/// Values longer than this are elided in status output (never in the artifact).
pub const DISPLAY_LIMIT: usize = 35;

/// Shorten a value for display.
pub fn display_value(value: &str) -> String {
    if value.chars().count() > DISPLAY_LIMIT {
        let head: String = value.chars().take(DISPLAY_LIMIT).collect();
        format!("{} ...", head)
    } else {
        value.to_string()
    }
}

/// Ordered mapping from configuration variable to its final value.
#[derive(Debug)]
pub struct ConfigurationStore {
    entries: Vec<(String, String)>,
    shell: Arc<Shell>,
}

impl ConfigurationStore {
    pub fn new(shell: Arc<Shell>) -> Self {
        ConfigurationStore {
            entries: Vec::new(),
            shell,
        }
    }

    /// Store a value and echo it.
    ///
    /// Overwriting an existing name keeps its original position.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.put_with_note(name, value, None);
    }

    /// Store a value and echo it with a trailing note, e.g. a tool version.
    pub fn put_with_note(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        note: Option<&str>,
    ) {
        let name = name.into();
        let value = value.into();

        let mut line = format!("{:<20} := {}", name, display_value(&value));
        if let Some(note) = note.filter(|n| !n.is_empty()) {
            line.push_str(&format!(" ({})", note));
        }
        self.shell.note(line);

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the artifact: one `NAME ?= VALUE` line per entry, followed by
    /// a blank line so the file can be concatenated with other fragments.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.entries {
            out.push_str(name);
            out.push_str(" ?= ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// Write the artifact to `path` unless it already has identical content.
    ///
    /// Returns `true` if the file was (re)written; it is read-only afterwards.
    pub fn persist(&self, path: &Path) -> Result<bool> {
        let changed = write_if_changed(path, self.render().as_bytes())?;
        self.report(path, changed);
        Ok(changed)
    }

    /// Render into `tmp_path`, then move it over `final_path` only if the
    /// content differs. The temporary file is gone afterwards either way.
    pub fn commit(&self, tmp_path: &Path, final_path: &Path) -> Result<bool> {
        std::fs::write(tmp_path, self.render())
            .with_context(|| format!("failed to write file: {}", tmp_path.display()))?;
        let changed = match move_if_changed(tmp_path, final_path) {
            Ok(changed) => changed,
            Err(e) => {
                if let Err(cleanup) = remove_file_if_exists(tmp_path) {
                    tracing::debug!("{:#}", cleanup);
                }
                return Err(e);
            }
        };
        self.report(final_path, changed);
        Ok(changed)
    }

    fn report(&self, path: &Path, changed: bool) {
        if changed {
            self.shell.note(format!("wrote {}", path.display()));
        } else {
            self.shell.note(format!("leaving {} unchanged", path.display()));
        }
    }
}
