//! Version-string scraping.

use std::sync::LazyLock;

use regex::Regex;

/// Optional `v`/`V`, a digit, then digits and dots, then any non-space tail.
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[vV]?[0-9][0-9.]*[^\s]*").expect("valid version regex"));

/// Clang releases the alternate-compiler mode accepts. A trailing `*`
/// accepts any version starting with the rest of the pattern.
pub const ACCEPTED_CLANG_VERSIONS: &[&str] =
    &["3.0svn", "3.0", "3.1*", "3.2*", "4.0*", "4.1*", "4.2*"];

/// Extract a version from `--version` output.
///
/// Only the first line is considered. Returns `None` when the output is
/// empty or holds nothing that looks like a version.
pub fn extract_version(text: &str) -> Option<String> {
    let first = text.lines().next()?;
    VERSION_RE.find(first).map(|m| m.as_str().to_string())
}

/// Whether `version` matches one of [`ACCEPTED_CLANG_VERSIONS`].
pub fn is_accepted_clang_version(version: &str) -> bool {
    ACCEPTED_CLANG_VERSIONS
        .iter()
        .any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => version.starts_with(prefix),
            None => version == *pattern,
        })
}
