//! Filesystem utilities.
//!
//! The `*_if_changed` helpers compare content byte for byte and leave the
//! destination untouched (content and modification time) when nothing
//! differs. Destinations that do get replaced end up read-only.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
///
/// Returns `true` if the directory was created by this call.
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))?;
    Ok(true)
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Read a file's bytes, or `None` if it does not exist.
fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read file: {}", path.display())),
    }
}

/// Write `contents` to `path` unless the file already holds exactly that.
///
/// Returns `true` if a write happened.
pub fn write_if_changed(path: &Path, contents: &[u8]) -> Result<bool> {
    if read_existing(path)?.as_deref() == Some(contents) {
        tracing::debug!("leaving {} unchanged", path.display());
        return Ok(false);
    }

    if path.exists() {
        make_writable(path)?;
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    set_readonly(path)?;
    Ok(true)
}

/// Copy `src` over `dst` if their contents differ.
pub fn copy_if_changed(src: &Path, dst: &Path) -> Result<bool> {
    let contents =
        fs::read(src).with_context(|| format!("failed to read file: {}", src.display()))?;
    write_if_changed(dst, &contents)
}

/// Move `src` over `dst` if their contents differ; otherwise just drop `src`.
///
/// `src` is gone after a successful call.
pub fn move_if_changed(src: &Path, dst: &Path) -> Result<bool> {
    let contents =
        fs::read(src).with_context(|| format!("failed to read file: {}", src.display()))?;

    if read_existing(dst)?.as_deref() == Some(contents.as_slice()) {
        tracing::debug!("leaving {} unchanged", dst.display());
        fs::remove_file(src)
            .with_context(|| format!("failed to remove file: {}", src.display()))?;
        return Ok(false);
    }

    if dst.exists() {
        make_writable(dst)?;
    }
    fs::rename(src, dst).with_context(|| {
        format!("failed to move {} to {}", src.display(), dst.display())
    })?;
    set_readonly(dst)?;
    Ok(true)
}

/// Remove a file if it exists.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove file: {}", path.display())),
    }
}

/// Whether `path` is a regular file with an execute bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Create `path` if needed and bump its modification time.
pub fn touch(path: &Path) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open file: {}", path.display()))?;
    file.set_modified(SystemTime::now())
        .with_context(|| format!("failed to touch file: {}", path.display()))
}

/// Mark a file read-only ("generated, do not hand-edit").
pub fn set_readonly(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)
        .with_context(|| format!("failed to stat file: {}", path.display()))?
        .permissions();
    perms.set_readonly(true);
    fs::set_permissions(path, perms)
        .with_context(|| format!("failed to set permissions: {}", path.display()))
}

/// Give the owner write access back so a generated file can be replaced.
#[cfg(unix)]
pub fn make_writable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .with_context(|| format!("failed to stat file: {}", path.display()))?
        .permissions();
    perms.set_mode(perms.mode() | 0o200);
    fs::set_permissions(path, perms)
        .with_context(|| format!("failed to set permissions: {}", path.display()))
}

#[cfg(not(unix))]
pub fn make_writable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)
        .with_context(|| format!("failed to stat file: {}", path.display()))?
        .permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
        .with_context(|| format!("failed to set permissions: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn is_readonly(path: &Path) -> bool {
        fs::metadata(path).unwrap().permissions().readonly()
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("src").join("mozjs");

        assert!(ensure_dir(&dir).unwrap());
        fs::write(dir.join("keep"), "x").unwrap();
        assert!(!ensure_dir(&dir).unwrap());
        assert!(dir.join("keep").exists());
    }

    #[test]
    fn test_write_if_changed_skips_identical_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.mk");

        assert!(write_if_changed(&path, b"A ?= 1\n").unwrap());
        assert!(is_readonly(&path));
        assert!(!write_if_changed(&path, b"A ?= 1\n").unwrap());
        assert!(write_if_changed(&path, b"A ?= 2\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "A ?= 2\n");
        assert!(is_readonly(&path));
    }

    #[test]
    fn test_move_if_changed_drops_source_when_identical() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("config.tmp");
        let dst = tmp.path().join("config.mk");

        fs::write(&src, "A ?= 1\n").unwrap();
        assert!(move_if_changed(&src, &dst).unwrap());
        assert!(!src.exists());
        assert!(is_readonly(&dst));

        fs::write(&src, "A ?= 1\n").unwrap();
        assert!(!move_if_changed(&src, &dst).unwrap());
        assert!(!src.exists());

        fs::write(&src, "A ?= 3\n").unwrap();
        assert!(move_if_changed(&src, &dst).unwrap());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "A ?= 3\n");
    }

    #[test]
    fn test_copy_if_changed_keeps_source() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("Makefile.in");
        let dst = tmp.path().join("Makefile");
        fs::write(&src, "all:\n").unwrap();

        assert!(copy_if_changed(&src, &dst).unwrap());
        assert!(!copy_if_changed(&src, &dst).unwrap());
        assert!(src.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_is_executable_needs_an_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("configure");
        fs::write(&script, "#!/bin/sh\n").unwrap();

        fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&script));
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&script));
        assert!(!is_executable(tmp.path()));
        assert!(!is_executable(&tmp.path().join("absent")));
    }

    #[test]
    fn test_remove_file_if_exists_tolerates_missing() {
        let tmp = TempDir::new().unwrap();
        remove_file_if_exists(&tmp.path().join("absent")).unwrap();
    }
}
