//! Test fixtures for source and build trees.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A throwaway source tree plus a separate build directory.
pub struct SourceTree {
    _tmp: TempDir,
    src: PathBuf,
    build: PathBuf,
}

impl SourceTree {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let src = tmp.path().join("src-root");
        let build = tmp.path().join("build-root");
        fs::create_dir_all(&src).expect("create source dir");
        fs::create_dir_all(&build).expect("create build dir");
        SourceTree {
            _tmp: tmp,
            src,
            build,
        }
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    pub fn build(&self) -> &Path {
        &self.build
    }

    /// Write a file relative to the source root.
    pub fn add_file(&self, rel: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.src.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Give a module an executable configure entry at `entry` under
    /// `src/<module>`. Run for real, it leaves `configured-here` in its
    /// working directory.
    pub fn add_configure(&self, module: &str, entry: &str) -> PathBuf {
        let path = self.add_file(
            Path::new("src").join(module).join(entry),
            "#!/bin/sh\n: > configured-here\n",
        );
        make_executable(&path);
        path
    }

    /// Create an empty module directory under `src/<module>`.
    pub fn add_module_dir(&self, module: &str) -> PathBuf {
        let dir = self.src.join("src").join(module);
        fs::create_dir_all(&dir).expect("create module dir");
        dir
    }

    /// Read a file relative to the build root.
    pub fn read_build(&self, rel: impl AsRef<Path>) -> String {
        fs::read_to_string(self.build.join(rel)).expect("read build file")
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod fixture script");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

impl Default for SourceTree {
    fn default() -> Self {
        SourceTree::new()
    }
}
