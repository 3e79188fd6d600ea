//! Upward directory searches used to locate project roots.

use std::path::{Path, PathBuf};

fn start_dir(path: &Path) -> &Path {
    if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    }
}

/// Nearest ancestor directory (starting at `path` itself when it is a
/// directory) that contains any of `markers`. The filesystem root is never
/// a candidate.
pub fn find_upwards(path: &Path, markers: &[&str]) -> Option<PathBuf> {
    start_dir(path)
        .ancestors()
        .take_while(|dir| dir.parent().is_some())
        .find(|dir| markers.iter().any(|m| dir.join(m).exists()))
        .map(Path::to_path_buf)
}

pub fn find_git_root(path: &Path) -> Option<PathBuf> {
    find_upwards(path, &[".git"])
}

/// Python project root: `pyproject.toml`, `setup.py` or `setup.cfg`.
pub fn find_python_root(path: &Path) -> Option<PathBuf> {
    find_upwards(path, &["pyproject.toml", "setup.py", "setup.cfg"])
}

pub fn has_extension(path: &str, extensions: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}
