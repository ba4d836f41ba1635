// src/config/paths.rs

//! Path containment checks used by config validation.

use std::path::{Component, Path, PathBuf};

/// Does `path` point into `root` (or equal it)?
///
/// This is intentionally lenient about representation:
/// - First we try a direct component-wise prefix match.
/// - If that fails (e.g. `"logs"` against the default watch path `"."`, or
///   a relative/absolute mix), both paths are anchored at the current
///   working directory and compared lexically, with `.` and `..` resolved.
///
/// Neither path has to exist, so log directories can be checked before
/// anything creates them. Symlinks are not followed.
pub fn is_inside(root: &Path, path: &Path) -> bool {
    // Fast path: same representation, plain prefix match.
    if path.starts_with(root) {
        return true;
    }

    // Robust path: give both the same anchor, then compare lexically.
    let Ok(cwd) = std::env::current_dir() else {
        return false;
    };
    lexical_absolute(&cwd, path).starts_with(lexical_absolute(&cwd, root))
}

/// Anchor `path` at `base` when it is relative, then resolve `.` and `..`
/// components without touching the filesystem.
fn lexical_absolute(base: &Path, path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in base.join(path).components() {
        match component {
            Component::CurDir => {}
            // `..` at the filesystem root stays at the root.
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
