use baton_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the project root every subcommand operates on.
///
/// An explicit `--root` flag or `BATON_ROOT` env var wins outright. Otherwise
/// the closest ancestor of the working directory carrying a `.baton/` marker
/// is used, then the closest carrying `.git/`, then the working directory
/// itself.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    for marker in [paths::BATON_DIR, ".git"] {
        if let Some(found) = find_upward(&cwd, marker) {
            return found;
        }
    }
    cwd
}

fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(marker).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
