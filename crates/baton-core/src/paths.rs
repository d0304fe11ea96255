use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const BATON_DIR: &str = ".baton";
pub const DOCS_DIR: &str = ".baton/docs";
pub const RUNS_DIR: &str = ".baton/runs";

pub const CONFIG_FILE: &str = ".baton/config.yaml";
pub const ISSUES_FILE: &str = ".baton/issues.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn baton_dir(root: &Path) -> PathBuf {
    root.join(BATON_DIR)
}

pub fn docs_dir(root: &Path) -> PathBuf {
    root.join(DOCS_DIR)
}

pub fn runs_dir(root: &Path) -> PathBuf {
    root.join(RUNS_DIR)
}

pub fn run_path(root: &Path, run_id: &str) -> PathBuf {
    runs_dir(root).join(format!("{run_id}.yaml"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn issues_path(root: &Path) -> PathBuf {
    root.join(ISSUES_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.baton/config.yaml")
        );
        assert_eq!(
            issues_path(root),
            PathBuf::from("/tmp/proj/.baton/issues.yaml")
        );
        assert_eq!(
            run_path(root, "abc123"),
            PathBuf::from("/tmp/proj/.baton/runs/abc123.yaml")
        );
        assert_eq!(docs_dir(root), PathBuf::from("/tmp/proj/.baton/docs"));
    }
}
