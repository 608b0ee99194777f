use std::path::{Path, PathBuf};

/// Absolute contest root: absolute values are taken as-is, empty or `.`
/// means the root itself, anything else is relative to the root.
pub fn resolve_contest_base_path(root: &Path, contest_base_dir: &str) -> PathBuf {
    let normalized = contest_base_dir.trim();
    if Path::new(normalized).is_absolute() {
        return PathBuf::from(normalized);
    }
    if normalized.is_empty() || normalized == "." {
        return root.to_path_buf();
    }
    root.join(normalized)
}

pub fn resolve_task_dir(
    root: &Path,
    contest_base_dir: &str,
    contest_id: &str,
    task_id: &str,
) -> PathBuf {
    resolve_contest_base_path(root, contest_base_dir)
        .join(contest_id)
        .join(task_id)
}

pub fn resolve_tests_dir(
    root: &Path,
    contest_base_dir: &str,
    contest_id: &str,
    task_id: &str,
    tests_dir: &str,
) -> PathBuf {
    resolve_task_dir(root, contest_base_dir, contest_id, task_id).join(tests_dir)
}

/// `path` relative to `base` when it lives underneath it, otherwise `path`.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
