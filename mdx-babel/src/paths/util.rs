use pathdiff::diff_paths;
use std::path::{Component, Path, PathBuf};

/// `path` relative to `document_dir`, with forward slashes and an explicit `./` for
/// paths that would otherwise read as bare names.
pub(crate) fn normalize_path(path: &Path, document_dir: Option<&Path>) -> String {
    let candidate = if let Some(base) = document_dir {
        diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
    } else {
        path.to_path_buf()
    };

    let converted = to_forward_slashes(&candidate);
    if converted.starts_with("./")
        || converted.starts_with("../")
        || converted.starts_with('/')
        || converted.contains(':')
    {
        converted
    } else {
        format!("./{converted}")
    }
}

pub(crate) fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolves `.` and `..` components without touching the filesystem.
pub(crate) fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

/// Absolute, lexically cleaned form of `path`; relative paths are taken against the
/// working directory.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return clean_path(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => clean_path(&cwd.join(path)),
        Err(_) => clean_path(path),
    }
}
