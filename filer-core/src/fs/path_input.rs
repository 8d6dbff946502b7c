//! ``src/fs/path_input.rs``
//!
//! Turn text typed into a path bar into an absolute path.

use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;

use crate::error::{CoreError, CoreResult};

/// The user's home directory, if the platform reports one.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Root of the filesystem `path` lives on (`/` on Unix, the drive prefix
/// plus separator on Windows).
#[must_use]
pub fn root_of(path: &Path) -> PathBuf {
    path.ancestors()
        .last()
        .map_or_else(|| PathBuf::from(std::path::MAIN_SEPARATOR_STR), Path::to_path_buf)
}

/// Resolve `text` against `base`.
///
/// Leading `~` expands to the home directory, relative input is joined to
/// `base`, and `.`/`..` are folded lexically. No filesystem access.
///
/// # Errors
/// `InvalidInput` for empty input or when `~` is used without a home
/// directory.
pub fn resolve_input_path(text: &str, base: &Path) -> CoreResult<PathBuf> {
    let text = text.trim();

    if text.is_empty() {
        return Err(CoreError::invalid_input("path", "empty path"));
    }

    let raw: PathBuf = match text.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => {
            let home = home_dir().ok_or_else(|| CoreError::invalid_input("path", "home directory unknown"))?;
            home.join(rest.trim_start_matches(['/', '\\']))
        }
        _ => PathBuf::from(text),
    };

    let joined = if raw.is_absolute() { raw } else { base.join(raw) };
    Ok(normalize(&joined))
}

/// Fold `.` and `..` lexically without climbing above the root.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never climb above the root.
                if out.parent().is_some() {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}
