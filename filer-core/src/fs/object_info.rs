//! `src/fs/object_info.rs`
//! ============================================================
//! Immutable per-entry metadata snapshot.
//!
//! A `DirectoryEntry` is built once per listing and never mutated. Entries
//! whose metadata could not be read are still produced, flagged
//! `accessible = false`, and render placeholder metadata.

// ------------------------------------------------------------
// Standard-library imports
// ------------------------------------------------------------

use std::ffi::OsStr;
use std::fs::{self, DirEntry, FileType, Metadata};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// ------------------------------------------------------------
// Third-party crate imports
// ------------------------------------------------------------

use bytesize::ByteSize;
use chrono::{DateTime, Local, TimeZone};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Placeholder rendered for metadata that could not be read.
pub const PLACEHOLDER: &str = "-";

/// Default timestamp format for the "Modified" column.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ------------------------------------------------------------
// EntryKind: what the entry (or its symlink target) is.
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

impl EntryKind {
    fn from_file_type(ftype: FileType) -> Self {
        if ftype.is_dir() {
            Self::Directory
        } else if ftype.is_file() {
            Self::File
        } else if ftype.is_symlink() {
            Self::Symlink
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory => write!(f, "Directory"),
            Self::File => write!(f, "File"),
            Self::Symlink => write!(f, "Symlink"),
            Self::Other => write!(f, "Other"),
        }
    }
}

// ------------------------------------------------------------
// DirectoryEntry: one node of a listing.
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    path: PathBuf,
    name: CompactString,
    size: u64,
    modified: Option<SystemTime>,
    kind: EntryKind,
    is_link: bool,
    accessible: bool,
}

impl DirectoryEntry {
    /// Entry with fully readable metadata. `size` is dropped for non-files.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, size: u64, modified: Option<SystemTime>) -> Self {
        let path = path.into();

        Self {
            name: name_of(&path),
            size: if kind == EntryKind::File { size } else { 0 },
            modified,
            kind,
            is_link: false,
            accessible: true,
            path,
        }
    }

    /// Entry whose metadata could not be read.
    #[must_use]
    pub fn inaccessible(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let path = path.into();

        Self {
            name: name_of(&path),
            size: 0,
            modified: None,
            kind,
            is_link: kind == EntryKind::Symlink,
            accessible: false,
            path,
        }
    }

    /// Build an entry from a `read_dir` item.
    ///
    /// Symlinks are followed so `kind` describes the target; a dangling link
    /// yields `kind = Symlink, accessible = false`. Any other metadata
    /// failure keeps the entry with `accessible = false`.
    #[must_use]
    pub fn from_dir_entry(entry: &DirEntry) -> Self {
        let path: PathBuf = entry.path();
        let link_type: Option<FileType> = entry.file_type().ok();

        if link_type.is_some_and(|t| t.is_symlink()) {
            return match fs::metadata(&path) {
                Ok(meta) => Self::from_meta(path, &meta).linked(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Dangling symlink");
                    Self::inaccessible(path, EntryKind::Symlink)
                }
            };
        }

        match entry.metadata() {
            Ok(meta) => Self::from_meta(path, &meta),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Metadata unavailable");
                let kind = link_type.map_or(EntryKind::Other, EntryKind::from_file_type);
                Self::inaccessible(path, kind)
            }
        }
    }

    /// Build an entry for a standalone path (symlinks followed).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => {
                let entry = Self::from_meta(path.to_path_buf(), &meta);
                let is_link = fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
                if is_link { entry.linked() } else { entry }
            }
            Err(_) => {
                let kind = fs::symlink_metadata(path)
                    .map_or(EntryKind::Other, |m| EntryKind::from_file_type(m.file_type()));
                Self::inaccessible(path.to_path_buf(), kind)
            }
        }
    }

    // Internal builder shared by both entry points.
    fn from_meta(path: PathBuf, meta: &Metadata) -> Self {
        let kind = EntryKind::from_file_type(meta.file_type());
        Self::new(path, kind, meta.len(), meta.modified().ok())
    }

    const fn linked(mut self) -> Self {
        self.is_link = true;
        self
    }

    // ------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Size in bytes; always 0 for anything but a readable file.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub const fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    #[must_use]
    pub const fn is_accessible(&self) -> bool {
        self.accessible
    }

    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// True when the entry itself is a symbolic link, whatever its target.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        self.is_link
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    // ------------------------------------------------------------
    // Display helpers
    // ------------------------------------------------------------

    /// "Type" column: upper-cased extension for files, kind name otherwise.
    #[must_use]
    pub fn type_label(&self) -> CompactString {
        match self.kind {
            EntryKind::File => self
                .path
                .extension()
                .and_then(OsStr::to_str)
                .filter(|ext| !ext.is_empty())
                .map_or_else(|| CompactString::const_new("File"), |ext| CompactString::new(ext.to_uppercase())),
            kind => CompactString::new(kind.to_string()),
        }
    }

    /// "Size" column.
    #[must_use]
    pub fn size_label(&self) -> String {
        match self.kind {
            EntryKind::Directory => "<DIR>".to_string(),
            EntryKind::File if self.accessible => ByteSize::b(self.size).to_string(),
            _ => PLACEHOLDER.to_string(),
        }
    }

    /// "Modified" column in local time.
    #[must_use]
    pub fn modified_label(&self, fmt: &str) -> String {
        let Some(modified) = self.modified else {
            return PLACEHOLDER.to_string();
        };

        let dur: Duration = modified
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0));

        Local
            .timestamp_opt(i64::try_from(dur.as_secs()).unwrap_or(i64::MAX), dur.subsec_nanos())
            .single()
            .map_or_else(|| PLACEHOLDER.to_string(), |dt: DateTime<Local>| dt.format(fmt).to_string())
    }
}

fn name_of(path: &Path) -> CompactString {
    path.file_name()
        .map_or_else(|| CompactString::new(path.to_string_lossy()), |n| CompactString::new(n.to_string_lossy()))
}
