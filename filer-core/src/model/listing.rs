//! ``src/model/listing.rs``
//!
//! Ordered, immutable snapshot of one directory.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    fs::object_info::DirectoryEntry,
    model::sort::{self, SortDirection, SortKey},
};

/// Directory/file counts for a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingSummary {
    pub directories: usize,
    pub files: usize,
}

impl std::fmt::Display for ListingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} directories, {} files", self.directories, self.files)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    path: PathBuf,
    entries: Vec<DirectoryEntry>,
    sort_key: SortKey,
    direction: SortDirection,

    /// Entry path to its position in `entries`.
    index: HashMap<PathBuf, usize>,
}

impl Listing {
    /// Build a listing, ordering `entries` with the given sort settings.
    #[must_use]
    pub fn new(path: PathBuf, entries: Vec<DirectoryEntry>, sort_key: SortKey, direction: SortDirection) -> Self {
        let entries = sort::sorted(entries, sort_key, direction);

        Self {
            index: index_of(&entries),
            path,
            entries,
            sort_key,
            direction,
        }
    }

    /// Listing of a directory that has not been read yet.
    #[must_use]
    pub fn empty(path: PathBuf) -> Self {
        Self::new(path, Vec::new(), SortKey::default(), SortDirection::default())
    }

    /// Same entries in a new order. Consumes `self`: listings are never
    /// reordered behind a reader's back.
    #[must_use]
    pub fn resorted(self, sort_key: SortKey, direction: SortDirection) -> Self {
        Self::new(self.path, self.entries, sort_key, direction)
    }

    /// Drop entries rejected by `keep`, preserving order.
    #[must_use]
    pub fn retain(mut self, keep: impl FnMut(&DirectoryEntry) -> bool) -> Self {
        self.entries.retain(keep);
        self.index = index_of(&self.entries);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(DirectoryEntry::path)
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&DirectoryEntry> {
        self.index.get(path).map(|&i| &self.entries[i])
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    #[must_use]
    pub fn summary(&self) -> ListingSummary {
        let directories = self.entries.iter().filter(|e| e.is_dir()).count();

        ListingSummary {
            directories,
            files: self.entries.len() - directories,
        }
    }
}

fn index_of(entries: &[DirectoryEntry]) -> HashMap<PathBuf, usize> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.path().to_path_buf(), i))
        .collect()
}
