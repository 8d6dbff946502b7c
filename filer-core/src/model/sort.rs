//! ``src/model/sort.rs``
//! ============================================================================
//! # Sort policy for directory listings
//!
//! Pure projection over already-fetched entries; never touches the disk.
//!
//! - `Name` / `Kind`: directories first, independent of direction.
//! - `Size` / `ModifiedTime`: kind ignored, raw value drives the order.
//! - Inaccessible entries trail accessible ones inside their kind bucket.
//! - Direction flips the primary comparison only; the tie-break chain
//!   (case-insensitive name, case-sensitive name, path) is always ascending.

use std::{cmp::Ordering, time::UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::fs::object_info::{DirectoryEntry, EntryKind};

/// Column a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    Size,
    Kind,
    ModifiedTime,
}

impl SortKey {
    /// Keys whose order is driven by a raw value rather than the kind bucket.
    #[must_use]
    pub const fn ignores_kind(self) -> bool {
        matches!(self, Self::Size | Self::ModifiedTime)
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &'_ str = match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Kind => "kind",
            Self::ModifiedTime => "modified",
        };

        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    const fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

/// Sort `entries` in place.
pub fn sort_entries(entries: &mut [DirectoryEntry], key: SortKey, direction: SortDirection) {
    entries.sort_by(|a: &DirectoryEntry, b: &DirectoryEntry| -> Ordering { compare(a, b, key, direction) });
}

/// Owned variant of [`sort_entries`].
#[must_use]
pub fn sorted(mut entries: Vec<DirectoryEntry>, key: SortKey, direction: SortDirection) -> Vec<DirectoryEntry> {
    sort_entries(&mut entries, key, direction);
    entries
}

/// Total order used by the sort engine.
#[must_use]
pub fn compare(a: &DirectoryEntry, b: &DirectoryEntry, key: SortKey, direction: SortDirection) -> Ordering {
    bucket(a, key)
        .cmp(&bucket(b, key))
        .then_with(|| b.is_accessible().cmp(&a.is_accessible()))
        .then_with(|| direction.apply(primary(a, b, key)))
        .then_with(|| tie_break(a, b))
}

// Directories lead for Name/Kind; Size/ModifiedTime share a single bucket.
const fn bucket(e: &DirectoryEntry, key: SortKey) -> u8 {
    if key.ignores_kind() || e.is_dir() { 0 } else { 1 }
}

const fn kind_rank(kind: EntryKind) -> u8 {
    match kind {
        EntryKind::Directory => 0,
        EntryKind::File => 1,
        EntryKind::Symlink => 2,
        EntryKind::Other => 3,
    }
}

fn primary(a: &DirectoryEntry, b: &DirectoryEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => cmp_name_insensitive(a, b),
        SortKey::Size => a.size().cmp(&b.size()),
        SortKey::Kind => kind_rank(a.kind())
            .cmp(&kind_rank(b.kind()))
            .then_with(|| a.type_label().to_lowercase().cmp(&b.type_label().to_lowercase())),
        SortKey::ModifiedTime => a
            .modified()
            .unwrap_or(UNIX_EPOCH)
            .cmp(&b.modified().unwrap_or(UNIX_EPOCH)),
    }
}

fn cmp_name_insensitive(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    let left = a.name().chars().flat_map(char::to_lowercase);
    let right = b.name().chars().flat_map(char::to_lowercase);
    left.cmp(right)
}

fn tie_break(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    cmp_name_insensitive(a, b)
        .then_with(|| a.name().cmp(b.name()))
        .then_with(|| a.path().cmp(b.path()))
}
