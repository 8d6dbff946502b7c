//! ``src/fs/dir_scanner.rs``
//!
//! # `FilesystemProvider`: Directory Listing over the OS
//!
//! Blocking, uncached directory reads. Callers run [`FilesystemProvider::list`]
//! off the render thread (see `fs::listing_task`). A directory that can be
//! opened always yields a listing: entries whose metadata fails are kept and
//! flagged inaccessible rather than failing the whole call.

use std::{
    fs::{self, Metadata, ReadDir},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use tracing::{debug, warn};

use crate::{
    error::{CoreError, CoreResult},
    fs::{object_info::DirectoryEntry, path_input::normalize},
    model::{
        listing::Listing,
        sort::{SortDirection, SortKey},
    },
};

/// Abstraction over the OS used by panes.
pub trait FilesystemProvider: Send + Sync {
    /// Read `path` and return a fresh snapshot ordered by name.
    ///
    /// # Errors
    /// `NotFound`, `PermissionDenied` or `NotADirectory` for the directory
    /// itself; other I/O failures as `CoreError::Io`.
    fn list(&self, path: &Path) -> CoreResult<Listing>;

    /// Parent of `path`, or `None` at the platform root.
    fn parent(&self, path: &Path) -> Option<PathBuf> {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}

/// Provider backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn open(dir: &Path) -> CoreResult<ReadDir> {
        let meta: Metadata = fs::metadata(dir).map_err(|e| CoreError::from_io(dir, &e))?;

        if !meta.is_dir() {
            return Err(CoreError::NotADirectory(dir.to_path_buf()));
        }

        fs::read_dir(dir).map_err(|e| CoreError::from_io(dir, &e))
    }
}

impl FilesystemProvider for LocalFilesystem {
    fn list(&self, path: &Path) -> CoreResult<Listing> {
        let start_time: Instant = Instant::now();
        let absolute: PathBuf = std::path::absolute(path).map_err(|e| CoreError::from_io(path, &e))?;
        let dir: PathBuf = normalize(&absolute);

        let read_dir: ReadDir = Self::open(&dir)?;
        let mut entries: Vec<DirectoryEntry> = Vec::new();
        let mut skipped: usize = 0;

        for item in read_dir {
            match item {
                Ok(entry) => entries.push(DirectoryEntry::from_dir_entry(&entry)),

                Err(e) => {
                    // No name to show for a failed iterator item.
                    skipped += 1;
                    warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory item");
                }
            }
        }

        let duration: Duration = start_time.elapsed();
        debug!(
            marker = "DIRECTORY_LIST",
            dir = %dir.display(),
            entries = entries.len(),
            skipped,
            "Directory listed in {:?}",
            duration
        );

        Ok(Listing::new(dir, entries, SortKey::Name, SortDirection::Ascending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::object_info::EntryKind;
    use tempfile::TempDir;

    fn create_test_directory() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path();

        fs::write(path.join("Zebra.txt"), b"0123456789").unwrap();
        fs::write(path.join("Banana.txt"), b"01234").unwrap();
        fs::create_dir(path.join("apple")).unwrap();

        temp_dir
    }

    #[test]
    fn lists_entries_directories_first() {
        let dir = create_test_directory();
        let listing = LocalFilesystem.list(dir.path()).unwrap();

        let names: Vec<&str> = listing.entries().iter().map(DirectoryEntry::name).collect();
        assert_eq!(names, ["apple", "Banana.txt", "Zebra.txt"]);
        assert_eq!(listing.entries()[2].size(), 10);
        assert_eq!(listing.entries()[0].kind(), EntryKind::Directory);
        assert!(listing.path().is_absolute());
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");

        assert_eq!(LocalFilesystem.list(&gone), Err(CoreError::NotFound(gone)));
    }

    #[test]
    fn file_is_not_a_directory() {
        let dir = create_test_directory();
        let file = dir.path().join("Zebra.txt");

        assert_eq!(LocalFilesystem.list(&file), Err(CoreError::NotADirectory(file)));
    }

    #[test]
    fn every_call_rereads_the_directory() {
        let dir = create_test_directory();
        let first = LocalFilesystem.list(dir.path()).unwrap();

        fs::write(dir.path().join("new.txt"), b"x").unwrap();
        let second = LocalFilesystem.list(dir.path()).unwrap();

        assert_eq!(second.len(), first.len() + 1);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_does_not_abort_listing() {
        let dir = create_test_directory();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("broken")).unwrap();

        let listing = LocalFilesystem.list(dir.path()).unwrap();
        assert_eq!(listing.len(), 4);

        let broken = listing.get(&dir.path().join("broken")).unwrap();
        assert_eq!(broken.kind(), EntryKind::Symlink);
        assert!(!broken.is_accessible());
        // Inaccessible files trail the bucket.
        assert_eq!(listing.entries().last().unwrap().name(), "broken");
    }

    #[test]
    fn parent_references_are_folded_out_of_the_listing_path() {
        let dir = create_test_directory();
        let listing = LocalFilesystem.list(&dir.path().join("apple").join("..")).unwrap();

        assert_eq!(listing.path(), dir.path());
        assert!(listing.get(&dir.path().join("Zebra.txt")).is_some());
    }

    #[test]
    fn parent_stops_at_root() {
        let fs = LocalFilesystem::new();
        assert_eq!(fs.parent(Path::new("/a/b")), Some(PathBuf::from("/a")));
        assert_eq!(fs.parent(Path::new("/")), None);
    }
}
