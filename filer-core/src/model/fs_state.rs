//! ``src/model/fs_state.rs``
//! ============================================================================
//! # `PaneState`: Navigation, Selection and Sort State of One Pane
//!
//! The only steady state is "idle at `path` with `listing`". Every transition
//! is a synchronous call; the provider read is the only blocking step. A
//! failed transition leaves path, listing and selection untouched.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::{CoreError, CoreResult},
    fs::{dir_scanner::FilesystemProvider, object_info::EntryKind},
    model::{
        listing::Listing,
        sort::{SortDirection, SortKey},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneState {
    /// The working directory for this pane.
    cwd: PathBuf,

    /// Current snapshot, ordered by `sort`/`direction`.
    listing: Listing,

    sort: SortKey,
    direction: SortDirection,

    /// Selected entries by path; always a subset of `listing`.
    selection: BTreeSet<PathBuf>,

    /// Keep dot-entries in the listing.
    show_hidden: bool,
}

impl PaneState {
    /// Pane parked at `cwd` with nothing listed yet. Call `refresh` to load.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            listing: Listing::empty(cwd.clone()),
            cwd,
            sort: SortKey::Name,
            direction: SortDirection::Ascending,
            selection: BTreeSet::new(),
            show_hidden: false,
        }
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortKey, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    #[must_use]
    pub const fn with_show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    /// Open `cwd` through `provider`.
    ///
    /// # Errors
    /// Whatever the provider reports for `cwd`.
    pub fn open(provider: &dyn FilesystemProvider, cwd: PathBuf) -> CoreResult<Self> {
        let mut pane = Self::new(cwd.clone());
        pane.navigate(provider, &cwd)?;
        Ok(pane)
    }

    // ------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.cwd
    }

    #[must_use]
    pub const fn listing(&self) -> &Listing {
        &self.listing
    }

    #[must_use]
    pub const fn sort(&self) -> (SortKey, SortDirection) {
        (self.sort, self.direction)
    }

    #[must_use]
    pub const fn selection(&self) -> &BTreeSet<PathBuf> {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, path: &Path) -> bool {
        self.selection.contains(path)
    }

    #[must_use]
    pub const fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    // ------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------

    /// Replace path and listing with `target`; selection is cleared.
    ///
    /// # Errors
    /// The provider's error; the pane is left unchanged.
    pub fn navigate(&mut self, provider: &dyn FilesystemProvider, target: &Path) -> CoreResult<()> {
        let listing = self.fetch(provider, target)?;

        info!(from = %self.cwd.display(), to = %listing.path().display(), "Navigate");
        self.install(listing, false);
        Ok(())
    }

    /// Re-list the current path. Selected paths that still exist stay selected.
    ///
    /// # Errors
    /// The provider's error; the pane is left unchanged.
    pub fn refresh(&mut self, provider: &dyn FilesystemProvider) -> CoreResult<()> {
        let listing = self.fetch(provider, &self.cwd)?;

        debug!(dir = %self.cwd.display(), entries = listing.len(), "Refresh");
        self.install(listing, true);
        Ok(())
    }

    /// Navigate to the parent of the current path.
    ///
    /// # Errors
    /// `AtRoot` when there is no parent, otherwise as [`Self::navigate`].
    pub fn navigate_to_parent(&mut self, provider: &dyn FilesystemProvider) -> CoreResult<()> {
        let parent = provider
            .parent(&self.cwd)
            .ok_or_else(|| CoreError::AtRoot(self.cwd.clone()))?;

        self.navigate(provider, &parent)
    }

    /// Enter the listed entry at `path` if it is a directory.
    ///
    /// # Errors
    /// `NotFound` if `path` is not in the listing, `NotADirectory` for
    /// anything that is not a directory, otherwise as [`Self::navigate`].
    pub fn open_entry(&mut self, provider: &dyn FilesystemProvider, path: &Path) -> CoreResult<()> {
        let entry = self
            .listing
            .get(path)
            .ok_or_else(|| CoreError::NotFound(path.to_path_buf()))?;

        if entry.kind() != EntryKind::Directory {
            return Err(CoreError::NotADirectory(path.to_path_buf()));
        }

        self.navigate(provider, path)
    }

    /// Re-sort the existing listing. Never touches the disk.
    pub fn set_sort(&mut self, sort: SortKey, direction: SortDirection) {
        if (self.sort, self.direction) == (sort, direction) {
            return;
        }

        self.sort = sort;
        self.direction = direction;

        let listing = std::mem::replace(&mut self.listing, Listing::empty(self.cwd.clone()));
        self.listing = listing.resorted(sort, direction);
        debug!(dir = %self.cwd.display(), %sort, ?direction, "Sort changed");
    }

    /// Column-header behaviour: the same key flips direction, a new key
    /// starts ascending.
    pub fn toggle_sort(&mut self, sort: SortKey) {
        let direction = if sort == self.sort {
            self.direction.toggled()
        } else {
            SortDirection::Ascending
        };

        self.set_sort(sort, direction);
    }

    /// Flip selection of `path`; ignored when `path` is not listed.
    pub fn toggle_selection(&mut self, path: &Path) {
        if !self.listing.contains(path) {
            return;
        }

        if !self.selection.remove(path) {
            self.selection.insert(path.to_path_buf());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Change the hidden-file filter and re-list.
    ///
    /// # Errors
    /// As [`Self::refresh`]; on error the flag is restored.
    pub fn set_show_hidden(&mut self, provider: &dyn FilesystemProvider, show_hidden: bool) -> CoreResult<()> {
        let previous = std::mem::replace(&mut self.show_hidden, show_hidden);

        self.refresh(provider).inspect_err(|_| self.show_hidden = previous)
    }

    /// Install a listing fetched elsewhere (e.g. on a worker thread).
    ///
    /// A listing of the current path is treated as a refresh, anything
    /// else as a navigation.
    pub fn apply_listing(&mut self, listing: Listing) {
        let same_dir = listing.path() == self.cwd;
        let listing = self.filter(listing);
        self.install(listing, same_dir);
    }

    // ------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------

    fn fetch(&self, provider: &dyn FilesystemProvider, target: &Path) -> CoreResult<Listing> {
        provider.list(target).map(|l| self.filter(l))
    }

    fn filter(&self, listing: Listing) -> Listing {
        let listing = if self.show_hidden {
            listing
        } else {
            listing.retain(|e| !e.is_hidden())
        };

        listing.resorted(self.sort, self.direction)
    }

    fn install(&mut self, listing: Listing, keep_selection: bool) {
        if keep_selection {
            self.selection.retain(|p| listing.contains(p));
        } else {
            self.selection.clear();
        }

        self.cwd = listing.path().to_path_buf();
        self.listing = listing;
    }
}
