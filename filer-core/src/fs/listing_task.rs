//! ``src/fs/listing_task.rs``
//!
//! # Background listings with "last request wins"
//!
//! `FilesystemProvider::list` blocks. `ListingTask` runs it on Tokio's
//! blocking pool and tags every request with a per-pane sequence number.
//! Only the newest request for a pane is accepted; older results that
//! arrive later are dropped. Listings are never merged.

use std::{
    path::PathBuf,
    sync::Arc,
};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    error::{CoreError, CoreResult},
    fs::dir_scanner::FilesystemProvider,
    model::{dual_pane::PaneId, fs_state::PaneState, listing::Listing},
};

/// Per-pane request sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// Outcome of one background listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingResult {
    pub pane: PaneId,
    pub request: RequestId,
    pub path: PathBuf,
    pub result: CoreResult<Listing>,
}

/// Handle to an in-flight listing.
#[derive(Debug)]
pub struct PendingListing {
    pane: PaneId,
    request: RequestId,
    path: PathBuf,
    handle: JoinHandle<CoreResult<Listing>>,
}

impl PendingListing {
    #[must_use]
    pub const fn request(&self) -> RequestId {
        self.request
    }

    /// Wait for the worker. A panicked or cancelled worker becomes
    /// `CoreError::TaskFailed`.
    pub async fn wait(self) -> ListingResult {
        let result = match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(CoreError::TaskFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        };

        ListingResult {
            pane: self.pane,
            request: self.request,
            path: self.path,
            result,
        }
    }

    /// Drop interest in the result; the blocking read still runs to completion.
    pub fn abort(self) {
        self.handle.abort();
    }
}

pub struct ListingTask {
    provider: Arc<dyn FilesystemProvider>,
    latest: [u64; 2],
}

impl ListingTask {
    #[must_use]
    pub fn new(provider: Arc<dyn FilesystemProvider>) -> Self {
        Self { provider, latest: [0; 2] }
    }

    const fn slot(pane: PaneId) -> usize {
        match pane {
            PaneId::Left => 0,
            PaneId::Right => 1,
        }
    }

    /// Start listing `path` for `pane`, superseding any earlier request.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn request(&mut self, pane: PaneId, path: PathBuf) -> PendingListing {
        let slot = Self::slot(pane);
        self.latest[slot] += 1;
        let request = RequestId(self.latest[slot]);

        debug!(%pane, request = request.0, path = %path.display(), "Listing requested");

        let provider = Arc::clone(&self.provider);
        let target = path.clone();
        let handle = tokio::task::spawn_blocking(move || provider.list(&target));

        PendingListing {
            pane,
            request,
            path,
            handle,
        }
    }

    /// Make every in-flight request for `pane` stale.
    pub fn invalidate(&mut self, pane: PaneId) {
        self.latest[Self::slot(pane)] += 1;
        debug!(%pane, "In-flight listings invalidated");
    }

    /// Call after `DualPaneController::swap_panes`: requests issued before
    /// the swap target the pane now sitting behind the other id.
    pub fn invalidate_all(&mut self) {
        self.invalidate(PaneId::Left);
        self.invalidate(PaneId::Right);
    }

    /// Latest request issued for `pane`, if any.
    #[must_use]
    pub const fn latest(&self, pane: PaneId) -> Option<RequestId> {
        match self.latest[Self::slot(pane)] {
            0 => None,
            n => Some(RequestId(n)),
        }
    }

    /// Pass `result` through only if it answers the newest request.
    #[must_use]
    pub fn accept(&self, result: ListingResult) -> Option<CoreResult<Listing>> {
        if Some(result.request) != self.latest(result.pane) {
            warn!(
                pane = %result.pane,
                request = result.request.0,
                path = %result.path.display(),
                "Discarding stale listing"
            );
            return None;
        }

        Some(result.result)
    }

    /// Accept `result` and install it into `pane`.
    ///
    /// Returns `Ok(false)` for a stale result (pane untouched).
    ///
    /// # Errors
    /// The listing error of the newest request; the pane is left unchanged.
    pub fn apply(&self, result: ListingResult, pane: &mut PaneState) -> CoreResult<bool> {
        match self.accept(result) {
            Some(listing) => {
                pane.apply_listing(listing?);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fs::dir_scanner::LocalFilesystem, model::dual_pane::DualPaneController};
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b").join("file.txt"), b"x").unwrap();
        dir
    }

    #[tokio::test]
    async fn newest_request_wins() {
        let dir = tree();
        let mut task = ListingTask::new(Arc::new(LocalFilesystem));

        let first = task.request(PaneId::Left, dir.path().join("a"));
        let second = task.request(PaneId::Left, dir.path().join("b"));
        assert!(first.request() < second.request());

        let second = second.wait().await;
        let first = first.wait().await;

        assert!(task.accept(first).is_none());
        let listing = task.accept(second).unwrap().unwrap();
        assert_eq!(listing.path(), dir.path().join("b"));
        assert_eq!(listing.len(), 1);
    }

    #[tokio::test]
    async fn panes_are_tracked_independently() {
        let dir = tree();
        let mut task = ListingTask::new(Arc::new(LocalFilesystem));

        let left = task.request(PaneId::Left, dir.path().join("a")).wait().await;
        let right = task.request(PaneId::Right, dir.path().join("b")).wait().await;

        assert!(task.accept(left).is_some());
        assert!(task.accept(right).is_some());
        assert_eq!(task.latest(PaneId::Left), task.latest(PaneId::Right));
    }

    #[tokio::test]
    async fn apply_installs_only_current_results() {
        let dir = tree();
        let mut task = ListingTask::new(Arc::new(LocalFilesystem));
        let mut pane = PaneState::open(&LocalFilesystem, dir.path().to_path_buf()).unwrap();

        let stale = task.request(PaneId::Left, dir.path().join("a")).wait().await;
        let fresh = task.request(PaneId::Left, dir.path().join("b")).wait().await;

        assert_eq!(task.apply(stale, &mut pane), Ok(false));
        assert_eq!(pane.path(), dir.path());

        assert_eq!(task.apply(fresh, &mut pane), Ok(true));
        assert_eq!(pane.path(), dir.path().join("b"));
    }

    #[tokio::test]
    async fn errors_of_the_newest_request_surface() {
        let dir = tree();
        let mut task = ListingTask::new(Arc::new(LocalFilesystem));
        let missing = dir.path().join("missing");

        let result = task.request(PaneId::Right, missing.clone()).wait().await;
        assert_eq!(task.accept(result), Some(Err(CoreError::NotFound(missing))));
    }

    #[tokio::test]
    async fn swap_discards_requests_issued_before_it() {
        let dir = tree();
        let mut task = ListingTask::new(Arc::new(LocalFilesystem));
        let mut panes = DualPaneController::new(
            PaneState::open(&LocalFilesystem, dir.path().join("a")).unwrap(),
            PaneState::open(&LocalFilesystem, dir.path().join("b")).unwrap(),
        );

        let pending = task.request(PaneId::Left, dir.path().to_path_buf());
        panes.swap_panes();
        task.invalidate_all();

        let result = pending.wait().await;
        let left = panes.pane_mut(PaneId::Left).unwrap();
        assert_eq!(task.apply(result, left), Ok(false));
        assert_eq!(panes.pane(PaneId::Left).unwrap().path(), dir.path().join("b"));
    }

    #[tokio::test]
    async fn invalidate_only_touches_one_pane() {
        let dir = tree();
        let mut task = ListingTask::new(Arc::new(LocalFilesystem));

        let left = task.request(PaneId::Left, dir.path().join("a"));
        let right = task.request(PaneId::Right, dir.path().join("b"));
        task.invalidate(PaneId::Left);

        assert!(task.accept(left.wait().await).is_none());
        assert!(task.accept(right.wait().await).is_some());
    }
}
