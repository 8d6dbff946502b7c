//! ``src/model/dual_pane.rs``
//! ============================================================================
//! # `DualPaneController`: Two Panes Under One Layout Mode
//!
//! Owns the left and right `PaneState`, the layout mode and the active pane.
//! Both panes stay alive in `Single` mode; only the active one is
//! addressable from outside.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{CoreError, CoreResult},
    fs::dir_scanner::FilesystemProvider,
    model::fs_state::PaneState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Single,
    #[default]
    Dual,
}

impl LayoutMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Single => Self::Dual,
            Self::Dual => Self::Single,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaneId {
    #[default]
    Left,
    Right,
}

impl PaneId {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualPaneController {
    left: PaneState,
    right: PaneState,
    layout: LayoutMode,
    active: PaneId,
}

impl DualPaneController {
    #[must_use]
    pub fn new(left: PaneState, right: PaneState) -> Self {
        Self {
            left,
            right,
            layout: LayoutMode::Dual,
            active: PaneId::Left,
        }
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn layout(&self) -> LayoutMode {
        self.layout
    }

    #[must_use]
    pub const fn active_id(&self) -> PaneId {
        self.active
    }

    /// Whether `which` can be read or driven from outside.
    #[must_use]
    pub fn is_addressable(&self, which: PaneId) -> bool {
        self.layout == LayoutMode::Dual || which == self.active
    }

    /// `None` for the hidden pane in `Single` mode.
    #[must_use]
    pub fn pane(&self, which: PaneId) -> Option<&PaneState> {
        self.is_addressable(which).then(|| self.slot(which))
    }

    pub fn pane_mut(&mut self, which: PaneId) -> Option<&mut PaneState> {
        if self.is_addressable(which) {
            Some(self.slot_mut(which))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn active(&self) -> &PaneState {
        match self.active {
            PaneId::Left => &self.left,
            PaneId::Right => &self.right,
        }
    }

    pub const fn active_mut(&mut self) -> &mut PaneState {
        match self.active {
            PaneId::Left => &mut self.left,
            PaneId::Right => &mut self.right,
        }
    }

    /// Panes currently visible, left to right.
    pub fn visible(&self) -> impl Iterator<Item = (PaneId, &PaneState)> {
        [PaneId::Left, PaneId::Right]
            .into_iter()
            .filter_map(move |id| self.pane(id).map(|p| (id, p)))
    }

    // ------------------------------------------------------------
    // Layout and focus
    // ------------------------------------------------------------

    /// Both panes keep their state across mode changes.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        if self.layout != mode {
            info!(from = ?self.layout, to = ?mode, "Layout mode changed");
            self.layout = mode;
        }
    }

    pub fn toggle_layout(&mut self) {
        self.set_layout_mode(self.layout.toggled());
    }

    /// Route input to `which`. Pane contents are untouched.
    pub fn set_active_pane(&mut self, which: PaneId) {
        if self.active != which {
            debug!(pane = %which, "Active pane changed");
            self.active = which;
        }
    }

    /// Exchange the two panes wholesale (path, listing, selection, sort).
    ///
    /// Background listings requested before the swap now target the wrong
    /// pane; pair this with `ListingTask::invalidate_all`.
    pub fn swap_panes(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
        debug!(left = %self.left.path().display(), right = %self.right.path().display(), "Panes swapped");
    }

    // ------------------------------------------------------------
    // Routing to the active pane
    // ------------------------------------------------------------

    /// # Errors
    /// As [`PaneState::navigate`].
    pub fn navigate_active(&mut self, provider: &dyn FilesystemProvider, target: &Path) -> CoreResult<()> {
        self.active_mut().navigate(provider, target)
    }

    /// # Errors
    /// As [`PaneState::refresh`].
    pub fn refresh_active(&mut self, provider: &dyn FilesystemProvider) -> CoreResult<()> {
        self.active_mut().refresh(provider)
    }

    /// # Errors
    /// As [`PaneState::navigate_to_parent`].
    pub fn go_up_active(&mut self, provider: &dyn FilesystemProvider) -> CoreResult<()> {
        self.active_mut().navigate_to_parent(provider)
    }

    /// Point the other pane at the active pane's directory.
    ///
    /// # Errors
    /// `InvalidInput` in `Single` mode, where the other pane is hidden;
    /// otherwise as [`PaneState::navigate`]. The other pane is left unchanged.
    pub fn sync_inactive_to_active(&mut self, provider: &dyn FilesystemProvider) -> CoreResult<()> {
        let target: PathBuf = self.active().path().to_path_buf();
        let other = self.active.other();

        self.pane_mut(other)
            .ok_or_else(|| CoreError::invalid_input("pane", format!("{other} pane is hidden in single layout")))?
            .navigate(provider, &target)
    }

    const fn slot(&self, which: PaneId) -> &PaneState {
        match which {
            PaneId::Left => &self.left,
            PaneId::Right => &self.right,
        }
    }

    const fn slot_mut(&mut self, which: PaneId) -> &mut PaneState {
        match which {
            PaneId::Left => &mut self.left,
            PaneId::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        fs_state::tests::fake,
        sort::{SortDirection, SortKey},
    };

    fn controller() -> (DualPaneController, crate::model::fs_state::tests::FakeFilesystem) {
        let fs = fake();
        let left = PaneState::open(&fs, PathBuf::from("/home")).unwrap();
        let right = PaneState::open(&fs, PathBuf::from("/home/docs")).unwrap();
        (DualPaneController::new(left, right), fs)
    }

    #[test]
    fn single_mode_hides_inactive_pane_without_resetting_it() {
        let (mut c, _fs) = controller();

        c.set_layout_mode(LayoutMode::Single);
        assert!(c.pane(PaneId::Left).is_some());
        assert!(c.pane(PaneId::Right).is_none());
        assert!(c.pane_mut(PaneId::Right).is_none());
        assert_eq!(c.visible().count(), 1);

        c.set_layout_mode(LayoutMode::Dual);
        assert_eq!(c.pane(PaneId::Right).unwrap().path(), Path::new("/home/docs"));
        assert_eq!(c.visible().count(), 2);
    }

    #[test]
    fn sync_refuses_to_drive_the_hidden_pane() {
        let (mut c, fs) = controller();
        c.set_layout_mode(LayoutMode::Single);

        assert!(matches!(
            c.sync_inactive_to_active(&fs),
            Err(CoreError::InvalidInput { .. })
        ));

        c.set_layout_mode(LayoutMode::Dual);
        assert_eq!(c.pane(PaneId::Right).unwrap().path(), Path::new("/home/docs"));

        c.sync_inactive_to_active(&fs).unwrap();
        assert_eq!(c.pane(PaneId::Right).unwrap().path(), Path::new("/home"));
    }

    #[test]
    fn active_pane_is_addressable_in_single_mode() {
        let (mut c, _fs) = controller();
        c.toggle_layout();
        assert_eq!(c.layout(), LayoutMode::Single);

        c.set_active_pane(PaneId::Right);
        assert!(c.pane(PaneId::Right).is_some());
        assert!(c.pane(PaneId::Left).is_none());
    }

    #[test]
    fn set_active_pane_does_not_touch_state() {
        let (mut c, _fs) = controller();
        let before = (c.pane(PaneId::Left).cloned(), c.pane(PaneId::Right).cloned());

        c.set_active_pane(PaneId::Left);
        c.set_active_pane(PaneId::Right);

        assert_eq!(c.active_id(), PaneId::Right);
        assert_eq!((c.pane(PaneId::Left).cloned(), c.pane(PaneId::Right).cloned()), before);
    }

    #[test]
    fn swap_exchanges_whole_pane_state() {
        let (mut c, _fs) = controller();
        c.pane_mut(PaneId::Left).unwrap().set_sort(SortKey::Size, SortDirection::Descending);
        c.pane_mut(PaneId::Left).unwrap().toggle_selection(Path::new("/home/a.txt"));

        c.swap_panes();

        let right = c.pane(PaneId::Right).unwrap();
        assert_eq!(right.path(), Path::new("/home"));
        assert_eq!(right.sort(), (SortKey::Size, SortDirection::Descending));
        assert!(right.is_selected(Path::new("/home/a.txt")));
        assert_eq!(c.pane(PaneId::Left).unwrap().path(), Path::new("/home/docs"));
        assert_eq!(c.active_id(), PaneId::Left);
    }

    #[test]
    fn routing_follows_active_pane() {
        let (mut c, fs) = controller();
        c.set_active_pane(PaneId::Right);

        c.go_up_active(&fs).unwrap();
        assert_eq!(c.active().path(), Path::new("/home"));
        assert_eq!(c.pane(PaneId::Left).unwrap().path(), Path::new("/home"));

        c.navigate_active(&fs, Path::new("/")).unwrap();
        c.sync_inactive_to_active(&fs).unwrap();
        assert_eq!(c.pane(PaneId::Left).unwrap().path(), Path::new("/"));
    }
}
