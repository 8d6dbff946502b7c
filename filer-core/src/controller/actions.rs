//! src/controller/actions.rs
//! ============================================================================
//! # Actions: What the Built-in Commands Do
//!
//! The palette hands back a `CommandId`; `Action` is its typed meaning and
//! `apply_action` runs it against the two panes.

use tracing::debug;

use crate::{
    controller::handler_registry::HandlerRegistry,
    error::{CoreError, CoreResult},
    fs::{
        dir_scanner::FilesystemProvider,
        path_input::{home_dir, root_of},
    },
    model::{
        command_palette::{CommandId, CommandIndex},
        dual_pane::{DualPaneController, PaneId},
        sort::SortKey,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Re-list the active pane.
    Refresh,

    ToggleLayout,

    GoHome,

    GoRoot,

    FocusLeft,

    FocusRight,

    /// Go to the parent of the active pane's directory.
    GoUp,

    SwapPanes,

    /// Open the active directory in the other pane.
    SyncPanes,

    /// Same key flips direction, a new key starts ascending.
    SortBy(SortKey),

    ToggleHidden,
}

impl Action {
    #[must_use]
    pub fn from_command(id: CommandId) -> Option<Self> {
        Some(match id {
            CommandId::REFRESH => Self::Refresh,
            CommandId::TOGGLE_LAYOUT => Self::ToggleLayout,
            CommandId::GO_HOME => Self::GoHome,
            CommandId::GO_ROOT => Self::GoRoot,
            CommandId::FOCUS_LEFT => Self::FocusLeft,
            CommandId::FOCUS_RIGHT => Self::FocusRight,
            CommandId::GO_UP => Self::GoUp,
            CommandId::SWAP_PANES => Self::SwapPanes,
            CommandId::SYNC_PANES => Self::SyncPanes,
            CommandId::SORT_NAME => Self::SortBy(SortKey::Name),
            CommandId::SORT_SIZE => Self::SortBy(SortKey::Size),
            CommandId::SORT_KIND => Self::SortBy(SortKey::Kind),
            CommandId::SORT_MODIFIED => Self::SortBy(SortKey::ModifiedTime),
            CommandId::TOGGLE_HIDDEN => Self::ToggleHidden,
            _ => return None,
        })
    }

    /// Resolve every command of `index` that has a built-in action.
    #[must_use]
    pub fn registry(index: &CommandIndex) -> HandlerRegistry<Self> {
        HandlerRegistry::from_index(index, |command| Self::from_command(command.id))
    }
}

/// Run `action` against `panes`.
///
/// # Errors
/// Navigation errors from the active pane (which keeps its last good state),
/// or `InvalidInput` for `GoHome` when no home directory is known.
pub fn apply_action(
    panes: &mut DualPaneController,
    provider: &dyn FilesystemProvider,
    action: Action,
) -> CoreResult<()> {
    debug!(?action, pane = %panes.active_id(), "Applying action");

    match action {
        Action::Refresh => panes.refresh_active(provider),

        Action::ToggleLayout => {
            panes.toggle_layout();
            Ok(())
        }

        Action::GoHome => {
            let home = home_dir().ok_or_else(|| CoreError::invalid_input("home", "home directory unknown"))?;
            panes.navigate_active(provider, &home)
        }

        Action::GoRoot => {
            let root = root_of(panes.active().path());
            panes.navigate_active(provider, &root)
        }

        Action::FocusLeft => {
            panes.set_active_pane(PaneId::Left);
            Ok(())
        }

        Action::FocusRight => {
            panes.set_active_pane(PaneId::Right);
            Ok(())
        }

        Action::GoUp => panes.go_up_active(provider),

        Action::SwapPanes => {
            panes.swap_panes();
            Ok(())
        }

        Action::SyncPanes => panes.sync_inactive_to_active(provider),

        Action::SortBy(key) => {
            panes.active_mut().toggle_sort(key);
            Ok(())
        }

        Action::ToggleHidden => {
            let pane = panes.active_mut();
            let show = !pane.show_hidden();
            pane.set_show_hidden(provider, show)
        }
    }
}

/// Look up `id` in `registry` and run it.
///
/// # Errors
/// `InvalidInput` for an unregistered id, otherwise as [`apply_action`].
pub fn apply_command(
    registry: &HandlerRegistry<Action>,
    panes: &mut DualPaneController,
    provider: &dyn FilesystemProvider,
    id: CommandId,
) -> CoreResult<()> {
    let action = *registry.resolve(id)?;
    apply_action(panes, provider, action)
}
