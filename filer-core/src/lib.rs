pub mod error;
pub use error::{CoreError, CoreResult};

pub mod config;
pub use config::Config;

pub mod logging;

pub mod fs {
    pub mod dir_scanner;
    pub use dir_scanner::{FilesystemProvider, LocalFilesystem};

    pub mod listing_task;
    pub use listing_task::{ListingResult, ListingTask, PendingListing, RequestId};

    pub mod object_info;
    pub use object_info::{DirectoryEntry, EntryKind};

    pub mod path_input;
    pub use path_input::resolve_input_path;
}

pub mod model {
    pub mod command_palette;
    pub use command_palette::{Command, CommandId, CommandIndex, CommandPaletteState};

    pub mod dual_pane;
    pub use dual_pane::{DualPaneController, LayoutMode, PaneId};

    pub mod fs_state;
    pub use fs_state::PaneState;

    pub mod listing;
    pub use listing::{Listing, ListingSummary};

    pub mod sort;
    pub use sort::{SortDirection, SortKey};
}

pub mod controller {
    pub mod actions;
    pub use actions::{Action, apply_action, apply_command};

    pub mod fuzzy_matcher;
    pub use fuzzy_matcher::{FuzzyMatcher, MatchScore, RankedCommand};

    pub mod handler_registry;
    pub use handler_registry::{HandlerRegistry, HandlerStats};
}
