//!
//!  ``src/model/command_palette.rs``
//!
//! Command registry and the palette's input/selection state.

use std::sync::OnceLock;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::{
    controller::fuzzy_matcher::{FuzzyMatcher, RankedCommand},
    error::{CoreError, CoreResult},
};

/// Stable identifier handed back to the caller when a command is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(&'static str);

impl CommandId {
    pub const REFRESH: Self = Self("pane.refresh");
    pub const TOGGLE_LAYOUT: Self = Self("layout.toggle");
    pub const GO_HOME: Self = Self("nav.home");
    pub const GO_ROOT: Self = Self("nav.root");
    pub const FOCUS_LEFT: Self = Self("focus.left");
    pub const FOCUS_RIGHT: Self = Self("focus.right");
    pub const GO_UP: Self = Self("nav.up");
    pub const SWAP_PANES: Self = Self("layout.swap");
    pub const SYNC_PANES: Self = Self("layout.sync");
    pub const SORT_NAME: Self = Self("sort.name");
    pub const SORT_SIZE: Self = Self("sort.size");
    pub const SORT_KIND: Self = Self("sort.kind");
    pub const SORT_MODIFIED: Self = Self("sort.modified");
    pub const TOGGLE_HIDDEN: Self = Self("view.hidden");

    #[must_use]
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// A user-invokable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    pub name: CompactString,
    pub description: CompactString,
    /// Matched by the palette, never displayed.
    pub aliases: SmallVec<[CompactString; 4]>,
}

impl Command {
    #[must_use]
    pub fn new(id: CommandId, name: &str, description: &str) -> Self {
        Self {
            id,
            name: CompactString::new(name),
            description: CompactString::new(description),
            aliases: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(CompactString::new));
        self
    }
}

/// Ordered, read-only set of commands. Registration order is the final
/// tie-break of the palette ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandIndex {
    commands: Vec<Command>,
}

impl CommandIndex {
    /// # Errors
    /// `InvalidInput` when two commands share an id.
    pub fn new(commands: Vec<Command>) -> CoreResult<Self> {
        for (i, cmd) in commands.iter().enumerate() {
            if commands[..i].iter().any(|c| c.id == cmd.id) {
                return Err(CoreError::invalid_input("command_id", format!("duplicate command id {}", cmd.id)));
            }
        }

        Ok(Self { commands })
    }

    /// The process-wide registry of built-in commands.
    pub fn builtin() -> &'static Self {
        static INDEX: OnceLock<CommandIndex> = OnceLock::new();
        INDEX.get_or_init(|| Self {
            commands: builtin_commands(),
        })
    }

    #[must_use]
    pub fn all(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn builtin_commands() -> Vec<Command> {
    vec![
        Command::new(CommandId::REFRESH, "Refresh", "Refresh current pane").with_aliases(&["reload", "rescan"]),
        Command::new(CommandId::TOGGLE_LAYOUT, "Toggle Layout", "Switch between single and dual pane layout")
            .with_aliases(&["single pane", "dual pane"]),
        Command::new(CommandId::GO_HOME, "Go to Home", "Navigate to home directory").with_aliases(&["~", "home"]),
        Command::new(CommandId::GO_ROOT, "Go to Root", "Navigate to root directory").with_aliases(&["/"]),
        Command::new(CommandId::FOCUS_LEFT, "Focus Left Pane", "Set focus to left pane"),
        Command::new(CommandId::FOCUS_RIGHT, "Focus Right Pane", "Set focus to right pane"),
        Command::new(CommandId::GO_UP, "Go Up", "Navigate to parent directory").with_aliases(&["parent", ".."]),
        Command::new(CommandId::SWAP_PANES, "Swap Panes", "Exchange left and right panes"),
        Command::new(CommandId::SYNC_PANES, "Sync Panes", "Open the active directory in the other pane")
            .with_aliases(&["same directory"]),
        Command::new(CommandId::SORT_NAME, "Sort by Name", "Order entries by name"),
        Command::new(CommandId::SORT_SIZE, "Sort by Size", "Order entries by size"),
        Command::new(CommandId::SORT_KIND, "Sort by Kind", "Order entries by type").with_aliases(&["sort by type"]),
        Command::new(CommandId::SORT_MODIFIED, "Sort by Modified", "Order entries by modification time")
            .with_aliases(&["sort by date"]),
        Command::new(CommandId::TOGGLE_HIDDEN, "Toggle Hidden Files", "Show or hide dot files")
            .with_aliases(&["dotfiles"]),
    ]
}

/// Palette input plus the ranked view of the registry.
#[derive(Debug, Clone)]
pub struct CommandPaletteState<'a> {
    index: &'a CommandIndex,
    input: String,
    results: Vec<RankedCommand<'a>>,
    selected: usize,
}

impl<'a> CommandPaletteState<'a> {
    /// Empty input: every command, in registration order.
    #[must_use]
    pub fn new(index: &'a CommandIndex) -> Self {
        Self {
            index,
            input: String::new(),
            results: FuzzyMatcher::rank("", index.all()),
            selected: 0,
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn results(&self) -> &[RankedCommand<'a>] {
        &self.results
    }

    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Call this on input change to re-rank commands.
    pub fn set_input(&mut self, input: &str) {
        input.clone_into(&mut self.input);
        self.results = FuzzyMatcher::rank(&self.input, self.index.all());
        self.selected = 0;
    }

    pub fn push_char(&mut self, c: char) {
        let mut input = std::mem::take(&mut self.input);
        input.push(c);
        self.set_input(&input);
    }

    pub fn pop_char(&mut self) {
        let mut input = std::mem::take(&mut self.input);
        input.pop();
        self.set_input(&input);
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.results.is_empty() {
            self.selected = if self.selected == 0 {
                self.results.len() - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// Identifier of the highlighted command; the caller dispatches it.
    #[must_use]
    pub fn selected_command(&self) -> Option<CommandId> {
        self.results.get(self.selected).map(|r| r.command.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_is_shared_and_unique() {
        let a = CommandIndex::builtin();
        let b = CommandIndex::builtin();
        assert!(std::ptr::eq(a, b));
        assert!(CommandIndex::new(a.all().to_vec()).is_ok());
        assert_eq!(a.get(CommandId::REFRESH).map(|c| c.name.as_str()), Some("Refresh"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let cmds = vec![
            Command::new(CommandId::new("x"), "One", ""),
            Command::new(CommandId::new("x"), "Two", ""),
        ];
        assert!(matches!(CommandIndex::new(cmds), Err(CoreError::InvalidInput { .. })));
    }

    #[test]
    fn palette_filters_and_wraps_selection() {
        let index = CommandIndex::builtin();
        let mut palette = CommandPaletteState::new(index);
        assert_eq!(palette.results().len(), index.len());

        palette.set_input("swap");
        assert_eq!(palette.selected_command(), Some(CommandId::SWAP_PANES));

        palette.set_input("focus");
        assert_eq!(palette.results().len(), 2);
        palette.select_prev();
        assert_eq!(palette.selected_index(), 1);
        palette.select_next();
        assert_eq!(palette.selected_index(), 0);

        palette.set_input("qqqq");
        assert!(palette.results().is_empty());
        palette.select_next();
        assert_eq!(palette.selected_command(), None);
    }

    #[test]
    fn typing_updates_ranking() {
        let mut palette = CommandPaletteState::new(CommandIndex::builtin());
        for c in "refr".chars() {
            palette.push_char(c);
        }
        assert_eq!(palette.input(), "refr");
        assert_eq!(palette.selected_command(), Some(CommandId::REFRESH));

        palette.pop_char();
        assert_eq!(palette.input(), "ref");
    }
}
