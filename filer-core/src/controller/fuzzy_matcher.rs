// filer-core/src/controller/fuzzy_matcher.rs - command palette ranking
//!
//! Case-insensitive subsequence matching of a query against each command's
//! display name and aliases. Deterministic and stateless: identical inputs
//! always give the identical ranking.

use std::cmp::Reverse;

use crate::model::command_palette::Command;

/// Quality of one command's best match. Greater is better.
///
/// Fields are compared in declaration order, so the derived `Ord` is the
/// ranking priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MatchScore {
    /// Query equals the display name (ignoring case).
    exact_name: bool,
    /// Query occurs as a contiguous run.
    contiguous: bool,
    /// First matched character is the field's first character.
    at_start: bool,
    /// Display name length, inverted: shorter names score higher.
    brevity: Reverse<usize>,
    /// 0 for the display name, 1.. for aliases, inverted.
    field: Reverse<usize>,
}

impl MatchScore {
    #[must_use]
    pub const fn is_contiguous(&self) -> bool {
        self.contiguous
    }

    #[must_use]
    pub const fn starts_at_zero(&self) -> bool {
        self.at_start
    }

    /// Which field matched: 0 = display name, n = alias n-1.
    #[must_use]
    pub const fn field_index(&self) -> usize {
        self.field.0
    }
}

/// A command with its score, as returned by [`FuzzyMatcher::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedCommand<'a> {
    pub command: &'a Command,
    pub score: MatchScore,
}

pub struct FuzzyMatcher;

impl FuzzyMatcher {
    /// Rank `commands` against `query`, best first.
    ///
    /// Non-matching commands are dropped. Equal scores keep registration
    /// order. An empty (or all-whitespace) query returns every command in
    /// registration order with the same score.
    #[must_use]
    pub fn rank<'a>(query: &str, commands: &'a [Command]) -> Vec<RankedCommand<'a>> {
        let needle: Vec<char> = fold(query.trim());

        if needle.is_empty() {
            return commands
                .iter()
                .map(|command| RankedCommand {
                    command,
                    score: MatchScore::default(),
                })
                .collect();
        }

        let mut ranked: Vec<RankedCommand<'a>> = commands
            .iter()
            .filter_map(|command| Self::score(&needle, command).map(|score| RankedCommand { command, score }))
            .collect();

        // Stable: ties stay in registration order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// Best score of `command` for an already case-folded query.
    fn score(needle: &[char], command: &Command) -> Option<MatchScore> {
        let name_len = command.name.chars().count();

        std::iter::once(command.name.as_str())
            .chain(command.aliases.iter().map(|a| a.as_str()))
            .enumerate()
            .filter_map(|(field, text)| {
                let hay = fold(text);
                let (contiguous, start) = locate(needle, &hay)?;

                Some(MatchScore {
                    exact_name: field == 0 && hay == needle,
                    contiguous,
                    at_start: start == 0,
                    brevity: Reverse(name_len),
                    field: Reverse(field),
                })
            })
            .max()
    }
}

fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Find `needle` in `hay`: `(contiguous, start)` of the best placement.
///
/// A contiguous occurrence wins over a scattered one; among contiguous
/// occurrences a prefix wins, otherwise the leftmost is used. The scattered
/// fallback is the greedy leftmost subsequence.
fn locate(needle: &[char], hay: &[char]) -> Option<(bool, usize)> {
    if needle.len() > hay.len() {
        return None;
    }

    if let Some(start) = hay.windows(needle.len()).position(|w| w == needle) {
        return Some((true, start));
    }

    let mut chars = needle.iter();
    let mut want = chars.next()?;
    let mut start = None;

    for (i, c) in hay.iter().enumerate() {
        if c == want {
            if start.is_none() {
                start = Some(i);
            }
            match chars.next() {
                Some(next) => want = next,
                None => return start.map(|s| (false, s)),
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::command_palette::{CommandId, CommandIndex};

    fn cmd(id: &'static str, name: &str, aliases: &[&str]) -> Command {
        Command::new(CommandId::new(id), name, "").with_aliases(aliases)
    }

    fn ids(ranked: &[RankedCommand<'_>]) -> Vec<&'static str> {
        ranked.iter().map(|r| r.command.id.as_str()).collect()
    }

    #[test]
    fn empty_query_lists_everything_in_order() {
        let index = CommandIndex::builtin();
        let ranked = FuzzyMatcher::rank("", index.all());
        assert_eq!(ranked.len(), index.len());
        assert!(ranked.iter().zip(index.all()).all(|(r, c)| r.command == c));
        assert!(ranked.windows(2).all(|w| w[0].score == w[1].score));

        assert_eq!(FuzzyMatcher::rank("   ", index.all()).len(), index.len());
    }

    #[test]
    fn copy_path_beats_open_palette() {
        let cmds = [cmd("open", "Open Palette", &[]), cmd("copy", "Copy Path", &[])];
        let ranked = FuzzyMatcher::rank("cp", &cmds);
        assert_eq!(ids(&ranked)[0], "copy");
    }

    #[test]
    fn non_matching_commands_are_excluded() {
        let cmds = [cmd("a", "Refresh", &[]), cmd("b", "Swap Panes", &[])];
        assert_eq!(ids(&FuzzyMatcher::rank("zz", &cmds)), Vec::<&str>::new());
        assert_eq!(ids(&FuzzyMatcher::rank("SWAP", &cmds)), ["b"]);
    }

    #[test]
    fn exact_display_name_ranks_first() {
        let index = CommandIndex::builtin();
        for command in index.all() {
            let ranked = FuzzyMatcher::rank(&command.name, index.all());
            assert_eq!(ranked[0].command.id, command.id, "query {:?}", command.name);
        }
    }

    #[test]
    fn contiguous_beats_scattered() {
        let cmds = [cmd("scattered", "a-b-c", &[]), cmd("contiguous", "xxabc", &[])];
        assert_eq!(ids(&FuzzyMatcher::rank("abc", &cmds)), ["contiguous", "scattered"]);
    }

    #[test]
    fn prefix_beats_later_match() {
        let cmds = [cmd("late", "xgo", &[]), cmd("early", "go up and away", &[])];
        assert_eq!(ids(&FuzzyMatcher::rank("go", &cmds)), ["early", "late"]);
    }

    #[test]
    fn shorter_name_beats_longer() {
        let cmds = [cmd("long", "Sort by Name", &[]), cmd("short", "Sort", &[])];
        assert_eq!(ids(&FuzzyMatcher::rank("so", &cmds)), ["short", "long"]);
    }

    #[test]
    fn earlier_alias_beats_later_alias() {
        let cmds = [cmd("second", "Zzz", &["one", "dup"]), cmd("first", "Yyy", &["dup"])];
        let ranked = FuzzyMatcher::rank("dup", &cmds);
        assert_eq!(ids(&ranked), ["first", "second"]);
        assert_eq!(ranked[0].score.field_index(), 1);
        assert_eq!(ranked[1].score.field_index(), 2);
    }

    #[test]
    fn ties_keep_registration_order() {
        let cmds = [cmd("one", "Alpha", &[]), cmd("two", "Alpha", &[])];
        assert_eq!(ids(&FuzzyMatcher::rank("al", &cmds)), ["one", "two"]);
    }

    #[test]
    fn alias_can_match_when_name_does_not() {
        let index = CommandIndex::builtin();
        let ranked = FuzzyMatcher::rank("reload", index.all());
        assert_eq!(ranked[0].command.id, CommandId::REFRESH);
        assert!(ranked[0].score.is_contiguous());
    }

    #[test]
    fn ranking_is_stable_across_calls() {
        let index = CommandIndex::builtin();
        assert_eq!(FuzzyMatcher::rank("s", index.all()), FuzzyMatcher::rank("s", index.all()));
    }

    #[test]
    fn locate_prefers_prefix_and_reports_scatter() {
        let hay = fold("Copy Path");
        assert_eq!(locate(&fold("cp"), &hay), Some((false, 0)));
        assert_eq!(locate(&fold("path"), &hay), Some((true, 5)));
        assert_eq!(locate(&fold("pc"), &hay), None);
    }
}
