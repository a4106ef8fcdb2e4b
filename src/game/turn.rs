//! Player Intents
//!
//! Entry points a renderer calls in response to input: cell clicks, swaps
//! and the session's limited helpers (hint, shuffle, freeze). Each takes a
//! snapshot and returns the next one.

use tracing::debug;

use crate::config::RuneMatchConfig;
use crate::core::rng::RandomSource;
use crate::game::cascade::process_matches;
use crate::game::combat::apply_match_result;
use crate::game::grid::{shuffle_grid, swap_runes, GridPosition};
use crate::game::matching::{find_matches, find_possible_moves, GroupKind};
use crate::game::state::{FeedbackColor, GameState, MonsterType, TextAnchor};

/// Groups at least this large count as big matches.
const BIG_MATCH_CELLS: usize = 5;

/// Handle a click on a cell.
///
/// The first click selects. A second click on an orthogonal neighbour
/// plays the swap; any other cell becomes the new selection. Clicks
/// outside the grid are ignored.
pub fn select_cell(state: &GameState, pos: GridPosition, config: &RuneMatchConfig) -> GameState {
    if !state.is_playing() || !state.grid.contains(pos) {
        return state.clone();
    }

    match state.selected_cell {
        Some(selected) if selected.is_adjacent(pos) => play_swap(state, selected, pos, config),
        _ => {
            let mut next = state.clone();
            next.selected_cell = Some(pos);
            next
        }
    }
}

/// Swap two cells and resolve the move.
///
/// A swap that forms no match is reverted and answered with a
/// "No Match!" text at `b`; it does not count as an attempt. Otherwise the
/// cascade is resolved and applied to combat. A shield group earns a freeze
/// charge when none is held.
///
/// # Panics
/// Panics if either position is outside the grid.
pub fn play_swap(state: &GameState, a: GridPosition, b: GridPosition, config: &RuneMatchConfig) -> GameState {
    let mut next = state.clone();
    if !next.is_playing() {
        return next;
    }

    next.selected_cell = None;

    let swapped = swap_runes(&next.grid, a, b);
    if find_matches(&swapped).is_empty() {
        next.push_text(
            "No Match!",
            TextAnchor::Cell(b),
            FeedbackColor::Muted,
            config.timing.no_match_text_ms,
        );
        return next;
    }

    let result = process_matches(&swapped, &next.vocabulary, config, &mut next.rng);

    if next.freeze_charges == 0 && result.groups.iter().any(|g| g.kind == GroupKind::Shield) {
        next.freeze_charges = 1;
    }
    next.big_matches += result.groups.iter().filter(|g| g.len() >= BIG_MATCH_CELLS).count() as u32;
    next.hint = None;

    apply_match_result(&next, &result, config)
}

/// Reveal one available move.
///
/// Only the goblin and the skeleton allow hints. Consumes a hint only when
/// a move exists.
pub fn use_hint(state: &GameState, config: &RuneMatchConfig) -> GameState {
    let mut next = state.clone();
    if !next.is_playing() || next.hints_remaining == 0 || !allows_hints(&next) {
        return next;
    }

    let moves = find_possible_moves(&next.grid);
    if moves.is_empty() {
        return next;
    }

    let pick = moves[next.rng.next_index(moves.len())];
    next.hint = Some(pick);
    next.hints_remaining -= 1;
    next.push_text(
        "HINT!",
        TextAnchor::Center,
        FeedbackColor::PowerDamage,
        config.timing.floating_text_ms,
    );
    next
}

fn allows_hints(state: &GameState) -> bool {
    matches!(
        state.monster.as_ref().map(|m| m.monster_type),
        Some(MonsterType::Goblin | MonsterType::Skeleton)
    )
}

/// Rearrange the grid, consuming a shuffle charge.
pub fn use_shuffle(state: &GameState, config: &RuneMatchConfig) -> GameState {
    let mut next = state.clone();
    if !next.is_playing() || next.shuffles_remaining == 0 {
        return next;
    }

    next.grid = shuffle_grid(&next.grid, config, &mut next.rng);
    next.shuffles_remaining -= 1;
    next.selected_cell = None;
    next.hint = None;
    debug!(remaining = next.shuffles_remaining, "grid shuffled");
    next
}

/// Spend a freeze charge so the next monster attack is skipped.
///
/// No-op while already frozen.
pub fn freeze_monster(state: &GameState) -> GameState {
    let mut next = state.clone();
    if !next.is_playing() || next.frozen || next.freeze_charges == 0 {
        return next;
    }

    next.freeze_charges -= 1;
    next.frozen = true;
    next
}
