//! Cascade Resolution
//!
//! Removes matched runes, lets survivors fall, refills from the top and
//! repeats until the grid is stable.

use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::config::RuneMatchConfig;
use crate::core::rng::RandomSource;
use crate::game::grid::{Grid, GridPosition};
use crate::game::matching::{find_matches, MatchGroup};
use crate::game::rune::{sample_distinct_rune, Rune, VocabularyItem};

/// Outcome of resolving one player move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Stable grid after all cascades
    pub grid: Grid,
    /// Number of detect/remove/refill passes performed
    pub cascades: u32,
    /// Every group from every pass, tagged with its cascade index
    pub groups: Vec<MatchGroup>,
}

/// Clear matched cells, compact each column downward and refill the top.
///
/// Survivors keep their relative order. Each refilled cell draws up to
/// `grid.refill_attempts` candidates avoiding the rune directly below and
/// the rune to the left; the last candidate is kept if none qualifies.
pub fn apply_gravity<R: RandomSource + ?Sized>(
    grid: &Grid,
    matched: &[GridPosition],
    vocabulary: &[VocabularyItem],
    config: &RuneMatchConfig,
    rng: &mut R,
) -> Grid {
    let (rows, columns, cells, mut next_id) = grid.clone().into_parts();
    let mut slots: Vec<Option<Rune>> = cells.into_iter().map(Some).collect();

    for pos in matched {
        slots[pos.row * columns + pos.col] = None;
    }

    // Columns left to right so the left neighbour is already final
    for c in 0..columns {
        let survivors: Vec<Rune> = (0..rows)
            .rev()
            .filter_map(|r| slots[r * columns + c].take())
            .collect();
        let mut survivors = survivors.into_iter();

        for r in (0..rows).rev() {
            let rune = match survivors.next() {
                Some(rune) => rune,
                None => {
                    let below = (r + 1 < rows).then(|| slots[(r + 1) * columns + c].as_ref()).flatten();
                    let left = (c > 0).then(|| slots[r * columns + c - 1].as_ref()).flatten();

                    let (rune, distinct) = sample_distinct_rune(
                        vocabulary,
                        config,
                        rng,
                        next_id,
                        config.grid.refill_attempts,
                        &[below, left],
                    );
                    if !distinct {
                        debug!(row = r, col = c, "refill budget exhausted, keeping matching rune");
                    }
                    next_id = next_id.wrapping_add(1);
                    rune
                }
            };
            slots[r * columns + c] = Some(rune);
        }
    }

    Grid::from_parts(rows, columns, slots.into_iter().flatten().collect(), next_id)
}

/// Resolve matches until the grid is stable.
///
/// Each pass tags the groups it found with the current cascade index,
/// clears every matched cell through [`apply_gravity`] and re-detects.
/// Stops silently after `grid.max_cascades` passes.
pub fn process_matches<R: RandomSource + ?Sized>(
    grid: &Grid,
    vocabulary: &[VocabularyItem],
    config: &RuneMatchConfig,
    rng: &mut R,
) -> MatchResult {
    let mut current = grid.clone();
    let mut cascades = 0;
    let mut all_groups = Vec::new();
    let mut groups = find_matches(&current);

    while !groups.is_empty() {
        if cascades >= config.grid.max_cascades {
            warn!(cascades, "cascade cap reached, leaving remaining matches");
            break;
        }

        let matched: Vec<GridPosition> = groups
            .iter()
            .flat_map(|g| g.coords.iter().copied())
            .collect();

        all_groups.extend(groups.into_iter().map(|mut g| {
            g.cascade_index = cascades;
            g
        }));

        current = apply_gravity(&current, &matched, vocabulary, config, rng);
        cascades += 1;
        groups = find_matches(&current);
    }

    debug!(cascades, groups = all_groups.len(), "matches resolved");

    MatchResult {
        grid: current,
        cascades,
        groups: all_groups,
    }
}
