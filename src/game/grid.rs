//! Rune Grid
//!
//! Fixed-size, row-major grid of runes plus the generators that fill it.
//! Dimensions are set at construction and never change afterwards.

use std::ops::Index;

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::config::RuneMatchConfig;
use crate::core::rng::{shuffle_with, RandomSource};
use crate::error::EngineError;
use crate::game::matching::{find_matches, find_possible_moves};
use crate::game::rune::{sample_distinct_rune, Rune, VocabularyItem};

/// Grid coordinate. Row 0 is the top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    /// Row index (0 = top)
    pub row: usize,
    /// Column index (0 = left)
    pub col: usize,
}

impl GridPosition {
    /// Create a position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True if the two positions share an edge.
    pub fn is_adjacent(self, other: GridPosition) -> bool {
        (self.row == other.row && self.col.abs_diff(other.col) == 1)
            || (self.col == other.col && self.row.abs_diff(other.row) == 1)
    }
}

/// Row-major rune grid.
///
/// Deserialization rejects snapshots whose cell count does not match the
/// dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridSnapshot")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Rune>,
    /// Next renderer id to hand out
    next_rune_id: u32,
}

/// Unchecked wire form of [`Grid`].
#[derive(Deserialize)]
struct GridSnapshot {
    rows: usize,
    columns: usize,
    cells: Vec<Rune>,
    next_rune_id: u32,
}

impl TryFrom<GridSnapshot> for Grid {
    type Error = EngineError;

    fn try_from(snapshot: GridSnapshot) -> Result<Self, Self::Error> {
        let GridSnapshot { rows, columns, cells, next_rune_id } = snapshot;
        if rows == 0 || columns == 0 {
            return Err(EngineError::InvalidSnapshot(format!(
                "grid dimensions must be positive, got {rows}x{columns}"
            )));
        }
        match rows.checked_mul(columns) {
            Some(expected) if expected == cells.len() => Ok(Self {
                rows,
                columns,
                cells,
                next_rune_id,
            }),
            _ => Err(EngineError::InvalidSnapshot(format!(
                "grid has {} cells, expected {rows}x{columns}",
                cells.len()
            ))),
        }
    }
}

impl Grid {
    /// Build a grid from row-major cells.
    ///
    /// # Panics
    /// Panics if `cells.len() != rows * columns`.
    pub fn from_cells(rows: usize, columns: usize, cells: Vec<Rune>) -> Self {
        assert_eq!(cells.len(), rows * columns, "cell count must equal rows * columns");
        let next_rune_id = cells.iter().map(Rune::id).max().map_or(0, |id| id.wrapping_add(1));
        Self {
            rows,
            columns,
            cells,
            next_rune_id,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// True if the position lies inside the grid.
    #[inline]
    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.row < self.rows && pos.col < self.columns
    }

    /// Rune at a position.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn get(&self, pos: GridPosition) -> &Rune {
        &self.cells[self.offset(pos)]
    }

    /// Replace the rune at a position.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    pub fn set(&mut self, pos: GridPosition, rune: Rune) {
        let offset = self.offset(pos);
        self.cells[offset] = rune;
    }

    /// All runes in row-major order.
    pub fn cells(&self) -> &[Rune] {
        &self.cells
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> {
        let columns = self.columns;
        (0..self.rows * columns).map(move |i| GridPosition::new(i / columns, i % columns))
    }

    /// Renderer id the next refilled rune will receive.
    #[inline]
    pub fn next_rune_id(&self) -> u32 {
        self.next_rune_id
    }

    pub(crate) fn into_parts(self) -> (usize, usize, Vec<Rune>, u32) {
        (self.rows, self.columns, self.cells, self.next_rune_id)
    }

    pub(crate) fn from_parts(rows: usize, columns: usize, cells: Vec<Rune>, next_rune_id: u32) -> Self {
        Self {
            rows,
            columns,
            cells,
            next_rune_id,
        }
    }

    #[inline]
    fn offset(&self, pos: GridPosition) -> usize {
        assert!(self.contains(pos), "position {pos:?} outside {}x{} grid", self.rows, self.columns);
        pos.row * self.columns + pos.col
    }
}

impl Index<GridPosition> for Grid {
    type Output = Rune;

    fn index(&self, pos: GridPosition) -> &Rune {
        self.get(pos)
    }
}

/// Generate a fresh grid with no adjacent matching pair.
///
/// Cells are filled row-major. Each cell draws up to
/// `grid.generation_attempts` candidates, rejecting any whose match key
/// equals the left or top neighbour's. If the budget runs out the last
/// candidate is kept, so a pre-existing match can survive in rare cases.
pub fn initialize_grid<R: RandomSource + ?Sized>(
    vocabulary: &[VocabularyItem],
    config: &RuneMatchConfig,
    rng: &mut R,
) -> Result<Grid, EngineError> {
    if vocabulary.is_empty() {
        return Err(EngineError::EmptyVocabulary);
    }

    let (rows, columns) = (config.grid.rows, config.grid.columns);
    let mut cells: Vec<Rune> = Vec::with_capacity(rows * columns);

    for r in 0..rows {
        for c in 0..columns {
            let left = (c > 0).then(|| &cells[cells.len() - 1]);
            let top = (r > 0).then(|| &cells[cells.len() - columns]);

            let (rune, distinct) = sample_distinct_rune(
                vocabulary,
                config,
                rng,
                cells.len() as u32,
                config.grid.generation_attempts,
                &[left, top],
            );
            if !distinct {
                warn!(row = r, col = c, "generation budget exhausted, keeping matching rune");
            }

            cells.push(rune);
        }
    }

    let next_rune_id = cells.len() as u32;
    Ok(Grid::from_parts(rows, columns, cells, next_rune_id))
}

/// Deterministic grid for scripted scenarios.
///
/// Display text cycles through the vocabulary terms; every cell gets a
/// unique word id (`word-{row}-{col}`), so the grid contains no matches
/// until a test plants some.
pub fn initialize_empty_grid(
    vocabulary: &[VocabularyItem],
    config: &RuneMatchConfig,
) -> Result<Grid, EngineError> {
    if vocabulary.is_empty() {
        return Err(EngineError::EmptyVocabulary);
    }

    let (rows, columns) = (config.grid.rows, config.grid.columns);
    let cells = (0..rows * columns)
        .map(|i| {
            let (r, c) = (i / columns, i % columns);
            let item = &vocabulary[i % vocabulary.len()];
            Rune::vocabulary(i as u32, format!("word-{r}-{c}"), item.term.as_str())
        })
        .collect::<Vec<_>>();

    let next_rune_id = cells.len() as u32;
    Ok(Grid::from_parts(rows, columns, cells, next_rune_id))
}

/// Swap two runes, returning a new grid.
///
/// Positions are not validated against adjacency; swapping the same pair
/// twice restores the original grid.
///
/// # Panics
/// Panics if either position is out of bounds.
pub fn swap_runes(grid: &Grid, a: GridPosition, b: GridPosition) -> Grid {
    let mut next = grid.clone();
    let (ia, ib) = (next.offset(a), next.offset(b));
    next.cells.swap(ia, ib);
    next
}

/// Rearrange the existing runes.
///
/// Each attempt shuffles the rune pool, then fills cells row-major with the
/// first pooled rune that does not match its left or top neighbour. An
/// attempt is accepted when the result has no standing match and at least
/// one available move. Falls back to the last arrangement when
/// `grid.generation_attempts` runs out.
pub fn shuffle_grid<R: RandomSource + ?Sized>(grid: &Grid, config: &RuneMatchConfig, rng: &mut R) -> Grid {
    let (rows, columns) = (grid.rows, grid.columns);
    let mut candidate = grid.clone();

    for _ in 0..config.grid.generation_attempts.max(1) {
        let mut pool = grid.cells.clone();
        shuffle_with(rng, &mut pool);

        let mut placed: Vec<Rune> = Vec::with_capacity(pool.len());
        for i in 0..rows * columns {
            let (r, c) = (i / columns, i % columns);
            let pick = pool
                .iter()
                .position(|rune| {
                    !(c > 0 && placed[i - 1].matches(rune))
                        && !(r > 0 && placed[i - columns].matches(rune))
                })
                .unwrap_or(0);
            placed.push(pool.swap_remove(pick));
        }

        candidate = Grid::from_parts(rows, columns, placed, grid.next_rune_id);
        if find_matches(&candidate).is_empty() && !find_possible_moves(&candidate).is_empty() {
            return candidate;
        }
    }

    warn!("shuffle budget exhausted, keeping last arrangement");
    candidate
}
