//! Match Detection
//!
//! Finds maximal horizontal and vertical runs of two or more runes sharing
//! a match key, then merges runs that share a cell into connected groups.
//!
//! ## Algorithm
//!
//! 1. Scan every row left to right, then every column top to bottom,
//!    collecting runs ("segments") of length >= 2 in discovery order.
//! 2. Union-find over segment indices: two segments are joined when they
//!    claim the same cell.
//! 3. Emit one group per set, ordered by its lowest segment index. Cells
//!    are listed in segment order with duplicates dropped, so the first
//!    coordinate is always the first cell discovered.
//!
//! The output depends only on the grid contents.

use serde::{Serialize, Deserialize};

use crate::game::grid::{swap_runes, Grid, GridPosition};
use crate::game::rune::{PowerUpKind, Rune};

/// What a group is made of.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    /// Vocabulary tiles sharing a word id
    Vocabulary {
        /// Shared word id
        word_id: String,
    },
    /// Heal power-ups
    Heal,
    /// Shield power-ups
    Shield,
}

impl GroupKind {
    fn of(rune: &Rune) -> Self {
        match rune {
            Rune::Vocabulary { word_id, .. } => GroupKind::Vocabulary {
                word_id: word_id.clone(),
            },
            Rune::PowerUp { kind: PowerUpKind::Heal, .. } => GroupKind::Heal,
            Rune::PowerUp { kind: PowerUpKind::Shield, .. } => GroupKind::Shield,
        }
    }
}

/// A connected set of matching cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    /// Cells in discovery order
    pub coords: Vec<GridPosition>,
    /// Formed by intersecting runs and covers at least five cells
    pub is_special: bool,
    /// Kind taken from the first coordinate
    pub kind: GroupKind,
    /// Cascade level that produced the group (0 = the player's move)
    pub cascade_index: u32,
}

impl MatchGroup {
    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// True if the group has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Word id for vocabulary groups.
    pub fn word_id(&self) -> Option<&str> {
        match &self.kind {
            GroupKind::Vocabulary { word_id } => Some(word_id),
            GroupKind::Heal | GroupKind::Shield => None,
        }
    }
}

/// A swap of two adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// First cell
    pub from: GridPosition,
    /// Adjacent cell (right of or below `from`)
    pub to: GridPosition,
}

/// Minimum run length that counts as a match.
const MIN_RUN: usize = 2;

/// Minimum size of an intersecting group to count as special.
const SPECIAL_MIN_CELLS: usize = 5;

/// Find all match groups in a grid.
pub fn find_matches(grid: &Grid) -> Vec<MatchGroup> {
    let segments = collect_segments(grid);
    if segments.is_empty() {
        return Vec::new();
    }

    // Union segments that claim the same cell
    let mut sets = DisjointSet::new(segments.len());
    let mut owner: Vec<Option<usize>> = vec![None; grid.rows() * grid.columns()];
    for (i, segment) in segments.iter().enumerate() {
        for pos in segment {
            let cell = pos.row * grid.columns() + pos.col;
            match owner[cell] {
                Some(j) => sets.union(i, j),
                None => owner[cell] = Some(i),
            }
        }
    }

    // Root -> output group index, assigned in segment order
    let mut group_of_root: Vec<Option<usize>> = vec![None; segments.len()];
    let mut groups: Vec<(Vec<GridPosition>, usize)> = Vec::new();
    let mut seen = vec![false; grid.rows() * grid.columns()];

    for (i, segment) in segments.iter().enumerate() {
        let root = sets.find(i);
        let index = *group_of_root[root].get_or_insert_with(|| {
            groups.push((Vec::new(), 0));
            groups.len() - 1
        });

        let (coords, segment_count) = &mut groups[index];
        *segment_count += 1;
        for pos in segment {
            let cell = pos.row * grid.columns() + pos.col;
            if !seen[cell] {
                seen[cell] = true;
                coords.push(*pos);
            }
        }
    }

    groups
        .into_iter()
        .map(|(coords, segment_count)| {
            let kind = GroupKind::of(&grid[coords[0]]);
            MatchGroup {
                // Merging only happens between crossing runs
                is_special: segment_count > 1 && coords.len() >= SPECIAL_MIN_CELLS,
                coords,
                kind,
                cascade_index: 0,
            }
        })
        .collect()
}

/// Every adjacent swap that would produce at least one match.
///
/// Moves are listed row-major, right neighbour before down neighbour.
pub fn find_possible_moves(grid: &Grid) -> Vec<Move> {
    let mut moves = Vec::new();

    for from in grid.positions() {
        let right = GridPosition::new(from.row, from.col + 1);
        let down = GridPosition::new(from.row + 1, from.col);

        for to in [right, down] {
            if !grid.contains(to) || grid[from].matches(&grid[to]) {
                continue;
            }
            if !find_matches(&swap_runes(grid, from, to)).is_empty() {
                moves.push(Move { from, to });
            }
        }
    }

    moves
}

/// Maximal runs of length >= 2: rows first, then columns.
fn collect_segments(grid: &Grid) -> Vec<Vec<GridPosition>> {
    let (rows, columns) = (grid.rows(), grid.columns());
    let mut segments = Vec::new();

    for r in 0..rows {
        scan_line(grid, columns, |i| GridPosition::new(r, i), &mut segments);
    }
    for c in 0..columns {
        scan_line(grid, rows, |i| GridPosition::new(i, c), &mut segments);
    }

    segments
}

fn scan_line<F>(grid: &Grid, len: usize, at: F, segments: &mut Vec<Vec<GridPosition>>)
where
    F: Fn(usize) -> GridPosition,
{
    let mut start = 0;
    for i in 1..=len {
        if i < len && grid[at(i)].matches(&grid[at(i - 1)]) {
            continue;
        }
        if i - start >= MIN_RUN {
            segments.push((start..i).map(&at).collect());
        }
        start = i;
    }
}

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}
