/*
 * Neighbor Query Module
 *
 * Candidate neighbor enumeration over a built SpatialGrid. A unit can only
 * see units in its own cell or the up to eight cells around it. Members of a
 * cell are the contiguous run of sorted index entries that starts at the
 * cell's start-table offset.
 */

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::spatial_grid::{CellIndexEntry, SpatialGrid};
use crate::unit::Unit;

/// Which adjacent cells count as inside the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeRule {
    /// The neighbor's own column and row must lie in `[0, columns) x [0, rows)`.
    #[default]
    Clamped,
    /// Strict test on the unit's own column/row before the offset is applied.
    /// Drops neighbors in column or row 0; kept to compare against older runs.
    Legacy,
}

impl EdgeRule {
    #[inline]
    fn admits(self, coord: usize, offset: isize, bound: usize) -> bool {
        let coord = coord as isize;
        let bound = bound as isize;
        match (self, offset) {
            (_, 0) => true,
            (EdgeRule::Clamped, _) => (0..bound).contains(&(coord + offset)),
            (EdgeRule::Legacy, -1) => coord - 1 > 0,
            (EdgeRule::Legacy, _) => coord + 1 < bound,
        }
    }
}

/// At most nine cells: the unit's own cell first, then its neighbors.
pub type CandidateCells = SmallVec<[usize; 9]>;

// Own cell first, then the eight compass directions
const OFFSETS: [(isize, isize); 9] = [
    (0, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Clone, Copy)]
pub struct NeighborQuery<'g> {
    grid: &'g SpatialGrid,
    rule: EdgeRule,
}

impl<'g> NeighborQuery<'g> {
    pub fn new(grid: &'g SpatialGrid, rule: EdgeRule) -> Self {
        Self { grid, rule }
    }

    pub fn cells_for_unit(&self, unit: &Unit) -> CandidateCells {
        self.cells_around(self.grid.layout().cell_of(unit.x, unit.y))
    }

    pub fn cells_around(&self, cell: usize) -> CandidateCells {
        let layout = self.grid.layout();
        let (column, row) = layout.coords_of_cell(cell);

        OFFSETS
            .iter()
            .filter(|&&(dc, dr)| {
                self.rule.admits(column, dc, layout.columns()) && self.rule.admits(row, dr, layout.rows())
            })
            .map(|&(dc, dr)| {
                let c = (column as isize + dc) as usize;
                let r = (row as isize + dr) as usize;
                r * layout.columns() + c
            })
            .collect()
    }

    /// Unit ids living in `cell`. Yields nothing for an empty cell.
    pub fn neighbors_in_cell(&self, cell: usize) -> CellMembers<'g> {
        let entries = self.grid.entries();
        match self.grid.cell_start(cell) {
            Some(start) => CellMembers { entries, cell_id: cell as u32, cursor: start },
            None => CellMembers { entries, cell_id: cell as u32, cursor: entries.len() },
        }
    }

    /// Every unit id in the candidate cells of `unit`, the unit itself included.
    pub fn candidates(&self, unit: &Unit) -> impl Iterator<Item = usize> + 'g {
        let query = *self;
        self.cells_for_unit(unit)
            .into_iter()
            .flat_map(move |cell| query.neighbors_in_cell(cell))
    }
}

/// Forward scan over one cell's run of the sorted index.
pub struct CellMembers<'g> {
    entries: &'g [CellIndexEntry],
    cell_id: u32,
    cursor: usize,
}

impl Iterator for CellMembers<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let entry = self.entries.get(self.cursor)?;
        if entry.cell_id != self.cell_id {
            // Crossed into the next cell, stay exhausted
            self.cursor = self.entries.len();
            return None;
        }
        self.cursor += 1;
        Some(entry.unit_id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SequentialExecutor;
    use crate::spatial_grid::{GridLayout, SortStrategy};

    fn grid_with(units: &[Unit]) -> SpatialGrid {
        let mut grid = SpatialGrid::new(GridLayout::new(1600.0, 900.0, 100.0), SortStrategy::Counting);
        grid.build(units, &SequentialExecutor);
        grid
    }

    fn sorted(mut cells: CandidateCells) -> Vec<usize> {
        cells.sort_unstable();
        cells.to_vec()
    }

    #[test]
    fn interior_cell_has_nine_candidates() {
        let grid = grid_with(&[]);
        let query = NeighborQuery::new(&grid, EdgeRule::Clamped);
        let cells = query.cells_around(17);
        assert_eq!(cells[0], 17);
        assert_eq!(sorted(cells), vec![0, 1, 2, 16, 17, 18, 32, 33, 34]);
    }

    #[test]
    fn corner_cells_drop_outside_neighbors() {
        let grid = grid_with(&[]);
        let query = NeighborQuery::new(&grid, EdgeRule::Clamped);
        assert_eq!(sorted(query.cells_around(0)), vec![0, 1, 16, 17]);
        assert_eq!(sorted(query.cells_around(143)), vec![126, 127, 142, 143]);
        assert_eq!(sorted(query.cells_around(15)), vec![14, 15, 30, 31]);
    }

    #[test]
    fn edge_cell_has_six_candidates() {
        let grid = grid_with(&[]);
        let query = NeighborQuery::new(&grid, EdgeRule::Clamped);
        assert_eq!(sorted(query.cells_around(5)), vec![4, 5, 6, 20, 21, 22]);
    }

    #[test]
    fn legacy_rule_skips_column_zero() {
        let grid = grid_with(&[]);
        let legacy = NeighborQuery::new(&grid, EdgeRule::Legacy);
        let clamped = NeighborQuery::new(&grid, EdgeRule::Clamped);

        // Cell 17 sits at column 1, row 1
        assert_eq!(sorted(legacy.cells_around(17)), vec![17, 18, 33, 34]);
        assert_eq!(clamped.cells_around(17).len(), 9);
        // Far from the low edges both rules agree
        assert_eq!(sorted(legacy.cells_around(50)), sorted(clamped.cells_around(50)));
    }

    #[test]
    fn members_stop_at_cell_boundary() {
        let units = [
            Unit::new(10.0, 10.0, 1.0, 0.0),
            Unit::new(110.0, 10.0, 1.0, 0.0),
            Unit::new(20.0, 20.0, 1.0, 0.0),
        ];
        let grid = grid_with(&units);
        let query = NeighborQuery::new(&grid, EdgeRule::Clamped);

        assert_eq!(query.neighbors_in_cell(0).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(query.neighbors_in_cell(1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(query.neighbors_in_cell(2).count(), 0);
    }

    #[test]
    fn candidates_span_adjacent_cells() {
        let units = [
            Unit::new(199.0, 199.0, 1.0, 0.0),
            Unit::new(201.0, 201.0, 1.0, 0.0),
            Unit::new(500.0, 500.0, 1.0, 0.0),
        ];
        let grid = grid_with(&units);
        let query = NeighborQuery::new(&grid, EdgeRule::Clamped);

        let mut found: Vec<usize> = query.candidates(&units[0]).collect();
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn legacy_rule_misses_a_close_neighbor_near_the_left_edge() {
        let units = [Unit::new(105.0, 450.0, 1.0, 0.0), Unit::new(95.0, 450.0, 1.0, 0.0)];
        let grid = grid_with(&units);

        let legacy: Vec<usize> = NeighborQuery::new(&grid, EdgeRule::Legacy).candidates(&units[0]).collect();
        let clamped: Vec<usize> = NeighborQuery::new(&grid, EdgeRule::Clamped).candidates(&units[0]).collect();
        assert!(!legacy.contains(&1));
        assert!(clamped.contains(&1));
    }
}
