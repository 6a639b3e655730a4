/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid used for neighbor lookups. The world
 * is cut into square cells one visual range wide, so any two units that can
 * see each other sit in the same or adjacent cells.
 *
 * Instead of a Vec per cell the grid keeps one flat index rebuilt every frame:
 * 1. every unit emits a (unit id, cell id) entry
 * 2. the entries are sorted by cell id
 * 3. a start table records, per cell, where its run begins in the sorted
 *    entries (or EMPTY_CELL when no unit lives there)
 *
 * Each step runs as its own executor phase, so step 3 never sees a half
 * sorted index.
 */

use serde::{Deserialize, Serialize};

use crate::error::{reserve, Result};
use crate::executor::Executor;
use crate::params::SimulationParams;
use crate::unit::Unit;

/// Start-table value for a cell with no units.
pub const EMPTY_CELL: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellIndexEntry {
    pub unit_id: u32,
    pub cell_id: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortStrategy {
    /// Counting sort over the cell-id domain. Linear, and stable within a cell.
    #[default]
    Counting,
    /// Unstable comparison sort on cell id.
    Comparison,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    cell_size: f32,
    columns: usize,
    rows: usize,
}

impl GridLayout {
    pub fn new(world_width: f32, world_height: f32, cell_size: f32) -> Self {
        Self {
            cell_size,
            columns: (world_width / cell_size).ceil() as usize,
            rows: (world_height / cell_size).ceil() as usize,
        }
    }

    pub fn from_params(params: &SimulationParams) -> Self {
        Self::new(params.world_width, params.world_height, params.visual_range)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    // Positions past the world edge land in the border cell
    #[inline]
    pub fn cell_coords(&self, x: f32, y: f32) -> (usize, usize) {
        let column = (x / self.cell_size).floor().clamp(0.0, (self.columns - 1) as f32) as usize;
        let row = (y / self.cell_size).floor().clamp(0.0, (self.rows - 1) as f32) as usize;
        (column, row)
    }

    #[inline]
    pub fn cell_of(&self, x: f32, y: f32) -> usize {
        let (column, row) = self.cell_coords(x, y);
        row * self.columns + column
    }

    #[inline]
    pub fn coords_of_cell(&self, cell: usize) -> (usize, usize) {
        (cell % self.columns, cell / self.columns)
    }
}

pub struct SpatialGrid {
    layout: GridLayout,
    strategy: SortStrategy,
    entries: Vec<CellIndexEntry>,
    cell_start: Vec<u32>,
    // Counting sort workspace, kept between frames
    scratch: Vec<CellIndexEntry>,
    offsets: Vec<u32>,
}

impl SpatialGrid {
    pub fn new(layout: GridLayout, strategy: SortStrategy) -> Self {
        Self {
            layout,
            strategy,
            entries: Vec::new(),
            cell_start: vec![EMPTY_CELL; layout.cell_count()],
            scratch: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// Reserve every buffer the per-frame build touches for `unit_count` units.
    pub fn with_capacity(layout: GridLayout, strategy: SortStrategy, unit_count: usize) -> Result<Self> {
        let mut grid = Self::new(layout, strategy);
        reserve(&mut grid.entries, unit_count, "cell index")?;
        if strategy == SortStrategy::Counting {
            reserve(&mut grid.scratch, unit_count, "sort scratch")?;
            reserve(&mut grid.offsets, layout.cell_count(), "cell offsets")?;
        }
        Ok(grid)
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn strategy(&self) -> SortStrategy {
        self.strategy
    }

    /// Rebuild the index from the current unit positions.
    pub fn build<E: Executor>(&mut self, units: &[Unit], executor: &E) {
        let layout = self.layout;

        // Phase 1: one cell id per unit
        self.entries.resize(units.len(), CellIndexEntry::default());
        executor.for_each_slot(&mut self.entries, |i, entry| {
            let unit = &units[i];
            *entry = CellIndexEntry {
                unit_id: i as u32,
                cell_id: layout.cell_of(unit.x, unit.y) as u32,
            };
        });

        // Phase 2: order by cell id
        match self.strategy {
            SortStrategy::Counting => executor.run_once(|| {
                counting_sort(&mut self.entries, &mut self.scratch, &mut self.offsets, layout.cell_count())
            }),
            SortStrategy::Comparison => {
                executor.run_once(|| self.entries.sort_unstable_by_key(|entry| entry.cell_id))
            }
        }

        // Phase 3: one lane per cell finds where its run starts
        let entries = &self.entries;
        executor.for_each_slot(&mut self.cell_start, |cell, start| {
            let first = entries.partition_point(|entry| (entry.cell_id as usize) < cell);
            *start = match entries.get(first) {
                Some(entry) if entry.cell_id as usize == cell => first as u32,
                _ => EMPTY_CELL,
            };
        });
    }

    /// Sorted (unit id, cell id) entries from the last build.
    pub fn entries(&self) -> &[CellIndexEntry] {
        &self.entries
    }

    /// Raw start table, `EMPTY_CELL` for unoccupied cells.
    pub fn cell_start_table(&self) -> &[u32] {
        &self.cell_start
    }

    /// Offset of the first entry of `cell`, or `None` when the cell is empty.
    pub fn cell_start(&self, cell: usize) -> Option<usize> {
        match self.cell_start.get(cell) {
            Some(&start) if start != EMPTY_CELL => Some(start as usize),
            _ => None,
        }
    }

    /// Number of occupied cells and the population of the busiest one.
    pub fn occupancy(&self) -> (usize, usize) {
        let mut occupied = 0;
        let mut busiest = 0;
        let mut run = 0;
        let mut current = None;
        for entry in &self.entries {
            if current == Some(entry.cell_id) {
                run += 1;
            } else {
                occupied += 1;
                current = Some(entry.cell_id);
                run = 1;
            }
            busiest = busiest.max(run);
        }
        (occupied, busiest)
    }
}

// Stable counting sort keyed by cell id: count, exclusive prefix sum, scatter
fn counting_sort(
    entries: &mut Vec<CellIndexEntry>,
    scratch: &mut Vec<CellIndexEntry>,
    offsets: &mut Vec<u32>,
    cell_count: usize,
) {
    offsets.clear();
    offsets.resize(cell_count, 0);
    for entry in entries.iter() {
        offsets[entry.cell_id as usize] += 1;
    }

    let mut running = 0u32;
    for offset in offsets.iter_mut() {
        let count = *offset;
        *offset = running;
        running += count;
    }

    scratch.clear();
    scratch.resize(entries.len(), CellIndexEntry::default());
    for entry in entries.iter() {
        let slot = &mut offsets[entry.cell_id as usize];
        scratch[*slot as usize] = *entry;
        *slot += 1;
    }

    std::mem::swap(entries, scratch);
}
