/*
 * Simulation Module
 *
 * Owns every buffer of the flock and drives one frame through its phases:
 * 1. Grid build: bucket units by cell, sort, fill the cell start table
 * 2. Force update: each unit reads its candidate neighbors and writes its
 *    next state into the shadow buffer
 * 3. Commit: publish the shadow buffer as the new live state
 * 4. Geometry: rebuild the draw triangles from the committed state
 *
 * Each phase is a full barrier, so a phase only ever reads what the
 * previous one finished writing.
 */

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, trace};

use crate::commit::FrameCommitter;
use crate::error::{Error, Result};
use crate::executor::{Executor, RayonExecutor};
use crate::force_model::FlockingForceModel;
use crate::geometry::{Triangle, TriangleBuffer};
use crate::neighbor_query::NeighborQuery;
use crate::params::SimulationParams;
use crate::probe::FrameInput;
use crate::spatial_grid::{GridLayout, SpatialGrid};
use crate::unit::{Unit, UnitStore};

/// What happened during one call to [`Simulation::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frames advanced so far, including this one.
    pub frame: u64,
    /// False when the frame was paused and nothing moved.
    pub advanced: bool,
    pub grid_build: Duration,
    pub force_update: Duration,
    pub commit: Duration,
    pub triangles: Duration,
    pub occupied_cells: usize,
    pub max_cell_load: usize,
}

impl FrameStats {
    pub fn total(&self) -> Duration {
        self.grid_build + self.force_update + self.commit + self.triangles
    }
}

pub struct Simulation<E: Executor = RayonExecutor> {
    params: SimulationParams,
    model: FlockingForceModel,
    store: UnitStore,
    grid: SpatialGrid,
    committer: FrameCommitter,
    triangles: TriangleBuffer,
    executor: E,
    frame: u64,
}

impl Simulation<RayonExecutor> {
    /// Scatter `params.unit_count` units and run frames on the rayon pool.
    pub fn new(params: SimulationParams) -> Result<Self> {
        Self::with_executor(params, RayonExecutor)
    }
}

impl<E: Executor> Simulation<E> {
    pub fn with_executor(params: SimulationParams, executor: E) -> Result<Self> {
        params.validate()?;

        let seed = params.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        let store = UnitStore::random(&params, &mut rng)?;
        info!(seed, units = store.len(), "Placed initial population");

        Self::from_store(params, store, executor)
    }

    /// Start from an explicit population. `params.unit_count` is ignored in
    /// favor of the store's length.
    pub fn from_store(params: SimulationParams, store: UnitStore, executor: E) -> Result<Self> {
        params.validate()?;
        if store.len() >= u32::MAX as usize {
            return Err(Error::invalid("unit_count", format!("{} units do not fit a 32-bit index", store.len())));
        }
        // A non-finite unit would pass every range test and poison its neighbors
        if let Some(id) = store.iter().position(|unit| !unit.is_finite()) {
            return Err(Error::invalid("units", format!("unit {id} has a non-finite position or velocity")));
        }

        let layout = GridLayout::from_params(&params);
        let grid = SpatialGrid::with_capacity(layout, params.sort_strategy, store.len())?;
        let committer = FrameCommitter::new(store.len())?;
        let mut triangles = TriangleBuffer::new(store.len())?;
        triangles.refresh(store.units(), &executor);

        info!(
            units = store.len(),
            columns = layout.columns(),
            rows = layout.rows(),
            sort = ?params.sort_strategy,
            edge_rule = ?params.edge_rule,
            "Simulation ready"
        );

        Ok(Self {
            model: FlockingForceModel::from_params(&params),
            params,
            store,
            grid,
            committer,
            triangles,
            executor,
            frame: 0,
        })
    }

    /// Advance one frame with the given external input.
    pub fn step(&mut self, input: &FrameInput) -> FrameStats {
        if input.paused {
            return FrameStats { frame: self.frame, advanced: false, ..FrameStats::default() };
        }

        let started = Instant::now();
        self.grid.build(self.store.units(), &self.executor);
        let grid_build = started.elapsed();

        let started = Instant::now();
        let query = NeighborQuery::new(&self.grid, self.params.edge_rule);
        let units = self.store.units();
        let model = &self.model;
        let probe = &input.probe;
        self.committer.compute(&self.executor, |i, next| {
            let unit = &units[i];
            let neighbors = query.candidates(unit).map(|j| (j, &units[j]));
            *next = model.update(i, unit, neighbors, probe);
        });
        let force_update = started.elapsed();

        let started = Instant::now();
        self.committer.publish(&mut self.store, &self.executor);
        let commit = started.elapsed();

        let started = Instant::now();
        self.triangles.refresh(self.store.units(), &self.executor);
        let triangles = started.elapsed();

        self.frame += 1;
        let (occupied_cells, max_cell_load) = self.grid.occupancy();

        trace!(
            frame = self.frame,
            grid_us = grid_build.as_micros() as u64,
            force_us = force_update.as_micros() as u64,
            commit_us = commit.as_micros() as u64,
            triangles_us = triangles.as_micros() as u64,
            occupied_cells,
            max_cell_load,
            "Frame advanced"
        );

        FrameStats {
            frame: self.frame,
            advanced: true,
            grid_build,
            force_update,
            commit,
            triangles,
            occupied_cells,
            max_cell_load,
        }
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn units(&self) -> &[Unit] {
        self.store.units()
    }

    pub fn store(&self) -> &UnitStore {
        &self.store
    }

    /// Index built at the start of the last advanced frame.
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn triangles(&self) -> &[Triangle] {
        self.triangles.triangles()
    }

    pub fn triangle_buffer(&self) -> &TriangleBuffer {
        &self.triangles
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SequentialExecutor;
    use crate::probe::EnvironmentProbe;

    fn small_params(unit_count: usize) -> SimulationParams {
        SimulationParams { unit_count, seed: Some(7), ..SimulationParams::default() }
    }

    #[test]
    fn paused_frame_changes_nothing() {
        let mut sim = Simulation::with_executor(small_params(50), SequentialExecutor).unwrap();
        let before = sim.store().clone();

        let stats = sim.step(&FrameInput::paused());
        assert!(!stats.advanced);
        assert_eq!(stats.frame, 0);
        assert_eq!(sim.store(), &before);
    }

    #[test]
    fn step_advances_frame_and_moves_units() {
        let mut sim = Simulation::with_executor(small_params(50), SequentialExecutor).unwrap();
        let before = sim.store().clone();

        let stats = sim.step(&FrameInput::running());
        assert!(stats.advanced);
        assert_eq!(stats.frame, 1);
        assert_eq!(sim.frame(), 1);
        assert_ne!(sim.store(), &before);
        assert!(stats.occupied_cells > 0);
        assert!(stats.max_cell_load >= 1);
        assert_eq!(sim.grid().entries().len(), 50);
    }

    #[test]
    fn triangles_follow_committed_state() {
        let mut sim = Simulation::with_executor(small_params(20), SequentialExecutor).unwrap();
        sim.step(&FrameInput::with_probe(EnvironmentProbe::at(800.0, 450.0)));

        assert_eq!(sim.triangles().len(), 20);
        for (unit, triangle) in sim.units().iter().zip(sim.triangles()) {
            assert_eq!(*triangle, Triangle::for_unit(unit));
        }
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = SimulationParams { visual_range: 0.0, ..small_params(10) };
        assert!(matches!(
            Simulation::with_executor(params, SequentialExecutor),
            Err(Error::InvalidParam { name: "visual_range", .. })
        ));
    }

    #[test]
    fn non_finite_units_are_rejected() {
        let store = UnitStore::from_units(vec![Unit::new(f32::NAN, 400.0, 1.0, 0.0), Unit::new(50.0, 400.0, 1.0, 0.0)]);
        assert!(matches!(
            Simulation::from_store(small_params(2), store, SequentialExecutor),
            Err(Error::InvalidParam { name: "units", .. })
        ));

        let store = UnitStore::from_units(vec![Unit::new(50.0, 400.0, 1.0, f32::INFINITY)]);
        assert!(Simulation::from_store(small_params(1), store, SequentialExecutor).is_err());
    }

    #[test]
    fn stats_time_each_phase() {
        let mut sim = Simulation::with_executor(small_params(300), SequentialExecutor).unwrap();
        let stats = sim.step(&FrameInput::running());
        assert_eq!(stats.total(), stats.grid_build + stats.force_update + stats.commit + stats.triangles);

        let paused = sim.step(&FrameInput::paused());
        assert_eq!(paused.total(), Duration::ZERO);
    }

    #[test]
    fn explicit_store_sets_population() {
        let store = UnitStore::from_units(vec![Unit::new(800.0, 450.0, 1.0, 0.0)]);
        let mut sim = Simulation::from_store(small_params(10_000), store, SequentialExecutor).unwrap();
        sim.step(&FrameInput::running());
        assert_eq!(sim.units(), &[Unit::new(801.0, 450.0, 1.0, 0.0)]);
    }
}
