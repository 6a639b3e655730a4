/*
 * Flocking Simulation - Module Definitions
 *
 * A frame-stepped flocking simulation over a uniform spatial grid. The
 * simulation core is independent of any window; the viewer modules drive it
 * from a nannou window when the `viewer` feature is enabled.
 */

// Re-export key components for easier access
pub use commit::FrameCommitter;
pub use error::{Error, Result};
pub use executor::{Executor, RayonExecutor, SequentialExecutor, ShuffledExecutor};
pub use force_model::FlockingForceModel;
pub use geometry::{Triangle, TriangleBuffer};
pub use neighbor_query::{EdgeRule, NeighborQuery};
pub use params::SimulationParams;
pub use probe::{EnvironmentProbe, FrameInput};
pub use simulation::{FrameStats, Simulation};
pub use spatial_grid::{CellIndexEntry, GridLayout, SortStrategy, SpatialGrid, EMPTY_CELL};
pub use unit::{Unit, UnitStore};

// Simulation core
pub mod commit;
pub mod error;
pub mod executor;
pub mod force_model;
pub mod geometry;
pub mod neighbor_query;
pub mod params;
pub mod probe;
pub mod simulation;
pub mod spatial_grid;
pub mod unit;

// Window, input and overlay
#[cfg(feature = "viewer")]
pub mod app;
#[cfg(feature = "viewer")]
pub mod debug;
#[cfg(feature = "viewer")]
pub mod input;
#[cfg(feature = "viewer")]
pub mod renderer;
#[cfg(feature = "viewer")]
pub mod ui;
