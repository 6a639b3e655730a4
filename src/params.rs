/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds every tuning
 * constant of the flock: population, world and margin sizes, perception
 * ranges, steering factors and speed limits. Parameters are fixed once a
 * simulation is built. They can be loaded from a RON file where any field
 * left out keeps its default.
 */

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::neighbor_query::EdgeRule;
use crate::spatial_grid::SortStrategy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub unit_count: usize,
    pub world_width: f32,
    pub world_height: f32,
    pub margin: f32,
    // Cell size of the spatial grid is the visual range
    pub visual_range: f32,
    pub protected_range: f32,
    pub turn_factor: f32,
    pub centering_factor: f32,
    pub avoid_factor: f32,
    pub align_factor: f32,
    pub mouse_factor: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub sort_strategy: SortStrategy,
    pub edge_rule: EdgeRule,
    // Fixed seed for reproducible initial placement, random when absent
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            unit_count: 10_000,
            world_width: 1600.0,
            world_height: 900.0,
            margin: 200.0,
            visual_range: 100.0,
            protected_range: 20.0,
            turn_factor: 0.017,
            centering_factor: 0.000013,
            avoid_factor: 0.0015,
            align_factor: 0.01,
            mouse_factor: 0.003,
            min_speed: 0.9,
            max_speed: 1.2,
            sort_strategy: SortStrategy::default(),
            edge_rule: EdgeRule::default(),
            seed: None,
        }
    }
}

/// Inner box a unit is steered back into. Outside it on any axis the unit
/// receives a `turn_factor` nudge toward the interior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginBox {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl SimulationParams {
    pub fn grid_columns(&self) -> usize {
        (self.world_width / self.visual_range).ceil() as usize
    }

    pub fn grid_rows(&self) -> usize {
        (self.world_height / self.visual_range).ceil() as usize
    }

    pub fn cell_count(&self) -> usize {
        self.grid_columns() * self.grid_rows()
    }

    pub fn margin_box(&self) -> MarginBox {
        MarginBox {
            left: self.margin,
            right: self.world_width - self.margin,
            bottom: self.margin,
            top: self.world_height - self.margin,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("margin", self.margin),
            ("visual_range", self.visual_range),
            ("protected_range", self.protected_range),
            ("turn_factor", self.turn_factor),
            ("centering_factor", self.centering_factor),
            ("avoid_factor", self.avoid_factor),
            ("align_factor", self.align_factor),
            ("mouse_factor", self.mouse_factor),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(Error::invalid(name, format!("must be finite, got {value}")));
            }
        }

        if self.visual_range <= 0.0 {
            return Err(Error::invalid("visual_range", "must be positive"));
        }
        if !(0.0..=self.visual_range).contains(&self.protected_range) {
            return Err(Error::invalid(
                "protected_range",
                format!("must lie in [0, {}]", self.visual_range),
            ));
        }
        if self.margin < 0.0 {
            return Err(Error::invalid("margin", "must not be negative"));
        }
        if self.world_width <= 2.0 * self.margin {
            return Err(Error::invalid("world_width", "must exceed twice the margin"));
        }
        if self.world_height <= 2.0 * self.margin {
            return Err(Error::invalid("world_height", "must exceed twice the margin"));
        }
        if self.min_speed <= 0.0 {
            return Err(Error::invalid("min_speed", "must be positive"));
        }
        if self.max_speed < self.min_speed {
            return Err(Error::invalid("max_speed", "must not be below min_speed"));
        }

        // Unit and cell ids are stored as u32, with u32::MAX reserved as the empty-cell sentinel
        if self.unit_count >= u32::MAX as usize {
            return Err(Error::invalid("unit_count", "does not fit a 32-bit unit id"));
        }
        if self.cell_count() >= u32::MAX as usize {
            return Err(Error::invalid("visual_range", "too small for the world size"));
        }

        Ok(())
    }

    pub fn from_ron_str(text: &str) -> Result<Self> {
        let params: Self = ron::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}
